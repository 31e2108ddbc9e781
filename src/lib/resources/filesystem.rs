//! Module implementing loaders of files from the filesystem.

use std::fs::File;
use std::io::{self, BufReader, Read};
use std::path::{Path, PathBuf};

use super::Loader;


/// Loader for the content of files in a given directory.
///
/// Resource `name` maps to the file `<directory>/<name>.<extension>`.
#[derive(Debug)]
pub struct BytesLoader {
    directory: PathBuf,
    extension: String,
}

impl BytesLoader {
    #[inline]
    pub fn for_extension<D: AsRef<Path>, S: ToString>(directory: D, extension: S) -> Self {
        BytesLoader{
            directory: directory.as_ref().to_owned(),
            extension: extension.to_string().trim().to_lowercase(),
        }
    }

    #[inline]
    pub fn directory(&self) -> &Path {
        &self.directory
    }

    /// Path of the file that would be loaded for given resource name.
    pub fn path_for(&self, name: &str) -> io::Result<PathBuf> {
        // Names must not escape the directory.
        if name.is_empty() || name.contains(|c| c == '/' || c == '\\') || name.starts_with('.') {
            return Err(io::Error::new(io::ErrorKind::InvalidInput,
                format!("invalid resource name `{}`", name)));
        }
        Ok(self.directory.join(format!("{}.{}", name, self.extension)))
    }
}

impl Loader for BytesLoader {
    type Item = Vec<u8>;
    type Err = io::Error;

    /// Load a file resource as its byte content.
    fn load<'n>(&self, name: &'n str) -> Result<Self::Item, Self::Err> {
        let path = self.path_for(name)?;
        trace!("Loading resource `{}` from {}", name, path.display());
        let file = File::open(&path)?;

        let mut bytes = match file.metadata() {
            Ok(stat) => Vec::with_capacity(stat.len() as usize),
            Err(e) => {
                warn!("Failed to stat file of resource `{}` to obtain its size: {}",
                    name, e);
                Vec::new()
            },
        };

        let mut reader = BufReader::new(file);
        reader.read_to_end(&mut bytes)?;
        Ok(bytes)
    }
}
