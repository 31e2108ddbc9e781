//! Module implementing the builder for `Engine`.

use std::error;
use std::fmt;
use std::path::{Path, PathBuf};

use crate::resources::{Font, FontError, FontLoader, Loader};
use super::{Engine, Inner};


/// Builder for `Engine`.
#[derive(Debug, Default)]
#[must_use = "unused builder which must be used"]
pub struct Builder {
    errors: Vec<Error>,
    font_source: Option<FontSource>,
}

/// Where the font for the `Engine` will come from.
#[derive(Debug)]
enum FontSource {
    Directory{directory: PathBuf, name: Option<String>},
    Bytes(Vec<u8>),
}

impl Builder {
    /// Create a new `Builder`.
    #[inline]
    pub fn new() -> Self {
        Builder::default()
    }
}

// Setters.
impl Builder {
    /// Set the directory where the font will be loaded from.
    ///
    /// The font itself must be chosen with `font`.
    pub fn font_directory<P: AsRef<Path>>(mut self, directory: P) -> Self {
        let directory = directory.as_ref().to_owned();
        let ok = match self.font_source {
            None => {
                self.font_source = Some(FontSource::Directory{directory, name: None});
                true
            }
            Some(FontSource::Directory{directory: ref mut dir, ..}) => {
                *dir = directory;
                true
            }
            Some(FontSource::Bytes(..)) => false,
        };
        if ok { self } else { self.err(Error::FontSetupConflict) }
    }

    /// Set the name of the font (file name without the .ttf extension)
    /// to load from the font directory.
    pub fn font<S: Into<String>>(mut self, name: S) -> Self {
        let ok = match self.font_source {
            Some(FontSource::Directory{name: ref mut font_name, ..}) => {
                *font_name = Some(name.into());
                true
            }
            _ => false,
        };
        if ok { self } else { self.err(Error::FontSetupConflict) }
    }

    /// Use the font contained in given TrueType data.
    pub fn font_bytes<B: Into<Vec<u8>>>(mut self, bytes: B) -> Self {
        if self.font_source.is_some() {
            return self.err(Error::FontSetupConflict);
        }
        self.font_source = Some(FontSource::Bytes(bytes.into())); self
    }
}

// Validation & building.
impl Builder {
    /// Build the `Engine`.
    pub fn build(self) -> Result<Engine, Error> {
        if let Some(error) = self.errors.into_iter().next() {
            return Err(error);
        }

        let font = match self.font_source {
            None => {
                debug!("Using the bundled font");
                Font::bundled().map_err(Error::Font)?
            }
            Some(FontSource::Directory{directory, name}) => {
                let name = name.ok_or(Error::NoFontName)?;
                debug!("Loading font `{}` from {}", name, directory.display());
                FontLoader::new(&directory).load(&name)
                    .map_err(|e| Error::FontLoad(name, e))?
            }
            Some(FontSource::Bytes(bytes)) => {
                debug!("Using font from {} bytes of data", bytes.len());
                Font::from_bytes(bytes).map_err(Error::Font)?
            }
        };
        Ok(Engine::from(Inner{font}))
    }

    #[doc(hidden)]
    fn err(mut self, error: Error) -> Self {
        self.errors.push(error); self
    }
}


/// Error that resulted from misconfiguration of the `Engine` via its `Builder`.
#[derive(Debug)]
pub enum Error {
    /// Incompatible ways of providing the font were used.
    FontSetupConflict,
    /// Font directory was given without the name of the font.
    NoFontName,
    /// Named font couldn't be loaded.
    FontLoad(String, FontError),
    /// Font data is invalid.
    Font(FontError),
}

impl error::Error for Error {
    fn source(&self) -> Option<&(dyn error::Error + 'static)> {
        match *self {
            Error::FontLoad(_, ref e) | Error::Font(ref e) => Some(e),
            _ => None,
        }
    }
}

impl fmt::Display for Error {
    fn fmt(&self, fmt: &mut fmt::Formatter) -> fmt::Result {
        match *self {
            Error::FontSetupConflict =>
                write!(fmt, "invalid combination of configuration parameters for setting up the font"),
            Error::NoFontName => write!(fmt, "font directory given but no font name"),
            Error::FontLoad(ref name, ref e) => write!(fmt, "cannot load font `{}`: {}", name, e),
            Error::Font(ref e) => write!(fmt, "{}", e),
        }
    }
}
