//! Module for loading fonts used to render meme captions.

use std::error::Error;
use std::fmt;
use std::io;
use std::ops::Deref;
use std::path::Path;

use rusttype;

use super::Loader;
use super::filesystem::BytesLoader;


pub const FILE_EXTENSION: &str = "ttf";

/// Font used when none has been configured: DejaVu Sans Bold.
const BUNDLED_FONT: &[u8] = include_bytes!("../data/fonts/DejaVuSans-Bold.ttf");


/// Font that can be used to caption memes.
pub struct Font(rusttype::Font<'static>);

impl Font {
    /// The font bundled with the library.
    pub fn bundled() -> Result<Self, FontError> {
        rusttype::Font::try_from_bytes(BUNDLED_FONT).map(Font).ok_or(FontError::Invalid)
    }

    /// Parse a font out of raw TrueType data.
    pub fn from_bytes(bytes: Vec<u8>) -> Result<Self, FontError> {
        rusttype::Font::try_from_vec(bytes).map(Font).ok_or(FontError::Invalid)
    }
}

impl Deref for Font {
    type Target = rusttype::Font<'static>;
    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl From<rusttype::Font<'static>> for Font {
    fn from(font: rusttype::Font<'static>) -> Self {
        Font(font)
    }
}

impl fmt::Debug for Font {
    fn fmt(&self, fmt: &mut fmt::Formatter) -> fmt::Result {
        write!(fmt, "Font({} glyphs)", self.0.glyph_count())
    }
}


/// Loader for fonts stored as .ttf files in a directory.
#[derive(Debug)]
pub struct FontLoader {
    inner: BytesLoader,
}

impl FontLoader {
    pub fn new<D: AsRef<Path>>(directory: D) -> Self {
        FontLoader{
            inner: BytesLoader::for_extension(directory, FILE_EXTENSION),
        }
    }
}

impl Loader for FontLoader {
    type Item = Font;
    type Err = FontError;

    fn load<'n>(&self, name: &'n str) -> Result<Font, Self::Err> {
        let bytes = self.inner.load(name).map_err(|e| {
            error!("Cannot read font `{}` from {}: {}",
                name, self.inner.directory().display(), e);
            FontError::Io(e)
        })?;
        let font = Font::from_bytes(bytes).map_err(|e| {
            error!("File for `{}` font resource is not a valid TrueType font", name);
            e
        })?;
        debug!("Font `{}` loaded successfully", name);
        Ok(font)
    }
}


/// Error while loading a font.
#[derive(Debug)]
pub enum FontError {
    /// The font file couldn't be read.
    Io(io::Error),
    /// The data isn't a single valid TrueType font.
    Invalid,
}

impl Error for FontError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match *self {
            FontError::Io(ref e) => Some(e),
            FontError::Invalid => None,
        }
    }
}

impl fmt::Display for FontError {
    fn fmt(&self, fmt: &mut fmt::Formatter) -> fmt::Result {
        match *self {
            FontError::Io(ref e) => write!(fmt, "cannot read font file: {}", e),
            FontError::Invalid => write!(fmt, "invalid font data"),
        }
    }
}
