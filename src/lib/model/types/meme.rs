//! Module implementing the `Meme` type and its builder.

use std::error;
use std::fmt;

use crate::model::constants::{DEFAULT_HEIGHT, DEFAULT_WIDTH};


/// Describes a meme to render. Used as an input structure.
///
/// The background, if given, is kept as the raw bytes of an encoded image.
/// It is only decoded at render time, and a failure to do so
/// makes the renderer fall back to a generated gradient.
#[derive(Clone, Default, PartialEq, Eq)]
pub struct Meme {
    /// Text rendered near the top edge.
    pub top_text: String,
    /// Text rendered near the bottom edge.
    pub bottom_text: String,
    /// Width of the rendered image.
    pub width: u32,
    /// Height of the rendered image.
    pub height: u32,
    /// Encoded background image (PNG, JPEG, etc.), if any.
    pub background: Option<Vec<u8>>,
}

impl Meme {
    /// Create a `Meme` with given texts and the default size.
    #[inline]
    pub fn new<T: Into<String>, B: Into<String>>(top_text: T, bottom_text: B) -> Self {
        Meme{
            top_text: top_text.into(),
            bottom_text: bottom_text.into(),
            width: DEFAULT_WIDTH,
            height: DEFAULT_HEIGHT,
            background: None,
        }
    }

    /// Whether the meme includes any text.
    #[inline]
    pub fn has_text(&self) -> bool {
        !self.top_text.is_empty() || !self.bottom_text.is_empty()
    }
}

impl fmt::Debug for Meme {
    fn fmt(&self, fmt: &mut fmt::Formatter) -> fmt::Result {
        let mut ds = fmt.debug_struct("Meme");
        if !self.top_text.is_empty() {
            ds.field("top_text", &self.top_text);
        }
        if !self.bottom_text.is_empty() {
            ds.field("bottom_text", &self.bottom_text);
        }
        ds.field("width", &self.width);
        ds.field("height", &self.height);
        if let Some(ref bg) = self.background {
            ds.field("background", &format_args!("<{} bytes>", bg.len()));
        }
        ds.finish()
    }
}


/// Builder for `Meme`.
#[derive(Debug, Default, PartialEq)]
#[must_use = "unused builder which must be used"]
pub struct Builder {
    top_text: Option<String>,
    bottom_text: Option<String>,
    width: Option<u32>,
    height: Option<u32>,
    background: Option<Vec<u8>>,
}

impl Builder {
    /// Create a new `Builder` for a `Meme`.
    #[inline]
    pub fn new() -> Self {
        Self::default()
    }
}

impl Builder {
    /// Set the text at the top of the resulting `Meme`.
    #[inline]
    pub fn top_text<S: Into<String>>(mut self, text: S) -> Self {
        self.top_text = Some(text.into()); self
    }

    /// Set the text at the bottom of the resulting `Meme`.
    #[inline]
    pub fn bottom_text<S: Into<String>>(mut self, text: S) -> Self {
        self.bottom_text = Some(text.into()); self
    }

    /// Change the width of the resulting image.
    ///
    /// By default, `DEFAULT_WIDTH` will be used.
    #[inline]
    pub fn width(mut self, width: u32) -> Self {
        self.width = Some(width); self
    }

    /// Change the height of the resulting image.
    ///
    /// By default, `DEFAULT_HEIGHT` will be used.
    #[inline]
    pub fn height(mut self, height: u32) -> Self {
        self.height = Some(height); self
    }

    /// Use given encoded image as the background.
    #[inline]
    pub fn background<B: Into<Vec<u8>>>(mut self, bytes: B) -> Self {
        self.background = Some(bytes.into()); self
    }

    /// Remove the background, so that a gradient is generated instead.
    #[inline]
    pub fn clear_background(mut self) -> Self {
        self.background = None; self
    }
}

impl Builder {
    /// Build the resulting `Meme`.
    pub fn build(self) -> Result<Meme, Error> {
        self.validate()?;
        Ok(Meme{
            top_text: self.top_text.unwrap_or_default(),
            bottom_text: self.bottom_text.unwrap_or_default(),
            width: self.width.unwrap_or(DEFAULT_WIDTH),
            height: self.height.unwrap_or(DEFAULT_HEIGHT),
            background: self.background,
        })
    }

    #[doc(hidden)]
    fn validate(&self) -> Result<(), Error> {
        if self.width == Some(0) || self.height == Some(0) {
            return Err(Error::ZeroSize(self.width, self.height));
        }
        if self.background.as_ref().map(|bg| bg.is_empty()).unwrap_or(false) {
            return Err(Error::EmptyBackground);
        }
        Ok(())
    }
}


/// Error while building a `Meme`.
#[derive(Clone, Debug, PartialEq)]
pub enum Error {
    /// One of the dimensions is zero.
    ZeroSize(Option<u32>, Option<u32>),
    /// Background was given but it doesn't contain any data.
    EmptyBackground,
}

impl error::Error for Error {}

impl fmt::Display for Error {
    fn fmt(&self, fmt: &mut fmt::Formatter) -> fmt::Result {
        match *self {
            Error::ZeroSize(w, h) => write!(fmt, "image size must be positive, got {}x{}",
                w.unwrap_or(DEFAULT_WIDTH), h.unwrap_or(DEFAULT_HEIGHT)),
            Error::EmptyBackground => write!(fmt, "background image is empty"),
        }
    }
}


#[cfg(test)]
mod tests {
    use spectral::prelude::*;
    use crate::model::constants::{DEFAULT_HEIGHT, DEFAULT_WIDTH};
    use super::{Builder, Error, Meme};

    #[test]
    fn defaults() {
        let meme = Builder::new().build().unwrap();
        assert_eq!(DEFAULT_WIDTH, meme.width);
        assert_eq!(DEFAULT_HEIGHT, meme.height);
        assert!(!meme.has_text());
        assert!(meme.background.is_none());
    }

    #[test]
    fn texts_and_size() {
        let meme = Builder::new()
            .top_text("Hello").bottom_text("World")
            .width(1600).height(900)
            .build().unwrap();
        assert_eq!(Meme{width: 1600, height: 900, ..Meme::new("Hello", "World")}, meme);
        assert!(meme.has_text());
    }

    #[test]
    fn zero_size() {
        assert_that!(Builder::new().width(0).build())
            .is_err().is_equal_to(Error::ZeroSize(Some(0), None));
        assert_that!(Builder::new().height(0).build()).is_err();
    }

    #[test]
    fn empty_background() {
        assert_that!(Builder::new().background(vec![]).build())
            .is_err().is_equal_to(Error::EmptyBackground);
        assert_that!(Builder::new().background(vec![1]).clear_background().build())
            .is_ok();
    }

    #[test]
    fn debug_hides_background_bytes() {
        let meme = Builder::new().background(vec![0; 42]).build().unwrap();
        let repr = format!("{:?}", meme);
        assert_that!(repr).contains("<42 bytes>");
    }
}
