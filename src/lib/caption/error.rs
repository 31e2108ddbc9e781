//! Captioning error.

use std::error::Error;
use std::fmt;

use image::ImageError;


/// Error that may occur during the captioning.
///
/// Note that a background image which cannot be decoded is *not* an error;
/// the meme is rendered with a gradient background instead.
#[derive(Debug)]
pub enum CaptionError {
    /// Failed to encode the final image.
    Encode(ImageError),
}

impl Error for CaptionError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match *self {
            CaptionError::Encode(ref e) => Some(e),
        }
    }
}

impl fmt::Display for CaptionError {
    fn fmt(&self, fmt: &mut fmt::Formatter) -> fmt::Result {
        match *self {
            CaptionError::Encode(ref e) => write!(fmt, "failed to encode the final image: {}", e),
        }
    }
}
