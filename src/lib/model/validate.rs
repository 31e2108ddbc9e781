//! Module implementing validation of meme rendering parameters.

use std::error;
use std::fmt;
use std::slice;

use super::constants::{MAX_DIMENSION, MAX_TEXT_LENGTH, MIN_DIMENSION};


/// A single problem with the rendering parameters.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ValidationError {
    TopTextTooLong,
    BottomTextTooLong,
    /// Width is outside of the allowed range, or not a number.
    WidthOutOfRange,
    /// Height is outside of the allowed range, or not a number.
    HeightOutOfRange,
}

impl error::Error for ValidationError {}

impl fmt::Display for ValidationError {
    fn fmt(&self, fmt: &mut fmt::Formatter) -> fmt::Result {
        match *self {
            ValidationError::TopTextTooLong =>
                write!(fmt, "top text exceeds {} chars", MAX_TEXT_LENGTH),
            ValidationError::BottomTextTooLong =>
                write!(fmt, "bottom text exceeds {} chars", MAX_TEXT_LENGTH),
            ValidationError::WidthOutOfRange =>
                write!(fmt, "width must be {}-{}", MIN_DIMENSION, MAX_DIMENSION),
            ValidationError::HeightOutOfRange =>
                write!(fmt, "height must be {}-{}", MIN_DIMENSION, MAX_DIMENSION),
        }
    }
}


/// All the problems found by `validate`, in a fixed order
/// (top text, bottom text, width, height).
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ValidationErrors(Vec<ValidationError>);

impl ValidationErrors {
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    #[inline]
    pub fn iter(&self) -> slice::Iter<ValidationError> {
        self.0.iter()
    }

    /// Human-readable messages for every error.
    pub fn messages(&self) -> Vec<String> {
        self.0.iter().map(|e| e.to_string()).collect()
    }
}

impl<'e> IntoIterator for &'e ValidationErrors {
    type Item = &'e ValidationError;
    type IntoIter = slice::Iter<'e, ValidationError>;
    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

impl error::Error for ValidationErrors {}

impl fmt::Display for ValidationErrors {
    fn fmt(&self, fmt: &mut fmt::Formatter) -> fmt::Result {
        write!(fmt, "{}", self.messages().join("; "))
    }
}


/// Check the user-supplied rendering parameters.
///
/// Dimensions are optional because they may be missing from the request;
/// `None` is treated the same as a value outside of the allowed range.
/// Text length is counted in characters, not bytes.
pub fn validate(top_text: &str, bottom_text: &str,
                width: Option<u32>, height: Option<u32>) -> Result<(), ValidationErrors> {
    let mut errors = vec![];

    if top_text.chars().count() > MAX_TEXT_LENGTH {
        errors.push(ValidationError::TopTextTooLong);
    }
    if bottom_text.chars().count() > MAX_TEXT_LENGTH {
        errors.push(ValidationError::BottomTextTooLong);
    }
    if !width.map(is_valid_dimension).unwrap_or(false) {
        errors.push(ValidationError::WidthOutOfRange);
    }
    if !height.map(is_valid_dimension).unwrap_or(false) {
        errors.push(ValidationError::HeightOutOfRange);
    }

    if errors.is_empty() {
        Ok(())
    } else {
        trace!("Rendering parameters failed validation: {:?}", errors);
        Err(ValidationErrors(errors))
    }
}

/// Parse the dimension from the start of the string, ignoring whatever follows
/// (so `"1600px"` gives 1600).
///
/// Zero, negative numbers and strings without leading digits yield `None`.
pub fn parse_dimension(s: &str) -> Option<u32> {
    let s = s.trim_start();
    let s = s.strip_prefix('+').unwrap_or(s);
    let digits: String = s.chars().take_while(|c| c.is_ascii_digit()).collect();
    match digits.parse::<u32>() {
        Ok(0) | Err(_) => None,
        Ok(n) => Some(n),
    }
}

#[inline]
fn is_valid_dimension(value: u32) -> bool {
    MIN_DIMENSION <= value && value <= MAX_DIMENSION
}
