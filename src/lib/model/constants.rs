//! Module defining constants relevant to the data model.

use super::types::Color;


/// Maximum length (in Unicode codepoints) of the top or bottom text.
pub const MAX_TEXT_LENGTH: usize = 200;

/// Minimum width or height of a meme requested over the wire.
pub const MIN_DIMENSION: u32 = 800;
/// Maximum width or height of a meme requested over the wire.
pub const MAX_DIMENSION: u32 = 2400;

/// Width used when none has been given.
pub const DEFAULT_WIDTH: u32 = 1200;
/// Height used when none has been given.
pub const DEFAULT_HEIGHT: u32 = 675;

/// Maximum size (in bytes) of an uploaded background image.
pub const MAX_BACKGROUND_SIZE: usize = 5 * 1024 * 1024;

/// Identifier of the template that render specs default to.
pub const DEFAULT_TEMPLATE: &str = "gradient";


/// Font size as a fraction of the image width.
pub const FONT_SIZE_RATIO: f64 = 0.12;
/// Minimum width of the text outline, in pixels.
pub const MIN_STROKE_WIDTH: f32 = 6.0;
/// Distance between consecutive baselines, in multiples of the font size.
pub const LINE_SPACING: f32 = 1.05;
/// Total horizontal space (left + right) that the text may not occupy.
pub const HORIZONTAL_PADDING: f32 = 80.0;

/// Vertical center of the top text block, as a fraction of image height.
pub const TOP_TEXT_CENTER: f32 = 0.12;
/// Vertical center of the bottom text block, as a fraction of image height.
pub const BOTTOM_TEXT_CENTER: f32 = 0.88;

/// Color of the text body.
pub const TEXT_COLOR: Color = Color(0xff, 0xff, 0xff);
/// Color of the text outline.
pub const OUTLINE_COLOR: Color = TEXT_COLOR.invert();


/// Number of horizontal stripes in the texture overlay.
pub const STRIPE_COUNT: u32 = 40;
/// Global opacity applied to the whole stripe overlay.
pub const STRIPE_ALPHA: f32 = 0.06;
