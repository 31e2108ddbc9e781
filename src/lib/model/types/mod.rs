//! Module defining the model types.

mod color;
mod meme;
mod sarcasm;
mod spec;
mod template;

pub use self::color::{Color, ColorPair, Hsl};
pub use self::meme::{Meme,
                     Builder as MemeBuilder,
                     Error as MemeBuildError};
pub use self::sarcasm::{Indicator, SarcasmResult};
pub use self::spec::RenderSpec;
pub use self::template::{Template, TextPosition, TEMPLATES};
