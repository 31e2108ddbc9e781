//! Module implementing meme rendering.

mod background;
pub mod canvas;
mod engine;
mod error;
mod output;
mod task;
pub mod text;


pub use self::background::CoverFit;
pub use self::engine::{Builder as EngineBuilder,
                       BuildError as EngineBuildError,
                       Engine};
pub use self::error::CaptionError;
pub use self::output::CaptionOutput;
