//! Module defining the data model of memes and related structures.

pub mod constants;
mod types;
mod validate;


pub use self::types::*;
pub use self::validate::{parse_dimension, validate, ValidationError, ValidationErrors};
