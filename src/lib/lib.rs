//!
//! memer  -- Memes on demand
//!
//! Library for rendering captioned image macros
//! and for working out what a meme should say from its free-text description.
//!

             extern crate base64;
             extern crate image;
             extern crate imageproc;
#[macro_use] extern crate lazy_static;
#[macro_use] extern crate log;
             extern crate mime;
             extern crate rand;
             extern crate regex;
             extern crate reqwest;
             extern crate rusttype;
             extern crate serde;
#[macro_use] extern crate serde_derive;
#[macro_use] extern crate serde_json;


#[cfg(test)] #[macro_use] extern crate spectral;


mod caption;
mod describe;
mod model;
mod resources;
mod sarcasm;


pub use caption::*;
pub use describe::*;
pub use model::*;
pub use resources::*;
pub use sarcasm::score as score_sarcasm;
