//! Data structures for command-line arguments.

use std::path::PathBuf;

use clap;
use thiserror::Error;


/// Structure to hold options received from the command line.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Options {
    /// Verbosity of the logging output.
    ///
    /// Corresponds to the number of times the -v flag has been passed.
    /// If -q has been used instead, this will be negative.
    pub verbosity: isize,

    /// Text to put at the top of the meme.
    pub top_text: String,
    /// Text to put at the bottom of the meme.
    pub bottom_text: String,
    /// Image file to use as the background instead of a gradient.
    pub background_path: Option<PathBuf>,
    pub width: u32,
    pub height: u32,

    /// Path to write the finished meme to.
    ///
    /// If absent, it shall be written to standard output.
    pub output_path: Option<PathBuf>,
}

/// Error that can occur while parsing of command line arguments.
#[derive(Debug, Error)]
pub enum ArgsError {
    /// General when parsing the arguments.
    #[error("invalid arguments: {0}")]
    Parse(#[from] clap::Error),
}
