//! Module for handling command line arguments.

mod model;
mod parser;


use std::env;
use std::ffi::OsString;

pub use self::model::{ArgsError, Options};
use self::parser::create_parser;


/// Parse command line arguments and return `Options` object.
#[inline]
pub fn parse() -> Result<Options, ArgsError> {
    parse_from_argv(env::args_os())
}

/// Parse application options from given array of arguments
/// (*all* arguments, including binary name).
#[inline]
pub fn parse_from_argv<I, T>(argv: I) -> Result<Options, ArgsError>
    where I: IntoIterator<Item=T>, T: Clone + Into<OsString>
{
    let parser = create_parser();
    let matches = parser.get_matches_from_safe(argv)?;
    Options::from_matches(&matches)
}


#[cfg(test)]
mod tests {
    use std::path::PathBuf;

    use memer::constants::{DEFAULT_HEIGHT, DEFAULT_WIDTH};
    use spectral::prelude::*;
    use super::parse_from_argv;
    use crate::NAME;

    #[test]
    fn no_args() {
        assert_that!(parse_from_argv(Vec::<&str>::new())).is_err();
    }

    #[test]
    fn defaults() {
        let opts = parse_from_argv(vec![*NAME]).unwrap();
        assert_eq!(0, opts.verbosity);
        assert_eq!("", opts.top_text);
        assert_eq!("", opts.bottom_text);
        assert_eq!(None, opts.background_path);
        assert_eq!(DEFAULT_WIDTH, opts.width);
        assert_eq!(DEFAULT_HEIGHT, opts.height);
        assert_eq!(Some(PathBuf::from("meme.png")), opts.output_path);
    }

    #[test]
    fn texts() {
        let opts = parse_from_argv(vec![
            *NAME, "--top", "One does not simply", "--bottom", "write a meme renderer"]).unwrap();
        assert_eq!("One does not simply", opts.top_text);
        assert_eq!("write a meme renderer", opts.bottom_text);
    }

    #[test]
    fn dimensions() {
        let opts = parse_from_argv(vec![*NAME, "--width", "1600", "--height", "900"]).unwrap();
        assert_eq!(1600, opts.width);
        assert_eq!(900, opts.height);

        // No range checks here, unlike the HTTP API.
        let opts = parse_from_argv(vec![*NAME, "--width", "300", "--height", "5000"]).unwrap();
        assert_eq!(300, opts.width);
        assert_eq!(5000, opts.height);
    }

    #[test]
    fn invalid_dimensions_fall_back() {
        let opts = parse_from_argv(vec![*NAME, "--width", "wide", "--height", "0"]).unwrap();
        assert_eq!(DEFAULT_WIDTH, opts.width);
        assert_eq!(DEFAULT_HEIGHT, opts.height);

        let opts = parse_from_argv(vec![*NAME, "--width", "-5", "--height", "+0"]).unwrap();
        assert_eq!(DEFAULT_WIDTH, opts.width);
        assert_eq!(DEFAULT_HEIGHT, opts.height);
    }

    #[test]
    fn background() {
        let opts = parse_from_argv(vec![*NAME, "--bg", "cat.jpg"]).unwrap();
        assert_eq!(Some(PathBuf::from("cat.jpg")), opts.background_path);
    }

    #[test]
    fn output() {
        let opts = parse_from_argv(vec![*NAME, "-o", "out.png"]).unwrap();
        assert_eq!(Some(PathBuf::from("out.png")), opts.output_path);
        let opts = parse_from_argv(vec![*NAME, "--output", "-"]).unwrap();
        assert_eq!(None, opts.output_path);
        let opts = parse_from_argv(vec![*NAME, "--out", "memes/today.png"]).unwrap();
        assert_eq!(Some(PathBuf::from("memes/today.png")), opts.output_path);
        let opts = parse_from_argv(vec![*NAME, "--out=-"]).unwrap();
        assert_eq!(None, opts.output_path);
    }

    #[test]
    fn verbosity() {
        assert_eq!(2, parse_from_argv(vec![*NAME, "-vv"]).unwrap().verbosity);
        assert_eq!(-1, parse_from_argv(vec![*NAME, "-q"]).unwrap().verbosity);
        assert_that!(parse_from_argv(vec![*NAME, "-v", "-q"])).is_err();
    }

    #[test]
    fn unknown_flag() {
        assert_that!(parse_from_argv(vec![*NAME, "--template", "drake"])).is_err();
    }
}
