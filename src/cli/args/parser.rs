//! Module defining the command line argument parser.

use std::path::PathBuf;

use clap::{self, AppSettings, Arg, ArgMatches};
use memer::constants::{DEFAULT_HEIGHT, DEFAULT_WIDTH};

use crate::{NAME, VERSION};
use super::model::{ArgsError, Options};


impl Options {
    pub(super) fn from_matches(matches: &ArgMatches) -> Result<Self, ArgsError> {
        let verbose_count = matches.occurrences_of(OPT_VERBOSE) as isize;
        let quiet_count = matches.occurrences_of(OPT_QUIET) as isize;
        let verbosity = verbose_count - quiet_count;

        let top_text = matches.value_of(OPT_TOP).unwrap_or("").trim().to_owned();
        let bottom_text = matches.value_of(OPT_BOTTOM).unwrap_or("").trim().to_owned();
        let background_path = matches.value_of(OPT_BACKGROUND).map(PathBuf::from);

        let width = dimension(matches, OPT_WIDTH, DEFAULT_WIDTH);
        let height = dimension(matches, OPT_HEIGHT, DEFAULT_HEIGHT);

        // Output path can be set explicit to stdout via `-`.
        let output_path = Some(matches.value_of(OPT_OUTPUT).unwrap_or(DEFAULT_OUTPUT).trim())
            .and_then(|p| if p == "-" { None } else { Some(p) })
            .map(PathBuf::from);

        Ok(Options{
            verbosity,
            top_text, bottom_text, background_path, width, height,
            output_path,
        })
    }
}

/// Read a dimension flag, falling back to the default if it's missing or invalid.
fn dimension(matches: &ArgMatches, name: &str, default: u32) -> u32 {
    match matches.value_of(name) {
        Some(value) => memer::parse_dimension(value).unwrap_or(default),
        None => default,
    }
}


// Parser definition

/// Type of the argument parser object
/// (which is called an "App" in clap's silly nomenclature).
pub type Parser<'p> = clap::App<'p, 'p>;


lazy_static! {
    static ref ABOUT: &'static str = option_env!("CARGO_PKG_DESCRIPTION").unwrap_or("");
}

const OPT_TOP: &str = "top";
const OPT_BOTTOM: &str = "bottom";
const OPT_BACKGROUND: &str = "bg";
const OPT_WIDTH: &str = "width";
const OPT_HEIGHT: &str = "height";
const OPT_OUTPUT: &str = "output";
const OPT_VERBOSE: &str = "verbose";
const OPT_QUIET: &str = "quiet";

const DEFAULT_OUTPUT: &str = "meme.png";


/// Create the parser for application's command line.
// clap 2's `crate_authors!` expansion trips this lint on newer rustc.
#[allow(unknown_lints, dangerous_implicit_autorefs)]
pub fn create_parser<'p>() -> Parser<'p> {
    let mut parser = Parser::new(*NAME);
    if let Some(version) = *VERSION {
        parser = parser.version(version);
    }
    parser
        .about(*ABOUT)
        .author(crate_authors!(", "))

        .setting(AppSettings::StrictUtf8)

        .setting(AppSettings::UnifiedHelpMessage)
        .setting(AppSettings::DontCollapseArgsInUsage)
        .setting(AppSettings::DeriveDisplayOrder)

        // Meme contents.
        .arg(Arg::with_name(OPT_TOP)
            .long("top")
            .takes_value(true)
            .value_name("TEXT")
            .help("Text at the top of the meme"))
        .arg(Arg::with_name(OPT_BOTTOM)
            .long("bottom")
            .takes_value(true)
            .value_name("TEXT")
            .help("Text at the bottom of the meme"))
        .arg(Arg::with_name(OPT_BACKGROUND)
            .long("bg")
            .takes_value(true)
            .value_name("PATH")
            .help("Background image")
            .long_help(concat!(
                "Image file to use as the meme's background.\n\n",
                "It is scaled and cropped to cover the whole meme. ",
                "Without it, or if the file isn't a supported image, ",
                "a random gradient is used instead.")))
        .arg(Arg::with_name(OPT_WIDTH)
            .long("width")
            .takes_value(true)
            .value_name("N")
            .allow_hyphen_values(true)
            .help("Width of the meme in pixels")
            .long_help(concat!(
                "Width of the meme in pixels.\n\n",
                "Invalid values are ignored in favor of the default of 1200.")))
        .arg(Arg::with_name(OPT_HEIGHT)
            .long("height")
            .takes_value(true)
            .value_name("N")
            .allow_hyphen_values(true)
            .help("Height of the meme in pixels")
            .long_help(concat!(
                "Height of the meme in pixels.\n\n",
                "Invalid values are ignored in favor of the default of 675.")))

        // Output flags.
        .arg(Arg::with_name(OPT_OUTPUT)
            .long("output").short("o").alias("out")
            .takes_value(true)
            .value_name("PATH")
            .help("File to write the rendered meme to")
            .long_help(concat!(
                "What file should the rendered PNG be written to.\n\n",
                "By default, this is meme.png in the current directory. ",
                "When this flag is set to `-` (single dash), the image is written ",
                "to standard output so it can be e.g. piped to the ImageMagick `display` program.")))

        // Verbosity flags.
        .arg(Arg::with_name(OPT_VERBOSE)
            .long("verbose").short("v")
            .multiple(true)
            .conflicts_with(OPT_QUIET)
            .help("Increase logging verbosity"))
        .arg(Arg::with_name(OPT_QUIET)
            .long("quiet").short("q")
            .multiple(true)
            .conflicts_with(OPT_VERBOSE)
            .help("Decrease logging verbosity"))

        .help_short("H")
        .version_short("V")
}
