//! Module for handling command line arguments.

use std::borrow::Cow;
use std::env;
use std::ffi::OsString;
use std::net::{AddrParseError, SocketAddr};
use std::num::ParseIntError;
use std::path::PathBuf;
use std::time::Duration;

use clap::{self, AppSettings, Arg, ArgMatches};
use memer::ModelConfig;
use thiserror::Error;

use super::{NAME, VERSION};


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


/// Structure to hold options received from the command line.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Options {
    /// Verbosity of the logging output.
    ///
    /// Corresponds to the number of times the -v flag has been passed.
    /// If -q has been used instead, this will be negative.
    pub verbosity: isize,

    /// Address where the server should listen on.
    pub address: SocketAddr,

    /// Number of threads to use for rendering memes.
    /// If omitted, the default of the async runtime is used.
    pub render_threads: Option<usize>,
    /// Maximum time allowed for rendering a single meme.
    /// Zero means no limit.
    pub request_timeout: Duration,

    /// Directory to load the caption font from.
    pub font_directory: Option<PathBuf>,
    /// Name of the caption font (file name without extension).
    pub font: Option<String>,

    /// URL of the language model endpoint used by /generate.
    pub model_url: Option<String>,
    /// API key for the language model endpoint.
    pub model_key: Option<String>,
    /// Maximum time to wait for the language model.
    pub model_timeout: Duration,
}

impl Options {
    /// Configuration of the language model, if both its URL and key were given.
    pub fn model_config(&self) -> Option<ModelConfig> {
        match (self.model_url.as_ref(), self.model_key.as_ref()) {
            (Some(url), Some(key)) =>
                Some(ModelConfig::new(url.as_str(), key.as_str()).with_timeout(self.model_timeout)),
            _ => None,
        }
    }
}

impl Options {
    fn from_matches(matches: &ArgMatches) -> Result<Self, ArgsError> {
        let verbose_count = matches.occurrences_of(OPT_VERBOSE) as isize;
        let quiet_count = matches.occurrences_of(OPT_QUIET) as isize;
        let verbosity = verbose_count - quiet_count;

        let address = parse_address(matches.value_of(ARG_ADDR).unwrap_or(DEFAULT_ADDRESS))?;

        let render_threads = match matches.value_of(OPT_RENDER_THREADS) {
            Some(rt) => match rt.parse::<usize>().map_err(ArgsError::RenderThreads)? {
                0 => return Err(ArgsError::ZeroRenderThreads),
                n => Some(n),
            },
            None => None,
        };
        let request_timeout = parse_secs(matches, OPT_REQUEST_TIMEOUT, DEFAULT_REQUEST_TIMEOUT)
            .map_err(ArgsError::RequestTimeout)?;

        let font_directory = matches.value_of(OPT_FONT_DIR).map(PathBuf::from);
        let font = matches.value_of(OPT_FONT).map(str::to_owned);

        let model_url = matches.value_of(OPT_MODEL_URL)
            .map(str::trim).filter(|s| !s.is_empty()).map(str::to_owned);
        let model_key = matches.value_of(OPT_MODEL_KEY)
            .map(str::trim).filter(|s| !s.is_empty()).map(str::to_owned);
        let model_timeout = parse_secs(matches, OPT_MODEL_TIMEOUT, DEFAULT_MODEL_TIMEOUT)
            .map_err(ArgsError::ModelTimeout)?;

        Ok(Options{
            verbosity, address,
            render_threads, request_timeout,
            font_directory, font,
            model_url, model_key, model_timeout,
        })
    }
}

/// Parse the server address, filling in the default host or port if either is missing.
fn parse_address(addr: &str) -> Result<SocketAddr, AddrParseError> {
    let mut addr: Cow<str> = addr.trim().into();

    // If the address is just a port (e.g. ":4242"),
    // then we will prepend it with the default host.
    if addr.starts_with(':') && addr.chars().skip(1).all(|c| c.is_digit(10)) {
        addr = format!("{}{}", DEFAULT_HOST, addr).into();
    }

    // Alternatively, it can be just an interface address, without a port,
    // in which case we'll add the default port.
    let is_just_ipv4 = addr.contains('.') && !addr.contains(':');
    let is_just_ipv6 = addr.starts_with('[') && addr.ends_with(']');
    if is_just_ipv4 || is_just_ipv6 {
        addr = format!("{}:{}", addr, DEFAULT_PORT).into();
    }

    addr.parse()
}

/// Parse a flag holding a number of seconds.
fn parse_secs(matches: &ArgMatches, name: &str, default: u64) -> Result<Duration, ParseIntError> {
    let secs = match matches.value_of(name) {
        Some(s) => s.trim().parse::<u64>()?,
        None => default,
    };
    Ok(Duration::from_secs(secs))
}


/// Error that can occur while parsing of command line arguments.
#[derive(Debug, Error)]
pub enum ArgsError {
    /// General when parsing the arguments.
    #[error("invalid arguments: {0}")]
    Parse(#[from] clap::Error),
    /// Error while parsing the server address.
    #[error("invalid server address: {0}")]
    Address(#[from] AddrParseError),
    /// Error while parsing --render-threads flag.
    #[error("invalid --render-threads value: {0}")]
    RenderThreads(#[source] ParseIntError),
    /// Zero passed as --render-threads.
    #[error("--render-threads must be positive")]
    ZeroRenderThreads,
    /// Error while parsing --request-timeout flag.
    #[error("invalid --request-timeout value: {0}")]
    RequestTimeout(#[source] ParseIntError),
    /// Error while parsing --model-timeout flag.
    #[error("invalid --model-timeout value: {0}")]
    ModelTimeout(#[source] ParseIntError),
}


// Parser configuration

/// Type of the argument parser object
/// (which is called an "App" in clap's silly nomenclature).
type Parser<'p> = clap::App<'p, 'p>;


lazy_static! {
    static ref ABOUT: &'static str = option_env!("CARGO_PKG_DESCRIPTION").unwrap_or("");
}

const ARG_ADDR: &str = "address";
const OPT_RENDER_THREADS: &str = "render-threads";
const OPT_REQUEST_TIMEOUT: &str = "request-timeout";
const OPT_FONT_DIR: &str = "font-dir";
const OPT_FONT: &str = "font";
const OPT_MODEL_URL: &str = "model-url";
const OPT_MODEL_KEY: &str = "model-key";
const OPT_MODEL_TIMEOUT: &str = "model-timeout";
const OPT_VERBOSE: &str = "verbose";
const OPT_QUIET: &str = "quiet";

const ENV_MODEL_URL: &str = "LLAMA4_API_URL";
const ENV_MODEL_KEY: &str = "LLAMA4_API_KEY";

const DEFAULT_HOST: &str = "0.0.0.0";
const DEFAULT_PORT: u16 = 3000;
const DEFAULT_ADDRESS: &str = "0.0.0.0:3000";
const DEFAULT_REQUEST_TIMEOUT: u64 = 30;
const DEFAULT_MODEL_TIMEOUT: u64 = memer::DEFAULT_MODEL_TIMEOUT_SECS;


/// Create the parser for application's command line.
// clap 2's `crate_authors!` expansion trips this lint on newer rustc.
#[allow(unknown_lints, dangerous_implicit_autorefs)]
fn create_parser<'p>() -> Parser<'p> {
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
        .setting(AppSettings::ColorNever)

        .arg(Arg::with_name(ARG_ADDR)
            .value_name("ADDRESS:PORT")
            .required(false)
            .default_value(DEFAULT_ADDRESS)
            .help("Binds the server to given address")
            .long_help(concat!(
                "The address and/or port for the server to listen on.\n\n",
                "This argument can be an IP address of a network interface, ",
                "optionally followed by colon and a port number. ",
                "Alternatively, a colon and port alone is also allowed, ",
                "in which case the server will listen on all network interfaces.")))

        // Rendering options.
        .arg(Arg::with_name(OPT_RENDER_THREADS)
            .long("render-threads")
            .value_name("N")
            .required(false)
            .help("Number of render threads to use")
            .long_help(concat!(
                "Maximum number of threads used for rendering memes.\n\n",
                "If omitted, the default of the async runtime will be used.")))
        .arg(Arg::with_name(OPT_REQUEST_TIMEOUT)
            .long("request-timeout")
            .value_name("SECS")
            .required(false)
            .help("Maximum time allowed for rendering a single meme (secs)")
            .long_help(concat!(
                "Maximum time allowed for rendering a single meme, in seconds.\n\n",
                "Zero disables the limit. Default is 30 seconds.")))
        .arg(Arg::with_name(OPT_FONT_DIR)
            .long("font-dir")
            .value_name("DIR")
            .required(false)
            .requires(OPT_FONT)
            .help("Directory to load the caption font from"))
        .arg(Arg::with_name(OPT_FONT)
            .long("font")
            .value_name("NAME")
            .required(false)
            .requires(OPT_FONT_DIR)
            .help("Name of the caption font (without the .ttf extension)")
            .long_help(concat!(
                "Name of the TrueType font used for captions.\n\n",
                "The font is loaded from the --font-dir directory. ",
                "If omitted, the bundled DejaVu Sans Bold font is used.")))

        // Language model options.
        .arg(Arg::with_name(OPT_MODEL_URL)
            .long("model-url")
            .value_name("URL")
            .required(false)
            .env(ENV_MODEL_URL)
            .help("URL of the language model used to describe memes")
            .long_help(concat!(
                "URL of the language model endpoint used by POST /generate.\n\n",
                "The model is only used if its API key is also given. ",
                "Otherwise (or when the model fails) descriptions are parsed heuristically.")))
        .arg(Arg::with_name(OPT_MODEL_KEY)
            .long("model-key")
            .value_name("KEY")
            .required(false)
            .env(ENV_MODEL_KEY)
            .hide_env_values(true)
            .help("API key of the language model"))
        .arg(Arg::with_name(OPT_MODEL_TIMEOUT)
            .long("model-timeout")
            .value_name("SECS")
            .required(false)
            .help("Maximum time to wait for the language model (secs)"))

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


#[cfg(test)]
mod tests {
    use std::time::Duration;
    use spectral::prelude::*;
    use crate::NAME;
    use super::parse_from_argv;

    #[test]
    fn no_args() {
        assert_that!(parse_from_argv(Vec::<&str>::new())).is_ok();
        assert_that!(parse_from_argv(vec![*NAME])).is_ok();
    }

    #[test]
    fn defaults() {
        let opts = parse_from_argv(vec![*NAME]).unwrap();
        assert_eq!(0, opts.verbosity);
        assert_eq!("0.0.0.0:3000", opts.address.to_string());
        assert_eq!(None, opts.render_threads);
        assert_eq!(Duration::from_secs(30), opts.request_timeout);
        assert_eq!(Duration::from_secs(10), opts.model_timeout);
        assert_eq!(None, opts.font);
    }

    #[test]
    fn verbosity_args() {
        assert_that!(parse_from_argv(vec![*NAME, "-v"])).is_ok();
        assert_that!(parse_from_argv(vec![*NAME, "-v", "-v"])).is_ok();
        assert_that!(parse_from_argv(vec![*NAME, "-vv"])).is_ok();
        assert_that!(parse_from_argv(vec![*NAME, "-q"])).is_ok();
        assert_eq!(2, parse_from_argv(vec![*NAME, "-vv"]).unwrap().verbosity);
        assert_eq!(-1, parse_from_argv(vec![*NAME, "-q"]).unwrap().verbosity);
        // -v & -q are contradictory
        assert_that!(parse_from_argv(vec![*NAME, "-q", "-v"])).is_err();
    }

    #[test]
    fn address_arg() {
        assert_that!(parse_from_argv(vec![*NAME, ":"])).is_err();
        // IP addresses alone are fine.
        assert_that!(parse_from_argv(vec![*NAME, "127.0.0.1"])).is_ok();
        assert_that!(parse_from_argv(vec![*NAME, "[0::1]"])).is_ok();
        // Port alone is fine, with colon.
        assert_that!(parse_from_argv(vec![*NAME, ":1234"])).is_ok();
        assert_that!(parse_from_argv(vec![*NAME, ":31337"])).is_ok();
        // Both are fine.
        assert_that!(parse_from_argv(vec![*NAME, "127.0.0.1:2345"])).is_ok();
        assert_that!(parse_from_argv(vec![*NAME, "[0::1]:2345"])).is_ok();
        assert_that!(parse_from_argv(vec![*NAME, "[::1]:2345"])).is_ok();
        // Invalid address.
        assert_that!(parse_from_argv(vec![*NAME, "0.0.1"])).is_err();
        assert_that!(parse_from_argv(vec![*NAME, "[::1"])).is_err();
        assert_that!(parse_from_argv(vec![*NAME, "127.0.0.1:"])).is_err();
        // Invalid port.
        assert_that!(parse_from_argv(vec![*NAME, "4242"])).is_err();  // need colon
        assert_that!(parse_from_argv(vec![*NAME, ":123456789"])).is_err();  // >65536
    }

    #[test]
    fn default_host_and_port() {
        let opts = parse_from_argv(vec![*NAME, ":8080"]).unwrap();
        assert_eq!("0.0.0.0:8080", opts.address.to_string());
        let opts = parse_from_argv(vec![*NAME, "127.0.0.1"]).unwrap();
        assert_eq!("127.0.0.1:3000", opts.address.to_string());
    }

    #[test]
    fn render_threads_arg() {
        // Needs a value.
        assert_that!(parse_from_argv(vec![*NAME, "--render-threads"])).is_err();
        // Value must be a number.
        assert_that!(parse_from_argv(vec![*NAME, "--render-threads", "foo"])).is_err();
        // A positive number.
        assert_that!(parse_from_argv(vec![*NAME, "--render-threads", "-42"])).is_err();
        assert_that!(parse_from_argv(vec![*NAME, "--render-threads", "0"])).is_err();
        // This is fine.
        assert_that!(parse_from_argv(vec![*NAME, "--render-threads", "16"])).is_ok();
    }

    #[test]
    fn timeout_args() {
        for &flag in ["--request-timeout", "--model-timeout"].iter() {
            assert_that!(parse_from_argv(vec![*NAME, flag])).is_err();
            assert_that!(parse_from_argv(vec![*NAME, flag, "foo"])).is_err();
            assert_that!(parse_from_argv(vec![*NAME, flag, "-1"])).is_err();
            assert_that!(parse_from_argv(vec![*NAME, flag, "0"])).is_ok();
            assert_that!(parse_from_argv(vec![*NAME, flag, "5"])).is_ok();
        }
        let opts = parse_from_argv(vec![*NAME, "--model-timeout", "3"]).unwrap();
        assert_eq!(Duration::from_secs(3), opts.model_timeout);
    }

    #[test]
    fn font_args() {
        // Both are needed.
        assert_that!(parse_from_argv(vec![*NAME, "--font", "Impact"])).is_err();
        assert_that!(parse_from_argv(vec![*NAME, "--font-dir", "data/fonts"])).is_err();
        let opts = parse_from_argv(vec![
            *NAME, "--font-dir", "data/fonts", "--font", "Impact"]).unwrap();
        assert_eq!(Some("Impact".to_owned()), opts.font);
    }

    #[test]
    fn model_config() {
        let opts = parse_from_argv(vec![
            *NAME, "--model-url", "http://localhost:9999/v1", "--model-key", "secret",
            "--model-timeout", "7"]).unwrap();
        let config = opts.model_config().unwrap();
        assert_eq!("http://localhost:9999/v1", config.api_url);
        assert_eq!("secret", config.api_key);
        assert_eq!(Duration::from_secs(7), config.timeout);

        // Key alone isn't enough.
        let opts = parse_from_argv(vec![*NAME, "--model-key", "secret"]).unwrap();
        if opts.model_url.is_none() {
            assert!(opts.model_config().is_none());
        }
    }
}
