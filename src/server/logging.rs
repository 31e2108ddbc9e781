//! Module implementing logging for the application.
//!
//! The `log` crate macros used throughout the code are routed through `slog`,
//! which formats the records onto standard error.

use std::env;
use std::sync::Mutex;

use log::SetLoggerError;
use slog::{Drain, FilterLevel, Logger};
use slog_envlogger::LogBuilder;
use slog_scope::GlobalLoggerGuard;


/// Environment variable that can override the verbosity, with env_logger syntax.
const RUST_LOG_ENV: &str = "RUST_LOG";

/// Modules of dependencies that are too chatty at the debug level.
const NOISY_MODULES: &[&str] = &["hyper", "mio", "tokio", "want", "reqwest", "rustls"];


/// Initialize logging with given verbosity.
///
/// The verbosity value has the following meaning:
/// * -2 or below: only errors
/// * -1: also warnings
/// *  0: also info messages (default)
/// *  1: also debug messages
/// *  2 and above: everything
///
/// The returned guard must be kept alive for as long as the logging is needed.
pub fn init(verbosity: isize) -> Result<GlobalLoggerGuard, SetLoggerError> {
    let level = match verbosity {
        v if v <= -2 => FilterLevel::Error,
        -1 => FilterLevel::Warning,
        0 => FilterLevel::Info,
        1 => FilterLevel::Debug,
        _ => FilterLevel::Trace,
    };

    let decorator = slog_term::TermDecorator::new().stderr().build();
    let format = slog_term::FullFormat::new(decorator).build();
    let mut builder = LogBuilder::new(Mutex::new(format).fuse())
        .filter(None, level);
    if level == FilterLevel::Debug {
        for &module in NOISY_MODULES {
            builder = builder.filter(Some(module), FilterLevel::Info);
        }
    }
    if let Ok(spec) = env::var(RUST_LOG_ENV) {
        builder = builder.parse(&spec);
    }
    let drain = builder.build().fuse();

    let logger = Logger::root(drain, slog::o!());
    let guard = slog_scope::set_global_logger(logger);
    slog_stdlog::init_with_level(log::Level::Trace)?;

    info!("Logging initialized (verbosity={})", verbosity);
    Ok(guard)
}
