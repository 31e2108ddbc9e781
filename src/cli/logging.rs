//! Module implementing logging for the application.
//!
//! Log records are written to standard error, so that standard output
//! can carry the rendered image.

use std::env;
use std::sync::Mutex;

use log::SetLoggerError;
use slog::{Drain, FilterLevel, Logger};
use slog_envlogger::LogBuilder;
use slog_scope::GlobalLoggerGuard;


const RUST_LOG_ENV: &str = "RUST_LOG";


/// Initialize logging with given verbosity.
///
/// Zero verbosity logs info messages and above; every -v or -q moves it by one level.
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
    let format = slog_term::CompactFormat::new(decorator).build();
    let mut builder = LogBuilder::new(Mutex::new(format).fuse())
        .filter(None, level);
    if let Ok(spec) = env::var(RUST_LOG_ENV) {
        builder = builder.parse(&spec);
    }

    let logger = Logger::root(builder.build().fuse(), slog::o!());
    let guard = slog_scope::set_global_logger(logger);
    slog_stdlog::init_with_level(log::Level::Trace)?;

    debug!("Logging initialized (verbosity={})", verbosity);
    Ok(guard)
}
