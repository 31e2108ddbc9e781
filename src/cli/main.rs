//!
//! memersh -- Memes in the shell
//!

#[macro_use] extern crate clap;
             extern crate exitcode;
             extern crate isatty;
#[macro_use] extern crate lazy_static;
             extern crate memer;
             extern crate slog;
             extern crate slog_envlogger;
             extern crate slog_scope;
             extern crate slog_stdlog;
             extern crate slog_term;
             extern crate thiserror;

#[macro_use] extern crate log;

#[cfg(test)] #[macro_use] extern crate spectral;


mod args;
mod logging;


use std::env;
use std::fs;
use std::io::{self, Write};
use std::path::Path;
use std::process::exit;

use memer::{CaptionError, CaptionOutput, Engine, EngineBuildError, Meme, MemeBuildError,
            MemeBuilder};
use thiserror::Error;

use crate::args::{ArgsError, Options};


lazy_static! {
    /// Application / package name, as filled out by Cargo.
    static ref NAME: &'static str = option_env!("CARGO_PKG_NAME").unwrap_or("memersh");

    /// Application version, as filled out by Cargo.
    static ref VERSION: Option<&'static str> = option_env!("CARGO_PKG_VERSION");
}


fn main() {
    let opts = args::parse().unwrap_or_else(|e| {
        print_args_error(e);
        exit(exitcode::USAGE);
    });

    let _guard = logging::init(opts.verbosity).unwrap_or_else(|e| {
        let _ = writeln!(&mut io::stderr(), "Failed to initialize logging: {}", e);
        exit(exitcode::SOFTWARE);
    });
    if cfg!(debug_assertions) {
        warn!("Debug mode! The program will likely be much slower.");
    }
    for (i, arg) in env::args().enumerate() {
        debug!("argv[{}] = {:?}", i, arg);
    }
    trace!("Options parsed from argv:\n{:#?}", opts);

    let meme = create_meme(&opts).unwrap_or_else(|e| {
        error!("{}", e);
        exit(match e {
            RenderError::Background(..) => exitcode::NOINPUT,
            _ => exitcode::DATAERR,
        });
    });

    let output = match opts.output_path.as_ref() {
        Some(path) => Output::File(path),
        None => {
            trace!("Output set to `-`, using standard output");
            if isatty::stdout_isatty() {
                warn!("Standard output is a terminal.");
            }
            Output::Stdout
        }
    };
    write_meme(&output, || render(&meme)).unwrap_or_else(|e| {
        error!("{}", e);
        exit(match e {
            RenderError::Create(..) => exitcode::CANTCREAT,
            _ => exitcode::UNAVAILABLE,
        });
    });

    if let Output::File(path) = output {
        info!("Meme written to {}", path.display());
    }
}

/// Print an error that may occur while parsing arguments.
fn print_args_error(e: ArgsError) {
    match e {
        // In case of generic parse error (or a request for --help / --version),
        // clap knows best how to report it.
        ArgsError::Parse(e) => e.exit(),
    }
}


/// Create the `Meme` described by the command line options.
fn create_meme(opts: &Options) -> Result<Meme, RenderError> {
    let mut builder = MemeBuilder::new()
        .top_text(opts.top_text.as_str())
        .bottom_text(opts.bottom_text.as_str())
        .width(opts.width).height(opts.height);
    if let Some(path) = opts.background_path.as_ref() {
        if let Some(bytes) = read_background(path)? {
            builder = builder.background(bytes);
        }
    }
    Ok(builder.build()?)
}

fn read_background(path: &Path) -> Result<Option<Vec<u8>>, RenderError> {
    trace!("Reading background image from {}...", path.display());
    let bytes = fs::read(path)
        .map_err(|e| RenderError::Background(path.display().to_string(), e))?;
    if bytes.is_empty() {
        warn!("Background image {} is empty, using a gradient instead", path.display());
        return Ok(None);
    }
    debug!("Read {} bytes of background image from {}", bytes.len(), path.display());
    Ok(Some(bytes))
}

/// Render given `Meme`.
fn render(meme: &Meme) -> Result<CaptionOutput, RenderError> {
    trace!("Rendering {:?}", meme);
    let engine = Engine::new()?;
    Ok(engine.render(meme)?)
}


/// Where the rendered meme goes.
#[derive(Debug)]
enum Output<'p> {
    File(&'p Path),
    Stdout,
}

/// Render the meme with given function and write it to the output.
///
/// The output file is only created (or truncated) once the image is ready.
fn write_meme<F>(output: &Output, render: F) -> Result<(), RenderError>
    where F: FnOnce() -> Result<CaptionOutput, RenderError>
{
    let captioned = render()?;
    trace!("Writing {} bytes of {}...", captioned.len(), captioned.mime_type());
    match *output {
        Output::File(path) => {
            trace!("Opening --output file {}...", path.display());
            let mut file = fs::File::create(path)
                .map_err(|e| RenderError::Create(path.display().to_string(), e))?;
            debug!("File {} opened successfully", path.display());
            file.write_all(captioned.bytes())?;
            file.flush()?;
        }
        Output::Stdout => {
            let stdout = io::stdout();
            let mut stdout = stdout.lock();
            stdout.write_all(captioned.bytes())?;
            stdout.flush()?;
        }
    }
    Ok(())
}


/// Error that can occur while producing the meme.
#[derive(Debug, Error)]
enum RenderError {
    #[error("cannot read background image {0}: {1}")]
    Background(String, #[source] io::Error),
    #[error("invalid meme: {0}")]
    Meme(#[from] MemeBuildError),
    #[error("cannot load the font: {0}")]
    Engine(#[from] EngineBuildError),
    #[error("{0}")]
    Caption(#[from] CaptionError),
    #[error("cannot open output file {0} for writing: {1}")]
    Create(String, #[source] io::Error),
    #[error("cannot write the image: {0}")]
    Output(#[from] io::Error),
}


#[cfg(test)]
mod tests {
    use std::env;
    use std::fs;
    use std::io;
    use std::path::PathBuf;
    use std::process;
    use memer::MemeBuilder;
    use spectral::prelude::*;
    use super::{render, write_meme, Output, RenderError};

    fn scratch_path(name: &str) -> PathBuf {
        let path = env::temp_dir().join(format!("memersh-{}-{}.png", process::id(), name));
        let _ = fs::remove_file(&path);
        path
    }

    #[test]
    fn failed_render_creates_no_file() {
        let path = scratch_path("failed");
        let result = write_meme(&Output::File(&path), || {
            Err(RenderError::Output(io::Error::new(io::ErrorKind::Other, "boom")))
        });
        assert_that!(result).is_err();
        assert_that!(path.exists()).is_false();
    }

    #[test]
    fn failed_render_keeps_existing_file() {
        let path = scratch_path("existing");
        fs::write(&path, b"previous meme").unwrap();
        let result = write_meme(&Output::File(&path), || {
            Err(RenderError::Output(io::Error::new(io::ErrorKind::Other, "boom")))
        });
        assert_that!(result).is_err();
        assert_eq!(b"previous meme".to_vec(), fs::read(&path).unwrap());
        fs::remove_file(&path).unwrap();
    }

    #[test]
    fn rendered_meme_is_written() {
        let path = scratch_path("rendered");
        let meme = MemeBuilder::new().top_text("Top").bottom_text("Bottom")
            .width(800).height(800)
            .build().unwrap();
        write_meme(&Output::File(&path), || render(&meme)).unwrap();

        let bytes = fs::read(&path).unwrap();
        assert_that!(bytes.starts_with(b"\x89PNG")).is_true();
        fs::remove_file(&path).unwrap();
    }

    #[test]
    fn missing_directory() {
        let path = env::temp_dir().join("memersh-no-such-dir").join("meme.png");
        let meme = MemeBuilder::new().top_text("Hi").build().unwrap();
        match write_meme(&Output::File(&path), || render(&meme)) {
            Err(RenderError::Create(..)) => {},
            other => panic!("expected Create error, got {:?}", other),
        }
    }
}
