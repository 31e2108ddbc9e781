//!
//! memerd  -- Memes on demand
//!

#[macro_use] extern crate clap;
             extern crate exitcode;
             extern crate futures;
             extern crate hyper;
#[macro_use] extern crate lazy_static;
             extern crate memer;
             extern crate mime;
             extern crate multer;
             extern crate serde;
#[macro_use] extern crate serde_derive;
#[macro_use] extern crate serde_json;
             extern crate serde_qs;
             extern crate slog;
             extern crate slog_envlogger;
             extern crate slog_scope;
             extern crate slog_stdlog;
             extern crate slog_term;
             extern crate thiserror;
             extern crate time;
             extern crate tokio;

// Logging goes through the standard `log` macros; `slog` only provides the backend.
#[macro_use] extern crate log;

#[cfg(test)] #[macro_use] extern crate maplit;
#[cfg(test)] #[macro_use] extern crate spectral;


mod args;
mod handlers;
mod logging;
mod service;


use std::convert::Infallible;
use std::env;
use std::io::{self, Write};
use std::process::exit;

use futures::future;
use hyper::Server;
use hyper::server::conn::AddrStream;
use hyper::service::make_service_fn;
use memer::{Describer, Engine, EngineBuilder, EngineBuildError, ModelError};
use thiserror::Error;
use tokio::runtime::{self, Runtime};

use crate::args::{ArgsError, Options};
use crate::handlers::Captioner;
use crate::service::Memer;


lazy_static! {
    /// Application / package name, as filled out by Cargo.
    static ref NAME: &'static str = option_env!("CARGO_PKG_NAME").unwrap_or("memerd");

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

    let runtime = create_runtime(&opts).unwrap_or_else(|e| {
        error!("Failed to start the async runtime: {}", e);
        exit(exitcode::OSERR);
    });
    if let Err(e) = runtime.block_on(start_server(opts)) {
        error!("{}", e);
        exit(match e {
            ServerError::Engine(..) => exitcode::CONFIG,
            ServerError::Model(..) => exitcode::CONFIG,
            ServerError::Http(..) => exitcode::UNAVAILABLE,
        });
    }
}

/// Print an error that may occur while parsing arguments.
fn print_args_error(e: ArgsError) {
    match e {
        // In case of generic parse error (or a request for --help / --version),
        // clap knows best how to report it.
        ArgsError::Parse(e) => e.exit(),
        e => {
            let _ = writeln!(&mut io::stderr(), "Failed to parse arguments: {}", e);
        }
    }
}


/// Create the async runtime that the server will run on.
fn create_runtime(opts: &Options) -> io::Result<Runtime> {
    let mut builder = runtime::Builder::new_multi_thread();
    builder.enable_all().thread_name("memerd-worker");
    if let Some(count) = opts.render_threads {
        debug!("Using at most {} threads for rendering", count);
        builder.max_blocking_threads(count);
    }
    builder.build()
}

/// Start the server with given options and run it until interrupted.
async fn start_server(opts: Options) -> Result<(), ServerError> {
    let engine = create_engine(&opts)?;
    let captioner = Captioner::new(engine).with_task_timeout(opts.request_timeout);

    let model_config = opts.model_config();
    match model_config {
        Some(ref config) => info!("Using language model at {} for meme descriptions",
            config.api_url),
        None => info!("No language model configured, meme descriptions will be parsed heuristically"),
    }
    let describer = Describer::new(model_config)?;

    let memer = Memer::new(captioner, describer);
    let make_service = make_service_fn(move |conn: &AddrStream| {
        let service = memer.for_connection(conn.remote_addr());
        async move { Ok::<_, Infallible>(service) }
    });

    info!("Starting the server to listen on {}...", opts.address);
    let server = Server::try_bind(&opts.address)?.serve(make_service);
    server.with_graceful_shutdown(shutdown_signal()).await?;

    info!("Server stopped");
    Ok(())
}

/// Create the rendering engine, using the font specified in options if any.
fn create_engine(opts: &Options) -> Result<Engine, EngineBuildError> {
    match (opts.font_directory.as_ref(), opts.font.as_ref()) {
        (Some(dir), Some(font)) => {
            debug!("Using font `{}` from {}", font, dir.display());
            EngineBuilder::new().font_directory(dir).font(font.as_str()).build()
        }
        _ => Engine::new(),
    }
}

/// Resolve when the process is asked to terminate.
async fn shutdown_signal() {
    match tokio::signal::ctrl_c().await {
        Ok(()) => info!("Received interrupt signal, shutting down..."),
        Err(e) => {
            error!("Failed to listen for the interrupt signal: {}", e);
            future::pending::<()>().await
        }
    }
}


/// Error that can prevent the server from running.
#[derive(Debug, Error)]
enum ServerError {
    #[error("failed to set up the rendering engine: {0}")]
    Engine(#[from] EngineBuildError),
    #[error("failed to set up the language model client: {0}")]
    Model(#[from] ModelError),
    #[error("HTTP server error: {0}")]
    Http(#[from] hyper::Error),
}
