//! Module implementing the renderer used by the /render* request handlers.
//!
//! Rendering is CPU-bound, so it's done on the blocking thread pool
//! of the async runtime, with an optional time limit.

use std::time::Duration;

use memer::{CaptionError, CaptionOutput, Engine, Meme};
use thiserror::Error;
use tokio::task;
use tokio::time;


/// Renders memes into PNG images.
#[derive(Clone, Debug)]
pub struct Captioner {
    engine: Engine,
    task_timeout: Option<Duration>,
}

impl Captioner {
    #[inline]
    pub fn new(engine: Engine) -> Self {
        Captioner{engine, task_timeout: None}
    }

    /// Set the maximum time a single rendering may take.
    /// Zero duration disables the limit.
    pub fn with_task_timeout(self, timeout: Duration) -> Self {
        let task_timeout = if timeout.as_secs() > 0 || timeout.subsec_nanos() > 0 {
            trace!("Setting render timeout to {:?}", timeout);
            Some(timeout)
        } else {
            trace!("Disabling render timeout");
            None
        };
        Captioner{task_timeout, ..self}
    }

    #[inline]
    pub fn task_timeout(&self) -> Option<Duration> {
        self.task_timeout
    }
}

impl Captioner {
    /// Render the meme as PNG.
    /// The rendering is done in a separate thread.
    pub async fn render(&self, meme: Meme) -> Result<CaptionOutput, RenderError> {
        let meme_repr = format!("{:?}", meme);
        let engine = self.engine.clone();
        let task = task::spawn_blocking(move || engine.render(&meme));

        let joined = match self.task_timeout {
            Some(timeout) => match time::timeout(timeout, task).await {
                Ok(joined) => joined,
                Err(_) => {
                    // The blocking thread keeps going until the render finishes,
                    // but its result is discarded.
                    error!("Rendering {} took longer than {:?}", meme_repr, timeout);
                    return Err(RenderError::Timeout(timeout));
                }
            },
            None => task.await,
        };

        match joined {
            Ok(Ok(output)) => {
                debug!("Successfully rendered {}, final result size: {} bytes",
                    meme_repr, output.len());
                Ok(output)
            }
            Ok(Err(e)) => {
                error!("Failed to render meme {}: {}", meme_repr, e);
                Err(RenderError::Caption(e))
            }
            Err(e) => {
                error!("Render task for {} didn't complete: {}", meme_repr, e);
                Err(RenderError::Unavailable(e))
            }
        }
    }
}


/// Error that can occur during the meme rendering process.
#[derive(Debug, Error)]
pub enum RenderError {
    /// Error during the captioning process.
    #[error("failed to render the meme: {0}")]
    Caption(#[source] CaptionError),
    /// Timeout while performing the render.
    #[error("rendering took longer than {0:?}")]
    Timeout(Duration),
    /// The render task couldn't be run to completion.
    #[error("rendering service unavailable: {0}")]
    Unavailable(#[source] task::JoinError),
}
