//! Module turning free-text descriptions into meme render specs.

mod heuristic;
mod remote;

pub use self::heuristic::parse_description;
pub use self::remote::{spec_from_model_output, ModelConfig, ModelError,
                      DEFAULT_TIMEOUT_SECS as DEFAULT_MODEL_TIMEOUT_SECS};

use std::fmt;

use crate::model::RenderSpec;
use self::remote::ModelClient;


/// Where a described `RenderSpec` came from.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Source {
    /// Remote language model.
    Llama,
    /// Local heuristic parser.
    Heuristic,
}

impl fmt::Display for Source {
    fn fmt(&self, fmt: &mut fmt::Formatter) -> fmt::Result {
        match *self {
            Source::Llama => write!(fmt, "llama"),
            Source::Heuristic => write!(fmt, "heuristic"),
        }
    }
}


/// Result of describing a meme.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct Described {
    pub spec: RenderSpec,
    pub source: Source,
}


/// Turns descriptions into render specs.
///
/// If a remote model is configured, it is asked first
/// and the heuristic parser is used when that fails for any reason.
#[derive(Debug)]
pub struct Describer {
    model: Option<ModelClient>,
}

impl Describer {
    /// Create a describer which only uses the heuristic parser.
    #[inline]
    pub fn heuristic() -> Self {
        Describer{model: None}
    }

    /// Create a describer, optionally backed by a remote model.
    pub fn new(config: Option<ModelConfig>) -> Result<Self, ModelError> {
        let model = match config {
            Some(config) => Some(ModelClient::new(config)?),
            None => None,
        };
        Ok(Describer{model})
    }

    #[inline]
    pub fn has_model(&self) -> bool {
        self.model.is_some()
    }

    /// Describe the meme. Never fails, since the heuristic parser always gives a result.
    pub async fn describe(&self, description: &str) -> Described {
        if let Some(ref model) = self.model {
            match model.describe(description).await {
                Ok(spec) => return Described{spec, source: Source::Llama},
                Err(e) => warn!("Model at {} failed to describe the meme, \
                                 falling back to heuristic: {}", model.api_url(), e),
            }
        }
        let spec = parse_description(description);
        Described{spec, source: Source::Heuristic}
    }
}
