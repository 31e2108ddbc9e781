//! Module for asking a remote language model to describe a meme.

use std::error::Error;
use std::fmt;
use std::time::Duration;

use regex::Regex;
use reqwest::Client;
use serde_json::Value as Json;

use crate::model::{parse_dimension, RenderSpec};
use crate::model::constants::MAX_TEXT_LENGTH;
use super::heuristic::truncate;


/// Default time limit for a single request to the model.
pub const DEFAULT_TIMEOUT_SECS: u64 = 10;
/// Maximum number of tokens the model is asked to generate.
const MAX_TOKENS: u32 = 256;

lazy_static! {
    /// Greedy match of a JSON object embedded in surrounding prose.
    static ref JSON_OBJECT: Regex = Regex::new(r"(?s)\{.*\}").unwrap();
}


/// Connection settings of the remote model.
#[derive(Clone, Debug)]
pub struct ModelConfig {
    pub api_url: String,
    pub api_key: String,
    pub timeout: Duration,
}

impl ModelConfig {
    #[inline]
    pub fn new<U: Into<String>, K: Into<String>>(api_url: U, api_key: K) -> Self {
        ModelConfig{
            api_url: api_url.into(),
            api_key: api_key.into(),
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
        }
    }

    #[inline]
    pub fn with_timeout(self, timeout: Duration) -> Self {
        ModelConfig{timeout, ..self}
    }
}


/// Client of the remote model.
#[derive(Debug)]
pub(super) struct ModelClient {
    config: ModelConfig,
    http: Client,
}

impl ModelClient {
    pub fn new(config: ModelConfig) -> Result<Self, ModelError> {
        let http = Client::builder()
            .timeout(config.timeout)
            .build()
            .map_err(ModelError::Http)?;
        Ok(ModelClient{config, http})
    }

    #[inline]
    pub fn api_url(&self) -> &str {
        &self.config.api_url
    }

    /// Ask the model to turn the description into a `RenderSpec`.
    pub async fn describe(&self, description: &str) -> Result<RenderSpec, ModelError> {
        let body = json!({
            "input": prompt(description),
            "max_tokens": MAX_TOKENS,
        });
        debug!("Querying model at {} about a {}-character description",
            self.config.api_url, description.chars().count());

        let response = self.http.post(&self.config.api_url)
            .bearer_auth(&self.config.api_key)
            .json(&body)
            .send().await
            .map_err(ModelError::Http)?;
        let status = response.status();
        if !status.is_success() {
            return Err(ModelError::Status(status.as_u16()));
        }
        let text = response.text().await.map_err(ModelError::Http)?;
        trace!("Model responded with {} bytes", text.len());

        spec_from_model_output(&text).ok_or(ModelError::Unparseable)
    }
}


/// Instruction sent to the model, followed by the description itself.
fn prompt(description: &str) -> String {
    format!("Produce a JSON object with fields: templateId (string), top (string), \
             bottom (string), width (number), height (number). \
             Respond with only valid JSON.\nDescription:\n{}", description)
}

/// Interpret the raw text output of the model as a `RenderSpec`.
///
/// The output should be a JSON object, but it may also be wrapped in some prose,
/// in which case the outermost `{...}` is used.
/// Missing or invalid fields get their default values.
pub fn spec_from_model_output(output: &str) -> Option<RenderSpec> {
    let json: Json = match serde_json::from_str(output) {
        Ok(json) => json,
        Err(_) => {
            let object = JSON_OBJECT.find(output)?;
            serde_json::from_str(object.as_str()).ok()?
        }
    };
    let object = json.as_object()?;

    let mut spec = RenderSpec::default();
    if let Some(id) = object.get("templateId").and_then(non_empty_string) {
        spec.template_id = id;
    }
    spec.top = object.get("top").map(stringify).unwrap_or_default();
    spec.top = truncate(&spec.top, MAX_TEXT_LENGTH);
    spec.bottom = object.get("bottom").map(stringify).unwrap_or_default();
    spec.bottom = truncate(&spec.bottom, MAX_TEXT_LENGTH);
    if let Some(width) = object.get("width").and_then(dimension) {
        spec.width = width;
    }
    if let Some(height) = object.get("height").and_then(dimension) {
        spec.height = height;
    }
    spec.background = object.get("bg").and_then(non_empty_string);
    Some(spec)
}

/// Textual form of a JSON value, with nulls and `false` treated as empty.
fn stringify(value: &Json) -> String {
    match *value {
        Json::Null | Json::Bool(false) => String::new(),
        Json::String(ref s) => s.clone(),
        ref other => other.to_string(),
    }
}

fn non_empty_string(value: &Json) -> Option<String> {
    Some(stringify(value)).filter(|s| !s.is_empty())
}

/// Positive integer dimension from either a JSON number or a numeric string.
fn dimension(value: &Json) -> Option<u32> {
    match *value {
        Json::Number(ref n) => n.as_f64()
            .filter(|&f| f >= 1.0 && f <= u32::MAX as f64)
            .map(|f| f.trunc() as u32),
        Json::String(ref s) => parse_dimension(s),
        _ => None,
    }
}


/// Error while querying the remote model.
#[derive(Debug)]
pub enum ModelError {
    /// Failure of the HTTP request itself (connection, timeout, body read).
    Http(reqwest::Error),
    /// Model endpoint responded with a non-success HTTP status.
    Status(u16),
    /// Response didn't contain a usable JSON object.
    Unparseable,
}

impl Error for ModelError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match *self {
            ModelError::Http(ref e) => Some(e),
            _ => None,
        }
    }
}

impl fmt::Display for ModelError {
    fn fmt(&self, fmt: &mut fmt::Formatter) -> fmt::Result {
        match *self {
            ModelError::Http(ref e) => write!(fmt, "request to the model failed: {}", e),
            ModelError::Status(status) => write!(fmt, "model responded with HTTP {}", status),
            ModelError::Unparseable => write!(fmt, "model output isn't a JSON object"),
        }
    }
}
