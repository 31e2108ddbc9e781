//! Module with the server's request handlers.

mod captioner;
pub mod list;
mod upload;
pub mod util;


use hyper::{Body, Request, Response, StatusCode};
use hyper::header::{HeaderValue, CONTENT_DISPOSITION};
use memer::{self, CaptionOutput, Describer, Meme, MemeBuilder};
use memer::constants::{DEFAULT_HEIGHT, DEFAULT_WIDTH};
use serde_json::{self, Value as Json};

pub use self::captioner::{Captioner, RenderError};
use self::upload::{read_form, RenderForm, UploadError};
use self::util::{error_response, json_response, response};


/// How the rendered meme should be sent back.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum RenderFormat {
    /// PNG image.
    Png,
    /// JSON with the PNG as a data: URL.
    DataUrl,
}


/// Handle the meme rendering HTTP request.
pub async fn render(captioner: &Captioner, request: Request<Body>,
                    format: RenderFormat) -> Response<Body> {
    let form = match read_form(request).await {
        Ok(form) => form,
        Err(e @ UploadError::TooLarge) | Err(e @ UploadError::FormTooLarge(_)) => {
            warn!("Rejecting render request: {}", e);
            return error_response(StatusCode::PAYLOAD_TOO_LARGE, e);
        }
        Err(e) => {
            error!("Failed to decode render request: {}", e);
            return error_response(StatusCode::BAD_REQUEST, e);
        }
    };

    let meme = match meme_from_form(form) {
        Ok(meme) => meme,
        Err(response) => return response,
    };
    debug!("Decoded {:?}", meme);

    match captioner.render(meme).await {
        Ok(output) => match format {
            RenderFormat::Png => png_response(output),
            RenderFormat::DataUrl => json_response(json!({"dataUrl": output.to_data_url()})),
        },
        Err(e) => error_response(status_code_for(&e), "failed to render the meme"),
    }
}

/// Validate the form fields and create a `Meme` out of them,
/// or an error response with all the problems found.
fn meme_from_form(form: RenderForm) -> Result<Meme, Response<Body>> {
    let top = form.top.as_ref().map(|t| t.trim()).unwrap_or("");
    let bottom = form.bottom.as_ref().map(|t| t.trim()).unwrap_or("");
    let width = dimension(form.width.as_ref(), DEFAULT_WIDTH);
    let height = dimension(form.height.as_ref(), DEFAULT_HEIGHT);

    if let Err(errors) = memer::validate(top, bottom, width, height) {
        warn!("Invalid render request: {}", errors);
        let mut response = json_response(json!({"errors": errors.messages()}));
        *response.status_mut() = StatusCode::BAD_REQUEST;
        return Err(response);
    }

    let mut builder = MemeBuilder::new()
        .top_text(top).bottom_text(bottom)
        .width(width.unwrap_or(DEFAULT_WIDTH)).height(height.unwrap_or(DEFAULT_HEIGHT));
    if let Some(bg) = form.background {
        builder = builder.background(bg);
    }
    builder.build().map_err(|e| {
        error!("Failed to build meme from valid form: {}", e);
        error_response(StatusCode::BAD_REQUEST, e)
    })
}

/// Parse the dimension from a form field, if it's present and non-empty.
fn dimension(field: Option<&String>, default: u32) -> Option<u32> {
    match field.map(|f| f.trim()) {
        None | Some("") => Some(default),
        Some(value) => memer::parse_dimension(value),
    }
}

fn png_response(output: CaptionOutput) -> Response<Body> {
    let mime_type = output.mime_type();
    let mut response = response(&mime_type, output.into_bytes());
    response.headers_mut().insert(
        CONTENT_DISPOSITION, HeaderValue::from_static("inline; filename=\"meme.png\""));
    response
}

/// Determine the HTTP response code that best corresponds to a rendering error.
fn status_code_for(e: &RenderError) -> StatusCode {
    match *e {
        RenderError::Caption(..) => StatusCode::INTERNAL_SERVER_ERROR,
        RenderError::Timeout(..) => StatusCode::INTERNAL_SERVER_ERROR,
        RenderError::Unavailable(..) => StatusCode::SERVICE_UNAVAILABLE,
    }
}


/// Handle the request to turn a meme description into a render spec.
pub async fn generate(describer: &Describer, request: Request<Body>)
    -> Result<Response<Body>, hyper::Error>
{
    let body = hyper::body::to_bytes(request.into_body()).await?;
    trace!("Generate request body: {}", String::from_utf8_lossy(&body));

    let json: Json = if body.iter().all(u8::is_ascii_whitespace) {
        Json::Null
    } else {
        match serde_json::from_slice(&body) {
            Ok(json) => json,
            Err(e) => {
                error!("Failed to decode generate request: {}", e);
                return Ok(error_response(
                    StatusCode::BAD_REQUEST, format!("cannot decode request: {}", e)));
            }
        }
    };
    let description = match json.get("description") {
        None | Some(&Json::Null) => String::new(),
        Some(&Json::String(ref s)) => s.trim().to_owned(),
        Some(other) => other.to_string().trim().to_owned(),
    };
    if description.is_empty() {
        return Ok(error_response(StatusCode::BAD_REQUEST, "description required"));
    }

    let described = describer.describe(&description).await;
    info!("Described meme via {}: {:?}", described.source, described.spec);
    Ok(json_response(json!(described)))
}


/// Query string of the /sarcasm request.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct SarcasmQuery {
    text: String,
}

/// Handle the request to score text for sarcasm.
pub fn sarcasm(request: &Request<Body>) -> Response<Body> {
    let query = match request.uri().query() {
        Some(q) => { trace!("Sarcasm request query string: {}", q); q }
        None => { trace!("No query string found in sarcasm request"); "" }
    };
    let text = match serde_qs::from_str::<SarcasmQuery>(query) {
        Ok(q) => q.text,
        Err(e) => {
            warn!("Failed to decode sarcasm query string: {}", e);
            String::new()
        }
    };
    if text.is_empty() {
        return error_response(StatusCode::BAD_REQUEST, "text parameter required");
    }
    json_response(json!(memer::score_sarcasm(&text)))
}


#[cfg(test)]
mod tests {
    use super::dimension;

    #[test]
    fn dimension_defaults() {
        assert_eq!(Some(1200), dimension(None, 1200));
        assert_eq!(Some(1200), dimension(Some(&"".to_owned()), 1200));
        assert_eq!(Some(1200), dimension(Some(&"  ".to_owned()), 1200));
        assert_eq!(Some(900), dimension(Some(&"900".to_owned()), 1200));
        assert_eq!(Some(900), dimension(Some(&"900px".to_owned()), 1200));
        assert_eq!(None, dimension(Some(&"wide".to_owned()), 1200));
        assert_eq!(None, dimension(Some(&"-900".to_owned()), 1200));
    }
}
