//! Module for decoding the form data of /render requests.

use std::fmt;

use hyper::{Body, Request};
use hyper::body::HttpBody;
use hyper::header::{CONTENT_LENGTH, CONTENT_TYPE};
use memer::constants::MAX_BACKGROUND_SIZE;
use mime::{self, Mime};
use multer::{Constraints, Multipart, SizeLimit};
use thiserror::Error;


/// Name of the form field with the background image.
pub const BACKGROUND_FIELD: &str = "bg";
/// Names of the form fields holding text.
const TEXT_FIELDS: &[&str] = &["top", "bottom", "width", "height"];

/// Maximum size of a single text field of a multipart form.
pub const MAX_FIELD_SIZE: usize = 16 * 1024;
/// Maximum size of a whole multipart form.
pub const MAX_MULTIPART_SIZE: usize = MAX_BACKGROUND_SIZE + 64 * 1024;
/// Maximum size of an urlencoded form.
pub const MAX_URLENCODED_SIZE: usize = 64 * 1024;


/// Raw fields of the rendering form, before validation.
#[derive(Clone, Default, Deserialize, PartialEq)]
#[serde(default)]
pub struct RenderForm {
    pub top: Option<String>,
    pub bottom: Option<String>,
    pub width: Option<String>,
    pub height: Option<String>,
    #[serde(skip)]
    pub background: Option<Vec<u8>>,
}

impl fmt::Debug for RenderForm {
    fn fmt(&self, fmt: &mut fmt::Formatter) -> fmt::Result {
        fmt.debug_struct("RenderForm")
            .field("top", &self.top)
            .field("bottom", &self.bottom)
            .field("width", &self.width)
            .field("height", &self.height)
            .field("background", &self.background.as_ref().map(|bg| format!("<{} bytes>", bg.len())))
            .finish()
    }
}


/// Read the rendering form from the request body,
/// either `multipart/form-data` or `application/x-www-form-urlencoded`.
pub async fn read_form(request: Request<Body>) -> Result<RenderForm, UploadError> {
    let content_type = request.headers().get(CONTENT_TYPE)
        .and_then(|ct| ct.to_str().ok())
        .unwrap_or("")
        .to_owned();
    let mime_type: Mime = content_type.parse()
        .map_err(|_| UploadError::ContentType(content_type.clone()))?;

    if mime_type.type_() == mime::MULTIPART && mime_type.subtype() == mime::FORM_DATA {
        let boundary = multer::parse_boundary(&content_type)?;
        read_multipart(request.into_body(), boundary).await
    } else if mime_type.type_() == mime::APPLICATION
            && mime_type.subtype() == mime::WWW_FORM_URLENCODED {
        let body = read_limited(request, MAX_URLENCODED_SIZE).await?;
        debug!("Decoding render form from {} bytes of urlencoded body", body.len());
        Ok(serde_qs::from_bytes(&body)?)
    } else {
        Err(UploadError::ContentType(content_type))
    }
}

/// Read the whole request body, failing once it gets over `limit` bytes.
async fn read_limited(request: Request<Body>, limit: usize) -> Result<Vec<u8>, UploadError> {
    let declared = request.headers().get(CONTENT_LENGTH)
        .and_then(|cl| cl.to_str().ok())
        .and_then(|cl| cl.parse::<u64>().ok());
    if let Some(length) = declared {
        if length > limit as u64 {
            return Err(UploadError::FormTooLarge(limit));
        }
    }

    let mut body = request.into_body();
    let mut bytes = Vec::with_capacity(declared.unwrap_or(0) as usize);
    while let Some(chunk) = body.data().await {
        let chunk = chunk?;
        if bytes.len() + chunk.len() > limit {
            return Err(UploadError::FormTooLarge(limit));
        }
        bytes.extend_from_slice(&chunk);
    }
    Ok(bytes)
}

async fn read_multipart(body: Body, boundary: String) -> Result<RenderForm, UploadError> {
    let mut size_limit = SizeLimit::new()
        .whole_stream(MAX_MULTIPART_SIZE as u64)
        .for_field(BACKGROUND_FIELD, MAX_BACKGROUND_SIZE as u64);
    for &name in TEXT_FIELDS {
        size_limit = size_limit.for_field(name, MAX_FIELD_SIZE as u64);
    }
    let constraints = Constraints::new().size_limit(size_limit);
    let mut multipart = Multipart::with_constraints(body, boundary, constraints);

    let mut form = RenderForm::default();
    while let Some(field) = multipart.next_field().await? {
        let name = field.name().unwrap_or("").to_owned();
        match name.as_str() {
            BACKGROUND_FIELD => {
                let bytes = field.bytes().await?;
                trace!("Received {} bytes of background image", bytes.len());
                form.background = if bytes.is_empty() { None } else { Some(bytes.to_vec()) };
            }
            "top" => form.top = Some(field.text().await?),
            "bottom" => form.bottom = Some(field.text().await?),
            "width" => form.width = Some(field.text().await?),
            "height" => form.height = Some(field.text().await?),
            _ => trace!("Ignoring unknown form field `{}`", name),
        }
    }
    debug!("Decoded multipart {:?}", form);
    Ok(form)
}


/// Error while reading the form data.
#[derive(Debug, Error)]
pub enum UploadError {
    /// The background image is larger than allowed.
    #[error("File exceeds {} MB limit", MAX_BACKGROUND_SIZE / 1024 / 1024)]
    TooLarge,
    /// The form as a whole, or one of its text fields, is larger than allowed.
    #[error("Form data exceeds {} KB limit", .0 / 1024)]
    FormTooLarge(usize),
    /// Request body isn't a form.
    #[error("unsupported content type `{0}`")]
    ContentType(String),
    /// Malformed multipart body.
    #[error("cannot decode form: {0}")]
    Multipart(#[source] multer::Error),
    /// Malformed urlencoded body.
    #[error("cannot decode form: {0}")]
    Urlencoded(#[from] serde_qs::Error),
    /// Error while reading the body.
    #[error("cannot read request body: {0}")]
    Body(#[from] hyper::Error),
}

impl From<multer::Error> for UploadError {
    fn from(e: multer::Error) -> Self {
        match e {
            multer::Error::FieldSizeExceeded{field_name: Some(ref name), ..}
                if name == BACKGROUND_FIELD => UploadError::TooLarge,
            multer::Error::FieldSizeExceeded{limit, ..} =>
                UploadError::FormTooLarge(limit as usize),
            multer::Error::StreamSizeExceeded{limit} =>
                UploadError::FormTooLarge(limit as usize),
            e => UploadError::Multipart(e),
        }
    }
}


#[cfg(test)]
mod tests {
    use hyper::{Body, Request};
    use spectral::prelude::*;
    use super::{read_form, UploadError, MAX_FIELD_SIZE, MAX_URLENCODED_SIZE};

    const BOUNDARY: &str = "X-MEMER-BOUNDARY";

    fn multipart(fields: &[(&str, &str)], background: Option<&[u8]>) -> Request<Body> {
        let mut body = vec![];
        for &(name, value) in fields {
            body.extend(format!("--{}\r\n", BOUNDARY).into_bytes());
            body.extend(format!("Content-Disposition: form-data; name=\"{}\"\r\n\r\n", name)
                .into_bytes());
            body.extend(value.as_bytes());
            body.extend(&b"\r\n"[..]);
        }
        if let Some(bytes) = background {
            body.extend(format!("--{}\r\n", BOUNDARY).into_bytes());
            body.extend(&b"Content-Disposition: form-data; name=\"bg\"; filename=\"bg.png\"\r\n"[..]);
            body.extend(&b"Content-Type: image/png\r\n\r\n"[..]);
            body.extend(bytes);
            body.extend(&b"\r\n"[..]);
        }
        body.extend(format!("--{}--\r\n", BOUNDARY).into_bytes());

        Request::post("/render")
            .header("Content-Type", format!("multipart/form-data; boundary={}", BOUNDARY))
            .body(Body::from(body))
            .unwrap()
    }

    #[tokio::test]
    async fn multipart_fields() {
        let request = multipart(
            &[("top", "Hello"), ("bottom", "World"), ("width", "1600"), ("extra", "ignored")],
            Some(&b"not really a PNG"[..]));
        let form = read_form(request).await.unwrap();
        assert_eq!(Some("Hello".to_owned()), form.top);
        assert_eq!(Some("World".to_owned()), form.bottom);
        assert_eq!(Some("1600".to_owned()), form.width);
        assert_eq!(None, form.height);
        assert_eq!(Some(b"not really a PNG".to_vec()), form.background);
    }

    #[tokio::test]
    async fn empty_background_ignored() {
        let form = read_form(multipart(&[("top", "Hi")], Some(&b""[..]))).await.unwrap();
        assert_eq!(Some("Hi".to_owned()), form.top);
        assert_eq!(None, form.background);
    }

    #[tokio::test]
    async fn background_too_large() {
        let big = vec![0u8; 5 * 1024 * 1024 + 1];
        let result = read_form(multipart(&[("top", "Hi")], Some(&big[..]))).await;
        match result {
            Err(UploadError::TooLarge) => {},
            other => panic!("expected TooLarge, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn text_field_too_large() {
        let top = "A".repeat(MAX_FIELD_SIZE + 1);
        let result = read_form(multipart(&[("top", &top), ("bottom", "Hi")], None)).await;
        match result {
            Err(UploadError::FormTooLarge(limit)) => assert_eq!(MAX_FIELD_SIZE, limit),
            other => panic!("expected FormTooLarge, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn multipart_stream_too_large() {
        let junk = "x".repeat(1024 * 1024);
        let unknown: Vec<_> = (0..6).map(|i| format!("junk{}", i)).collect();
        let fields: Vec<_> = unknown.iter().map(|name| (name.as_str(), junk.as_str())).collect();
        let result = read_form(multipart(&fields, None)).await;
        match result {
            Err(UploadError::FormTooLarge(_)) => {},
            other => panic!("expected FormTooLarge, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn urlencoded_too_large() {
        let body = format!("top={}", "A".repeat(MAX_URLENCODED_SIZE));

        // Declared upfront.
        let request = Request::post("/render")
            .header("Content-Type", "application/x-www-form-urlencoded")
            .header("Content-Length", body.len())
            .body(Body::from(body.clone()))
            .unwrap();
        match read_form(request).await {
            Err(UploadError::FormTooLarge(limit)) => assert_eq!(MAX_URLENCODED_SIZE, limit),
            other => panic!("expected FormTooLarge, got {:?}", other),
        }

        // Streamed without a length.
        let chunks: Vec<Result<_, ::std::io::Error>> = body.into_bytes()
            .chunks(4096).map(|c| Ok(c.to_vec())).collect();
        let request = Request::post("/render")
            .header("Content-Type", "application/x-www-form-urlencoded")
            .body(Body::wrap_stream(futures::stream::iter(chunks)))
            .unwrap();
        match read_form(request).await {
            Err(UploadError::FormTooLarge(_)) => {},
            other => panic!("expected FormTooLarge, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn urlencoded() {
        let fields = btreemap!{
            "top" => "Hello there",
            "bottom" => "General Kenobi",
            "height" => "900",
        };
        let request = Request::post("/render")
            .header("Content-Type", "application/x-www-form-urlencoded")
            .body(Body::from(serde_qs::to_string(&fields).unwrap()))
            .unwrap();
        let form = read_form(request).await.unwrap();
        assert_eq!(Some("Hello there".to_owned()), form.top);
        assert_eq!(Some("General Kenobi".to_owned()), form.bottom);
        assert_eq!(Some("900".to_owned()), form.height);
        assert_eq!(None, form.background);
    }

    #[tokio::test]
    async fn unsupported_content_type() {
        let request = Request::post("/render")
            .header("Content-Type", "application/json")
            .body(Body::from("{}"))
            .unwrap();
        assert_that!(read_form(request).await).is_err();

        let request = Request::post("/render").body(Body::empty()).unwrap();
        assert_that!(read_form(request).await).is_err();
    }
}
