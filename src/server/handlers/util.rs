//! Utilities for request handlers.

use hyper::{Body, Response, StatusCode};
use hyper::header::{HeaderValue, CONTENT_LENGTH, CONTENT_TYPE};
use mime::{self, Mime};
use serde_json::Value as Json;


/// Create a response with given body and content type.
pub fn response<B: Into<Vec<u8>>>(mime_type: &Mime, body: B) -> Response<Body> {
    let body = body.into();
    let mut response = Response::new(Body::empty());
    response.headers_mut().insert(CONTENT_TYPE, content_type(mime_type));
    response.headers_mut().insert(CONTENT_LENGTH, HeaderValue::from(body.len()));
    *response.body_mut() = Body::from(body);
    response
}

/// Create a plain text response.
#[inline]
pub fn text_response<T: Into<String>>(text: T) -> Response<Body> {
    response(&mime::TEXT_PLAIN_UTF_8, text.into())
}

/// Create a JSON response.
#[inline]
pub fn json_response(json: Json) -> Response<Body> {
    response(&mime::APPLICATION_JSON, json.to_string())
}

/// Create an erroneous JSON response.
pub fn error_response<T: ToString>(status_code: StatusCode, message: T) -> Response<Body> {
    let mut response = json_response(json!({"error": message.to_string()}));
    *response.status_mut() = status_code;
    response
}

/// Create an empty response with given status.
pub fn empty_response(status_code: StatusCode) -> Response<Body> {
    let mut response = response(&mime::TEXT_PLAIN, "");
    *response.status_mut() = status_code;
    response
}

/// Value of the Content-Type header for given MIME type.
pub fn content_type(mime_type: &Mime) -> HeaderValue {
    HeaderValue::from_str(mime_type.as_ref())
        .unwrap_or_else(|_| HeaderValue::from_static("application/octet-stream"))
}


#[cfg(test)]
mod tests {
    use hyper::StatusCode;
    use hyper::header::{CONTENT_LENGTH, CONTENT_TYPE};
    use super::{error_response, json_response};

    #[test]
    fn json_headers() {
        let response = json_response(json!({"a": 1}));
        assert_eq!(StatusCode::OK, response.status());
        assert_eq!("application/json", response.headers()[CONTENT_TYPE]);
        assert_eq!("7", response.headers()[CONTENT_LENGTH]);
    }

    #[test]
    fn error_status() {
        let response = error_response(StatusCode::BAD_REQUEST, "oops");
        assert_eq!(StatusCode::BAD_REQUEST, response.status());
        assert_eq!("application/json", response.headers()[CONTENT_TYPE]);
    }
}
