//! Module with the service that implements ALL the functionality.

use std::net::SocketAddr;
use std::sync::Arc;
use std::task::{Context, Poll};

use futures::future::{BoxFuture, FutureExt};
use hyper::{self, Body, Method, Request, Response, StatusCode};
use hyper::header::{HeaderValue, CACHE_CONTROL, CONTENT_LENGTH, CONTENT_TYPE};
use hyper::service::Service;
use memer::Describer;
use time::precise_time_s;

use crate::handlers::{self, Captioner, RenderFormat};
use crate::handlers::list::list_templates;
use crate::handlers::util::{empty_response, json_response, response, text_response};


/// Response to the health check.
const HEALTH_TEXT: &str = "memerd renderer OK";
/// HTML page with the meme form.
const FORM_HTML: &str = include_str!("form.html");


/// Shared state of the service.
#[derive(Debug)]
struct Inner {
    captioner: Captioner,
    describer: Describer,
}

/// The HTTP service, one per client connection.
#[derive(Clone, Debug)]
pub struct Memer {
    inner: Arc<Inner>,
    remote_addr: Option<SocketAddr>,
}

impl Memer {
    pub fn new(captioner: Captioner, describer: Describer) -> Self {
        Memer{inner: Arc::new(Inner{captioner, describer}), remote_addr: None}
    }

    /// Create a copy of the service for a connection from given address.
    #[inline]
    pub fn for_connection(&self, remote_addr: SocketAddr) -> Self {
        Memer{inner: self.inner.clone(), remote_addr: Some(remote_addr)}
    }
}

impl Service<Request<Body>> for Memer {
    type Response = Response<Body>;
    type Error = hyper::Error;
    type Future = BoxFuture<'static, Result<Self::Response, Self::Error>>;

    fn poll_ready(&mut self, _: &mut Context<'_>) -> Poll<Result<(), Self::Error>> {
        Poll::Ready(Ok(()))
    }

    fn call(&mut self, req: Request<Body>) -> Self::Future {
        self.log(&req);

        let this = self.clone();
        let start = precise_time_s();
        async move {
            let mut resp = this.handle(req).await?;
            Self::fix_headers(&mut resp);

            let finish = precise_time_s();
            debug!("HTTP {status}, produced {len} bytes of {ctype} in {time:.3} secs",
                status = resp.status(),
                len = resp.headers().get(CONTENT_LENGTH)
                    .and_then(|l| l.to_str().ok())
                    .unwrap_or("unknown number of"),
                ctype = resp.headers().get(CONTENT_TYPE)
                    .and_then(|ct| ct.to_str().ok())
                    .unwrap_or("?"),
                time = finish - start);
            Ok(resp)
        }.boxed()
    }
}

impl Memer {
    async fn handle(&self, req: Request<Body>) -> Result<Response<Body>, hyper::Error> {
        match (req.method(), req.uri().path()) {
            (&Method::GET, "/") => Ok(text_response(HEALTH_TEXT)),
            (&Method::GET, "/form") => Ok(response(&mime::TEXT_HTML_UTF_8, FORM_HTML)),
            (&Method::GET, "/templates") => Ok(self.handle_list_templates()),
            (&Method::GET, "/sarcasm") => Ok(handlers::sarcasm(&req)),
            (&Method::POST, "/render") =>
                Ok(handlers::render(&self.inner.captioner, req, RenderFormat::Png).await),
            (&Method::POST, "/render-dataurl") =>
                Ok(handlers::render(&self.inner.captioner, req, RenderFormat::DataUrl).await),
            (&Method::POST, "/generate") =>
                handlers::generate(&self.inner.describer, req).await,
            _ => Ok(self.handle_404(&req)),
        }
    }

    fn handle_404(&self, req: &Request<Body>) -> Response<Body> {
        debug!("Path {} doesn't match any endpoint", req.uri().path());
        empty_response(StatusCode::NOT_FOUND)
    }

    /// Handle the template listing request.
    fn handle_list_templates(&self) -> Response<Body> {
        json_response(list_templates())
    }
}

impl Memer {
    #[inline]
    fn log(&self, req: &Request<Body>) {
        info!("{} {} {}{} {:?}",
            self.remote_addr.map(|a| format!("{}", a.ip())).unwrap_or_else(|| "-".to_owned()),
            req.method(),
            req.uri().path(),
            req.uri().query().map(|q| format!("?{}", q)).unwrap_or_else(String::new),
            req.version());
    }

    /// Fix headers in the response, providing default values where necessary.
    fn fix_headers(resp: &mut Response<Body>) {
        if !resp.headers().contains_key(CONTENT_TYPE) {
            resp.headers_mut().insert(
                CONTENT_TYPE, HeaderValue::from_static("application/octet-stream"));
        }
        if !resp.headers().contains_key(CACHE_CONTROL) {
            resp.headers_mut().insert(CACHE_CONTROL, HeaderValue::from_static("no-store"));
        }
    }
}
