//! AKSK HTTP service implementing the hyper `Service` trait.

use std::convert::Infallible;
use std::fmt;
use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;

use aksk_auth::{AuthError, Verifier};
use bytes::Bytes;
use http_body_util::{BodyExt, Full};

use crate::body::{BoxError, RequestBody};
use crate::dispatch::{AkskHandler, dispatch_request};
use crate::response::{DefaultErrorHandler, ErrorHandler};

/// Header carrying the per-request id on every response.
pub const REQUEST_ID_HEADER: &str = "x-request-id";

/// Configuration for the AKSK HTTP service.
///
/// Whether the body digest is checked is a property of the [`Verifier`],
/// see [`Verifier::with_skip_body`].
#[derive(Clone)]
pub struct AkskHttpConfig {
    /// Builds the response for rejected requests.
    pub error_handler: Arc<dyn ErrorHandler>,
}

impl fmt::Debug for AkskHttpConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AkskHttpConfig")
            .field("error_handler", &"...")
            .finish()
    }
}

impl Default for AkskHttpConfig {
    fn default() -> Self {
        Self {
            error_handler: Arc::new(DefaultErrorHandler),
        }
    }
}

/// Hyper `Service` that authenticates requests before handing them on.
///
/// Wraps an [`AkskHandler`]. Rejected requests never reach the handler; they
/// are answered by the configured [`ErrorHandler`] instead.
#[derive(Debug)]
pub struct AkskHttpService<H: AkskHandler> {
    handler: Arc<H>,
    verifier: Arc<Verifier>,
    config: Arc<AkskHttpConfig>,
}

impl<H: AkskHandler> AkskHttpService<H> {
    /// Create a new `AkskHttpService`.
    pub fn new(handler: Arc<H>, verifier: Verifier, config: AkskHttpConfig) -> Self {
        Self {
            handler,
            verifier: Arc::new(verifier),
            config: Arc::new(config),
        }
    }
}

impl<H: AkskHandler> Clone for AkskHttpService<H> {
    fn clone(&self) -> Self {
        Self {
            handler: Arc::clone(&self.handler),
            verifier: Arc::clone(&self.verifier),
            config: Arc::clone(&self.config),
        }
    }
}

impl<H, B> hyper::service::Service<http::Request<B>> for AkskHttpService<H>
where
    H: AkskHandler,
    B: http_body::Body + Send + 'static,
    B::Data: Send,
    B::Error: Into<BoxError>,
{
    type Response = http::Response<Full<Bytes>>;
    type Error = Infallible;
    type Future = Pin<Box<dyn Future<Output = Result<Self::Response, Self::Error>> + Send>>;

    fn call(&self, req: http::Request<B>) -> Self::Future {
        let handler = Arc::clone(&self.handler);
        let verifier = Arc::clone(&self.verifier);
        let config = Arc::clone(&self.config);
        let request_id = uuid::Uuid::new_v4().to_string();

        Box::pin(async move {
            let response = process_request(req, handler.as_ref(), &verifier, &config).await;
            Ok(add_request_id(response, &request_id))
        })
    }
}

/// Authenticate a single request and dispatch it if accepted.
async fn process_request<H, B>(
    req: http::Request<B>,
    handler: &H,
    verifier: &Verifier,
    config: &AkskHttpConfig,
) -> http::Response<Full<Bytes>>
where
    H: AkskHandler,
    B: http_body::Body + Send + 'static,
    B::Data: Send,
    B::Error: Into<BoxError>,
{
    let (parts, incoming) = req.into_parts();

    // 1. Check the signed headers before reading anything from the body.
    let auth = match verifier.verify_headers(&parts.headers) {
        Ok(auth) => auth,
        Err(err) => return config.error_handler.handle_error(&err),
    };

    // 2. Read and check the body, or pass the stream on untouched.
    let body = if verifier.skips_body() {
        RequestBody::streaming(incoming)
    } else {
        let body = match collect_body(incoming).await {
            Ok(body) => body,
            Err(err) => {
                verifier.report(&err);
                return config.error_handler.handle_error(&err);
            }
        };
        if let Err(err) = verifier.verify_body(&parts.headers, &body) {
            return config.error_handler.handle_error(&err);
        }
        RequestBody::buffered(body)
    };

    let req = http::Request::from_parts(parts, body);
    dispatch_request(handler, req, auth).await
}

/// Collect the incoming body into a single `Bytes` buffer.
async fn collect_body<B>(incoming: B) -> Result<Bytes, AuthError>
where
    B: http_body::Body,
    B::Error: Into<BoxError>,
{
    incoming
        .collect()
        .await
        .map(http_body_util::Collected::to_bytes)
        .map_err(|e| AuthError::BodyRead(e.into().to_string()))
}

/// Tag the response with the request id unless the handler already did.
fn add_request_id(
    mut response: http::Response<Full<Bytes>>,
    request_id: &str,
) -> http::Response<Full<Bytes>> {
    if let Ok(hv) = http::HeaderValue::from_str(request_id) {
        response.headers_mut().entry(REQUEST_ID_HEADER).or_insert(hv);
    }
    response
}
