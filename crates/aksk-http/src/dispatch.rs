//! Handler trait for authenticated requests.

use std::future::Future;
use std::pin::Pin;

use aksk_auth::VerifiedRequest;
use bytes::Bytes;
use http_body_util::Full;

use crate::body::RequestBody;

/// Trait that the downstream business logic must implement.
///
/// The handler only ever sees requests that passed verification. The body is
/// buffered when its digest was checked and the unread stream otherwise.
pub trait AkskHandler: Send + Sync + 'static {
    /// Handle an authenticated request and produce an HTTP response.
    fn handle(
        &self,
        req: http::Request<RequestBody>,
        auth: VerifiedRequest,
    ) -> Pin<Box<dyn Future<Output = http::Response<Full<Bytes>>> + Send>>;
}

/// Dispatch an authenticated request to the handler.
pub async fn dispatch_request<H: AkskHandler>(
    handler: &H,
    req: http::Request<RequestBody>,
    auth: VerifiedRequest,
) -> http::Response<Full<Bytes>> {
    tracing::debug!(
        access_key = %auth.access_key,
        method = %req.method(),
        path = req.uri().path(),
        buffered = req.body().is_buffered(),
        "dispatching authenticated request"
    );
    handler.handle(req, auth).await
}
