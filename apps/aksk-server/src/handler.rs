//! Echo handler served behind AKSK authentication.

use std::future::Future;
use std::pin::Pin;

use aksk_auth::VerifiedRequest;
use aksk_http::{AkskHandler, RequestBody, json_response, message_response};
use bytes::Bytes;
use http_body_util::Full;
use tracing::warn;

/// Replies with what the server learned about an authenticated request.
#[derive(Debug, Clone, Copy, Default)]
pub struct EchoHandler;

impl AkskHandler for EchoHandler {
    fn handle(
        &self,
        req: http::Request<RequestBody>,
        auth: VerifiedRequest,
    ) -> Pin<Box<dyn Future<Output = http::Response<Full<Bytes>>> + Send>> {
        Box::pin(async move {
            let (parts, body) = req.into_parts();
            let body = match body.into_bytes().await {
                Ok(body) => body,
                Err(e) => {
                    warn!(error = %e, "failed to read request body");
                    return message_response(
                        http::StatusCode::BAD_REQUEST,
                        "request body could not be read",
                    );
                }
            };

            let json = serde_json::to_vec(&serde_json::json!({
                "accessKey": auth.access_key,
                "timestamp": auth.timestamp,
                "method": parts.method.as_str(),
                "path": parts.uri.path(),
                "bodyLength": body.len(),
            }))
            .expect("JSON serialization of echo cannot fail");
            json_response(json)
        })
    }
}
