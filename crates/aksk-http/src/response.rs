//! Rejection responses.
//!
//! By default a rejected request gets `401 Unauthorized` with a JSON body:
//!
//! ```json
//! { "message": "request signature is invalid" }
//! ```
//!
//! Only [`AuthError::public_message`] is ever rendered, never the detailed
//! error. Services that need a different shape install their own
//! [`ErrorHandler`].

use aksk_auth::AuthError;
use bytes::Bytes;
use http_body_util::Full;

/// Content type for JSON responses.
pub const CONTENT_TYPE: &str = "application/json";

/// Serialized body of a default rejection.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct ErrorResponse {
    /// Caller-facing description of the failure.
    pub message: String,
}

impl From<&AuthError> for ErrorResponse {
    fn from(error: &AuthError) -> Self {
        Self {
            message: error.public_message().to_owned(),
        }
    }
}

/// Turns a rejection into the response sent to the caller.
pub trait ErrorHandler: Send + Sync {
    /// Build the response for `error`.
    fn handle_error(&self, error: &AuthError) -> http::Response<Full<Bytes>>;
}

impl<F> ErrorHandler for F
where
    F: Fn(&AuthError) -> http::Response<Full<Bytes>> + Send + Sync,
{
    fn handle_error(&self, error: &AuthError) -> http::Response<Full<Bytes>> {
        self(error)
    }
}

/// Responds `401 Unauthorized` with an [`ErrorResponse`] body.
#[derive(Debug, Clone, Copy, Default)]
pub struct DefaultErrorHandler;

impl ErrorHandler for DefaultErrorHandler {
    fn handle_error(&self, error: &AuthError) -> http::Response<Full<Bytes>> {
        error_to_response(error)
    }
}

/// Serialize an [`AuthError`] into its public JSON body.
#[must_use]
pub fn error_to_json(error: &AuthError) -> Vec<u8> {
    serde_json::to_vec(&ErrorResponse::from(error)).expect("JSON serialization of error cannot fail")
}

/// Convert an [`AuthError`] into the default `401` response.
#[must_use]
pub fn error_to_response(error: &AuthError) -> http::Response<Full<Bytes>> {
    message_response(http::StatusCode::UNAUTHORIZED, error.public_message())
}

/// Build a `{"message": ...}` JSON response with the given status.
#[must_use]
pub fn message_response(status: http::StatusCode, message: &str) -> http::Response<Full<Bytes>> {
    let json = serde_json::to_vec(&ErrorResponse {
        message: message.to_owned(),
    })
    .expect("JSON serialization of error cannot fail");
    http::Response::builder()
        .status(status)
        .header("content-type", CONTENT_TYPE)
        .body(Full::new(Bytes::from(json)))
        .expect("valid error response")
}

/// Build a `200 OK` response from JSON bytes.
#[must_use]
pub fn json_response(json: Vec<u8>) -> http::Response<Full<Bytes>> {
    http::Response::builder()
        .status(http::StatusCode::OK)
        .header("content-type", CONTENT_TYPE)
        .body(Full::new(Bytes::from(json)))
        .expect("valid JSON response")
}
