//! Hyper service layer for AKSK request authentication.
//!
//! This crate adapts [`aksk_auth::Verifier`] to hyper, providing:
//!
//! - **Service**: a hyper `Service` that checks the signed headers, then reads
//!   and checks the body unless the verifier skips it, and only then calls
//!   the handler
//! - **Request body**: buffered after a body check, the untouched stream
//!   otherwise
//! - **Handler trait**: the boundary between authentication and business logic
//! - **Response helpers**: the default `401` JSON rejection and the
//!   pluggable [`ErrorHandler`]

pub mod body;
pub mod dispatch;
pub mod response;
pub mod service;

pub use body::{BoxError, RequestBody};
pub use dispatch::AkskHandler;
pub use response::{
    DefaultErrorHandler, ErrorHandler, ErrorResponse, json_response, message_response,
};
pub use service::{AkskHttpConfig, AkskHttpService};
