//! Diagnostic sink for authentication events.

use tracing::{info, warn};

use crate::error::AuthError;

/// Fire-and-forget sink for authentication diagnostics.
///
/// The default methods discard everything.
pub trait AuthLogger: Send + Sync {
    /// Called once for every rejected request, before the error response is
    /// produced.
    fn log_rejection(&self, error: &AuthError) {
        let _ = error;
    }

    /// Called for lifecycle events such as a verifier being enabled.
    fn log_event(&self, message: &str) {
        let _ = message;
    }
}

/// Logger that discards everything. This is the default.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopLogger;

impl AuthLogger for NoopLogger {}

/// Logger that forwards to `tracing`.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingLogger;

impl AuthLogger for TracingLogger {
    fn log_rejection(&self, error: &AuthError) {
        warn!(kind = %error.kind(), error = %error, "request authentication failed");
    }

    fn log_event(&self, message: &str) {
        info!("{message}");
    }
}
