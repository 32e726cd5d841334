//! AKSK request verification.
//!
//! Verification runs a fixed sequence of checks and stops at the first
//! failure:
//!
//! 1. The access key must be present.
//! 2. The secret store must return a non-empty secret for it.
//! 3. The timestamp must parse and fall inside the freshness window.
//! 4. The signature must be present.
//! 5. The signature must decode and equal the HMAC over the sorted
//!    `{access_key, timestamp, nonce, body_hash}` (compared in constant time).
//! 6. Unless body checking is skipped, the body must match `x-auth-body-hash`.
//!
//! Every rejection is passed to the configured [`AuthLogger`] before it is
//! returned. The main entry point is [`Verifier::verify`].

use std::fmt;
use std::sync::Arc;

use http::HeaderMap;
use tracing::debug;

use crate::body::check_body;
use crate::config::AuthConfig;
use crate::credentials::SecretStore;
use crate::digest::{DigestEngine, constant_time_eq};
use crate::error::AuthError;
use crate::headers::{
    HEADER_ACCESS_KEY, HEADER_BODY_HASH, HEADER_RANDOM_STR, HEADER_SIGNATURE, HEADER_TIMESTAMP,
    header_str,
};
use crate::logger::AuthLogger;
use crate::timestamp::validate_timestamp;

/// The result of a successful verification.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VerifiedRequest {
    /// The access key that signed the request.
    pub access_key: String,
    /// The signing time in unix seconds.
    pub timestamp: i64,
    /// The request nonce, possibly empty.
    pub nonce: String,
}

/// Verifies AKSK-signed requests.
///
/// Building a verifier freezes the [`AuthConfig`] it was built from.
#[derive(Clone)]
pub struct Verifier {
    engine: DigestEngine,
    logger: Arc<dyn AuthLogger>,
    store: Arc<dyn SecretStore>,
    skip_body: bool,
}

impl Verifier {
    /// Create a verifier resolving secrets through `store`.
    pub fn new(config: &AuthConfig, store: Arc<dyn SecretStore>) -> Self {
        let (engine, logger) = config.freeze_and_snapshot();
        logger.log_event("aksk verification enabled");
        Self {
            engine,
            logger,
            store,
            skip_body: false,
        }
    }

    /// Skip the body digest check (step 6).
    #[must_use]
    pub fn with_skip_body(mut self, skip_body: bool) -> Self {
        self.skip_body = skip_body;
        self
    }

    /// Whether the body digest check is skipped.
    #[must_use]
    pub fn skips_body(&self) -> bool {
        self.skip_body
    }

    /// The digest engine snapshot in use.
    #[must_use]
    pub fn engine(&self) -> &DigestEngine {
        &self.engine
    }

    /// Verify a request from its headers and fully-read body.
    pub fn verify(&self, headers: &HeaderMap, body: &[u8]) -> Result<VerifiedRequest, AuthError> {
        self.check(headers, if self.skip_body { None } else { Some(body) })
            .inspect_err(|err| self.report(err))
    }

    /// Verify only the signed headers, never the body.
    pub fn verify_headers(&self, headers: &HeaderMap) -> Result<VerifiedRequest, AuthError> {
        self.check(headers, None).inspect_err(|err| self.report(err))
    }

    /// Check a fully-read body against the `x-auth-body-hash` header.
    ///
    /// Meant to run after [`Verifier::verify_headers`] succeeded, so the body
    /// is only read once the signature is known to be good. Always passes when
    /// body checking is skipped.
    pub fn verify_body(&self, headers: &HeaderMap, body: &[u8]) -> Result<(), AuthError> {
        if self.skip_body {
            return Ok(());
        }
        check_body(&self.engine, body, &header_str(headers, HEADER_BODY_HASH))
            .inspect_err(|err| self.report(err))
    }

    /// Report a failure that happened outside [`Verifier::verify`], such as
    /// the body stream failing, through the same logger.
    pub fn report(&self, err: &AuthError) {
        self.logger.log_rejection(err);
    }

    fn check(&self, headers: &HeaderMap, body: Option<&[u8]>) -> Result<VerifiedRequest, AuthError> {
        let access_key = header_str(headers, HEADER_ACCESS_KEY);
        if access_key.is_empty() {
            return Err(AuthError::AccessKeyEmpty);
        }

        let secret_key = self
            .store
            .secret_key(&access_key)
            .filter(|sk| !sk.is_empty())
            .ok_or(AuthError::SecretNotFound)?;

        let raw_timestamp = header_str(headers, HEADER_TIMESTAMP);
        let timestamp = validate_timestamp(&raw_timestamp)?;

        let signature = header_str(headers, HEADER_SIGNATURE);
        if signature.is_empty() {
            return Err(AuthError::SignatureEmpty);
        }

        let nonce = header_str(headers, HEADER_RANDOM_STR);
        let body_hash = header_str(headers, HEADER_BODY_HASH);

        debug!(access_key = %access_key, timestamp, "verifying aksk signature");

        let claimed = self.engine.decode(&signature).map_err(|e| {
            debug!(error = %e, "signature decode failed");
            AuthError::SignatureDecode
        })?;
        let expected = self.engine.mac(
            secret_key.as_bytes(),
            &[
                access_key.as_ref(),
                raw_timestamp.as_ref(),
                nonce.as_ref(),
                body_hash.as_ref(),
            ],
        );
        if !constant_time_eq(&claimed, &expected) {
            return Err(AuthError::SignatureMismatch);
        }

        if let Some(body) = body {
            check_body(&self.engine, body, &body_hash)?;
        }

        debug!(access_key = %access_key, "aksk signature verification succeeded");
        Ok(VerifiedRequest {
            access_key: access_key.into_owned(),
            timestamp,
            nonce: nonce.into_owned(),
        })
    }
}

impl fmt::Debug for Verifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Verifier")
            .field("engine", &self.engine)
            .field("skip_body", &self.skip_body)
            .finish_non_exhaustive()
    }
}
