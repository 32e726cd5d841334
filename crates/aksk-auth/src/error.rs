//! Error types for AKSK signing and verification.
//!
//! Every failure on the verification path is an [`AuthError`] value. The
//! variants are fine grained for logging and tests; [`AuthError::public_message`]
//! collapses them into the coarser categories that are safe to show a caller.
//! Configuration misuse is reported separately through [`ConfigError`].

use std::fmt;
use std::num::ParseIntError;

/// Errors that can occur while signing or verifying a request.
#[derive(Debug, thiserror::Error)]
pub enum AuthError {
    /// The `x-auth-accesskey` value is missing or empty.
    #[error("access key is empty")]
    AccessKeyEmpty,

    /// The signer was given an empty secret key.
    #[error("secret key is empty")]
    SecretKeyEmpty,

    /// The secret store returned nothing usable for the access key.
    #[error("secret key not found for access key")]
    SecretNotFound,

    /// The `x-auth-timestamp` value is missing or empty.
    #[error("timestamp is empty")]
    TimestampEmpty,

    /// The timestamp is not a decimal integer.
    #[error("timestamp is malformed: {0}")]
    TimestampMalformed(#[source] ParseIntError),

    /// The timestamp is older than the accepted window.
    #[error("timestamp has expired")]
    TimestampExpired,

    /// The timestamp is further in the future than the allowed clock skew.
    #[error("timestamp is too far in the future")]
    TimestampFutureSkew,

    /// The `x-auth-signature` value is missing or empty.
    #[error("signature is empty")]
    SignatureEmpty,

    /// The claimed signature could not be decoded.
    #[error("signature could not be decoded")]
    SignatureDecode,

    /// The claimed signature does not match the recomputed one.
    #[error("signature does not match")]
    SignatureMismatch,

    /// The body is non-empty but no body digest was supplied.
    #[error("body digest is missing")]
    BodyDigestMissing,

    /// The claimed body digest could not be decoded.
    #[error("body digest could not be decoded")]
    BodyDigestDecode,

    /// The body digest does not match the received body.
    #[error("body digest does not match")]
    BodyDigestMismatch,

    /// The request body could not be read.
    #[error("failed to read request body: {0}")]
    BodyRead(String),

    /// The system random source failed while generating a nonce.
    #[error("failed to read random source: {0}")]
    RandomSource(String),

    /// The outgoing request could not be built.
    #[error("invalid request: {0}")]
    InvalidRequest(String),
}

/// Stable identifiers for each [`AuthError`] variant.
///
/// These are suitable for structured log fields and metrics labels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    /// `identifier-empty`
    IdentifierEmpty,
    /// `secret-empty`
    SecretEmpty,
    /// `secret-not-found`
    SecretNotFound,
    /// `timestamp-empty`
    TimestampEmpty,
    /// `timestamp-malformed`
    TimestampMalformed,
    /// `timestamp-expired`
    TimestampExpired,
    /// `timestamp-future-skew`
    TimestampFutureSkew,
    /// `signature-empty`
    SignatureEmpty,
    /// `signature-decode-failure`
    SignatureDecodeFailure,
    /// `signature-mismatch`
    SignatureMismatch,
    /// `body-digest-missing`
    BodyDigestMissing,
    /// `body-digest-decode-failure`
    BodyDigestDecodeFailure,
    /// `body-digest-mismatch`
    BodyDigestMismatch,
    /// `body-read-failure`
    BodyReadFailure,
    /// `random-source-failure`
    RandomSourceFailure,
    /// `invalid-request`
    InvalidRequest,
}

impl ErrorKind {
    /// The kebab-case name of this kind.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::IdentifierEmpty => "identifier-empty",
            Self::SecretEmpty => "secret-empty",
            Self::SecretNotFound => "secret-not-found",
            Self::TimestampEmpty => "timestamp-empty",
            Self::TimestampMalformed => "timestamp-malformed",
            Self::TimestampExpired => "timestamp-expired",
            Self::TimestampFutureSkew => "timestamp-future-skew",
            Self::SignatureEmpty => "signature-empty",
            Self::SignatureDecodeFailure => "signature-decode-failure",
            Self::SignatureMismatch => "signature-mismatch",
            Self::BodyDigestMissing => "body-digest-missing",
            Self::BodyDigestDecodeFailure => "body-digest-decode-failure",
            Self::BodyDigestMismatch => "body-digest-mismatch",
            Self::BodyReadFailure => "body-read-failure",
            Self::RandomSourceFailure => "random-source-failure",
            Self::InvalidRequest => "invalid-request",
        }
    }
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl AuthError {
    /// The stable kind of this error.
    #[must_use]
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::AccessKeyEmpty => ErrorKind::IdentifierEmpty,
            Self::SecretKeyEmpty => ErrorKind::SecretEmpty,
            Self::SecretNotFound => ErrorKind::SecretNotFound,
            Self::TimestampEmpty => ErrorKind::TimestampEmpty,
            Self::TimestampMalformed(_) => ErrorKind::TimestampMalformed,
            Self::TimestampExpired => ErrorKind::TimestampExpired,
            Self::TimestampFutureSkew => ErrorKind::TimestampFutureSkew,
            Self::SignatureEmpty => ErrorKind::SignatureEmpty,
            Self::SignatureDecode => ErrorKind::SignatureDecodeFailure,
            Self::SignatureMismatch => ErrorKind::SignatureMismatch,
            Self::BodyDigestMissing => ErrorKind::BodyDigestMissing,
            Self::BodyDigestDecode => ErrorKind::BodyDigestDecodeFailure,
            Self::BodyDigestMismatch => ErrorKind::BodyDigestMismatch,
            Self::BodyRead(_) => ErrorKind::BodyReadFailure,
            Self::RandomSource(_) => ErrorKind::RandomSourceFailure,
            Self::InvalidRequest(_) => ErrorKind::InvalidRequest,
        }
    }

    /// The message that may be returned to the caller.
    ///
    /// Signature decode failures and mismatches share one message, as do all
    /// body digest failures. Unknown access keys and empty secrets are
    /// indistinguishable.
    #[must_use]
    pub fn public_message(&self) -> &'static str {
        match self {
            Self::AccessKeyEmpty => "access key is empty",
            Self::SecretKeyEmpty | Self::SecretNotFound => "access key is invalid",
            Self::TimestampEmpty => "request timestamp is missing",
            Self::TimestampMalformed(_) => "request timestamp is invalid",
            Self::TimestampExpired => "request timestamp has expired",
            Self::TimestampFutureSkew => "request timestamp is too far in the future",
            Self::SignatureEmpty => "request signature is missing",
            Self::SignatureDecode | Self::SignatureMismatch => "request signature is invalid",
            Self::BodyDigestMissing | Self::BodyDigestDecode | Self::BodyDigestMismatch => {
                "request body is invalid"
            }
            Self::BodyRead(_) => "request body could not be read",
            Self::RandomSource(_) | Self::InvalidRequest(_) => "request could not be signed",
        }
    }
}

/// Errors raised while configuring the digest engine or logger.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// The configuration was changed after a verifier started using it.
    #[error("configuration is frozen: it must be changed before the first verifier is built")]
    Frozen,

    /// The requested hash algorithm name is not recognized.
    #[error("unknown hash algorithm: {0}")]
    UnknownHashAlgorithm(String),

    /// The requested encoding name is not recognized.
    #[error("unknown encoding: {0}")]
    UnknownEncoding(String),
}
