//! AKSK request signing.
//!
//! The signer attaches five headers to an outgoing request:
//!
//! - `x-auth-accesskey`: the access key
//! - `x-auth-random-str`: an encoded 8-byte nonce from the OS random source
//! - `x-auth-timestamp`: the current unix time in seconds
//! - `x-auth-body-hash`: the encoded body hash, only for a non-empty body
//! - `x-auth-signature`: the encoded HMAC over the sorted values above

use std::fmt;

use bytes::Bytes;
use http::{HeaderMap, HeaderValue, Method, Request, Uri};
use rand::RngCore;
use rand::rngs::OsRng;
use tracing::debug;

use crate::config::AuthConfig;
use crate::digest::DigestEngine;
use crate::error::AuthError;
use crate::headers::{
    HEADER_ACCESS_KEY, HEADER_BODY_HASH, HEADER_RANDOM_STR, HEADER_SIGNATURE, HEADER_TIMESTAMP,
};
use crate::timestamp::unix_timestamp;

/// Number of random bytes in a nonce, before encoding.
pub const NONCE_LEN: usize = 8;

/// The signed metadata for one request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SignedHeaders {
    access_key: String,
    nonce: String,
    timestamp: String,
    body_hash: Option<String>,
    signature: String,
}

impl SignedHeaders {
    /// The access key.
    #[must_use]
    pub fn access_key(&self) -> &str {
        &self.access_key
    }

    /// The encoded nonce.
    #[must_use]
    pub fn nonce(&self) -> &str {
        &self.nonce
    }

    /// The unix timestamp, as a decimal string.
    #[must_use]
    pub fn timestamp(&self) -> &str {
        &self.timestamp
    }

    /// The encoded body hash, absent for an empty body.
    #[must_use]
    pub fn body_hash(&self) -> Option<&str> {
        self.body_hash.as_deref()
    }

    /// The encoded signature.
    #[must_use]
    pub fn signature(&self) -> &str {
        &self.signature
    }

    /// Write the headers into `headers`, replacing earlier values.
    ///
    /// Any stale `x-auth-body-hash` is removed when this request has none.
    pub fn apply(&self, headers: &mut HeaderMap) {
        let pairs = [
            (HEADER_ACCESS_KEY, &self.access_key),
            (HEADER_RANDOM_STR, &self.nonce),
            (HEADER_TIMESTAMP, &self.timestamp),
            (HEADER_SIGNATURE, &self.signature),
        ];
        for (name, value) in pairs {
            headers.insert(name, to_header_value(value));
        }
        match self.body_hash.as_deref() {
            Some(hash) => {
                headers.insert(HEADER_BODY_HASH, to_header_value(hash));
            }
            None => {
                headers.remove(HEADER_BODY_HASH);
            }
        }
    }

    fn validate(&self) -> Result<(), AuthError> {
        let values = [
            Some(self.access_key.as_str()),
            Some(self.nonce.as_str()),
            Some(self.timestamp.as_str()),
            self.body_hash.as_deref(),
            Some(self.signature.as_str()),
        ];
        for value in values.into_iter().flatten() {
            HeaderValue::from_str(value)
                .map_err(|e| AuthError::InvalidRequest(format!("invalid header value: {e}")))?;
        }
        Ok(())
    }
}

// Every value was checked by `SignedHeaders::validate` before the struct was
// handed out, and the fields are private.
fn to_header_value(value: &str) -> HeaderValue {
    HeaderValue::from_str(value).expect("signed header values are validated at signing time")
}

/// Signs outgoing requests with one credential.
#[derive(Clone)]
pub struct Signer {
    engine: DigestEngine,
    access_key: String,
    secret_key: String,
}

impl Signer {
    /// Create a signer for the given credential.
    ///
    /// The config is snapshotted but not frozen; only verifiers freeze it.
    pub fn new(
        config: &AuthConfig,
        access_key: impl Into<String>,
        secret_key: impl Into<String>,
    ) -> Result<Self, AuthError> {
        Self::with_engine(config.engine(), access_key, secret_key)
    }

    /// Create a signer from an explicit engine.
    pub fn with_engine(
        engine: DigestEngine,
        access_key: impl Into<String>,
        secret_key: impl Into<String>,
    ) -> Result<Self, AuthError> {
        let access_key = access_key.into();
        let secret_key = secret_key.into();
        if access_key.is_empty() {
            return Err(AuthError::AccessKeyEmpty);
        }
        if secret_key.is_empty() {
            return Err(AuthError::SecretKeyEmpty);
        }
        Ok(Self {
            engine,
            access_key,
            secret_key,
        })
    }

    /// The access key this signer signs as.
    #[must_use]
    pub fn access_key(&self) -> &str {
        &self.access_key
    }

    /// Compute the signed headers for a request carrying `body`.
    pub fn sign_headers(&self, body: &[u8]) -> Result<SignedHeaders, AuthError> {
        let mut nonce = [0u8; NONCE_LEN];
        OsRng
            .try_fill_bytes(&mut nonce)
            .map_err(|e| AuthError::RandomSource(e.to_string()))?;
        self.sign_with(&nonce, unix_timestamp(), body)
    }

    /// Sign with a caller-chosen nonce and timestamp.
    pub(crate) fn sign_with(
        &self,
        nonce: &[u8],
        timestamp: i64,
        body: &[u8],
    ) -> Result<SignedHeaders, AuthError> {
        let nonce = self.engine.encode(nonce);
        let timestamp = timestamp.to_string();
        let body_hash = (!body.is_empty()).then(|| self.engine.encode(&self.engine.hash(body)));

        let mut elements = vec![self.access_key.as_str(), nonce.as_str(), timestamp.as_str()];
        if let Some(hash) = &body_hash {
            elements.push(hash);
        }
        let signature = self
            .engine
            .encode(&self.engine.mac(self.secret_key.as_bytes(), &elements));

        debug!(access_key = %self.access_key, timestamp = %timestamp, "signed aksk request");

        let signed = SignedHeaders {
            access_key: self.access_key.clone(),
            nonce,
            timestamp,
            body_hash,
            signature,
        };
        signed.validate()?;
        Ok(signed)
    }

    /// Sign an existing request whose body is `body`.
    pub fn sign_request<B>(&self, request: &mut Request<B>, body: &[u8]) -> Result<(), AuthError> {
        self.sign_headers(body)?.apply(request.headers_mut());
        Ok(())
    }

    /// Build a signed request.
    pub fn sign<U>(
        &self,
        method: Method,
        uri: U,
        body: impl Into<Bytes>,
    ) -> Result<Request<Bytes>, AuthError>
    where
        U: TryInto<Uri>,
        U::Error: fmt::Display,
    {
        let uri = uri
            .try_into()
            .map_err(|e| AuthError::InvalidRequest(format!("invalid uri: {e}")))?;
        let body = body.into();
        let signed = self.sign_headers(&body)?;

        let mut request = Request::builder()
            .method(method)
            .uri(uri)
            .body(body)
            .map_err(|e| AuthError::InvalidRequest(e.to_string()))?;
        signed.apply(request.headers_mut());
        Ok(request)
    }
}

impl fmt::Debug for Signer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Signer")
            .field("engine", &self.engine)
            .field("access_key", &self.access_key)
            .finish_non_exhaustive()
    }
}
