//! Access-key/secret-key (AKSK) request authentication.
//!
//! This crate signs outgoing HTTP requests and verifies incoming ones with a
//! shared-secret HMAC scheme. A request carries its access key, a unix
//! timestamp, a random nonce, an optional body hash and a signature over all
//! of them; the verifier resolves the secret key for the access key and
//! recomputes everything.
//!
//! # Overview
//!
//! ```text
//! signature = encode(HMAC(secret_key, concat(sort([access_key, timestamp, nonce, body_hash]))))
//! ```
//!
//! Requests are accepted only within five minutes after, or one minute
//! before, the server's clock. There is no nonce cache, so a captured request
//! can be replayed until it leaves that window.
//!
//! # Usage
//!
//! ```rust
//! use std::sync::Arc;
//!
//! use aksk_auth::{AuthConfig, Signer, StaticSecretStore, Verifier};
//!
//! let config = AuthConfig::new();
//! let signer = Signer::new(&config, "ak", "sk").unwrap();
//! let request = signer
//!     .sign(http::Method::POST, "http://localhost/api", r#"{"param":"a"}"#)
//!     .unwrap();
//!
//! let store = StaticSecretStore::new(vec![("ak".to_owned(), "sk".to_owned())]);
//! let verifier = Verifier::new(&config, Arc::new(store));
//! let verified = verifier.verify(request.headers(), request.body()).unwrap();
//! assert_eq!(verified.access_key, "ak");
//! ```
//!
//! # Modules
//!
//! - [`body`] - Body digest check
//! - [`config`] - Shared configuration with a freeze-after-first-use guard
//! - [`credentials`] - Secret store trait and in-memory implementation
//! - [`digest`] - Canonicalization, hash algorithms and encodings
//! - [`error`] - Error types
//! - [`headers`] - Header names
//! - [`logger`] - Diagnostic sink for rejections
//! - [`signer`] - Request signing
//! - [`timestamp`] - Freshness window validation
//! - [`verifier`] - Request verification

pub mod body;
pub mod config;
pub mod credentials;
pub mod digest;
pub mod error;
pub mod headers;
pub mod logger;
pub mod signer;
pub mod timestamp;
pub mod verifier;

pub use config::AuthConfig;
pub use credentials::{Credential, SecretStore, StaticSecretStore};
pub use digest::{DigestEngine, Encoding, EncodingKind, HashAlgorithm, HashKind};
pub use error::{AuthError, ConfigError, ErrorKind};
pub use logger::{AuthLogger, NoopLogger, TracingLogger};
pub use signer::{SignedHeaders, Signer};
pub use verifier::{VerifiedRequest, Verifier};
