//! Canonicalization and the pluggable digest engine.
//!
//! A signature is an HMAC over the *canonical form* of a set of string
//! elements:
//!
//! ```text
//! canonical = concat(sort([access_key, timestamp, nonce, body_hash]))
//! signature = encode(HMAC(secret_key, canonical))
//! ```
//!
//! The hash behind the HMAC and the string encoding used for transport are
//! both pluggable through [`HashAlgorithm`] and [`Encoding`]. The
//! sort-then-concatenate rule is fixed.

use std::fmt;
use std::str::FromStr;
use std::sync::Arc;

use base64::Engine;
use base64::engine::general_purpose::STANDARD as BASE64;
use hmac::{Hmac, KeyInit, Mac};
use subtle::ConstantTimeEq;

use crate::error::ConfigError;

/// A hash function usable both as a plain digest and as an HMAC.
pub trait HashAlgorithm: Send + Sync {
    /// Short lowercase name, e.g. `sha256`.
    fn name(&self) -> &'static str;

    /// Hash the given bytes.
    fn digest(&self, data: &[u8]) -> Vec<u8>;

    /// Compute the HMAC of `message` keyed with `key`.
    fn hmac(&self, key: &[u8], message: &[u8]) -> Vec<u8>;
}

macro_rules! hash_algorithm {
    ($(#[$meta:meta])* $name:ident, $hasher:ty, $label:literal) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, Default)]
        pub struct $name;

        impl HashAlgorithm for $name {
            fn name(&self) -> &'static str {
                $label
            }

            fn digest(&self, data: &[u8]) -> Vec<u8> {
                use sha2::Digest as _;
                <$hasher>::digest(data).to_vec()
            }

            fn hmac(&self, key: &[u8], message: &[u8]) -> Vec<u8> {
                let mut mac = <Hmac<$hasher>>::new_from_slice(key)
                    .expect("HMAC can accept keys of any length");
                mac.update(message);
                mac.finalize().into_bytes().to_vec()
            }
        }
    };
}

hash_algorithm!(
    /// SHA-256, the default algorithm.
    Sha256Hash,
    sha2::Sha256,
    "sha256"
);
hash_algorithm!(
    /// SHA-512.
    Sha512Hash,
    sha2::Sha512,
    "sha512"
);
hash_algorithm!(
    /// SHA-1. Only for peers that cannot be upgraded.
    Sha1Hash,
    sha1::Sha1,
    "sha1"
);
hash_algorithm!(
    /// MD5. Only for peers that cannot be upgraded.
    Md5Hash,
    md5::Md5,
    "md5"
);

/// Hash algorithms selectable by name.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum HashKind {
    /// [`Sha256Hash`]
    #[default]
    Sha256,
    /// [`Sha512Hash`]
    Sha512,
    /// [`Sha1Hash`]
    Sha1,
    /// [`Md5Hash`]
    Md5,
}

impl HashKind {
    /// Build the algorithm for this kind.
    #[must_use]
    pub fn algorithm(self) -> Arc<dyn HashAlgorithm> {
        match self {
            Self::Sha256 => Arc::new(Sha256Hash),
            Self::Sha512 => Arc::new(Sha512Hash),
            Self::Sha1 => Arc::new(Sha1Hash),
            Self::Md5 => Arc::new(Md5Hash),
        }
    }
}

impl FromStr for HashKind {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().replace('-', "").as_str() {
            "sha256" => Ok(Self::Sha256),
            "sha512" => Ok(Self::Sha512),
            "sha1" => Ok(Self::Sha1),
            "md5" => Ok(Self::Md5),
            _ => Err(ConfigError::UnknownHashAlgorithm(s.to_owned())),
        }
    }
}

/// Failure to decode a transported string back into bytes.
#[derive(Debug, Clone, thiserror::Error)]
#[error("{encoding} decode failed: {reason}")]
pub struct DecodeError {
    encoding: &'static str,
    reason: String,
}

impl DecodeError {
    /// Create a decode error for the named encoding.
    pub fn new(encoding: &'static str, reason: impl fmt::Display) -> Self {
        Self {
            encoding,
            reason: reason.to_string(),
        }
    }
}

/// A reversible bytes-to-string encoding for header transport.
pub trait Encoding: Send + Sync {
    /// Short lowercase name, e.g. `hex`.
    fn name(&self) -> &'static str;

    /// Encode bytes into a header-safe string.
    fn encode(&self, data: &[u8]) -> String;

    /// Decode a string produced by [`Encoding::encode`].
    fn decode(&self, s: &str) -> Result<Vec<u8>, DecodeError>;
}

/// Lowercase hexadecimal, the default encoding.
#[derive(Debug, Clone, Copy, Default)]
pub struct HexEncoding;

impl Encoding for HexEncoding {
    fn name(&self) -> &'static str {
        "hex"
    }

    fn encode(&self, data: &[u8]) -> String {
        hex::encode(data)
    }

    fn decode(&self, s: &str) -> Result<Vec<u8>, DecodeError> {
        hex::decode(s).map_err(|e| DecodeError::new("hex", e))
    }
}

/// Standard base64 with padding.
#[derive(Debug, Clone, Copy, Default)]
pub struct Base64Encoding;

impl Encoding for Base64Encoding {
    fn name(&self) -> &'static str {
        "base64"
    }

    fn encode(&self, data: &[u8]) -> String {
        BASE64.encode(data)
    }

    fn decode(&self, s: &str) -> Result<Vec<u8>, DecodeError> {
        BASE64.decode(s).map_err(|e| DecodeError::new("base64", e))
    }
}

/// Encodings selectable by name.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum EncodingKind {
    /// [`HexEncoding`]
    #[default]
    Hex,
    /// [`Base64Encoding`]
    Base64,
}

impl EncodingKind {
    /// Build the encoding for this kind.
    #[must_use]
    pub fn encoding(self) -> Arc<dyn Encoding> {
        match self {
            Self::Hex => Arc::new(HexEncoding),
            Self::Base64 => Arc::new(Base64Encoding),
        }
    }
}

impl FromStr for EncodingKind {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "hex" => Ok(Self::Hex),
            "base64" => Ok(Self::Base64),
            _ => Err(ConfigError::UnknownEncoding(s.to_owned())),
        }
    }
}

/// Reduce an unordered set of elements to the bytes that get signed.
///
/// Elements are sorted by byte order and concatenated with no separator.
/// Empty elements are allowed and contribute nothing.
///
/// # Examples
///
/// ```
/// use aksk_auth::digest::canonicalize;
///
/// assert_eq!(canonicalize(&["b", "c", "a"]), b"abc");
/// assert_eq!(canonicalize(&["b", "", "a"]), b"ab");
/// ```
#[must_use]
pub fn canonicalize(elements: &[&str]) -> Vec<u8> {
    let mut sorted = elements.to_vec();
    sorted.sort_unstable();
    sorted.concat().into_bytes()
}

/// Compare two byte strings without leaking where they differ.
#[must_use]
pub fn constant_time_eq(a: &[u8], b: &[u8]) -> bool {
    a.ct_eq(b).into()
}

/// The hash algorithm and encoding shared by a signer and a verifier.
#[derive(Clone)]
pub struct DigestEngine {
    hash: Arc<dyn HashAlgorithm>,
    encoding: Arc<dyn Encoding>,
}

impl DigestEngine {
    /// Create an engine from an algorithm and an encoding.
    pub fn new(hash: Arc<dyn HashAlgorithm>, encoding: Arc<dyn Encoding>) -> Self {
        Self { hash, encoding }
    }

    /// The configured hash algorithm.
    #[must_use]
    pub fn hash_algorithm(&self) -> &dyn HashAlgorithm {
        self.hash.as_ref()
    }

    /// The configured encoding.
    #[must_use]
    pub fn encoding(&self) -> &dyn Encoding {
        self.encoding.as_ref()
    }

    /// Hash raw bytes, e.g. a request body.
    #[must_use]
    pub fn hash(&self, data: &[u8]) -> Vec<u8> {
        self.hash.digest(data)
    }

    /// HMAC of the canonical form of `elements`, keyed with `key`.
    #[must_use]
    pub fn mac(&self, key: &[u8], elements: &[&str]) -> Vec<u8> {
        self.hash.hmac(key, &canonicalize(elements))
    }

    /// Encode bytes for header transport.
    #[must_use]
    pub fn encode(&self, data: &[u8]) -> String {
        self.encoding.encode(data)
    }

    /// Decode a transported string.
    pub fn decode(&self, s: &str) -> Result<Vec<u8>, DecodeError> {
        self.encoding.decode(s)
    }
}

impl Default for DigestEngine {
    fn default() -> Self {
        Self::new(Arc::new(Sha256Hash), Arc::new(HexEncoding))
    }
}

impl fmt::Debug for DigestEngine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DigestEngine")
            .field("hash", &self.hash.name())
            .field("encoding", &self.encoding.name())
            .finish()
    }
}
