//! Secret key lookup.
//!
//! This module defines the [`SecretStore`] trait for resolving secret keys
//! from access keys, along with a [`StaticSecretStore`] for testing and
//! small deployments.

use std::collections::HashMap;
use std::fmt;

/// Looks up the secret key for an access key.
///
/// There is no error channel: `None` and an empty string both mean "no
/// usable secret", and the verifier treats them identically so callers
/// cannot probe which access keys exist.
pub trait SecretStore: Send + Sync {
    /// Return the secret key for `access_key`, if one is known.
    fn secret_key(&self, access_key: &str) -> Option<String>;
}

impl<F> SecretStore for F
where
    F: Fn(&str) -> Option<String> + Send + Sync,
{
    fn secret_key(&self, access_key: &str) -> Option<String> {
        self(access_key)
    }
}

/// A simple in-memory secret store backed by a `HashMap`.
///
/// # Examples
///
/// ```
/// use aksk_auth::credentials::{SecretStore, StaticSecretStore};
///
/// let store = StaticSecretStore::new(vec![("ak".to_owned(), "sk".to_owned())]);
/// assert_eq!(store.secret_key("ak").as_deref(), Some("sk"));
/// assert_eq!(store.secret_key("other"), None);
/// ```
#[derive(Clone, Default)]
pub struct StaticSecretStore {
    secrets: HashMap<String, String>,
}

impl StaticSecretStore {
    /// Create a store from an iterable of (access_key, secret_key) pairs.
    pub fn new(secrets: impl IntoIterator<Item = (String, String)>) -> Self {
        Self {
            secrets: secrets.into_iter().collect(),
        }
    }

    /// Number of access keys in the store.
    #[must_use]
    pub fn len(&self) -> usize {
        self.secrets.len()
    }

    /// Whether the store has no access keys.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.secrets.is_empty()
    }
}

impl SecretStore for StaticSecretStore {
    fn secret_key(&self, access_key: &str) -> Option<String> {
        self.secrets.get(access_key).cloned()
    }
}

impl fmt::Debug for StaticSecretStore {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("StaticSecretStore")
            .field("access_keys", &self.secrets.keys().collect::<Vec<_>>())
            .finish()
    }
}

/// An access key paired with its secret key.
#[derive(Clone, PartialEq, Eq)]
pub struct Credential {
    /// Public identifier, sent in clear.
    pub access_key: String,
    /// Shared secret, only ever used as the HMAC key.
    pub secret_key: String,
}

impl Credential {
    /// Create a credential pair.
    pub fn new(access_key: impl Into<String>, secret_key: impl Into<String>) -> Self {
        Self {
            access_key: access_key.into(),
            secret_key: secret_key.into(),
        }
    }
}

impl fmt::Debug for Credential {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credential")
            .field("access_key", &self.access_key)
            .field("secret_key", &"<redacted>")
            .finish()
    }
}

impl FromIterator<Credential> for StaticSecretStore {
    fn from_iter<I: IntoIterator<Item = Credential>>(iter: I) -> Self {
        Self::new(iter.into_iter().map(|c| (c.access_key, c.secret_key)))
    }
}
