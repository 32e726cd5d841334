//! Shared signing configuration with a freeze guard.
//!
//! [`AuthConfig`] holds the hash algorithm, encoding and logger used by
//! signers and verifiers. Building the first [`Verifier`](crate::Verifier)
//! freezes it; any setter called afterwards returns [`ConfigError::Frozen`].
//!
//! Signers and verifiers snapshot the settings when they are constructed.

use std::fmt;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use parking_lot::Mutex;

use crate::digest::{DigestEngine, Encoding, EncodingKind, HashAlgorithm, HashKind};
use crate::error::ConfigError;
use crate::logger::{AuthLogger, NoopLogger};

struct ConfigState {
    hash: Arc<dyn HashAlgorithm>,
    encoding: Arc<dyn Encoding>,
    logger: Arc<dyn AuthLogger>,
}

/// Configuration shared by every signer and verifier in a process.
///
/// # Examples
///
/// ```
/// use aksk_auth::{AuthConfig, ConfigError, HashKind};
///
/// let config = AuthConfig::new();
/// config.set_hash(Some(HashKind::Sha512.algorithm())).unwrap();
/// config.freeze();
/// assert!(matches!(config.set_hash(None), Err(ConfigError::Frozen)));
/// ```
pub struct AuthConfig {
    state: Mutex<ConfigState>,
    frozen: AtomicBool,
}

impl AuthConfig {
    /// Create a configuration with SHA-256, hex encoding and a no-op logger.
    #[must_use]
    pub fn new() -> Self {
        Self {
            state: Mutex::new(ConfigState {
                hash: HashKind::default().algorithm(),
                encoding: EncodingKind::default().encoding(),
                logger: Arc::new(NoopLogger),
            }),
            frozen: AtomicBool::new(false),
        }
    }

    /// Replace the hash algorithm. `None` keeps the current one.
    pub fn set_hash(&self, hash: Option<Arc<dyn HashAlgorithm>>) -> Result<(), ConfigError> {
        self.update(|state| {
            if let Some(hash) = hash {
                state.hash = hash;
            }
        })
    }

    /// Replace the encoding. `None` keeps the current one.
    pub fn set_encoding(&self, encoding: Option<Arc<dyn Encoding>>) -> Result<(), ConfigError> {
        self.update(|state| {
            if let Some(encoding) = encoding {
                state.encoding = encoding;
            }
        })
    }

    /// Replace the logger. `None` keeps the current one.
    pub fn set_logger(&self, logger: Option<Arc<dyn AuthLogger>>) -> Result<(), ConfigError> {
        self.update(|state| {
            if let Some(logger) = logger {
                state.logger = logger;
            }
        })
    }

    /// Refuse all further changes.
    pub fn freeze(&self) {
        self.frozen.store(true, Ordering::Release);
    }

    /// Whether the configuration has been frozen.
    #[must_use]
    pub fn is_frozen(&self) -> bool {
        self.frozen.load(Ordering::Acquire)
    }

    /// Snapshot the current hash algorithm and encoding.
    #[must_use]
    pub fn engine(&self) -> DigestEngine {
        let state = self.state.lock();
        DigestEngine::new(Arc::clone(&state.hash), Arc::clone(&state.encoding))
    }

    /// Snapshot the current logger.
    #[must_use]
    pub fn logger(&self) -> Arc<dyn AuthLogger> {
        Arc::clone(&self.state.lock().logger)
    }

    /// Freeze the configuration and snapshot engine and logger in one step.
    pub(crate) fn freeze_and_snapshot(&self) -> (DigestEngine, Arc<dyn AuthLogger>) {
        let state = self.state.lock();
        self.freeze();
        (
            DigestEngine::new(Arc::clone(&state.hash), Arc::clone(&state.encoding)),
            Arc::clone(&state.logger),
        )
    }

    fn update(&self, f: impl FnOnce(&mut ConfigState)) -> Result<(), ConfigError> {
        let mut state = self.state.lock();
        // Checked while holding the lock, same as freeze_and_snapshot.
        if self.is_frozen() {
            return Err(ConfigError::Frozen);
        }
        f(&mut state);
        Ok(())
    }
}

impl Default for AuthConfig {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for AuthConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let state = self.state.lock();
        f.debug_struct("AuthConfig")
            .field("hash", &state.hash.name())
            .field("encoding", &state.encoding.name())
            .field("frozen", &self.is_frozen())
            .finish_non_exhaustive()
    }
}
