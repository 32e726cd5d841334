//! Server configuration.
//!
//! Provides [`ServerConfig`], loaded from environment variables.

use aksk_auth::Credential;
use serde::{Deserialize, Serialize};

/// AKSK server configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ServerConfig {
    /// Bind address (e.g. `"0.0.0.0:8080"`).
    pub gateway_listen: String,

    /// Log level filter string (e.g. `"info"`, `"debug"`).
    pub log_level: String,

    /// Whether to skip the body digest check.
    pub skip_body: bool,

    /// Hash algorithm name (`sha256`, `sha512`, `sha1`, `md5`).
    pub hash: String,

    /// Encoding name (`hex`, `base64`).
    pub encoding: String,

    /// Accepted credentials.
    #[serde(skip)]
    pub credentials: Vec<Credential>,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            gateway_listen: String::from("0.0.0.0:8080"),
            log_level: String::from("info"),
            skip_body: false,
            hash: String::from("sha256"),
            encoding: String::from("hex"),
            credentials: Vec::new(),
        }
    }
}

impl ServerConfig {
    /// Load configuration from environment variables.
    ///
    /// | Variable | Default |
    /// |----------|---------|
    /// | `GATEWAY_LISTEN` | `0.0.0.0:8080` |
    /// | `LOG_LEVEL` | `info` |
    /// | `AKSK_SKIP_BODY` | `false` |
    /// | `AKSK_HASH` | `sha256` |
    /// | `AKSK_ENCODING` | `hex` |
    /// | `AKSK_CREDENTIALS` | *(empty)*, `ak1:sk1,ak2:sk2` |
    /// | `ACCESS_KEY` / `SECRET_KEY` | *(unset)*, one extra credential |
    #[must_use]
    pub fn from_env() -> Self {
        let mut config = Self::default();

        if let Ok(v) = std::env::var("GATEWAY_LISTEN") {
            config.gateway_listen = v;
        }
        if let Ok(v) = std::env::var("LOG_LEVEL") {
            config.log_level = v;
        }
        if let Ok(v) = std::env::var("AKSK_SKIP_BODY") {
            config.skip_body = parse_bool(&v);
        }
        if let Ok(v) = std::env::var("AKSK_HASH") {
            config.hash = v;
        }
        if let Ok(v) = std::env::var("AKSK_ENCODING") {
            config.encoding = v;
        }
        if let Ok(v) = std::env::var("AKSK_CREDENTIALS") {
            config.credentials = parse_credentials(&v);
        }
        if let (Ok(ak), Ok(sk)) = (std::env::var("ACCESS_KEY"), std::env::var("SECRET_KEY")) {
            config.credentials.push(Credential::new(ak, sk));
        }

        config
    }
}

/// Parse a string as a boolean, accepting `"1"` and `"true"` (case-insensitive).
fn parse_bool(value: &str) -> bool {
    value == "1" || value.eq_ignore_ascii_case("true")
}

/// Parse `ak1:sk1,ak2:sk2`. Entries without a `:` or with an empty side are
/// dropped.
fn parse_credentials(value: &str) -> Vec<Credential> {
    value
        .split(',')
        .filter_map(|entry| {
            let (ak, sk) = entry.trim().split_once(':')?;
            (!ak.is_empty() && !sk.is_empty()).then(|| Credential::new(ak, sk))
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_should_create_default_config() {
        let config = ServerConfig::default();
        assert_eq!(config.gateway_listen, "0.0.0.0:8080");
        assert_eq!(config.hash, "sha256");
        assert_eq!(config.encoding, "hex");
        assert!(!config.skip_body);
        assert!(config.credentials.is_empty());
    }

    #[test]
    fn test_should_parse_bool_values() {
        assert!(parse_bool("1"));
        assert!(parse_bool("TRUE"));
        assert!(!parse_bool("0"));
        assert!(!parse_bool("yes"));
    }

    #[test]
    fn test_should_parse_credential_list() {
        let creds = parse_credentials("ak1:sk1, ak2:sk:with:colons ,broken,:nosk,noak:");
        assert_eq!(
            creds,
            vec![
                Credential::new("ak1", "sk1"),
                Credential::new("ak2", "sk:with:colons"),
            ]
        );
    }

    #[test]
    fn test_should_not_serialize_credentials() {
        let mut config = ServerConfig::default();
        config.credentials.push(Credential::new("ak", "secret"));
        let json = serde_json::to_string(&config).unwrap();
        assert!(!json.contains("secret"));
        assert!(json.contains("gatewayListen"));
    }
}
