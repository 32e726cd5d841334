//! Request body integrity check.

use tracing::debug;

use crate::digest::{DigestEngine, constant_time_eq};
use crate::error::AuthError;

/// Check `body` against the claimed `x-auth-body-hash` value.
///
/// An empty body always passes: signers omit the digest for it, and any
/// digest a client sends anyway is ignored.
pub fn check_body(engine: &DigestEngine, body: &[u8], claimed: &str) -> Result<(), AuthError> {
    if body.is_empty() {
        return Ok(());
    }
    if claimed.is_empty() {
        return Err(AuthError::BodyDigestMissing);
    }

    let claimed = engine.decode(claimed).map_err(|e| {
        debug!(error = %e, "body digest decode failed");
        AuthError::BodyDigestDecode
    })?;

    if constant_time_eq(&claimed, &engine.hash(body)) {
        Ok(())
    } else {
        Err(AuthError::BodyDigestMismatch)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn digest_of(engine: &DigestEngine, body: &[u8]) -> String {
        engine.encode(&engine.hash(body))
    }

    #[test]
    fn test_should_accept_empty_body_regardless_of_claim() {
        let engine = DigestEngine::default();
        assert!(check_body(&engine, b"", "").is_ok());
        assert!(check_body(&engine, b"", "not-even-hex").is_ok());
        assert!(check_body(&engine, b"", &digest_of(&engine, b"other")).is_ok());
    }

    #[test]
    fn test_should_accept_matching_digest() {
        let engine = DigestEngine::default();
        let body = br#"{"param":"a"}"#;
        assert!(check_body(&engine, body, &digest_of(&engine, body)).is_ok());
    }

    #[test]
    fn test_should_reject_missing_digest() {
        let engine = DigestEngine::default();
        assert!(matches!(
            check_body(&engine, b"data", ""),
            Err(AuthError::BodyDigestMissing)
        ));
    }

    #[test]
    fn test_should_reject_undecodable_digest() {
        let engine = DigestEngine::default();
        assert!(matches!(
            check_body(&engine, b"data", "xyz"),
            Err(AuthError::BodyDigestDecode)
        ));
    }

    #[test]
    fn test_should_reject_single_byte_flip() {
        let engine = DigestEngine::default();
        let body = b"hello world".to_vec();
        let claimed = digest_of(&engine, &body);

        let mut tampered = body.clone();
        tampered[0] ^= 0x01;
        assert!(matches!(
            check_body(&engine, &tampered, &claimed),
            Err(AuthError::BodyDigestMismatch)
        ));
    }

    #[test]
    fn test_should_hash_body_without_trimming() {
        let engine = DigestEngine::default();
        let claimed = digest_of(&engine, b"payload");
        assert!(matches!(
            check_body(&engine, b"payload\n", &claimed),
            Err(AuthError::BodyDigestMismatch)
        ));
    }
}
