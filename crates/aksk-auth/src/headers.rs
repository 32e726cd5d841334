//! Header names carrying the signed request metadata.

use std::borrow::Cow;

use http::HeaderMap;

/// Access key of the signer.
pub const HEADER_ACCESS_KEY: &str = "x-auth-accesskey";
/// Unix seconds at signing time.
pub const HEADER_TIMESTAMP: &str = "x-auth-timestamp";
/// Encoded HMAC over the other signed fields.
pub const HEADER_SIGNATURE: &str = "x-auth-signature";
/// Encoded hash of the request body; absent for an empty body.
pub const HEADER_BODY_HASH: &str = "x-auth-body-hash";
/// Per-request random nonce.
pub const HEADER_RANDOM_STR: &str = "x-auth-random-str";

/// Read a header as a string, or `""` when absent.
///
/// Invalid UTF-8 is replaced rather than dropped, so a garbled value fails
/// the check it feeds instead of looking like a missing header.
pub(crate) fn header_str<'a>(headers: &'a HeaderMap, name: &str) -> Cow<'a, str> {
    headers
        .get(name)
        .map_or(Cow::Borrowed(""), |v| String::from_utf8_lossy(v.as_bytes()))
}
