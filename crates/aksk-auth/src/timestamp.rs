//! Request timestamp window validation.
//!
//! A request is fresh when its timestamp lies in `[now - 5 min, now + 1 min]`.
//! This window is the only replay bound; no nonce cache is kept.

use chrono::{DateTime, Utc};

use crate::error::AuthError;

/// Oldest accepted request age, in milliseconds.
pub const MAX_AGE_MS: i128 = 5 * 60 * 1000;

/// Furthest accepted distance into the future, in milliseconds.
pub const MAX_FUTURE_SKEW_MS: i128 = 60 * 1000;

/// Current unix time in whole seconds, as sent in `x-auth-timestamp`.
#[must_use]
pub fn unix_timestamp() -> i64 {
    Utc::now().timestamp()
}

/// Validate a raw `x-auth-timestamp` value against the current time.
pub fn validate_timestamp(raw: &str) -> Result<i64, AuthError> {
    validate_timestamp_at(raw, Utc::now())
}

/// Validate a raw `x-auth-timestamp` value against `now`.
///
/// Returns the parsed unix seconds on success.
pub fn validate_timestamp_at(raw: &str, now: DateTime<Utc>) -> Result<i64, AuthError> {
    if raw.is_empty() {
        return Err(AuthError::TimestampEmpty);
    }
    let ts: i64 = raw.parse().map_err(AuthError::TimestampMalformed)?;

    let age_ms = i128::from(now.timestamp_millis()) - i128::from(ts) * 1000;
    if age_ms > MAX_AGE_MS {
        return Err(AuthError::TimestampExpired);
    }
    if age_ms < -MAX_FUTURE_SKEW_MS {
        return Err(AuthError::TimestampFutureSkew);
    }
    Ok(ts)
}
