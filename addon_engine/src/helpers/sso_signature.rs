//! # SSO request signatures
//!
//! When a user opens the add-on from the marketplace, the platform calls the gateway's SSO endpoint with a
//! `(resource_uuid, timestamp, token)` triple. The token is an HMAC-SHA256 over the message
//!
//! ```text
//!    {timestamp}:{resource_uuid}
//! ```
//!
//! keyed with the shared salt that the platform issued when the add-on was registered, and hex-encoded on the wire.
//!
//! Validation is time-boxed: a timestamp older than the staleness window fails authorization outright, which bounds
//! the replay window without any server-side nonce tracking. A timestamp slightly in the *future* (clock skew
//! between the platform and the gateway) also validates as long as it is within the window; the check is on
//! absolute elapsed time.
//!
//! MAC comparison is constant-time ([`Mac::verify_slice`]), so the running time does not depend on where the first
//! mismatching byte occurs.

use chrono::{DateTime, Duration, TimeZone, Utc};
use hmac::{Hmac, Mac};
use sha2::Sha256;
use thiserror::Error;

use aog_common::Secret;

type HmacSha256 = Hmac<Sha256>;

/// How old (or how far in the future) an SSO timestamp may be before the request is rejected.
pub const SSO_STALENESS_WINDOW: Duration = Duration::minutes(2);

#[derive(Debug, Clone, Error)]
pub enum SsoSignatureError {
    #[error("The SSO timestamp is not a valid epoch-seconds value. {0}")]
    MalformedTimestamp(String),
    #[error("The SSO token is not valid hex. {0}")]
    MalformedToken(String),
}

/// Computes the hex-encoded HMAC-SHA256 of `{timestamp}:{resource_id}` under `salt`.
///
/// Pure function over its inputs. Exposed so tests and tooling can mint valid tokens.
pub fn sign_sso_message(salt: &Secret<String>, timestamp: &str, resource_id: &str) -> String {
    let mut mac = HmacSha256::new_from_slice(salt.reveal().as_bytes())
        .expect("HMAC-SHA256 accepts keys of any length");
    mac.update(format!("{timestamp}:{resource_id}").as_bytes());
    hex::encode(mac.finalize().into_bytes())
}

/// Validates inbound SSO requests against the shared salt and the staleness window.
///
/// Construct one per server with the configured salt; it holds no other state.
#[derive(Clone)]
pub struct SsoValidator {
    salt: Secret<String>,
    staleness_window: Duration,
}

impl SsoValidator {
    pub fn new(salt: Secret<String>) -> Self {
        Self { salt, staleness_window: SSO_STALENESS_WINDOW }
    }

    #[cfg(test)]
    fn with_window(salt: Secret<String>, staleness_window: Duration) -> Self {
        Self { salt, staleness_window }
    }

    /// Checks an inbound SSO assertion.
    ///
    /// Returns `Ok(false)` for a stale timestamp or a MAC mismatch (an unauthorized request, not an error), and
    /// `Err` only for input that could not be parsed at all. Callers must not leak which of the two unauthorized
    /// cases occurred.
    pub fn validate(&self, token: &str, timestamp: &str, resource_id: &str) -> Result<bool, SsoSignatureError> {
        self.validate_at(token, timestamp, resource_id, Utc::now())
    }

    fn validate_at(
        &self,
        token: &str,
        timestamp: &str,
        resource_id: &str,
        now: DateTime<Utc>,
    ) -> Result<bool, SsoSignatureError> {
        let epoch = timestamp
            .parse::<i64>()
            .map_err(|e| SsoSignatureError::MalformedTimestamp(e.to_string()))?;
        let issued_at = Utc
            .timestamp_opt(epoch, 0)
            .single()
            .ok_or_else(|| SsoSignatureError::MalformedTimestamp(format!("{epoch} is out of range")))?;
        // Absolute elapsed time, so minor future skew within the window still validates.
        let elapsed = (now - issued_at).abs();
        if elapsed > self.staleness_window {
            return Ok(false);
        }
        let candidate = hex::decode(token).map_err(|e| SsoSignatureError::MalformedToken(e.to_string()))?;
        let mut mac = HmacSha256::new_from_slice(self.salt.reveal().as_bytes())
            .expect("HMAC-SHA256 accepts keys of any length");
        mac.update(format!("{timestamp}:{resource_id}").as_bytes());
        Ok(mac.verify_slice(&candidate).is_ok())
    }
}
