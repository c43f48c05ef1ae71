//! # Session tokens
//!
//! A successful SSO login ends with a redirect to the vendor front-end. The user's proof of login is a short-lived
//! session token carried in the redirect URL, which the front-end presents back to the gateway on every call. The
//! tokens are HS256 JWTs keyed with the same salt the platform issued for SSO signing, so the front-end needs no
//! extra key material and the token can be verified offline.

use aog_common::Secret;
use chrono::{DateTime, Duration, Utc};
use jsonwebtoken::{decode, encode, errors::ErrorKind, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// How long a session token stays valid after issuance. Long enough for the front-end to establish its own
/// session, short enough that a leaked redirect URL goes stale quickly.
pub const SESSION_TOKEN_VALIDITY: Duration = Duration::minutes(15);

#[derive(Debug, Clone, Error)]
pub enum AuthError {
    #[error("The session token is not in the correct format. {0}")]
    PoorlyFormattedToken(String),
    #[error("The session token signature could not be validated. {0}")]
    ValidationError(String),
    #[error("The session token has expired.")]
    TokenExpired,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionClaims {
    /// The resource id of the account the user logged in to.
    pub sub: String,
    pub iat: i64,
    pub exp: i64,
}

pub struct SessionTokenIssuer {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    validity: Duration,
}

impl SessionTokenIssuer {
    pub fn new(salt: &Secret<String>) -> Self {
        let encoding_key = EncodingKey::from_secret(salt.reveal().as_bytes());
        let decoding_key = DecodingKey::from_secret(salt.reveal().as_bytes());
        Self { encoding_key, decoding_key, validity: SESSION_TOKEN_VALIDITY }
    }

    /// Issues a session token for the given resource, valid from now.
    pub fn issue(&self, resource_id: &str) -> Result<String, AuthError> {
        self.issue_at(resource_id, Utc::now())
    }

    fn issue_at(&self, resource_id: &str, now: DateTime<Utc>) -> Result<String, AuthError> {
        let claims = SessionClaims {
            sub: resource_id.to_string(),
            iat: now.timestamp(),
            exp: (now + self.validity).timestamp(),
        };
        encode(&Header::new(Algorithm::HS256), &claims, &self.encoding_key)
            .map_err(|e| AuthError::ValidationError(e.to_string()))
    }

    /// Validates a session token and returns its claims. Expiry is checked with zero leeway; anything but a
    /// well-formed, correctly signed, unexpired HS256 token is rejected.
    pub fn validate(&self, token: &str) -> Result<SessionClaims, AuthError> {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.leeway = 0;
        validation.set_required_spec_claims(&["exp"]);
        let data = decode::<SessionClaims>(token, &self.decoding_key, &validation).map_err(|e| match e.kind() {
            ErrorKind::ExpiredSignature => AuthError::TokenExpired,
            ErrorKind::InvalidSignature | ErrorKind::InvalidAlgorithm => AuthError::ValidationError(e.to_string()),
            _ => AuthError::PoorlyFormattedToken(e.to_string()),
        })?;
        Ok(data.claims)
    }
}
