use std::{fmt::Display, str::FromStr};

use chrono::{DateTime, Duration, Utc};
use log::error;
use serde::{Deserialize, Serialize};
use sqlx::{FromRow, Type};
use thiserror::Error;

//--------------------------------------   AccountStatus   -----------------------------------------------------------

/// Lifecycle state of a provisioned resource. Suspension and reactivation arrive as platform notifications;
/// deprovisioning arrives as a dedicated webhook.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Type, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AccountStatus {
    Active,
    Suspended,
    Deprovisioned,
}

impl Display for AccountStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            AccountStatus::Active => write!(f, "Active"),
            AccountStatus::Suspended => write!(f, "Suspended"),
            AccountStatus::Deprovisioned => write!(f, "Deprovisioned"),
        }
    }
}

#[derive(Debug, Clone, Error)]
#[error("Invalid account status: {0}")]
pub struct ConversionError(String);

impl FromStr for AccountStatus {
    type Err = ConversionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "Active" => Ok(Self::Active),
            "Suspended" => Ok(Self::Suspended),
            "Deprovisioned" => Ok(Self::Deprovisioned),
            s => Err(ConversionError(s.to_string())),
        }
    }
}

impl From<String> for AccountStatus {
    fn from(value: String) -> Self {
        value.parse().unwrap_or_else(|_| {
            error!("Invalid account status: {value}. But this conversion cannot fail. Defaulting to Active");
            AccountStatus::Active
        })
    }
}

//--------------------------------------     Accounts      -----------------------------------------------------------

/// The account details captured from a provisioning request. The license key and status are assigned by the
/// gateway, so they are not part of this struct.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewAccount {
    pub resource_id: String,
    pub team_id: String,
    pub email: String,
    pub app_slug: String,
    pub plan_slug: String,
    pub language: String,
    pub email_preference: bool,
}

#[derive(Debug, Clone, FromRow, Serialize, Deserialize)]
pub struct Account {
    pub id: i64,
    pub resource_id: String,
    pub team_id: String,
    pub email: String,
    pub app_slug: String,
    pub plan_slug: String,
    pub language: String,
    pub email_preference: bool,
    pub status: AccountStatus,
    pub license_key: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

//--------------------------------------     Activities    -----------------------------------------------------------

/// A new activity entry. Activities are the audit trail of platform notifications against an account.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewActivity {
    pub resource_id: String,
    pub source: String,
    pub kind: String,
    pub body: String,
}

impl NewActivity {
    pub fn new<S1, S2, S3>(resource_id: S1, kind: S2, body: S3) -> Self
    where
        S1: Into<String>,
        S2: Into<String>,
        S3: Into<String>,
    {
        Self { resource_id: resource_id.into(), source: "marketplace".into(), kind: kind.into(), body: body.into() }
    }
}

#[derive(Debug, Clone, FromRow, Serialize, Deserialize)]
pub struct Activity {
    pub id: i64,
    pub account_id: i64,
    pub resource_id: String,
    pub source: String,
    pub kind: String,
    pub body: String,
    pub created_at: DateTime<Utc>,
}

//--------------------------------------   OAuth tokens    -----------------------------------------------------------

/// A successful response from the platform token endpoint, for both the authorization-code and refresh-token
/// grants. `expires_in` applies to the access token only; refresh tokens live for the lifetime of the resource.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenGrant {
    pub access_token: String,
    pub refresh_token: String,
    pub expires_in: i64,
    pub token_type: String,
}

/// The stored access/refresh token pair for a single resource. There is at most one record per resource, and
/// `expires_at` always refers to the *currently stored* access token.
#[derive(Debug, Clone, PartialEq, Eq, FromRow, Serialize, Deserialize)]
pub struct OAuthTokenRecord {
    pub resource_id: String,
    pub access_token: String,
    pub refresh_token: String,
    pub expires_at: DateTime<Utc>,
}

impl OAuthTokenRecord {
    /// Converts a token endpoint response into a record, pinning the relative `expires_in` to wall-clock time.
    pub fn from_grant(resource_id: &str, grant: TokenGrant, now: DateTime<Utc>) -> Self {
        Self {
            resource_id: resource_id.to_string(),
            access_token: grant.access_token,
            refresh_token: grant.refresh_token,
            expires_at: now + Duration::seconds(grant.expires_in),
        }
    }

    /// An access token that expires exactly now is treated as expired.
    pub fn is_expired(&self, now: DateTime<Utc>) -> bool {
        self.expires_at <= now
    }
}
