use serde::{Deserialize, Serialize};

/// Body for trading the provisioning authorization code for a token pair (`grant_type=authorization_code`).
#[derive(Debug, Clone, Serialize)]
pub struct AuthCodeRequest {
    /// The authorization code provided with the provisioning request
    pub code: String,
    pub grant_type: String,
    /// The preshared secret associated with the add-on
    pub client_secret: String,
}

impl AuthCodeRequest {
    pub fn new(code: &str, client_secret: &str) -> Self {
        Self {
            code: code.to_string(),
            grant_type: "authorization_code".to_string(),
            client_secret: client_secret.to_string(),
        }
    }
}

/// Body for trading a refresh token for a new token pair (`grant_type=refresh_token`).
#[derive(Debug, Clone, Serialize)]
pub struct RefreshRequest {
    pub grant_type: String,
    pub refresh_token: String,
    pub client_secret: String,
}

impl RefreshRequest {
    pub fn new(refresh_token: &str, client_secret: &str) -> Self {
        Self {
            grant_type: "refresh_token".to_string(),
            refresh_token: refresh_token.to_string(),
            client_secret: client_secret.to_string(),
        }
    }
}

/// A successful token endpoint response.
#[derive(Debug, Clone, Deserialize)]
pub struct TokenResponse {
    /// Used to call the platform API scoped to a single resource. Short-lived; the platform may also expire it
    /// early.
    pub access_token: String,
    /// Valid for the lifetime of the resource; exchanged for a new access token as many times as needed. Rotated
    /// on every refresh.
    pub refresh_token: String,
    /// Seconds until `access_token` expires.
    pub expires_in: i64,
    /// Used in the Authorization header of platform API requests.
    pub token_type: String,
}

/// The config values the platform displays to the user for a resource. The platform prefixes the keys with the
/// add-on's configured variable prefix.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ResourceConfig {
    #[serde(rename = "LICENSE_KEY")]
    pub license_key: String,
}

/// Body of a `PATCH .../resources/{id}/config` request.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConfigUpdate {
    pub config: ResourceConfig,
}
