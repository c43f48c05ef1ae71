use thiserror::Error;

use crate::db_types::TokenGrant;

#[derive(Debug, Clone, Error)]
pub enum TokenExchangeError {
    #[error("Could not reach the platform token endpoint. {0}")]
    Transport(String),
    #[error("The platform token endpoint returned status {status}. {message}")]
    UpstreamStatus { status: u16, message: String },
    #[error("Could not parse the token endpoint response. {0}")]
    InvalidResponse(String),
}

/// Transport contract for the platform's OAuth token endpoint.
///
/// The engine stays free of HTTP client dependencies; the server crate implements this trait over the
/// marketplace API client. Implementations must not retry: retry policy belongs to the caller.
#[allow(async_fn_in_trait)]
pub trait TokenExchange {
    /// Trades the authorization code issued at provisioning for an access/refresh token pair
    /// (`grant_type=authorization_code`).
    async fn exchange_auth_code(&self, code: &str) -> Result<TokenGrant, TokenExchangeError>;

    /// Trades a refresh token for a new access token and a *new* refresh token
    /// (`grant_type=refresh_token`; the platform rotates refresh tokens on every use).
    async fn refresh_token(&self, refresh_token: &str) -> Result<TokenGrant, TokenExchangeError>;
}
