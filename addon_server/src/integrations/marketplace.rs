//! Hooks the marketplace API client up to the engine's token broker.

use addon_engine::{
    db_types::TokenGrant,
    traits::{TokenExchange, TokenExchangeError},
};
use marketplace_tools::{MarketplaceApi, MarketplaceApiError, TokenResponse};

/// Adapts the marketplace API client to the engine's [`TokenExchange`] contract, keeping the engine free of any
/// HTTP dependency. No retries happen here; the broker decides what a failed call means.
#[derive(Clone)]
pub struct PlatformTokenExchange {
    api: MarketplaceApi,
}

impl PlatformTokenExchange {
    pub fn new(api: MarketplaceApi) -> Self {
        Self { api }
    }
}

impl TokenExchange for PlatformTokenExchange {
    async fn exchange_auth_code(&self, code: &str) -> Result<TokenGrant, TokenExchangeError> {
        self.api.exchange_auth_code(code).await.map(grant_from_response).map_err(exchange_error)
    }

    async fn refresh_token(&self, refresh_token: &str) -> Result<TokenGrant, TokenExchangeError> {
        self.api.refresh_token(refresh_token).await.map(grant_from_response).map_err(exchange_error)
    }
}

fn grant_from_response(response: TokenResponse) -> TokenGrant {
    TokenGrant {
        access_token: response.access_token,
        refresh_token: response.refresh_token,
        expires_in: response.expires_in,
        token_type: response.token_type,
    }
}

fn exchange_error(e: MarketplaceApiError) -> TokenExchangeError {
    match e {
        MarketplaceApiError::Initialization(m) | MarketplaceApiError::Transport(m) => {
            TokenExchangeError::Transport(m)
        },
        MarketplaceApiError::QueryError { status, message } => TokenExchangeError::UpstreamStatus { status, message },
        MarketplaceApiError::JsonError(m) => TokenExchangeError::InvalidResponse(m),
    }
}
