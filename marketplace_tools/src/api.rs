use std::{sync::Arc, time::Duration};

use log::*;
use reqwest::{
    header::{HeaderMap, HeaderValue},
    Client,
};
use serde::Serialize;

use crate::{
    config::MarketplaceConfig,
    data_objects::{AuthCodeRequest, ConfigUpdate, RefreshRequest, ResourceConfig, TokenResponse},
    MarketplaceApiError,
};

// Outbound calls must not hang an inbound request past its deadline.
const REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

#[derive(Clone)]
pub struct MarketplaceApi {
    config: MarketplaceConfig,
    client: Arc<Client>,
}

impl MarketplaceApi {
    pub fn new(config: MarketplaceConfig) -> Result<Self, MarketplaceApiError> {
        let mut headers = HeaderMap::with_capacity(1);
        headers.insert("Content-Type", HeaderValue::from_static("application/json"));
        let client = Client::builder()
            .default_headers(headers)
            .timeout(REQUEST_TIMEOUT)
            .build()
            .map_err(|e| MarketplaceApiError::Initialization(e.to_string()))?;
        Ok(Self { config, client: Arc::new(client) })
    }

    pub fn url(&self, path: &str) -> String {
        format!("{}{path}", self.config.api_url)
    }

    /// Trades the authorization code issued at provisioning for an access/refresh token pair.
    pub async fn exchange_auth_code(&self, code: &str) -> Result<TokenResponse, MarketplaceApiError> {
        debug!("Exchanging authorization code at the platform token endpoint");
        let body = AuthCodeRequest::new(code, self.config.client_secret.reveal());
        self.token_request(&body).await
    }

    /// Trades a refresh token for a new access token and a new refresh token.
    pub async fn refresh_token(&self, refresh_token: &str) -> Result<TokenResponse, MarketplaceApiError> {
        debug!("Requesting access token renewal at the platform token endpoint");
        let body = RefreshRequest::new(refresh_token, self.config.client_secret.reveal());
        self.token_request(&body).await
    }

    /// Pushes a new set of config values (the license key) for a resource to the platform. Requires a valid
    /// access token for that resource.
    pub async fn update_resource_config(
        &self,
        resource_id: &str,
        access_token: &str,
        config: ResourceConfig,
    ) -> Result<(), MarketplaceApiError> {
        let url = self.url(&format!("/v2/add-ons/resources/{resource_id}/config"));
        trace!("Sending config update: {url}");
        let body = ConfigUpdate { config };
        let response = self
            .client
            .patch(url)
            .bearer_auth(access_token)
            .json(&body)
            .send()
            .await
            .map_err(|e| MarketplaceApiError::Transport(e.to_string()))?;
        if response.status().is_success() {
            info!("Config update for resource {resource_id} accepted by the platform");
            Ok(())
        } else {
            let status = response.status().as_u16();
            let message = response.text().await.map_err(|e| MarketplaceApiError::Transport(e.to_string()))?;
            Err(MarketplaceApiError::QueryError { status, message })
        }
    }

    /// One code path for both grants: the token endpoint only differs in the request body.
    async fn token_request<B: Serialize>(&self, body: &B) -> Result<TokenResponse, MarketplaceApiError> {
        let url = self.url("/v2/add-ons/oauth/token");
        let response = self
            .client
            .post(url)
            .json(body)
            .send()
            .await
            .map_err(|e| MarketplaceApiError::Transport(e.to_string()))?;
        if response.status().is_success() {
            trace!("Token request successful. {}", response.status());
            response.json::<TokenResponse>().await.map_err(|e| MarketplaceApiError::JsonError(e.to_string()))
        } else {
            let status = response.status().as_u16();
            let message = response.text().await.map_err(|e| MarketplaceApiError::Transport(e.to_string()))?;
            warn!("Token endpoint rejected the request. Status {status}");
            Err(MarketplaceApiError::QueryError { status, message })
        }
    }
}
