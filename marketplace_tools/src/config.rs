use std::env;

use aog_common::Secret;
use log::*;

const DEFAULT_API_URL: &str = "https://api.digitalocean.com";

/// Connection settings for the platform's vendor API.
#[derive(Clone, Debug, Default)]
pub struct MarketplaceConfig {
    /// Base URL of the platform API, e.g. "https://api.digitalocean.com". Override it in tests to point at a
    /// local stub server.
    pub api_url: String,
    /// The preshared client secret associated with the add-on, used in every token endpoint request.
    pub client_secret: Secret<String>,
}

impl MarketplaceConfig {
    pub fn new(api_url: &str, client_secret: Secret<String>) -> Self {
        Self { api_url: api_url.trim_end_matches('/').to_string(), client_secret }
    }

    pub fn from_env_or_default() -> Self {
        let api_url = env::var("AOG_MARKETPLACE_API_URL").ok().unwrap_or_else(|| {
            info!("AOG_MARKETPLACE_API_URL is not set. Using the default, {DEFAULT_API_URL}.");
            DEFAULT_API_URL.to_string()
        });
        let client_secret = env::var("AOG_CLIENT_SECRET").ok().unwrap_or_else(|| {
            error!(
                "AOG_CLIENT_SECRET is not set. Token exchanges with the marketplace will fail. Set it to the \
                 client secret issued when the add-on was registered."
            );
            String::default()
        });
        Self::new(&api_url, Secret::new(client_secret))
    }
}
