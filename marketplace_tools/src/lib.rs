//! # Marketplace platform API client
//!
//! A thin client for the platform's add-on vendor API. It covers the two surfaces the gateway needs:
//!
//! * the OAuth token endpoint, for trading provisioning authorization codes and refresh tokens for access tokens;
//! * the per-resource config endpoint, for pushing updated config values (the license key) to the platform.
//!
//! The client never retries; callers own the retry policy.

mod api;
mod config;
mod data_objects;
mod error;

pub use api::MarketplaceApi;
pub use config::MarketplaceConfig;
pub use data_objects::{AuthCodeRequest, ConfigUpdate, RefreshRequest, ResourceConfig, TokenResponse};
pub use error::MarketplaceApiError;
