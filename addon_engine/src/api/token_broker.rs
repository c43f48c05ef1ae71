//! # OAuth token broker
//!
//! The broker hands out a currently-valid platform access token for a resource, performing the
//! code-for-token exchange after provisioning and lazy refresh-token renewal whenever the stored access token has
//! expired. Renewed records are persisted through the [`TokenStore`] before the new token is returned.
//!
//! ## Refresh serialization
//!
//! The platform rotates refresh tokens on every renewal, so two interleaved refreshes for the same resource can
//! invalidate each other's in-flight refresh token. The broker therefore holds a per-resource async mutex: the
//! first caller to find an expired token performs the renewal while concurrent callers wait on the guard, re-read
//! the store, and find the fresh record. At most one refresh is ever in flight per resource.
//!
//! The broker deliberately keeps no in-memory copy of any record beyond the duration of a single call; the store
//! is the single source of truth, also across gateway processes.

use std::{
    collections::HashMap,
    sync::{Arc, Mutex as StdMutex, PoisonError},
};

use chrono::Utc;
use log::{debug, warn};
use thiserror::Error;
use tokio::sync::Mutex;

use crate::{
    db_types::OAuthTokenRecord,
    traits::{TokenExchange, TokenExchangeError, TokenStore, TokenStoreError},
};

#[derive(Debug, Clone, Error)]
pub enum TokenBrokerError {
    #[error("No credentials are stored for resource {0}. Has the authorization code been exchanged?")]
    NoCredentials(String),
    #[error("Token storage failed. {0}")]
    Store(#[from] TokenStoreError),
    #[error("The platform token endpoint call failed. {0}")]
    UpstreamToken(#[from] TokenExchangeError),
}

pub struct OAuthTokenBroker<S, X> {
    store: S,
    exchange: X,
    refresh_guards: StdMutex<HashMap<String, Arc<Mutex<()>>>>,
}

impl<S, X> OAuthTokenBroker<S, X>
where
    S: TokenStore,
    X: TokenExchange,
{
    pub fn new(store: S, exchange: X) -> Self {
        Self { store, exchange, refresh_guards: StdMutex::new(HashMap::new()) }
    }

    /// Trades the authorization code issued with a provisioning request for an access/refresh token pair and
    /// persists it. Called once per resource, right after provisioning. Failures surface to the caller; the
    /// provisioning flow treats them as non-fatal since the pair can be obtained lazily on first use.
    pub async fn exchange_code(&self, resource_id: &str, code: &str) -> Result<(), TokenBrokerError> {
        let grant = self.exchange.exchange_auth_code(code).await.map_err(|e| {
            warn!("🎟️ Authorization code exchange for resource {resource_id} failed. {e}");
            e
        })?;
        let record = OAuthTokenRecord::from_grant(resource_id, grant, Utc::now());
        self.store.upsert_token(&record).await?;
        debug!("🎟️ Stored initial token pair for resource {resource_id}");
        Ok(())
    }

    /// Returns a currently-valid access token for the resource, renewing through the refresh token first if the
    /// stored access token has expired.
    pub async fn access_token(&self, resource_id: &str) -> Result<String, TokenBrokerError> {
        let record = self.fetch_record(resource_id).await?;
        if !record.is_expired(Utc::now()) {
            return Ok(record.access_token);
        }
        debug!("🎟️ Access token for resource {resource_id} has expired. Renewing.");
        let guard = self.refresh_guard(resource_id);
        let _in_flight = guard.lock().await;
        // A concurrent caller may have renewed while we waited on the guard. Re-read before refreshing.
        let record = self.fetch_record(resource_id).await?;
        if !record.is_expired(Utc::now()) {
            debug!("🎟️ Token for resource {resource_id} was renewed by a concurrent request. Reusing it.");
            return Ok(record.access_token);
        }
        let grant = self.exchange.refresh_token(&record.refresh_token).await?;
        let renewed = OAuthTokenRecord::from_grant(resource_id, grant, Utc::now());
        self.store.upsert_token(&renewed).await?;
        debug!("🎟️ Renewed access token for resource {resource_id}, valid until {}", renewed.expires_at);
        Ok(renewed.access_token)
    }

    async fn fetch_record(&self, resource_id: &str) -> Result<OAuthTokenRecord, TokenBrokerError> {
        self.store
            .fetch_token(resource_id)
            .await?
            .ok_or_else(|| TokenBrokerError::NoCredentials(resource_id.to_string()))
    }

    fn refresh_guard(&self, resource_id: &str) -> Arc<Mutex<()>> {
        let mut guards = self.refresh_guards.lock().unwrap_or_else(PoisonError::into_inner);
        guards.entry(resource_id.to_string()).or_insert_with(|| Arc::new(Mutex::new(()))).clone()
    }
}
