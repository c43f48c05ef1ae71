use thiserror::Error;

use crate::db_types::OAuthTokenRecord;

#[derive(Debug, Clone, Error)]
pub enum TokenStoreError {
    #[error("Database error: {0}")]
    DatabaseError(String),
}

impl From<sqlx::Error> for TokenStoreError {
    fn from(e: sqlx::Error) -> Self {
        TokenStoreError::DatabaseError(e.to_string())
    }
}

/// Persistence contract for the per-resource OAuth token records.
///
/// The store is the single source of truth. [`OAuthTokenBroker`](crate::OAuthTokenBroker) re-reads it on every
/// access-token request rather than caching records in memory, so concurrent gateway processes never diverge on
/// token state.
#[allow(async_fn_in_trait)]
pub trait TokenStore {
    /// Fetches the token record for the given resource. An absent record is `None`, not an error.
    async fn fetch_token(&self, resource_id: &str) -> Result<Option<OAuthTokenRecord>, TokenStoreError>;

    /// Inserts the record, or overwrites the access token, refresh token and expiry in place if a record already
    /// exists for the resource. Must be idempotent and safe to call from concurrent requests.
    async fn upsert_token(&self, record: &OAuthTokenRecord) -> Result<(), TokenStoreError>;
}
