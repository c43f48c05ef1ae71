//! SQLite operations for the OAuth token records.
//!
//! One row per resource. The upsert replaces the access token, refresh token and expiry in place, which is what
//! keeps `expires_at` tied to the currently stored access token.

use sqlx::SqliteConnection;

use crate::{db_types::OAuthTokenRecord, traits::TokenStoreError};

pub async fn fetch_token(
    resource_id: &str,
    conn: &mut SqliteConnection,
) -> Result<Option<OAuthTokenRecord>, TokenStoreError> {
    let record = sqlx::query_as::<_, OAuthTokenRecord>(
        "SELECT resource_id, access_token, refresh_token, expires_at FROM oauth_tokens WHERE resource_id = ?",
    )
    .bind(resource_id)
    .fetch_optional(conn)
    .await?;
    Ok(record)
}

pub async fn upsert_token(record: &OAuthTokenRecord, conn: &mut SqliteConnection) -> Result<(), TokenStoreError> {
    sqlx::query(
        r#"INSERT INTO oauth_tokens (resource_id, access_token, refresh_token, expires_at)
           VALUES (?, ?, ?, ?)
           ON CONFLICT (resource_id) DO UPDATE SET
               access_token = excluded.access_token,
               refresh_token = excluded.refresh_token,
               expires_at = excluded.expires_at"#,
    )
    .bind(&record.resource_id)
    .bind(&record.access_token)
    .bind(&record.refresh_token)
    .bind(record.expires_at)
    .execute(conn)
    .await?;
    Ok(())
}
