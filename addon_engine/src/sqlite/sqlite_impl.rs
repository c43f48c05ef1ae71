//! `SqliteDatabase` is a concrete implementation of an add-on gateway engine backend.
//!
//! Unsurprisingly, it uses SQLite as the backend and implements all the traits defined in the [`crate::traits`]
//! module.
use std::fmt::Debug;

use sqlx::SqlitePool;

use super::db::{accounts, activities, create_schema, db_url, new_pool, tokens};
use crate::{
    db_types::{Account, AccountStatus, Activity, NewAccount, NewActivity, OAuthTokenRecord},
    traits::{AccountApiError, AccountManagement, ActivityManagement, TokenStore, TokenStoreError},
};

#[derive(Clone)]
pub struct SqliteDatabase {
    url: String,
    pool: SqlitePool,
}

impl Debug for SqliteDatabase {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "SqliteDatabase ({:?})", self.pool)
    }
}

impl SqliteDatabase {
    /// Creates a new database instance, using `AOG_DATABASE_URL` for the connection string.
    pub async fn new(max_connections: u32) -> Result<Self, sqlx::Error> {
        let url = db_url();
        Self::new_with_url(&url, max_connections).await
    }

    pub async fn new_with_url(url: &str, max_connections: u32) -> Result<Self, sqlx::Error> {
        let pool = new_pool(url, max_connections).await?;
        create_schema(&pool).await?;
        Ok(Self { url: url.to_string(), pool })
    }

    pub fn url(&self) -> &str {
        self.url.as_str()
    }

    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }
}

impl AccountManagement for SqliteDatabase {
    async fn create_account(&self, account: &NewAccount, license_key: &str) -> Result<Account, AccountApiError> {
        let mut conn = self.pool.acquire().await?;
        accounts::insert_account(account, license_key, &mut conn).await
    }

    async fn fetch_account(&self, resource_id: &str) -> Result<Option<Account>, AccountApiError> {
        let mut conn = self.pool.acquire().await?;
        accounts::fetch_account_by_resource_id(resource_id, &mut conn).await
    }

    async fn set_account_status(&self, resource_id: &str, status: AccountStatus) -> Result<(), AccountApiError> {
        let mut conn = self.pool.acquire().await?;
        accounts::set_status(resource_id, status, &mut conn).await
    }

    async fn update_plan(&self, resource_id: &str, plan_slug: &str) -> Result<(), AccountApiError> {
        let mut conn = self.pool.acquire().await?;
        accounts::update_plan(resource_id, plan_slug, &mut conn).await
    }

    async fn update_license_key(&self, resource_id: &str, license_key: &str) -> Result<(), AccountApiError> {
        let mut conn = self.pool.acquire().await?;
        accounts::update_license_key(resource_id, license_key, &mut conn).await
    }
}

impl ActivityManagement for SqliteDatabase {
    async fn record_activity(&self, activity: &NewActivity) -> Result<(), AccountApiError> {
        let mut conn = self.pool.acquire().await?;
        activities::insert_activity(activity, &mut conn).await
    }

    async fn fetch_activities(&self, resource_id: Option<&str>) -> Result<Vec<Activity>, AccountApiError> {
        let mut conn = self.pool.acquire().await?;
        activities::fetch_activities(resource_id, &mut conn).await
    }
}

impl TokenStore for SqliteDatabase {
    async fn fetch_token(&self, resource_id: &str) -> Result<Option<OAuthTokenRecord>, TokenStoreError> {
        let mut conn = self.pool.acquire().await?;
        tokens::fetch_token(resource_id, &mut conn).await
    }

    async fn upsert_token(&self, record: &OAuthTokenRecord) -> Result<(), TokenStoreError> {
        let mut conn = self.pool.acquire().await?;
        tokens::upsert_token(record, &mut conn).await
    }
}
