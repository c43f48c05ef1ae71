use addon_engine::{
    db_types::{Account, NewAccount, TokenGrant},
    traits::{TokenExchange, TokenExchangeError},
    AccountApi,
    SqliteDatabase,
};
use aog_common::Secret;
use mockall::mock;

use crate::data_objects::{OauthGrant, ProvisioningMetadata, ProvisioningRequest};

pub const TEST_SALT: &str = "test-shared-salt";
pub const TEST_HOMEPAGE: &str = "https://dashboard.example.com";

mock! {
    pub Exchange {}
    impl TokenExchange for Exchange {
        async fn exchange_auth_code(&self, code: &str) -> Result<TokenGrant, TokenExchangeError>;
        async fn refresh_token(&self, refresh_token: &str) -> Result<TokenGrant, TokenExchangeError>;
    }
}

pub fn salt() -> Secret<String> {
    Secret::new(TEST_SALT.to_string())
}

/// Every connection to an in-memory SQLite url gets its own database, so the pool is capped at one connection.
pub async fn new_db() -> SqliteDatabase {
    SqliteDatabase::new_with_url("sqlite::memory:", 1).await.expect("in-memory database should always open")
}

pub fn provisioning_request(resource_id: &str) -> ProvisioningRequest {
    ProvisioningRequest {
        app_slug: "orca-crm".to_string(),
        plan_slug: "starter".to_string(),
        resource_uuid: resource_id.to_string(),
        metadata: ProvisioningMetadata { language: "en".to_string(), email_preference: true },
        email: "relay-8810@marketplace.example.com".to_string(),
        team_id: "team-91c2".to_string(),
        oauth_grant: OauthGrant { code_type: "authorization_code".to_string(), code: "c0ffee".to_string(), expires_at: 0 },
    }
}

/// Seeds an account directly through the engine, bypassing the provisioning endpoint.
pub async fn seed_account(db: &SqliteDatabase, resource_id: &str) -> Account {
    let api = AccountApi::new(db.clone());
    let new_account = NewAccount {
        resource_id: resource_id.to_string(),
        team_id: "team-91c2".to_string(),
        email: "relay-8810@marketplace.example.com".to_string(),
        app_slug: "orca-crm".to_string(),
        plan_slug: "starter".to_string(),
        language: "en".to_string(),
        email_preference: true,
    };
    api.provision_account(&new_account).await.expect("account should provision")
}

pub fn token_grant(access: &str, refresh: &str) -> TokenGrant {
    TokenGrant {
        access_token: access.to_string(),
        refresh_token: refresh.to_string(),
        expires_in: 28_800,
        token_type: "bearer".to_string(),
    }
}
