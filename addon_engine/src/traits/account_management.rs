use thiserror::Error;

use crate::db_types::{Account, AccountStatus, NewAccount};

#[derive(Debug, Clone, Error)]
pub enum AccountApiError {
    #[error("Database error: {0}")]
    DatabaseError(String),
    #[error("No account exists for resource {0}")]
    AccountNotFound(String),
    #[error("An account already exists for resource {0}")]
    AccountAlreadyExists(String),
}

impl From<sqlx::Error> for AccountApiError {
    fn from(e: sqlx::Error) -> Self {
        AccountApiError::DatabaseError(e.to_string())
    }
}

/// The `AccountManagement` trait defines behaviour for managing provisioned accounts.
///
/// An account is one provisioned instance of the add-on, keyed by the resource identifier the marketplace
/// generated for it. The marketplace owns the lifecycle: accounts are created by provisioning webhooks, marked
/// suspended/reactivated by notifications, and marked deprovisioned (never deleted) by deprovisioning webhooks.
#[allow(async_fn_in_trait)]
pub trait AccountManagement {
    /// Creates a new account with the given license key. Fails with [`AccountApiError::AccountAlreadyExists`] if
    /// the resource has been provisioned before.
    async fn create_account(&self, account: &NewAccount, license_key: &str) -> Result<Account, AccountApiError>;

    /// Fetches the account for the given resource. If no account exists, `None` is returned.
    async fn fetch_account(&self, resource_id: &str) -> Result<Option<Account>, AccountApiError>;

    /// Sets the lifecycle status for the given resource. Fails with [`AccountApiError::AccountNotFound`] if no
    /// account exists.
    async fn set_account_status(&self, resource_id: &str, status: AccountStatus) -> Result<(), AccountApiError>;

    /// Replaces the plan slug for the given resource. Fails with [`AccountApiError::AccountNotFound`] if no
    /// account exists.
    async fn update_plan(&self, resource_id: &str, plan_slug: &str) -> Result<(), AccountApiError>;

    /// Replaces the license key for the given resource.
    async fn update_license_key(&self, resource_id: &str, license_key: &str) -> Result<(), AccountApiError>;
}
