use log::debug;
use rand::RngCore;

use crate::{
    db_types::{Account, AccountStatus, Activity, NewAccount, NewActivity},
    traits::{AccountApiError, AccountManagement, ActivityManagement},
};

/// Generates a fresh license key: 32 hex characters from the thread RNG.
///
/// License keys are the example config value the gateway hands to the platform at provisioning and rotates on
/// demand. They carry no structure; uniqueness is all that matters.
pub fn new_license_key() -> String {
    let mut bytes = [0u8; 16];
    rand::thread_rng().fill_bytes(&mut bytes);
    hex::encode(bytes)
}

/// The `AccountApi` provides the account and activity functionality the webhook handlers drive. It wraps a
/// backend implementing [`AccountManagement`] and [`ActivityManagement`].
#[derive(Clone)]
pub struct AccountApi<B> {
    db: B,
}

impl<B> AccountApi<B>
where B: AccountManagement + ActivityManagement
{
    pub fn new(db: B) -> Self {
        Self { db }
    }

    /// Creates the account for a freshly provisioned resource and assigns it a new license key.
    pub async fn provision_account(&self, account: &NewAccount) -> Result<Account, AccountApiError> {
        let license_key = new_license_key();
        let account = self.db.create_account(account, &license_key).await?;
        debug!("🗃️ Account for resource {} has been saved with id {}", account.resource_id, account.id);
        Ok(account)
    }

    /// Marks the resource as deprovisioned. The record stays behind for auditing.
    pub async fn deprovision_account(&self, resource_id: &str) -> Result<(), AccountApiError> {
        self.db.set_account_status(resource_id, AccountStatus::Deprovisioned).await
    }

    pub async fn change_plan(&self, resource_id: &str, plan_slug: &str) -> Result<(), AccountApiError> {
        self.db.update_plan(resource_id, plan_slug).await
    }

    pub async fn set_account_status(&self, resource_id: &str, status: AccountStatus) -> Result<(), AccountApiError> {
        self.db.set_account_status(resource_id, status).await
    }

    pub async fn account(&self, resource_id: &str) -> Result<Option<Account>, AccountApiError> {
        self.db.fetch_account(resource_id).await
    }

    /// Replaces the license key for the resource and returns the new value, so the caller can push it to the
    /// platform's config endpoint.
    pub async fn rotate_license_key(&self, resource_id: &str) -> Result<String, AccountApiError> {
        let license_key = new_license_key();
        self.db.update_license_key(resource_id, &license_key).await?;
        Ok(license_key)
    }

    pub async fn record_activity(&self, activity: &NewActivity) -> Result<(), AccountApiError> {
        self.db.record_activity(activity).await
    }

    pub async fn activities(&self, resource_id: Option<&str>) -> Result<Vec<Activity>, AccountApiError> {
        self.db.fetch_activities(resource_id).await
    }
}
