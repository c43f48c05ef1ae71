//! SQLite operations for the accounts table.
//!
//! Clients should not call these directly; the [`AccountManagement`](crate::traits::AccountManagement)
//! implementation on [`SqliteDatabase`](crate::SqliteDatabase) is the public surface.

use sqlx::SqliteConnection;

use crate::{
    db_types::{Account, AccountStatus, NewAccount},
    traits::AccountApiError,
};

pub async fn insert_account(
    account: &NewAccount,
    license_key: &str,
    conn: &mut SqliteConnection,
) -> Result<Account, AccountApiError> {
    let result = sqlx::query_as::<_, Account>(
        r#"INSERT INTO accounts
           (resource_id, team_id, email, app_slug, plan_slug, language, email_preference, status, license_key)
           VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?)
           RETURNING *"#,
    )
    .bind(&account.resource_id)
    .bind(&account.team_id)
    .bind(&account.email)
    .bind(&account.app_slug)
    .bind(&account.plan_slug)
    .bind(&account.language)
    .bind(account.email_preference)
    .bind(AccountStatus::Active)
    .bind(license_key)
    .fetch_one(conn)
    .await;
    result.map_err(|e| match &e {
        sqlx::Error::Database(de) if de.is_unique_violation() => {
            AccountApiError::AccountAlreadyExists(account.resource_id.clone())
        },
        _ => AccountApiError::from(e),
    })
}

pub async fn fetch_account_by_resource_id(
    resource_id: &str,
    conn: &mut SqliteConnection,
) -> Result<Option<Account>, AccountApiError> {
    let account = sqlx::query_as::<_, Account>("SELECT * FROM accounts WHERE resource_id = ?")
        .bind(resource_id)
        .fetch_optional(conn)
        .await?;
    Ok(account)
}

pub async fn set_status(
    resource_id: &str,
    status: AccountStatus,
    conn: &mut SqliteConnection,
) -> Result<(), AccountApiError> {
    let result = sqlx::query("UPDATE accounts SET status = ?, updated_at = CURRENT_TIMESTAMP WHERE resource_id = ?")
        .bind(status)
        .bind(resource_id)
        .execute(conn)
        .await?;
    if result.rows_affected() == 0 {
        return Err(AccountApiError::AccountNotFound(resource_id.to_string()));
    }
    Ok(())
}

pub async fn update_plan(
    resource_id: &str,
    plan_slug: &str,
    conn: &mut SqliteConnection,
) -> Result<(), AccountApiError> {
    let result =
        sqlx::query("UPDATE accounts SET plan_slug = ?, updated_at = CURRENT_TIMESTAMP WHERE resource_id = ?")
            .bind(plan_slug)
            .bind(resource_id)
            .execute(conn)
            .await?;
    if result.rows_affected() == 0 {
        return Err(AccountApiError::AccountNotFound(resource_id.to_string()));
    }
    Ok(())
}

pub async fn update_license_key(
    resource_id: &str,
    license_key: &str,
    conn: &mut SqliteConnection,
) -> Result<(), AccountApiError> {
    let result =
        sqlx::query("UPDATE accounts SET license_key = ?, updated_at = CURRENT_TIMESTAMP WHERE resource_id = ?")
            .bind(license_key)
            .bind(resource_id)
            .execute(conn)
            .await?;
    if result.rows_affected() == 0 {
        return Err(AccountApiError::AccountNotFound(resource_id.to_string()));
    }
    Ok(())
}
