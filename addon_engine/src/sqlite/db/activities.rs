//! SQLite operations for the activity log.

use sqlx::SqliteConnection;

use crate::{
    db_types::{Activity, NewActivity},
    traits::AccountApiError,
};

pub async fn insert_activity(activity: &NewActivity, conn: &mut SqliteConnection) -> Result<(), AccountApiError> {
    let account_id: Option<i64> = sqlx::query_scalar("SELECT id FROM accounts WHERE resource_id = ?")
        .bind(&activity.resource_id)
        .fetch_optional(&mut *conn)
        .await?;
    let account_id = account_id.ok_or_else(|| AccountApiError::AccountNotFound(activity.resource_id.clone()))?;
    sqlx::query(
        "INSERT INTO activities (account_id, resource_id, source, kind, body) VALUES (?, ?, ?, ?, ?)",
    )
    .bind(account_id)
    .bind(&activity.resource_id)
    .bind(&activity.source)
    .bind(&activity.kind)
    .bind(&activity.body)
    .execute(conn)
    .await?;
    Ok(())
}

pub async fn fetch_activities(
    resource_id: Option<&str>,
    conn: &mut SqliteConnection,
) -> Result<Vec<Activity>, AccountApiError> {
    let activities = match resource_id {
        Some(resource_id) => {
            sqlx::query_as::<_, Activity>(
                "SELECT * FROM activities WHERE resource_id = ? ORDER BY created_at DESC, id DESC",
            )
            .bind(resource_id)
            .fetch_all(conn)
            .await?
        },
        None => {
            sqlx::query_as::<_, Activity>("SELECT * FROM activities ORDER BY created_at DESC, id DESC")
                .fetch_all(conn)
                .await?
        },
    };
    Ok(activities)
}
