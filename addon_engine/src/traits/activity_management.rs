use crate::{
    db_types::{Activity, NewActivity},
    traits::AccountApiError,
};

/// Behaviour for the activity log. Platform notifications are recorded as activities against the account they
/// refer to, giving operators an audit trail of what the marketplace told us and when.
#[allow(async_fn_in_trait)]
pub trait ActivityManagement {
    /// Records an activity against the account owning `activity.resource_id`. Fails with
    /// [`AccountApiError::AccountNotFound`] if the resource was never provisioned.
    async fn record_activity(&self, activity: &NewActivity) -> Result<(), AccountApiError>;

    /// Fetches activities, newest first. When `resource_id` is given, only that resource's activities are
    /// returned.
    async fn fetch_activities(&self, resource_id: Option<&str>) -> Result<Vec<Activity>, AccountApiError>;
}
