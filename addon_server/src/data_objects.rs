//! Wire formats for the marketplace webhooks and the vendor front-end endpoints.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;

//--------------------------------------     Provisioning      ---------------------------------------------------

/// The body of a marketplace provisioning webhook, sent when a user adds the add-on to their account.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProvisioningRequest {
    /// The add-on slug the user selected, as registered with the marketplace.
    pub app_slug: String,
    /// The plan slug the user selected.
    pub plan_slug: String,
    /// The marketplace-generated identifier for this specific resource.
    #[serde(rename = "uuid")]
    pub resource_uuid: String,
    pub metadata: ProvisioningMetadata,
    /// An obfuscated relay address for the user. Mail sent to it is forwarded to the user.
    pub email: String,
    /// An obfuscated identifier for the user's team. Stable across multiple resources provisioned by the same
    /// team.
    #[serde(rename = "creator_id")]
    pub team_id: String,
    /// A single-use authorization code, to be exchanged for an access/refresh token pair.
    pub oauth_grant: OauthGrant,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProvisioningMetadata {
    pub language: String,
    pub email_preference: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OauthGrant {
    #[serde(rename = "type")]
    pub code_type: String,
    pub code: String,
    pub expires_at: i64,
}

/// What the marketplace expects back from a successful provisioning call.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProvisioningResponse {
    /// An immutable value the marketplace will use to reference this resource. We echo the resource uuid.
    pub id: String,
    /// The config values (the license key) displayed to the user on the marketplace side.
    pub config: ProvisioningConfig,
    pub message: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProvisioningConfig {
    #[serde(rename = "LICENSE_KEY")]
    pub license_key: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlanChangeRequest {
    pub plan_slug: String,
}

//--------------------------------------     Notifications     ---------------------------------------------------

/// The outer shape shared by all marketplace notifications. The `payload` field is a JSON document *as a string*,
/// whose shape depends on `kind`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NotificationEnvelope {
    #[serde(rename = "type")]
    pub kind: String,
    pub created_at: i64,
    pub payload: String,
}

/// A marketplace notification with its payload decoded according to its type.
#[derive(Debug, Clone)]
pub enum Notification {
    /// The listed resources have been suspended (overdue billing and the like).
    Suspended(ResourceListPayload),
    /// Previously suspended resources are back in good standing.
    Reactivated(ResourceListPayload),
    /// A deprovisioning request for the listed resources failed on the marketplace side.
    DeprovisioningFailed(ResourceListPayload),
    /// A resource's information or plan changed.
    Updated(UpdatedPayload),
    /// A type this gateway does not know about. Kept so callers can decide how loudly to complain.
    Unrecognized { kind: String },
}

impl Notification {
    pub const DEPROVISIONING_FAILED: &'static str = "resources.deprovisioning.failed";
    pub const REACTIVATED: &'static str = "resources.reactivated";
    pub const SUSPENDED: &'static str = "resources.suspended";
    pub const UPDATED: &'static str = "resources.updated";

    /// Decodes the envelope's payload string according to its declared type. Unknown types decode successfully
    /// into [`Notification::Unrecognized`]; a payload that does not match its declared type is an error.
    pub fn parse(envelope: &NotificationEnvelope) -> Result<Self, serde_json::Error> {
        let notification = match envelope.kind.as_str() {
            Self::SUSPENDED => Notification::Suspended(serde_json::from_str(&envelope.payload)?),
            Self::REACTIVATED => Notification::Reactivated(serde_json::from_str(&envelope.payload)?),
            Self::DEPROVISIONING_FAILED => Notification::DeprovisioningFailed(serde_json::from_str(&envelope.payload)?),
            Self::UPDATED => Notification::Updated(serde_json::from_str(&envelope.payload)?),
            other => Notification::Unrecognized { kind: other.to_string() },
        };
        Ok(notification)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ResourceListPayload {
    #[serde(rename = "resources_uuids")]
    pub resource_uuids: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UpdatedPayload {
    pub resource: ResourceState,
    pub plan: PlanState,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ResourceState {
    pub uuid: String,
    pub name: String,
    pub state: String,
    pub created_at: i64,
    pub updated_at: i64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlanState {
    pub display_name: String,
    pub slug: String,
    pub created_at: i64,
    pub updated_at: i64,
}

//--------------------------------------         SSO           ---------------------------------------------------

/// The form the marketplace posts when a logged-in user clicks through to the add-on's dashboard.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SsoRequest {
    pub resource_uuid: String,
    /// Hex-encoded HMAC over `{timestamp}:{resource_uuid}`, keyed with the registration salt.
    pub token: String,
    /// Unix epoch seconds at which the marketplace signed the request.
    pub timestamp: String,
    pub user_email: String,
    pub user_id: String,
}

//--------------------------------------   Front-end endpoints  --------------------------------------------------

/// Sent by the front-end to log a user in: the session token it was handed via the SSO redirect.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuthorizeRequest {
    pub secret: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuthorizeResponse {
    /// A currently-valid platform access token for this resource.
    pub access_token: String,
    pub email: String,
    pub app_slug: String,
    pub plan_slug: String,
    pub created_at: DateTime<Utc>,
    pub modified_at: DateTime<Utc>,
    pub resource_uuid: String,
    pub message: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ActivitiesQuery {
    pub resource_uuid: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConfigChangeQuery {
    pub uuid: String,
}

//--------------------------------------   Generic responses    --------------------------------------------------

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JsonResponse {
    pub success: bool,
    pub message: Value,
}

impl JsonResponse {
    pub fn success<T: Serialize>(message: T) -> Self {
        let message = serde_json::to_value(message).unwrap_or_else(|e| Value::String(format!("JSON error: {e}")));
        Self { success: true, message }
    }

    pub fn failure<S: Into<String>>(message: S) -> Self {
        Self { success: false, message: Value::String(message.into()) }
    }
}
