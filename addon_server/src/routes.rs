//! Request handler definitions
//!
//! The marketplace-facing webhooks (provisioning, deprovisioning, plan changes, notifications and SSO) live under
//! the `/marketplace` scope and are registered behind the basic-auth middleware in
//! [server](crate::server). The remaining handlers are the vendor endpoints the front-end calls directly.
//!
//! Actix cannot register generic functions directly, so the generic handlers here get their concrete backend
//! types at registration time (see [`create_server_instance`](crate::server::create_server_instance)).

use actix_web::{get, web, HttpResponse, Responder};
use addon_engine::{
    db_types::{AccountStatus, NewAccount, NewActivity},
    helpers::SsoValidator,
    traits::{AccountApiError, AccountManagement, ActivityManagement, TokenExchange, TokenStore},
    AccountApi,
    OAuthTokenBroker,
};
use log::*;
use marketplace_tools::{MarketplaceApi, ResourceConfig};

use crate::{
    auth::SessionTokenIssuer,
    config::ServerOptions,
    data_objects::{
        ActivitiesQuery,
        AuthorizeRequest,
        AuthorizeResponse,
        ConfigChangeQuery,
        JsonResponse,
        Notification,
        NotificationEnvelope,
        PlanChangeRequest,
        ProvisioningConfig,
        ProvisioningRequest,
        ProvisioningResponse,
        SsoRequest,
    },
    errors::ServerError,
};

#[get("/health")]
pub async fn health() -> impl Responder {
    trace!("💻️ Received health check request");
    HttpResponse::Ok().body("👍️\n")
}

//--------------------------------------  Marketplace webhooks  --------------------------------------------------

/// Route handler for the provisioning webhook, sent when a user adds the add-on to their account.
///
/// Creates the account, answers with the resource's config (its license key), and exchanges the attached
/// authorization code for a token pair. A failed code exchange is logged but deliberately non-fatal: the broker
/// obtains the pair lazily the first time an access token is needed.
pub async fn provision<B, X>(
    body: web::Json<ProvisioningRequest>,
    api: web::Data<AccountApi<B>>,
    broker: web::Data<OAuthTokenBroker<B, X>>,
) -> Result<HttpResponse, ServerError>
where
    B: AccountManagement + ActivityManagement + TokenStore + 'static,
    X: TokenExchange + 'static,
{
    let req = body.into_inner();
    info!("🏪️ Provisioning request for resource {}", req.resource_uuid);
    let new_account = NewAccount {
        resource_id: req.resource_uuid.clone(),
        team_id: req.team_id,
        email: req.email,
        app_slug: req.app_slug,
        plan_slug: req.plan_slug,
        language: req.metadata.language,
        email_preference: req.metadata.email_preference,
    };
    let account = api.provision_account(&new_account).await?;
    if let Err(e) = broker.exchange_code(&account.resource_id, &req.oauth_grant.code).await {
        warn!(
            "🏪️ Authorization code exchange for resource {} failed. The token pair will be fetched lazily on first \
             use. {e}",
            account.resource_id
        );
    }
    let response = ProvisioningResponse {
        id: account.resource_id,
        config: ProvisioningConfig { license_key: account.license_key },
        message: "Account provisioning succeeded!".to_string(),
    };
    Ok(HttpResponse::Ok().json(response))
}

/// Route handler for the deprovisioning webhook, sent when a user removes the add-on from their account.
///
/// The account record is kept and marked deprovisioned. An unknown resource is a 404.
pub async fn deprovision<B>(
    path: web::Path<String>,
    api: web::Data<AccountApi<B>>,
) -> Result<HttpResponse, ServerError>
where
    B: AccountManagement + ActivityManagement + 'static,
{
    let resource_id = path.into_inner();
    info!("🏪️ Deprovisioning request for resource {resource_id}");
    api.deprovision_account(&resource_id).await?;
    Ok(HttpResponse::Ok().finish())
}

/// Route handler for the plan change webhook.
pub async fn plan_change<B>(
    path: web::Path<String>,
    body: web::Json<PlanChangeRequest>,
    api: web::Data<AccountApi<B>>,
) -> Result<HttpResponse, ServerError>
where
    B: AccountManagement + ActivityManagement + 'static,
{
    let resource_id = path.into_inner();
    info!("🏪️ Plan change request for resource {resource_id}");
    api.change_plan(&resource_id, &body.plan_slug).await?;
    Ok(HttpResponse::NoContent().finish())
}

/// Route handler for marketplace notifications.
///
/// Every notification is recorded against the affected accounts as an activity. Suspension and reactivation
/// notifications also flip the account status. An unrecognized notification type, or a payload that does not
/// match its declared type, is a 422.
pub async fn notifications<B>(
    body: web::Json<NotificationEnvelope>,
    api: web::Data<AccountApi<B>>,
) -> Result<HttpResponse, ServerError>
where
    B: AccountManagement + ActivityManagement + 'static,
{
    let envelope = body.into_inner();
    info!("🏪️ Notification of type {}", envelope.kind);
    let notification = Notification::parse(&envelope)
        .map_err(|e| ServerError::CouldNotProcess(format!("The notification payload could not be parsed. {e}")))?;
    let (resource_ids, new_status) = match &notification {
        Notification::Suspended(p) => (p.resource_uuids.clone(), Some(AccountStatus::Suspended)),
        Notification::Reactivated(p) => (p.resource_uuids.clone(), Some(AccountStatus::Active)),
        Notification::DeprovisioningFailed(p) => (p.resource_uuids.clone(), None),
        Notification::Updated(p) => (vec![p.resource.uuid.clone()], None),
        Notification::Unrecognized { kind } => {
            return Err(ServerError::CouldNotProcess(format!("Unrecognized notification type: {kind}")));
        },
    };
    // Domain failures (e.g. an unknown resource) are collected and reported in the 422 body. A storage failure
    // is a server fault and must not surface its detail to the caller.
    let mut failures = Vec::new();
    for resource_id in &resource_ids {
        if let Some(status) = new_status {
            match api.set_account_status(resource_id, status).await {
                Err(e @ AccountApiError::DatabaseError(_)) => return Err(e.into()),
                Err(e) => {
                    warn!("🏪️ Could not set resource {resource_id} to {status}. {e}");
                    failures.push(e.to_string());
                    continue;
                },
                Ok(()) => {},
            }
        }
        let activity = NewActivity::new(resource_id.clone(), envelope.kind.clone(), envelope.payload.clone());
        match api.record_activity(&activity).await {
            Err(e @ AccountApiError::DatabaseError(_)) => return Err(e.into()),
            Err(e) => {
                warn!("🏪️ Could not record activity for resource {resource_id}. {e}");
                failures.push(e.to_string());
            },
            Ok(()) => {},
        }
    }
    if failures.is_empty() {
        Ok(HttpResponse::Ok().finish())
    } else {
        Err(ServerError::CouldNotProcess(format!("Errors occurred: {}", failures.join("; "))))
    }
}

/// Route handler for platform-initiated SSO, posted when a logged-in marketplace user clicks through to the
/// add-on's dashboard.
///
/// The marketplace proves the login with an HMAC over the request timestamp and resource id, keyed with the
/// registration salt. A valid request is answered with a 307 redirect to the front-end carrying a short-lived
/// session token; a stale or forged one gets a bare 401.
pub async fn sso(
    form: web::Form<SsoRequest>,
    validator: web::Data<SsoValidator>,
    issuer: web::Data<SessionTokenIssuer>,
    options: web::Data<ServerOptions>,
) -> Result<HttpResponse, ServerError> {
    let req = form.into_inner();
    info!("💻️ SSO request for resource {}", req.resource_uuid);
    let authorized = validator.validate(&req.token, &req.timestamp, &req.resource_uuid)?;
    if !authorized {
        return Err(ServerError::Unauthorized);
    }
    let token = issuer.issue(&req.resource_uuid)?;
    let location = format!("{}?secret={token}", options.app_homepage);
    Ok(HttpResponse::TemporaryRedirect().insert_header(("Location", location)).finish())
}

//--------------------------------------   Vendor endpoints    ---------------------------------------------------

/// Route handler for the front-end's half of an SSO login.
///
/// The front-end presents the session token it received in the redirect. A valid, unexpired token is answered
/// with the account details and a currently-valid platform access token for the resource.
pub async fn authorize<B, X>(
    body: web::Json<AuthorizeRequest>,
    api: web::Data<AccountApi<B>>,
    broker: web::Data<OAuthTokenBroker<B, X>>,
    issuer: web::Data<SessionTokenIssuer>,
) -> Result<HttpResponse, ServerError>
where
    B: AccountManagement + ActivityManagement + TokenStore + 'static,
    X: TokenExchange + 'static,
{
    let claims = issuer.validate(&body.secret)?;
    let resource_id = claims.sub;
    debug!("💻️ Session token for resource {resource_id} verified");
    let account = api
        .account(&resource_id)
        .await?
        .ok_or_else(|| ServerError::NoRecordFound(format!("No account for resource {resource_id}.")))?;
    let access_token = broker.access_token(&resource_id).await?;
    let response = AuthorizeResponse {
        access_token,
        email: account.email,
        app_slug: account.app_slug,
        plan_slug: account.plan_slug,
        created_at: account.created_at,
        modified_at: account.updated_at,
        resource_uuid: account.resource_id,
        message: "Welcome to your dashboard!".to_string(),
    };
    Ok(HttpResponse::Ok().json(response))
}

/// Route handler for the activity listing, newest first. Pass `resource_uuid` to filter to one resource.
pub async fn activities<B>(
    query: web::Query<ActivitiesQuery>,
    api: web::Data<AccountApi<B>>,
) -> Result<HttpResponse, ServerError>
where
    B: AccountManagement + ActivityManagement + 'static,
{
    let activities = api.activities(query.resource_uuid.as_deref()).await?;
    Ok(HttpResponse::Ok().json(activities))
}

/// Route handler for config changes. Rotates the resource's license key and pushes the new value to the
/// platform's config endpoint, which requires a valid access token for the resource.
pub async fn change_config<B, X>(
    query: web::Query<ConfigChangeQuery>,
    api: web::Data<AccountApi<B>>,
    broker: web::Data<OAuthTokenBroker<B, X>>,
    marketplace: web::Data<MarketplaceApi>,
) -> Result<HttpResponse, ServerError>
where
    B: AccountManagement + ActivityManagement + TokenStore + 'static,
    X: TokenExchange + 'static,
{
    let resource_id = &query.uuid;
    info!("💻️ Config change request for resource {resource_id}");
    let license_key = api.rotate_license_key(resource_id).await?;
    let access_token = broker.access_token(resource_id).await?;
    marketplace.update_resource_config(resource_id, &access_token, ResourceConfig { license_key }).await?;
    Ok(HttpResponse::Ok().json(JsonResponse::success("Config update accepted.")))
}
