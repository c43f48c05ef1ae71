use std::time::Duration;

use actix_web::{dev::Server, http::KeepAlive, middleware::Logger, web, App, HttpServer};
use addon_engine::{helpers::SsoValidator, AccountApi, OAuthTokenBroker, SqliteDatabase};
use marketplace_tools::MarketplaceApi;

use crate::{
    auth::SessionTokenIssuer,
    config::{ServerConfig, ServerOptions},
    errors::ServerError,
    integrations::PlatformTokenExchange,
    middleware::BasicAuthMiddlewareFactory,
    routes::{activities, authorize, change_config, deprovision, health, notifications, plan_change, provision, sso},
};

pub async fn run_server(config: ServerConfig) -> Result<(), ServerError> {
    // An empty URL means nothing was configured; the engine falls back to its default database location.
    let db = if config.database_url.is_empty() {
        SqliteDatabase::new(25).await
    } else {
        SqliteDatabase::new_with_url(&config.database_url, 25).await
    }
    .map_err(|e| ServerError::InitializeError(e.to_string()))?;
    let srv = create_server_instance(config, db)?;
    srv.await.map_err(|e| ServerError::InitializeError(e.to_string()))
}

pub fn create_server_instance(config: ServerConfig, db: SqliteDatabase) -> Result<Server, ServerError> {
    let marketplace =
        MarketplaceApi::new(config.marketplace.clone()).map_err(|e| ServerError::InitializeError(e.to_string()))?;
    let srv = HttpServer::new(move || {
        let accounts_api = AccountApi::new(db.clone());
        let broker = OAuthTokenBroker::new(db.clone(), PlatformTokenExchange::new(marketplace.clone()));
        let sso_validator = SsoValidator::new(config.app_salt.clone());
        let session_tokens = SessionTokenIssuer::new(&config.app_salt);
        let options = ServerOptions { app_homepage: config.app_homepage.clone() };
        let app = App::new()
            .wrap(Logger::new("%t (%D ms) %s %a %{Host}i %U").log_target("aog::access_log"))
            .app_data(web::Data::new(accounts_api))
            .app_data(web::Data::new(broker))
            .app_data(web::Data::new(sso_validator))
            .app_data(web::Data::new(session_tokens))
            .app_data(web::Data::new(marketplace.clone()))
            .app_data(web::Data::new(options));
        // Everything the marketplace calls sits behind its basic-auth credentials.
        let marketplace_scope = web::scope("/marketplace")
            .wrap(BasicAuthMiddlewareFactory::new(&config.app_slug, config.app_password.clone()))
            .route("/resources", web::post().to(provision::<SqliteDatabase, PlatformTokenExchange>))
            .route("/resources/{resource_uuid}", web::delete().to(deprovision::<SqliteDatabase>))
            .route("/resources/{resource_uuid}", web::put().to(plan_change::<SqliteDatabase>))
            .route("/notifications", web::post().to(notifications::<SqliteDatabase>))
            .route("/sso", web::post().to(sso));
        app.service(marketplace_scope)
            .service(health)
            .route("/authorize", web::post().to(authorize::<SqliteDatabase, PlatformTokenExchange>))
            .route("/activities", web::get().to(activities::<SqliteDatabase>))
            .route("/config", web::post().to(change_config::<SqliteDatabase, PlatformTokenExchange>))
    })
    .keep_alive(KeepAlive::Timeout(Duration::from_secs(600)))
    .bind((config.host.as_str(), config.port))?
    .run();
    Ok(srv)
}
