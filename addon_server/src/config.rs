use std::env;

use aog_common::Secret;
use log::*;
use marketplace_tools::MarketplaceConfig;

const DEFAULT_AOG_HOST: &str = "127.0.0.1";
const DEFAULT_AOG_PORT: u16 = 8082;

#[derive(Clone, Debug)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    pub database_url: String,
    /// The unique name given to the add-on at registration. The platform uses it as the basic-auth username on
    /// every webhook call.
    pub app_slug: String,
    /// The basic-auth password the platform was issued for webhook calls.
    pub app_password: Secret<String>,
    /// The shared salt issued at registration. It keys both the SSO HMAC check and the session tokens handed to
    /// the front-end.
    pub app_salt: Secret<String>,
    /// Where to redirect users after a successful SSO login.
    pub app_homepage: String,
    /// Connection settings for the platform's vendor API (token and config endpoints).
    pub marketplace: MarketplaceConfig,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: DEFAULT_AOG_HOST.to_string(),
            port: DEFAULT_AOG_PORT,
            database_url: String::default(),
            app_slug: "sample-add-on".to_string(),
            app_password: Secret::default(),
            app_salt: Secret::default(),
            app_homepage: String::default(),
            marketplace: MarketplaceConfig::default(),
        }
    }
}

impl ServerConfig {
    pub fn new(host: &str, port: u16) -> Self {
        Self { host: host.to_string(), port, ..Default::default() }
    }

    pub fn from_env_or_default() -> Self {
        let host = env::var("AOG_HOST").ok().unwrap_or_else(|| DEFAULT_AOG_HOST.into());
        let port = env::var("AOG_PORT")
            .map(|s| {
                s.parse::<u16>().unwrap_or_else(|e| {
                    error!("🪛️ {s} is not a valid port for AOG_PORT. {e} Using the default, {DEFAULT_AOG_PORT}, instead.");
                    DEFAULT_AOG_PORT
                })
            })
            .ok()
            .unwrap_or(DEFAULT_AOG_PORT);
        let database_url = env::var("AOG_DATABASE_URL").ok().unwrap_or_else(|| {
            warn!("🪛️ AOG_DATABASE_URL is not set. The default SQLite database location will be used.");
            String::default()
        });
        let app_slug = env::var("AOG_APP_SLUG").ok().unwrap_or_else(|| {
            warn!("🪛️ AOG_APP_SLUG is not set. Using the default, 'sample-add-on'.");
            "sample-add-on".to_string()
        });
        let app_password = Secret::new(env::var("AOG_APP_PASSWORD").ok().unwrap_or_else(|| {
            error!(
                "🪛️ AOG_APP_PASSWORD is not set. The server will run, but won't authorise any incoming marketplace \
                 webhooks."
            );
            String::default()
        }));
        let app_salt = Secret::new(env::var("AOG_APP_SALT").ok().unwrap_or_else(|| {
            error!(
                "🚨️ AOG_APP_SALT is not set. SSO logins and session tokens cannot be verified without it. Set it to \
                 the salt issued when the add-on was registered."
            );
            String::default()
        }));
        let app_homepage = env::var("AOG_APP_HOMEPAGE").ok().unwrap_or_else(|| {
            warn!("🪛️ AOG_APP_HOMEPAGE is not set. SSO redirects will point at an empty URL.");
            String::default()
        });
        let marketplace = MarketplaceConfig::from_env_or_default();
        Self { host, port, database_url, app_slug, app_password, app_salt, app_homepage, marketplace }
    }
}

/// A subset of the server configuration that handlers need at request time. Kept small, and excludes secrets, so
/// it can be cloned into the app data without passing sensitive information around the system.
#[derive(Clone, Debug, Default)]
pub struct ServerOptions {
    pub app_homepage: String,
}

impl ServerOptions {
    pub fn from_config(config: &ServerConfig) -> Self {
        Self { app_homepage: config.app_homepage.clone() }
    }
}
