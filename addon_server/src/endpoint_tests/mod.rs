mod helpers;

mod auth;
mod sso;
mod vendor;
mod webhooks;
