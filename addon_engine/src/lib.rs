//! # Add-on gateway engine
//!
//! This library contains the storage and token-lifecycle core of the add-on gateway. It is web-framework agnostic
//! and holds no HTTP client of its own.
//!
//! The library is divided into three main sections:
//! 1. Database contracts and control ([`traits`] and the SQLite backend). Callers should never need to touch the
//!    database directly; the data types live in [`db_types`] and are public.
//! 2. The engine public API ([`mod@api`]). [`AccountApi`] covers the account/activity lifecycle that marketplace
//!    webhooks drive, and [`OAuthTokenBroker`] owns the access/refresh token cache, including lazy renewal against
//!    the platform token endpoint (abstracted behind [`traits::TokenExchange`]).
//! 3. Helpers ([`mod@helpers`]), most importantly the HMAC validation of platform-initiated SSO requests.

pub mod db_types;
pub mod helpers;

mod api;
mod sqlite;
pub mod traits;

pub use api::{
    accounts_api::AccountApi,
    token_broker::{OAuthTokenBroker, TokenBrokerError},
};
pub use sqlite::SqliteDatabase;
