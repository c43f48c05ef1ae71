//! # Database and transport contracts
//!
//! This module defines the interface contracts that backends of the add-on gateway engine must expose.
//!
//! * [`AccountManagement`] covers the account lifecycle driven by marketplace webhooks (provision, deprovision,
//!   plan changes, suspension state).
//! * [`ActivityManagement`] records platform notifications as an audit trail against accounts.
//! * [`TokenStore`] persists the per-resource OAuth access/refresh token records. The store is the single source of
//!   truth for token state; nothing in the engine caches tokens across requests.
//! * [`TokenExchange`] abstracts the platform token endpoint (code exchange and refresh), so the engine never
//!   carries an HTTP client of its own.

mod account_management;
mod activity_management;
mod token_exchange;
mod token_store;

pub use account_management::{AccountApiError, AccountManagement};
pub use activity_management::ActivityManagement;
pub use token_exchange::{TokenExchange, TokenExchangeError};
pub use token_store::{TokenStore, TokenStoreError};
