//! # Add-on gateway server
//!
//! This module hosts the HTTP surface of the add-on gateway. It is responsible for:
//! * Listening for marketplace lifecycle webhooks (provision, deprovision, plan change, notifications) behind the
//!   platform's basic-auth gate.
//! * Handling platform-initiated SSO logins and handing authenticated users to the vendor front-end with a
//!   short-lived session token.
//! * The vendor endpoints the front-end calls: session verification, activity listing and config updates.
//!
//! ## Configuration
//! The server is configured via environment variables. See [config](config/index.html) for more information.

pub mod auth;
pub mod cli;
pub mod config;
pub mod data_objects;
pub mod errors;
pub mod integrations;
pub mod middleware;
pub mod routes;
pub mod server;

#[cfg(test)]
mod endpoint_tests;
