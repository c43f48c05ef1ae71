pub mod accounts_api;
pub mod token_broker;

pub use token_broker::TokenBrokerError;
