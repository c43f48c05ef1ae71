pub mod sso_signature;

pub use sso_signature::{sign_sso_message, SsoSignatureError, SsoValidator};
