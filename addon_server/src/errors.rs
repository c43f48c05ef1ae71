use actix_web::{http::StatusCode, HttpResponse, ResponseError};
use addon_engine::{
    helpers::SsoSignatureError,
    traits::{AccountApiError, TokenExchangeError, TokenStoreError},
    TokenBrokerError,
};
use log::*;
use marketplace_tools::MarketplaceApiError;
use serde_json::json;
use thiserror::Error;

use crate::auth::AuthError;

#[derive(Debug, Error)]
pub enum ServerError {
    #[error("Could not initialize server. {0}")]
    InitializeError(String),
    #[error("An error occurred on the backend of the server. {0}")]
    BackendError(String),
    #[error("Could not read the request body. {0}")]
    InvalidRequestBody(String),
    #[error("The request was malformed. {0}")]
    MalformedInput(String),
    #[error("Unauthorized.")]
    Unauthorized,
    #[error("Authentication error. {0}")]
    AuthenticationError(#[from] AuthError),
    #[error("The requested record was not found. {0}")]
    NoRecordFound(String),
    #[error("The request could not be processed. {0}")]
    CouldNotProcess(String),
    #[error("The request to the platform API failed. {0}")]
    UpstreamError(String),
    #[error("An I/O error happened in the server. {0}")]
    IOError(#[from] std::io::Error),
}

impl ResponseError for ServerError {
    fn status_code(&self) -> StatusCode {
        match self {
            ServerError::InvalidRequestBody(_) | ServerError::MalformedInput(_) => StatusCode::BAD_REQUEST,
            ServerError::Unauthorized | ServerError::AuthenticationError(_) => StatusCode::UNAUTHORIZED,
            ServerError::NoRecordFound(_) => StatusCode::NOT_FOUND,
            ServerError::CouldNotProcess(_) => StatusCode::UNPROCESSABLE_ENTITY,
            ServerError::UpstreamError(_) => StatusCode::BAD_GATEWAY,
            ServerError::InitializeError(_) | ServerError::BackendError(_) | ServerError::IOError(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            },
        }
    }

    fn error_response(&self) -> HttpResponse {
        let status = self.status_code();
        // Never tell callers *why* authentication failed.
        if status == StatusCode::UNAUTHORIZED {
            debug!("🚨️ Rejecting request. {self}");
            return HttpResponse::Unauthorized().finish();
        }
        if status.is_server_error() || status == StatusCode::BAD_GATEWAY {
            error!("💀️ {self}");
            return HttpResponse::build(status).json(json!({"error": "An internal error occurred."}));
        }
        HttpResponse::build(status).json(json!({"error": self.to_string()}))
    }
}

impl From<AccountApiError> for ServerError {
    fn from(e: AccountApiError) -> Self {
        match e {
            AccountApiError::AccountNotFound(id) => ServerError::NoRecordFound(format!("No account for resource {id}.")),
            AccountApiError::AccountAlreadyExists(id) => {
                ServerError::CouldNotProcess(format!("Resource {id} has already been provisioned."))
            },
            AccountApiError::DatabaseError(e) => ServerError::BackendError(e),
        }
    }
}

impl From<TokenBrokerError> for ServerError {
    fn from(e: TokenBrokerError) -> Self {
        match e {
            TokenBrokerError::NoCredentials(id) => {
                ServerError::BackendError(format!("No platform credentials are stored for resource {id}."))
            },
            TokenBrokerError::Store(TokenStoreError::DatabaseError(e)) => ServerError::BackendError(e),
            TokenBrokerError::UpstreamToken(e) => ServerError::UpstreamError(e.to_string()),
        }
    }
}

impl From<TokenExchangeError> for ServerError {
    fn from(e: TokenExchangeError) -> Self {
        ServerError::UpstreamError(e.to_string())
    }
}

impl From<MarketplaceApiError> for ServerError {
    fn from(e: MarketplaceApiError) -> Self {
        ServerError::UpstreamError(e.to_string())
    }
}

impl From<SsoSignatureError> for ServerError {
    fn from(e: SsoSignatureError) -> Self {
        ServerError::MalformedInput(e.to_string())
    }
}
