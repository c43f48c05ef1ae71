use thiserror::Error;

#[derive(Debug, Clone, Error)]
pub enum MarketplaceApiError {
    #[error("Could not initialize the marketplace API client. {0}")]
    Initialization(String),
    #[error("Could not reach the marketplace API. {0}")]
    Transport(String),
    #[error("The marketplace API returned an error. Status {status}: {message}")]
    QueryError { status: u16, message: String },
    #[error("Could not parse the marketplace API response. {0}")]
    JsonError(String),
}
