//! Error types for the catalog client.

use cadence_core::CadenceError;
use thiserror::Error;

/// Errors that can occur when talking to the catalog API.
#[derive(Error, Debug)]
pub enum CatalogError {
    /// HTTP request failed
    #[error("HTTP request failed: {0}")]
    Request(#[from] reqwest::Error),

    /// Catalog returned an error status
    #[error("Server error ({status}): {message}")]
    ServerError { status: u16, message: String },

    /// Response arrived but its envelope did not report success
    #[error("Catalog request unsuccessful: {0}")]
    Unsuccessful(String),

    /// Invalid base URL
    #[error("Invalid catalog URL: {0}")]
    InvalidUrl(String),

    /// Failed to parse the response body
    #[error("Failed to parse response: {0}")]
    ParseError(String),

    /// Catalog is offline or unreachable
    #[error("Catalog unreachable: {0}")]
    Unreachable(String),
}

/// Result type for catalog operations.
pub type Result<T> = std::result::Result<T, CatalogError>;

impl From<CatalogError> for CadenceError {
    fn from(err: CatalogError) -> Self {
        match err {
            CatalogError::InvalidUrl(msg) => CadenceError::invalid_input(msg),
            other => CadenceError::network(other.to_string()),
        }
    }
}
