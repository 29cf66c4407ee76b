/// Storage-specific errors
use cadence_core::CadenceError;
use thiserror::Error;

/// Result type alias using `StorageError`
pub type Result<T> = std::result::Result<T, StorageError>;

/// Storage error types
#[derive(Error, Debug)]
pub enum StorageError {
    /// Track carries no stream variant that could be downloaded
    #[error("No download URL available for track {track_id}")]
    NoDownloadUrl { track_id: String },

    /// Download server answered with a non-success status
    #[error("Download failed ({status}) for {url}")]
    HttpStatus { status: u16, url: String },

    /// HTTP transport error
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// Serialization/deserialization error
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Error bubbled up from an injected store
    #[error(transparent)]
    Store(#[from] CadenceError),

    /// I/O error
    #[error(transparent)]
    Io(#[from] std::io::Error),
}

impl From<StorageError> for CadenceError {
    fn from(err: StorageError) -> Self {
        match err {
            StorageError::Store(inner) => inner,
            StorageError::Io(e) => CadenceError::Io(e),
            StorageError::NoDownloadUrl { .. } => CadenceError::invalid_input(err.to_string()),
            StorageError::Http(_) | StorageError::HttpStatus { .. } => {
                CadenceError::network(err.to_string())
            }
            StorageError::Serialization(_) => CadenceError::storage(err.to_string()),
        }
    }
}
