/// CLI error types
use cadence_catalog::CatalogError;
use cadence_core::CadenceError;
use cadence_playback::PlayerError;
use cadence_storage::StorageError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum CliError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Track not found: {0}")]
    TrackNotFound(String),

    #[error(transparent)]
    Catalog(#[from] CatalogError),

    #[error(transparent)]
    Storage(#[from] StorageError),

    #[error(transparent)]
    Player(#[from] PlayerError),

    #[error(transparent)]
    Core(#[from] CadenceError),
}

impl From<config::ConfigError> for CliError {
    fn from(err: config::ConfigError) -> Self {
        Self::Config(err.to_string())
    }
}

pub type Result<T> = std::result::Result<T, CliError>;
