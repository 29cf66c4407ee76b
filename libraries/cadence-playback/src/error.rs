//! Error types for the player

use crate::engine::EngineError;
use cadence_core::CadenceError;
use thiserror::Error;

/// Player errors
#[derive(Debug, Error)]
pub enum PlayerError {
    /// Track has neither a local download nor a usable stream URL
    #[error("No playable source for track {track_id}")]
    NoPlayableSource { track_id: String },

    /// Engine rejected create/play/pause/seek/volume
    #[error("Engine operation failed: {0}")]
    EngineOperationFailed(#[from] EngineError),

    /// Persistence adapter read or write failed
    #[error("Persistence failed: {0}")]
    PersistenceFailed(#[from] CadenceError),

    /// Index out of bounds
    #[error("Index {index} out of bounds for queue of length {len}")]
    IndexOutOfBounds { index: usize, len: usize },

    /// Invalid operation
    #[error("Invalid operation: {0}")]
    InvalidOperation(String),

    /// The player task has stopped
    #[error("Player session is closed")]
    SessionClosed,
}

/// Result type for player operations
pub type Result<T> = std::result::Result<T, PlayerError>;
