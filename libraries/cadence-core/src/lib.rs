//! Cadence Core
//!
//! Platform-agnostic core types, service traits, and error handling for Cadence.
//!
//! This crate provides the foundational building blocks shared by the catalog
//! client, the storage adapters, and the player state manager.
//!
//! # Architecture
//!
//! The core crate defines:
//! - **Domain Types**: `Track`, `QueueEntry`, `RepeatMode`, catalog summaries
//! - **Service Traits**: `KeyValueStore` (persistence), `DownloadManager` (offline files)
//! - **Error Handling**: Unified `CadenceError` and `Result` types
//!
//! # Example
//!
//! ```rust
//! use cadence_core::{QueueEntry, RepeatMode, Track};
//!
//! let track = Track::new("yDeAS8Eh", "Tum Hi Ho");
//! let first = QueueEntry::new(track.clone());
//! let second = QueueEntry::new(track);
//!
//! // The same track can sit in the queue twice without key collisions
//! assert_ne!(first.queue_id, second.queue_id);
//! assert_eq!("all".parse::<RepeatMode>().ok(), Some(RepeatMode::All));
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]

pub mod error;
pub mod keys;
pub mod storage;
pub mod types;

// Re-export commonly used types
pub use error::{CadenceError, Result};
pub use storage::{DownloadManager, KeyValueStore, KeyValueStoreExt};

pub use types::{
    AlbumRef, AlbumSummary, ArtistRef, ArtistSummary, DownloadedTrack, MediaLink, PlaylistDetail,
    PlaylistSummary, QueueEntry, RepeatMode, Track, TrackArtists,
};
