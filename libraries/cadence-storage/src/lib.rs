//! Cadence Storage
//!
//! Implementations of the `cadence-core` persistence and download traits.
//!
//! - [`MemoryStore`]: in-process key/value store for tests and throwaway sessions
//! - [`JsonFileStore`]: a single JSON document on disk, rewritten atomically
//! - [`FileDownloadManager`]: streams track audio into a local directory and
//!   keeps an index of what is available offline

mod downloads;
mod error;
mod file_store;
mod memory;

pub use downloads::FileDownloadManager;
pub use error::{Result, StorageError};
pub use file_store::JsonFileStore;
pub use memory::MemoryStore;
