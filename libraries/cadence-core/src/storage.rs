//! Service traits for persistence and offline downloads

use crate::error::Result;
use crate::types::{DownloadedTrack, Track};
use async_trait::async_trait;
use serde::{de::DeserializeOwned, Serialize};

/// String key/value persistence
///
/// Implementations must be safe to share between the player task and UI
/// callers. Absent keys are `Ok(None)`, never an error.
#[async_trait]
pub trait KeyValueStore: Send + Sync {
    /// Read the raw value stored under `key`
    async fn get_item(&self, key: &str) -> Result<Option<String>>;

    /// Store `value` under `key`, replacing any previous value
    async fn set_item(&self, key: &str, value: &str) -> Result<()>;

    /// Remove `key` (no-op when absent)
    async fn remove_item(&self, key: &str) -> Result<()>;

    /// Remove every key
    async fn clear(&self) -> Result<()>;
}

/// JSON helpers layered over any [`KeyValueStore`]
#[async_trait]
pub trait KeyValueStoreExt: KeyValueStore {
    /// Read and decode a JSON value
    ///
    /// A stored value that fails to decode is logged and reported as absent,
    /// so one corrupted key never blocks startup.
    async fn get_object<T>(&self, key: &str) -> Result<Option<T>>
    where
        T: DeserializeOwned,
    {
        let Some(raw) = self.get_item(key).await? else {
            return Ok(None);
        };

        match serde_json::from_str(&raw) {
            Ok(value) => Ok(Some(value)),
            Err(e) => {
                tracing::warn!(key, error = %e, "Discarding malformed stored value");
                Ok(None)
            }
        }
    }

    /// Encode `value` as JSON and store it
    async fn set_object<T>(&self, key: &str, value: &T) -> Result<()>
    where
        T: Serialize + Sync + ?Sized,
    {
        let raw = serde_json::to_string(value)?;
        self.set_item(key, &raw).await
    }
}

impl<S: KeyValueStore + ?Sized> KeyValueStoreExt for S {}

/// Offline download index and file management
#[async_trait]
pub trait DownloadManager: Send + Sync {
    /// Look up a downloaded track whose file is still present
    async fn downloaded(&self, track_id: &str) -> Result<Option<DownloadedTrack>>;

    /// All indexed downloads
    async fn list(&self) -> Result<Vec<DownloadedTrack>>;

    /// Fetch `track` at `quality` (or its first variant) to local storage
    ///
    /// Returns the existing record when the track is already downloaded.
    async fn download(&self, track: &Track, quality: &str) -> Result<DownloadedTrack>;

    /// Remove the local file and the index entry
    async fn delete(&self, track_id: &str) -> Result<()>;

    /// Whether `track_id` has a usable local copy
    async fn is_downloaded(&self, track_id: &str) -> Result<bool> {
        Ok(self.downloaded(track_id).await?.is_some())
    }
}
