//! JSON document store on the local filesystem

use async_trait::async_trait;
use cadence_core::{CadenceError, KeyValueStore};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use tokio::sync::Mutex;
use tracing::{debug, warn};

use crate::error::Result;

/// Key/value store persisted as one JSON object
///
/// The whole map is kept in memory and written back after every mutation.
/// Writes go to a sibling temp file first and are renamed into place, so a
/// crash never leaves a half-written document behind.
#[derive(Debug)]
pub struct JsonFileStore {
    path: PathBuf,
    entries: Mutex<BTreeMap<String, String>>,
}

impl JsonFileStore {
    /// File name used by [`JsonFileStore::open_in`]
    pub const FILE_NAME: &'static str = "state.json";

    /// Open (or create) the store at `path`
    ///
    /// A missing file yields an empty store. A file that is not a JSON object
    /// of strings is logged and ignored; it is overwritten on the next write.
    pub async fn open(path: impl Into<PathBuf>) -> Result<Self> {
        let path = path.into();

        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                tokio::fs::create_dir_all(parent).await?;
            }
        }

        let entries = match tokio::fs::read_to_string(&path).await {
            Ok(raw) => match serde_json::from_str::<BTreeMap<String, String>>(&raw) {
                Ok(map) => map,
                Err(e) => {
                    warn!(path = %path.display(), error = %e, "State file is corrupt, starting empty");
                    BTreeMap::new()
                }
            },
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => BTreeMap::new(),
            Err(e) => return Err(e.into()),
        };

        debug!(path = %path.display(), keys = entries.len(), "Opened state file");

        Ok(Self {
            path,
            entries: Mutex::new(entries),
        })
    }

    /// Open `state.json` inside `dir`
    pub async fn open_in(dir: impl AsRef<Path>) -> Result<Self> {
        Self::open(dir.as_ref().join(Self::FILE_NAME)).await
    }

    /// Location of the backing file
    pub fn path(&self) -> &Path {
        &self.path
    }

    async fn flush(&self, entries: &BTreeMap<String, String>) -> Result<()> {
        let json = serde_json::to_vec_pretty(entries)?;

        let mut tmp = self.path.clone().into_os_string();
        tmp.push(".tmp");
        let tmp = PathBuf::from(tmp);

        tokio::fs::write(&tmp, json).await?;
        tokio::fs::rename(&tmp, &self.path).await?;
        Ok(())
    }

    async fn mutate<F>(&self, apply: F) -> cadence_core::Result<()>
    where
        F: FnOnce(&mut BTreeMap<String, String>) + Send,
    {
        let mut entries = self.entries.lock().await;
        apply(&mut *entries);
        self.flush(&entries).await.map_err(CadenceError::from)
    }
}

#[async_trait]
impl KeyValueStore for JsonFileStore {
    async fn get_item(&self, key: &str) -> cadence_core::Result<Option<String>> {
        Ok(self.entries.lock().await.get(key).cloned())
    }

    async fn set_item(&self, key: &str, value: &str) -> cadence_core::Result<()> {
        self.mutate(|entries| {
            entries.insert(key.to_string(), value.to_string());
        })
        .await
    }

    async fn remove_item(&self, key: &str) -> cadence_core::Result<()> {
        self.mutate(|entries| {
            entries.remove(key);
        })
        .await
    }

    async fn clear(&self) -> cadence_core::Result<()> {
        self.mutate(BTreeMap::clear).await
    }
}
