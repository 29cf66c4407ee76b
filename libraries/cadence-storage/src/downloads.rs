//! Offline track downloads

use async_trait::async_trait;
use cadence_core::{keys, DownloadManager, DownloadedTrack, KeyValueStore, KeyValueStoreExt, Track};
use futures_util::StreamExt;
use reqwest::Client;
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;
use tokio::fs::File;
use tokio::io::AsyncWriteExt;
use tokio::sync::Mutex;
use tracing::{debug, info, warn};

use crate::error::{Result, StorageError};

type DownloadIndex = HashMap<String, DownloadedTrack>;

/// Downloads track audio into a directory and indexes it in a key/value store
///
/// Files are named `<trackId>_<quality>.mp4`. The index lives under the
/// `downloaded_songs` key as a map from track id to [`DownloadedTrack`].
pub struct FileDownloadManager {
    http: Client,
    dir: PathBuf,
    store: Arc<dyn KeyValueStore>,
    // Serializes read-modify-write cycles on the index
    index_lock: Mutex<()>,
}

impl FileDownloadManager {
    /// Create a manager writing into `dir`
    pub fn new(dir: impl Into<PathBuf>, store: Arc<dyn KeyValueStore>) -> Result<Self> {
        let http = Client::builder()
            .connect_timeout(Duration::from_secs(10))
            .user_agent(format!("Cadence/{}", env!("CARGO_PKG_VERSION")))
            .build()?;

        Ok(Self::with_client(http, dir, store))
    }

    /// Create a manager with a preconfigured HTTP client
    pub fn with_client(http: Client, dir: impl Into<PathBuf>, store: Arc<dyn KeyValueStore>) -> Self {
        Self {
            http,
            dir: dir.into(),
            store,
            index_lock: Mutex::new(()),
        }
    }

    /// Directory downloads are written to
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Target path for a track at a quality
    pub fn file_path(&self, track_id: &str, quality: &str) -> PathBuf {
        let safe_id: String = track_id
            .chars()
            .map(|c| if c.is_ascii_alphanumeric() || c == '-' || c == '_' { c } else { '_' })
            .collect();
        self.dir.join(format!("{safe_id}_{quality}.mp4"))
    }

    async fn load_index(&self) -> Result<DownloadIndex> {
        Ok(self
            .store
            .get_object::<DownloadIndex>(keys::DOWNLOADED_SONGS)
            .await?
            .unwrap_or_default())
    }

    async fn save_index(&self, index: &DownloadIndex) -> Result<()> {
        self.store.set_object(keys::DOWNLOADED_SONGS, index).await?;
        Ok(())
    }

    /// Existing download of a track whose file is still on disk
    async fn existing(&self, track_id: &str) -> Result<Option<DownloadedTrack>> {
        let _guard = self.index_lock.lock().await;
        let Some(entry) = self.load_index().await?.remove(track_id) else {
            return Ok(None);
        };

        if tokio::fs::try_exists(&entry.local_uri).await? {
            Ok(Some(entry))
        } else {
            Ok(None)
        }
    }

    /// Index `entry`, removing the file of any entry it replaces
    async fn record(&self, entry: DownloadedTrack) -> Result<DownloadedTrack> {
        let _guard = self.index_lock.lock().await;
        let mut index = self.load_index().await?;
        let replaced = index.insert(entry.track.id.clone(), entry.clone());
        self.save_index(&index).await?;

        if let Some(old) = replaced.filter(|old| old.local_uri != entry.local_uri) {
            match tokio::fs::remove_file(&old.local_uri).await {
                Ok(()) => debug!(path = %old.local_uri, "Removed superseded download"),
                Err(e) if e.kind() == std::io::ErrorKind::NotFound => {}
                Err(e) => warn!(path = %old.local_uri, error = %e, "Failed to remove superseded download"),
            }
        }
        Ok(entry)
    }

    async fn fetch_to(&self, url: &str, dest: &Path) -> Result<u64> {
        debug!(url = %url, dest = %dest.display(), "Downloading track");

        let response = self.http.get(url).send().await?;
        let status = response.status();
        if !status.is_success() {
            return Err(StorageError::HttpStatus {
                status: status.as_u16(),
                url: url.to_string(),
            });
        }

        tokio::fs::create_dir_all(&self.dir).await?;

        let mut part = dest.as_os_str().to_owned();
        part.push(".part");
        let part = PathBuf::from(part);

        let result = async {
            let mut file = File::create(&part).await?;
            let mut written: u64 = 0;
            let mut stream = response.bytes_stream();

            while let Some(chunk) = stream.next().await {
                let chunk = chunk?;
                file.write_all(&chunk).await?;
                written += chunk.len() as u64;
            }

            file.flush().await?;
            Ok::<_, StorageError>(written)
        }
        .await;

        match result {
            Ok(written) => {
                tokio::fs::rename(&part, dest).await?;
                Ok(written)
            }
            Err(e) => {
                if let Err(cleanup) = tokio::fs::remove_file(&part).await {
                    debug!(error = %cleanup, "No partial file to clean up");
                }
                Err(e)
            }
        }
    }

    async fn download_inner(&self, track: &Track, quality: &str) -> Result<DownloadedTrack> {
        if let Some(existing) = self.existing(&track.id).await? {
            debug!(track_id = %track.id, quality = %existing.quality, "Track already downloaded");
            return Ok(existing);
        }

        let link = track
            .download_link(quality)
            .filter(|l| l.href().is_some())
            .or_else(|| track.download_url.iter().find(|l| l.href().is_some()));

        let (Some(link), Some(url)) = (link, link.and_then(|l| l.href())) else {
            return Err(StorageError::NoDownloadUrl {
                track_id: track.id.clone(),
            });
        };

        let dest = self.file_path(&track.id, quality);
        let local_uri = dest.to_string_lossy().into_owned();

        if tokio::fs::try_exists(&dest).await? {
            debug!(track_id = %track.id, "Indexing file that already exists on disk");
        } else {
            let size = self.fetch_to(url, &dest).await?;
            info!(
                track_id = %track.id,
                quality = %link.quality,
                dest = %dest.display(),
                size,
                "Track downloaded"
            );
        }

        self.record(DownloadedTrack::new(track.clone(), local_uri, link.quality.clone()))
            .await
    }

    async fn delete_inner(&self, track_id: &str) -> Result<()> {
        let _guard = self.index_lock.lock().await;
        let mut index = self.load_index().await?;

        let Some(entry) = index.remove(track_id) else {
            debug!(track_id, "Delete requested for track that is not downloaded");
            return Ok(());
        };

        match tokio::fs::remove_file(&entry.local_uri).await {
            Ok(()) => {}
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                warn!(track_id, path = %entry.local_uri, "Downloaded file was already gone");
            }
            Err(e) => return Err(e.into()),
        }

        self.save_index(&index).await?;
        info!(track_id, "Download removed");
        Ok(())
    }
}

#[async_trait]
impl DownloadManager for FileDownloadManager {
    async fn downloaded(&self, track_id: &str) -> cadence_core::Result<Option<DownloadedTrack>> {
        let Some(entry) = self.load_index().await?.remove(track_id) else {
            return Ok(None);
        };

        if tokio::fs::try_exists(&entry.local_uri).await? {
            Ok(Some(entry))
        } else {
            warn!(track_id, path = %entry.local_uri, "Indexed download is missing on disk");
            Ok(None)
        }
    }

    async fn list(&self) -> cadence_core::Result<Vec<DownloadedTrack>> {
        let mut entries: Vec<_> = self.load_index().await?.into_values().collect();
        entries.sort_by(|a, b| b.downloaded_at.cmp(&a.downloaded_at));
        Ok(entries)
    }

    async fn download(&self, track: &Track, quality: &str) -> cadence_core::Result<DownloadedTrack> {
        Ok(self.download_inner(track, quality).await?)
    }

    async fn delete(&self, track_id: &str) -> cadence_core::Result<()> {
        Ok(self.delete_inner(track_id).await?)
    }
}
