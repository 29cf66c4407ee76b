use super::Track;
use serde::{Deserialize, Serialize};

/// A track whose audio has been fetched to local storage
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DownloadedTrack {
    pub track: Track,

    /// Local file URI to prefer over network streaming
    pub local_uri: String,

    /// Quality tag of the variant that was downloaded
    pub quality: String,

    /// Download time (Unix epoch milliseconds)
    pub downloaded_at: i64,
}

impl DownloadedTrack {
    /// Record a download completed now
    pub fn new(track: Track, local_uri: impl Into<String>, quality: impl Into<String>) -> Self {
        Self {
            track,
            local_uri: local_uri.into(),
            quality: quality.into(),
            downloaded_at: chrono::Utc::now().timestamp_millis(),
        }
    }
}
