//! Playable source resolution

use crate::engine::PlaybackSource;
use crate::error::{PlayerError, Result};
use cadence_core::{DownloadedTrack, MediaLink, Track};

/// Stream variant tried first
pub const PREFERRED_QUALITY: &str = "320kbps";

/// Stream variant tried when the preferred one is missing
pub const FALLBACK_QUALITY: &str = "160kbps";

/// Pick the source to load for `track`
///
/// Priority: local download, then `320kbps`, then `160kbps`, then the first
/// remaining variant with a usable address.
pub fn resolve_source(track: &Track, downloaded: Option<&DownloadedTrack>) -> Result<PlaybackSource> {
    if let Some(local) = downloaded.filter(|d| !d.local_uri.is_empty()) {
        return Ok(PlaybackSource::Local {
            uri: local.local_uri.clone(),
        });
    }

    let remote = |link: &MediaLink| {
        link.href().map(|url| PlaybackSource::Remote {
            url: url.to_string(),
            quality: link.quality.clone(),
        })
    };

    [PREFERRED_QUALITY, FALLBACK_QUALITY]
        .iter()
        .filter_map(|quality| track.download_link(quality))
        .chain(track.download_url.iter())
        .find_map(remote)
        .ok_or_else(|| PlayerError::NoPlayableSource {
            track_id: track.id.clone(),
        })
}
