//! Wire types for catalog responses

use cadence_core::{AlbumSummary, Track};
use serde::{Deserialize, Serialize};

/// Common response wrapper
///
/// Successful responses carry either `"success": true` or
/// `"status": "SUCCESS"` depending on the endpoint version.
#[derive(Debug, Deserialize)]
pub(crate) struct Envelope<T> {
    #[serde(default)]
    pub success: Option<bool>,
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default)]
    pub message: Option<String>,
    #[serde(default = "Option::default")]
    pub data: Option<T>,
}

impl<T> Envelope<T> {
    pub fn is_success(&self) -> bool {
        self.success == Some(true) || self.status.as_deref() == Some("SUCCESS")
    }
}

/// One page of search results
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SearchPage<T> {
    #[serde(default = "Vec::new")]
    pub results: Vec<T>,

    /// Total matches reported by the catalog
    #[serde(default)]
    pub total: u64,

    /// Offset of the first result
    #[serde(default)]
    pub start: u64,
}

impl<T> Default for SearchPage<T> {
    fn default() -> Self {
        Self {
            results: Vec::new(),
            total: 0,
            start: 0,
        }
    }
}

/// `/api/artists/{id}/songs` answers with either `{ "songs": [...] }` or a bare array
#[derive(Debug, Deserialize)]
#[serde(untagged)]
pub(crate) enum ArtistTracks {
    Wrapped { songs: Vec<Track> },
    Bare(Vec<Track>),
}

impl ArtistTracks {
    pub fn into_tracks(self) -> Vec<Track> {
        match self {
            Self::Wrapped { songs } | Self::Bare(songs) => songs,
        }
    }
}

/// Same two shapes for `/api/artists/{id}/albums`
#[derive(Debug, Deserialize)]
#[serde(untagged)]
pub(crate) enum ArtistAlbums {
    Wrapped { albums: Vec<AlbumSummary> },
    Bare(Vec<AlbumSummary>),
}

impl ArtistAlbums {
    pub fn into_albums(self) -> Vec<AlbumSummary> {
        match self {
            Self::Wrapped { albums } | Self::Bare(albums) => albums,
        }
    }
}
