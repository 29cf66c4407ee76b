//! Browse-level catalog entities (search results, detail screens)

use super::{lenient, MediaLink, Track};
use serde::{Deserialize, Serialize};

/// Artist as returned by artist search
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ArtistSummary {
    pub id: String,
    pub name: String,

    #[serde(default)]
    pub role: Option<String>,

    #[serde(default)]
    pub image: Vec<MediaLink>,
}

/// Album as returned by album search
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AlbumSummary {
    pub id: String,
    pub name: String,

    #[serde(default, deserialize_with = "lenient::opt_string")]
    pub year: Option<String>,

    #[serde(default)]
    pub language: Option<String>,

    #[serde(default)]
    pub image: Vec<MediaLink>,
}

/// Playlist as returned by playlist search
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlaylistSummary {
    pub id: String,
    pub name: String,

    #[serde(default, deserialize_with = "lenient::opt_u64")]
    pub song_count: Option<u64>,

    #[serde(default)]
    pub language: Option<String>,

    #[serde(default)]
    pub image: Vec<MediaLink>,
}

/// Playlist with (one page of) its tracks
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlaylistDetail {
    pub id: String,
    pub name: String,

    #[serde(default)]
    pub description: Option<String>,

    #[serde(default, deserialize_with = "lenient::opt_u64")]
    pub song_count: Option<u64>,

    #[serde(default)]
    pub language: Option<String>,

    #[serde(default)]
    pub image: Vec<MediaLink>,

    #[serde(default)]
    pub songs: Vec<Track>,
}
