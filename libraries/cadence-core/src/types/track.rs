//! Catalog track types

use super::lenient;
use serde::{Deserialize, Serialize};

/// A quality-tagged link (image variant or download URL variant)
///
/// Older catalog responses use `link`, newer ones `url`; either may be present.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MediaLink {
    /// Quality tag, e.g. `"320kbps"` or `"500x500"`
    pub quality: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub link: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
}

impl MediaLink {
    /// Create a link with the `url` field set
    pub fn new(quality: impl Into<String>, url: impl Into<String>) -> Self {
        Self {
            quality: quality.into(),
            link: None,
            url: Some(url.into()),
        }
    }

    /// Usable address: `link`, else `url`, ignoring empty strings
    pub fn href(&self) -> Option<&str> {
        self.link
            .as_deref()
            .filter(|s| !s.is_empty())
            .or_else(|| self.url.as_deref().filter(|s| !s.is_empty()))
    }
}

/// Album a track belongs to
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AlbumRef {
    #[serde(default, deserialize_with = "lenient::opt_string")]
    pub id: Option<String>,

    #[serde(default)]
    pub name: Option<String>,

    #[serde(default)]
    pub url: Option<String>,
}

/// Artist reference inside a track
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ArtistRef {
    #[serde(default, deserialize_with = "lenient::opt_string")]
    pub id: Option<String>,

    pub name: String,
}

/// Structured artist credits (newer catalog responses)
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TrackArtists {
    #[serde(default)]
    pub primary: Vec<ArtistRef>,

    #[serde(default)]
    pub featured: Vec<ArtistRef>,
}

/// A catalog track
///
/// Immutable once fetched. Carries everything the player needs to resolve a
/// playable source and everything the UI needs to display it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Track {
    /// Catalog identifier
    pub id: String,

    /// Track title
    pub name: String,

    #[serde(default)]
    pub album: Option<AlbumRef>,

    #[serde(default, deserialize_with = "lenient::opt_string")]
    pub year: Option<String>,

    /// Length in seconds
    #[serde(rename = "duration", default, deserialize_with = "lenient::opt_u64")]
    pub duration_secs: Option<u64>,

    /// Comma-separated artist names (older catalog responses)
    #[serde(default)]
    pub primary_artists: Option<String>,

    #[serde(default)]
    pub artists: Option<TrackArtists>,

    #[serde(default)]
    pub language: Option<String>,

    #[serde(default, deserialize_with = "lenient::opt_u64")]
    pub play_count: Option<u64>,

    /// Artwork variants (`50x50`, `150x150`, `500x500`)
    #[serde(default)]
    pub image: Vec<MediaLink>,

    /// Audio stream variants tagged by bitrate
    #[serde(default)]
    pub download_url: Vec<MediaLink>,
}

impl Track {
    /// Create a bare track with only identity and title
    pub fn new(id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            album: None,
            year: None,
            duration_secs: None,
            primary_artists: None,
            artists: None,
            language: None,
            play_count: None,
            image: Vec::new(),
            download_url: Vec::new(),
        }
    }

    /// Builder-style helper to attach a stream variant
    #[must_use]
    pub fn with_download_url(mut self, quality: &str, url: &str) -> Self {
        self.download_url.push(MediaLink::new(quality, url));
        self
    }

    /// Builder-style helper to set the length in seconds
    #[must_use]
    pub fn with_duration_secs(mut self, secs: u64) -> Self {
        self.duration_secs = Some(secs);
        self
    }

    /// Track length in milliseconds, if known
    pub fn duration_ms(&self) -> Option<u64> {
        self.duration_secs.map(|secs| secs.saturating_mul(1000))
    }

    /// Find the stream variant tagged with `quality`
    pub fn download_link(&self, quality: &str) -> Option<&MediaLink> {
        self.download_url.iter().find(|l| l.quality == quality)
    }

    /// Display string for the credited artists
    ///
    /// Prefers structured primary artists and falls back to `primaryArtists`.
    pub fn artist_names(&self) -> String {
        if let Some(artists) = &self.artists {
            if !artists.primary.is_empty() {
                return artists
                    .primary
                    .iter()
                    .map(|a| a.name.as_str())
                    .collect::<Vec<_>>()
                    .join(", ");
            }
        }

        self.primary_artists.clone().unwrap_or_default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_legacy_catalog_shape() {
        let json = r#"{
            "id": "5WXAlMNt",
            "name": "Tum Hi Ho",
            "type": "song",
            "album": { "id": "1139549", "name": "Aashiqui 2", "url": "https://example.com/a" },
            "year": "2013",
            "duration": "262",
            "primaryArtists": "Arijit Singh",
            "playCount": "149587384",
            "image": [{ "quality": "500x500", "link": "https://img/500.jpg" }],
            "downloadUrl": [
                { "quality": "160kbps", "link": "https://cdn/160.mp4" },
                { "quality": "320kbps", "link": "https://cdn/320.mp4" }
            ]
        }"#;

        let track: Track = serde_json::from_str(json).unwrap();

        assert_eq!(track.id, "5WXAlMNt");
        assert_eq!(track.duration_secs, Some(262));
        assert_eq!(track.duration_ms(), Some(262_000));
        assert_eq!(track.year.as_deref(), Some("2013"));
        assert_eq!(track.play_count, Some(149_587_384));
        assert_eq!(track.artist_names(), "Arijit Singh");
        assert_eq!(
            track.download_link("320kbps").and_then(MediaLink::href),
            Some("https://cdn/320.mp4")
        );
    }

    #[test]
    fn parses_structured_artists_and_numeric_fields() {
        let json = r#"{
            "id": "abc",
            "name": "Song",
            "year": 2020,
            "duration": 185,
            "artists": { "primary": [{ "id": "1", "name": "A" }, { "id": 2, "name": "B" }] },
            "downloadUrl": [{ "quality": "96kbps", "url": "https://cdn/96.mp4" }]
        }"#;

        let track: Track = serde_json::from_str(json).unwrap();

        assert_eq!(track.year.as_deref(), Some("2020"));
        assert_eq!(track.duration_secs, Some(185));
        assert_eq!(track.artist_names(), "A, B");
        assert_eq!(track.download_url[0].href(), Some("https://cdn/96.mp4"));
    }

    #[test]
    fn survives_a_serialize_round_trip() {
        let track = Track::new("id1", "Name")
            .with_duration_secs(200)
            .with_download_url("320kbps", "https://cdn/x.mp4");

        let json = serde_json::to_string(&track).unwrap();
        let back: Track = serde_json::from_str(&json).unwrap();

        assert_eq!(back, track);
    }

    #[test]
    fn href_prefers_link_and_skips_empty() {
        let link = MediaLink {
            quality: "320kbps".into(),
            link: Some(String::new()),
            url: Some("https://u".into()),
        };
        assert_eq!(link.href(), Some("https://u"));

        let link = MediaLink {
            quality: "320kbps".into(),
            link: Some("https://l".into()),
            url: Some("https://u".into()),
        };
        assert_eq!(link.href(), Some("https://l"));
    }
}
