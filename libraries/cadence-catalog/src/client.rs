//! Catalog HTTP client.

use crate::error::{CatalogError, Result};
use crate::types::{ArtistAlbums, ArtistTracks, Envelope, SearchPage};
use cadence_core::{AlbumSummary, ArtistSummary, PlaylistDetail, PlaylistSummary, Track};
use reqwest::Client;
use serde::de::DeserializeOwned;
use std::time::Duration;
use tracing::{debug, warn};

/// Public catalog endpoint
pub const DEFAULT_BASE_URL: &str = "https://saavn.sumit.co";

/// Per-request timeout
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);

/// Page size for search endpoints
pub const DEFAULT_SEARCH_LIMIT: u32 = 20;

/// Page size for playlist tracks
pub const DEFAULT_PLAYLIST_LIMIT: u32 = 30;

/// Connection settings for [`CatalogClient`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CatalogConfig {
    pub base_url: String,
    pub timeout: Duration,
    pub user_agent: String,
}

impl CatalogConfig {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            ..Self::default()
        }
    }
}

impl Default for CatalogConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            timeout: DEFAULT_TIMEOUT,
            user_agent: format!("Cadence/{}", env!("CARGO_PKG_VERSION")),
        }
    }
}

/// Client for the catalog API.
///
/// Cheap to clone; clones share the underlying connection pool.
#[derive(Debug, Clone)]
pub struct CatalogClient {
    http: Client,
    base_url: String,
}

impl CatalogClient {
    /// Create a new client with the given configuration.
    pub fn new(config: CatalogConfig) -> Result<Self> {
        if config.base_url.trim().is_empty() {
            return Err(CatalogError::InvalidUrl("URL cannot be empty".into()));
        }

        let base_url = config.base_url.trim().trim_end_matches('/').to_string();
        if !base_url.starts_with("http://") && !base_url.starts_with("https://") {
            return Err(CatalogError::InvalidUrl(
                "URL must start with http:// or https://".into(),
            ));
        }
        url::Url::parse(&base_url).map_err(|e| CatalogError::InvalidUrl(e.to_string()))?;

        let http = Client::builder()
            .timeout(config.timeout)
            .user_agent(config.user_agent)
            .build()?;

        Ok(Self { http, base_url })
    }

    /// Normalized base URL (no trailing slash).
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    async fn get<T>(&self, path: &str, query: &[(&str, String)]) -> Result<T>
    where
        T: DeserializeOwned,
    {
        let url = format!("{}{}", self.base_url, path);
        debug!(url = %url, ?query, "Catalog request");

        let response = self
            .http
            .get(&url)
            .query(query)
            .send()
            .await
            .map_err(|e| {
                if e.is_connect() || e.is_timeout() {
                    CatalogError::Unreachable(e.to_string())
                } else {
                    CatalogError::Request(e)
                }
            })?;

        let status = response.status();
        if !status.is_success() {
            let message = response.text().await.unwrap_or_default();
            return Err(CatalogError::ServerError {
                status: status.as_u16(),
                message,
            });
        }

        let envelope: Envelope<T> = response.json().await.map_err(|e| {
            CatalogError::ParseError(format!("Failed to parse {path} response: {e}"))
        })?;

        if !envelope.is_success() {
            return Err(CatalogError::Unsuccessful(
                envelope
                    .message
                    .or(envelope.status)
                    .unwrap_or_else(|| "no success flag".to_string()),
            ));
        }

        envelope
            .data
            .ok_or_else(|| CatalogError::ParseError(format!("{path} response has no data")))
    }

    async fn search<T>(&self, kind: &str, query: &str, page: u32, limit: u32) -> Result<SearchPage<T>>
    where
        T: DeserializeOwned,
    {
        let page: SearchPage<T> = self
            .get(
                &format!("/api/search/{kind}"),
                &[
                    ("query", query.to_string()),
                    ("page", page.to_string()),
                    ("limit", limit.to_string()),
                ],
            )
            .await?;

        debug!(kind, query, results = page.results.len(), total = page.total, "Search complete");
        Ok(page)
    }

    /// Search tracks by free text.
    pub async fn search_tracks(&self, query: &str, page: u32, limit: u32) -> Result<SearchPage<Track>> {
        self.search("songs", query, page, limit).await
    }

    /// Search albums by free text.
    pub async fn search_albums(
        &self,
        query: &str,
        page: u32,
        limit: u32,
    ) -> Result<SearchPage<AlbumSummary>> {
        self.search("albums", query, page, limit).await
    }

    /// Search artists by free text.
    pub async fn search_artists(
        &self,
        query: &str,
        page: u32,
        limit: u32,
    ) -> Result<SearchPage<ArtistSummary>> {
        self.search("artists", query, page, limit).await
    }

    /// Search playlists by free text.
    pub async fn search_playlists(
        &self,
        query: &str,
        page: u32,
        limit: u32,
    ) -> Result<SearchPage<PlaylistSummary>> {
        self.search("playlists", query, page, limit).await
    }

    /// Fetch one track by id.
    ///
    /// The endpoint answers with a list; `None` when it is empty.
    pub async fn get_track(&self, id: &str) -> Result<Option<Track>> {
        let tracks: Vec<Track> = self.get(&format!("/api/songs/{}", segment(id)), &[]).await?;
        Ok(tracks.into_iter().next())
    }

    /// Tracks the catalog recommends after `id`.
    pub async fn get_track_suggestions(&self, id: &str) -> Result<Vec<Track>> {
        self.get(&format!("/api/songs/{}/suggestions", segment(id)), &[])
            .await
    }

    /// Artist detail as raw JSON (the shape varies too much to type usefully).
    pub async fn get_artist(&self, id: &str) -> Result<serde_json::Value> {
        self.get(&format!("/api/artists/{}", segment(id)), &[]).await
    }

    /// Top tracks of an artist.
    pub async fn get_artist_tracks(&self, id: &str) -> Result<Vec<Track>> {
        let tracks: ArtistTracks = self
            .get(&format!("/api/artists/{}/songs", segment(id)), &[])
            .await?;
        Ok(tracks.into_tracks())
    }

    /// Albums of an artist.
    pub async fn get_artist_albums(&self, id: &str) -> Result<Vec<AlbumSummary>> {
        let albums: ArtistAlbums = self
            .get(&format!("/api/artists/{}/albums", segment(id)), &[])
            .await?;
        Ok(albums.into_albums())
    }

    /// One page of a playlist's tracks.
    pub async fn get_playlist(&self, id: &str, page: u32, limit: u32) -> Result<PlaylistDetail> {
        self.get(
            "/api/playlists",
            &[
                ("id", id.to_string()),
                ("page", page.to_string()),
                ("limit", limit.to_string()),
            ],
        )
        .await
    }

    // ========================================================================
    // Lenient variants
    // ========================================================================

    /// [`Self::search_tracks`], logging failures and returning an empty page.
    pub async fn search_tracks_or_empty(&self, query: &str, page: u32, limit: u32) -> SearchPage<Track> {
        or_empty("search tracks", self.search_tracks(query, page, limit).await)
    }

    /// [`Self::search_albums`], logging failures and returning an empty page.
    pub async fn search_albums_or_empty(
        &self,
        query: &str,
        page: u32,
        limit: u32,
    ) -> SearchPage<AlbumSummary> {
        or_empty("search albums", self.search_albums(query, page, limit).await)
    }

    /// [`Self::search_artists`], logging failures and returning an empty page.
    pub async fn search_artists_or_empty(
        &self,
        query: &str,
        page: u32,
        limit: u32,
    ) -> SearchPage<ArtistSummary> {
        or_empty("search artists", self.search_artists(query, page, limit).await)
    }

    /// [`Self::search_playlists`], logging failures and returning an empty page.
    pub async fn search_playlists_or_empty(
        &self,
        query: &str,
        page: u32,
        limit: u32,
    ) -> SearchPage<PlaylistSummary> {
        or_empty(
            "search playlists",
            self.search_playlists(query, page, limit).await,
        )
    }

    pub async fn get_track_or_empty(&self, id: &str) -> Option<Track> {
        or_empty("get track", self.get_track(id).await)
    }

    pub async fn get_track_suggestions_or_empty(&self, id: &str) -> Vec<Track> {
        or_empty("get suggestions", self.get_track_suggestions(id).await)
    }

    pub async fn get_artist_or_empty(&self, id: &str) -> Option<serde_json::Value> {
        or_empty("get artist", self.get_artist(id).await.map(Some))
    }

    pub async fn get_artist_tracks_or_empty(&self, id: &str) -> Vec<Track> {
        or_empty("get artist tracks", self.get_artist_tracks(id).await)
    }

    pub async fn get_artist_albums_or_empty(&self, id: &str) -> Vec<AlbumSummary> {
        or_empty("get artist albums", self.get_artist_albums(id).await)
    }

    pub async fn get_playlist_or_empty(&self, id: &str, page: u32, limit: u32) -> Option<PlaylistDetail> {
        or_empty("get playlist", self.get_playlist(id, page, limit).await.map(Some))
    }
}

fn or_empty<T: Default>(operation: &str, result: Result<T>) -> T {
    result.unwrap_or_else(|e| {
        warn!(operation, error = %e, "Catalog request failed, using empty result");
        T::default()
    })
}

fn segment(id: &str) -> String {
    url::form_urlencoded::byte_serialize(id.as_bytes()).collect()
}
