//! Cadence Catalog
//!
//! HTTP client for the public music catalog: search, track details and
//! suggestions, artist pages, and playlists.
//!
//! Every fallible method has an `*_or_empty` companion that logs the failure
//! and returns an empty result, for screens that should degrade rather than
//! surface network errors.
//!
//! # Example
//!
//! ```ignore
//! use cadence_catalog::{CatalogClient, CatalogConfig};
//!
//! let client = CatalogClient::new(CatalogConfig::default())?;
//! let page = client.search_tracks("arijit", 0, 20).await?;
//! for track in &page.results {
//!     println!("{} - {}", track.name, track.artist_names());
//! }
//! ```

mod client;
pub mod display;
mod error;
mod types;

pub use client::{
    CatalogClient, CatalogConfig, DEFAULT_BASE_URL, DEFAULT_PLAYLIST_LIMIT, DEFAULT_SEARCH_LIMIT,
    DEFAULT_TIMEOUT,
};
pub use error::{CatalogError, Result};
pub use types::SearchPage;
