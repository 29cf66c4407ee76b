//! Subcommand handlers
//!
//! Each handler wires the services it needs from [`CliConfig`] and prints
//! plain text to stdout. Logging goes to stderr.

use crate::config::CliConfig;
use crate::engine::SimulatedEngine;
use crate::error::{CliError, Result};
use cadence_catalog::display::{format_duration, format_millis, format_play_count, sanitize_title};
use cadence_catalog::{CatalogClient, SearchPage};
use cadence_core::{DownloadManager, DownloadedTrack, KeyValueStore, RepeatMode, Track};
use cadence_playback::{PlayerHandle, PlayerService, PlayerSession, PlayerSnapshot};
use cadence_storage::{FileDownloadManager, JsonFileStore};
use clap::ValueEnum;
use std::sync::Arc;
use tracing::{debug, info};

/// What `search` looks for
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum SearchKind {
    Songs,
    Albums,
    Artists,
    Playlists,
}

// ===== Wiring =====

/// Persistent store and download manager rooted at the configured data dir
pub struct Services {
    pub store: Arc<JsonFileStore>,
    pub downloads: Arc<FileDownloadManager>,
}

impl Services {
    pub async fn open(config: &CliConfig) -> Result<Self> {
        let store = Arc::new(JsonFileStore::open_in(&config.storage.data_dir).await?);
        let index: Arc<dyn KeyValueStore> = store.clone();
        let downloads = Arc::new(FileDownloadManager::new(config.downloads_dir(), index)?);

        debug!(path = %store.path().display(), "Opened state store");
        Ok(Self { store, downloads })
    }

    /// Session hydrated from disk, driven by the simulated engine
    pub async fn session(&self, config: &CliConfig) -> (PlayerSession, cadence_playback::StatusReceiver) {
        let engine = Arc::new(SimulatedEngine::from_settings(&config.playback));
        let (mut session, status) = PlayerSession::new(
            engine,
            self.store.clone(),
            Some(self.downloads.clone()),
        );
        session.init().await;
        (session, status)
    }

    pub async fn player(&self, config: &CliConfig) -> PlayerHandle {
        let (session, status) = self.session(config).await;
        PlayerService::spawn(session, status)
    }
}

// ===== Catalog =====

pub async fn search(
    catalog: &CatalogClient,
    kind: SearchKind,
    query: &str,
    page: u32,
    limit: u32,
) -> Result<()> {
    match kind {
        SearchKind::Songs => {
            let results = catalog.search_tracks(query, page, limit).await?;
            print_header("Songs", &results);
            for (i, track) in results.results.iter().enumerate() {
                println!("{:>3}. {}", i + 1, track_line(track));
            }
        }
        SearchKind::Albums => {
            let results = catalog.search_albums(query, page, limit).await?;
            print_header("Albums", &results);
            for album in &results.results {
                let year = album.year.as_deref().unwrap_or("-");
                println!("  {}  {} ({year})", album.id, sanitize_title(&album.name));
            }
        }
        SearchKind::Artists => {
            let results = catalog.search_artists(query, page, limit).await?;
            print_header("Artists", &results);
            for artist in &results.results {
                let role = artist.role.as_deref().unwrap_or("artist");
                println!("  {}  {} [{role}]", artist.id, artist.name);
            }
        }
        SearchKind::Playlists => {
            let results = catalog.search_playlists(query, page, limit).await?;
            print_header("Playlists", &results);
            for playlist in &results.results {
                let songs = playlist
                    .song_count
                    .map_or_else(|| "?".to_string(), |n| n.to_string());
                println!("  {}  {} ({songs} songs)", playlist.id, sanitize_title(&playlist.name));
            }
        }
    }
    Ok(())
}

pub async fn artist(catalog: &CatalogClient, id: &str) -> Result<()> {
    let tracks = catalog.get_artist_tracks_or_empty(id).await;
    let albums = catalog.get_artist_albums_or_empty(id).await;

    println!("Top songs ({})", tracks.len());
    for (i, track) in tracks.iter().enumerate() {
        println!("{:>3}. {}", i + 1, track_line(track));
    }

    println!();
    println!("Albums ({})", albums.len());
    for album in &albums {
        println!("  {}  {}", album.id, sanitize_title(&album.name));
    }
    Ok(())
}

pub async fn playlist(catalog: &CatalogClient, id: &str, page: u32, limit: u32) -> Result<()> {
    let detail = catalog.get_playlist(id, page, limit).await?;

    println!("{}", sanitize_title(&detail.name));
    if let Some(description) = detail.description.as_deref().filter(|d| !d.is_empty()) {
        println!("{description}");
    }
    println!();
    for (i, track) in detail.songs.iter().enumerate() {
        println!("{:>3}. {}", i + 1, track_line(track));
    }
    Ok(())
}

// ===== Downloads =====

pub async fn download(
    config: &CliConfig,
    catalog: &CatalogClient,
    track_id: &str,
    quality: Option<&str>,
) -> Result<()> {
    let track = catalog
        .get_track(track_id)
        .await?
        .ok_or_else(|| CliError::TrackNotFound(track_id.to_string()))?;
    let quality = quality.unwrap_or(&config.playback.default_quality);

    let services = Services::open(config).await?;
    let downloaded = services.downloads.download(&track, quality).await?;

    info!(track_id, quality = %downloaded.quality, "Download complete");
    println!(
        "Downloaded {} ({}) to {}",
        sanitize_title(&track.name),
        downloaded.quality,
        downloaded.local_uri
    );
    Ok(())
}

pub async fn list_downloads(config: &CliConfig) -> Result<()> {
    let services = Services::open(config).await?;
    let downloads = services.downloads.list().await?;

    if downloads.is_empty() {
        println!("No downloads");
        return Ok(());
    }

    for item in &downloads {
        println!("{}", download_line(item));
    }
    Ok(())
}

pub async fn remove_download(config: &CliConfig, track_id: &str) -> Result<()> {
    let services = Services::open(config).await?;

    if !services.downloads.is_downloaded(track_id).await? {
        println!("{track_id} is not downloaded");
    }
    services.downloads.delete(track_id).await?;
    Ok(())
}

// ===== Player =====

/// Print the persisted player state without starting playback
pub async fn show_queue(config: &CliConfig) -> Result<()> {
    let services = Services::open(config).await?;
    let (session, _status) = services.session(config).await;
    let snapshot = session.snapshot();

    println!(
        "Shuffle: {}  Repeat: {}  Volume: {:.0}%",
        if snapshot.is_shuffled { "on" } else { "off" },
        snapshot.repeat_mode,
        snapshot.volume * 100.0
    );

    println!();
    if snapshot.queue.is_empty() {
        println!("Queue is empty");
    } else {
        println!("Queue ({})", snapshot.queue.len());
        for (i, entry) in snapshot.queue.iter().enumerate() {
            let marker = if i == snapshot.current_index { ">" } else { " " };
            println!("{marker}{:>3}. {}", i + 1, track_line(&entry.track));
        }
    }

    if !snapshot.recently_played.is_empty() {
        println!();
        println!("Recently played");
        for track in &snapshot.recently_played {
            println!("     {}", track_line(track));
        }
    }
    Ok(())
}

/// Search, queue every result, and play until the queue ends or Ctrl-C
pub async fn play(
    config: &CliConfig,
    catalog: &CatalogClient,
    query: &str,
    shuffle: bool,
    repeat: Option<RepeatMode>,
    limit: u32,
) -> Result<()> {
    let results = catalog.search_tracks_or_empty(query, 0, limit).await;
    if results.results.is_empty() {
        println!("No songs found for \"{query}\"");
        return Ok(());
    }

    let services = Services::open(config).await?;
    let player = services.player(config).await;

    player.play_tracks(results.results, 0).await?;
    if let Some(mode) = repeat {
        player.set_repeat_mode(mode).await?;
    }
    if shuffle {
        player.toggle_shuffle().await?;
    }

    let outcome = follow(&player).await;
    player.shutdown().await?;
    outcome
}

async fn follow(player: &PlayerHandle) -> Result<()> {
    let mut updates = player.subscribe();
    let ctrl_c = tokio::signal::ctrl_c();
    tokio::pin!(ctrl_c);

    let mut announced: Option<String> = None;

    loop {
        let finished = {
            let snapshot = updates.borrow_and_update();
            announce(&snapshot, &mut announced);
            queue_finished(&snapshot)
        };
        if finished {
            println!("Queue finished");
            return Ok(());
        }

        tokio::select! {
            changed = updates.changed() => {
                if changed.is_err() {
                    return Ok(());
                }
            }
            _ = &mut ctrl_c => {
                println!();
                println!("Stopping");
                return Ok(());
            }
        }
    }
}

fn announce(snapshot: &PlayerSnapshot, announced: &mut Option<String>) {
    let Some(entry) = snapshot.current_entry() else {
        return;
    };
    if !snapshot.has_engine || announced.as_deref() == Some(entry.queue_id.as_str()) {
        return;
    }

    println!(
        "Now playing [{}/{}] {}",
        snapshot.current_index + 1,
        snapshot.queue.len(),
        track_line(&entry.track)
    );
    *announced = Some(entry.queue_id.clone());
}

/// Last track ran out and nothing followed it
fn queue_finished(snapshot: &PlayerSnapshot) -> bool {
    snapshot.has_engine
        && !snapshot.is_playing
        && !snapshot.is_loading
        && snapshot.duration_ms > 0
        && snapshot.position_ms >= snapshot.duration_ms
}

// ===== Formatting =====

fn print_header<T>(label: &str, page: &SearchPage<T>) {
    println!("{label}: {} of {} (from {})", page.results.len(), page.total, page.start);
}

fn track_line(track: &Track) -> String {
    let duration = track
        .duration_secs
        .map_or_else(|| "-:--".to_string(), format_duration);
    let plays = track
        .play_count
        .map(|n| format!("  {} plays", format_play_count(n)))
        .unwrap_or_default();

    format!(
        "{} - {} [{duration}]  ({}){plays}",
        sanitize_title(&track.name),
        track.artist_names(),
        track.id
    )
}

fn download_line(item: &DownloadedTrack) -> String {
    let length = item
        .track
        .duration_ms()
        .map_or_else(|| "-:--".to_string(), format_millis);

    format!(
        "{}  {} [{length}] {}  {}",
        item.track.id,
        sanitize_title(&item.track.name),
        item.quality,
        item.local_uri
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn finished_only_at_the_end_of_a_loaded_track() {
        let mut snapshot = PlayerSnapshot {
            has_engine: true,
            duration_ms: 30_000,
            position_ms: 30_000,
            ..PlayerSnapshot::default()
        };
        assert!(queue_finished(&snapshot));

        snapshot.is_playing = true;
        assert!(!queue_finished(&snapshot));

        snapshot.is_playing = false;
        snapshot.position_ms = 10_000;
        assert!(!queue_finished(&snapshot));

        assert!(!queue_finished(&PlayerSnapshot::default()));
    }

    #[test]
    fn track_line_formats_metadata() {
        let mut track = Track::new("abc", "From &quot;Dil Se&quot;").with_duration_secs(245);
        track.primary_artists = Some("A. R. Rahman".into());
        track.play_count = Some(12_345);

        assert_eq!(
            track_line(&track),
            "Dil Se - A. R. Rahman [4:05]  (abc)  12.3K plays"
        );
    }
}
