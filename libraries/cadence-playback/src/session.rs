//! Player session
//!
//! All player state plus every command. A session is plain `&mut self` code;
//! serialization of concurrent callers is the job of [`crate::PlayerService`].

use crate::engine::{
    EngineHandle, EngineOptions, PlaybackEngine, StatusReceiver, StatusSender, StatusUpdate,
};
use crate::error::{PlayerError, Result};
use crate::history::{RecentlyPlayed, RECENTLY_PLAYED_LIMIT};
use crate::queue::PlayQueue;
use crate::snapshot::PlayerSnapshot;
use crate::source::resolve_source;
use crate::volume::Volume;
use cadence_core::{
    keys, DownloadManager, DownloadedTrack, KeyValueStore, KeyValueStoreExt, QueueEntry,
    RepeatMode, Track,
};
use rand::thread_rng;
use serde::de::DeserializeOwned;
use std::sync::Arc;
use tokio::sync::mpsc;
use tracing::{debug, info, warn};

/// Past this position, "previous" restarts the current track instead
pub const RESTART_THRESHOLD_MS: u64 = 3000;

/// The player state manager
pub struct PlayerSession {
    engine: Arc<dyn PlaybackEngine>,
    store: Arc<dyn KeyValueStore>,
    downloads: Option<Arc<dyn DownloadManager>>,
    status_tx: mpsc::UnboundedSender<StatusUpdate>,

    /// Exclusively owned; at most one exists at a time
    handle: Option<Box<dyn EngineHandle>>,
    /// Load counter; status reports from other generations are stale
    generation: u64,

    queue: PlayQueue,
    current_track: Option<Track>,
    is_playing: bool,
    position_ms: u64,
    duration_ms: u64,
    repeat_mode: RepeatMode,
    volume: Volume,
    is_loading: bool,
    recently_played: RecentlyPlayed,
}

impl PlayerSession {
    /// Create an idle session
    ///
    /// The returned receiver carries engine status reports; feed each one to
    /// [`PlayerSession::handle_status`] (the service does this for you).
    pub fn new(
        engine: Arc<dyn PlaybackEngine>,
        store: Arc<dyn KeyValueStore>,
        downloads: Option<Arc<dyn DownloadManager>>,
    ) -> (Self, StatusReceiver) {
        let (status_tx, status_rx) = mpsc::unbounded_channel();

        let session = Self {
            engine,
            store,
            downloads,
            status_tx,
            handle: None,
            generation: 0,
            queue: PlayQueue::new(),
            current_track: None,
            is_playing: false,
            position_ms: 0,
            duration_ms: 0,
            repeat_mode: RepeatMode::Off,
            volume: Volume::default(),
            is_loading: false,
            recently_played: RecentlyPlayed::new(RECENTLY_PLAYED_LIMIT),
        };

        (session, status_rx)
    }

    /// Startup: hydrate persisted state
    pub async fn init(&mut self) {
        self.load_persisted_state().await;
        info!(
            queue = self.queue.len(),
            index = self.queue.current_index(),
            shuffled = self.queue.is_shuffled(),
            repeat = %self.repeat_mode,
            "Player session initialized"
        );
    }

    /// Shutdown: release the engine
    pub async fn teardown(&mut self) {
        self.release_engine().await;
        self.is_loading = false;
        info!("Player session torn down");
    }

    // ========================================================================
    // Accessors
    // ========================================================================

    /// Queue in playback order
    pub fn queue(&self) -> &PlayQueue {
        &self.queue
    }

    /// Track loaded in the engine, if any
    pub fn current_track(&self) -> Option<&Track> {
        self.current_track.as_ref()
    }

    /// Whether the engine is playing
    pub fn is_playing(&self) -> bool {
        self.is_playing
    }

    /// Whether a load is in progress
    pub fn is_loading(&self) -> bool {
        self.is_loading
    }

    /// Playback position in milliseconds
    pub fn position_ms(&self) -> u64 {
        self.position_ms
    }

    /// Length of the loaded track in milliseconds (0 when unknown)
    pub fn duration_ms(&self) -> u64 {
        self.duration_ms
    }

    /// Current repeat mode
    pub fn repeat_mode(&self) -> RepeatMode {
        self.repeat_mode
    }

    /// Volume level in `[0, 1]`
    pub fn volume(&self) -> f32 {
        self.volume.level()
    }

    /// Recently played tracks, most recent first
    pub fn recently_played(&self) -> &RecentlyPlayed {
        &self.recently_played
    }

    /// Whether an engine handle is held
    pub fn has_active_engine(&self) -> bool {
        self.handle.is_some()
    }

    /// Copy of the state for rendering
    pub fn snapshot(&self) -> PlayerSnapshot {
        PlayerSnapshot {
            current_track: self.current_track.clone(),
            queue: self.queue.entries().to_vec(),
            current_index: self.queue.current_index(),
            is_playing: self.is_playing,
            position_ms: self.position_ms,
            duration_ms: self.duration_ms,
            is_shuffled: self.queue.is_shuffled(),
            repeat_mode: self.repeat_mode,
            volume: self.volume.level(),
            is_loading: self.is_loading,
            recently_played: self.recently_played.to_vec(),
            has_engine: self.handle.is_some(),
        }
    }

    // ========================================================================
    // Playback
    // ========================================================================

    /// Load and play `track`
    ///
    /// With `new_queue`, the queue is replaced by fresh entries and `index`
    /// (default 0) becomes current. Without it, the track is played from the
    /// existing queue, appended first if absent.
    ///
    /// On failure the previous queue and track are kept and the error is
    /// returned; only `is_loading` is reset.
    pub async fn play_track(
        &mut self,
        track: Track,
        new_queue: Option<Vec<Track>>,
        index: Option<usize>,
    ) -> Result<()> {
        self.is_loading = true;

        let mut staged = self.queue.clone();
        let staged_ok = match new_queue {
            Some(tracks) => staged.replace(tracks, index.unwrap_or(0)),
            None => {
                staged.select_or_append(&track);
                Ok(())
            }
        };

        if let Err(e) = staged_ok {
            self.is_loading = false;
            warn!(track_id = %track.id, error = %e, "Rejected play request");
            return Err(e);
        }

        self.load(track, staged).await
    }

    /// Play the entry at `index` of the current queue, leaving the queue as is
    pub async fn play_queue_index(&mut self, index: usize) -> Result<()> {
        let Some(entry) = self.queue.get(index) else {
            return Err(PlayerError::IndexOutOfBounds {
                index,
                len: self.queue.len(),
            });
        };
        let track = entry.track.clone();

        let mut staged = self.queue.clone();
        staged.set_current_index(index)?;

        self.is_loading = true;
        self.load(track, staged).await
    }

    async fn load(&mut self, track: Track, staged: PlayQueue) -> Result<()> {
        debug!(track_id = %track.id, index = staged.current_index(), "Loading track");

        let downloaded = self.lookup_download(&track.id).await;
        let source = match resolve_source(&track, downloaded.as_ref()) {
            Ok(source) => source,
            Err(e) => {
                self.is_loading = false;
                warn!(track_id = %track.id, error = %e, "Cannot play track");
                return Err(e);
            }
        };

        // The previous session must be gone before the next one is created
        self.release_engine().await;

        let status = StatusSender::new(self.generation, self.status_tx.clone());
        let options = EngineOptions {
            autoplay: true,
            initial_volume: self.volume.level(),
        };

        let handle = match self.engine.create(&source, options, status).await {
            Ok(handle) => handle,
            Err(e) => {
                self.is_loading = false;
                self.is_playing = false;
                warn!(track_id = %track.id, uri = source.uri(), error = %e, "Engine failed to load track");
                return Err(e.into());
            }
        };

        info!(
            track_id = %track.id,
            name = %track.name,
            local = source.is_local(),
            index = staged.current_index(),
            "Now playing"
        );

        self.handle = Some(handle);
        self.queue = staged;
        self.duration_ms = track.duration_ms().unwrap_or(0);
        self.position_ms = 0;
        self.is_playing = true;
        self.is_loading = false;
        self.current_track = Some(track.clone());

        self.persist_queue().await;

        self.recently_played.push(track);
        self.persist_object(keys::RECENTLY_PLAYED, &self.recently_played.to_vec())
            .await;

        Ok(())
    }

    async fn lookup_download(&self, track_id: &str) -> Option<DownloadedTrack> {
        let downloads = self.downloads.as_ref()?;
        match downloads.downloaded(track_id).await {
            Ok(found) => found,
            Err(e) => {
                warn!(track_id, error = %e, "Download lookup failed, streaming instead");
                None
            }
        }
    }

    /// Pause when playing, resume when paused
    ///
    /// Without a loaded track this does nothing.
    pub async fn toggle_play_pause(&mut self) -> Result<()> {
        let Some(handle) = self.handle.as_mut() else {
            debug!("Toggle ignored, nothing loaded");
            return Ok(());
        };

        let result = if self.is_playing {
            handle.pause().await
        } else {
            handle.play().await
        };

        match result {
            Ok(()) => {
                self.is_playing = !self.is_playing;
                Ok(())
            }
            Err(e) => {
                warn!(error = %e, "Toggle play/pause failed");
                Err(e.into())
            }
        }
    }

    /// Seek the loaded track
    pub async fn seek_to(&mut self, position_ms: u64) -> Result<()> {
        let Some(handle) = self.handle.as_mut() else {
            debug!("Seek ignored, nothing loaded");
            return Ok(());
        };

        match handle.seek(position_ms).await {
            Ok(()) => {
                self.position_ms = position_ms;
                Ok(())
            }
            Err(e) => {
                warn!(position_ms, error = %e, "Seek failed");
                Err(e.into())
            }
        }
    }

    /// Advance to the next entry
    ///
    /// At the end of the queue this wraps with repeat-all and otherwise stays
    /// on the last entry.
    pub async fn play_next(&mut self) -> Result<()> {
        match self.queue.next_index(self.repeat_mode) {
            Some(index) => self.play_queue_index(index).await,
            None => {
                debug!("End of queue reached");
                Ok(())
            }
        }
    }

    /// Restart the current track, or step back one entry
    pub async fn play_previous(&mut self) -> Result<()> {
        if self.queue.is_empty() {
            return Ok(());
        }

        if self.position_ms > RESTART_THRESHOLD_MS {
            return self.seek_to(0).await;
        }

        match self.queue.previous_index() {
            Some(index) => self.play_queue_index(index).await,
            None => Ok(()),
        }
    }

    /// Apply a status report from the engine
    ///
    /// Reports for a replaced handle are dropped. A finished track restarts
    /// under repeat-one and otherwise advances.
    pub async fn handle_status(&mut self, update: StatusUpdate) -> Result<()> {
        if update.generation != self.generation || self.handle.is_none() {
            debug!(
                generation = update.generation,
                current = self.generation,
                "Dropping stale engine status"
            );
            return Ok(());
        }

        let status = update.status;
        self.position_ms = status.position_ms;
        if let Some(duration) = status.duration_ms.filter(|&d| d > 0) {
            self.duration_ms = duration;
        }
        self.is_playing = status.is_playing;

        if !status.just_finished {
            return Ok(());
        }

        debug!(repeat = %self.repeat_mode, "Track finished");

        if self.repeat_mode == RepeatMode::One {
            self.seek_to(0).await?;
            if let Some(handle) = self.handle.as_mut() {
                match handle.play().await {
                    Ok(()) => self.is_playing = true,
                    Err(e) => {
                        warn!(error = %e, "Failed to restart track");
                        return Err(e.into());
                    }
                }
            }
            Ok(())
        } else {
            self.play_next().await
        }
    }

    /// Stop and unload the active handle
    ///
    /// Errors are logged; the handle is dropped either way.
    pub async fn release_engine(&mut self) {
        // Any report still in flight belongs to the old handle
        self.generation = self.generation.wrapping_add(1);

        let Some(mut handle) = self.handle.take() else {
            return;
        };

        if let Err(e) = handle.stop().await {
            warn!(error = %e, "Engine stop failed during release");
        }
        if let Err(e) = handle.unload().await {
            warn!(error = %e, "Engine unload failed during release");
        }

        self.is_playing = false;
        debug!("Engine released");
    }

    // ========================================================================
    // Queue
    // ========================================================================

    /// Append `track` to the queue
    pub async fn add_to_queue(&mut self, track: Track) -> Result<QueueEntry> {
        let entry = self.queue.push(track).clone();
        debug!(queue_id = %entry.queue_id, track_id = %entry.track.id, "Added to queue");

        self.persist_queue().await;
        Ok(entry)
    }

    /// Remove the entry with `queue_id`; `false` when it was not queued
    pub async fn remove_from_queue(&mut self, queue_id: &str) -> Result<bool> {
        let Some(removed) = self.queue.remove(queue_id) else {
            debug!(queue_id, "Remove ignored, not in queue");
            return Ok(false);
        };
        debug!(queue_id, track_id = %removed.track.id, "Removed from queue");

        self.persist_queue().await;
        Ok(true)
    }

    /// Move the entry at `from` to `to`
    pub async fn reorder_queue(&mut self, from: usize, to: usize) -> Result<()> {
        self.queue.reorder(from, to)?;
        self.persist_queue().await;
        Ok(())
    }

    /// Empty the queue; playback of the loaded track continues
    pub async fn clear_queue(&mut self) -> Result<()> {
        self.queue.clear();

        for key in [keys::QUEUE, keys::ORIGINAL_QUEUE, keys::CURRENT_INDEX] {
            if let Err(e) = self.store.remove_item(key).await {
                warn!(key, error = %PlayerError::from(e), "Failed to clear persisted queue");
            }
        }
        Ok(())
    }

    /// Flip shuffle; returns the new state
    pub async fn toggle_shuffle(&mut self) -> Result<bool> {
        if self.queue.is_shuffled() {
            let current_id = self.current_track.as_ref().map(|t| t.id.as_str());
            self.queue.unshuffle(current_id);
        } else {
            let anchor = self.current_entry_index();
            self.queue.shuffle_with(anchor, &mut thread_rng());
        }

        let shuffled = self.queue.is_shuffled();
        debug!(shuffled, index = self.queue.current_index(), "Shuffle toggled");

        self.persist_queue().await;
        Ok(shuffled)
    }

    /// Queue position of the loaded track, if it is queued
    fn current_entry_index(&self) -> Option<usize> {
        let track = self.current_track.as_ref()?;
        match self.queue.current() {
            Some(entry) if entry.track.id == track.id => Some(self.queue.current_index()),
            _ => self.queue.position_of_track(&track.id),
        }
    }

    // ========================================================================
    // Settings
    // ========================================================================

    pub async fn set_repeat_mode(&mut self, mode: RepeatMode) -> Result<()> {
        self.repeat_mode = mode;
        self.persist_item(keys::REPEAT_MODE, mode.as_str()).await;
        Ok(())
    }

    /// Set the volume (clamped to `[0, 1]`); returns the stored level
    ///
    /// If the engine rejects the change the stored level is left alone.
    pub async fn set_volume(&mut self, volume: f32) -> Result<f32> {
        let Some(level) = Volume::clamp(volume) else {
            debug!("Ignoring NaN volume");
            return Ok(self.volume.level());
        };

        if let Some(handle) = self.handle.as_mut() {
            if let Err(e) = handle.set_volume(level).await {
                warn!(volume = level, error = %e, "Engine rejected volume change");
                return Err(e.into());
            }
        }

        self.volume.set(level);
        self.persist_item(keys::VOLUME, &level.to_string()).await;
        Ok(level)
    }

    // ========================================================================
    // Persistence
    // ========================================================================

    /// Hydrate queue and settings from the store
    ///
    /// Missing or malformed values fall back to defaults. No engine handle is
    /// created and nothing starts playing.
    pub async fn load_persisted_state(&mut self) {
        let entries: Vec<QueueEntry> = self.read_object(keys::QUEUE).await.unwrap_or_default();
        let original: Option<Vec<QueueEntry>> = self.read_object(keys::ORIGINAL_QUEUE).await;
        let current_index = self
            .read_item(keys::CURRENT_INDEX)
            .await
            .and_then(|raw| raw.trim().parse::<usize>().ok())
            .unwrap_or(0);
        let shuffled = self.read_item(keys::SHUFFLE_STATE).await.as_deref() == Some("true");

        self.queue = PlayQueue::from_parts(entries, original, current_index, shuffled);

        self.repeat_mode = self
            .read_item(keys::REPEAT_MODE)
            .await
            .and_then(|raw| raw.parse().ok())
            .unwrap_or_default();

        self.volume = self
            .read_item(keys::VOLUME)
            .await
            .and_then(|raw| raw.trim().parse::<f32>().ok())
            .map(Volume::new)
            .unwrap_or_default();

        let recent: Vec<Track> = self
            .read_object(keys::RECENTLY_PLAYED)
            .await
            .unwrap_or_default();
        self.recently_played = RecentlyPlayed::from_tracks(recent, RECENTLY_PLAYED_LIMIT);

        debug!(
            queue = self.queue.len(),
            recent = self.recently_played.len(),
            volume = self.volume.level(),
            "Loaded persisted player state"
        );
    }

    async fn read_item(&self, key: &str) -> Option<String> {
        match self.store.get_item(key).await {
            Ok(value) => value,
            Err(e) => {
                warn!(key, error = %PlayerError::from(e), "Using default for unreadable key");
                None
            }
        }
    }

    async fn read_object<T>(&self, key: &str) -> Option<T>
    where
        T: DeserializeOwned,
    {
        match self.store.get_object(key).await {
            Ok(value) => value,
            Err(e) => {
                warn!(key, error = %PlayerError::from(e), "Using default for unreadable key");
                None
            }
        }
    }

    /// Queue, insertion order, pointer and shuffle flag are written together
    async fn persist_queue(&self) {
        self.persist_object(keys::QUEUE, self.queue.entries()).await;
        self.persist_object(keys::ORIGINAL_QUEUE, self.queue.original())
            .await;
        self.persist_item(
            keys::CURRENT_INDEX,
            &self.queue.current_index().to_string(),
        )
        .await;
        self.persist_item(
            keys::SHUFFLE_STATE,
            if self.queue.is_shuffled() { "true" } else { "false" },
        )
        .await;
    }

    async fn persist_item(&self, key: &str, value: &str) {
        if let Err(e) = self.store.set_item(key, value).await {
            warn!(key, error = %PlayerError::from(e), "Failed to persist player state");
        }
    }

    async fn persist_object<T>(&self, key: &str, value: &T)
    where
        T: serde::Serialize + Sync + ?Sized,
    {
        if let Err(e) = self.store.set_object(key, value).await {
            warn!(key, error = %PlayerError::from(e), "Failed to persist player state");
        }
    }
}
