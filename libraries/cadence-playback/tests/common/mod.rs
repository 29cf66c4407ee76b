//! Shared helpers for player integration tests

#![allow(dead_code)]

use async_trait::async_trait;
use cadence_core::{CadenceError, DownloadManager, DownloadedTrack, Track};
use cadence_playback::{
    EngineError, EngineHandle, EngineOptions, EngineStatus, PlaybackEngine, PlaybackSource,
    PlayerSession, StatusReceiver, StatusSender,
};
use cadence_storage::MemoryStore;
use std::collections::{HashMap, HashSet};
use std::sync::{Arc, Mutex, Once};

static INIT: Once = Once::new();

pub fn init_tracing() {
    INIT.call_once(|| {
        let _ = tracing_subscriber::fmt()
            .with_test_writer()
            .with_max_level(tracing::Level::DEBUG)
            .try_init();
    });
}

// ===== Tracks =====

pub fn track(id: &str) -> Track {
    Track::new(id, format!("Track {id}"))
        .with_duration_secs(180)
        .with_download_url("160kbps", &format!("https://cdn.test/{id}_160.mp4"))
        .with_download_url("320kbps", &format!("https://cdn.test/{id}_320.mp4"))
}

pub fn tracks(ids: &[&str]) -> Vec<Track> {
    ids.iter().map(|id| track(id)).collect()
}

pub fn remote_uri(id: &str) -> String {
    format!("https://cdn.test/{id}_320.mp4")
}

// ===== Recording engine =====

/// Every call the player made against the engine, in order
#[derive(Debug, Clone, PartialEq)]
pub enum EngineCall {
    Create {
        handle: u64,
        uri: String,
        local: bool,
        autoplay: bool,
        volume: f32,
    },
    Play(u64),
    Pause(u64),
    Seek(u64, u64),
    SetVolume(u64, f32),
    Stop(u64),
    Unload(u64),
}

#[derive(Default)]
struct EngineState {
    calls: Vec<EngineCall>,
    next_handle: u64,
    live: HashSet<u64>,
    max_live: usize,
    fail_create: bool,
    fail_ops: bool,
    senders: Vec<StatusSender>,
}

/// Mock engine that records calls and can be told to fail
#[derive(Clone, Default)]
pub struct RecordingEngine {
    state: Arc<Mutex<EngineState>>,
}

impl RecordingEngine {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn calls(&self) -> Vec<EngineCall> {
        self.state.lock().unwrap().calls.clone()
    }

    pub fn clear_calls(&self) {
        self.state.lock().unwrap().calls.clear();
    }

    pub fn created_uris(&self) -> Vec<String> {
        self.calls()
            .into_iter()
            .filter_map(|call| match call {
                EngineCall::Create { uri, .. } => Some(uri),
                _ => None,
            })
            .collect()
    }

    pub fn live_handles(&self) -> usize {
        self.state.lock().unwrap().live.len()
    }

    pub fn max_live_handles(&self) -> usize {
        self.state.lock().unwrap().max_live
    }

    pub fn set_fail_create(&self, fail: bool) {
        self.state.lock().unwrap().fail_create = fail;
    }

    pub fn set_fail_ops(&self, fail: bool) {
        self.state.lock().unwrap().fail_ops = fail;
    }

    /// Status sender handed to the most recent create
    pub fn last_sender(&self) -> StatusSender {
        self.state
            .lock()
            .unwrap()
            .senders
            .last()
            .cloned()
            .expect("no handle created yet")
    }

    /// Report status as the most recently created handle
    pub fn emit(&self, status: EngineStatus) {
        assert!(self.last_sender().send(status));
    }

    pub fn finish(&self) {
        self.emit(EngineStatus {
            position_ms: 180_000,
            duration_ms: Some(180_000),
            is_playing: false,
            just_finished: true,
        });
    }
}

#[async_trait]
impl PlaybackEngine for RecordingEngine {
    async fn create(
        &self,
        source: &PlaybackSource,
        options: EngineOptions,
        status: StatusSender,
    ) -> Result<Box<dyn EngineHandle>, EngineError> {
        let mut state = self.state.lock().unwrap();
        if state.fail_create {
            return Err(EngineError::Load(format!("cannot open {}", source.uri())));
        }

        state.next_handle += 1;
        let id = state.next_handle;
        state.calls.push(EngineCall::Create {
            handle: id,
            uri: source.uri().to_string(),
            local: source.is_local(),
            autoplay: options.autoplay,
            volume: options.initial_volume,
        });
        state.live.insert(id);
        state.max_live = state.max_live.max(state.live.len());
        state.senders.push(status);

        Ok(Box::new(RecordingHandle {
            id,
            state: Arc::clone(&self.state),
        }))
    }
}

struct RecordingHandle {
    id: u64,
    state: Arc<Mutex<EngineState>>,
}

impl RecordingHandle {
    fn record(&self, call: EngineCall) -> Result<(), EngineError> {
        let mut state = self.state.lock().unwrap();
        state.calls.push(call);
        if state.fail_ops {
            Err(EngineError::Rejected("engine busy".into()))
        } else {
            Ok(())
        }
    }
}

#[async_trait]
impl EngineHandle for RecordingHandle {
    async fn play(&mut self) -> Result<(), EngineError> {
        self.record(EngineCall::Play(self.id))
    }

    async fn pause(&mut self) -> Result<(), EngineError> {
        self.record(EngineCall::Pause(self.id))
    }

    async fn seek(&mut self, position_ms: u64) -> Result<(), EngineError> {
        self.record(EngineCall::Seek(self.id, position_ms))
    }

    async fn set_volume(&mut self, volume: f32) -> Result<(), EngineError> {
        self.record(EngineCall::SetVolume(self.id, volume))
    }

    async fn stop(&mut self) -> Result<(), EngineError> {
        self.record(EngineCall::Stop(self.id))
    }

    async fn unload(&mut self) -> Result<(), EngineError> {
        // Released even when the engine complains
        self.state.lock().unwrap().live.remove(&self.id);
        self.record(EngineCall::Unload(self.id))
    }
}

// ===== Downloads =====

/// In-memory download index
#[derive(Default)]
pub struct StubDownloads {
    entries: Mutex<HashMap<String, DownloadedTrack>>,
}

impl StubDownloads {
    pub fn mark_downloaded(&self, track: &Track, local_uri: &str) {
        self.entries.lock().unwrap().insert(
            track.id.clone(),
            DownloadedTrack {
                track: track.clone(),
                local_uri: local_uri.to_string(),
                quality: "320kbps".into(),
                downloaded_at: 1_700_000_000_000,
            },
        );
    }
}

#[async_trait]
impl DownloadManager for StubDownloads {
    async fn downloaded(&self, track_id: &str) -> cadence_core::Result<Option<DownloadedTrack>> {
        Ok(self.entries.lock().unwrap().get(track_id).cloned())
    }

    async fn list(&self) -> cadence_core::Result<Vec<DownloadedTrack>> {
        Ok(self.entries.lock().unwrap().values().cloned().collect())
    }

    async fn download(&self, _track: &Track, _quality: &str) -> cadence_core::Result<DownloadedTrack> {
        Err(CadenceError::invalid_input("stub cannot download"))
    }

    async fn delete(&self, track_id: &str) -> cadence_core::Result<()> {
        self.entries.lock().unwrap().remove(track_id);
        Ok(())
    }
}

// ===== Harness =====

pub struct Harness {
    pub session: PlayerSession,
    pub status: StatusReceiver,
    pub engine: RecordingEngine,
    pub store: Arc<MemoryStore>,
    pub downloads: Arc<StubDownloads>,
}

impl Harness {
    pub fn new() -> Self {
        Self::with_store(Arc::new(MemoryStore::new()))
    }

    pub fn with_store(store: Arc<MemoryStore>) -> Self {
        init_tracing();

        let engine = RecordingEngine::new();
        let downloads = Arc::new(StubDownloads::default());
        let (session, status) = PlayerSession::new(
            Arc::new(engine.clone()),
            store.clone(),
            Some(downloads.clone()),
        );

        Self {
            session,
            status,
            engine,
            store,
            downloads,
        }
    }

    /// Apply every status report queued so far
    pub async fn pump(&mut self) {
        while let Ok(update) = self.status.try_recv() {
            self.session.handle_status(update).await.unwrap();
        }
    }

    pub fn current_id(&self) -> Option<&str> {
        self.session.current_track().map(|t| t.id.as_str())
    }

    pub fn queue_track_ids(&self) -> Vec<&str> {
        self.session
            .queue()
            .entries()
            .iter()
            .map(|e| e.track.id.as_str())
            .collect()
    }
}
