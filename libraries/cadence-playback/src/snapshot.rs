use cadence_core::{QueueEntry, RepeatMode, Track};
use serde::Serialize;

/// Read-only copy of the player state for rendering
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PlayerSnapshot {
    pub current_track: Option<Track>,
    pub queue: Vec<QueueEntry>,
    pub current_index: usize,
    pub is_playing: bool,
    pub position_ms: u64,
    pub duration_ms: u64,
    pub is_shuffled: bool,
    pub repeat_mode: RepeatMode,
    pub volume: f32,
    pub is_loading: bool,
    pub recently_played: Vec<Track>,

    /// Whether an engine handle is currently loaded
    pub has_engine: bool,
}

impl PlayerSnapshot {
    /// Entry at the current index, if any
    pub fn current_entry(&self) -> Option<&QueueEntry> {
        self.queue.get(self.current_index)
    }
}
