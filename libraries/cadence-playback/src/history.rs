//! Recently played tracks
//!
//! Most recent first, unique by track id, bounded.

use cadence_core::Track;
use std::collections::VecDeque;

/// Maximum number of remembered tracks
pub const RECENTLY_PLAYED_LIMIT: usize = 20;

/// Recently played list
#[derive(Debug, Clone, PartialEq)]
pub struct RecentlyPlayed {
    /// Most recent = front
    tracks: VecDeque<Track>,
    max_size: usize,
}

impl RecentlyPlayed {
    pub fn new(max_size: usize) -> Self {
        Self {
            tracks: VecDeque::with_capacity(max_size),
            max_size,
        }
    }

    /// Rebuild from a stored list, dropping duplicates and overflow
    pub fn from_tracks(tracks: Vec<Track>, max_size: usize) -> Self {
        let mut history = Self::new(max_size);
        // Oldest first so the stored head ends up in front
        for track in tracks.into_iter().rev() {
            history.push(track);
        }
        history
    }

    /// Move or insert `track` at the front
    pub fn push(&mut self, track: Track) {
        self.tracks.retain(|t| t.id != track.id);
        self.tracks.push_front(track);
        self.tracks.truncate(self.max_size);
    }

    pub fn contains(&self, track_id: &str) -> bool {
        self.tracks.iter().any(|t| t.id == track_id)
    }

    /// Tracks, most recent first
    pub fn iter(&self) -> impl Iterator<Item = &Track> {
        self.tracks.iter()
    }

    pub fn to_vec(&self) -> Vec<Track> {
        self.tracks.iter().cloned().collect()
    }

    pub fn len(&self) -> usize {
        self.tracks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tracks.is_empty()
    }

    pub fn max_size(&self) -> usize {
        self.max_size
    }
}

impl Default for RecentlyPlayed {
    fn default() -> Self {
        Self::new(RECENTLY_PLAYED_LIMIT)
    }
}
