//! Play queue
//!
//! Two views of the same entries:
//! - `entries`: playback order currently in effect (possibly shuffled)
//! - `original`: insertion order, used to undo a shuffle exactly
//!
//! ```text
//! entries:  [C*] [A] [D] [B]     <- shuffled, current first
//! original: [A] [B] [C*] [D]     <- restored on un-shuffle
//! ```
//!
//! `current_index` points into `entries` and is kept in range whenever the
//! queue is non-empty.

use crate::error::{PlayerError, Result};
use crate::shuffle::shuffle_entries_with;
use cadence_core::{QueueEntry, RepeatMode, Track};
use rand::Rng;
use std::collections::HashMap;

#[derive(Debug, Clone, Default, PartialEq)]
pub struct PlayQueue {
    entries: Vec<QueueEntry>,
    original: Vec<QueueEntry>,
    current_index: usize,
    shuffled: bool,
}

impl PlayQueue {
    pub fn new() -> Self {
        Self::default()
    }

    /// Rebuild a queue from persisted parts
    ///
    /// `original` is only trusted when it holds exactly the same queue ids as
    /// `entries`; otherwise insertion order falls back to `entries`. The index
    /// is clamped into range.
    pub fn from_parts(
        entries: Vec<QueueEntry>,
        original: Option<Vec<QueueEntry>>,
        current_index: usize,
        shuffled: bool,
    ) -> Self {
        let original = original
            .filter(|original| same_entries(&entries, original))
            .unwrap_or_else(|| entries.clone());

        let current_index = current_index.min(entries.len().saturating_sub(1));

        Self {
            entries,
            original,
            current_index,
            shuffled,
        }
    }

    /// Entries in playback order
    pub fn entries(&self) -> &[QueueEntry] {
        &self.entries
    }

    /// Entries in insertion order
    pub fn original(&self) -> &[QueueEntry] {
        &self.original
    }

    /// Index of the current entry (0 when empty)
    pub fn current_index(&self) -> usize {
        self.current_index
    }

    /// Current entry, if the queue is not empty
    pub fn current(&self) -> Option<&QueueEntry> {
        self.entries.get(self.current_index)
    }

    /// Entry at `index` in playback order
    pub fn get(&self, index: usize) -> Option<&QueueEntry> {
        self.entries.get(index)
    }

    /// Number of entries
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the queue has no entries
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Whether shuffle is on
    pub fn is_shuffled(&self) -> bool {
        self.shuffled
    }

    /// Position of the first entry holding `track_id`
    pub fn position_of_track(&self, track_id: &str) -> Option<usize> {
        self.entries.iter().position(|e| e.track.id == track_id)
    }

    /// Position of the entry with `queue_id`
    pub fn position_of(&self, queue_id: &str) -> Option<usize> {
        self.entries.iter().position(|e| e.queue_id == queue_id)
    }

    /// Replace everything with fresh entries for `tracks`
    ///
    /// The new list is taken in the given order, so the shuffle flag is reset.
    pub fn replace(&mut self, tracks: Vec<Track>, index: usize) -> Result<()> {
        if tracks.is_empty() {
            return Err(PlayerError::InvalidOperation(
                "cannot start playback from an empty queue".into(),
            ));
        }
        if index >= tracks.len() {
            return Err(PlayerError::IndexOutOfBounds {
                index,
                len: tracks.len(),
            });
        }

        self.entries = tracks.into_iter().map(QueueEntry::new).collect();
        self.original = self.entries.clone();
        self.current_index = index;
        self.shuffled = false;
        Ok(())
    }

    /// Point at `track`, appending it when absent
    ///
    /// Returns the index now current.
    pub fn select_or_append(&mut self, track: &Track) -> usize {
        self.current_index = match self.position_of_track(&track.id) {
            Some(index) => index,
            None => {
                self.push(track.clone());
                self.entries.len() - 1
            }
        };
        self.current_index
    }

    /// Move the current pointer
    pub fn set_current_index(&mut self, index: usize) -> Result<()> {
        if index >= self.entries.len() {
            return Err(PlayerError::IndexOutOfBounds {
                index,
                len: self.entries.len(),
            });
        }
        self.current_index = index;
        Ok(())
    }

    /// Append `track` to both orders
    pub fn push(&mut self, track: Track) -> &QueueEntry {
        let entry = QueueEntry::new(track);
        self.original.push(entry.clone());
        self.entries.push(entry);
        &self.entries[self.entries.len() - 1]
    }

    /// Remove the entry with `queue_id` from both orders
    ///
    /// Entries before the current one shift the pointer back by one. Removing
    /// the current entry keeps the pointer (now at the following entry),
    /// clamped to the new end. An emptied queue resets the pointer to 0.
    pub fn remove(&mut self, queue_id: &str) -> Option<QueueEntry> {
        let index = self.position_of(queue_id)?;
        let removed = self.entries.remove(index);
        self.original.retain(|e| e.queue_id != queue_id);

        if self.entries.is_empty() {
            self.current_index = 0;
        } else if index < self.current_index {
            self.current_index -= 1;
        } else if index == self.current_index {
            self.current_index = self.current_index.min(self.entries.len() - 1);
        }

        Some(removed)
    }

    /// Move the entry at `from` so it ends up at `to`
    ///
    /// The current pointer follows the entry it pointed at. While unshuffled
    /// the insertion order mirrors the new order.
    pub fn reorder(&mut self, from: usize, to: usize) -> Result<()> {
        let len = self.entries.len();
        for index in [from, to] {
            if index >= len {
                return Err(PlayerError::IndexOutOfBounds { index, len });
            }
        }

        let current_id = self.current().map(|e| e.queue_id.clone());

        let moved = self.entries.remove(from);
        self.entries.insert(to, moved);

        if let Some(index) = current_id.and_then(|id| self.position_of(&id)) {
            self.current_index = index;
        }
        if !self.shuffled {
            self.original.clone_from(&self.entries);
        }
        Ok(())
    }

    /// Drop every entry
    pub fn clear(&mut self) {
        self.entries.clear();
        self.original.clear();
        self.current_index = 0;
    }

    /// Turn shuffle on, placing `current` (the playing entry) first
    pub fn shuffle_with<R>(&mut self, current: Option<usize>, rng: &mut R)
    where
        R: Rng + ?Sized,
    {
        self.entries = shuffle_entries_with(&self.entries, current, rng);
        self.current_index = 0;
        self.shuffled = true;
    }

    /// Turn shuffle off, restoring insertion order
    ///
    /// The pointer follows the current entry; when there is none it falls back
    /// to the first entry holding `current_track_id`, then to 0.
    pub fn unshuffle(&mut self, current_track_id: Option<&str>) {
        let current_id = self.current().map(|e| e.queue_id.clone());
        self.entries.clone_from(&self.original);
        self.shuffled = false;

        self.current_index = current_id
            .and_then(|id| self.position_of(&id))
            .or_else(|| current_track_id.and_then(|id| self.position_of_track(id)))
            .unwrap_or(0);
    }

    /// Index `next` should move to, honoring repeat-all wraparound
    pub fn next_index(&self, repeat: RepeatMode) -> Option<usize> {
        if self.entries.is_empty() {
            return None;
        }

        let next = self.current_index + 1;
        if next < self.entries.len() {
            Some(next)
        } else if repeat == RepeatMode::All {
            Some(0)
        } else {
            None
        }
    }

    /// Index `previous` should move to, wrapping to the end
    pub fn previous_index(&self) -> Option<usize> {
        if self.entries.is_empty() {
            return None;
        }

        Some(
            self.current_index
                .checked_sub(1)
                .unwrap_or(self.entries.len() - 1),
        )
    }
}

fn same_entries(a: &[QueueEntry], b: &[QueueEntry]) -> bool {
    if a.len() != b.len() {
        return false;
    }

    let mut counts: HashMap<&str, isize> = HashMap::new();
    for entry in a {
        *counts.entry(entry.queue_id.as_str()).or_default() += 1;
    }
    for entry in b {
        *counts.entry(entry.queue_id.as_str()).or_default() -= 1;
    }
    counts.values().all(|&c| c == 0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::thread_rng;

    fn track(id: &str) -> Track {
        Track::new(id, id.to_uppercase())
    }

    fn queue_of(ids: &[&str]) -> PlayQueue {
        let mut queue = PlayQueue::new();
        queue
            .replace(ids.iter().map(|id| track(id)).collect(), 0)
            .unwrap();
        queue
    }

    fn track_ids(entries: &[QueueEntry]) -> Vec<&str> {
        entries.iter().map(|e| e.track.id.as_str()).collect()
    }

    #[test]
    fn replace_assigns_fresh_queue_ids() {
        let mut queue = PlayQueue::new();
        queue.replace(vec![track("a"), track("a")], 1).unwrap();

        assert_eq!(queue.len(), 2);
        assert_ne!(queue.entries()[0].queue_id, queue.entries()[1].queue_id);
        assert_eq!(queue.current_index(), 1);
        assert_eq!(queue.entries(), queue.original());
    }

    #[test]
    fn replace_rejects_bad_input() {
        let mut queue = PlayQueue::new();
        assert!(matches!(
            queue.replace(vec![], 0),
            Err(PlayerError::InvalidOperation(_))
        ));
        assert!(matches!(
            queue.replace(vec![track("a")], 3),
            Err(PlayerError::IndexOutOfBounds { index: 3, len: 1 })
        ));
    }

    #[test]
    fn select_existing_or_append() {
        let mut queue = queue_of(&["a", "b"]);

        assert_eq!(queue.select_or_append(&track("b")), 1);
        assert_eq!(queue.len(), 2);

        assert_eq!(queue.select_or_append(&track("c")), 2);
        assert_eq!(track_ids(queue.original()), ["a", "b", "c"]);
    }

    #[test]
    fn select_on_empty_seeds_queue() {
        let mut queue = PlayQueue::new();
        assert_eq!(queue.select_or_append(&track("a")), 0);
        assert_eq!(queue.len(), 1);
    }

    #[test]
    fn remove_before_current_shifts_pointer() {
        let mut queue = queue_of(&["a", "b", "c"]);
        queue.set_current_index(2).unwrap();

        let id = queue.entries()[0].queue_id.clone();
        queue.remove(&id).unwrap();

        assert_eq!(queue.current_index(), 1);
        assert_eq!(queue.current().unwrap().track.id, "c");
    }

    #[test]
    fn remove_current_points_at_following_entry() {
        let mut queue = queue_of(&["a", "b", "c"]);
        queue.set_current_index(1).unwrap();

        let id = queue.entries()[1].queue_id.clone();
        queue.remove(&id).unwrap();

        assert_eq!(track_ids(queue.entries()), ["a", "c"]);
        assert_eq!(queue.current_index(), 1);
    }

    #[test]
    fn remove_last_current_clamps() {
        let mut queue = queue_of(&["a", "b", "c"]);
        queue.set_current_index(2).unwrap();

        let id = queue.entries()[2].queue_id.clone();
        queue.remove(&id).unwrap();

        assert_eq!(queue.current_index(), 1);
    }

    #[test]
    fn remove_after_current_keeps_pointer() {
        let mut queue = queue_of(&["a", "b", "c"]);

        let id = queue.entries()[2].queue_id.clone();
        queue.remove(&id).unwrap();

        assert_eq!(queue.current_index(), 0);
    }

    #[test]
    fn remove_unknown_is_noop() {
        let mut queue = queue_of(&["a"]);
        assert!(queue.remove("nope").is_none());
        assert_eq!(queue.len(), 1);
    }

    #[test]
    fn remove_only_entry_resets_pointer() {
        let mut queue = queue_of(&["a"]);
        let id = queue.entries()[0].queue_id.clone();
        queue.remove(&id).unwrap();

        assert!(queue.is_empty());
        assert_eq!(queue.current_index(), 0);
    }

    #[test]
    fn reorder_follows_current_entry() {
        let mut queue = queue_of(&["a", "b", "c", "d"]);
        queue.set_current_index(1).unwrap();

        queue.reorder(1, 3).unwrap();

        assert_eq!(track_ids(queue.entries()), ["a", "c", "d", "b"]);
        assert_eq!(queue.current().unwrap().track.id, "b");
        assert_eq!(track_ids(queue.original()), ["a", "c", "d", "b"]);
    }

    #[test]
    fn reorder_around_current() {
        let mut queue = queue_of(&["a", "b", "c"]);
        queue.set_current_index(1).unwrap();

        queue.reorder(2, 0).unwrap();

        assert_eq!(track_ids(queue.entries()), ["c", "a", "b"]);
        assert_eq!(queue.current_index(), 2);
    }

    #[test]
    fn reorder_out_of_bounds() {
        let mut queue = queue_of(&["a", "b"]);
        assert!(matches!(
            queue.reorder(0, 2),
            Err(PlayerError::IndexOutOfBounds { index: 2, len: 2 })
        ));
    }

    #[test]
    fn reorder_while_shuffled_keeps_original() {
        let mut queue = queue_of(&["a", "b", "c"]);
        queue.shuffle_with(Some(0), &mut thread_rng());
        let original = queue.original().to_vec();

        queue.reorder(0, 2).unwrap();

        assert_eq!(queue.original(), original.as_slice());
    }

    #[test]
    fn shuffle_round_trip_restores_order() {
        let mut queue = queue_of(&["a", "b", "c", "d", "e"]);
        queue.set_current_index(2).unwrap();
        let before = queue.entries().to_vec();

        queue.shuffle_with(Some(2), &mut thread_rng());
        assert!(queue.is_shuffled());
        assert_eq!(queue.current_index(), 0);
        assert_eq!(queue.current().unwrap().track.id, "c");

        queue.unshuffle(Some("c"));
        assert!(!queue.is_shuffled());
        assert_eq!(queue.entries(), before.as_slice());
        assert_eq!(queue.current_index(), 2);
    }

    #[test]
    fn next_and_previous() {
        let mut queue = queue_of(&["a", "b", "c"]);

        assert_eq!(queue.next_index(RepeatMode::Off), Some(1));
        assert_eq!(queue.previous_index(), Some(2));

        queue.set_current_index(2).unwrap();
        assert_eq!(queue.next_index(RepeatMode::Off), None);
        assert_eq!(queue.next_index(RepeatMode::One), None);
        assert_eq!(queue.next_index(RepeatMode::All), Some(0));
        assert_eq!(queue.previous_index(), Some(1));

        assert_eq!(PlayQueue::new().next_index(RepeatMode::All), None);
        assert_eq!(PlayQueue::new().previous_index(), None);
    }

    #[test]
    fn from_parts_validates() {
        let queue = queue_of(&["a", "b"]);
        let entries = queue.entries().to_vec();

        let restored = PlayQueue::from_parts(entries.clone(), Some(vec![]), 9, false);
        assert_eq!(restored.original(), entries.as_slice());
        assert_eq!(restored.current_index(), 1);

        let mut reversed = entries.clone();
        reversed.reverse();
        let restored = PlayQueue::from_parts(entries, Some(reversed.clone()), 0, true);
        assert_eq!(restored.original(), reversed.as_slice());
        assert!(restored.is_shuffled());
    }
}
