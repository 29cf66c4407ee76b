//! Queue shuffling
//!
//! Uniform Fisher-Yates over every entry except the anchor (the entry that is
//! currently playing), which is placed first.

use cadence_core::QueueEntry;
use rand::seq::SliceRandom;
use rand::{thread_rng, Rng};

/// Shuffle `entries`, keeping `anchor` (an index into `entries`) in front
pub fn shuffle_entries(entries: &[QueueEntry], anchor: Option<usize>) -> Vec<QueueEntry> {
    shuffle_entries_with(entries, anchor, &mut thread_rng())
}

/// [`shuffle_entries`] with a caller-supplied RNG
pub fn shuffle_entries_with<R>(entries: &[QueueEntry], anchor: Option<usize>, rng: &mut R) -> Vec<QueueEntry>
where
    R: Rng + ?Sized,
{
    let anchor = anchor.filter(|&i| i < entries.len());

    let mut rest: Vec<QueueEntry> = entries
        .iter()
        .enumerate()
        .filter(|(i, _)| Some(*i) != anchor)
        .map(|(_, entry)| entry.clone())
        .collect();
    rest.shuffle(rng);

    let mut shuffled = Vec::with_capacity(entries.len());
    if let Some(i) = anchor {
        shuffled.push(entries[i].clone());
    }
    shuffled.extend(rest);
    shuffled
}
