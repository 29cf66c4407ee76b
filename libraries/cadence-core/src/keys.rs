//! Fixed persistence keys
//!
//! Every slice of state the player or download manager writes to a
//! [`KeyValueStore`](crate::KeyValueStore) lives under one of these keys.

/// Playback-order queue (JSON array of `QueueEntry`)
pub const QUEUE: &str = "queue";

/// Insertion-order queue, kept while shuffle is on (JSON array of `QueueEntry`)
pub const ORIGINAL_QUEUE: &str = "original_queue";

/// Index into the playback-order queue (decimal string)
pub const CURRENT_INDEX: &str = "current_index";

/// Shuffle flag (`"true"` / `"false"`)
pub const SHUFFLE_STATE: &str = "shuffle_state";

/// Repeat mode (`"off"` / `"all"` / `"one"`)
pub const REPEAT_MODE: &str = "repeat_mode";

/// Volume baseline in `[0, 1]` (decimal string)
pub const VOLUME: &str = "volume";

/// Recently played tracks, most recent first (JSON array of `Track`)
pub const RECENTLY_PLAYED: &str = "recently_played";

/// Index of downloaded tracks (JSON array of `DownloadedTrack`)
pub const DOWNLOADED_SONGS: &str = "downloaded_songs";
