use super::Track;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A track placed in the play queue
///
/// `queue_id` is scoped to the queue, not the catalog, so the same track can
/// appear several times without key collisions.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QueueEntry {
    /// Unique identifier of this queue slot
    pub queue_id: String,

    /// The queued track
    pub track: Track,
}

impl QueueEntry {
    /// Wrap a track with a freshly generated queue id
    pub fn new(track: Track) -> Self {
        Self {
            queue_id: Uuid::new_v4().to_string(),
            track,
        }
    }

    /// Catalog id of the queued track
    pub fn track_id(&self) -> &str {
        &self.track.id
    }
}
