//! Playback engine binding
//!
//! The engine is the platform's audio session: it loads one source, plays it,
//! and reports progress. The player creates at most one handle at a time and
//! owns it exclusively.

use async_trait::async_trait;
use thiserror::Error;
use tokio::sync::mpsc;

/// Where the audio for a load comes from
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PlaybackSource {
    /// Previously downloaded file
    Local { uri: String },

    /// Network stream of a given bitrate variant
    Remote { url: String, quality: String },
}

impl PlaybackSource {
    /// Address handed to the engine
    pub fn uri(&self) -> &str {
        match self {
            Self::Local { uri } => uri,
            Self::Remote { url, .. } => url,
        }
    }

    pub fn is_local(&self) -> bool {
        matches!(self, Self::Local { .. })
    }
}

/// Options applied when a handle is created
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EngineOptions {
    /// Start playing as soon as the source is loaded
    pub autoplay: bool,

    /// Linear volume in `[0, 1]`
    pub initial_volume: f32,
}

/// Progress report from an engine handle
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct EngineStatus {
    pub position_ms: u64,
    pub duration_ms: Option<u64>,
    pub is_playing: bool,

    /// Set once, on the report that reaches the end of the track
    pub just_finished: bool,
}

/// A status report tagged with the load it belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StatusUpdate {
    pub generation: u64,
    pub status: EngineStatus,
}

/// Receiving side of status reports, drained by the player
pub type StatusReceiver = mpsc::UnboundedReceiver<StatusUpdate>;

/// Reports status for one specific load
///
/// Each load gets a sender stamped with a fresh generation. Reports from a
/// handle that has since been replaced are recognised by their old generation
/// and dropped by the player.
#[derive(Debug, Clone)]
pub struct StatusSender {
    generation: u64,
    tx: mpsc::UnboundedSender<StatusUpdate>,
}

impl StatusSender {
    pub(crate) fn new(generation: u64, tx: mpsc::UnboundedSender<StatusUpdate>) -> Self {
        Self { generation, tx }
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }

    /// Deliver a report; `false` once the player is gone
    pub fn send(&self, status: EngineStatus) -> bool {
        self.tx
            .send(StatusUpdate {
                generation: self.generation,
                status,
            })
            .is_ok()
    }
}

/// Engine errors
#[derive(Debug, Error)]
pub enum EngineError {
    /// Source could not be opened or decoded
    #[error("Failed to load source: {0}")]
    Load(String),

    /// Engine refused a control operation
    #[error("Operation rejected: {0}")]
    Rejected(String),

    /// Handle was used after unload
    #[error("Handle already unloaded")]
    Unloaded,
}

/// Factory for engine handles
#[async_trait]
pub trait PlaybackEngine: Send + Sync {
    /// Load `source` and return a handle that owns the audio session
    async fn create(
        &self,
        source: &PlaybackSource,
        options: EngineOptions,
        status: StatusSender,
    ) -> Result<Box<dyn EngineHandle>, EngineError>;
}

/// One loaded audio session
#[async_trait]
pub trait EngineHandle: Send + Sync {
    async fn play(&mut self) -> Result<(), EngineError>;

    async fn pause(&mut self) -> Result<(), EngineError>;

    async fn seek(&mut self, position_ms: u64) -> Result<(), EngineError>;

    async fn set_volume(&mut self, volume: f32) -> Result<(), EngineError>;

    async fn stop(&mut self) -> Result<(), EngineError>;

    /// Release the session; the handle must not be used afterwards
    async fn unload(&mut self) -> Result<(), EngineError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sender_stamps_generation() {
        let (tx, mut rx) = mpsc::unbounded_channel();
        let sender = StatusSender::new(7, tx);

        assert!(sender.send(EngineStatus {
            position_ms: 1500,
            ..EngineStatus::default()
        }));

        let update = rx.try_recv().unwrap();
        assert_eq!(update.generation, 7);
        assert_eq!(update.status.position_ms, 1500);

        drop(rx);
        assert!(!sender.send(EngineStatus::default()));
    }

    #[test]
    fn source_uri() {
        let local = PlaybackSource::Local {
            uri: "/data/a_320kbps.mp4".into(),
        };
        let remote = PlaybackSource::Remote {
            url: "https://cdn/a.mp4".into(),
            quality: "320kbps".into(),
        };

        assert!(local.is_local());
        assert_eq!(local.uri(), "/data/a_320kbps.mp4");
        assert!(!remote.is_local());
        assert_eq!(remote.uri(), "https://cdn/a.mp4");
    }
}
