//! Cadence - Player State Manager
//!
//! Owns everything about "what is playing": the play queue (with shuffle and
//! its original order), repeat mode, volume, recently played tracks, and the
//! single active playback engine handle.
//!
//! This crate provides:
//! - A two-list queue (playback order + original order) with stable queue ids
//! - Shuffle that keeps the current track first and restores exactly
//! - Repeat modes (Off, All, One) and auto-advance on track finish
//! - Source resolution preferring offline downloads over streaming
//! - Persistence of queue and settings through a `KeyValueStore`
//!
//! # Architecture
//!
//! `cadence-playback` does not decode or output audio. The platform supplies a
//! [`PlaybackEngine`] that turns a [`PlaybackSource`] into an [`EngineHandle`]
//! and reports progress through a [`StatusSender`].
//!
//! [`PlayerSession`] holds the state and implements every command.
//! [`PlayerService`] moves a session onto a tokio task so UI commands and
//! engine status updates are applied strictly one at a time; the UI talks to
//! it through a cloneable [`PlayerHandle`].
//!
//! # Example
//!
//! ```rust,no_run
//! use cadence_playback::{PlayerService, PlayerSession};
//! # use std::sync::Arc;
//! # async fn run(
//! #     engine: Arc<dyn cadence_playback::PlaybackEngine>,
//! #     store: Arc<dyn cadence_core::KeyValueStore>,
//! #     track: cadence_core::Track,
//! # ) -> cadence_playback::Result<()> {
//! let (mut session, status) = PlayerSession::new(engine, store, None);
//! session.init().await;
//!
//! let player = PlayerService::spawn(session, status);
//! player.play_track(track, None, None).await?;
//! player.toggle_shuffle().await?;
//! player.shutdown().await?;
//! # Ok(())
//! # }
//! ```

mod engine;
mod error;
mod history;
mod queue;
mod service;
mod session;
mod shuffle;
mod snapshot;
mod source;
mod volume;

pub use engine::{
    EngineError, EngineHandle, EngineOptions, EngineStatus, PlaybackEngine, PlaybackSource,
    StatusReceiver, StatusSender, StatusUpdate,
};
pub use error::{PlayerError, Result};
pub use history::{RecentlyPlayed, RECENTLY_PLAYED_LIMIT};
pub use queue::PlayQueue;
pub use service::{PlayerCommand, PlayerHandle, PlayerService};
pub use session::{PlayerSession, RESTART_THRESHOLD_MS};
pub use shuffle::{shuffle_entries, shuffle_entries_with};
pub use snapshot::PlayerSnapshot;
pub use source::{resolve_source, PREFERRED_QUALITY, FALLBACK_QUALITY};
pub use volume::Volume;
