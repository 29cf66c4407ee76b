//! Serialized command loop around a [`PlayerSession`]
//!
//! The session lives on its own tokio task. UI commands arrive over an mpsc
//! channel, engine reports over the session's status channel, and a single
//! `select!` loop applies them one at a time. A second `play_track` therefore
//! waits for the first load to finish instead of racing it.

use crate::engine::StatusReceiver;
use crate::error::{PlayerError, Result};
use crate::session::PlayerSession;
use crate::snapshot::PlayerSnapshot;
use cadence_core::{QueueEntry, RepeatMode, Track};
use tokio::sync::{mpsc, oneshot, watch};
use tracing::{debug, info, warn};

const COMMAND_BUFFER: usize = 32;

type Reply<T> = oneshot::Sender<Result<T>>;

/// Commands accepted by the player task
#[derive(Debug)]
pub enum PlayerCommand {
    PlayTrack {
        track: Track,
        queue: Option<Vec<Track>>,
        index: Option<usize>,
        reply: Reply<()>,
    },
    TogglePlayPause {
        reply: Reply<()>,
    },
    SeekTo {
        position_ms: u64,
        reply: Reply<()>,
    },
    PlayNext {
        reply: Reply<()>,
    },
    PlayPrevious {
        reply: Reply<()>,
    },
    AddToQueue {
        track: Track,
        reply: Reply<QueueEntry>,
    },
    RemoveFromQueue {
        queue_id: String,
        reply: Reply<bool>,
    },
    ReorderQueue {
        from: usize,
        to: usize,
        reply: Reply<()>,
    },
    ClearQueue {
        reply: Reply<()>,
    },
    ToggleShuffle {
        reply: Reply<bool>,
    },
    SetRepeatMode {
        mode: RepeatMode,
        reply: Reply<()>,
    },
    SetVolume {
        volume: f32,
        reply: Reply<f32>,
    },
    Snapshot {
        reply: Reply<PlayerSnapshot>,
    },
    Shutdown {
        reply: Reply<()>,
    },
}

/// Owns the player task
pub struct PlayerService {
    session: PlayerSession,
    commands: mpsc::Receiver<PlayerCommand>,
    status: StatusReceiver,
    snapshots: watch::Sender<PlayerSnapshot>,
}

impl PlayerService {
    /// Move `session` onto a new task and return a handle to it
    ///
    /// Call [`PlayerSession::init`] first if persisted state should be loaded.
    pub fn spawn(session: PlayerSession, status: StatusReceiver) -> PlayerHandle {
        let (tx, commands) = mpsc::channel(COMMAND_BUFFER);
        let (snapshots, snapshot_rx) = watch::channel(session.snapshot());

        let service = Self {
            session,
            commands,
            status,
            snapshots,
        };
        tokio::spawn(service.run());

        PlayerHandle {
            commands: tx,
            snapshots: snapshot_rx,
        }
    }

    async fn run(mut self) {
        info!("Player service started");

        loop {
            tokio::select! {
                command = self.commands.recv() => {
                    match command {
                        Some(PlayerCommand::Shutdown { reply }) => {
                            self.session.teardown().await;
                            self.publish();
                            let _ = reply.send(Ok(()));
                            break;
                        }
                        Some(command) => self.dispatch(command).await,
                        None => {
                            debug!("All player handles dropped");
                            self.session.teardown().await;
                            self.publish();
                            break;
                        }
                    }
                }

                Some(update) = self.status.recv() => {
                    if let Err(e) = self.session.handle_status(update).await {
                        warn!(error = %e, "Failed to apply engine status");
                    }
                }
            }

            self.publish();
        }

        info!("Player service stopped");
    }

    async fn dispatch(&mut self, command: PlayerCommand) {
        let session = &mut self.session;

        match command {
            PlayerCommand::PlayTrack {
                track,
                queue,
                index,
                reply,
            } => {
                let _ = reply.send(session.play_track(track, queue, index).await);
            }
            PlayerCommand::TogglePlayPause { reply } => {
                let _ = reply.send(session.toggle_play_pause().await);
            }
            PlayerCommand::SeekTo { position_ms, reply } => {
                let _ = reply.send(session.seek_to(position_ms).await);
            }
            PlayerCommand::PlayNext { reply } => {
                let _ = reply.send(session.play_next().await);
            }
            PlayerCommand::PlayPrevious { reply } => {
                let _ = reply.send(session.play_previous().await);
            }
            PlayerCommand::AddToQueue { track, reply } => {
                let _ = reply.send(session.add_to_queue(track).await);
            }
            PlayerCommand::RemoveFromQueue { queue_id, reply } => {
                let _ = reply.send(session.remove_from_queue(&queue_id).await);
            }
            PlayerCommand::ReorderQueue { from, to, reply } => {
                let _ = reply.send(session.reorder_queue(from, to).await);
            }
            PlayerCommand::ClearQueue { reply } => {
                let _ = reply.send(session.clear_queue().await);
            }
            PlayerCommand::ToggleShuffle { reply } => {
                let _ = reply.send(session.toggle_shuffle().await);
            }
            PlayerCommand::SetRepeatMode { mode, reply } => {
                let _ = reply.send(session.set_repeat_mode(mode).await);
            }
            PlayerCommand::SetVolume { volume, reply } => {
                let _ = reply.send(session.set_volume(volume).await);
            }
            PlayerCommand::Snapshot { reply } => {
                let _ = reply.send(Ok(session.snapshot()));
            }
            PlayerCommand::Shutdown { reply } => {
                // Handled by the loop; reaching here means a logic error upstream
                let _ = reply.send(Err(PlayerError::InvalidOperation(
                    "shutdown must be handled by the service loop".into(),
                )));
            }
        }
    }

    fn publish(&self) {
        let snapshot = self.session.snapshot();
        self.snapshots.send_if_modified(|current| {
            if *current == snapshot {
                false
            } else {
                *current = snapshot;
                true
            }
        });
    }
}

/// Cloneable front end to the player task
///
/// Every method waits until the command has been applied.
#[derive(Debug, Clone)]
pub struct PlayerHandle {
    commands: mpsc::Sender<PlayerCommand>,
    snapshots: watch::Receiver<PlayerSnapshot>,
}

impl PlayerHandle {
    async fn request<T>(&self, make: impl FnOnce(Reply<T>) -> PlayerCommand) -> Result<T> {
        let (reply, response) = oneshot::channel();
        self.commands
            .send(make(reply))
            .await
            .map_err(|_| PlayerError::SessionClosed)?;
        response.await.map_err(|_| PlayerError::SessionClosed)?
    }

    /// See [`PlayerSession::play_track`]
    pub async fn play_track(
        &self,
        track: Track,
        queue: Option<Vec<Track>>,
        index: Option<usize>,
    ) -> Result<()> {
        self.request(|reply| PlayerCommand::PlayTrack {
            track,
            queue,
            index,
            reply,
        })
        .await
    }

    /// Replace the queue with `tracks` and play the one at `index`
    pub async fn play_tracks(&self, tracks: Vec<Track>, index: usize) -> Result<()> {
        let Some(track) = tracks.get(index).cloned() else {
            return Err(PlayerError::IndexOutOfBounds {
                index,
                len: tracks.len(),
            });
        };
        self.play_track(track, Some(tracks), Some(index)).await
    }

    pub async fn toggle_play_pause(&self) -> Result<()> {
        self.request(|reply| PlayerCommand::TogglePlayPause { reply })
            .await
    }

    pub async fn seek_to(&self, position_ms: u64) -> Result<()> {
        self.request(|reply| PlayerCommand::SeekTo { position_ms, reply })
            .await
    }

    pub async fn play_next(&self) -> Result<()> {
        self.request(|reply| PlayerCommand::PlayNext { reply }).await
    }

    pub async fn play_previous(&self) -> Result<()> {
        self.request(|reply| PlayerCommand::PlayPrevious { reply })
            .await
    }

    pub async fn add_to_queue(&self, track: Track) -> Result<QueueEntry> {
        self.request(|reply| PlayerCommand::AddToQueue { track, reply })
            .await
    }

    pub async fn remove_from_queue(&self, queue_id: impl Into<String>) -> Result<bool> {
        let queue_id = queue_id.into();
        self.request(|reply| PlayerCommand::RemoveFromQueue { queue_id, reply })
            .await
    }

    pub async fn reorder_queue(&self, from: usize, to: usize) -> Result<()> {
        self.request(|reply| PlayerCommand::ReorderQueue { from, to, reply })
            .await
    }

    pub async fn clear_queue(&self) -> Result<()> {
        self.request(|reply| PlayerCommand::ClearQueue { reply })
            .await
    }

    pub async fn toggle_shuffle(&self) -> Result<bool> {
        self.request(|reply| PlayerCommand::ToggleShuffle { reply })
            .await
    }

    pub async fn set_repeat_mode(&self, mode: RepeatMode) -> Result<()> {
        self.request(|reply| PlayerCommand::SetRepeatMode { mode, reply })
            .await
    }

    pub async fn set_volume(&self, volume: f32) -> Result<f32> {
        self.request(|reply| PlayerCommand::SetVolume { volume, reply })
            .await
    }

    /// Current state, after every previously sent command has been applied
    pub async fn snapshot(&self) -> Result<PlayerSnapshot> {
        self.request(|reply| PlayerCommand::Snapshot { reply }).await
    }

    /// Latest published state without a round trip
    pub fn latest(&self) -> PlayerSnapshot {
        self.snapshots.borrow().clone()
    }

    /// Watch state changes
    pub fn subscribe(&self) -> watch::Receiver<PlayerSnapshot> {
        self.snapshots.clone()
    }

    /// Release the engine and stop the task
    pub async fn shutdown(&self) -> Result<()> {
        self.request(|reply| PlayerCommand::Shutdown { reply })
            .await
    }
}
