//! Simulated playback engine
//!
//! No audio is produced. Each handle runs a clock task that advances a virtual
//! position every tick and reports it to the player, flagging the report that
//! reaches the configured track length as finished.

use crate::config::PlaybackSettings;
use async_trait::async_trait;
use cadence_playback::{
    EngineError, EngineHandle, EngineOptions, EngineStatus, PlaybackEngine, PlaybackSource,
    StatusSender,
};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::Mutex;
use tokio::task::JoinHandle;
use tracing::{debug, info};

#[derive(Debug, Clone, Copy)]
pub struct SimulatedEngine {
    track_length: Duration,
    tick: Duration,
}

impl SimulatedEngine {
    pub fn new(track_length: Duration, tick: Duration) -> Self {
        Self { track_length, tick }
    }

    pub fn from_settings(settings: &PlaybackSettings) -> Self {
        Self::new(
            Duration::from_secs(settings.simulated_track_secs),
            Duration::from_millis(settings.tick_ms),
        )
    }
}

#[derive(Debug)]
struct Clock {
    position_ms: u64,
    length_ms: u64,
    playing: bool,
    volume: f32,
}

#[async_trait]
impl PlaybackEngine for SimulatedEngine {
    async fn create(
        &self,
        source: &PlaybackSource,
        options: EngineOptions,
        status: StatusSender,
    ) -> Result<Box<dyn EngineHandle>, EngineError> {
        if source.uri().is_empty() {
            return Err(EngineError::Load("source has no address".into()));
        }

        let clock = Arc::new(Mutex::new(Clock {
            position_ms: 0,
            length_ms: self.track_length.as_millis() as u64,
            playing: options.autoplay,
            volume: options.initial_volume,
        }));
        let task = tokio::spawn(run_clock(Arc::clone(&clock), status, self.tick));

        info!(
            uri = source.uri(),
            local = source.is_local(),
            volume = options.initial_volume,
            "Simulated engine loaded source"
        );

        Ok(Box::new(SimulatedHandle {
            clock,
            task: Some(task),
        }))
    }
}

async fn run_clock(clock: Arc<Mutex<Clock>>, status: StatusSender, tick: Duration) {
    let step_ms = tick.as_millis() as u64;
    let mut interval = tokio::time::interval(tick);
    // The first tick completes immediately
    interval.tick().await;

    loop {
        interval.tick().await;

        let report = {
            let mut clock = clock.lock().await;
            if !clock.playing {
                continue;
            }

            clock.position_ms = (clock.position_ms + step_ms).min(clock.length_ms);
            let finished = clock.position_ms >= clock.length_ms;
            if finished {
                clock.playing = false;
            }

            EngineStatus {
                position_ms: clock.position_ms,
                duration_ms: Some(clock.length_ms),
                is_playing: clock.playing,
                just_finished: finished,
            }
        };

        if !status.send(report) {
            debug!("Player gone, stopping simulated clock");
            break;
        }
    }
}

struct SimulatedHandle {
    clock: Arc<Mutex<Clock>>,
    task: Option<JoinHandle<()>>,
}

#[async_trait]
impl EngineHandle for SimulatedHandle {
    async fn play(&mut self) -> Result<(), EngineError> {
        if self.task.is_none() {
            return Err(EngineError::Unloaded);
        }
        self.clock.lock().await.playing = true;
        Ok(())
    }

    async fn pause(&mut self) -> Result<(), EngineError> {
        self.clock.lock().await.playing = false;
        Ok(())
    }

    async fn seek(&mut self, position_ms: u64) -> Result<(), EngineError> {
        let mut clock = self.clock.lock().await;
        clock.position_ms = position_ms.min(clock.length_ms);
        Ok(())
    }

    async fn set_volume(&mut self, volume: f32) -> Result<(), EngineError> {
        if !(0.0..=1.0).contains(&volume) {
            return Err(EngineError::Rejected(format!("volume {volume} out of range")));
        }
        self.clock.lock().await.volume = volume;
        Ok(())
    }

    async fn stop(&mut self) -> Result<(), EngineError> {
        let mut clock = self.clock.lock().await;
        clock.playing = false;
        clock.position_ms = 0;
        Ok(())
    }

    async fn unload(&mut self) -> Result<(), EngineError> {
        if let Some(task) = self.task.take() {
            task.abort();
        }
        Ok(())
    }
}

impl Drop for SimulatedHandle {
    fn drop(&mut self) {
        if let Some(task) = self.task.take() {
            task.abort();
        }
    }
}
