//! Video player contract driven by the playback scheduler, plus a
//! clock-driven stand-in used by the collector screen.

use async_trait::async_trait;
use tokio::{sync::Mutex, time::Instant};
use tracing::{debug, info};

use crate::error::PlayerError;

#[async_trait]
pub trait VideoPlayer: Send + Sync {
    /// `exact` asks for a frame-accurate seek rather than the nearest keyframe.
    async fn seek(&self, seconds: f64, exact: bool) -> Result<(), PlayerError>;

    async fn play(&self) -> Result<(), PlayerError>;

    async fn pause(&self) -> Result<(), PlayerError>;

    /// Current playback position in seconds.
    async fn current_time(&self) -> Result<f64, PlayerError>;
}

#[derive(Debug, Clone, PartialEq)]
pub enum PlayerCommand {
    Seek { seconds: f64, exact: bool },
    Play,
    Pause,
}

#[derive(Debug, Default)]
struct Clock {
    position: f64,
    playing_since: Option<Instant>,
}

impl Clock {
    fn now(&self) -> f64 {
        match self.playing_since {
            Some(since) => self.position + since.elapsed().as_secs_f64(),
            None => self.position,
        }
    }
}

/// Advances its position with the tokio clock while playing and records every
/// command it receives.
#[derive(Debug)]
pub struct SimulatedPlayer {
    video_id: String,
    clock: Mutex<Clock>,
    log: Mutex<Vec<PlayerCommand>>,
}

impl SimulatedPlayer {
    pub fn new(video_id: impl Into<String>) -> Self {
        let video_id = video_id.into();
        info!(%video_id, "simulated player loaded");
        Self {
            video_id,
            clock: Mutex::new(Clock::default()),
            log: Mutex::new(Vec::new()),
        }
    }

    pub fn video_id(&self) -> &str {
        &self.video_id
    }

    pub async fn commands(&self) -> Vec<PlayerCommand> {
        self.log.lock().await.clone()
    }

    pub async fn is_playing(&self) -> bool {
        self.clock.lock().await.playing_since.is_some()
    }

    async fn record(&self, cmd: PlayerCommand) {
        debug!(video_id = %self.video_id, ?cmd, "player command");
        self.log.lock().await.push(cmd);
    }
}

#[async_trait]
impl VideoPlayer for SimulatedPlayer {
    async fn seek(&self, seconds: f64, exact: bool) -> Result<(), PlayerError> {
        if !seconds.is_finite() || seconds < 0.0 {
            return Err(PlayerError::new("seek", format!("invalid position {seconds}")));
        }

        let mut clock = self.clock.lock().await;
        clock.position = seconds;
        if clock.playing_since.is_some() {
            clock.playing_since = Some(Instant::now());
        }
        drop(clock);

        self.record(PlayerCommand::Seek { seconds, exact }).await;
        Ok(())
    }

    async fn play(&self) -> Result<(), PlayerError> {
        let mut clock = self.clock.lock().await;
        if clock.playing_since.is_none() {
            clock.playing_since = Some(Instant::now());
        }
        drop(clock);

        self.record(PlayerCommand::Play).await;
        Ok(())
    }

    async fn pause(&self) -> Result<(), PlayerError> {
        let mut clock = self.clock.lock().await;
        clock.position = clock.now();
        clock.playing_since = None;
        drop(clock);

        self.record(PlayerCommand::Pause).await;
        Ok(())
    }

    async fn current_time(&self) -> Result<f64, PlayerError> {
        Ok(self.clock.lock().await.now())
    }
}
