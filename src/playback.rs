//! Sequential playback of every rep against a [`VideoPlayer`].
//!
//! A run seeks to a rep's start, plays, and polls the position every
//! `poll_interval` until it reaches the rep's end, then pauses and moves on to
//! the next rep (set by set). Each run owns a cancellation channel; starting
//! another run, calling [`PlaybackScheduler::stop`] or dropping the scheduler
//! cancels it, after which it issues no further player command.
//!
//! Every player command goes through the scheduler's [`Gate`]: it is issued
//! under a lock shared by all runs, and only while the run's generation is
//! still current. A cancelled run therefore never interleaves a command with
//! the run that replaced it, whatever worker thread it is on.

use std::{
    sync::{
        Arc,
        atomic::{AtomicU64, Ordering},
    },
    time::Duration,
};

use tokio::{
    sync::{Mutex, MutexGuard, watch},
    task::JoinHandle,
};
use tracing::{Instrument, debug, info, info_span, warn};
use uuid::Uuid;

use crate::{
    error::PlayerError,
    models::Session,
    player::VideoPlayer,
    utils::to_seconds,
    validate::is_valid_rep,
};

/// One rep resolved to seconds, with its 0-based position.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Cue {
    pub set: usize,
    pub rep: usize,
    pub start: u32,
    pub end: u32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlaybackState {
    Idle,
    Seeking(Cue),
    Playing(Cue),
    Advancing(Cue),
    Done,
    Cancelled,
    Failed,
}

impl PlaybackState {
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Done | Self::Cancelled | Self::Failed)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum PlaybackOutcome {
    Completed { reps: usize },
    Cancelled,
    Failed(PlayerError),
}

/// Resolves the flattened rep list of `session`. Reps that would not pass
/// validation are skipped.
pub fn cues(session: &Session) -> Vec<Cue> {
    session
        .flattened()
        .into_iter()
        .filter_map(|r| {
            if !is_valid_rep(r.data) {
                warn!(set = r.set + 1, rep = r.rep + 1, "skipping invalid rep");
                return None;
            }
            Some(Cue {
                set: r.set,
                rep: r.rep,
                start: to_seconds(&r.data.start).ok()?,
                end: to_seconds(&r.data.end).ok()?,
            })
        })
        .collect()
}

/// Serializes player commands across runs. `generation` moves on every stop.
#[derive(Default)]
struct Gate {
    generation: AtomicU64,
    commands: Mutex<()>,
}

/// The player as seen by one run.
struct RunPlayer {
    player: Arc<dyn VideoPlayer>,
    gate: Arc<Gate>,
    generation: u64,
}

impl RunPlayer {
    /// Holds the command lock, or reports the run as superseded.
    async fn turn(&self) -> Result<MutexGuard<'_, ()>, Halt> {
        let turn = self.gate.commands.lock().await;
        if self.gate.generation.load(Ordering::SeqCst) != self.generation {
            return Err(Halt::Cancelled);
        }
        Ok(turn)
    }

    async fn seek(&self, seconds: f64) -> Result<(), Halt> {
        let _turn = self.turn().await?;
        Ok(self.player.seek(seconds, true).await?)
    }

    async fn play(&self) -> Result<(), Halt> {
        let _turn = self.turn().await?;
        Ok(self.player.play().await?)
    }

    async fn pause(&self) -> Result<(), Halt> {
        let _turn = self.turn().await?;
        Ok(self.player.pause().await?)
    }

    async fn current_time(&self) -> Result<f64, Halt> {
        let _turn = self.turn().await?;
        Ok(self.player.current_time().await?)
    }
}

struct ActiveRun {
    cancel: watch::Sender<bool>,
    state: watch::Receiver<PlaybackState>,
}

pub struct PlaybackScheduler {
    player: Arc<dyn VideoPlayer>,
    poll_interval: Duration,
    gate: Arc<Gate>,
    active: Option<ActiveRun>,
}

impl PlaybackScheduler {
    pub fn new(player: Arc<dyn VideoPlayer>, poll_interval: Duration) -> Self {
        Self {
            player,
            poll_interval,
            gate: Arc::new(Gate::default()),
            active: None,
        }
    }

    /// Cancels any run in flight and plays every rep of `session` from the
    /// first one. Must be called inside a tokio runtime.
    pub fn start(&mut self, session: &Session) -> PlaybackHandle {
        self.stop();

        let cues = cues(session);
        let id = Uuid::new_v4();
        let (cancel_tx, cancel_rx) = watch::channel(false);
        let (state_tx, state_rx) = watch::channel(PlaybackState::Idle);

        let player = RunPlayer {
            player: self.player.clone(),
            gate: self.gate.clone(),
            generation: self.gate.generation.load(Ordering::SeqCst),
        };

        let span = info_span!("playback", run = %id);
        let task = tokio::spawn(
            run(
                player,
                cues,
                self.poll_interval,
                cancel_rx,
                state_tx,
            )
            .instrument(span),
        );

        self.active = Some(ActiveRun {
            cancel: cancel_tx,
            state: state_rx.clone(),
        });

        PlaybackHandle {
            id,
            state: state_rx,
            task,
        }
    }

    /// Returns `true` if a run was still in flight.
    pub fn stop(&mut self) -> bool {
        // Commands of any earlier run are refused from here on.
        self.gate.generation.fetch_add(1, Ordering::SeqCst);

        let Some(active) = self.active.take() else {
            return false;
        };

        let running = !active.state.borrow().is_terminal();
        // The receiver is gone once the run has finished.
        let _ = active.cancel.send(true);
        running
    }

    pub fn is_running(&self) -> bool {
        self.active
            .as_ref()
            .is_some_and(|a| !a.state.borrow().is_terminal())
    }
}

impl Drop for PlaybackScheduler {
    fn drop(&mut self) {
        self.stop();
    }
}

pub struct PlaybackHandle {
    id: Uuid,
    state: watch::Receiver<PlaybackState>,
    task: JoinHandle<PlaybackOutcome>,
}

impl PlaybackHandle {
    pub fn id(&self) -> Uuid {
        self.id
    }

    pub fn state(&self) -> PlaybackState {
        *self.state.borrow()
    }

    pub fn subscribe(&self) -> watch::Receiver<PlaybackState> {
        self.state.clone()
    }

    pub async fn wait(self) -> PlaybackOutcome {
        match self.task.await {
            Ok(outcome) => outcome,
            Err(e) => {
                warn!(run = %self.id, "playback task aborted: {e}");
                PlaybackOutcome::Failed(PlayerError::new("run", e.to_string()))
            }
        }
    }
}

/// Why a run stopped before the end of its cues.
enum Halt {
    Cancelled,
    Failed(PlayerError),
}

impl From<PlayerError> for Halt {
    fn from(e: PlayerError) -> Self {
        Self::Failed(e)
    }
}

async fn run(
    player: RunPlayer,
    cues: Vec<Cue>,
    poll_interval: Duration,
    mut cancel: watch::Receiver<bool>,
    state: watch::Sender<PlaybackState>,
) -> PlaybackOutcome {
    info!(reps = cues.len(), "playback started");

    let (outcome, last) = match drive(&player, &cues, poll_interval, &mut cancel, &state).await {
        Ok(()) => (PlaybackOutcome::Completed { reps: cues.len() }, PlaybackState::Done),
        Err(Halt::Cancelled) => (PlaybackOutcome::Cancelled, PlaybackState::Cancelled),
        Err(Halt::Failed(e)) => {
            warn!("playback halted: {e}");
            (PlaybackOutcome::Failed(e), PlaybackState::Failed)
        }
    };

    state.send_replace(last);
    info!(?outcome, "playback finished");
    outcome
}

async fn drive(
    player: &RunPlayer,
    cues: &[Cue],
    poll_interval: Duration,
    cancel: &mut watch::Receiver<bool>,
    state: &watch::Sender<PlaybackState>,
) -> Result<(), Halt> {
    for cue in cues {
        check(cancel)?;
        state.send_replace(PlaybackState::Seeking(*cue));
        debug!(set = cue.set + 1, rep = cue.rep + 1, start = cue.start, end = cue.end, "seeking");
        player.seek(f64::from(cue.start)).await?;

        check(cancel)?;
        player.play().await?;
        state.send_replace(PlaybackState::Playing(*cue));

        loop {
            tokio::select! {
                _ = cancel.changed() => return Err(Halt::Cancelled),
                _ = tokio::time::sleep(poll_interval) => {}
            }

            let now = player.current_time().await?;
            check(cancel)?;
            if now >= f64::from(cue.end) {
                break;
            }
        }

        player.pause().await?;
        state.send_replace(PlaybackState::Advancing(*cue));
    }

    Ok(())
}

fn check(cancel: &watch::Receiver<bool>) -> Result<(), Halt> {
    if is_cancelled(cancel) {
        Err(Halt::Cancelled)
    } else {
        Ok(())
    }
}

/// A dropped sender counts as cancellation.
fn is_cancelled(cancel: &watch::Receiver<bool>) -> bool {
    *cancel.borrow() || cancel.has_changed().is_err()
}
