use std::{
    sync::{Arc, Mutex},
    time::Duration,
};

use async_trait::async_trait;
use replabel::{
    ExerciseType, PlaybackOutcome, PlaybackScheduler, PlaybackState, PlayerCommand, PlayerError,
    Rep, Session, Set, SimulatedPlayer, VideoPlayer,
};

const POLL: Duration = Duration::from_millis(100);

fn session(sets: Vec<Vec<(&str, &str)>>) -> Session {
    Session::from_sets(
        "https://www.youtube.com/watch?v=abc123XYZ_-",
        ExerciseType::Squat,
        sets.into_iter()
            .map(|reps| Set::from_reps(reps.into_iter().map(|(s, e)| Rep::new(s, e)))),
    )
}

fn seek(seconds: f64) -> PlayerCommand {
    PlayerCommand::Seek { seconds, exact: true }
}

#[tokio::test(start_paused = true)]
async fn single_rep_seeks_plays_and_pauses_once() {
    let player = Arc::new(SimulatedPlayer::new("abc123XYZ_-"));
    let mut scheduler = PlaybackScheduler::new(player.clone(), POLL);

    let handle = scheduler.start(&session(vec![vec![("0:00", "0:02")]]));
    let state = handle.subscribe();
    let outcome = handle.wait().await;

    assert_eq!(outcome, PlaybackOutcome::Completed { reps: 1 });
    assert_eq!(*state.borrow(), PlaybackState::Done);
    assert_eq!(
        player.commands().await,
        vec![seek(0.0), PlayerCommand::Play, PlayerCommand::Pause]
    );
    assert!(player.current_time().await.unwrap() >= 2.0);
    assert!(!scheduler.is_running());
}

#[tokio::test(start_paused = true)]
async fn plays_every_rep_across_sets_in_order() {
    let player = Arc::new(SimulatedPlayer::new("abc"));
    let mut scheduler = PlaybackScheduler::new(player.clone(), POLL);

    let sets = vec![
        vec![("1:05", "1:10")],
        vec![("0:30", "0:45"), ("2:00", "2:10")],
    ];
    let outcome = scheduler.start(&session(sets)).wait().await;

    assert_eq!(outcome, PlaybackOutcome::Completed { reps: 3 });
    assert_eq!(
        player.commands().await,
        vec![
            seek(65.0),
            PlayerCommand::Play,
            PlayerCommand::Pause,
            seek(30.0),
            PlayerCommand::Play,
            PlayerCommand::Pause,
            seek(120.0),
            PlayerCommand::Play,
            PlayerCommand::Pause,
        ]
    );
}

#[tokio::test(start_paused = true)]
async fn empty_sequence_issues_no_commands() {
    let player = Arc::new(SimulatedPlayer::new("abc"));
    let mut scheduler = PlaybackScheduler::new(player.clone(), POLL);

    let mut empty = session(vec![vec![("0:00", "0:01")]]);
    assert!(empty.delete_set(0));

    let handle = scheduler.start(&empty);
    let state = handle.subscribe();
    assert_eq!(handle.wait().await, PlaybackOutcome::Completed { reps: 0 });
    assert_eq!(*state.borrow(), PlaybackState::Done);
    assert!(player.commands().await.is_empty());
}

#[tokio::test(start_paused = true)]
async fn starting_again_cancels_the_previous_run() {
    let player = Arc::new(SimulatedPlayer::new("abc"));
    let mut scheduler = PlaybackScheduler::new(player.clone(), POLL);

    let first = scheduler.start(&session(vec![vec![("0:00", "0:10")]]));
    tokio::time::sleep(Duration::from_millis(350)).await;
    assert!(scheduler.is_running());

    let second = scheduler.start(&session(vec![vec![("1:00", "1:01")]]));

    assert_eq!(first.wait().await, PlaybackOutcome::Cancelled);
    assert_eq!(second.wait().await, PlaybackOutcome::Completed { reps: 1 });
    assert_eq!(
        player.commands().await,
        vec![
            seek(0.0),
            PlayerCommand::Play,
            seek(60.0),
            PlayerCommand::Play,
            PlayerCommand::Pause,
        ]
    );
}

#[tokio::test(start_paused = true)]
async fn stop_and_drop_cancel_the_run() {
    let player = Arc::new(SimulatedPlayer::new("abc"));
    let mut scheduler = PlaybackScheduler::new(player.clone(), POLL);

    let handle = scheduler.start(&session(vec![vec![("0:00", "0:10")]]));
    tokio::time::sleep(Duration::from_millis(250)).await;
    assert!(scheduler.stop());
    assert!(!scheduler.stop());
    assert_eq!(handle.wait().await, PlaybackOutcome::Cancelled);

    let handle = scheduler.start(&session(vec![vec![("0:00", "0:10")]]));
    tokio::time::sleep(Duration::from_millis(250)).await;
    drop(scheduler);
    let state = handle.subscribe();
    assert_eq!(handle.wait().await, PlaybackOutcome::Cancelled);
    assert_eq!(*state.borrow(), PlaybackState::Cancelled);

    let pauses = player
        .commands()
        .await
        .into_iter()
        .filter(|c| *c == PlayerCommand::Pause)
        .count();
    assert_eq!(pauses, 0);
}

/// Plays fine until it is asked to pause.
#[derive(Default)]
struct BrokenPausePlayer {
    calls: Mutex<Vec<&'static str>>,
}

#[async_trait]
impl VideoPlayer for BrokenPausePlayer {
    async fn seek(&self, _seconds: f64, _exact: bool) -> Result<(), PlayerError> {
        self.calls.lock().unwrap().push("seek");
        Ok(())
    }

    async fn play(&self) -> Result<(), PlayerError> {
        self.calls.lock().unwrap().push("play");
        Ok(())
    }

    async fn pause(&self) -> Result<(), PlayerError> {
        self.calls.lock().unwrap().push("pause");
        Err(PlayerError::new("pause", "player went away"))
    }

    async fn current_time(&self) -> Result<f64, PlayerError> {
        Ok(3600.0)
    }
}

#[tokio::test(start_paused = true)]
async fn player_failure_halts_the_run() {
    let player = Arc::new(BrokenPausePlayer::default());
    let mut scheduler = PlaybackScheduler::new(player.clone(), POLL);

    let handle = scheduler.start(&session(vec![vec![("0:00", "0:01"), ("0:02", "0:03")]]));
    let state = handle.subscribe();

    match handle.wait().await {
        PlaybackOutcome::Failed(e) => assert_eq!(e.command, "pause"),
        other => panic!("expected failure, got {other:?}"),
    }
    assert_eq!(*state.borrow(), PlaybackState::Failed);
    assert_eq!(*player.calls.lock().unwrap(), vec!["seek", "play", "pause"]);
}

#[tokio::test(start_paused = true)]
async fn empty_set_between_sets_is_skipped() {
    let player = Arc::new(SimulatedPlayer::new("abc"));
    let mut scheduler = PlaybackScheduler::new(player.clone(), POLL);

    let sets = vec![vec![("0:10", "0:12")], vec![], vec![("0:40", "0:41")]];
    let outcome = scheduler.start(&session(sets)).wait().await;

    assert_eq!(outcome, PlaybackOutcome::Completed { reps: 2 });
    assert_eq!(
        player.commands().await,
        vec![
            seek(10.0),
            PlayerCommand::Play,
            PlayerCommand::Pause,
            seek(40.0),
            PlayerCommand::Play,
            PlayerCommand::Pause,
        ]
    );
}

/// Accepts commands but cannot report its position.
#[derive(Default)]
struct BlindPlayer {
    calls: Mutex<Vec<&'static str>>,
}

#[async_trait]
impl VideoPlayer for BlindPlayer {
    async fn seek(&self, _seconds: f64, _exact: bool) -> Result<(), PlayerError> {
        self.calls.lock().unwrap().push("seek");
        Ok(())
    }

    async fn play(&self) -> Result<(), PlayerError> {
        self.calls.lock().unwrap().push("play");
        Ok(())
    }

    async fn pause(&self) -> Result<(), PlayerError> {
        self.calls.lock().unwrap().push("pause");
        Ok(())
    }

    async fn current_time(&self) -> Result<f64, PlayerError> {
        self.calls.lock().unwrap().push("current_time");
        Err(PlayerError::new("current_time", "no position"))
    }
}

#[tokio::test(start_paused = true)]
async fn position_failure_halts_the_run() {
    let player = Arc::new(BlindPlayer::default());
    let mut scheduler = PlaybackScheduler::new(player.clone(), POLL);

    let handle = scheduler.start(&session(vec![vec![("0:00", "0:05")], vec![("1:00", "1:05")]]));
    let state = handle.subscribe();

    match handle.wait().await {
        PlaybackOutcome::Failed(e) => assert_eq!(e.command, "current_time"),
        other => panic!("expected failure, got {other:?}"),
    }
    assert_eq!(*state.borrow(), PlaybackState::Failed);
    assert_eq!(*player.calls.lock().unwrap(), vec!["seek", "play", "current_time"]);
}

/// Reports every rep as finished on the first poll, so a run issues
/// commands as fast as the poll interval allows.
#[derive(Default)]
struct RecordingPlayer {
    log: Mutex<Vec<PlayerCommand>>,
}

#[async_trait]
impl VideoPlayer for RecordingPlayer {
    async fn seek(&self, seconds: f64, exact: bool) -> Result<(), PlayerError> {
        self.log.lock().unwrap().push(PlayerCommand::Seek { seconds, exact });
        Ok(())
    }

    async fn play(&self) -> Result<(), PlayerError> {
        self.log.lock().unwrap().push(PlayerCommand::Play);
        Ok(())
    }

    async fn pause(&self) -> Result<(), PlayerError> {
        self.log.lock().unwrap().push(PlayerCommand::Pause);
        Ok(())
    }

    async fn current_time(&self) -> Result<f64, PlayerError> {
        Ok(f64::MAX)
    }
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn replaced_run_never_interleaves_with_its_successor() {
    let busy: Vec<Vec<(&str, &str)>> = vec![vec![("0:00", "0:01"); 50]; 4];

    for round in 0..20u64 {
        let player = Arc::new(RecordingPlayer::default());
        let mut scheduler = PlaybackScheduler::new(player.clone(), Duration::from_millis(1));

        let first = scheduler.start(&session(busy.clone()));
        tokio::time::sleep(Duration::from_millis(5 + round % 7)).await;
        let second = scheduler.start(&session(vec![vec![("59:58", "59:59")]]));

        assert_eq!(first.wait().await, PlaybackOutcome::Cancelled);
        assert_eq!(second.wait().await, PlaybackOutcome::Completed { reps: 1 });

        let log = player.log.lock().unwrap().clone();
        let from = log
            .iter()
            .position(|c| *c == seek(3598.0))
            .expect("second run seeks to its rep");
        assert_eq!(
            &log[from..],
            &[seek(3598.0), PlayerCommand::Play, PlayerCommand::Pause],
            "round {round}"
        );
    }
}
