use std::{sync::Arc, time::Duration};

use anyhow::Result;
use colored::Colorize;
use replabel::{Config, PlaybackHandle, PlaybackScheduler, Session, SimulatedPlayer};
use tracing::debug;

use crate::{
    cli::{Action, ScreenArgs},
    commands::{
        render,
        shell::{self, Screen, no_set, position},
    },
};

/// Player and scheduler bound to one video id.
struct Preview {
    player: Arc<SimulatedPlayer>,
    scheduler: PlaybackScheduler,
}

/// Labeling plus deletion and sequential playback.
pub struct Collector {
    poll_interval: Duration,
    preview: Option<Preview>,
}

impl Collector {
    pub fn new(poll_interval: Duration) -> Self {
        Self {
            poll_interval,
            preview: None,
        }
    }

    fn play(&mut self, session: &Session) {
        let Some(preview) = self.preview.as_mut() else {
            println!(
                "{} no video loaded -- set a valid YouTube URL first",
                "error:".red().bold()
            );
            return;
        };

        let handle = preview.scheduler.start(session);
        println!(
            "{} playing `{}` (run {})",
            "info:".blue().bold(),
            preview.player.video_id(),
            handle.id()
        );
        follow(handle);
    }

    fn stop(&mut self) {
        let stopped = self
            .preview
            .as_mut()
            .is_some_and(|p| p.scheduler.stop());
        if !stopped {
            println!("{} nothing is playing", "warning:".yellow().bold());
        }
    }
}

impl Screen for Collector {
    fn name(&self) -> &'static str {
        "collect"
    }

    fn banner(&self) {
        println!(
            "{} collection screen -- type `help` for commands, `quit` to leave",
            "info:".blue().bold()
        );
    }

    fn handle(&mut self, action: Action, session: &mut Session) -> bool {
        match action {
            Action::DeleteSet { set } => {
                if let Some(s) = position(set, "Set") {
                    if session.delete_set(s) {
                        println!("{} deleted set {}", "ok:".green().bold(), set);
                    } else {
                        no_set(set);
                    }
                }
            }

            Action::DeleteRep { set, rep } => {
                if let (Some(s), Some(r)) = (position(set, "Set"), position(rep, "Rep")) {
                    if session.delete_rep(s, r) {
                        println!("{} deleted rep {} of set {}", "ok:".green().bold(), rep, set);
                    } else {
                        println!("{} no rep {} in set {}", "error:".red().bold(), rep, set);
                    }
                }
            }

            Action::Play => self.play(session),
            Action::Stop => self.stop(),

            _ => return false,
        }
        true
    }

    fn url_changed(&mut self, video_id: Option<&str>) {
        let current = self.preview.as_ref().map(|p| p.player.video_id());
        if current == video_id {
            return;
        }

        // Dropping the old scheduler cancels its run.
        self.preview = video_id.map(|id| {
            let player = Arc::new(SimulatedPlayer::new(id));
            Preview {
                scheduler: PlaybackScheduler::new(player.clone(), self.poll_interval),
                player,
            }
        });
    }

    fn teardown(&mut self) {
        if let Some(mut preview) = self.preview.take() {
            if preview.scheduler.stop() {
                debug!("playback cancelled on teardown");
            }
        }
    }
}

/// Prints each rep as it starts and the final outcome.
fn follow(handle: PlaybackHandle) {
    let mut states = handle.subscribe();
    tokio::spawn(async move {
        loop {
            let state = *states.borrow_and_update();
            render::playback_state(&state);
            if state.is_terminal() || states.changed().await.is_err() {
                break;
            }
        }
        render::playback_outcome(&handle.wait().await);
    });
}

pub async fn handle(args: ScreenArgs, cfg: &Config) -> Result<()> {
    shell::run(Collector::new(cfg.poll_interval()), args, cfg).await
}
