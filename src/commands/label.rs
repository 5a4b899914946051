use anyhow::Result;
use colored::Colorize;
use replabel::{Config, Session};

use crate::{
    cli::{Action, ScreenArgs},
    commands::shell::{self, Screen},
};

/// Editing and export only: no deletion, no playback.
pub struct Labeler;

impl Screen for Labeler {
    fn name(&self) -> &'static str {
        "label"
    }

    fn banner(&self) {
        println!(
            "{} labeling screen -- type `help` for commands, `quit` to leave",
            "info:".blue().bold()
        );
    }

    fn handle(&mut self, _action: Action, _session: &mut Session) -> bool {
        false
    }
}

pub async fn handle(args: ScreenArgs, cfg: &Config) -> Result<()> {
    shell::run(Labeler, args, cfg).await
}
