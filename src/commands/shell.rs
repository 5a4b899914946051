use std::{io::Write, path::PathBuf};

use anyhow::{Context, Result};
use clap::Parser;
use colored::Colorize;
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing::debug;

use replabel::{
    Config, ExerciseType, LabelError, RepField, Session, export, storage,
    types::best_exercise_suggestion,
    validate::{is_timestamp, rep_issues},
};

use crate::{
    cli::{Action, ScreenArgs, ShellLine},
    commands::render,
};

/// Screen-specific behavior layered over the shared editor.
pub trait Screen {
    fn name(&self) -> &'static str;

    fn banner(&self);

    /// Handles the actions only some screens offer. Returns `false` when this
    /// screen does not support `action`.
    fn handle(&mut self, action: Action, session: &mut Session) -> bool;

    fn url_changed(&mut self, _video_id: Option<&str>) {}

    fn teardown(&mut self) {}
}

pub enum Flow {
    Continue,
    Quit,
}

/// Session state shared by every screen.
pub struct Editor {
    pub session: Session,
    pub export_path: PathBuf,
}

impl Editor {
    pub fn new(args: &ScreenArgs, cfg: &Config) -> Self {
        let mut session = Session::new(args.exercise.unwrap_or_else(|| cfg.exercise()));
        if let Some(url) = &args.url {
            if session.set_url(url.clone()).is_none() {
                println!("{} Invalid YouTube URL `{}`", "warning:".yellow().bold(), url);
            }
        }

        Self {
            session,
            export_path: args.out.clone().unwrap_or_else(|| cfg.export_file()),
        }
    }
}

pub async fn run<S: Screen>(mut screen: S, args: ScreenArgs, cfg: &Config) -> Result<()> {
    let mut editor = Editor::new(&args, cfg);
    screen.banner();
    screen.url_changed(editor.session.video_id());
    render::session(&editor.session);

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    loop {
        print!("{}> ", screen.name().cyan());
        std::io::stdout().flush().context("Failed to flush stdout")?;

        let Some(line) = lines.next_line().await.context("Failed to read input")? else {
            println!();
            break;
        };

        let words: Vec<&str> = line.split_whitespace().collect();
        if words.is_empty() {
            continue;
        }

        let action = match ShellLine::try_parse_from(words) {
            Ok(parsed) => parsed.action,
            Err(e) => {
                let _ = e.print();
                continue;
            }
        };

        if let Flow::Quit = apply(&mut screen, &mut editor, action) {
            break;
        }
    }

    screen.teardown();
    Ok(())
}

pub fn apply<S: Screen>(screen: &mut S, editor: &mut Editor, action: Action) -> Flow {
    let session = &mut editor.session;

    match action {
        Action::Url { url } => {
            let id = session.set_url(url);
            match &id {
                Some(id) => println!("{} video `{}`", "ok:".green().bold(), id),
                None => println!(
                    "{} Invalid YouTube URL -- preview and playback disabled",
                    "warning:".yellow().bold()
                ),
            }
            screen.url_changed(id.as_deref());
        }

        Action::Exercise { name } => {
            let name = name.join(" ");
            match ExerciseType::from_name(&name) {
                Some(ty) => {
                    session.set_exercise_type(ty);
                    println!("{} exercise set to {}", "ok:".green().bold(), ty.label().bold());
                }
                None => match best_exercise_suggestion(&name) {
                    Some(sug) => println!(
                        "{} unknown exercise `{}` -- did you mean: `{}`?",
                        "error:".red().bold(),
                        name,
                        sug.green()
                    ),
                    None => println!(
                        "{} unknown exercise `{}` (expected one of: {})",
                        "error:".red().bold(),
                        name,
                        render::exercise_choices()
                    ),
                },
            }
        }

        Action::AddSet => {
            session.add_set();
            println!("{} added set {}", "ok:".green().bold(), session.sets().len());
        }

        Action::AddRep { set } => {
            let Some(s) = position(set, "Set") else {
                return Flow::Continue;
            };
            if session.add_rep(s) {
                println!(
                    "{} added rep {} to set {}",
                    "ok:".green().bold(),
                    session.sets()[s].len(),
                    set
                );
            } else {
                no_set(set);
            }
        }

        Action::Start { set, rep, time } => edit_time(session, set, rep, RepField::Start, time),
        Action::End { set, rep, time } => edit_time(session, set, rep, RepField::End, time),

        Action::Show => render::session(session),

        Action::Check => {
            let issues = rep_issues(session);
            if issues.is_empty() {
                println!("{} every rep is valid", "ok:".green().bold());
            } else {
                println!("{} {} rep(s) need fixing:", "warning:".yellow().bold(), issues.len());
                render::issues(&issues);
            }
        }

        Action::Export { path } => {
            let path = path.unwrap_or_else(|| editor.export_path.clone());
            match export::encode(session) {
                Ok(doc) => match storage::write_export(&doc, &path) {
                    Ok(written) => {
                        println!("{} exported to {}", "ok:".green().bold(), written.display())
                    }
                    Err(e) => println!("{} {:#}", "error:".red().bold(), e),
                },
                Err(e) => reject(e),
            }
        }

        Action::Log => match export::encode(session).and_then(|doc| export::log_document(&doc)) {
            Ok(()) => debug!("export mirrored to log"),
            Err(e) => reject(e),
        },

        Action::Quit => return Flow::Quit,

        other => {
            if !screen.handle(other, session) {
                println!(
                    "{} not available on the {} screen -- use `replabel collect`",
                    "error:".red().bold(),
                    screen.name()
                );
            }
        }
    }

    Flow::Continue
}

fn edit_time(session: &mut Session, set: usize, rep: usize, field: RepField, time: String) {
    let (Some(s), Some(r)) = (position(set, "Set"), position(rep, "Rep")) else {
        return;
    };

    let hint = !is_timestamp(&time);
    if session.set_rep_field(s, r, field, time) {
        if hint {
            println!(
                "{} stored, but not in minute:second form (e.g. 1:05)",
                "warning:".yellow().bold()
            );
        }
    } else {
        println!("{} no rep {} in set {}", "error:".red().bold(), rep, set);
    }
}

/// Converts a 1-based position typed by the user.
pub fn position(value: usize, what: &str) -> Option<usize> {
    let idx = value.checked_sub(1);
    if idx.is_none() {
        println!("{} {} index must be ≥ 1", "error:".red().bold(), what);
    }
    idx
}

pub fn no_set(set: usize) {
    println!("{} no set at index {}", "error:".red().bold(), set);
}

fn reject(e: LabelError) {
    match e {
        LabelError::InvalidInterval => {
            println!("{} {}", "error:".red().bold(), e);
            println!("{}", "hint: run `check` to list the reps to fix".dimmed());
        }
        other => println!("{} {}", "error:".red().bold(), other),
    }
}
