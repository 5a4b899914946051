use std::path::PathBuf;

use clap::{ArgAction, Args, Parser, Subcommand};
use replabel::ExerciseType;

#[derive(Parser)]
#[command(name = "replabel", version, about = "Label exercise reps on a YouTube video")]
#[command(arg_required_else_help = true)]
pub struct Cli {
    /// Increase log verbosity (-v debug, -vv trace)
    #[arg(global = true, short, long, action = ArgAction::Count)]
    pub verbose: u8,

    #[command(subcommand)]
    pub cmd: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Labeling screen: edit sets and reps, export JSON
    #[command(visible_alias = "l")]
    Label(ScreenArgs),

    /// Collection screen: labeling plus rep deletion and playback
    #[command(visible_alias = "c")]
    Collect(ScreenArgs),

    /// View or edit replabel config
    #[command(subcommand)]
    Config(ConfigCmd),
}

#[derive(Args)]
pub struct ScreenArgs {
    /// YouTube watch URL to start with
    #[arg(short, long)]
    pub url: Option<String>,

    /// Exercise type (defaults to the `exercise` config key)
    #[arg(short, long, value_enum)]
    pub exercise: Option<ExerciseType>,

    /// Export file (defaults to the `export_file` config key)
    #[arg(short, long)]
    pub out: Option<PathBuf>,
}

#[derive(Subcommand)]
pub enum ConfigCmd {
    /// Show all config keys
    List,

    /// Get the value of a key
    Get { key: String },

    /// Set or override a key
    Set { key: String, val: String },

    /// Remove a key
    Unset { key: String },
}

//
// Screen input
//

/// One line typed inside a screen.
#[derive(Parser)]
#[command(name = "replabel", no_binary_name = true, disable_version_flag = true)]
pub struct ShellLine {
    #[command(subcommand)]
    pub action: Action,
}

#[derive(Subcommand)]
pub enum Action {
    /// Set the YouTube URL
    #[command(visible_alias = "u")]
    Url { url: String },

    /// Set the exercise type
    #[command(visible_alias = "ex", trailing_var_arg = true)]
    Exercise {
        #[arg(required = true)]
        name: Vec<String>,
    },

    /// Append a set holding one empty rep
    #[command(visible_alias = "as")]
    AddSet,

    /// Append an empty rep to a set - Usage: add-rep SET
    #[command(visible_alias = "ar")]
    AddRep { set: usize },

    /// Set a rep's start time - Usage: start SET REP MINUTE:SECOND
    #[command(visible_alias = "s")]
    Start { set: usize, rep: usize, time: String },

    /// Set a rep's end time - Usage: end SET REP MINUTE:SECOND
    #[command(visible_alias = "e")]
    End { set: usize, rep: usize, time: String },

    /// Delete a set (collect screen)
    #[command(visible_alias = "ds")]
    DeleteSet { set: usize },

    /// Delete a rep (collect screen)
    #[command(visible_alias = "dr")]
    DeleteRep { set: usize, rep: usize },

    /// Show the current session
    #[command(visible_alias = "ls")]
    Show,

    /// List every rep that would block the export
    Check,

    /// Validate and write the JSON export
    #[command(visible_alias = "x")]
    Export { path: Option<PathBuf> },

    /// Validate and write the JSON export to the log
    Log,

    /// Play every rep in order (collect screen)
    #[command(visible_alias = "p")]
    Play,

    /// Stop playback (collect screen)
    Stop,

    /// Leave the screen
    #[command(visible_alias = "q", alias = "exit")]
    Quit,
}
