use colored::Colorize;
use itertools::Itertools;
use replabel::{
    ExerciseType, PlaybackOutcome, PlaybackState, Session,
    playback::Cue,
    utils::format_seconds,
    validate::{RepIssue, is_timestamp},
};

pub fn session(session: &Session) {
    let video = match session.video_id() {
        Some(id) => format!("video {}", id).green(),
        None if session.youtube_url().is_empty() => "no url".dimmed(),
        None => "Invalid YouTube URL".red(),
    };

    println!(
        "{} {} — {} ({})",
        "Session:".cyan().bold(),
        session.exercise_type().label().bold(),
        session.youtube_url(),
        video
    );

    for (set_idx, set) in session.sets().iter().enumerate() {
        println!("{} {}", "Set".cyan(), format!("{}", set_idx + 1).yellow());
        if set.is_empty() {
            println!("    {}", "(no reps)".dimmed());
        }
        for (rep_idx, rep) in set.reps().iter().enumerate() {
            println!(
                "  {} • {} → {}",
                format!("{}", rep_idx + 1).yellow(),
                field(&rep.start),
                field(&rep.end)
            );
        }
    }
}

fn field(text: &str) -> String {
    if text.is_empty() {
        "__:__".dimmed().to_string()
    } else if is_timestamp(text) {
        text.to_string()
    } else {
        text.red().to_string()
    }
}

pub fn issues(issues: &[RepIssue]) {
    for issue in issues {
        println!("  {} {}", "•".red(), issue);
    }
}

pub fn exercise_choices() -> String {
    ExerciseType::ALL.iter().map(|ty| ty.slug()).join(", ")
}

pub fn playback_state(state: &PlaybackState) {
    if let PlaybackState::Playing(cue) = state {
        println!("{} {}", "▶".green(), cue_label(cue));
    }
}

pub fn playback_outcome(outcome: &PlaybackOutcome) {
    match outcome {
        PlaybackOutcome::Completed { reps: 0 } => {
            println!("{} nothing to play", "info:".blue().bold())
        }
        PlaybackOutcome::Completed { reps } => {
            println!("{} played {} rep(s)", "ok:".green().bold(), reps)
        }
        PlaybackOutcome::Cancelled => println!("{} playback stopped", "info:".blue().bold()),
        PlaybackOutcome::Failed(e) => println!("{} playback halted: {}", "error:".red().bold(), e),
    }
}

fn cue_label(cue: &Cue) -> String {
    format!(
        "set {} rep {} ({} → {})",
        cue.set + 1,
        cue.rep + 1,
        format_seconds(cue.start),
        format_seconds(cue.end)
    )
}
