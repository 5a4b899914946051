use std::path::Path;

use anyhow::Result;
use colored::Colorize;
use replabel::{
    ExerciseType,
    types::{Config, KEY_EXERCISE, KEY_POLL_INTERVAL, KNOWN_KEYS, best_exercise_suggestion},
};

use crate::cli::ConfigCmd;

pub async fn handle(cmd: ConfigCmd, config_path: &Path) -> Result<()> {
    let mut cfg = Config::load(config_path)?;

    match cmd {
        ConfigCmd::List => {
            if cfg.map.is_empty() {
                println!("{}", "(no config set)".dimmed());
            } else {
                println!("{}", "Config:".cyan().bold());
                for (k, v) in &cfg.map {
                    println!("  {} = {}", k.green(), v);
                }
            }
        }

        ConfigCmd::Get { key } => match cfg.map.get(&key) {
            Some(val) => println!("{}", val),
            None => println!("{} key `{}` not found", "warning:".yellow().bold(), key),
        },

        ConfigCmd::Set { key, val } => {
            if let Err(msg) = check(&key, &val) {
                println!("{} {}", "error:".red().bold(), msg);
                return Ok(());
            }
            cfg.map.insert(key.clone(), val.clone());
            cfg.save(config_path)?;
            println!("{} set `{}` = `{}`", "info:".blue().bold(), key.green(), val);
        }

        ConfigCmd::Unset { key } => {
            if cfg.map.remove(&key).is_some() {
                cfg.save(config_path)?;
                println!("{} removed `{}`", "info:".blue().bold(), key.green());
            } else {
                println!("{} key `{}` not found", "warning:".yellow().bold(), key);
            }
        }
    }

    Ok(())
}

/// Rejects unknown keys and values the screens could not use.
fn check(key: &str, val: &str) -> Result<(), String> {
    match key {
        KEY_POLL_INTERVAL => match val.parse::<u64>() {
            Ok(ms) if ms > 0 => Ok(()),
            _ => Err(format!("`{}` must be a positive number of milliseconds", key)),
        },
        KEY_EXERCISE => match ExerciseType::from_name(val) {
            Some(_) => Ok(()),
            None => Err(match best_exercise_suggestion(val) {
                Some(sug) => format!("unknown exercise `{}` -- did you mean: `{}`?", val, sug),
                None => format!("unknown exercise `{}`", val),
            }),
        },
        k if KNOWN_KEYS.contains(&k) => Ok(()),
        _ => Err(format!(
            "unknown key `{}` (known keys: {})",
            key,
            KNOWN_KEYS.join(", ")
        )),
    }
}
