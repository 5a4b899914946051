use std::{
    collections::BTreeMap,
    fmt::Display,
    fs,
    path::{Path, PathBuf},
    time::Duration,
};

use clap::ValueEnum;
use serde::{Deserialize, Serialize};
use strsim::jaro_winkler;
use tracing::warn;

use crate::error::LabelError;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, ValueEnum, Serialize, Deserialize)]
pub enum ExerciseType {
    #[default]
    #[serde(rename = "Bench Press")]
    BenchPress,
    Squat,
    Deadlift,
}

impl ExerciseType {
    pub const ALL: [ExerciseType; 3] = [Self::BenchPress, Self::Squat, Self::Deadlift];

    /// Label used in the export document and on screen.
    pub fn label(&self) -> &'static str {
        match self {
            Self::BenchPress => "Bench Press",
            Self::Squat => "Squat",
            Self::Deadlift => "Deadlift",
        }
    }

    /// Name accepted on the command line.
    pub fn slug(&self) -> &'static str {
        match self {
            Self::BenchPress => "bench-press",
            Self::Squat => "squat",
            Self::Deadlift => "deadlift",
        }
    }

    /// Accepts the slug or the label, case-insensitively.
    pub fn from_name<S: AsRef<str>>(name: S) -> Option<Self> {
        let raw = name.as_ref().trim();
        Self::ALL
            .into_iter()
            .find(|ty| ty.slug().eq_ignore_ascii_case(raw) || ty.label().eq_ignore_ascii_case(raw))
    }
}

impl Display for ExerciseType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.label())
    }
}

/// Return the closest exercise slug for `input`
/// if similarity ≥ 0.80 *and* clearly better than the runner-up.
pub fn best_exercise_suggestion(input: &str) -> Option<&'static str> {
    let inp = input.trim().to_ascii_lowercase();
    if inp.is_empty() {
        return None;
    }

    let mut scores: Vec<(&'static str, f64)> = ExerciseType::ALL
        .iter()
        .map(|ty| (ty.slug(), jaro_winkler(&inp, ty.slug())))
        .collect();

    scores.sort_by(|a, b| b.1.total_cmp(&a.1));

    let (best, best_score) = scores[0];
    let second_score = scores.get(1).map(|(_, s)| *s).unwrap_or(0.0);

    const MIN_SCORE: f64 = 0.80;
    const GAP: f64 = 0.02;

    if best_score >= MIN_SCORE && best_score - second_score >= GAP {
        Some(best)
    } else {
        None
    }
}

pub const DEFAULT_POLL_INTERVAL_MS: u64 = 100;
pub const DEFAULT_EXPORT_FILE: &str = "exercise_data.json";

pub const KEY_POLL_INTERVAL: &str = "poll_interval_ms";
pub const KEY_EXPORT_FILE: &str = "export_file";
pub const KEY_EXERCISE: &str = "exercise";

pub const KNOWN_KEYS: [&str; 3] = [KEY_POLL_INTERVAL, KEY_EXPORT_FILE, KEY_EXERCISE];

/// Flat key/value settings stored as TOML.
#[derive(Debug, Default, Clone, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Config {
    pub map: BTreeMap<String, String>,
}

impl Config {
    /// `$XDG_CONFIG_HOME/replabel/config.toml` or the platform equivalent.
    pub fn default_path() -> Result<PathBuf, LabelError> {
        dirs::config_dir()
            .map(|d| d.join("replabel").join("config.toml"))
            .ok_or(LabelError::NoConfigDir)
    }

    /// Missing files load as an empty config.
    pub fn load(path: &Path) -> Result<Self, LabelError> {
        if !path.exists() {
            return Ok(Self::default());
        }

        let content = fs::read_to_string(path).map_err(|source| LabelError::Read {
            path: path.to_path_buf(),
            source,
        })?;

        toml::from_str(&content).map_err(|source| LabelError::ConfigParse {
            path: path.to_path_buf(),
            source,
        })
    }

    pub fn save(&self, path: &Path) -> Result<(), LabelError> {
        if let Some(dir) = path.parent() {
            fs::create_dir_all(dir).map_err(|source| LabelError::Write {
                path: dir.to_path_buf(),
                source,
            })?;
        }

        let content = toml::to_string(self)?;
        fs::write(path, content).map_err(|source| LabelError::Write {
            path: path.to_path_buf(),
            source,
        })
    }

    pub fn poll_interval(&self) -> Duration {
        let ms = match self.map.get(KEY_POLL_INTERVAL) {
            None => DEFAULT_POLL_INTERVAL_MS,
            Some(raw) => match raw.parse::<u64>() {
                Ok(ms) if ms > 0 => ms,
                _ => {
                    warn!(value = %raw, "ignoring invalid {KEY_POLL_INTERVAL}");
                    DEFAULT_POLL_INTERVAL_MS
                }
            },
        };
        Duration::from_millis(ms)
    }

    pub fn export_file(&self) -> PathBuf {
        self.map
            .get(KEY_EXPORT_FILE)
            .filter(|v| !v.trim().is_empty())
            .map(PathBuf::from)
            .unwrap_or_else(|| PathBuf::from(DEFAULT_EXPORT_FILE))
    }

    pub fn exercise(&self) -> ExerciseType {
        match self.map.get(KEY_EXERCISE) {
            None => ExerciseType::default(),
            Some(raw) => ExerciseType::from_name(raw).unwrap_or_else(|| {
                warn!(value = %raw, "ignoring unknown {KEY_EXERCISE}");
                ExerciseType::default()
            }),
        }
    }
}
