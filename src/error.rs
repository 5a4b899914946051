use std::path::PathBuf;

use thiserror::Error;

/// Message shown whenever a session fails the export gate.
pub const INVALID_INTERVAL_MESSAGE: &str = "Please ensure all timestamps are in the format minute:second (e.g., 1:05, 5:40) and that end times are after start times.";

#[derive(Debug, Error)]
pub enum LabelError {
    #[error("Invalid YouTube URL: `{0}`")]
    InvalidVideoUrl(String),

    #[error("{}", INVALID_INTERVAL_MESSAGE)]
    InvalidInterval,

    #[error(transparent)]
    Timestamp(#[from] TimestampError),

    #[error("failed to encode export document: {0}")]
    Json(#[from] serde_json::Error),

    #[error("failed to read {}: {source}", .path.display())]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("failed to write {}: {source}", .path.display())]
    Write {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("invalid config file {}: {source}", .path.display())]
    ConfigParse {
        path: PathBuf,
        source: toml::de::Error,
    },

    #[error("failed to encode config: {0}")]
    ConfigEncode(#[from] toml::ser::Error),

    #[error("could not determine config directory")]
    NoConfigDir,
}

/// Raised by the codec when a `minute:second` text cannot be split or converted.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TimestampError {
    #[error("timestamp `{0}` has no `:` separator")]
    MissingSeparator(String),

    #[error("invalid {field} value `{value}`")]
    NotANumber { field: &'static str, value: String },

    #[error("timestamp `{0}` is too large")]
    OutOfRange(String),
}

/// Failure reported by a video player command.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("player `{command}` failed: {reason}")]
pub struct PlayerError {
    pub command: &'static str,
    pub reason: String,
}

impl PlayerError {
    pub fn new(command: &'static str, reason: impl Into<String>) -> Self {
        Self {
            command,
            reason: reason.into(),
        }
    }
}
