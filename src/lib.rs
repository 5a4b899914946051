//! Label exercise sets and reps on a YouTube video, export them as JSON and
//! play them back in sequence.

pub mod error;
pub mod export;
pub mod models;
pub mod playback;
pub mod player;
pub mod storage;
pub mod store;
pub mod types;
pub mod utils;
pub mod validate;

pub use error::{LabelError, PlayerError, TimestampError};
pub use models::{ExportDocument, Rep, RepField, Session, Set};
pub use playback::{PlaybackHandle, PlaybackOutcome, PlaybackScheduler, PlaybackState};
pub use player::{PlayerCommand, SimulatedPlayer, VideoPlayer};
pub use types::{Config, ExerciseType};
