use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::error::TimestampError;

static VIDEO_ID: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?:https?://)?(?:www\.)?youtube\.com/watch\?v=([a-zA-Z0-9_-]+)")
        .expect("video id pattern is valid")
});

/// A parsed `minute:second` pair as it appears in the export document.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct MinuteSecond {
    pub minute: u32,
    pub second: u32,
}

impl MinuteSecond {
    /// `None` when the value does not fit in a `u32`.
    pub fn total_seconds(&self) -> Option<u32> {
        self.minute.checked_mul(60)?.checked_add(self.second)
    }
}

/// Splits `text` on `:` and converts both halves. Ranges are not checked here,
/// callers validate first.
pub fn parse_timestamp(text: &str) -> Result<MinuteSecond, TimestampError> {
    let (minute, second) = text
        .split_once(':')
        .ok_or_else(|| TimestampError::MissingSeparator(text.to_string()))?;

    Ok(MinuteSecond {
        minute: parse_field("minute", minute)?,
        second: parse_field("second", second)?,
    })
}

pub fn to_seconds(text: &str) -> Result<u32, TimestampError> {
    parse_timestamp(text)?
        .total_seconds()
        .ok_or_else(|| TimestampError::OutOfRange(text.to_string()))
}

fn parse_field(field: &'static str, value: &str) -> Result<u32, TimestampError> {
    value.parse().map_err(|_| TimestampError::NotANumber {
        field,
        value: value.to_string(),
    })
}

/// Formats elapsed seconds as `m:ss`.
pub fn format_seconds(total: u32) -> String {
    format!("{}:{:02}", total / 60, total % 60)
}

/// Returns the `v` parameter of a YouTube watch URL, if there is one.
pub fn extract_video_id(url: &str) -> Option<&str> {
    VIDEO_ID
        .captures(url)
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str())
}
