use std::fmt::Display;

use once_cell::sync::Lazy;
use regex::Regex;

use crate::{
    models::{Rep, Session},
    utils::to_seconds,
};

pub const TIMESTAMP_PATTERN: &str = r"^([0-5]?[0-9]):([0-5][0-9])$";

static TIMESTAMP: Lazy<Regex> =
    Lazy::new(|| Regex::new(TIMESTAMP_PATTERN).expect("timestamp pattern is valid"));

/// Full-string match against `minute:second`.
pub fn is_timestamp(text: &str) -> bool {
    TIMESTAMP.is_match(text)
}

pub fn is_valid_rep(rep: &Rep) -> bool {
    check_rep(rep).is_none()
}

/// All-or-nothing gate used before export. Empty sets pass.
pub fn is_valid_session(session: &Session) -> bool {
    session
        .sets()
        .iter()
        .all(|set| set.reps().iter().all(|rep| is_valid_rep(rep)))
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IssueKind {
    BadStart,
    BadEnd,
    NotAfterStart,
}

/// A failing rep, positioned 1-based for display.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RepIssue {
    pub set: usize,
    pub rep: usize,
    pub kind: IssueKind,
}

impl Display for RepIssue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let what = match self.kind {
            IssueKind::BadStart => "start is not minute:second",
            IssueKind::BadEnd => "end is not minute:second",
            IssueKind::NotAfterStart => "end is not after start",
        };
        write!(f, "set {} rep {}: {}", self.set, self.rep, what)
    }
}

/// Every failing rep, in set-then-rep order. Only the first problem of each
/// rep is reported.
pub fn rep_issues(session: &Session) -> Vec<RepIssue> {
    session
        .flattened()
        .into_iter()
        .filter_map(|r| {
            check_rep(r.data).map(|kind| RepIssue {
                set: r.set + 1,
                rep: r.rep + 1,
                kind,
            })
        })
        .collect()
}

fn check_rep(rep: &Rep) -> Option<IssueKind> {
    if !is_timestamp(&rep.start) {
        return Some(IssueKind::BadStart);
    }
    if !is_timestamp(&rep.end) {
        return Some(IssueKind::BadEnd);
    }

    match (to_seconds(&rep.start), to_seconds(&rep.end)) {
        (Ok(start), Ok(end)) if end > start => None,
        _ => Some(IssueKind::NotAfterStart),
    }
}
