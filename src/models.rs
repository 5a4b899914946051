use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::{
    types::ExerciseType,
    utils::{MinuteSecond, extract_video_id},
};

/// One labeled interval. Both fields stay free text until validation.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Rep {
    pub start: String,
    pub end: String,
}

impl Rep {
    pub fn new(start: impl Into<String>, end: impl Into<String>) -> Self {
        Self {
            start: start.into(),
            end: end.into(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RepField {
    Start,
    End,
}

/// Ordered group of reps. Reps are shared nodes so that an edit to one rep
/// leaves its siblings pointer-identical.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Set {
    pub(crate) reps: Vec<Arc<Rep>>,
}

impl Set {
    /// A fresh set always starts with one empty rep.
    pub fn new() -> Self {
        Self {
            reps: vec![Arc::new(Rep::default())],
        }
    }

    pub fn from_reps<I: IntoIterator<Item = Rep>>(reps: I) -> Self {
        Self {
            reps: reps.into_iter().map(Arc::new).collect(),
        }
    }

    pub fn reps(&self) -> &[Arc<Rep>] {
        &self.reps
    }

    pub fn len(&self) -> usize {
        self.reps.len()
    }

    pub fn is_empty(&self) -> bool {
        self.reps.is_empty()
    }
}

impl Default for Set {
    fn default() -> Self {
        Self::new()
    }
}

/// The whole editable document: URL, exercise type and every set.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Session {
    pub(crate) youtube_url: String,
    pub(crate) exercise_type: ExerciseType,
    pub(crate) sets: Vec<Arc<Set>>,
}

impl Session {
    pub fn new(exercise_type: ExerciseType) -> Self {
        Self {
            youtube_url: String::new(),
            exercise_type,
            sets: vec![Arc::new(Set::new())],
        }
    }

    pub fn from_sets<I: IntoIterator<Item = Set>>(
        youtube_url: impl Into<String>,
        exercise_type: ExerciseType,
        sets: I,
    ) -> Self {
        Self {
            youtube_url: youtube_url.into(),
            exercise_type,
            sets: sets.into_iter().map(Arc::new).collect(),
        }
    }

    pub fn youtube_url(&self) -> &str {
        &self.youtube_url
    }

    pub fn exercise_type(&self) -> ExerciseType {
        self.exercise_type
    }

    pub fn sets(&self) -> &[Arc<Set>] {
        &self.sets
    }

    pub fn rep(&self, set: usize, rep: usize) -> Option<&Rep> {
        self.sets.get(set)?.reps.get(rep).map(Arc::as_ref)
    }

    /// Derived from the URL on every call, never stored.
    pub fn video_id(&self) -> Option<&str> {
        extract_video_id(&self.youtube_url)
    }

    /// Every rep in set-then-rep order.
    pub fn flattened(&self) -> Vec<RepRef<'_>> {
        self.sets
            .iter()
            .enumerate()
            .flat_map(|(set, s)| {
                s.reps
                    .iter()
                    .enumerate()
                    .map(move |(rep, r)| RepRef { set, rep, data: r.as_ref() })
            })
            .collect()
    }

    pub fn rep_count(&self) -> usize {
        self.sets.iter().map(|s| s.len()).sum()
    }
}

impl Default for Session {
    fn default() -> Self {
        Self::new(ExerciseType::default())
    }
}

/// A rep together with its 0-based position.
#[derive(Debug, Clone, Copy)]
pub struct RepRef<'a> {
    pub set: usize,
    pub rep: usize,
    pub data: &'a Rep,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExportRep {
    pub start: MinuteSecond,
    pub end: MinuteSecond,
}

/// Canonical export form of a validated session.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExportDocument {
    pub youtube_url: String,
    pub exercise_type: ExerciseType,
    pub exercise_data: Vec<Vec<ExportRep>>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_session_has_one_set_with_one_empty_rep() {
        let session = Session::default();
        assert_eq!(session.sets().len(), 1);
        assert_eq!(session.sets()[0].reps().len(), 1);
        assert_eq!(session.rep(0, 0), Some(&Rep::default()));
        assert_eq!(session.exercise_type(), ExerciseType::BenchPress);
        assert_eq!(session.video_id(), None);
    }

    #[test]
    fn flattened_walks_sets_then_reps() {
        let session = Session::from_sets(
            "",
            ExerciseType::Squat,
            [
                Set::from_reps([Rep::new("0:01", "0:02")]),
                Set::from_reps([]),
                Set::from_reps([Rep::new("0:03", "0:04"), Rep::new("0:05", "0:06")]),
            ],
        );

        let order: Vec<(usize, usize, &str)> = session
            .flattened()
            .iter()
            .map(|r| (r.set, r.rep, r.data.start.as_str()))
            .collect();

        assert_eq!(order, vec![(0, 0, "0:01"), (2, 0, "0:03"), (2, 1, "0:05")]);
        assert_eq!(session.rep_count(), 3);
    }
}
