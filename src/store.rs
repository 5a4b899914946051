//! Structural edits on a [`Session`].
//!
//! Every edit rebuilds only the branch it touches: the targeted set (and rep)
//! get fresh `Arc` nodes while every sibling keeps its old pointer. Positions
//! are 0-based; an out-of-range position leaves the session untouched and the
//! edit returns `false`.

use std::sync::Arc;

use tracing::debug;

use crate::{
    models::{Rep, RepField, Session, Set},
    types::ExerciseType,
};

impl Session {
    /// Stores the URL and returns the video id it yields, if any.
    pub fn set_url(&mut self, url: impl Into<String>) -> Option<String> {
        self.youtube_url = url.into();
        let id = self.video_id().map(str::to_string);
        debug!(url = %self.youtube_url, video_id = ?id, "url changed");
        id
    }

    pub fn set_exercise_type(&mut self, exercise_type: ExerciseType) {
        debug!(%exercise_type, "exercise type changed");
        self.exercise_type = exercise_type;
    }

    pub fn add_set(&mut self) {
        self.sets.push(Arc::new(Set::new()));
        debug!(sets = self.sets.len(), "set added");
    }

    pub fn delete_set(&mut self, set: usize) -> bool {
        if set >= self.sets.len() {
            return false;
        }
        self.sets.remove(set);
        debug!(set, sets = self.sets.len(), "set deleted");
        true
    }

    pub fn add_rep(&mut self, set: usize) -> bool {
        self.replace_set(set, |reps| reps.push(Arc::new(Rep::default())))
    }

    /// May leave the set without any rep.
    pub fn delete_rep(&mut self, set: usize, rep: usize) -> bool {
        let in_range = self.sets.get(set).is_some_and(|s| rep < s.reps.len());
        in_range
            && self.replace_set(set, |reps| {
                reps.remove(rep);
            })
    }

    pub fn set_rep_field(
        &mut self,
        set: usize,
        rep: usize,
        field: RepField,
        value: impl Into<String>,
    ) -> bool {
        let Some(old) = self.sets.get(set).and_then(|s| s.reps.get(rep)) else {
            return false;
        };

        let mut updated = Rep::clone(old);
        match field {
            RepField::Start => updated.start = value.into(),
            RepField::End => updated.end = value.into(),
        }

        self.replace_set(set, |reps| reps[rep] = Arc::new(updated))
    }

    fn replace_set(&mut self, set: usize, edit: impl FnOnce(&mut Vec<Arc<Rep>>)) -> bool {
        let Some(slot) = self.sets.get_mut(set) else {
            return false;
        };

        let mut reps = slot.reps.clone();
        edit(&mut reps);
        *slot = Arc::new(Set { reps });
        debug!(set, reps = slot.reps.len(), "set rebuilt");
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> Session {
        Session::from_sets(
            "https://www.youtube.com/watch?v=abc",
            ExerciseType::Deadlift,
            [
                Set::from_reps([Rep::new("0:01", "0:02"), Rep::new("0:03", "0:04")]),
                Set::from_reps([Rep::new("1:00", "1:10")]),
            ],
        )
    }

    #[test]
    fn add_set_appends_one_empty_rep() {
        let mut session = sample();
        session.add_set();
        assert_eq!(session.sets().len(), 3);
        assert_eq!(session.sets()[2].reps().len(), 1);
        assert_eq!(session.rep(2, 0), Some(&Rep::default()));
    }

    #[test]
    fn add_set_then_delete_last_restores_sets() {
        let mut session = sample();
        let before = session.clone();

        session.add_set();
        let last = session.sets().len() - 1;
        assert!(session.delete_set(last));

        assert_eq!(session, before);
        for (a, b) in session.sets().iter().zip(before.sets()) {
            assert!(Arc::ptr_eq(a, b));
        }
    }

    #[test]
    fn out_of_range_edits_are_no_ops() {
        let mut session = sample();
        let before = session.clone();

        assert!(!session.delete_set(5));
        assert!(!session.add_rep(2));
        assert!(!session.delete_rep(0, 2));
        assert!(!session.delete_rep(9, 0));
        assert!(!session.set_rep_field(1, 1, RepField::End, "9:99"));
        assert!(!session.set_rep_field(3, 0, RepField::Start, "0:00"));

        assert_eq!(session, before);
    }

    #[test]
    fn set_rep_field_keeps_other_field_and_siblings() {
        let mut session = sample();
        let before = session.clone();

        assert!(session.set_rep_field(0, 1, RepField::End, "0:09"));

        assert_eq!(session.rep(0, 1), Some(&Rep::new("0:03", "0:09")));
        assert!(!Arc::ptr_eq(&session.sets()[0], &before.sets()[0]));
        assert!(Arc::ptr_eq(&session.sets()[1], &before.sets()[1]));
        assert!(Arc::ptr_eq(&session.sets()[0].reps()[0], &before.sets()[0].reps()[0]));
        // the snapshot is untouched
        assert_eq!(before.rep(0, 1), Some(&Rep::new("0:03", "0:04")));
    }

    #[test]
    fn add_and_delete_rep() {
        let mut session = sample();
        assert!(session.add_rep(1));
        assert_eq!(session.sets()[1].reps().len(), 2);
        assert_eq!(session.rep(1, 1), Some(&Rep::default()));

        assert!(session.delete_rep(1, 0));
        assert!(session.delete_rep(1, 0));
        assert!(session.sets()[1].is_empty());
        assert_eq!(session.sets().len(), 2);
    }

    #[test]
    fn delete_set_keeps_order_of_the_rest() {
        let mut session = sample();
        session.add_set();
        assert!(session.delete_set(0));
        assert_eq!(session.rep(0, 0), Some(&Rep::new("1:00", "1:10")));
        assert_eq!(session.sets().len(), 2);
    }

    #[test]
    fn set_url_reports_video_id() {
        let mut session = Session::default();
        assert_eq!(
            session.set_url("https://www.youtube.com/watch?v=abc123XYZ_-"),
            Some("abc123XYZ_-".to_string())
        );
        assert_eq!(session.set_url("https://vimeo.com/12345"), None);
        assert_eq!(session.youtube_url(), "https://vimeo.com/12345");
    }
}
