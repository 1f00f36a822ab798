use std::collections::BTreeSet;
use std::time::{Duration, Instant};

use crate::error::QuizError;
use crate::question::normalize::Question;

/// Mutable state of one quiz run.
///
/// The session exclusively owns its quiz and answer slots. Every slot is a
/// set of chosen indices, a singleton for single-choice questions, so the
/// scorer never branches on storage shape. All mutation happens inside
/// discrete key handlers on one thread; the tick loop only reads.
pub struct QuizSession {
    quiz: Vec<Question>,
    pub current: usize,
    slots: Vec<BTreeSet<usize>>,
    started_at: Instant,
    finished_at: Option<Instant>,
    pub practice: bool,
}

impl QuizSession {
    pub fn start(quiz: Vec<Question>, practice: bool) -> Self {
        let slots = vec![BTreeSet::new(); quiz.len()];
        Self {
            quiz,
            current: 0,
            slots,
            started_at: Instant::now(),
            finished_at: None,
            practice,
        }
    }

    pub fn quiz(&self) -> &[Question] {
        &self.quiz
    }

    pub fn len(&self) -> usize {
        self.quiz.len()
    }

    pub fn is_empty(&self) -> bool {
        self.quiz.is_empty()
    }

    pub fn current_question(&self) -> Option<&Question> {
        self.quiz.get(self.current)
    }

    pub fn go_to(&mut self, index: usize) -> Result<(), QuizError> {
        if index >= self.quiz.len() {
            return Err(QuizError::OutOfRange { index, len: self.quiz.len() });
        }
        self.current = index;
        Ok(())
    }

    pub fn next(&mut self) {
        if self.current + 1 < self.quiz.len() {
            self.current += 1;
        }
    }

    pub fn prev(&mut self) {
        self.current = self.current.saturating_sub(1);
    }

    /// Record one choice interaction on a question.
    ///
    /// Single-choice: any registered choice becomes the sole answer, the
    /// `selected` flag is ignored. Multiple-choice: `selected` adds or
    /// removes the choice from the slot's set.
    pub fn record_answer(
        &mut self,
        question_index: usize,
        choice_index: usize,
        selected: bool,
    ) -> Result<(), QuizError> {
        let question = self
            .quiz
            .get(question_index)
            .ok_or(QuizError::OutOfRange { index: question_index, len: self.quiz.len() })?;
        if choice_index >= question.choices.len() {
            return Err(QuizError::OutOfRange {
                index: choice_index,
                len: question.choices.len(),
            });
        }

        let slot = &mut self.slots[question_index];
        if question.multiple {
            if selected {
                slot.insert(choice_index);
            } else {
                slot.remove(&choice_index);
            }
        } else {
            slot.clear();
            slot.insert(choice_index);
        }
        Ok(())
    }

    pub fn slot(&self, index: usize) -> Option<&BTreeSet<usize>> {
        self.slots.get(index)
    }

    pub fn slots(&self) -> &[BTreeSet<usize>] {
        &self.slots
    }

    pub fn answered_count(&self) -> usize {
        self.slots.iter().filter(|slot| !slot.is_empty()).count()
    }

    /// Freeze the clock. Idempotent; the elapsed display stops advancing the
    /// moment the session is submitted.
    pub fn finish(&mut self) {
        if self.finished_at.is_none() {
            self.finished_at = Some(Instant::now());
        }
    }

    pub fn is_finished(&self) -> bool {
        self.finished_at.is_some()
    }

    pub fn elapsed(&self) -> Duration {
        match self.finished_at {
            Some(end) => end.duration_since(self.started_at),
            None => self.started_at.elapsed(),
        }
    }
}

#[cfg(test)]
mod tests {
    use std::collections::BTreeSet;

    use super::*;

    fn single(id: &str) -> Question {
        Question {
            id: id.to_string(),
            q: format!("prompt {id}"),
            choices: vec!["a".to_string(), "b".to_string(), "c".to_string()],
            answer: BTreeSet::from([1]),
            multiple: false,
            difficulty: Default::default(),
            focus: "1.1".to_string(),
            category: "General".to_string(),
            tags: BTreeSet::new(),
            explain: None,
        }
    }

    fn multi(id: &str) -> Question {
        Question {
            answer: BTreeSet::from([0, 2]),
            multiple: true,
            ..single(id)
        }
    }

    #[test]
    fn test_start_allocates_empty_slots() {
        let session = QuizSession::start(vec![single("a"), single("b")], false);
        assert_eq!(session.len(), 2);
        assert_eq!(session.current, 0);
        assert_eq!(session.answered_count(), 0);
        assert!(!session.is_finished());
    }

    #[test]
    fn test_go_to_rejects_out_of_range() {
        let mut session = QuizSession::start(vec![single("a"), single("b")], false);
        assert!(session.go_to(1).is_ok());
        assert_eq!(session.current, 1);
        let err = session.go_to(2).unwrap_err();
        assert!(matches!(err, QuizError::OutOfRange { index: 2, len: 2 }));
        // Failed navigation leaves position unchanged.
        assert_eq!(session.current, 1);
    }

    #[test]
    fn test_next_and_prev_are_clamped() {
        let mut session = QuizSession::start(vec![single("a"), single("b")], false);
        session.prev();
        assert_eq!(session.current, 0);
        session.next();
        session.next();
        assert_eq!(session.current, 1);
    }

    #[test]
    fn test_single_choice_replaces_slot() {
        let mut session = QuizSession::start(vec![single("a")], false);
        session.record_answer(0, 0, true).unwrap();
        session.record_answer(0, 2, true).unwrap();
        assert_eq!(session.slot(0), Some(&BTreeSet::from([2])));
        assert_eq!(session.answered_count(), 1);
    }

    #[test]
    fn test_single_choice_ignores_selected_flag() {
        let mut session = QuizSession::start(vec![single("a")], false);
        session.record_answer(0, 1, false).unwrap();
        assert_eq!(session.slot(0), Some(&BTreeSet::from([1])));
    }

    #[test]
    fn test_multi_choice_toggles_membership() {
        let mut session = QuizSession::start(vec![multi("m")], false);
        session.record_answer(0, 0, true).unwrap();
        session.record_answer(0, 2, true).unwrap();
        assert_eq!(session.slot(0), Some(&BTreeSet::from([0, 2])));
        session.record_answer(0, 0, false).unwrap();
        assert_eq!(session.slot(0), Some(&BTreeSet::from([2])));
    }

    #[test]
    fn test_record_answer_rejects_bad_choice_index() {
        let mut session = QuizSession::start(vec![single("a")], false);
        let err = session.record_answer(0, 5, true).unwrap_err();
        assert!(matches!(err, QuizError::OutOfRange { index: 5, len: 3 }));
        assert_eq!(session.answered_count(), 0);
    }

    #[test]
    fn test_finish_freezes_elapsed() {
        let mut session = QuizSession::start(vec![single("a")], false);
        session.finish();
        let frozen = session.elapsed();
        std::thread::sleep(std::time::Duration::from_millis(10));
        assert_eq!(session.elapsed(), frozen);
    }
}
