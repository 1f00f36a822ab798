use std::collections::BTreeSet;

use crate::question::normalize::Question;

pub const PASS_THRESHOLD: u32 = 70;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Outcome {
    Correct,
    /// Some but not all required selections, no false positives.
    Partial,
    Incorrect,
    Unanswered,
}

#[derive(Clone, Copy, Debug)]
pub struct QuestionScore {
    pub points: usize,
    pub max_points: usize,
    pub outcome: Outcome,
}

#[derive(Clone, Debug)]
pub struct ScoreReport {
    pub total_points: usize,
    pub max_points: usize,
    pub percentage: u32,
    pub passed: bool,
    pub per_question: Vec<QuestionScore>,
    /// Answered questions that scored 0 points; this is the practice-retry
    /// working set. Skipped questions are a separate bucket, not "wrong".
    pub incorrect_indices: Vec<usize>,
    pub unanswered_indices: Vec<usize>,
}

impl ScoreReport {
    pub fn correct_count(&self) -> usize {
        self.per_question
            .iter()
            .filter(|s| matches!(s.outcome, Outcome::Correct))
            .count()
    }

    pub fn incorrect_count(&self) -> usize {
        self.incorrect_indices.len()
    }

    pub fn unanswered_count(&self) -> usize {
        self.unanswered_indices.len()
    }
}

/// Partial-credit scoring.
///
/// Single-choice questions are worth 1 point. Multiple-choice questions are
/// worth one point per required index, zeroed entirely by any false-positive
/// selection. Unanswered slots contribute 0 points and are excluded from
/// `incorrect_indices`.
pub fn score(quiz: &[Question], slots: &[BTreeSet<usize>]) -> ScoreReport {
    debug_assert_eq!(quiz.len(), slots.len());

    let mut total_points = 0;
    let mut max_points = 0;
    let mut per_question = Vec::with_capacity(quiz.len());
    let mut incorrect_indices = Vec::new();
    let mut unanswered_indices = Vec::new();

    for (index, (question, slot)) in quiz.iter().zip(slots).enumerate() {
        let question_max = if question.multiple { question.answer.len() } else { 1 };
        let (points, outcome) = score_question(question, slot);

        total_points += points;
        max_points += question_max;
        per_question.push(QuestionScore { points, max_points: question_max, outcome });

        match outcome {
            Outcome::Unanswered => unanswered_indices.push(index),
            Outcome::Incorrect => incorrect_indices.push(index),
            Outcome::Correct | Outcome::Partial => {}
        }
    }

    let percentage = if max_points == 0 {
        0
    } else {
        (100.0 * total_points as f64 / max_points as f64).round() as u32
    };

    ScoreReport {
        total_points,
        max_points,
        percentage,
        passed: percentage >= PASS_THRESHOLD,
        per_question,
        incorrect_indices,
        unanswered_indices,
    }
}

fn score_question(question: &Question, slot: &BTreeSet<usize>) -> (usize, Outcome) {
    if slot.is_empty() {
        return (0, Outcome::Unanswered);
    }

    if !question.multiple {
        let hit = slot.iter().next().is_some_and(|i| question.answer.contains(i));
        return if hit { (1, Outcome::Correct) } else { (0, Outcome::Incorrect) };
    }

    // Any false positive zeroes the question.
    if slot.iter().any(|i| !question.answer.contains(i)) {
        return (0, Outcome::Incorrect);
    }

    let hits = slot.intersection(&question.answer).count();
    let outcome = if hits == question.answer.len() {
        Outcome::Correct
    } else {
        Outcome::Partial
    };
    (hits, outcome)
}
