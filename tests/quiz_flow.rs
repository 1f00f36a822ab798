use std::collections::HashSet;
use std::fs;

use rand::SeedableRng;
use rand::rngs::SmallRng;
use tempfile::TempDir;

use quizdr::question::bank::QuestionBank;
use quizdr::quiz::sampler::{SampleMode, select_quiz};
use quizdr::quiz::scoring::{self, PASS_THRESHOLD};
use quizdr::quiz::session::QuizSession;
use quizdr::store::JsonStore;

fn write_single_choice_bank(dir: &TempDir, count: usize) {
    let questions: Vec<String> = (0..count)
        .map(|i| {
            format!(
                r#"{{"id": "q{i}", "q": "prompt {i}", "choices": ["right", "wrong a", "wrong b"], "answer": 0, "focus": "{}.1"}}"#,
                i % 5 + 1
            )
        })
        .collect();
    fs::write(
        dir.path().join("index.json"),
        r#"["questions.json"]"#,
    )
    .unwrap();
    fs::write(
        dir.path().join("questions.json"),
        format!("[{}]", questions.join(",")),
    )
    .unwrap();
}

#[test]
fn full_run_all_correct_scores_100_and_passes() {
    // Pool of 10 single-choice questions, target 5, plain mode, no shuffle:
    // the quiz is the first 5 pool questions in original order.
    let dir = TempDir::new().unwrap();
    write_single_choice_bank(&dir, 10);

    let mut rng = SmallRng::seed_from_u64(1);
    let bank = QuestionBank::load_dir(dir.path(), &mut rng).unwrap();
    assert_eq!(bank.questions.len(), 10);

    let quiz = select_quiz(&bank.questions, 5, SampleMode::Plain, false, &mut rng);
    let ids: Vec<&str> = quiz.iter().map(|q| q.id.as_str()).collect();
    assert_eq!(ids, vec!["q0", "q1", "q2", "q3", "q4"]);

    let mut session = QuizSession::start(quiz, false);
    for i in 0..session.len() {
        session.go_to(i).unwrap();
        session.record_answer(i, 0, true).unwrap();
    }
    assert_eq!(session.answered_count(), 5);
    session.finish();

    let report = scoring::score(session.quiz(), session.slots());
    assert_eq!(report.percentage, 100);
    assert!(report.passed);
    assert!(PASS_THRESHOLD <= report.percentage);
    assert!(report.incorrect_indices.is_empty());
}

#[test]
fn wrong_answers_flow_into_store_and_back_out_for_practice() {
    let dir = TempDir::new().unwrap();
    write_single_choice_bank(&dir, 10);
    let store_dir = TempDir::new().unwrap();
    let store = JsonStore::with_base_dir(store_dir.path().to_path_buf()).unwrap();

    let mut rng = SmallRng::seed_from_u64(2);
    let bank = QuestionBank::load_dir(dir.path(), &mut rng).unwrap();
    let quiz = select_quiz(&bank.questions, 6, SampleMode::Plain, false, &mut rng);

    // Miss questions 1 and 3, skip question 5, answer the rest correctly.
    let mut session = QuizSession::start(quiz, false);
    for i in 0..session.len() {
        if i == 5 {
            continue;
        }
        let choice = if i == 1 || i == 3 { 2 } else { 0 };
        session.record_answer(i, choice, true).unwrap();
    }
    session.finish();

    let report = scoring::score(session.quiz(), session.slots());
    assert_eq!(report.incorrect_indices, vec![1, 3]);
    // The skipped question is its own bucket, not a wrong answer.
    assert_eq!(report.unanswered_indices, vec![5]);

    let wrong: Vec<_> = report
        .incorrect_indices
        .iter()
        .map(|&i| session.quiz()[i].clone())
        .collect();
    store.save_wrong_answers(&wrong).unwrap();

    // Practice mode: the stored set verbatim, full questions intact.
    let practice_set = store.load_wrong_answers();
    assert_eq!(practice_set.len(), 2);
    assert_eq!(practice_set[0].id, "q1");
    assert_eq!(practice_set[1].id, "q3");
    assert_eq!(practice_set[0].choices.len(), 3);

    let mut practice = QuizSession::start(practice_set, true);
    for i in 0..practice.len() {
        practice.record_answer(i, 0, true).unwrap();
    }
    let practice_report = scoring::score(practice.quiz(), practice.slots());
    assert_eq!(practice_report.percentage, 100);

    store.clear_wrong_answers().unwrap();
    assert!(store.load_wrong_answers().is_empty());
}

#[test]
fn balanced_sampling_covers_focus_areas_from_disk_bank() {
    // 5 focus areas x 10 questions each; a 20-question balanced quiz must
    // represent every area at least twice.
    let dir = TempDir::new().unwrap();
    write_single_choice_bank(&dir, 50);

    let mut rng = SmallRng::seed_from_u64(3);
    let bank = QuestionBank::load_dir(dir.path(), &mut rng).unwrap();
    assert_eq!(bank.focus_areas.len(), 5);

    let quiz = select_quiz(&bank.questions, 20, SampleMode::Balanced, false, &mut rng);
    assert_eq!(quiz.len(), 20);

    let mut per_area: Vec<usize> = vec![0; 5];
    for question in &quiz {
        let area: usize = question.focus.split('.').next().unwrap().parse().unwrap();
        per_area[area - 1] += 1;
    }
    assert!(per_area.iter().all(|&count| count >= 2), "{per_area:?}");

    let ids: HashSet<&str> = quiz.iter().map(|q| q.id.as_str()).collect();
    assert_eq!(ids.len(), 20, "no duplicate questions");
}

#[test]
fn mixed_answer_shapes_normalize_through_the_full_pipeline() {
    let dir = TempDir::new().unwrap();
    fs::write(dir.path().join("index.json"), r#"["mixed.json"]"#).unwrap();
    fs::write(
        dir.path().join("mixed.json"),
        r#"[
            {"q": "scalar answer", "choices": ["a", "b"], "answer": 1},
            {"text": "aliased prompt", "choices": ["a", "b", "c"], "answer": [0, 2]},
            {"q": "dropped", "choices": ["a", "b"], "answer": [7]}
        ]"#,
    )
    .unwrap();

    let mut rng = SmallRng::seed_from_u64(4);
    let bank = QuestionBank::load_dir(dir.path(), &mut rng).unwrap();
    // The record with only out-of-range indices is excluded at ingestion.
    assert_eq!(bank.questions.len(), 2);
    assert!(!bank.questions[0].multiple);
    assert!(bank.questions[1].multiple);
    assert_eq!(bank.questions[1].q, "aliased prompt");

    // Generated ids are unique across the loaded pool.
    let ids: HashSet<&str> = bank.questions.iter().map(|q| q.id.as_str()).collect();
    assert_eq!(ids.len(), bank.questions.len());

    // Partial credit through the pipeline: one of two required selections.
    let quiz = vec![bank.questions[1].clone()];
    let mut session = QuizSession::start(quiz, false);
    let first_correct = *session.quiz()[0].answer.iter().next().unwrap();
    session.record_answer(0, first_correct, true).unwrap();
    let report = scoring::score(session.quiz(), session.slots());
    assert_eq!(report.total_points, 1);
    assert_eq!(report.max_points, 2);
    assert!(report.incorrect_indices.is_empty());
}
