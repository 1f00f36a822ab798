use std::collections::BTreeSet;

use rand::Rng;
use rand::rngs::SmallRng;
use serde::{Deserialize, Serialize};

pub const DEFAULT_FOCUS: &str = "1.1";
pub const DEFAULT_CATEGORY: &str = "General";

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Difficulty {
    Easy,
    #[default]
    Medium,
    Hard,
}

impl Difficulty {
    /// Lenient parse for raw records; anything unrecognized falls back to
    /// the default rather than rejecting the whole question.
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "easy" => Some(Difficulty::Easy),
            "medium" => Some(Difficulty::Medium),
            "hard" => Some(Difficulty::Hard),
            _ => None,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Difficulty::Easy => "easy",
            Difficulty::Medium => "medium",
            Difficulty::Hard => "hard",
        }
    }
}

/// On-disk record shape. Field names match the bank files; older banks use
/// `text`/`explanation` instead of `q`/`explain`, and a bare integer `answer`
/// instead of an array.
#[derive(Clone, Debug, Default, Deserialize)]
pub struct RawQuestion {
    #[serde(default)]
    pub id: Option<String>,
    #[serde(default, alias = "text")]
    pub q: Option<String>,
    #[serde(default)]
    pub choices: Vec<String>,
    #[serde(default)]
    pub answer: Option<RawAnswer>,
    #[serde(default)]
    pub difficulty: Option<String>,
    #[serde(default)]
    pub focus: Option<String>,
    #[serde(default)]
    pub category: Option<String>,
    #[serde(default)]
    pub tags: Option<RawTags>,
    #[serde(default, alias = "explanation")]
    pub explain: Option<String>,
}

#[derive(Clone, Debug, Deserialize)]
#[serde(untagged)]
pub enum RawAnswer {
    One(i64),
    Many(Vec<i64>),
}

#[derive(Clone, Debug, Deserialize)]
#[serde(untagged)]
pub enum RawTags {
    One(String),
    Many(Vec<String>),
}

/// Canonical question shape. Immutable once normalized; every downstream
/// component (sampler, session, scorer, store) operates on this and only
/// this. `answer` always holds in-range choice indices, and a single answer
/// is a one-element set so scoring never branches on storage shape.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Question {
    pub id: String,
    #[serde(alias = "text")]
    pub q: String,
    pub choices: Vec<String>,
    pub answer: BTreeSet<usize>,
    pub multiple: bool,
    #[serde(default)]
    pub difficulty: Difficulty,
    pub focus: String,
    pub category: String,
    #[serde(default)]
    pub tags: BTreeSet<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub explain: Option<String>,
}

impl Question {
    /// A question can appear in a quiz only if there is something to choose
    /// between and at least one surviving correct index.
    pub fn is_answerable(&self) -> bool {
        self.choices.len() >= 2 && !self.answer.is_empty()
    }
}

/// Best-effort conversion of a raw record into the canonical shape.
///
/// Total: every input yields a `Question`. Missing fields get defaults,
/// scalar answers become one-element sets, and out-of-range answer indices
/// are dropped. Whether the result is usable is decided at ingestion via
/// [`Question::is_answerable`], never mid-session.
///
/// Id generation is the one non-idempotent step: a record without an id gets
/// a fresh `q`-prefixed random id on each call.
pub fn normalize(raw: RawQuestion, rng: &mut SmallRng) -> Question {
    let id = match raw.id {
        Some(id) if !id.trim().is_empty() => id,
        _ => generate_id(rng),
    };

    let choice_count = raw.choices.len();
    let answer: BTreeSet<usize> = match raw.answer {
        Some(RawAnswer::One(i)) => to_index(i, choice_count).into_iter().collect(),
        Some(RawAnswer::Many(indices)) => indices
            .into_iter()
            .filter_map(|i| to_index(i, choice_count))
            .collect(),
        None => BTreeSet::new(),
    };

    let difficulty = raw
        .difficulty
        .as_deref()
        .and_then(Difficulty::parse)
        .unwrap_or_default();

    let tags: BTreeSet<String> = match raw.tags {
        Some(RawTags::One(tag)) => BTreeSet::from([tag]),
        Some(RawTags::Many(tags)) => tags.into_iter().collect(),
        None => BTreeSet::new(),
    };

    let multiple = answer.len() > 1;

    Question {
        id,
        q: raw.q.unwrap_or_default(),
        choices: raw.choices,
        answer,
        multiple,
        difficulty,
        focus: non_empty_or(raw.focus, DEFAULT_FOCUS),
        category: non_empty_or(raw.category, DEFAULT_CATEGORY),
        tags,
        explain: raw.explain,
    }
}

fn non_empty_or(value: Option<String>, fallback: &str) -> String {
    match value {
        Some(v) if !v.trim().is_empty() => v,
        _ => fallback.to_string(),
    }
}

fn to_index(i: i64, choice_count: usize) -> Option<usize> {
    usize::try_from(i).ok().filter(|&i| i < choice_count)
}

fn generate_id(rng: &mut SmallRng) -> String {
    const ALPHABET: &[u8] = b"abcdefghijklmnopqrstuvwxyz0123456789";
    let suffix: String = (0..9)
        .map(|_| ALPHABET[rng.gen_range(0..ALPHABET.len())] as char)
        .collect();
    format!("q{suffix}")
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;

    fn rng() -> SmallRng {
        SmallRng::seed_from_u64(42)
    }

    fn raw(q: &str, choices: &[&str], answer: RawAnswer) -> RawQuestion {
        RawQuestion {
            q: Some(q.to_string()),
            choices: choices.iter().map(|c| c.to_string()).collect(),
            answer: Some(answer),
            ..RawQuestion::default()
        }
    }

    #[test]
    fn test_scalar_answer_becomes_one_element_set() {
        let question = normalize(raw("pick", &["a", "b", "c"], RawAnswer::One(2)), &mut rng());
        assert_eq!(question.answer, BTreeSet::from([2]));
        assert!(!question.multiple);
    }

    #[test]
    fn test_array_answer_kept_and_multiple_derived() {
        let question = normalize(
            raw("pick two", &["a", "b", "c"], RawAnswer::Many(vec![0, 2])),
            &mut rng(),
        );
        assert_eq!(question.answer, BTreeSet::from([0, 2]));
        assert!(question.multiple);
    }

    #[test]
    fn test_defaults_applied_for_missing_fields() {
        let question = normalize(raw("pick", &["a", "b"], RawAnswer::One(0)), &mut rng());
        assert_eq!(question.difficulty, Difficulty::Medium);
        assert_eq!(question.focus, DEFAULT_FOCUS);
        assert_eq!(question.category, DEFAULT_CATEGORY);
        assert!(question.tags.is_empty());
        assert!(question.explain.is_none());
    }

    #[test]
    fn test_missing_id_is_generated() {
        let question = normalize(raw("pick", &["a", "b"], RawAnswer::One(0)), &mut rng());
        assert!(question.id.starts_with('q'));
        assert_eq!(question.id.len(), 10);
    }

    #[test]
    fn test_existing_id_preserved() {
        let mut record = raw("pick", &["a", "b"], RawAnswer::One(0));
        record.id = Some("tf-042".to_string());
        let question = normalize(record, &mut rng());
        assert_eq!(question.id, "tf-042");
    }

    #[test]
    fn test_out_of_range_indices_dropped() {
        let question = normalize(
            raw("pick", &["a", "b", "c"], RawAnswer::Many(vec![1, 7, -2])),
            &mut rng(),
        );
        assert_eq!(question.answer, BTreeSet::from([1]));
        assert!(question.is_answerable());
    }

    #[test]
    fn test_all_indices_out_of_range_is_unanswerable() {
        let question = normalize(raw("pick", &["a", "b"], RawAnswer::Many(vec![5, 9])), &mut rng());
        assert!(question.answer.is_empty());
        assert!(!question.is_answerable());
    }

    #[test]
    fn test_too_few_choices_is_unanswerable() {
        let question = normalize(raw("pick", &["only"], RawAnswer::One(0)), &mut rng());
        assert!(!question.is_answerable());
    }

    #[test]
    fn test_malformed_difficulty_falls_back_to_medium() {
        let mut record = raw("pick", &["a", "b"], RawAnswer::One(1));
        record.difficulty = Some("brutal".to_string());
        let question = normalize(record, &mut rng());
        assert_eq!(question.difficulty, Difficulty::Medium);
    }

    #[test]
    fn test_scalar_tag_becomes_set() {
        let mut record = raw("pick", &["a", "b"], RawAnswer::One(1));
        record.tags = Some(RawTags::One("cli".to_string()));
        let question = normalize(record, &mut rng());
        assert_eq!(question.tags, BTreeSet::from(["cli".to_string()]));
    }

    #[test]
    fn test_normalize_is_stable_for_complete_records() {
        // Records carrying an id normalize identically under any rng.
        let full = || RawQuestion {
            id: Some("stable-1".to_string()),
            difficulty: Some("hard".to_string()),
            focus: Some("3.2".to_string()),
            category: Some("State".to_string()),
            tags: Some(RawTags::Many(vec!["a".to_string(), "b".to_string()])),
            explain: Some("because".to_string()),
            ..raw("pick", &["a", "b", "c"], RawAnswer::Many(vec![0, 1]))
        };
        let first = normalize(full(), &mut SmallRng::seed_from_u64(1));
        let second = normalize(full(), &mut SmallRng::seed_from_u64(999));
        assert_eq!(first, second);
    }

    #[test]
    fn test_raw_record_accepts_text_alias() {
        let json = r#"{"text": "aliased prompt", "choices": ["a", "b"], "answer": 0}"#;
        let record: RawQuestion = serde_json::from_str(json).unwrap();
        let question = normalize(record, &mut rng());
        assert_eq!(question.q, "aliased prompt");
    }

    #[test]
    fn test_raw_record_with_no_fields_still_normalizes() {
        let record: RawQuestion = serde_json::from_str("{}").unwrap();
        let question = normalize(record, &mut rng());
        assert!(question.q.is_empty());
        assert!(!question.is_answerable());
        assert_eq!(question.focus, DEFAULT_FOCUS);
    }
}
