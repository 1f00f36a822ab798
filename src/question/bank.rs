use std::fs;
use std::path::Path;

use rand::rngs::SmallRng;
use rust_embed::Embed;
use tracing::{info, warn};

use crate::error::QuizError;
use crate::question::normalize::{self, Question, RawQuestion};

pub const INDEX_FILE: &str = "index.json";
pub const FOCUS_AREAS_FILE: &str = "focus-areas.json";
pub const MAX_IMPORT_BYTES: u64 = 5 * 1024 * 1024;

#[derive(Embed)]
#[folder = "assets/questions/"]
struct BundledBank;

/// The loaded question pool plus the focus-area tag list used for balanced
/// sampling display. Focus areas come from the optional metadata file when
/// present, otherwise from the distinct tags seen in the pool.
#[derive(Debug)]
pub struct QuestionBank {
    pub questions: Vec<Question>,
    pub focus_areas: Vec<String>,
}

impl QuestionBank {
    /// Load a bank directory: `index.json` names one or more JSON array
    /// files, which are fetched, concatenated, and normalized. Any failed
    /// step is fatal to initialization.
    pub fn load_dir(dir: &Path, rng: &mut SmallRng) -> Result<Self, QuizError> {
        let index_path = dir.join(INDEX_FILE);
        let index = fs::read_to_string(&index_path)
            .map_err(|e| QuizError::Load(format!("cannot read {}: {e}", index_path.display())))?;
        let files: Vec<String> = serde_json::from_str(&index)
            .map_err(|e| QuizError::Load(format!("{INDEX_FILE} is not a file list: {e}")))?;
        if files.is_empty() {
            return Err(QuizError::Load(format!("{INDEX_FILE} is empty")));
        }

        let mut raw: Vec<RawQuestion> = Vec::new();
        for name in &files {
            let path = dir.join(name);
            let content = fs::read_to_string(&path)
                .map_err(|e| QuizError::Load(format!("cannot read {}: {e}", path.display())))?;
            let mut records: Vec<RawQuestion> = serde_json::from_str(&content)
                .map_err(|e| QuizError::Load(format!("{name} is not a question array: {e}")))?;
            raw.append(&mut records);
        }

        let questions = normalize_pool(raw, rng)?;
        info!(count = questions.len(), files = files.len(), "loaded question bank");

        let focus_areas = load_focus_areas(dir).unwrap_or_else(|| derive_focus_areas(&questions));
        Ok(Self { questions, focus_areas })
    }

    /// Load the bank bundled into the binary. Same index-driven path as
    /// [`QuestionBank::load_dir`], reading from embedded assets.
    pub fn load_bundled(rng: &mut SmallRng) -> Result<Self, QuizError> {
        let index = embedded_string(INDEX_FILE)
            .ok_or_else(|| QuizError::Load(format!("bundled {INDEX_FILE} missing")))?;
        let files: Vec<String> = serde_json::from_str(&index)
            .map_err(|e| QuizError::Load(format!("bundled {INDEX_FILE} invalid: {e}")))?;

        let mut raw: Vec<RawQuestion> = Vec::new();
        for name in &files {
            let content = embedded_string(name)
                .ok_or_else(|| QuizError::Load(format!("bundled file {name} missing")))?;
            let mut records: Vec<RawQuestion> = serde_json::from_str(&content)
                .map_err(|e| QuizError::Load(format!("bundled {name} invalid: {e}")))?;
            raw.append(&mut records);
        }

        let questions = normalize_pool(raw, rng)?;
        let focus_areas = embedded_string(FOCUS_AREAS_FILE)
            .and_then(|content| serde_json::from_str::<Vec<String>>(&content).ok())
            .filter(|areas| !areas.is_empty())
            .unwrap_or_else(|| derive_focus_areas(&questions));
        Ok(Self { questions, focus_areas })
    }
}

fn embedded_string(name: &str) -> Option<String> {
    let file = BundledBank::get(name)?;
    String::from_utf8(file.data.into_owned()).ok()
}

/// Normalize every record and drop the unanswerable ones. Zero surviving
/// questions is a load failure, not an empty-but-usable pool.
fn normalize_pool(raw: Vec<RawQuestion>, rng: &mut SmallRng) -> Result<Vec<Question>, QuizError> {
    if raw.is_empty() {
        return Err(QuizError::Load("loaded files but found 0 questions".to_string()));
    }
    let total = raw.len();
    let questions: Vec<Question> = raw
        .into_iter()
        .map(|record| normalize::normalize(record, rng))
        .filter(|question| {
            if question.is_answerable() {
                true
            } else {
                warn!(id = %question.id, "dropping unanswerable question");
                false
            }
        })
        .collect();
    if questions.is_empty() {
        return Err(QuizError::Load(format!(
            "all {total} loaded questions were unanswerable"
        )));
    }
    Ok(questions)
}

/// Optional `focus-areas.json` next to the index: a JSON array of tag
/// strings. Absent or malformed just means "derive from the pool".
fn load_focus_areas(dir: &Path) -> Option<Vec<String>> {
    let content = fs::read_to_string(dir.join(FOCUS_AREAS_FILE)).ok()?;
    let areas: Vec<String> = serde_json::from_str(&content).ok()?;
    if areas.is_empty() { None } else { Some(areas) }
}

pub fn derive_focus_areas(questions: &[Question]) -> Vec<String> {
    let mut areas: Vec<String> = questions.iter().map(|q| q.focus.clone()).collect();
    areas.sort();
    areas.dedup();
    areas
}

/// User-supplied replacement pool. Validation failures leave the current
/// pool untouched; the caller surfaces them as a transient notice.
pub fn import_file(path: &Path, rng: &mut SmallRng) -> Result<Vec<Question>, QuizError> {
    if path.extension().and_then(|e| e.to_str()).is_none_or(|e| !e.eq_ignore_ascii_case("json")) {
        return Err(QuizError::Validation("import file must be a .json file".to_string()));
    }
    let size = fs::metadata(path)
        .map_err(|e| QuizError::Validation(format!("cannot read {}: {e}", path.display())))?
        .len();
    if size > MAX_IMPORT_BYTES {
        return Err(QuizError::Validation(format!(
            "import file too large ({size} bytes, limit {MAX_IMPORT_BYTES})"
        )));
    }
    let content = fs::read_to_string(path)
        .map_err(|e| QuizError::Validation(format!("cannot read {}: {e}", path.display())))?;
    let raw: Vec<RawQuestion> = serde_json::from_str(&content)
        .map_err(|e| QuizError::Validation(format!("invalid questions file: {e}")))?;
    if raw.is_empty() {
        return Err(QuizError::Validation("import file contains no questions".to_string()));
    }
    let count = raw.len();
    let questions = normalize_pool(raw, rng)
        .map_err(|_| QuizError::Validation(format!("none of the {count} imported questions were usable")))?;
    info!(count = questions.len(), path = %path.display(), "imported question pool");
    Ok(questions)
}

/// Serialize the in-memory pool as a pretty-printed JSON array.
pub fn export_file(questions: &[Question], path: &Path) -> Result<(), QuizError> {
    let json = serde_json::to_string_pretty(questions)
        .map_err(|e| QuizError::Storage(e.to_string()))?;
    fs::write(path, json).map_err(|e| QuizError::Storage(e.to_string()))?;
    info!(count = questions.len(), path = %path.display(), "exported question pool");
    Ok(())
}
