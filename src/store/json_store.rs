use std::fs;
use std::io::Write;
use std::path::PathBuf;

use serde::Serialize;
use tracing::warn;

use crate::error::QuizError;
use crate::question::normalize::Question;

const WRONG_ANSWERS_FILE: &str = "wrong_answers.json";

/// Persistent store in the user's data directory.
///
/// Holds a single named slot: the wrong-answer working set from the most
/// recently submitted session, as a JSON array of full question objects.
/// Storage failures are never fatal; readers see an empty store instead.
pub struct JsonStore {
    base_dir: PathBuf,
}

impl JsonStore {
    pub fn new() -> Result<Self, QuizError> {
        let base_dir = dirs::data_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("quizdr");
        Self::with_base_dir(base_dir)
    }

    pub fn with_base_dir(base_dir: PathBuf) -> Result<Self, QuizError> {
        fs::create_dir_all(&base_dir).map_err(|e| QuizError::Storage(e.to_string()))?;
        Ok(Self { base_dir })
    }

    fn file_path(&self, name: &str) -> PathBuf {
        self.base_dir.join(name)
    }

    /// Atomic save: write a sibling .tmp, sync, rename over the target.
    fn save<T: Serialize>(&self, name: &str, data: &T) -> Result<(), QuizError> {
        let path = self.file_path(name);
        let tmp_path = path.with_extension("tmp");

        let write = || -> std::io::Result<()> {
            let json = serde_json::to_string_pretty(data)
                .map_err(|e| std::io::Error::other(e.to_string()))?;
            let mut file = fs::File::create(&tmp_path)?;
            file.write_all(json.as_bytes())?;
            file.sync_all()?;
            fs::rename(&tmp_path, &path)
        };
        write().map_err(|e| QuizError::Storage(format!("{name}: {e}")))
    }

    /// Overwrite the wrong-answer slot. Prior content is replaced, never
    /// merged.
    pub fn save_wrong_answers(&self, questions: &[Question]) -> Result<(), QuizError> {
        self.save(WRONG_ANSWERS_FILE, &questions)
    }

    /// Read the wrong-answer slot. Missing or corrupt data yields an empty
    /// set; the condition is logged, never propagated.
    pub fn load_wrong_answers(&self) -> Vec<Question> {
        let path = self.file_path(WRONG_ANSWERS_FILE);
        if !path.exists() {
            return Vec::new();
        }
        let content = match fs::read_to_string(&path) {
            Ok(content) => content,
            Err(e) => {
                warn!("cannot read {WRONG_ANSWERS_FILE}: {e}");
                return Vec::new();
            }
        };
        match serde_json::from_str(&content) {
            Ok(questions) => questions,
            Err(e) => {
                warn!("corrupt {WRONG_ANSWERS_FILE}, treating as empty: {e}");
                Vec::new()
            }
        }
    }

    pub fn clear_wrong_answers(&self) -> Result<(), QuizError> {
        match fs::remove_file(self.file_path(WRONG_ANSWERS_FILE)) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(QuizError::Storage(e.to_string())),
        }
    }
}
