use std::fs;
use std::path::PathBuf;

use anyhow::Result;
use serde::{Deserialize, Serialize};

pub const MIN_QUESTIONS: usize = 5;
pub const MAX_QUESTIONS: usize = 40;

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Config {
    #[serde(default = "default_question_count")]
    pub question_count: usize,
    #[serde(default = "default_shuffle_questions")]
    pub shuffle_questions: bool,
    #[serde(default = "default_balanced_focus")]
    pub balanced_focus: bool,
    #[serde(default = "default_show_explanations")]
    pub show_explanations: bool,
    #[serde(default = "default_theme")]
    pub theme: String,
    /// Question bank directory; the bundled sample bank is used when unset.
    #[serde(default)]
    pub bank_dir: Option<String>,
}

fn default_question_count() -> usize {
    10
}
fn default_shuffle_questions() -> bool {
    true
}
fn default_balanced_focus() -> bool {
    false
}
fn default_show_explanations() -> bool {
    true
}
fn default_theme() -> String {
    "terminal-default".to_string()
}

impl Default for Config {
    fn default() -> Self {
        Self {
            question_count: default_question_count(),
            shuffle_questions: default_shuffle_questions(),
            balanced_focus: default_balanced_focus(),
            show_explanations: default_show_explanations(),
            theme: default_theme(),
            bank_dir: None,
        }
    }
}

impl Config {
    pub fn load() -> Result<Self> {
        let path = Self::config_path();
        if path.exists() {
            let content = fs::read_to_string(&path)?;
            let config: Config = toml::from_str(&content)?;
            Ok(config)
        } else {
            Ok(Config::default())
        }
    }

    pub fn save(&self) -> Result<()> {
        let path = Self::config_path();
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        let content = toml::to_string_pretty(self)?;
        fs::write(&path, content)?;
        Ok(())
    }

    fn config_path() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("quizdr")
            .join("config.toml")
    }

    /// Clamp values that hand-edited or stale config files can push out of
    /// range. Call after deserialization.
    pub fn validate(&mut self) {
        self.question_count = self.question_count.clamp(MIN_QUESTIONS, MAX_QUESTIONS);
        if self.theme.trim().is_empty() {
            self.theme = default_theme();
        }
    }
}
