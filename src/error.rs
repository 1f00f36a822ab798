use thiserror::Error;

/// Failure classes of the quiz runner.
///
/// `Load` is the only fatal class: it halts initialization and keeps
/// quiz-start disabled behind a persistent banner. Everything else is caught
/// at the handler boundary and must never tear down a running session.
#[derive(Debug, Error)]
pub enum QuizError {
    /// Question bank fetch or parse failure.
    #[error("failed to load question bank: {0}")]
    Load(String),

    /// Rejected user input (question count, import file). Surfaced as a
    /// transient notice; pool and session stay untouched.
    #[error("{0}")]
    Validation(String),

    /// Persisted-state read/write failure. Logged and treated as an
    /// empty/absent store.
    #[error("storage error: {0}")]
    Storage(String),

    /// Navigation or answer index outside the session bounds. UI guards
    /// should prevent this; when it slips through it is a logged no-op.
    #[error("index {index} out of range (len {len})")]
    OutOfRange { index: usize, len: usize },
}

impl QuizError {
    /// Returns `true` if this error halts initialization rather than being
    /// recoverable in-session.
    pub fn is_fatal(&self) -> bool {
        matches!(self, QuizError::Load(_))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_only_load_is_fatal() {
        assert!(QuizError::Load("index.json missing".into()).is_fatal());
        assert!(!QuizError::Validation("bad count".into()).is_fatal());
        assert!(!QuizError::Storage("disk full".into()).is_fatal());
        assert!(!QuizError::OutOfRange { index: 9, len: 5 }.is_fatal());
    }
}
