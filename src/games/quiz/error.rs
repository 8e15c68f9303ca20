//! Quiz arena error taxonomy.
//!
//! Gameplay failures (wrong answers, timeouts, death) are ordinary state
//! transitions and never show up here.

use thiserror::Error;

use super::state::Difficulty;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum QuizError {
    /// The question source returned nothing for a tier.
    #[error("no {0} questions available")]
    ProviderEmpty(Difficulty),

    /// The question source itself failed (transport or parse).
    #[error("could not load {difficulty} questions: {reason}")]
    ProviderFailure { difficulty: Difficulty, reason: String },

    /// Point allocation with nothing left to spend.
    #[error("no unspent level points")]
    InvalidAllocation,

    /// A battle operation was attempted before the question pools loaded.
    #[error("question pools are not loaded")]
    NotReady,
}

impl QuizError {
    /// Whether this error blocks the session until the page is reloaded.
    pub fn is_provider_error(&self) -> bool {
        matches!(self, QuizError::ProviderEmpty(_) | QuizError::ProviderFailure { .. })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_names_the_tier() {
        let e = QuizError::ProviderEmpty(Difficulty::Hard);
        assert_eq!(e.to_string(), "no hard questions available");

        let e = QuizError::ProviderFailure {
            difficulty: Difficulty::Medium,
            reason: "timeout".into(),
        };
        assert_eq!(e.to_string(), "could not load medium questions: timeout");
    }

    #[test]
    fn provider_errors_are_classified() {
        assert!(QuizError::ProviderEmpty(Difficulty::Easy).is_provider_error());
        assert!(!QuizError::InvalidAllocation.is_provider_error());
        assert!(!QuizError::NotReady.is_provider_error());
    }
}
