//! Question Provider boundary and the per-session pool cache.
//!
//! Pools are fetched once per tier when the session starts and kept for the
//! session's lifetime. Battles only ever draw from the cache.

use rand::seq::SliceRandom;
use rand::Rng;

use super::error::QuizError;
use super::state::{Difficulty, Question};

/// The bank shipped with the client.
const BUNDLED_BANK: &str = include_str!("questions.json");

/// Source of question records, looked up by tier.
pub trait QuestionProvider {
    fn fetch_questions(&self, difficulty: Difficulty) -> Result<Vec<Question>, QuizError>;
}

/// Question bank parsed from JSON: an array of `{text, answer, points, difficulty}`.
pub struct BundledQuestions {
    source: String,
}

impl Default for BundledQuestions {
    fn default() -> Self {
        Self::from_json(BUNDLED_BANK)
    }
}

impl BundledQuestions {
    pub fn from_json(source: impl Into<String>) -> Self {
        Self { source: source.into() }
    }
}

impl QuestionProvider for BundledQuestions {
    fn fetch_questions(&self, difficulty: Difficulty) -> Result<Vec<Question>, QuizError> {
        let all: Vec<Question> = serde_json::from_str(&self.source).map_err(|e| {
            QuizError::ProviderFailure { difficulty, reason: e.to_string() }
        })?;
        Ok(all.into_iter().filter(|q| q.difficulty == difficulty).collect())
    }
}

#[derive(Clone, Debug, Default, PartialEq)]
pub struct QuestionPools {
    easy: Vec<Question>,
    medium: Vec<Question>,
    hard: Vec<Question>,
}

impl QuestionPools {
    /// Fetch every tier once. Any failed or empty tier blocks the session.
    pub fn load(provider: &dyn QuestionProvider) -> Result<Self, QuizError> {
        let mut pools = Self::default();
        for difficulty in Difficulty::ALL {
            let questions = provider.fetch_questions(difficulty)?;
            if questions.is_empty() {
                return Err(QuizError::ProviderEmpty(difficulty));
            }
            *pools.pool_mut(difficulty) = questions;
        }
        Ok(pools)
    }

    pub fn pool(&self, difficulty: Difficulty) -> &[Question] {
        match difficulty {
            Difficulty::Easy => &self.easy,
            Difficulty::Medium => &self.medium,
            Difficulty::Hard => &self.hard,
        }
    }

    fn pool_mut(&mut self, difficulty: Difficulty) -> &mut Vec<Question> {
        match difficulty {
            Difficulty::Easy => &mut self.easy,
            Difficulty::Medium => &mut self.medium,
            Difficulty::Hard => &mut self.hard,
        }
    }

    /// Uniform draw from one tier.
    pub fn pick<R: Rng + ?Sized>(&self, difficulty: Difficulty, rng: &mut R) -> Result<&Question, QuizError> {
        self.pool(difficulty)
            .choose(rng)
            .ok_or(QuizError::ProviderEmpty(difficulty))
    }
}
