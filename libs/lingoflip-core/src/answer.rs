//! Answer matching for the spelling game.

use crate::types::MatchingMode;
use serde::{Deserialize, Serialize};

/// Result of comparing a typed answer to the correct answer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MatchResult {
    /// Whether the answer is considered correct.
    pub is_correct: bool,
    /// The matching mode used.
    pub matching_mode: MatchingMode,
    /// Typed answer as compared.
    pub typed: String,
    /// Correct answer as compared.
    pub correct: String,
}

/// Compare a typed answer to the correct answer.
pub fn compare_answers(typed: &str, correct: &str, mode: MatchingMode) -> MatchResult {
    let is_correct = match mode {
        MatchingMode::Exact => typed == correct,
        MatchingMode::CaseInsensitive => typed.to_lowercase() == correct.to_lowercase(),
    };

    MatchResult {
        is_correct,
        matching_mode: mode,
        typed: typed.to_string(),
        correct: correct.to_string(),
    }
}
