//! Error types for lingoflip-core.

use thiserror::Error;

/// Result type alias using DeckError.
pub type Result<T> = std::result::Result<T, DeckError>;

/// Validation failures raised while authoring or managing decks.
///
/// The display strings are shown to the player as-is.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DeckError {
    #[error("Please enter a deck name.")]
    EmptyName,

    #[error("Please add at least 2 complete word pairs.")]
    TooFewPairs { found: usize },

    #[error("You cannot delete standard textbook units.")]
    BuiltInUnit(String),

    #[error("deck not found: {0}")]
    NotFound(String),
}
