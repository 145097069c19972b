//! Core game logic for LingoFlip, shared by every front end.
//!
//! Provides:
//! - Matching game engine (batched memory-match of English/Chinese pairs)
//! - Spelling game engine (fill in hidden letters, requeue on mistakes)
//! - Deck authoring rules and custom deck ids
//! - Scheduled-event types and the random generators the engines take
//! - Shared types (WordPair, CustomDeck, CardItem, GameLevel, etc.)

pub mod answer;
pub mod deck;
pub mod error;
pub mod match_game;
pub mod random;
pub mod schedule;
pub mod spelling;
pub mod types;

pub use answer::{compare_answers, MatchResult};
pub use deck::{new_deck_id, upsert_deck, DeckDraft};
pub use error::{DeckError, Result};
pub use match_game::{ClickOutcome, MatchEvent, MatchGame, MatchSummary, MatchTransition};
pub use random::SeededRng;
pub use schedule::{Delivery, Scheduled, SessionToken, Timing, Transition};
pub use spelling::{
    CheckOutcome, Feedback, LetterSlot, SpellEvent, SpellTransition, SpellingGame,
    SpellingSummary,
};
pub use types::{
    CardItem, CustomDeck, DeckId, GameLevel, GameMode, GameState, MatchSettings, MatchingMode,
    Side, SpellingSettings, WordPair,
};
