//! Core types for the vocabulary game.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::time::Duration;

/// An English word and its Chinese translation.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct WordPair {
    pub en: String,
    pub cn: String,
}

impl WordPair {
    pub fn new(en: impl Into<String>, cn: impl Into<String>) -> Self {
        Self {
            en: en.into(),
            cn: cn.into(),
        }
    }

    /// Both sides contain something other than whitespace.
    pub fn is_complete(&self) -> bool {
        !self.en.trim().is_empty() && !self.cn.trim().is_empty()
    }
}

/// A user-authored deck.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CustomDeck {
    pub id: String,
    pub name: String,
    pub pairs: Vec<WordPair>,
    #[serde(with = "chrono::serde::ts_milliseconds")]
    pub created_at: DateTime<Utc>,
}

/// Which language a card shows.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Side {
    En,
    Cn,
}

/// A single card on the matching board.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CardItem {
    pub id: String,
    pub pair_id: String,
    pub content: String,
    pub side: Side,
    pub is_face_up: bool,
    pub is_matched: bool,
}

/// Built-in textbook units.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum GameLevel {
    #[default]
    #[serde(rename = "Unit 1")]
    Unit1,
    #[serde(rename = "Unit 1 补充")]
    Unit1Supplement,
    #[serde(rename = "Unit 2")]
    Unit2,
    #[serde(rename = "Unit 2 补充")]
    Unit2Supplement,
    #[serde(rename = "Unit 3")]
    Unit3,
    #[serde(rename = "Unit 4")]
    Unit4,
    #[serde(rename = "Unit 5")]
    Unit5,
    #[serde(rename = "Unit 6")]
    Unit6,
}

impl GameLevel {
    /// Every built-in unit in menu order.
    pub const ALL: [GameLevel; 8] = [
        Self::Unit1,
        Self::Unit1Supplement,
        Self::Unit2,
        Self::Unit2Supplement,
        Self::Unit3,
        Self::Unit4,
        Self::Unit5,
        Self::Unit6,
    ];

    /// Display label, also used as the deck identifier.
    pub fn label(self) -> &'static str {
        match self {
            Self::Unit1 => "Unit 1",
            Self::Unit1Supplement => "Unit 1 补充",
            Self::Unit2 => "Unit 2",
            Self::Unit2Supplement => "Unit 2 补充",
            Self::Unit3 => "Unit 3",
            Self::Unit4 => "Unit 4",
            Self::Unit5 => "Unit 5",
            Self::Unit6 => "Unit 6",
        }
    }

    /// Look up a unit by its label.
    pub fn from_label(label: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|level| level.label() == label)
    }
}

impl fmt::Display for GameLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Identifies the deck a game draws its words from.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "kind", content = "id", rename_all = "snake_case")]
pub enum DeckId {
    BuiltIn(GameLevel),
    Custom(String),
}

impl Default for DeckId {
    fn default() -> Self {
        Self::BuiltIn(GameLevel::default())
    }
}

impl DeckId {
    /// Parse a raw identifier; unit labels resolve to built-in units.
    pub fn parse(raw: &str) -> Self {
        match GameLevel::from_label(raw) {
            Some(level) => Self::BuiltIn(level),
            None => Self::Custom(raw.to_string()),
        }
    }

    pub fn as_str(&self) -> &str {
        match self {
            Self::BuiltIn(level) => level.label(),
            Self::Custom(id) => id,
        }
    }

    pub fn is_custom(&self) -> bool {
        matches!(self, Self::Custom(_))
    }
}

impl fmt::Display for DeckId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Which game the player is in.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GameMode {
    #[default]
    Match,
    Spell,
}

/// Matching game lifecycle.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GameState {
    #[default]
    Idle,
    Loading,
    Playing,
    Won,
}

/// Matching mode for typed answers.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MatchingMode {
    Exact,
    #[default]
    CaseInsensitive,
}

/// Tunables for the matching game.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MatchSettings {
    pub batch_size_pairs: usize,
    pub match_delay_ms: u64,
    pub mismatch_delay_ms: u64,
    pub batch_delay_ms: u64,
    pub tick_interval_ms: u64,
}

impl Default for MatchSettings {
    fn default() -> Self {
        Self {
            batch_size_pairs: 8,
            match_delay_ms: 500,
            mismatch_delay_ms: 400,
            batch_delay_ms: 600,
            tick_interval_ms: 1000,
        }
    }
}

impl MatchSettings {
    pub fn match_delay(&self) -> Duration {
        Duration::from_millis(self.match_delay_ms)
    }

    pub fn mismatch_delay(&self) -> Duration {
        Duration::from_millis(self.mismatch_delay_ms)
    }

    pub fn batch_delay(&self) -> Duration {
        Duration::from_millis(self.batch_delay_ms)
    }

    pub fn tick_interval(&self) -> Duration {
        Duration::from_millis(self.tick_interval_ms)
    }
}

/// Tunables for the spelling game.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SpellingSettings {
    /// Chance that any single letter is hidden.
    pub hide_probability: f64,
    pub advance_delay_ms: u64,
    pub matching_mode: MatchingMode,
}

impl Default for SpellingSettings {
    fn default() -> Self {
        Self {
            hide_probability: 0.6,
            advance_delay_ms: 1000,
            matching_mode: MatchingMode::default(),
        }
    }
}

impl SpellingSettings {
    pub fn advance_delay(&self) -> Duration {
        Duration::from_millis(self.advance_delay_ms)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_level_labels_round_trip() {
        for level in GameLevel::ALL {
            assert_eq!(GameLevel::from_label(level.label()), Some(level));
        }
        assert_eq!(GameLevel::from_label("Unit 7"), None);
    }

    #[test]
    fn test_deck_id_parse() {
        assert_eq!(DeckId::parse("Unit 2 补充"), DeckId::BuiltIn(GameLevel::Unit2Supplement));
        assert_eq!(
            DeckId::parse("custom-1700000000000"),
            DeckId::Custom("custom-1700000000000".to_string())
        );
        assert_eq!(DeckId::default().as_str(), "Unit 1");
    }

    #[test]
    fn test_enum_defaults() {
        assert_eq!(GameLevel::default(), GameLevel::Unit1);
        assert_eq!(GameMode::default(), GameMode::Match);
        assert_eq!(GameState::default(), GameState::Idle);
        assert_eq!(MatchingMode::default(), MatchingMode::CaseInsensitive);
        assert_eq!(DeckId::default(), DeckId::BuiltIn(GameLevel::Unit1));
    }

    #[test]
    fn test_custom_deck_persisted_shape() {
        let deck = CustomDeck {
            id: "custom-1".to_string(),
            name: "Animals".to_string(),
            pairs: vec![WordPair::new("cat", "猫")],
            created_at: Utc.timestamp_millis_opt(1_700_000_000_000).unwrap(),
        };

        let json = serde_json::to_value(&deck).unwrap();
        assert_eq!(json["createdAt"], 1_700_000_000_000i64);
        assert_eq!(json["pairs"][0]["cn"], "猫");

        let back: CustomDeck = serde_json::from_value(json).unwrap();
        assert_eq!(back, deck);
    }

    #[test]
    fn test_word_pair_completeness() {
        assert!(WordPair::new("cat", "猫").is_complete());
        assert!(!WordPair::new("  ", "猫").is_complete());
        assert!(!WordPair::new("cat", "").is_complete());
    }
}
