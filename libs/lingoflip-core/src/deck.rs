//! Deck authoring: draft editing, validation and custom deck ids.

use crate::error::{DeckError, Result};
use crate::types::{CustomDeck, GameLevel, WordPair};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Blank rows a fresh draft starts with.
pub const DEFAULT_DRAFT_ROWS: usize = 4;

/// Minimum number of complete pairs a deck must have.
pub const MIN_DECK_PAIRS: usize = 2;

const CUSTOM_ID_PREFIX: &str = "custom-";

/// Editable deck form, before validation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DeckDraft {
    pub name: String,
    pub pairs: Vec<WordPair>,
}

impl Default for DeckDraft {
    fn default() -> Self {
        Self {
            name: String::new(),
            pairs: vec![WordPair::new("", ""); DEFAULT_DRAFT_ROWS],
        }
    }
}

impl DeckDraft {
    /// Start a draft from an existing deck.
    pub fn from_deck(deck: &CustomDeck) -> Self {
        if deck.pairs.is_empty() {
            return Self {
                name: deck.name.clone(),
                ..Self::default()
            };
        }
        Self {
            name: deck.name.clone(),
            pairs: deck.pairs.clone(),
        }
    }

    pub fn add_row(&mut self) {
        self.pairs.push(WordPair::new("", ""));
    }

    /// Remove a row. The last remaining row is kept.
    pub fn remove_row(&mut self, index: usize) -> bool {
        if self.pairs.len() <= 1 || index >= self.pairs.len() {
            return false;
        }
        self.pairs.remove(index);
        true
    }

    /// Check the draft and return the name with its complete pairs.
    ///
    /// Incomplete rows are dropped; the name is stored as typed.
    pub fn validate(&self) -> Result<(String, Vec<WordPair>)> {
        if self.name.trim().is_empty() {
            return Err(DeckError::EmptyName);
        }

        let pairs: Vec<WordPair> = self
            .pairs
            .iter()
            .filter(|p| p.is_complete())
            .cloned()
            .collect();

        if pairs.len() < MIN_DECK_PAIRS {
            return Err(DeckError::TooFewPairs { found: pairs.len() });
        }

        Ok((self.name.clone(), pairs))
    }
}

/// Generate an id for a new custom deck.
///
/// Ids are `custom-<epoch millis>`. If another deck already holds that id the
/// timestamp is bumped until it is free.
pub fn new_deck_id(now: DateTime<Utc>, existing: &[CustomDeck]) -> String {
    let mut millis = now.timestamp_millis();
    loop {
        let candidate = format!("{}{}", CUSTOM_ID_PREFIX, millis);
        let taken = existing.iter().any(|d| d.id == candidate);
        if !taken && GameLevel::from_label(&candidate).is_none() {
            return candidate;
        }
        millis += 1;
    }
}

/// Apply a validated draft to the deck list.
///
/// With `existing_id` the matching deck keeps its id and gets the new name,
/// pairs and timestamp. Without it a new deck is appended. Returns the id of
/// the saved deck.
pub fn upsert_deck(
    decks: &mut Vec<CustomDeck>,
    draft: &DeckDraft,
    existing_id: Option<&str>,
    now: DateTime<Utc>,
) -> Result<String> {
    let (name, pairs) = draft.validate()?;

    match existing_id {
        Some(id) => {
            let deck = decks
                .iter_mut()
                .find(|d| d.id == id)
                .ok_or_else(|| DeckError::NotFound(id.to_string()))?;
            deck.name = name;
            deck.pairs = pairs;
            deck.created_at = now;
            Ok(deck.id.clone())
        }
        None => {
            let id = new_deck_id(now, decks);
            decks.push(CustomDeck {
                id: id.clone(),
                name,
                pairs,
                created_at: now,
            });
            Ok(id)
        }
    }
}
