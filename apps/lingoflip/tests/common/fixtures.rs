//! Test fixtures and factory functions for creating test data.

use lingoflip::db::MemoryDeckStore;
use lingoflip_core::{DeckDraft, WordPair};

/// Word pairs `word0/词0 .. word{n-1}/词{n-1}`.
pub fn pairs(n: usize) -> Vec<WordPair> {
    (0..n)
        .map(|i| WordPair::new(format!("word{}", i), format!("词{}", i)))
        .collect()
}

pub fn pets() -> Vec<WordPair> {
    vec![WordPair::new("cat", "猫"), WordPair::new("dog", "狗")]
}

/// A builder form holding `pairs` plus one blank row.
pub fn draft(name: &str, pairs: &[WordPair]) -> DeckDraft {
    let mut draft = DeckDraft {
        name: name.to_string(),
        pairs: pairs.to_vec(),
    };
    draft.add_row();
    draft
}

/// A store that already holds one deck, as a previous session would leave it.
pub fn store_with_deck(id: &str, name: &str, pairs: &[WordPair]) -> MemoryDeckStore {
    let value = serde_json::json!([{
        "id": id,
        "name": name,
        "pairs": pairs,
        "createdAt": 1_700_000_000_000_i64,
    }]);
    MemoryDeckStore::with_raw(value.to_string())
}
