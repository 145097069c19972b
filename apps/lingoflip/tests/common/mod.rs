//! Common test utilities for controller integration tests.
//!
//! Controllers built here use an in-memory deck store, a static word provider
//! and seeded generators. Spelling hides every letter of a word.

#![allow(dead_code)]

pub mod fixtures;

use lingoflip::db::MemoryDeckStore;
use lingoflip::provider::StaticWordProvider;
use lingoflip::{Controller, GameEvent};
use lingoflip_core::random::{seeded, SeededRng};
use lingoflip_core::{Delivery, GameLevel, MatchEvent, MatchSettings, SpellingSettings, WordPair};

pub type TestController = Controller<MemoryDeckStore, StaticWordProvider, SeededRng>;

/// Controller whose provider serves `unit1` as Unit 1.
pub fn controller(unit1: Vec<WordPair>) -> TestController {
    controller_with_store(MemoryDeckStore::new(), unit1)
}

pub fn controller_with_store(store: MemoryDeckStore, unit1: Vec<WordPair>) -> TestController {
    let provider = StaticWordProvider::new().with_unit(GameLevel::Unit1, unit1);
    Controller::with_rng(
        store,
        provider,
        MatchSettings::default(),
        SpellingSettings {
            hide_probability: 1.0,
            ..SpellingSettings::default()
        },
        seeded(11),
        seeded(12),
    )
}

/// Let time pass until `want` is delivered; returns how it was applied.
///
/// Panics if the timers run dry first.
pub async fn wait_for(ctl: &mut TestController, want: GameEvent) -> Delivery {
    loop {
        match ctl.next_event().await {
            Some((event, delivery)) if event == want => return delivery,
            Some(_) => continue,
            None => panic!("timers ran dry waiting for {:?}", want),
        }
    }
}

pub fn resolve_match(pair_id: &str) -> GameEvent {
    GameEvent::Match(MatchEvent::ResolveMatch {
        pair_id: pair_id.to_string(),
    })
}

/// Click both cards of `pair_id` and wait for the match to resolve.
pub async fn match_pair(ctl: &mut TestController, pair_id: &str) {
    ctl.click_card(&format!("{}-en", pair_id));
    ctl.click_card(&format!("{}-cn", pair_id));
    assert_eq!(wait_for(ctl, resolve_match(pair_id)).await, Delivery::Applied);
}

/// Match every card currently on the board.
pub async fn clear_board(ctl: &mut TestController) {
    let mut pair_ids: Vec<String> = ctl
        .matching()
        .cards()
        .iter()
        .filter(|c| !c.is_matched)
        .map(|c| c.pair_id.clone())
        .collect();
    pair_ids.sort();
    pair_ids.dedup();
    for pair_id in pair_ids {
        match_pair(ctl, &pair_id).await;
    }
}

/// Type `word` into the spelling slots, starting from the first.
pub fn type_word(ctl: &mut TestController, word: &str) {
    ctl.spell_focus(0);
    for ch in word.chars() {
        ctl.spell_input(ch);
    }
}
