//! Memory-match game engine.
//!
//! Word pairs are shuffled and dealt in batches. Each pair becomes two face-up
//! cards (English and Chinese) that share a pair id. The player selects two
//! cards; equal pair ids resolve as a match after a short delay, anything else
//! resolves as a mismatch. When every pair on the board is matched the next
//! batch is dealt, and the game is won once nothing is left to deal.

use crate::schedule::{Delivery, Scheduled, SessionToken, Transition};
use crate::types::{CardItem, DeckId, GameState, MatchSettings, Side, WordPair};
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::Rng;
use serde::Serialize;
use std::collections::{HashSet, VecDeque};
use tracing::{debug, info};

/// Delayed transitions of the matching game.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MatchEvent {
    /// One second of play time.
    Tick,
    /// Finish a successful selection.
    ResolveMatch { pair_id: String },
    /// Finish a failed selection.
    ResolveMismatch,
    /// Put the next batch on the board.
    DealNextBatch,
}

/// What a card click did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClickOutcome {
    Ignored,
    Deselected,
    Selected,
    Matched,
    Mismatched,
}

/// Result screen data for a won game.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MatchSummary {
    pub moves: u32,
    pub elapsed_secs: u64,
    pub words: Vec<WordPair>,
}

pub type MatchTransition = Transition<ClickOutcome, MatchEvent>;

/// Matching game session.
pub struct MatchGame<R = StdRng> {
    settings: MatchSettings,
    rng: R,
    token: SessionToken,
    state: GameState,
    deck_id: Option<DeckId>,
    round: Vec<WordPair>,
    pending: VecDeque<WordPair>,
    cards: Vec<CardItem>,
    matched: HashSet<String>,
    first: Option<String>,
    second: Option<String>,
    processing: bool,
    moves: u32,
    elapsed_secs: u64,
    batch_number: usize,
    next_batch_scheduled: bool,
}

impl<R: Rng> MatchGame<R> {
    pub fn new(settings: MatchSettings, rng: R) -> Self {
        Self {
            settings,
            rng,
            token: SessionToken::default(),
            state: GameState::Idle,
            deck_id: None,
            round: Vec::new(),
            pending: VecDeque::new(),
            cards: Vec::new(),
            matched: HashSet::new(),
            first: None,
            second: None,
            processing: false,
            moves: 0,
            elapsed_secs: 0,
            batch_number: 0,
            next_batch_scheduled: false,
        }
    }

    pub fn state(&self) -> GameState {
        self.state
    }

    pub fn token(&self) -> SessionToken {
        self.token
    }

    pub fn settings(&self) -> &MatchSettings {
        &self.settings
    }

    /// Deck the current (or last) session was started from.
    pub fn deck_id(&self) -> Option<&DeckId> {
        self.deck_id.as_ref()
    }

    /// Cards of the current batch, in board order.
    pub fn cards(&self) -> &[CardItem] {
        &self.cards
    }

    pub fn card(&self, card_id: &str) -> Option<&CardItem> {
        self.cards.iter().find(|c| c.id == card_id)
    }

    /// Every pair of the round, in dealing order.
    pub fn round(&self) -> &[WordPair] {
        &self.round
    }

    pub fn pending_pairs(&self) -> usize {
        self.pending.len()
    }

    pub fn matched_pairs(&self) -> usize {
        self.matched.len()
    }

    pub fn moves(&self) -> u32 {
        self.moves
    }

    pub fn elapsed_secs(&self) -> u64 {
        self.elapsed_secs
    }

    /// 1-based number of the batch on the board, 0 before the first deal.
    pub fn batch_number(&self) -> usize {
        self.batch_number
    }

    pub fn first_selected(&self) -> Option<&str> {
        self.first.as_deref()
    }

    pub fn second_selected(&self) -> Option<&str> {
        self.second.as_deref()
    }

    pub fn is_selected(&self, card_id: &str) -> bool {
        self.first.as_deref() == Some(card_id) || self.second.as_deref() == Some(card_id)
    }

    /// A match or mismatch is waiting to resolve.
    pub fn is_processing(&self) -> bool {
        self.processing
    }

    /// The elapsed-time counter only runs while playing.
    pub fn timer_running(&self) -> bool {
        self.state == GameState::Playing
    }

    pub fn summary(&self) -> Option<MatchSummary> {
        (self.state == GameState::Won).then(|| MatchSummary {
            moves: self.moves,
            elapsed_secs: self.elapsed_secs,
            words: self.round.clone(),
        })
    }

    /// Start a new session for `deck_id` and wait for its words.
    ///
    /// Anything scheduled by an earlier session becomes stale.
    pub fn begin_loading(&mut self, deck_id: DeckId) {
        self.reset();
        self.state = GameState::Loading;
        info!(deck = %deck_id, "loading matching game");
        self.deck_id = Some(deck_id);
    }

    /// Abandon a load that could not be completed.
    pub fn fail_loading(&mut self) {
        if self.state == GameState::Loading {
            self.reset();
        }
    }

    /// Shuffle the loaded words and deal the first batch.
    ///
    /// Returns the periodic tick request. Words arriving when the session is
    /// no longer loading are dropped.
    pub fn deal(&mut self, pairs: Vec<WordPair>) -> Vec<Scheduled<MatchEvent>> {
        if self.state != GameState::Loading {
            debug!(state = ?self.state, "dropping words for a session that is not loading");
            return Vec::new();
        }

        let mut round = pairs;
        round.shuffle(&mut self.rng);
        self.pending = round.iter().cloned().collect();
        self.round = round;

        if self.pending.is_empty() {
            info!("deck is empty, nothing to match");
            self.state = GameState::Won;
            return Vec::new();
        }

        self.deal_next_batch();
        self.state = GameState::Playing;
        info!(
            pairs = self.round.len(),
            batch_size = self.settings.batch_size_pairs,
            "matching game started"
        );

        vec![Scheduled::every(
            self.token,
            self.settings.tick_interval(),
            MatchEvent::Tick,
        )]
    }

    /// Handle a click on a card.
    pub fn click(&mut self, card_id: &str) -> MatchTransition {
        if self.state != GameState::Playing || self.processing {
            return Transition::new(ClickOutcome::Ignored);
        }

        if self.first.as_deref() == Some(card_id) {
            self.first = None;
            debug!(card = card_id, "deselected");
            return Transition::new(ClickOutcome::Deselected);
        }

        let Some(clicked) = self.card(card_id) else {
            return Transition::new(ClickOutcome::Ignored);
        };
        if clicked.is_matched {
            return Transition::new(ClickOutcome::Ignored);
        }
        let clicked_pair = clicked.pair_id.clone();

        let Some(first_id) = self.first.clone() else {
            self.first = Some(card_id.to_string());
            debug!(card = card_id, "first card selected");
            return Transition::new(ClickOutcome::Selected);
        };

        self.second = Some(card_id.to_string());
        self.moves += 1;
        self.processing = true;

        let first_pair = self
            .card(&first_id)
            .map(|c| c.pair_id.clone())
            .unwrap_or_default();

        if first_pair == clicked_pair {
            for card in self.cards.iter_mut().filter(|c| c.pair_id == clicked_pair) {
                card.is_face_up = false;
            }
            debug!(pair = %clicked_pair, moves = self.moves, "match");
            Transition::new(ClickOutcome::Matched).with(Scheduled::after(
                self.token,
                self.settings.match_delay(),
                MatchEvent::ResolveMatch {
                    pair_id: clicked_pair,
                },
            ))
        } else {
            debug!(first = %first_id, second = card_id, moves = self.moves, "mismatch");
            Transition::new(ClickOutcome::Mismatched).with(Scheduled::after(
                self.token,
                self.settings.mismatch_delay(),
                MatchEvent::ResolveMismatch,
            ))
        }
    }

    /// Deliver a previously scheduled event.
    pub fn fire(&mut self, token: SessionToken, event: MatchEvent) -> Transition<Delivery, MatchEvent> {
        if token != self.token {
            return Transition::new(Delivery::Stale);
        }

        match event {
            MatchEvent::Tick => {
                if self.state != GameState::Playing {
                    return Transition::new(Delivery::Ignored);
                }
                self.elapsed_secs += 1;
                Transition::new(Delivery::Applied)
            }
            MatchEvent::ResolveMatch { pair_id } => {
                if !self.processing {
                    return Transition::new(Delivery::Ignored);
                }
                for card in self.cards.iter_mut().filter(|c| c.pair_id == pair_id) {
                    card.is_matched = true;
                }
                self.matched.insert(pair_id);
                self.clear_selection();

                let mut transition = Transition::new(Delivery::Applied);
                if let Some(next) = self.check_batch_complete() {
                    transition = transition.with(next);
                }
                transition
            }
            MatchEvent::ResolveMismatch => {
                if !self.processing {
                    return Transition::new(Delivery::Ignored);
                }
                self.clear_selection();
                Transition::new(Delivery::Applied)
            }
            MatchEvent::DealNextBatch => {
                if self.state != GameState::Playing || !self.next_batch_scheduled {
                    return Transition::new(Delivery::Ignored);
                }
                self.deal_next_batch();
                Transition::new(Delivery::Applied)
            }
        }
    }

    /// Leave the game and return to idle.
    pub fn exit(&mut self) {
        if self.state != GameState::Idle {
            info!(moves = self.moves, elapsed_secs = self.elapsed_secs, "leaving matching game");
        }
        self.reset();
    }

    fn reset(&mut self) {
        self.token = self.token.next();
        self.state = GameState::Idle;
        self.round.clear();
        self.pending.clear();
        self.cards.clear();
        self.matched.clear();
        self.first = None;
        self.second = None;
        self.processing = false;
        self.moves = 0;
        self.elapsed_secs = 0;
        self.batch_number = 0;
        self.next_batch_scheduled = false;
    }

    fn clear_selection(&mut self) {
        self.first = None;
        self.second = None;
        self.processing = false;
    }

    fn check_batch_complete(&mut self) -> Option<Scheduled<MatchEvent>> {
        if self.state != GameState::Playing || self.cards.is_empty() {
            return None;
        }
        debug_assert!(self.cards.len() % 2 == 0, "cards are dealt in pairs");
        if self.matched.len() * 2 != self.cards.len() {
            return None;
        }

        if self.pending.is_empty() {
            self.state = GameState::Won;
            info!(moves = self.moves, elapsed_secs = self.elapsed_secs, "matching game won");
            return None;
        }

        self.next_batch_scheduled = true;
        debug!(remaining = self.pending.len(), "batch complete");
        Some(Scheduled::after(
            self.token,
            self.settings.batch_delay(),
            MatchEvent::DealNextBatch,
        ))
    }

    fn deal_next_batch(&mut self) {
        let take = self.settings.batch_size_pairs.max(1).min(self.pending.len());
        let batch: Vec<WordPair> = self.pending.drain(..take).collect();
        self.batch_number += 1;

        let mut cards = Vec::with_capacity(batch.len() * 2);
        for (index, pair) in batch.into_iter().enumerate() {
            let pair_id = format!("pair-{}-{}", self.batch_number, index);
            cards.push(CardItem {
                id: format!("{}-en", pair_id),
                pair_id: pair_id.clone(),
                content: pair.en,
                side: Side::En,
                is_face_up: true,
                is_matched: false,
            });
            cards.push(CardItem {
                id: format!("{}-cn", pair_id),
                pair_id,
                content: pair.cn,
                side: Side::Cn,
                is_face_up: true,
                is_matched: false,
            });
        }
        cards.shuffle(&mut self.rng);

        self.cards = cards;
        self.matched.clear();
        self.first = None;
        self.second = None;
        self.processing = false;
        self.next_batch_scheduled = false;
        debug!(batch = self.batch_number, cards = self.cards.len(), "dealt batch");
    }
}
