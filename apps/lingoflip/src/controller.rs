//! Application controller.
//!
//! Owns the deck list, the current selection, both game engines and the timer
//! queue that feeds delayed events back into them. Front ends call the
//! operations here and drive [`Controller::next_event`] to let time pass.

use crate::db::DeckStore;
use crate::error::Result;
use crate::provider::WordPairProvider;
use crate::runtime::TimerQueue;
use chrono::Utc;
use lingoflip_core::random;
use lingoflip_core::{
    upsert_deck, CheckOutcome, ClickOutcome, CustomDeck, DeckDraft, DeckError, DeckId, Delivery,
    GameLevel, GameMode, GameState, MatchEvent, MatchGame, MatchSettings, Scheduled,
    SessionToken, SpellEvent, SpellingGame, SpellingSettings, WordPair,
};
use rand::rngs::StdRng;
use rand::Rng;
use tracing::{debug, info, warn};

/// Timer event of either game.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GameEvent {
    Match(MatchEvent),
    Spell(SpellEvent),
}

pub struct Controller<S, P, R = StdRng> {
    store: S,
    provider: P,
    decks: Vec<CustomDeck>,
    current_deck: DeckId,
    mode: GameMode,
    delete_mode: bool,
    deck_to_delete: Option<String>,
    matching: MatchGame<R>,
    spelling: SpellingGame<R>,
    timers: TimerQueue<GameEvent>,
}

impl<S: DeckStore, P: WordPairProvider> Controller<S, P> {
    pub fn new(store: S, provider: P, matching: MatchSettings, spelling: SpellingSettings) -> Self {
        Self::with_rng(
            store,
            provider,
            matching,
            spelling,
            random::from_entropy(),
            random::from_entropy(),
        )
    }
}

impl<S: DeckStore, P: WordPairProvider, R: Rng> Controller<S, P, R> {
    /// Build a controller with explicit random generators for the two games.
    pub fn with_rng(
        store: S,
        provider: P,
        matching: MatchSettings,
        spelling: SpellingSettings,
        match_rng: R,
        spell_rng: R,
    ) -> Self {
        let decks = store.load();
        info!(decks = decks.len(), "loaded custom decks");

        Self {
            store,
            provider,
            decks,
            current_deck: DeckId::default(),
            mode: GameMode::default(),
            delete_mode: false,
            deck_to_delete: None,
            matching: MatchGame::new(matching, match_rng),
            spelling: SpellingGame::new(spelling, spell_rng),
            timers: TimerQueue::new(),
        }
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn decks(&self) -> &[CustomDeck] {
        &self.decks
    }

    pub fn deck(&self, id: &str) -> Option<&CustomDeck> {
        self.decks.iter().find(|d| d.id == id)
    }

    pub fn current_deck(&self) -> &DeckId {
        &self.current_deck
    }

    pub fn mode(&self) -> GameMode {
        self.mode
    }

    pub fn is_delete_mode(&self) -> bool {
        self.delete_mode
    }

    pub fn deck_to_delete(&self) -> Option<&str> {
        self.deck_to_delete.as_deref()
    }

    /// Choose a deck from the menu.
    ///
    /// In delete mode this marks a custom deck for deletion instead. Built-in
    /// units cannot be marked; an empty id leaves the mark untouched.
    pub fn select_deck(&mut self, raw: &str) -> Result<()> {
        if self.delete_mode {
            if self.deck(raw).is_some() {
                debug!(deck = raw, "marked for deletion");
                self.deck_to_delete = Some(raw.to_string());
            } else if !raw.is_empty() {
                self.deck_to_delete = None;
                return Err(DeckError::BuiltInUnit(raw.to_string()).into());
            }
            return Ok(());
        }

        let id = DeckId::parse(raw);
        if let DeckId::Custom(custom) = &id {
            if self.deck(custom).is_none() {
                return Err(DeckError::NotFound(custom.clone()).into());
            }
        }
        debug!(deck = %id, "deck selected");
        self.current_deck = id;
        Ok(())
    }

    pub fn toggle_delete_mode(&mut self) {
        self.delete_mode = !self.delete_mode;
        self.deck_to_delete = None;
    }

    /// Delete the deck marked in delete mode. Returns false if none is marked.
    pub fn confirm_delete(&mut self) -> Result<bool> {
        let Some(id) = self.deck_to_delete.clone() else {
            return Ok(false);
        };
        self.delete_deck(&id)?;
        Ok(true)
    }

    /// The selected deck, when it can be edited.
    pub fn deck_to_edit(&self) -> Option<&CustomDeck> {
        match &self.current_deck {
            DeckId::Custom(id) => self.deck(id),
            DeckId::BuiltIn(_) => None,
        }
    }

    pub fn draft_for_edit(&self) -> Option<DeckDraft> {
        self.deck_to_edit().map(DeckDraft::from_deck)
    }

    /// Create a deck, or replace the one with `existing_id`, and select it.
    ///
    /// Nothing changes unless the draft validates and the list is persisted.
    pub fn save_deck(&mut self, draft: &DeckDraft, existing_id: Option<&str>) -> Result<String> {
        let mut decks = self.decks.clone();
        let id = upsert_deck(&mut decks, draft, existing_id, Utc::now())?;
        self.store.save(&decks)?;

        info!(deck = %id, edited = existing_id.is_some(), "saved custom deck");
        self.decks = decks;
        self.current_deck = DeckId::Custom(id.clone());
        Ok(id)
    }

    /// Remove a custom deck.
    ///
    /// Deleting the selected deck falls back to the default unit and ends any
    /// game in progress. Always leaves delete mode.
    pub fn delete_deck(&mut self, id: &str) -> Result<()> {
        if GameLevel::from_label(id).is_some() {
            return Err(DeckError::BuiltInUnit(id.to_string()).into());
        }
        if self.deck(id).is_none() {
            return Err(DeckError::NotFound(id.to_string()).into());
        }

        let remaining: Vec<CustomDeck> = self.decks.iter().filter(|d| d.id != id).cloned().collect();
        self.store.save(&remaining)?;
        self.decks = remaining;
        info!(deck = id, "deleted custom deck");

        if self.current_deck.as_str() == id {
            self.current_deck = DeckId::default();
            self.matching.exit();
            self.spelling.stop();
            self.timers.cancel_all();
        }

        self.delete_mode = false;
        self.deck_to_delete = None;
        Ok(())
    }

    /// Word pairs of a deck: custom decks from the list, units from the provider.
    pub async fn resolve_pairs(&self, deck: &DeckId) -> Result<Vec<WordPair>> {
        match deck {
            DeckId::Custom(id) => self
                .deck(id)
                .map(|d| d.pairs.clone())
                .ok_or_else(|| DeckError::NotFound(id.clone()).into()),
            DeckId::BuiltIn(unit) => Ok(self.provider.fetch(*unit).await?),
        }
    }

    pub fn matching(&self) -> &MatchGame<R> {
        &self.matching
    }

    /// Start a matching game on the selected deck.
    ///
    /// A failed load leaves the game idle and returns the error.
    pub async fn start_match(&mut self) -> Result<()> {
        self.timers.cancel_all();
        self.spelling.stop();
        self.mode = GameMode::Match;

        let deck = self.current_deck.clone();
        self.matching.begin_loading(deck.clone());

        match self.resolve_pairs(&deck).await {
            Ok(pairs) => {
                let scheduled = self.matching.deal(pairs);
                self.schedule_match(scheduled);
                Ok(())
            }
            Err(e) => {
                warn!(deck = %deck, error = %e, "failed to load words");
                self.matching.fail_loading();
                Err(e)
            }
        }
    }

    pub async fn restart_match(&mut self) -> Result<()> {
        self.start_match().await
    }

    pub fn exit_match(&mut self) {
        self.matching.exit();
        self.timers.cancel_all();
    }

    pub fn click_card(&mut self, card_id: &str) -> ClickOutcome {
        let transition = self.matching.click(card_id);
        self.schedule_match(transition.scheduled);
        transition.outcome
    }

    pub fn spelling(&self) -> &SpellingGame<R> {
        &self.spelling
    }

    /// Start a spelling session on the selected deck's words.
    pub async fn start_spelling(&mut self) -> Result<()> {
        let deck = self.current_deck.clone();
        let pairs = match self.resolve_pairs(&deck).await {
            Ok(pairs) => pairs,
            Err(e) => {
                warn!(deck = %deck, error = %e, "failed to load words");
                return Err(e);
            }
        };

        self.matching.exit();
        self.timers.cancel_all();
        self.mode = GameMode::Spell;
        self.spelling.start(pairs);
        Ok(())
    }

    pub fn spell_input(&mut self, ch: char) -> bool {
        self.spelling.input(ch)
    }

    pub fn spell_backspace(&mut self) -> bool {
        self.spelling.backspace()
    }

    pub fn spell_focus(&mut self, index: usize) -> bool {
        self.spelling.focus(index)
    }

    pub fn spell_check(&mut self) -> CheckOutcome {
        let transition = self.spelling.check();
        self.timers
            .schedule_all(transition.scheduled.into_iter().map(|s| s.map(GameEvent::Spell)));
        transition.outcome
    }

    pub fn exit_spelling(&mut self) {
        self.spelling.stop();
        self.timers.cancel_all();
    }

    /// Switch games. Leaving a game tears its session down.
    pub fn set_mode(&mut self, mode: GameMode) {
        if mode == self.mode {
            return;
        }
        match self.mode {
            GameMode::Match => self.exit_match(),
            GameMode::Spell => self.exit_spelling(),
        }
        self.mode = mode;
    }

    /// Timers that have not fired yet.
    pub fn pending_timers(&self) -> usize {
        self.timers.pending()
    }

    /// Wait for the next timer event and apply it.
    ///
    /// Returns `None` when no timer is outstanding.
    pub async fn next_event(&mut self) -> Option<(GameEvent, Delivery)> {
        let (token, event) = self.timers.next().await?;
        let delivery = self.deliver(token, event.clone());
        if delivery == Delivery::Stale {
            debug!(?event, "dropped stale event");
        }
        Some((event, delivery))
    }

    fn deliver(&mut self, token: SessionToken, event: GameEvent) -> Delivery {
        match event {
            GameEvent::Match(event) => {
                let was_won = self.matching.state() == GameState::Won;
                let transition = self.matching.fire(token, event);
                self.schedule_match(transition.scheduled);

                if !was_won && self.matching.state() == GameState::Won {
                    info!(
                        moves = self.matching.moves(),
                        elapsed_secs = self.matching.elapsed_secs(),
                        "matching game won"
                    );
                    self.timers.cancel_all();
                }
                transition.outcome
            }
            GameEvent::Spell(event) => {
                let transition = self.spelling.fire(token, event);
                self.timers
                    .schedule_all(transition.scheduled.into_iter().map(|s| s.map(GameEvent::Spell)));
                transition.outcome
            }
        }
    }

    fn schedule_match(&mut self, scheduled: Vec<Scheduled<MatchEvent>>) {
        self.timers
            .schedule_all(scheduled.into_iter().map(|s| s.map(GameEvent::Match)));
    }
}
