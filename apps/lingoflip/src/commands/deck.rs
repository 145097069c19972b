//! Deck menu and deck builder commands.

use crate::controller::Controller;
use crate::db::DeckStore;
use crate::provider::WordPairProvider;
use lingoflip_core::{DeckDraft, GameLevel, GameState};
use rand::Rng;

use super::CommandError;

/// One entry of the deck menu.
#[derive(Debug, Clone, PartialEq, serde::Serialize)]
pub struct DeckOption {
    pub id: String,
    pub name: String,
    pub custom: bool,
    /// Pair count, known only for custom decks.
    pub pairs: Option<usize>,
}

/// The deck menu and its controls.
#[derive(Debug, Clone, PartialEq, serde::Serialize)]
pub struct DeckList {
    pub units: Vec<DeckOption>,
    pub custom: Vec<DeckOption>,
    pub current: String,
    pub delete_mode: bool,
    pub deck_to_delete: Option<String>,
    /// The selected deck can be opened in the builder.
    pub can_edit: bool,
    /// A matching game can be started.
    pub can_start: bool,
}

pub fn list_decks<S, P, R>(ctl: &Controller<S, P, R>) -> DeckList
where
    S: DeckStore,
    P: WordPairProvider,
    R: Rng,
{
    let units = GameLevel::ALL
        .into_iter()
        .map(|unit| DeckOption {
            id: unit.label().to_string(),
            name: unit.label().to_string(),
            custom: false,
            pairs: None,
        })
        .collect();

    let custom = ctl
        .decks()
        .iter()
        .map(|deck| DeckOption {
            id: deck.id.clone(),
            name: deck.name.clone(),
            custom: true,
            pairs: Some(deck.pairs.len()),
        })
        .collect();

    let playing = ctl.matching().state() == GameState::Playing;

    DeckList {
        units,
        custom,
        current: ctl.current_deck().to_string(),
        delete_mode: ctl.is_delete_mode(),
        deck_to_delete: ctl.deck_to_delete().map(str::to_string),
        can_edit: ctl.deck_to_edit().is_some() && !playing && !ctl.is_delete_mode(),
        can_start: !playing && !ctl.is_delete_mode(),
    }
}

pub fn select_deck<S, P, R>(ctl: &mut Controller<S, P, R>, id: &str) -> Result<DeckList, CommandError>
where
    S: DeckStore,
    P: WordPairProvider,
    R: Rng,
{
    ctl.select_deck(id)?;
    Ok(list_decks(ctl))
}

pub fn toggle_delete_mode<S, P, R>(ctl: &mut Controller<S, P, R>) -> DeckList
where
    S: DeckStore,
    P: WordPairProvider,
    R: Rng,
{
    ctl.toggle_delete_mode();
    list_decks(ctl)
}

pub fn confirm_delete<S, P, R>(ctl: &mut Controller<S, P, R>) -> Result<DeckList, CommandError>
where
    S: DeckStore,
    P: WordPairProvider,
    R: Rng,
{
    ctl.confirm_delete()?;
    Ok(list_decks(ctl))
}

pub fn delete_deck<S, P, R>(ctl: &mut Controller<S, P, R>, id: &str) -> Result<DeckList, CommandError>
where
    S: DeckStore,
    P: WordPairProvider,
    R: Rng,
{
    ctl.delete_deck(id)?;
    Ok(list_decks(ctl))
}

/// Empty builder form.
pub fn new_draft() -> DeckDraft {
    DeckDraft::default()
}

/// Builder form for the selected deck.
pub fn edit_draft<S, P, R>(ctl: &Controller<S, P, R>) -> Option<DeckDraft>
where
    S: DeckStore,
    P: WordPairProvider,
    R: Rng,
{
    ctl.draft_for_edit()
}

/// Save the builder form. `existing_id` is set when editing.
pub fn save_deck<S, P, R>(
    ctl: &mut Controller<S, P, R>,
    draft: &DeckDraft,
    existing_id: Option<&str>,
) -> Result<DeckList, CommandError>
where
    S: DeckStore,
    P: WordPairProvider,
    R: Rng,
{
    ctl.save_deck(draft, existing_id)?;
    Ok(list_decks(ctl))
}
