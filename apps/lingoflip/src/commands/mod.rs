//! Commands exposed to a front end.
//!
//! Each command drives the controller and answers with a serializable view of
//! the state the front end needs to redraw.

pub mod deck;
pub mod game;
pub mod spelling;

pub use deck::{
    confirm_delete, delete_deck, edit_draft, list_decks, new_draft, save_deck, select_deck,
    toggle_delete_mode, DeckList, DeckOption,
};
pub use game::{click_card, exit_match, match_view, restart_match, start_match, CardView, MatchView};
pub use spelling::{
    check_spelling, exit_spelling, focus_slot, spelling_view, start_spelling, type_backspace,
    type_letter, SpellingView,
};

use crate::db::DbError;
use crate::error::AppError;
use crate::provider::ProviderError;
use lingoflip_core::DeckError;

#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct CommandError {
    pub message: String,
}

impl From<AppError> for CommandError {
    fn from(e: AppError) -> Self {
        Self { message: e.to_string() }
    }
}

impl From<DeckError> for CommandError {
    fn from(e: DeckError) -> Self {
        Self { message: e.to_string() }
    }
}

impl From<DbError> for CommandError {
    fn from(e: DbError) -> Self {
        Self { message: e.to_string() }
    }
}

impl From<ProviderError> for CommandError {
    fn from(e: ProviderError) -> Self {
        Self { message: e.to_string() }
    }
}
