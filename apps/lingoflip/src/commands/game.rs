//! Matching game commands.

use crate::controller::Controller;
use crate::db::DeckStore;
use crate::provider::WordPairProvider;
use lingoflip_core::{GameState, MatchSummary, Side};
use rand::Rng;

use super::CommandError;

#[derive(Debug, Clone, PartialEq, serde::Serialize)]
pub struct CardView {
    pub id: String,
    pub content: String,
    pub side: Side,
    pub is_face_up: bool,
    pub is_matched: bool,
    pub is_selected: bool,
}

/// Everything the board and header show.
#[derive(Debug, Clone, PartialEq, serde::Serialize)]
pub struct MatchView {
    pub state: GameState,
    pub deck: Option<String>,
    pub cards: Vec<CardView>,
    pub moves: u32,
    pub elapsed_secs: u64,
    pub batch: usize,
    pub pending_pairs: usize,
    /// Result screen, once won.
    pub summary: Option<MatchSummary>,
}

pub fn match_view<S, P, R>(ctl: &Controller<S, P, R>) -> MatchView
where
    S: DeckStore,
    P: WordPairProvider,
    R: Rng,
{
    let game = ctl.matching();
    MatchView {
        state: game.state(),
        deck: game.deck_id().map(ToString::to_string),
        cards: game
            .cards()
            .iter()
            .map(|card| CardView {
                id: card.id.clone(),
                content: card.content.clone(),
                side: card.side,
                is_face_up: card.is_face_up,
                is_matched: card.is_matched,
                is_selected: game.is_selected(&card.id),
            })
            .collect(),
        moves: game.moves(),
        elapsed_secs: game.elapsed_secs(),
        batch: game.batch_number(),
        pending_pairs: game.pending_pairs(),
        summary: game.summary(),
    }
}

pub async fn start_match<S, P, R>(ctl: &mut Controller<S, P, R>) -> Result<MatchView, CommandError>
where
    S: DeckStore,
    P: WordPairProvider,
    R: Rng,
{
    ctl.start_match().await?;
    Ok(match_view(ctl))
}

pub async fn restart_match<S, P, R>(ctl: &mut Controller<S, P, R>) -> Result<MatchView, CommandError>
where
    S: DeckStore,
    P: WordPairProvider,
    R: Rng,
{
    ctl.restart_match().await?;
    Ok(match_view(ctl))
}

pub fn click_card<S, P, R>(ctl: &mut Controller<S, P, R>, card_id: &str) -> MatchView
where
    S: DeckStore,
    P: WordPairProvider,
    R: Rng,
{
    ctl.click_card(card_id);
    match_view(ctl)
}

pub fn exit_match<S, P, R>(ctl: &mut Controller<S, P, R>) -> MatchView
where
    S: DeckStore,
    P: WordPairProvider,
    R: Rng,
{
    ctl.exit_match();
    match_view(ctl)
}
