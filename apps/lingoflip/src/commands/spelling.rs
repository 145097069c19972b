//! Spelling game commands.

use crate::controller::Controller;
use crate::db::DeckStore;
use crate::provider::WordPairProvider;
use lingoflip_core::{CheckOutcome, Feedback, LetterSlot, SpellingSummary};
use rand::Rng;

use super::CommandError;

#[derive(Debug, Clone, PartialEq, serde::Serialize)]
pub struct SpellingView {
    pub running: bool,
    /// Chinese prompt of the current word.
    pub prompt: Option<String>,
    pub letters: Vec<LetterSlot>,
    pub active_index: Option<usize>,
    pub feedback: Feedback,
    pub review: bool,
    pub completed: usize,
    pub total: usize,
    pub progress: f64,
    pub summary: Option<SpellingSummary>,
}

pub fn spelling_view<S, P, R>(ctl: &Controller<S, P, R>) -> SpellingView
where
    S: DeckStore,
    P: WordPairProvider,
    R: Rng,
{
    let game = ctl.spelling();
    SpellingView {
        running: game.is_running(),
        prompt: game.current_word().map(|w| w.cn.clone()),
        letters: game.letters().to_vec(),
        active_index: game.active_index(),
        feedback: game.feedback(),
        review: game.is_review(),
        completed: game.completed(),
        total: game.initial_count(),
        progress: game.progress(),
        summary: game.summary(),
    }
}

pub async fn start_spelling<S, P, R>(ctl: &mut Controller<S, P, R>) -> Result<SpellingView, CommandError>
where
    S: DeckStore,
    P: WordPairProvider,
    R: Rng,
{
    ctl.start_spelling().await?;
    Ok(spelling_view(ctl))
}

pub fn type_letter<S, P, R>(ctl: &mut Controller<S, P, R>, ch: char) -> SpellingView
where
    S: DeckStore,
    P: WordPairProvider,
    R: Rng,
{
    ctl.spell_input(ch);
    spelling_view(ctl)
}

pub fn type_backspace<S, P, R>(ctl: &mut Controller<S, P, R>) -> SpellingView
where
    S: DeckStore,
    P: WordPairProvider,
    R: Rng,
{
    ctl.spell_backspace();
    spelling_view(ctl)
}

pub fn focus_slot<S, P, R>(ctl: &mut Controller<S, P, R>, index: usize) -> SpellingView
where
    S: DeckStore,
    P: WordPairProvider,
    R: Rng,
{
    ctl.spell_focus(index);
    spelling_view(ctl)
}

/// Check the current answer. Returns the outcome with the updated view.
pub fn check_spelling<S, P, R>(ctl: &mut Controller<S, P, R>) -> (CheckOutcome, SpellingView)
where
    S: DeckStore,
    P: WordPairProvider,
    R: Rng,
{
    let outcome = ctl.spell_check();
    (outcome, spelling_view(ctl))
}

pub fn exit_spelling<S, P, R>(ctl: &mut Controller<S, P, R>) -> SpellingView
where
    S: DeckStore,
    P: WordPairProvider,
    R: Rng,
{
    ctl.exit_spelling();
    spelling_view(ctl)
}
