//! Spelling game engine.
//!
//! Words are asked in queue order. Some letters of the English word are hidden
//! and the player fills them in one character at a time. A word answered
//! wrongly is remembered as mistaken and asked again at the end of the queue.
//! Those review copies do not count towards completion: the session is done
//! once every word of the original list has been spelled and the queue is
//! empty.

use crate::answer::compare_answers;
use crate::random::chance;
use crate::schedule::{Delivery, Scheduled, SessionToken, Transition};
use crate::types::{SpellingSettings, WordPair};
use rand::rngs::StdRng;
use rand::Rng;
use serde::Serialize;
use std::collections::VecDeque;
use tracing::{debug, info};

/// One character position of the current word.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LetterSlot {
    pub ch: char,
    pub hidden: bool,
    pub input: Option<char>,
}

/// Feedback shown for the current word.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Feedback {
    Idle,
    Correct,
    Wrong,
}

/// Delayed transitions of the spelling game.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SpellEvent {
    /// Move past a correctly answered word.
    Advance,
}

/// Result of checking the current answer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CheckOutcome {
    Ignored,
    /// `score` is the completed count once this answer is counted.
    Correct { score: usize },
    /// `first_miss` is false when this occurrence was already missed.
    Wrong { first_miss: bool },
}

/// End-of-session report.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SpellingSummary {
    pub mistaken: Vec<WordPair>,
    pub flawless: bool,
    pub completed: usize,
    pub total: usize,
}

pub type SpellTransition = Transition<CheckOutcome, SpellEvent>;

#[derive(Debug, Clone)]
struct QueuedWord {
    pair: WordPair,
    /// Re-asked after a miss.
    review: bool,
}

/// Spelling game session.
pub struct SpellingGame<R = StdRng> {
    settings: SpellingSettings,
    rng: R,
    token: SessionToken,
    running: bool,
    queue: VecDeque<QueuedWord>,
    mistaken: Vec<WordPair>,
    letters: Vec<LetterSlot>,
    active: Option<usize>,
    feedback: Feedback,
    missed_current: bool,
    initial_count: usize,
    completed: usize,
}

impl<R: Rng> SpellingGame<R> {
    pub fn new(settings: SpellingSettings, rng: R) -> Self {
        Self {
            settings,
            rng,
            token: SessionToken::default(),
            running: false,
            queue: VecDeque::new(),
            mistaken: Vec::new(),
            letters: Vec::new(),
            active: None,
            feedback: Feedback::Idle,
            missed_current: false,
            initial_count: 0,
            completed: 0,
        }
    }

    /// Begin a session over `words`, replacing any previous one.
    pub fn start(&mut self, words: Vec<WordPair>) {
        self.token = self.token.next();
        self.running = true;
        self.initial_count = words.len();
        self.queue = words
            .into_iter()
            .map(|pair| QueuedWord { pair, review: false })
            .collect();
        self.completed = 0;
        self.mistaken.clear();
        info!(words = self.initial_count, "spelling game started");
        self.setup_current();
    }

    /// Tear the session down. Pending events become stale.
    pub fn stop(&mut self) {
        self.token = self.token.next();
        self.running = false;
        self.queue.clear();
        self.mistaken.clear();
        self.letters.clear();
        self.active = None;
        self.feedback = Feedback::Idle;
        self.missed_current = false;
        self.initial_count = 0;
        self.completed = 0;
    }

    pub fn is_running(&self) -> bool {
        self.running
    }

    pub fn token(&self) -> SessionToken {
        self.token
    }

    pub fn current_word(&self) -> Option<&WordPair> {
        self.queue.front().map(|w| &w.pair)
    }

    /// The current word is a review copy of an earlier miss.
    pub fn is_review(&self) -> bool {
        self.queue.front().map_or(false, |w| w.review)
    }

    pub fn letters(&self) -> &[LetterSlot] {
        &self.letters
    }

    pub fn active_index(&self) -> Option<usize> {
        self.active
    }

    pub fn feedback(&self) -> Feedback {
        self.feedback
    }

    pub fn queue_len(&self) -> usize {
        self.queue.len()
    }

    pub fn queue(&self) -> impl Iterator<Item = &WordPair> {
        self.queue.iter().map(|w| &w.pair)
    }

    pub fn mistaken(&self) -> &[WordPair] {
        &self.mistaken
    }

    pub fn completed(&self) -> usize {
        self.completed
    }

    pub fn initial_count(&self) -> usize {
        self.initial_count
    }

    /// Share of the initial words answered correctly, in `[0, 1]`.
    pub fn progress(&self) -> f64 {
        if self.initial_count == 0 {
            return 1.0;
        }
        (self.completed as f64 / self.initial_count as f64).min(1.0)
    }

    pub fn is_finished(&self) -> bool {
        self.running && self.queue.is_empty() && self.completed >= self.initial_count
    }

    pub fn summary(&self) -> Option<SpellingSummary> {
        self.is_finished().then(|| SpellingSummary {
            mistaken: self.mistaken.clone(),
            flawless: self.mistaken.is_empty(),
            completed: self.completed,
            total: self.initial_count,
        })
    }

    /// The word as currently filled in; empty hidden slots contribute nothing.
    pub fn attempt(&self) -> String {
        self.letters
            .iter()
            .filter_map(|l| if l.hidden { l.input } else { Some(l.ch) })
            .collect()
    }

    /// Type a character into the active slot.
    pub fn input(&mut self, ch: char) -> bool {
        let Some(index) = self.accepting_index() else {
            return false;
        };
        self.letters[index].input = Some(ch);
        if let Some(next) = self.next_hidden_after(index) {
            self.active = Some(next);
        }
        true
    }

    /// Clear the active slot, or step back to the previous slot if it is
    /// already empty.
    pub fn backspace(&mut self) -> bool {
        let Some(index) = self.accepting_index() else {
            return false;
        };
        if self.letters[index].input.is_some() {
            self.letters[index].input = None;
            return true;
        }
        match self.previous_hidden_before(index) {
            Some(prev) => {
                self.active = Some(prev);
                self.letters[prev].input = None;
                true
            }
            None => false,
        }
    }

    /// Make a hidden slot the active one.
    pub fn focus(&mut self, index: usize) -> bool {
        if self.feedback == Feedback::Correct {
            return false;
        }
        match self.letters.get(index) {
            Some(slot) if slot.hidden => {
                self.active = Some(index);
                true
            }
            _ => false,
        }
    }

    /// Check the filled-in word against the current target.
    pub fn check(&mut self) -> SpellTransition {
        if self.feedback == Feedback::Correct {
            return Transition::new(CheckOutcome::Ignored);
        }
        let Some(QueuedWord { pair: current, review }) = self.queue.front().cloned() else {
            return Transition::new(CheckOutcome::Ignored);
        };

        let result = compare_answers(&self.attempt(), &current.en, self.settings.matching_mode);
        if result.is_correct {
            self.feedback = Feedback::Correct;
            let score = if review { self.completed } else { self.completed + 1 };
            debug!(word = %current.en, score, "spelled correctly");
            return Transition::new(CheckOutcome::Correct { score }).with(Scheduled::after(
                self.token,
                self.settings.advance_delay(),
                SpellEvent::Advance,
            ));
        }

        self.feedback = Feedback::Wrong;
        let first_miss = !self.missed_current;
        if first_miss {
            self.missed_current = true;
            if !self.mistaken.iter().any(|w| w.en == current.en) {
                self.mistaken.push(current.clone());
            }
            debug!(word = %current.en, typed = %result.typed, "misspelled, requeued");
            self.queue.push_back(QueuedWord {
                pair: current,
                review: true,
            });
        }
        self.active = self.first_hidden();

        Transition::new(CheckOutcome::Wrong { first_miss })
    }

    /// Deliver a previously scheduled event.
    pub fn fire(&mut self, token: SessionToken, event: SpellEvent) -> Transition<Delivery, SpellEvent> {
        if token != self.token {
            return Transition::new(Delivery::Stale);
        }
        match event {
            SpellEvent::Advance => {
                if self.feedback != Feedback::Correct {
                    return Transition::new(Delivery::Ignored);
                }
                if let Some(done) = self.queue.pop_front() {
                    if !done.review {
                        self.completed += 1;
                    }
                }
                self.setup_current();
                if self.is_finished() {
                    info!(
                        completed = self.completed,
                        mistaken = self.mistaken.len(),
                        "spelling game finished"
                    );
                }
                Transition::new(Delivery::Applied)
            }
        }
    }

    fn setup_current(&mut self) {
        self.feedback = Feedback::Idle;
        self.missed_current = false;

        let Some(word) = self.queue.front() else {
            self.letters.clear();
            self.active = None;
            return;
        };

        let hide = chance(self.settings.hide_probability);
        let mut letters: Vec<LetterSlot> = word
            .pair
            .en
            .chars()
            .map(|ch| {
                let hidden = ch.is_ascii_alphabetic() && self.rng.gen_bool(hide);
                LetterSlot {
                    ch,
                    hidden,
                    input: None,
                }
            })
            .collect();

        if !letters.iter().any(|l| l.hidden) {
            if let Some(last) = letters.iter_mut().rev().find(|l| l.ch.is_ascii_alphabetic()) {
                last.hidden = true;
            }
        }

        self.letters = letters;
        self.active = self.first_hidden();
    }

    fn accepting_index(&mut self) -> Option<usize> {
        if self.feedback == Feedback::Correct {
            return None;
        }
        let index = self.active?;
        if self.feedback == Feedback::Wrong {
            self.feedback = Feedback::Idle;
        }
        Some(index)
    }

    fn first_hidden(&self) -> Option<usize> {
        self.letters.iter().position(|l| l.hidden)
    }

    fn next_hidden_after(&self, index: usize) -> Option<usize> {
        (index + 1..self.letters.len()).find(|&i| self.letters[i].hidden)
    }

    fn previous_hidden_before(&self, index: usize) -> Option<usize> {
        (0..index).rev().find(|&i| self.letters[i].hidden)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::random::{seeded, SeededRng};
    use pretty_assertions::assert_eq;
    use std::time::Duration;

    /// Every letter hidden.
    fn game(words: &[(&str, &str)]) -> SpellingGame<SeededRng> {
        game_with(words, 1.0)
    }

    fn game_with(words: &[(&str, &str)], hide_probability: f64) -> SpellingGame<SeededRng> {
        let settings = SpellingSettings {
            hide_probability,
            ..SpellingSettings::default()
        };
        let mut g = SpellingGame::new(settings, seeded(1));
        g.start(words.iter().map(|(en, cn)| WordPair::new(*en, *cn)).collect());
        g
    }

    fn type_word(g: &mut SpellingGame<SeededRng>, text: &str) {
        for ch in text.chars() {
            g.input(ch);
        }
    }

    /// Fill every hidden slot from `text`, which spells the whole word.
    fn fill(g: &mut SpellingGame<SeededRng>, text: &str) {
        let hidden: Vec<usize> = g
            .letters()
            .iter()
            .enumerate()
            .filter(|(_, l)| l.hidden)
            .map(|(i, _)| i)
            .collect();
        let chars: Vec<char> = text.chars().collect();
        for i in hidden {
            g.focus(i);
            g.input(chars[i]);
        }
    }

    fn answer(g: &mut SpellingGame<SeededRng>, text: &str) -> CheckOutcome {
        fill(g, text);
        let t = g.check();
        for s in t.scheduled {
            g.fire(s.token, s.event);
        }
        t.outcome
    }

    #[test]
    fn case_insensitive_answer_is_accepted() {
        let mut g = game(&[("Apple", "苹果")]);
        assert!(g.letters().iter().all(|l| l.hidden));

        type_word(&mut g, "aPPle");
        assert_eq!(g.attempt(), "aPPle");

        let t = g.check();
        assert_eq!(t.outcome, CheckOutcome::Correct { score: 1 });
        assert_eq!(g.feedback(), Feedback::Correct);
        assert_eq!(t.scheduled.len(), 1);
        assert_eq!(
            t.scheduled[0],
            Scheduled::after(g.token(), Duration::from_millis(1000), SpellEvent::Advance)
        );
        assert_eq!(g.completed(), 0);

        g.fire(t.scheduled[0].token, SpellEvent::Advance);
        assert_eq!(g.completed(), 1);
        assert!(g.is_finished());
    }

    #[test]
    fn only_letters_are_masked() {
        let g = game(&[("ice-cream", "冰淇淋")]);

        let hidden: Vec<bool> = g.letters().iter().map(|l| l.hidden).collect();
        assert_eq!(
            hidden,
            vec![true, true, true, false, true, true, true, true, true]
        );
        assert_eq!(g.active_index(), Some(0));
    }

    #[test]
    fn at_least_one_letter_is_hidden() {
        let g = game_with(&[("cat!", "猫")], 0.0);

        let hidden: Vec<bool> = g.letters().iter().map(|l| l.hidden).collect();
        assert_eq!(hidden, vec![false, false, true, false]);
        assert_eq!(g.active_index(), Some(2));
    }

    #[test]
    fn hide_probability_out_of_range_is_clamped() {
        let g = game_with(&[("dog", "狗")], 4.0);
        assert!(g.letters().iter().all(|l| l.hidden));

        let g = game_with(&[("dog", "狗")], f64::NAN);
        let hidden: Vec<bool> = g.letters().iter().map(|l| l.hidden).collect();
        assert_eq!(hidden, vec![false, false, true]);
    }

    #[test]
    fn default_masking_hides_some_letters_of_every_word() {
        let words: Vec<WordPair> = (0..50)
            .map(|i| WordPair::new(format!("word{}", i), "词"))
            .collect();
        let mut g = SpellingGame::new(SpellingSettings::default(), seeded(9));
        g.start(words);

        let mut hidden_total = 0;
        while let Some(word) = g.current_word().cloned() {
            let letters = g.letters().to_vec();
            assert!(letters.iter().any(|l| l.hidden));
            assert!(letters.iter().all(|l| !l.hidden || l.ch.is_ascii_alphabetic()));
            hidden_total += letters.iter().filter(|l| l.hidden).count();
            answer(&mut g, &word.en);
        }
        // 200 letters at 60%
        assert!((80..=160).contains(&hidden_total), "hid {}", hidden_total);
    }

    #[test]
    fn word_without_letters_has_no_active_slot() {
        let g = game(&[("123", "一二三")]);
        assert!(g.letters().iter().all(|l| !l.hidden));
        assert_eq!(g.active_index(), None);
    }

    #[test]
    fn input_advances_to_next_hidden_slot() {
        let mut g = game(&[("x-ray", "X光")]);
        assert_eq!(g.active_index(), Some(0));

        assert!(g.input('x'));
        assert_eq!(g.active_index(), Some(2));
        for ch in "raz".chars() {
            assert!(g.input(ch));
        }
        assert_eq!(g.active_index(), Some(4));
        assert_eq!(g.attempt(), "x-raz");
    }

    #[test]
    fn backspace_clears_then_steps_back() {
        let mut g = game(&[("x-ray", "X光")]);
        type_word(&mut g, "xr");
        assert_eq!(g.active_index(), Some(3));

        assert!(g.backspace());
        assert_eq!(g.active_index(), Some(2));
        assert_eq!(g.letters()[2].input, None);
        assert_eq!(g.letters()[0].input, Some('x'));

        assert!(g.backspace());
        assert_eq!(g.active_index(), Some(0));
        assert_eq!(g.letters()[0].input, None);

        assert!(!g.backspace());
        assert_eq!(g.active_index(), Some(0));
    }

    #[test]
    fn repeated_miss_on_one_occurrence_requeues_once() {
        let mut g = game(&[("cat", "猫"), ("dog", "狗")]);

        assert_eq!(answer(&mut g, "cot"), CheckOutcome::Wrong { first_miss: true });
        assert_eq!(g.feedback(), Feedback::Wrong);
        assert_eq!(g.active_index(), Some(0));
        assert_eq!(g.queue_len(), 3);

        assert_eq!(answer(&mut g, "cut"), CheckOutcome::Wrong { first_miss: false });
        assert_eq!(g.queue_len(), 3);
        assert_eq!(g.mistaken(), &[WordPair::new("cat", "猫")]);

        let order: Vec<&str> = g.queue().map(|w| w.en.as_str()).collect();
        assert_eq!(order, vec!["cat", "dog", "cat"]);
    }

    #[test]
    fn mistaken_words_are_unique_by_english() {
        let mut g = game(&[("cat", "猫"), ("cat", "小猫")]);

        assert_eq!(answer(&mut g, "cot"), CheckOutcome::Wrong { first_miss: true });
        answer(&mut g, "cat");
        assert_eq!(g.current_word(), Some(&WordPair::new("cat", "小猫")));

        assert_eq!(answer(&mut g, "kat"), CheckOutcome::Wrong { first_miss: true });
        assert_eq!(g.queue_len(), 3);
        assert_eq!(g.mistaken(), &[WordPair::new("cat", "猫")]);
    }

    #[test]
    fn each_missed_occurrence_requeues_again() {
        let mut g = game(&[("cat", "猫")]);

        answer(&mut g, "cot");
        answer(&mut g, "cat");
        assert_eq!(g.current_word(), Some(&WordPair::new("cat", "猫")));
        assert_eq!(g.queue_len(), 1);

        assert_eq!(answer(&mut g, "kat"), CheckOutcome::Wrong { first_miss: true });
        assert_eq!(g.queue_len(), 2);
        assert_eq!(g.mistaken().len(), 1);
    }

    #[test]
    fn cat_and_dog_scenario() {
        let mut g = game(&[("cat", "猫"), ("dog", "狗")]);

        assert_eq!(answer(&mut g, "cot"), CheckOutcome::Wrong { first_miss: true });
        assert_eq!(answer(&mut g, "cat"), CheckOutcome::Correct { score: 1 });
        assert_eq!(answer(&mut g, "dog"), CheckOutcome::Correct { score: 2 });
        assert!(!g.is_finished());

        assert!(g.is_review());
        assert_eq!(answer(&mut g, "cat"), CheckOutcome::Correct { score: 2 });

        let summary = g.summary().unwrap();
        assert_eq!(summary.mistaken, vec![WordPair::new("cat", "猫")]);
        assert!(!summary.flawless);
        assert_eq!(summary.completed, 2);
        assert_eq!(summary.total, 2);
        assert_eq!(g.progress(), 1.0);
    }

    #[test]
    fn flawless_run() {
        let mut g = game(&[("cat", "猫"), ("dog", "狗")]);
        answer(&mut g, "cat");
        answer(&mut g, "dog");

        let summary = g.summary().unwrap();
        assert!(summary.flawless);
        assert_eq!(summary.completed, 2);
        assert_eq!(g.progress(), 1.0);
    }

    #[test]
    fn input_is_locked_after_correct_answer() {
        let mut g = game(&[("cat", "猫"), ("dog", "狗")]);
        fill(&mut g, "cat");
        let t = g.check();
        assert!(matches!(t.outcome, CheckOutcome::Correct { .. }));

        assert!(!g.input('z'));
        assert!(!g.backspace());
        assert_eq!(g.check().outcome, CheckOutcome::Ignored);
    }

    #[test]
    fn typing_clears_wrong_feedback() {
        let mut g = game(&[("cat", "猫")]);
        answer(&mut g, "cot");
        assert_eq!(g.feedback(), Feedback::Wrong);
        g.input('c');
        assert_eq!(g.feedback(), Feedback::Idle);
    }

    #[test]
    fn stale_advance_is_ignored_after_restart() {
        let mut g = game(&[("cat", "猫")]);
        fill(&mut g, "cat");
        let t = g.check();

        g.start(vec![WordPair::new("dog", "狗")]);
        let s = &t.scheduled[0];
        assert_eq!(g.fire(s.token, s.event).outcome, Delivery::Stale);
        assert_eq!(g.completed(), 0);
        assert_eq!(g.current_word(), Some(&WordPair::new("dog", "狗")));
    }

    #[test]
    fn empty_word_list_finishes_flawless() {
        let g = game(&[]);
        let summary = g.summary().unwrap();
        assert!(summary.flawless);
        assert_eq!(summary.total, 0);
    }

    #[test]
    fn stopped_game_is_not_finished() {
        let mut g = game(&[("cat", "猫")]);
        g.stop();
        assert!(!g.is_running());
        assert!(g.summary().is_none());
    }
}
