//! Delayed transitions requested by the game engines.
//!
//! Engines never wait. When a transition has to happen later they return a
//! [`Scheduled`] request and the host delivers the event back through the
//! engine's `fire` method once the delay has elapsed. Each request carries the
//! [`SessionToken`] that was current when it was issued; resetting a session
//! advances the token, so anything still in flight is rejected on delivery.

use std::time::Duration;

/// Epoch of a game session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, PartialOrd, Ord)]
pub struct SessionToken(u64);

impl SessionToken {
    /// The token that supersedes this one.
    pub fn next(self) -> Self {
        Self(self.0.wrapping_add(1))
    }

    pub fn value(self) -> u64 {
        self.0
    }
}

/// When a scheduled event fires.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Timing {
    /// Once, after the delay.
    After(Duration),
    /// Repeatedly, every period, until the session is torn down.
    Every(Duration),
}

/// A request to deliver `event` back to the engine later.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Scheduled<E> {
    pub token: SessionToken,
    pub timing: Timing,
    pub event: E,
}

impl<E> Scheduled<E> {
    pub fn after(token: SessionToken, delay: Duration, event: E) -> Self {
        Self {
            token,
            timing: Timing::After(delay),
            event,
        }
    }

    pub fn every(token: SessionToken, period: Duration, event: E) -> Self {
        Self {
            token,
            timing: Timing::Every(period),
            event,
        }
    }

    /// Convert the event into a wider event type.
    pub fn map<F, T>(self, f: F) -> Scheduled<T>
    where
        F: FnOnce(E) -> T,
    {
        Scheduled {
            token: self.token,
            timing: self.timing,
            event: f(self.event),
        }
    }
}

/// What became of an event handed back to an engine.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Delivery {
    /// The event changed the session.
    Applied,
    /// The event belongs to the current session but no longer applies.
    Ignored,
    /// The event was issued by a session that has since been reset.
    Stale,
}

/// Outcome of an engine operation plus any follow-up it scheduled.
#[derive(Debug, Clone, PartialEq)]
pub struct Transition<O, E> {
    pub outcome: O,
    pub scheduled: Vec<Scheduled<E>>,
}

impl<O, E> Transition<O, E> {
    pub fn new(outcome: O) -> Self {
        Self {
            outcome,
            scheduled: Vec::new(),
        }
    }

    pub fn with(mut self, scheduled: Scheduled<E>) -> Self {
        self.scheduled.push(scheduled);
        self
    }
}
