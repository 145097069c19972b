//! Timer queue that turns scheduled engine events into delivered ones.
//!
//! Every request gets its own tokio task. Tasks hand their events to an
//! unbounded channel, which the owner drains with [`TimerQueue::next`].
//! Cancelling aborts every task and discards anything already delivered but
//! not yet taken.

use lingoflip_core::schedule::{Scheduled, SessionToken, Timing};
use tokio::sync::mpsc::{self, UnboundedReceiver, UnboundedSender};
use tokio::task::JoinHandle;
use tokio::time::{interval_at, sleep, Instant, MissedTickBehavior};
use tracing::debug;

pub struct TimerQueue<E> {
    tx: UnboundedSender<(SessionToken, E)>,
    rx: UnboundedReceiver<(SessionToken, E)>,
    tasks: Vec<JoinHandle<()>>,
}

impl<E: Clone + Send + 'static> TimerQueue<E> {
    pub fn new() -> Self {
        let (tx, rx) = mpsc::unbounded_channel();
        Self {
            tx,
            rx,
            tasks: Vec::new(),
        }
    }

    /// Start the timer for one request. Must be called inside a tokio runtime.
    pub fn schedule(&mut self, scheduled: Scheduled<E>) {
        let tx = self.tx.clone();
        let Scheduled {
            token,
            timing,
            event,
        } = scheduled;

        let handle = match timing {
            Timing::After(delay) => tokio::spawn(async move {
                sleep(delay).await;
                let _ = tx.send((token, event));
            }),
            Timing::Every(period) => tokio::spawn(async move {
                let mut ticks = interval_at(Instant::now() + period, period);
                ticks.set_missed_tick_behavior(MissedTickBehavior::Delay);
                loop {
                    ticks.tick().await;
                    if tx.send((token, event.clone())).is_err() {
                        break;
                    }
                }
            }),
        };

        self.tasks.retain(|t| !t.is_finished());
        self.tasks.push(handle);
    }

    pub fn schedule_all(&mut self, scheduled: impl IntoIterator<Item = Scheduled<E>>) {
        for s in scheduled {
            self.schedule(s);
        }
    }

    /// Abort every outstanding timer and drop undelivered events.
    pub fn cancel_all(&mut self) {
        if !self.tasks.is_empty() {
            debug!(tasks = self.tasks.len(), "cancelling timers");
        }
        for task in self.tasks.drain(..) {
            task.abort();
        }
        while self.rx.try_recv().is_ok() {}
    }

    /// Timers still waiting to fire (periodic timers always count).
    pub fn pending(&self) -> usize {
        self.tasks.iter().filter(|t| !t.is_finished()).count()
    }

    pub fn is_idle(&self) -> bool {
        self.pending() == 0 && self.rx.is_empty()
    }

    /// Wait for the next event. Returns `None` once nothing can fire anymore.
    pub async fn next(&mut self) -> Option<(SessionToken, E)> {
        if let Ok(item) = self.rx.try_recv() {
            return Some(item);
        }
        self.tasks.retain(|t| !t.is_finished());
        if self.tasks.is_empty() {
            // a task may have sent just before finishing
            return self.rx.try_recv().ok();
        }
        self.rx.recv().await
    }
}

impl<E: Clone + Send + 'static> Default for TimerQueue<E> {
    fn default() -> Self {
        Self::new()
    }
}

impl<E> Drop for TimerQueue<E> {
    fn drop(&mut self) {
        for task in &self.tasks {
            task.abort();
        }
    }
}
