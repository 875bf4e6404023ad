//! Deferred actions and the clock that drives them.
//!
//! The controller never sleeps. It queues actions with a fire time and the
//! host calls back once [`TimerQueue::next_deadline`] has passed. Superseding
//! an action means cancelling its id; cancelled entries are dropped the next
//! time the queue is drained.

use std::cell::Cell;
use std::collections::VecDeque;
use std::rc::Rc;

/// Source of the current time in milliseconds.
pub trait Clock {
    fn now_ms(&self) -> f64;
}

/// Clock that only moves when told to. Clones share the same time.
#[derive(Debug, Clone, Default)]
pub struct ManualClock {
    now: Rc<Cell<f64>>,
}

impl ManualClock {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn advance(&self, ms: f64) {
        self.now.set(self.now.get() + ms);
    }

    pub fn set(&self, ms: f64) {
        self.now.set(ms);
    }
}

impl Clock for ManualClock {
    fn now_ms(&self) -> f64 {
        self.now.get()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TimerId(u64);

/// A queued action.
#[derive(Debug)]
pub struct PendingTimer<A> {
    pub id: TimerId,
    /// When this timer should fire.
    pub fire_at: f64,
    pub action: A,
    /// Whether this timer has been cancelled.
    pub cancelled: bool,
}

/// Ordered queue of deferred actions.
#[derive(Debug)]
pub struct TimerQueue<A> {
    timers: VecDeque<PendingTimer<A>>,
    next_id: u64,
}

impl<A> Default for TimerQueue<A> {
    fn default() -> Self {
        Self { timers: VecDeque::new(), next_id: 1 }
    }
}

impl<A> TimerQueue<A> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue `action` to fire `delay_ms` after `now`.
    pub fn schedule(&mut self, now: f64, delay_ms: u64, action: A) -> TimerId {
        let id = TimerId(self.next_id);
        self.next_id += 1;
        self.timers.push_back(PendingTimer {
            id,
            fire_at: now + delay_ms as f64,
            action,
            cancelled: false,
        });
        id
    }

    /// Cancel a timer by id. Returns false if it already fired or was cancelled.
    pub fn cancel(&mut self, id: TimerId) -> bool {
        match self.timers.iter_mut().find(|t| t.id == id && !t.cancelled) {
            Some(timer) => {
                timer.cancelled = true;
                true
            }
            None => false,
        }
    }

    /// Remove and return every action due at `now`, earliest first.
    /// Timers with equal fire times keep scheduling order.
    pub fn take_due(&mut self, now: f64) -> Vec<A> {
        let mut due = Vec::new();
        let mut i = 0;
        while i < self.timers.len() {
            if self.timers[i].cancelled {
                self.timers.remove(i);
                continue;
            }
            if self.timers[i].fire_at <= now {
                if let Some(timer) = self.timers.remove(i) {
                    due.push(timer);
                }
                continue;
            }
            i += 1;
        }
        due.sort_by(|a, b| a.fire_at.total_cmp(&b.fire_at).then(a.id.0.cmp(&b.id.0)));
        due.into_iter().map(|t| t.action).collect()
    }

    /// Earliest fire time among live timers.
    pub fn next_deadline(&self) -> Option<f64> {
        self.timers
            .iter()
            .filter(|t| !t.cancelled)
            .map(|t| t.fire_at)
            .min_by(f64::total_cmp)
    }

    /// Number of live (not cancelled) timers.
    pub fn pending(&self) -> usize {
        self.timers.iter().filter(|t| !t.cancelled).count()
    }
}
