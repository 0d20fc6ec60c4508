//! `EventQueue`: the engine's pending-event set.
//!
//! Events are keyed by `(time, seq)` in a `BTreeMap`, where `seq` is a
//! monotonically increasing insertion counter.  Popping the first key yields
//! the earliest event; events at the same time come out in the order they
//! were scheduled.

use std::collections::BTreeMap;

use qn_core::SimTime;
use qn_network::EventOwner;

/// A min-ordered queue of `(time, owner)` pairs plus the simulation clock.
#[derive(Default)]
pub struct EventQueue {
    inner: BTreeMap<(SimTime, u64), EventOwner>,
    next_seq: u64,
    now: SimTime,
}

impl EventQueue {
    pub fn new() -> Self {
        Self::default()
    }

    /// Schedule `owner` at the absolute time `now + delay`.
    ///
    /// Negative delays are clamped to zero so the clock never runs backwards.
    pub fn schedule_in(&mut self, owner: EventOwner, delay: f64) -> SimTime {
        let at = self.now.after(delay.max(0.0));
        self.push(at, owner);
        at
    }

    /// Schedule `owner` at absolute time `at`.
    pub fn push(&mut self, at: SimTime, owner: EventOwner) {
        self.inner.insert((at, self.next_seq), owner);
        self.next_seq += 1;
    }

    /// Time of the earliest pending event.
    pub fn peek_time(&self) -> Option<SimTime> {
        self.inner.keys().next().map(|&(t, _)| t)
    }

    /// Remove the earliest event and advance the clock to its time.
    pub fn pop(&mut self) -> Option<(SimTime, EventOwner)> {
        let ((at, _), owner) = self.inner.pop_first()?;
        self.now = at;
        Some((at, owner))
    }

    /// Current simulated time: the time of the last popped event.
    pub fn now(&self) -> SimTime {
        self.now
    }

    pub fn len(&self) -> usize {
        self.inner.len()
    }

    pub fn is_empty(&self) -> bool {
        self.inner.is_empty()
    }

    /// Drop every pending event and rewind the clock.
    pub fn clear(&mut self) {
        self.inner.clear();
        self.next_seq = 0;
        self.now = SimTime::ZERO;
    }
}
