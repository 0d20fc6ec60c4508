//! The event-source capability handed to stations and generators.

use std::fmt;

use qn_core::{SimTime, SourceId, StationId};

use crate::TraceEvent;

/// The component a pending event belongs to.
///
/// Derives `Ord` only so it can sit inside ordered collections; the engine
/// never orders events by owner (ties in time fall back to insertion order).
#[derive(Copy, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum EventOwner {
    /// An arrival generator's next arrival.
    Source(SourceId),
    /// A service completion at an active station.
    Station(StationId),
}

impl fmt::Display for EventOwner {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EventOwner::Source(id)  => write!(f, "{id}"),
            EventOwner::Station(id) => write!(f, "{id}"),
        }
    }
}

/// What a station or generator may ask of the engine while it runs.
///
/// The one essential method is [`schedule`][Self::schedule]: report that
/// `owner` needs to run again `delay` time units from now.  `now` is
/// read-only context, and [`trace`][Self::trace] forwards advisory records
/// to whoever observes the run (default: discarded).
pub trait Scheduler {
    /// Current simulated time.
    fn now(&self) -> SimTime;

    /// Register a pending event `delay` (≥ 0) time units after [`now`][Self::now].
    fn schedule(&mut self, owner: EventOwner, delay: f64);

    /// Receive an advisory trace record.
    fn trace(&mut self, _event: TraceEvent) {}
}
