//! The `Job` work token.

use crate::{JobId, SimTime, SourceId};

/// A unit of work traversing the queueing network.
///
/// Jobs are moved by value from generator to station to station; no
/// component ever holds a second reference, so a job is always in exactly
/// one backlog, one server, or absorbed by a sink.  Jobs cannot be cloned.
#[derive(Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Job {
    pub id:           JobId,
    /// Generator that created the job.
    pub source:       SourceId,
    pub created_at:   SimTime,
    /// Set by the sink that absorbs the job.
    pub completed_at: Option<SimTime>,
}

impl Job {
    pub fn new(id: JobId, source: SourceId, created_at: SimTime) -> Self {
        Self {
            id,
            source,
            created_at,
            completed_at: None,
        }
    }

    /// Stamp the completion time.
    pub fn complete(&mut self, at: SimTime) {
        self.completed_at = Some(at);
    }

    /// Time in system, once completed.
    pub fn sojourn(&self) -> Option<f64> {
        self.completed_at.map(|end| end.since(self.created_at))
    }

    /// Time since creation as of `now`.
    #[inline]
    pub fn age(&self, now: SimTime) -> f64 {
        now.since(self.created_at)
    }
}
