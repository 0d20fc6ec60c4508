//! `Transducer`: the terminal node that absorbs finished jobs.

use qn_core::{Job, StationId};

use crate::{Scheduler, TraceEvent};

/// Receives every job leaving the system and records its completion.
///
/// A transducer has no servers and no backlog, never routes, and never
/// schedules an event.  It takes part in the network only as a routing
/// target.
pub struct Transducer {
    id:            StationId,
    name:          String,
    absorbed:      u64,
    total_sojourn: f64,
    max_sojourn:   f64,
    /// Absorbed jobs, kept only when retention is enabled.
    retained:      Option<Vec<Job>>,
}

impl Transducer {
    pub fn new(id: StationId, name: impl Into<String>) -> Self {
        Self {
            id,
            name:          name.into(),
            absorbed:      0,
            total_sojourn: 0.0,
            max_sojourn:   0.0,
            retained:      None,
        }
    }

    /// Keep every absorbed job (with its completion time) for inspection.
    pub fn retaining_jobs(mut self) -> Self {
        self.retained = Some(Vec::new());
        self
    }

    /// Absorb `job`, stamping its completion at the scheduler's current time.
    pub fn accept_job(&mut self, mut job: Job, scheduler: &mut dyn Scheduler) {
        let now = scheduler.now();
        job.complete(now);
        let sojourn = job.age(now);

        self.absorbed += 1;
        self.total_sojourn += sojourn;
        self.max_sojourn = self.max_sojourn.max(sojourn);

        scheduler.trace(TraceEvent::JobAbsorbed {
            time:     now,
            sink:     self.id,
            job:      job.id,
            sojourn,
            absorbed: self.absorbed,
        });

        if let Some(jobs) = self.retained.as_mut() {
            jobs.push(job);
        }
    }

    pub fn id(&self) -> StationId {
        self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Number of jobs absorbed so far.
    pub fn absorbed(&self) -> u64 {
        self.absorbed
    }

    /// Mean time in system of absorbed jobs (`0.0` before the first).
    pub fn mean_sojourn(&self) -> f64 {
        if self.absorbed == 0 {
            return 0.0;
        }
        self.total_sojourn / self.absorbed as f64
    }

    pub fn max_sojourn(&self) -> f64 {
        self.max_sojourn
    }

    /// Absorbed jobs in arrival order, if retention is enabled.
    pub fn retained_jobs(&self) -> Option<&[Job]> {
        self.retained.as_deref()
    }
}
