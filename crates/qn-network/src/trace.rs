//! Advisory trace records emitted while the network runs.
//!
//! These are not a protocol: the engine forwards them to its observer, which
//! may log them, write them to CSV, or ignore them.

use qn_core::{JobId, SimTime, SourceId, StationId};

#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum TraceEvent {
    /// A generator created `job` and handed it to `entry`.
    JobCreated {
        time:   SimTime,
        source: SourceId,
        job:    JobId,
        entry:  StationId,
    },

    /// `station` began serving `job`; it completes `duration` later.
    /// `busy` counts servers in use including this one.
    ServiceStarted {
        time:     SimTime,
        station:  StationId,
        job:      JobId,
        duration: f64,
        busy:     u32,
        capacity: u32,
    },

    /// `station` finished `job` and forwarded it to `target`.
    JobRouted {
        time:    SimTime,
        station: StationId,
        job:     JobId,
        target:  StationId,
    },

    /// A sink absorbed `job`.  `absorbed` is the sink's running total.
    JobAbsorbed {
        time:     SimTime,
        sink:     StationId,
        job:      JobId,
        sojourn:  f64,
        absorbed: u64,
    },

    /// A station with no output edges finished `job`; it leaves the network.
    JobRetired {
        time:    SimTime,
        station: StationId,
        job:     JobId,
    },
}

impl TraceEvent {
    pub fn time(&self) -> SimTime {
        match self {
            TraceEvent::JobCreated { time, .. }
            | TraceEvent::ServiceStarted { time, .. }
            | TraceEvent::JobRouted { time, .. }
            | TraceEvent::JobAbsorbed { time, .. }
            | TraceEvent::JobRetired { time, .. } => *time,
        }
    }

    pub fn job(&self) -> JobId {
        match self {
            TraceEvent::JobCreated { job, .. }
            | TraceEvent::ServiceStarted { job, .. }
            | TraceEvent::JobRouted { job, .. }
            | TraceEvent::JobAbsorbed { job, .. }
            | TraceEvent::JobRetired { job, .. } => *job,
        }
    }

    /// Short machine-friendly label, used as the `kind` column in output.
    pub fn kind(&self) -> &'static str {
        match self {
            TraceEvent::JobCreated { .. }     => "created",
            TraceEvent::ServiceStarted { .. } => "service_started",
            TraceEvent::JobRouted { .. }      => "routed",
            TraceEvent::JobAbsorbed { .. }    => "absorbed",
            TraceEvent::JobRetired { .. }     => "retired",
        }
    }
}
