//! `NetworkNode`: the two kinds of routing target.
//!
//! Both kinds accept jobs.  Only [`NetworkNode::Active`] stations are event
//! sources; asking a sink to execute or to (un)register fails with
//! `UnsupportedOperation` instead of silently doing nothing.

use qn_core::{Job, StationId};

use crate::{NetworkError, NetworkResult, QueueStation, Scheduler, Transducer};

pub enum NetworkNode {
    Active(QueueStation),
    Sink(Transducer),
}

impl NetworkNode {
    pub fn id(&self) -> StationId {
        match self {
            NetworkNode::Active(s) => s.id(),
            NetworkNode::Sink(t)   => t.id(),
        }
    }

    pub fn name(&self) -> &str {
        match self {
            NetworkNode::Active(s) => s.name(),
            NetworkNode::Sink(t)   => t.name(),
        }
    }

    pub fn is_sink(&self) -> bool {
        matches!(self, NetworkNode::Sink(_))
    }

    /// Hand `job` to this node.  Ownership of the job moves here.
    pub fn accept_job(&mut self, job: Job, scheduler: &mut dyn Scheduler) {
        match self {
            NetworkNode::Active(s) => s.add_job(job, scheduler),
            NetworkNode::Sink(t)   => t.accept_job(job, scheduler),
        }
    }

    pub fn register(&mut self) -> NetworkResult<()> {
        self.station_for("register").map(QueueStation::register)
    }

    pub fn unregister(&mut self) -> NetworkResult<()> {
        self.station_for("unregister").map(QueueStation::unregister)
    }

    /// Borrow the active station.
    ///
    /// # Errors
    /// `UnsupportedOperation` for a sink.
    pub fn as_station(&self) -> NetworkResult<&QueueStation> {
        match self {
            NetworkNode::Active(s) => Ok(s),
            NetworkNode::Sink(t)   => Err(unsupported(t, "station")),
        }
    }

    pub(crate) fn station_for(&mut self, operation: &'static str) -> NetworkResult<&mut QueueStation> {
        match self {
            NetworkNode::Active(s) => Ok(s),
            NetworkNode::Sink(t)   => Err(unsupported(t, operation)),
        }
    }

    pub fn as_sink(&self) -> Option<&Transducer> {
        match self {
            NetworkNode::Sink(t)   => Some(t),
            NetworkNode::Active(_) => None,
        }
    }

    /// Jobs currently held (waiting or in service).  Always zero for a sink.
    pub fn jobs_held(&self) -> usize {
        match self {
            NetworkNode::Active(s) => s.backlog_len() + s.busy() as usize,
            NetworkNode::Sink(_)   => 0,
        }
    }
}

fn unsupported(sink: &Transducer, operation: &'static str) -> NetworkError {
    NetworkError::UnsupportedOperation {
        station: sink.name().to_owned(),
        operation,
    }
}
