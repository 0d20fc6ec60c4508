//! End-of-run snapshot of the network.

use qn_core::SimTime;
use qn_network::{Network, NetworkNode};
use serde::Serialize;

/// Per-station counters at the end of a run.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct StationSummary {
    pub name:         String,
    pub capacity:     u32,
    /// `inf` for an instantaneous station.
    pub service_rate: f64,
    pub arrivals:     u64,
    pub started:      u64,
    pub completed:    u64,
    /// Jobs still in service when the run stopped.
    pub busy:         u32,
    /// Jobs still waiting when the run stopped.
    pub backlog:      usize,
    pub max_backlog:  usize,
    /// Mean fraction of servers busy over `[0, end_time]`.
    pub utilisation:  f64,
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct SinkSummary {
    pub name:         String,
    pub absorbed:     u64,
    pub mean_sojourn: f64,
    pub max_sojourn:  f64,
}

/// What a finished run produced, including the work left in flight.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct RunSummary {
    pub seed:            u64,
    pub end_time:        f64,
    /// Time of the last executed event.
    pub final_time:      f64,
    pub events_executed: u64,
    pub jobs_created:    u64,
    pub jobs_absorbed:   u64,
    pub jobs_retired:    u64,
    pub jobs_waiting:    usize,
    pub jobs_in_service: usize,
    pub stations:        Vec<StationSummary>,
    pub sinks:           Vec<SinkSummary>,
}

impl RunSummary {
    pub fn collect(network: &Network, end_time: SimTime, final_time: SimTime, events_executed: u64) -> Self {
        let mut stations = Vec::new();
        let mut sinks = Vec::new();
        for node in network.nodes() {
            match node {
                NetworkNode::Active(s) => {
                    let stats = s.stats();
                    stations.push(StationSummary {
                        name:         s.name().to_owned(),
                        capacity:     s.capacity(),
                        service_rate: s.service_rate(),
                        arrivals:     stats.arrivals,
                        started:      stats.started,
                        completed:    stats.completed,
                        busy:         s.busy(),
                        backlog:      s.backlog_len(),
                        max_backlog:  stats.max_backlog,
                        utilisation:  s.utilisation(end_time),
                    });
                }
                NetworkNode::Sink(t) => sinks.push(SinkSummary {
                    name:         t.name().to_owned(),
                    absorbed:     t.absorbed(),
                    mean_sojourn: t.mean_sojourn(),
                    max_sojourn:  t.max_sojourn(),
                }),
            }
        }
        Self {
            seed: network.seed(),
            end_time: end_time.as_f64(),
            final_time: final_time.as_f64(),
            events_executed,
            jobs_created: network.jobs_created(),
            jobs_absorbed: network.jobs_absorbed(),
            jobs_retired: network.jobs_retired(),
            jobs_waiting: network.jobs_waiting(),
            jobs_in_service: network.jobs_in_service(),
            stations,
            sinks,
        }
    }

    /// Jobs still inside the network (waiting or in service).
    pub fn unfinished(&self) -> usize {
        self.jobs_waiting + self.jobs_in_service
    }

    /// Every created job is accounted for as absorbed, retired, or unfinished.
    pub fn is_conserved(&self) -> bool {
        self.jobs_created == self.jobs_absorbed + self.jobs_retired + self.unfinished() as u64
    }

    pub fn station(&self, name: &str) -> Option<&StationSummary> {
        self.stations.iter().find(|s| s.name == name)
    }
}
