//! `Network`: the arena that owns every node and generator of one run.

use std::collections::HashMap;

use qn_core::{JobId, SourceId, StationId};

use crate::routing::ROUNDING_SLACK;
use crate::{
    EventOwner, Generator, NetworkError, NetworkNode, NetworkResult, QueueStation, Scheduler,
    TraceEvent, Transducer,
};

/// All stations, sinks, and generators of one queueing network.
///
/// Node and generator IDs are indices into the internal `Vec`s, assigned in
/// insertion order.  Every station added here is registered with the
/// engine, and every stream is seeded from the network's master seed.
pub struct Network {
    seed:     u64,
    nodes:    Vec<NetworkNode>,
    sources:  Vec<Generator>,
    names:    HashMap<String, StationId>,
    next_job: u64,
    retired:  u64,
}

impl Network {
    pub fn new(seed: u64) -> Self {
        Self {
            seed,
            nodes:    Vec::new(),
            sources:  Vec::new(),
            names:    HashMap::new(),
            next_job: 0,
            retired:  0,
        }
    }

    // ── Construction ──────────────────────────────────────────────────────

    /// Add an active station with exponential service at `service_rate`.
    pub fn add_station(
        &mut self,
        name:         &str,
        capacity:     u32,
        service_rate: f64,
    ) -> NetworkResult<StationId> {
        let id = self.claim_name(name)?;
        let mut station = QueueStation::new(id, name, capacity, service_rate, self.seed)?;
        station.register();
        self.push_node(name, NetworkNode::Active(station))
    }

    /// Add an active station whose services take zero time.
    pub fn add_instantaneous_station(&mut self, name: &str, capacity: u32) -> NetworkResult<StationId> {
        let id = self.claim_name(name)?;
        let mut station = QueueStation::instantaneous(id, name, capacity, self.seed)?;
        station.register();
        self.push_node(name, NetworkNode::Active(station))
    }

    /// Add a sink.  With `retain_jobs`, absorbed jobs are kept for
    /// inspection after the run.
    pub fn add_sink(&mut self, name: &str, retain_jobs: bool) -> NetworkResult<StationId> {
        let id = self.claim_name(name)?;
        let mut sink = Transducer::new(id, name);
        if retain_jobs {
            sink = sink.retaining_jobs();
        }
        self.push_node(name, NetworkNode::Sink(sink))
    }

    /// Add a generator emitting at `arrival_rate` into `entry`.
    pub fn add_generator(
        &mut self,
        name:         &str,
        arrival_rate: f64,
        entry:        StationId,
    ) -> NetworkResult<SourceId> {
        self.node(entry)?;
        let id = SourceId::nth(self.sources.len());
        let mut generator = Generator::new(id, name, arrival_rate, self.seed)?;
        generator.set_entry_station(entry);
        self.sources.push(generator);
        Ok(id)
    }

    /// Add the edge `from → to` with weight `probability`.
    ///
    /// # Errors
    /// `UnknownStation` if either end does not exist, `UnsupportedOperation`
    /// if `from` is a sink.
    pub fn connect(&mut self, from: StationId, to: StationId, probability: f64) -> NetworkResult<()> {
        self.node(to)?;
        self.node_mut(from)?
            .station_for("add_output_station")?
            .add_output_station(to, probability)
    }

    fn claim_name(&self, name: &str) -> NetworkResult<StationId> {
        if self.names.contains_key(name) {
            return Err(NetworkError::DuplicateName(name.to_owned()));
        }
        Ok(StationId::nth(self.nodes.len()))
    }

    fn push_node(&mut self, name: &str, node: NetworkNode) -> NetworkResult<StationId> {
        let id = node.id();
        self.names.insert(name.to_owned(), id);
        self.nodes.push(node);
        Ok(id)
    }

    /// Reseed every generator and station from a new master seed.
    pub fn reseed(&mut self, seed: u64) {
        self.seed = seed;
        for generator in &mut self.sources {
            generator.set_random_seed(seed);
        }
        for node in &mut self.nodes {
            if let NetworkNode::Active(station) = node {
                station.set_random_seed(seed);
            }
        }
    }

    // ── Running ───────────────────────────────────────────────────────────

    /// Schedule the first arrival of every generator.
    pub fn initialize(&mut self, scheduler: &mut dyn Scheduler) -> NetworkResult<()> {
        for generator in &mut self.sources {
            generator.initialize(scheduler)?;
        }
        Ok(())
    }

    /// Run the component that owns a fired event.
    pub fn execute(&mut self, owner: EventOwner, scheduler: &mut dyn Scheduler) -> NetworkResult<()> {
        match owner {
            EventOwner::Source(id)  => self.fire_source(id, scheduler),
            EventOwner::Station(id) => self.execute_station(id, scheduler),
        }
    }

    /// A generator's arrival: create a job, hand it to the entry station,
    /// and schedule the next arrival.
    pub fn fire_source(&mut self, id: SourceId, scheduler: &mut dyn Scheduler) -> NetworkResult<()> {
        let now = scheduler.now();
        let job_id = JobId(self.next_job);
        let generator = self
            .sources
            .get_mut(id.index())
            .ok_or(NetworkError::UnknownSource(id))?;
        let (job, entry) = generator.emit(job_id, now)?;
        self.next_job += 1;

        scheduler.trace(TraceEvent::JobCreated {
            time:   now,
            source: id,
            job:    job_id,
            entry,
        });
        self.node_mut(entry)?.accept_job(job, scheduler);

        // The generator borrow ended above; look it up again.
        self.sources[id.index()].schedule_next(scheduler);
        Ok(())
    }

    /// A station's service completion: release the finished job, route it,
    /// then refill the freed server from the backlog.
    ///
    /// The freed server is refilled only if it is still free: a self-loop
    /// edge may already have taken it when the routed job re-entered.
    ///
    /// # Errors
    /// `UnsupportedOperation` if `id` is a sink, `MisconfiguredRouting` if
    /// the routing draw is not covered.
    pub fn execute_station(&mut self, id: StationId, scheduler: &mut dyn Scheduler) -> NetworkResult<()> {
        let now = scheduler.now();
        let station = self.node_mut(id)?.station_for("execute")?;
        let job = station.finish_service(now)?;
        let job_id = job.id;

        match station.select_output_station()? {
            Some(target) => {
                scheduler.trace(TraceEvent::JobRouted {
                    time:    now,
                    station: id,
                    job:     job_id,
                    target,
                });
                self.node_mut(target)?.accept_job(job, scheduler);
            }
            None => {
                self.retired += 1;
                scheduler.trace(TraceEvent::JobRetired {
                    time:    now,
                    station: id,
                    job:     job_id,
                });
            }
        }

        self.node_mut(id)?.station_for("execute")?.start_next_if_free(scheduler);
        Ok(())
    }

    // ── Lookup ────────────────────────────────────────────────────────────

    pub fn node(&self, id: StationId) -> NetworkResult<&NetworkNode> {
        self.nodes.get(id.index()).ok_or(NetworkError::UnknownStation(id))
    }

    pub fn node_mut(&mut self, id: StationId) -> NetworkResult<&mut NetworkNode> {
        self.nodes.get_mut(id.index()).ok_or(NetworkError::UnknownStation(id))
    }

    pub fn station(&self, id: StationId) -> NetworkResult<&QueueStation> {
        self.node(id)?.as_station()
    }

    pub fn sink(&self, id: StationId) -> Option<&Transducer> {
        self.nodes.get(id.index()).and_then(NetworkNode::as_sink)
    }

    pub fn generator(&self, id: SourceId) -> NetworkResult<&Generator> {
        self.sources.get(id.index()).ok_or(NetworkError::UnknownSource(id))
    }

    /// Look a node up by name.
    pub fn find(&self, name: &str) -> Option<StationId> {
        self.names.get(name).copied()
    }

    pub fn nodes(&self) -> &[NetworkNode] {
        &self.nodes
    }

    pub fn generators(&self) -> &[Generator] {
        &self.sources
    }

    pub fn seed(&self) -> u64 {
        self.seed
    }

    // ── Job accounting ────────────────────────────────────────────────────

    /// Jobs created by all generators.
    pub fn jobs_created(&self) -> u64 {
        self.next_job
    }

    /// Jobs absorbed by all sinks.
    pub fn jobs_absorbed(&self) -> u64 {
        self.nodes
            .iter()
            .filter_map(NetworkNode::as_sink)
            .map(Transducer::absorbed)
            .sum()
    }

    /// Jobs that left through a station without output edges.
    pub fn jobs_retired(&self) -> u64 {
        self.retired
    }

    /// Jobs sitting in any backlog.
    pub fn jobs_waiting(&self) -> usize {
        self.active_stations().map(QueueStation::backlog_len).sum()
    }

    /// Jobs occupying any server.
    pub fn jobs_in_service(&self) -> usize {
        self.active_stations().map(|s| s.busy() as usize).sum()
    }

    pub fn active_stations(&self) -> impl Iterator<Item = &QueueStation> {
        self.nodes.iter().filter_map(|n| match n {
            NetworkNode::Active(s) => Some(s),
            NetworkNode::Sink(_)   => None,
        })
    }

    /// Stations with output edges whose total probability is not unity,
    /// as `(id, mass)`.  A mass below one is fatal once a draw lands in the
    /// gap; a mass above one leaves the trailing edges partly unreachable.
    pub fn routing_mass_report(&self) -> Vec<(StationId, f64)> {
        self.active_stations()
            .filter(|s| !s.routing().is_empty())
            .map(|s| (s.id(), s.routing().total_mass()))
            .filter(|&(_, mass)| (mass - 1.0).abs() > ROUNDING_SLACK)
            .collect()
    }
}
