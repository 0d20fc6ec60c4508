//! `QueueStation`: a multi-server FIFO service point with probabilistic
//! output routing.
//!
//! # Job life cycle
//!
//! ```text
//!   add_job ──▶ backlog (FIFO) ──start_next_job──▶ in service ──finish_service──▶ routed
//! ```
//!
//! Servers are homogeneous and memoryless, so the station tracks *how many*
//! are busy, not which server holds which job: in-service jobs sit in a FIFO
//! and a completion releases the longest-serving one.

use std::collections::VecDeque;

use qn_core::{
    CoreError, ExponentialVariate, Job, SimTime, StationId, Stream, UniformVariate, Variate,
    derive_seed,
};

use crate::{EventOwner, NetworkError, NetworkResult, RoutingTable, Scheduler, TraceEvent};

/// Counters kept by every active station.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct StationStats {
    /// Jobs handed to the station.
    pub arrivals:    u64,
    /// Services begun.
    pub started:     u64,
    /// Services finished.
    pub completed:   u64,
    /// Longest backlog observed after an arrival.
    pub max_backlog: usize,
    /// Server-time spent busy, integrated up to the last occupancy change.
    pub busy_time:   f64,
}

pub struct QueueStation {
    id:          StationId,
    name:        String,
    capacity:    u32,
    backlog:     VecDeque<Job>,
    in_service:  VecDeque<Job>,
    service:     ExponentialVariate,
    selector:    UniformVariate,
    routing:     RoutingTable,
    /// Whether service completions are reported to the scheduler.
    registered:  bool,
    stats:       StationStats,
    last_change: SimTime,
}

impl QueueStation {
    /// Create a station with `capacity` servers and exponential service at
    /// `service_rate` jobs per time unit.
    ///
    /// `seed` is the run's master seed; the service and routing streams are
    /// derived from it and the station's ID.  The station starts
    /// unregistered (see [`register`][Self::register]).
    ///
    /// # Errors
    /// `InvalidParameter` if `capacity` is zero or `service_rate` is not
    /// positive.
    pub fn new(
        id:           StationId,
        name:         impl Into<String>,
        capacity:     u32,
        service_rate: f64,
        seed:         u64,
    ) -> NetworkResult<Self> {
        let name = name.into();
        let service = ExponentialVariate::new(service_rate, derive_seed(seed, Stream::Service(id)))
            .map_err(|_| CoreError::invalid("service_rate", service_rate, name.clone()))?;
        Self::with_service(id, name, capacity, service, seed)
    }

    /// Create a station whose services complete in zero time.
    pub fn instantaneous(
        id:       StationId,
        name:     impl Into<String>,
        capacity: u32,
        seed:     u64,
    ) -> NetworkResult<Self> {
        let service = ExponentialVariate::instantaneous(derive_seed(seed, Stream::Service(id)));
        Self::with_service(id, name.into(), capacity, service, seed)
    }

    fn with_service(
        id:       StationId,
        name:     String,
        capacity: u32,
        service:  ExponentialVariate,
        seed:     u64,
    ) -> NetworkResult<Self> {
        if capacity == 0 {
            return Err(CoreError::invalid("capacity", 0.0, name).into());
        }
        Ok(Self {
            id,
            name,
            capacity,
            backlog:     VecDeque::new(),
            in_service:  VecDeque::with_capacity(capacity as usize),
            service,
            selector:    UniformVariate::new(derive_seed(seed, Stream::Routing(id))),
            routing:     RoutingTable::new(),
            registered:  false,
            stats:       StationStats::default(),
            last_change: SimTime::ZERO,
        })
    }

    // ── Topology ──────────────────────────────────────────────────────────

    /// Append an output edge to `target` with weight `probability`.
    ///
    /// The sum over all edges is not checked here; a shortfall surfaces as
    /// `MisconfiguredRouting` when a draw lands in the uncovered range.
    ///
    /// # Errors
    /// `InvalidParameter` if `probability` is negative or not finite.
    pub fn add_output_station(&mut self, target: StationId, probability: f64) -> NetworkResult<()> {
        if !probability.is_finite() || probability < 0.0 {
            return Err(CoreError::invalid("probability", probability, self.name.clone()).into());
        }
        self.routing.push(target, probability);
        Ok(())
    }

    /// Start reporting service completions to the scheduler.
    pub fn register(&mut self) {
        self.registered = true;
    }

    /// Stop reporting service completions.  Jobs already in service keep
    /// their scheduled completions; jobs started afterwards never complete.
    pub fn unregister(&mut self) {
        self.registered = false;
    }

    /// Reseed the service and routing streams from a master seed.
    pub fn set_random_seed(&mut self, seed: u64) {
        self.service.set_seed(derive_seed(seed, Stream::Service(self.id)));
        self.selector.set_seed(derive_seed(seed, Stream::Routing(self.id)));
    }

    // ── Job flow ──────────────────────────────────────────────────────────

    /// Enqueue `job`; if a server is free, start the backlog head at once
    /// (which is `job` itself when the backlog was empty).
    pub fn add_job(&mut self, job: Job, scheduler: &mut dyn Scheduler) {
        self.stats.arrivals += 1;
        self.backlog.push_back(job);
        self.start_next_if_free(scheduler);
        self.stats.max_backlog = self.stats.max_backlog.max(self.backlog.len());
    }

    /// Start the backlog head if a server is free.
    pub fn start_next_if_free(&mut self, scheduler: &mut dyn Scheduler) {
        if self.busy() < self.capacity {
            self.start_next_job(scheduler);
        }
    }

    /// Pop the backlog head, draw its service time, report the completion,
    /// and occupy one more server.  No-op on an empty backlog.
    fn start_next_job(&mut self, scheduler: &mut dyn Scheduler) {
        let Some(job) = self.backlog.pop_front() else {
            return;
        };
        let now = scheduler.now();
        let duration = self.service.next_variate();

        if self.registered {
            scheduler.schedule(EventOwner::Station(self.id), duration);
        }

        self.accumulate_busy_time(now);
        let job_id = job.id;
        self.in_service.push_back(job);
        self.stats.started += 1;
        debug_assert!(self.busy() <= self.capacity);

        scheduler.trace(TraceEvent::ServiceStarted {
            time:     now,
            station:  self.id,
            job:      job_id,
            duration,
            busy:     self.busy(),
            capacity: self.capacity,
        });
    }

    /// Release one server and hand back the job it was serving.
    ///
    /// # Errors
    /// `IdleCompletion` if no job is in service.
    pub fn finish_service(&mut self, now: SimTime) -> NetworkResult<Job> {
        self.accumulate_busy_time(now);
        let job = self
            .in_service
            .pop_front()
            .ok_or_else(|| NetworkError::IdleCompletion { station: self.name.clone() })?;
        self.stats.completed += 1;
        Ok(job)
    }

    /// Choose the output edge for a finished job.
    ///
    /// Returns `Ok(None)` for a station without edges (no variate is drawn).
    ///
    /// # Errors
    /// `MisconfiguredRouting` when the drawn variate is not covered by the
    /// accumulated edge mass.
    pub fn select_output_station(&mut self) -> NetworkResult<Option<StationId>> {
        if self.routing.is_empty() {
            return Ok(None);
        }
        let u = self.selector.next_variate();
        match self.routing.select(u) {
            Some(index) => Ok(Some(self.routing.take(index))),
            None => Err(NetworkError::MisconfiguredRouting {
                station: self.name.clone(),
                variate: u,
                mass:    self.routing.total_mass(),
            }),
        }
    }

    fn accumulate_busy_time(&mut self, now: SimTime) {
        self.stats.busy_time += self.busy() as f64 * now.since(self.last_change);
        self.last_change = now;
    }

    // ── Accessors ─────────────────────────────────────────────────────────

    pub fn id(&self) -> StationId {
        self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn capacity(&self) -> u32 {
        self.capacity
    }

    /// Servers currently occupied.
    pub fn busy(&self) -> u32 {
        self.in_service.len() as u32
    }

    pub fn backlog_len(&self) -> usize {
        self.backlog.len()
    }

    /// Jobs waiting, front first.
    pub fn backlog(&self) -> impl Iterator<Item = &Job> {
        self.backlog.iter()
    }

    /// Jobs being served, longest-serving first.
    pub fn in_service(&self) -> impl Iterator<Item = &Job> {
        self.in_service.iter()
    }

    pub fn is_registered(&self) -> bool {
        self.registered
    }

    pub fn routing(&self) -> &RoutingTable {
        &self.routing
    }

    pub fn service_rate(&self) -> f64 {
        self.service.rate()
    }

    pub fn stats(&self) -> &StationStats {
        &self.stats
    }

    /// Busy server-time integrated up to `now`.
    pub fn busy_time_until(&self, now: SimTime) -> f64 {
        self.stats.busy_time + self.busy() as f64 * now.since(self.last_change).max(0.0)
    }

    /// Mean fraction of servers busy over `[0, now]`.
    pub fn utilisation(&self, now: SimTime) -> f64 {
        if now.0 <= 0.0 {
            return 0.0;
        }
        self.busy_time_until(now) / (self.capacity as f64 * now.0)
    }
}
