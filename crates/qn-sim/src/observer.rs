//! Simulation observer trait for progress reporting and data collection.

use qn_core::{SimTime, SourceId, StationId};
use qn_network::{EventOwner, Network, TraceEvent};
use tracing::{debug, info};

use crate::RunSummary;

/// Callbacks invoked by [`Engine::simulate`][crate::Engine::simulate] at key
/// points of the event loop.
///
/// All methods have default no-op implementations so implementors only need
/// to override what they care about.
///
/// # Example: absorption counter
///
/// ```rust,ignore
/// struct Absorbed(u64);
///
/// impl SimObserver for Absorbed {
///     fn on_trace(&mut self, event: &TraceEvent) {
///         if let TraceEvent::JobAbsorbed { .. } = event {
///             self.0 += 1;
///         }
///     }
/// }
/// ```
pub trait SimObserver {
    /// Called once before the generators schedule their first arrivals.
    fn on_sim_start(&mut self, _network: &Network, _end_time: SimTime) {}

    /// Called for every event popped from the queue, before its owner runs.
    fn on_event(&mut self, _time: SimTime, _owner: EventOwner) {}

    /// Called for every advisory record a station, sink, or generator emits.
    fn on_trace(&mut self, _event: &TraceEvent) {}

    /// Called once after the horizon is reached or the queue drains.
    fn on_sim_end(&mut self, _network: &Network, _summary: &RunSummary) {}
}

/// A [`SimObserver`] that does nothing.  Use when you need to call
/// `simulate` but don't want callbacks.
pub struct NoopObserver;

impl SimObserver for NoopObserver {}

/// Fan every callback out to two observers, `A` first.
impl<A: SimObserver, B: SimObserver> SimObserver for (A, B) {
    fn on_sim_start(&mut self, network: &Network, end_time: SimTime) {
        self.0.on_sim_start(network, end_time);
        self.1.on_sim_start(network, end_time);
    }

    fn on_event(&mut self, time: SimTime, owner: EventOwner) {
        self.0.on_event(time, owner);
        self.1.on_event(time, owner);
    }

    fn on_trace(&mut self, event: &TraceEvent) {
        self.0.on_trace(event);
        self.1.on_trace(event);
    }

    fn on_sim_end(&mut self, network: &Network, summary: &RunSummary) {
        self.0.on_sim_end(network, summary);
        self.1.on_sim_end(network, summary);
    }
}

// ── RecordingObserver ─────────────────────────────────────────────────────────

/// Keeps every event and trace record in memory.
#[derive(Default)]
pub struct RecordingObserver {
    pub events: Vec<(SimTime, EventOwner)>,
    pub traces: Vec<TraceEvent>,
}

impl RecordingObserver {
    pub fn new() -> Self {
        Self::default()
    }
}

impl SimObserver for RecordingObserver {
    fn on_event(&mut self, time: SimTime, owner: EventOwner) {
        self.events.push((time, owner));
    }

    fn on_trace(&mut self, event: &TraceEvent) {
        self.traces.push(event.clone());
    }
}

// ── TracingObserver ───────────────────────────────────────────────────────────

/// Turns every trace record into a structured `tracing` event at `debug`
/// level, with node and generator names resolved from the network.
#[derive(Default)]
pub struct TracingObserver {
    nodes:   Vec<String>,
    sources: Vec<String>,
}

impl TracingObserver {
    pub fn new() -> Self {
        Self::default()
    }

    fn node(&self, id: StationId) -> &str {
        self.nodes.get(id.index()).map_or("?", String::as_str)
    }

    fn source(&self, id: SourceId) -> &str {
        self.sources.get(id.index()).map_or("?", String::as_str)
    }
}

impl SimObserver for TracingObserver {
    fn on_sim_start(&mut self, network: &Network, end_time: SimTime) {
        self.nodes = network.nodes().iter().map(|n| n.name().to_owned()).collect();
        self.sources = network.generators().iter().map(|g| g.name().to_owned()).collect();
        info!(
            nodes = self.nodes.len(),
            generators = self.sources.len(),
            end_time = end_time.as_f64(),
            "network ready"
        );
    }

    fn on_trace(&mut self, event: &TraceEvent) {
        match *event {
            TraceEvent::JobCreated { time, source, job, entry } => debug!(
                time = time.as_f64(),
                job = job.0,
                generator = self.source(source),
                entry = self.node(entry),
                "job created"
            ),
            TraceEvent::ServiceStarted { time, station, job, duration, busy, capacity } => debug!(
                time = time.as_f64(),
                job = job.0,
                station = self.node(station),
                duration,
                busy,
                capacity,
                "service started"
            ),
            TraceEvent::JobRouted { time, station, job, target } => debug!(
                time = time.as_f64(),
                job = job.0,
                station = self.node(station),
                target = self.node(target),
                "job routed"
            ),
            TraceEvent::JobAbsorbed { time, sink, job, sojourn, absorbed } => debug!(
                time = time.as_f64(),
                job = job.0,
                sink = self.node(sink),
                sojourn,
                absorbed,
                "job absorbed"
            ),
            TraceEvent::JobRetired { time, station, job } => debug!(
                time = time.as_f64(),
                job = job.0,
                station = self.node(station),
                "job retired"
            ),
        }
    }

    fn on_sim_end(&mut self, _network: &Network, summary: &RunSummary) {
        info!(
            events = summary.events_executed,
            created = summary.jobs_created,
            absorbed = summary.jobs_absorbed,
            unfinished = summary.unfinished(),
            "simulation finished"
        );
    }
}
