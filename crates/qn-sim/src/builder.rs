//! Fluent builder for constructing a [`Simulation`].

use std::collections::HashMap;

use qn_core::{SimConfig, StationId};
use qn_network::Network;
use tracing::{debug, info, warn};

use crate::topology::{EdgeSpec, GeneratorSpec, SinkSpec, StationSpec, TopologyConfig};
use crate::{SimError, SimResult, Simulation};

/// Fluent builder for [`Simulation`].
///
/// Nodes are referred to by name; names are resolved to IDs only in
/// [`build`][Self::build], so edges may be declared before their targets.
///
/// # Example
///
/// ```rust,ignore
/// let mut sim = SimBuilder::new(SimConfig::new(100.0, Some(7)))
///     .station("server", 1, 2.0)
///     .sink("exit")
///     .generator("arrivals", 1.0, "server")
///     .edge("server", "exit", 1.0)
///     .build()?;
/// let summary = sim.run(&mut NoopObserver)?;
/// ```
pub struct SimBuilder {
    config:   SimConfig,
    topology: TopologyConfig,
}

impl SimBuilder {
    pub fn new(config: SimConfig) -> Self {
        Self::from_topology(config, TopologyConfig::default())
    }

    /// Start from an existing topology, e.g. one loaded from JSON.
    pub fn from_topology(config: SimConfig, topology: TopologyConfig) -> Self {
        Self { config, topology }
    }

    /// Add a station with `servers` servers and exponential service.
    pub fn station(mut self, name: &str, servers: u32, service_rate: f64) -> Self {
        self.topology.stations.push(StationSpec {
            name: name.to_owned(),
            servers,
            service_rate: Some(service_rate),
        });
        self
    }

    /// Add a station whose services take zero time.
    pub fn instantaneous_station(mut self, name: &str, servers: u32) -> Self {
        self.topology.stations.push(StationSpec {
            name: name.to_owned(),
            servers,
            service_rate: None,
        });
        self
    }

    pub fn sink(mut self, name: &str) -> Self {
        self.topology.sinks.push(SinkSpec { name: name.to_owned(), retain_jobs: false });
        self
    }

    /// Add a sink that keeps every absorbed job.
    pub fn retaining_sink(mut self, name: &str) -> Self {
        self.topology.sinks.push(SinkSpec { name: name.to_owned(), retain_jobs: true });
        self
    }

    pub fn generator(mut self, name: &str, arrival_rate: f64, entry: &str) -> Self {
        self.topology.generators.push(GeneratorSpec {
            name: name.to_owned(),
            arrival_rate,
            entry: entry.to_owned(),
        });
        self
    }

    pub fn edge(mut self, from: &str, to: &str, probability: f64) -> Self {
        self.topology.edges.push(EdgeSpec {
            from: from.to_owned(),
            to: to.to_owned(),
            probability,
        });
        self
    }

    pub fn end_time(mut self, end_time: f64) -> Self {
        self.config.end_time = end_time;
        self
    }

    pub fn seed(mut self, seed: u64) -> Self {
        self.config.seed = Some(seed);
        self
    }

    /// The topology assembled so far.
    pub fn topology(&self) -> &TopologyConfig {
        &self.topology
    }

    /// Resolve the seed, create every node, generator, and edge, and return
    /// a ready-to-run [`Simulation`].
    ///
    /// Stations whose outgoing probabilities do not sum to one are logged at
    /// `warn` but accepted.
    pub fn build(mut self) -> SimResult<Simulation> {
        self.config.validate()?;
        let explicit = self.config.seed.is_some();
        let seed = self.config.resolve_seed();
        if explicit {
            info!(seed, "building network");
        } else {
            info!(seed, "building network with generated seed");
        }

        let mut network = Network::new(seed);
        let mut ids: HashMap<&str, StationId> = HashMap::new();

        for spec in &self.topology.stations {
            let id = match spec.service_rate {
                Some(rate) => network.add_station(&spec.name, spec.servers, rate)?,
                None => network.add_instantaneous_station(&spec.name, spec.servers)?,
            };
            ids.insert(&spec.name, id);
        }
        for spec in &self.topology.sinks {
            let id = network.add_sink(&spec.name, spec.retain_jobs)?;
            ids.insert(&spec.name, id);
        }

        let resolve = |name: &str| -> SimResult<StationId> {
            ids.get(name).copied().ok_or_else(|| SimError::UnknownNode(name.to_owned()))
        };

        for spec in &self.topology.generators {
            let entry = resolve(&spec.entry)?;
            if network.sink(entry).is_some() {
                return Err(SimError::Config(format!(
                    "generator '{}' feeds sink '{}' directly; its entry must be a station",
                    spec.name, spec.entry
                )));
            }
            network.add_generator(&spec.name, spec.arrival_rate, entry)?;
        }
        for edge in &self.topology.edges {
            network.connect(resolve(&edge.from)?, resolve(&edge.to)?, edge.probability)?;
        }

        for (id, mass) in network.routing_mass_report() {
            let name = network.node(id)?.name();
            warn!(station = name, mass, "outgoing routing probabilities do not sum to 1");
        }
        debug!(
            nodes = network.nodes().len(),
            generators = network.generators().len(),
            edges = self.topology.edges.len(),
            "network built"
        );

        Simulation::new(network, self.config.end_time)
    }
}
