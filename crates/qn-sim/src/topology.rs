//! Serde description of a network topology, loadable from JSON.
//!
//! ```json
//! {
//!   "generators": [{ "name": "calls", "arrival_rate": 1.31, "entry": "CC" }],
//!   "stations":   [{ "name": "CC", "servers": 3, "service_rate": 1.31 },
//!                  { "name": "REPAIR", "servers": 2 }],
//!   "sinks":      [{ "name": "T" }],
//!   "edges":      [{ "from": "CC", "to": "T", "probability": 1.0 }]
//! }
//! ```
//!
//! A station without `service_rate` serves instantaneously.

use std::fs;
use std::path::Path;

use qn_core::SimConfig;
use serde::{Deserialize, Serialize};

use crate::{SimBuilder, SimResult, Simulation};

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct GeneratorSpec {
    pub name:         String,
    /// Mean arrivals per time unit.
    pub arrival_rate: f64,
    /// Name of the node receiving generated jobs.
    pub entry:        String,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct StationSpec {
    pub name:         String,
    pub servers:      u32,
    /// Mean services per time unit per server; `None` means instantaneous.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub service_rate: Option<f64>,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SinkSpec {
    pub name:        String,
    #[serde(default)]
    pub retain_jobs: bool,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct EdgeSpec {
    pub from:        String,
    pub to:          String,
    pub probability: f64,
}

/// A complete network: nodes, arrival sources, and routing edges.
///
/// Stations receive IDs first (in list order), then sinks.  Edges are added
/// in list order, which fixes the tie-break between equal probabilities.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct TopologyConfig {
    #[serde(default)]
    pub generators: Vec<GeneratorSpec>,
    #[serde(default)]
    pub stations:   Vec<StationSpec>,
    #[serde(default)]
    pub sinks:      Vec<SinkSpec>,
    #[serde(default)]
    pub edges:      Vec<EdgeSpec>,
}

impl TopologyConfig {
    pub fn from_json_str(json: &str) -> SimResult<Self> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn from_json_file(path: impl AsRef<Path>) -> SimResult<Self> {
        let text = fs::read_to_string(path)?;
        Self::from_json_str(&text)
    }

    pub fn to_json_pretty(&self) -> SimResult<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Build a ready-to-run simulation under `config`.
    ///
    /// # Errors
    /// `UnknownNode` for a dangling name, and any parameter error raised
    /// while constructing stations, generators, or edges.
    pub fn build(&self, config: &SimConfig) -> SimResult<Simulation> {
        SimBuilder::from_topology(config.clone(), self.clone()).build()
    }
}
