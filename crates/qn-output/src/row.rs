//! Plain data row types written by output backends.

use qn_sim::{RunSummary, SinkSummary, StationSummary};

/// One trace record with node names already resolved.
///
/// Fields that do not apply to a record's `kind` are `None` and written as
/// empty cells.
#[derive(Debug, Clone, PartialEq)]
pub struct TraceRow {
    pub time:     f64,
    /// `created`, `service_started`, `routed`, `absorbed`, or `retired`.
    pub kind:     &'static str,
    pub job:      u64,
    /// The node where the record happened (entry station for `created`).
    pub node:     String,
    /// The generator for `created`, the routing target for `routed`.
    pub peer:     Option<String>,
    pub duration: Option<f64>,
    pub busy:     Option<u32>,
    pub capacity: Option<u32>,
    pub sojourn:  Option<f64>,
}

/// End-of-run counters for one node.  Station-only and sink-only columns
/// are `None` for the other kind.
#[derive(Debug, Clone, PartialEq)]
pub struct SummaryRow {
    pub name:         String,
    /// `station` or `sink`.
    pub kind:         &'static str,
    pub capacity:     Option<u32>,
    pub service_rate: Option<f64>,
    pub arrivals:     Option<u64>,
    pub completed:    Option<u64>,
    pub busy:         Option<u32>,
    pub backlog:      Option<usize>,
    pub max_backlog:  Option<usize>,
    pub utilisation:  Option<f64>,
    pub absorbed:     Option<u64>,
    pub mean_sojourn: Option<f64>,
}

impl From<&StationSummary> for SummaryRow {
    fn from(s: &StationSummary) -> Self {
        Self {
            name:         s.name.clone(),
            kind:         "station",
            capacity:     Some(s.capacity),
            service_rate: Some(s.service_rate),
            arrivals:     Some(s.arrivals),
            completed:    Some(s.completed),
            busy:         Some(s.busy),
            backlog:      Some(s.backlog),
            max_backlog:  Some(s.max_backlog),
            utilisation:  Some(s.utilisation),
            absorbed:     None,
            mean_sojourn: None,
        }
    }
}

impl From<&SinkSummary> for SummaryRow {
    fn from(s: &SinkSummary) -> Self {
        Self {
            name:         s.name.clone(),
            kind:         "sink",
            capacity:     None,
            service_rate: None,
            arrivals:     Some(s.absorbed),
            completed:    None,
            busy:         None,
            backlog:      None,
            max_backlog:  None,
            utilisation:  None,
            absorbed:     Some(s.absorbed),
            mean_sojourn: Some(s.mean_sojourn),
        }
    }
}

/// Stations first, then sinks, each in network order.
pub fn summary_rows(summary: &RunSummary) -> Vec<SummaryRow> {
    summary
        .stations
        .iter()
        .map(SummaryRow::from)
        .chain(summary.sinks.iter().map(SummaryRow::from))
        .collect()
}
