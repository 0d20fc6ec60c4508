//! The field-service support network.
//!
//! Field technicians call a call center; calls escalate through software
//! and hardware tiers and may end at a repair center that either repairs or
//! replaces the unit.  Rates are per hour.
//!
//! ```text
//!   calls ─▶ CC ─▶ ST ─▶ SM ─▶ HT ─▶ HM ─▶ RC ─▶ REPAIR  ─▶ T
//!             │     │     │     │     │     └──▶ REPLACE ─▶ T
//!             └─────┴─────┴─────┴─────┴──▶ T        (HM also ─▶ ST)
//! ```

use qn_core::SimConfig;
use qn_sim::{RunSummary, SimBuilder};
use serde::Serialize;

pub const ARRIVAL_RATE: f64 = 1.31;

pub const CALL_CENTER: &str      = "Call Center";
pub const SOFTWARE_TECH: &str    = "Software Tech";
pub const SOFTWARE_MANAGER: &str = "Software Manager";
pub const HARDWARE_TECH: &str    = "Hardware Tech";
pub const HARDWARE_MANAGER: &str = "Hardware Manager";
pub const REPAIR_CENTER: &str    = "Repair Center";
pub const REPAIR: &str           = "Repair Center REPAIR";
pub const REPLACE: &str          = "Repair Center REPLACE";
pub const EXIT: &str             = "Transducer";

/// Bench hours spent inspecting each unit received at the repair center.
pub const INSPECT_HOURS: f64 = 0.5;
/// Bench hours spent on each unit that is repaired rather than replaced.
pub const REPAIR_HOURS: f64 = 3.722;

/// The repair center and its two branches pass jobs straight through.
pub fn field_service(config: SimConfig) -> SimBuilder {
    SimBuilder::new(config)
        .station(CALL_CENTER, 3, 1.31)
        .station(SOFTWARE_TECH, 2, 0.776)
        .station(SOFTWARE_MANAGER, 1, 0.228)
        .station(HARDWARE_TECH, 3, 0.552)
        .station(HARDWARE_MANAGER, 1, 0.326)
        .instantaneous_station(REPAIR_CENTER, 2)
        .instantaneous_station(REPAIR, 2)
        .instantaneous_station(REPLACE, 2)
        .sink(EXIT)
        .generator("Field Tech Calls", ARRIVAL_RATE, CALL_CENTER)
        // Two parallel edges to the software tier.
        .edge(CALL_CENTER, SOFTWARE_TECH, 0.58)
        .edge(CALL_CENTER, SOFTWARE_TECH, 0.27)
        .edge(CALL_CENTER, EXIT, 0.15)
        .edge(SOFTWARE_TECH, SOFTWARE_MANAGER, 0.30)
        .edge(SOFTWARE_TECH, HARDWARE_TECH, 0.20)
        .edge(SOFTWARE_TECH, EXIT, 0.50)
        .edge(SOFTWARE_MANAGER, HARDWARE_TECH, 0.20)
        .edge(SOFTWARE_MANAGER, EXIT, 0.80)
        .edge(HARDWARE_TECH, HARDWARE_MANAGER, 0.59)
        .edge(HARDWARE_TECH, EXIT, 0.41)
        .edge(HARDWARE_MANAGER, SOFTWARE_TECH, 0.05)
        .edge(HARDWARE_MANAGER, REPAIR_CENTER, 0.31)
        .edge(HARDWARE_MANAGER, EXIT, 0.64)
        .edge(REPAIR_CENTER, REPAIR, 0.75)
        .edge(REPAIR_CENTER, REPLACE, 0.25)
        .edge(REPAIR, EXIT, 1.0)
        .edge(REPLACE, EXIT, 1.0)
}

/// Repair-center bookkeeping derived from station arrivals.
///
/// Every unit reaching the repair center consumes one stock unit and one
/// inspection; units sent on to `REPAIR` add the repair labour.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct RepairAccounting {
    pub stock_used:   u64,
    pub replacements: u64,
    pub repairs:      u64,
    pub labour_hours: f64,
}

impl RepairAccounting {
    /// `None` when the run has no station named [`REPAIR_CENTER`], e.g. a
    /// custom topology loaded from JSON.
    pub fn from_summary(summary: &RunSummary) -> Option<Self> {
        let arrivals = |name: &str| summary.station(name).map_or(0, |s| s.arrivals);
        let stock_used = summary.station(REPAIR_CENTER)?.arrivals;
        let repairs = arrivals(REPAIR);
        Some(Self {
            stock_used,
            replacements: arrivals(REPLACE),
            repairs,
            labour_hours: stock_used as f64 * INSPECT_HOURS + repairs as f64 * REPAIR_HOURS,
        })
    }
}
