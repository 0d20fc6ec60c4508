//! Simulation time model.
//!
//! # Design
//!
//! Time is a continuous, monotonically advancing `f64` wrapped in `SimTime`.
//! The unit is whatever the rates are expressed in (the field-service demo
//! uses hours: a rate of `1.31` means 1.31 jobs per hour).
//!
//! `SimTime` is totally ordered via [`f64::total_cmp`] so it can key a
//! `BTreeMap` directly.  All delays produced by the variate generators are
//! finite and non-negative, so the ordering coincides with the numeric one
//! for every value the engine ever stores.

use std::cmp::Ordering;
use std::fmt;

use crate::{CoreError, CoreResult};

// ── SimTime ──────────────────────────────────────────────────────────────────

/// An absolute point on the simulated timeline.
#[derive(Copy, Clone, Debug, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SimTime(pub f64);

impl SimTime {
    pub const ZERO: SimTime = SimTime(0.0);

    /// The point `delay` time units after `self`.
    #[inline]
    pub fn after(self, delay: f64) -> SimTime {
        SimTime(self.0 + delay)
    }

    /// Time elapsed from `earlier` to `self`.
    #[inline]
    pub fn since(self, earlier: SimTime) -> f64 {
        self.0 - earlier.0
    }

    #[inline]
    pub fn as_f64(self) -> f64 {
        self.0
    }
}

impl PartialEq for SimTime {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for SimTime {}

impl PartialOrd for SimTime {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for SimTime {
    fn cmp(&self, other: &Self) -> Ordering {
        self.0.total_cmp(&other.0)
    }
}

impl std::ops::Add<f64> for SimTime {
    type Output = SimTime;
    #[inline]
    fn add(self, rhs: f64) -> SimTime {
        self.after(rhs)
    }
}

impl std::ops::Sub for SimTime {
    type Output = f64;
    #[inline]
    fn sub(self, rhs: SimTime) -> f64 {
        self.since(rhs)
    }
}

impl fmt::Display for SimTime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "t={:.3}", self.0)
    }
}

// ── SimConfig ─────────────────────────────────────────────────────────────────

/// Run-level configuration shared by every component of one simulation.
///
/// Typically filled from command-line arguments by the application crate and
/// passed to the topology builder.
#[derive(Clone, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SimConfig {
    /// Horizon: events scheduled strictly after this time never execute.
    pub end_time: f64,

    /// Master RNG seed.  The same seed always produces identical runs.
    /// `None` means a seed is picked from the OS RNG when resolved.
    pub seed: Option<u64>,
}

impl Default for SimConfig {
    fn default() -> Self {
        Self {
            end_time: 8.0,
            seed:     None,
        }
    }
}

impl SimConfig {
    pub fn new(end_time: f64, seed: Option<u64>) -> Self {
        Self { end_time, seed }
    }

    /// Return the configured seed, choosing (and remembering) a random one if
    /// none was supplied.  Subsequent calls return the same value.
    pub fn resolve_seed(&mut self) -> u64 {
        *self.seed.get_or_insert_with(rand::random)
    }

    /// Reject horizons that are negative, NaN or infinite.
    pub fn validate(&self) -> CoreResult<()> {
        if !self.end_time.is_finite() || self.end_time < 0.0 {
            return Err(CoreError::invalid("end_time", self.end_time, "simulation config"));
        }
        Ok(())
    }
}
