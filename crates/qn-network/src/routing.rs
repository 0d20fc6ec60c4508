//! `RoutingTable`: probabilistic selection of a station's output edge.
//!
//! # Selection rule
//!
//! Edges are kept in **descending probability** order; edges of equal
//! probability keep their insertion order.  Selecting with a uniform variate
//! `u` walks the edges accumulating probability mass and returns the first
//! edge whose cumulative mass is `≥ u`:
//!
//! ```text
//!   edges  0.58       0.27      0.15
//!          |----------|---------|-----|
//!   u      0        0.58      0.85   1.0
//! ```
//!
//! When the mass never reaches `u` the table reports no edge, which the
//! station turns into `MisconfiguredRouting`.  The only exception is a total
//! mass within [`ROUNDING_SLACK`] of one: floating-point sums like
//! `0.58 + 0.27 + 0.15` can land a few ULPs short of `1.0`, and that sliver is
//! assigned to the last edge.

use qn_core::StationId;

/// How far below `1.0` a total mass may fall and still count as unity.
pub const ROUNDING_SLACK: f64 = 1e-9;

/// One `(target, probability)` pair owned by a station.
#[derive(Clone, Debug, PartialEq)]
pub struct OutputEdge {
    pub target:      StationId,
    pub probability: f64,
    /// Position in which the edge was added; the tie-break between equal
    /// probabilities.
    pub inserted:    usize,
    /// Jobs sent along this edge so far.
    pub routed:      u64,
}

#[derive(Clone, Debug, Default)]
pub struct RoutingTable {
    edges: Vec<OutputEdge>,
}

impl RoutingTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append an edge, keeping the table in selection order.
    ///
    /// No check is made that the total stays `≤ 1`.
    pub fn push(&mut self, target: StationId, probability: f64) {
        let inserted = self.edges.len();
        // Insert after every edge with probability ≥ the new one, so equal
        // weights stay in insertion order.
        let pos = self
            .edges
            .iter()
            .position(|e| e.probability < probability)
            .unwrap_or(self.edges.len());
        self.edges.insert(
            pos,
            OutputEdge {
                target,
                probability,
                inserted,
                routed: 0,
            },
        );
    }

    /// Index (in selection order) of the edge covering `u`, or `None` when
    /// the accumulated mass never reaches `u`.
    ///
    /// Zero-probability edges cover nothing and are never selected.
    pub fn select(&self, u: f64) -> Option<usize> {
        let mut cumulative = 0.0;
        let mut last = None;
        for (i, edge) in self.edges.iter().enumerate() {
            if edge.probability <= 0.0 {
                continue;
            }
            cumulative += edge.probability;
            last = Some(i);
            if cumulative >= u {
                return Some(i);
            }
        }
        if cumulative >= 1.0 - ROUNDING_SLACK {
            return last;
        }
        None
    }

    /// Record a job sent along edge `index` and return its target.
    pub(crate) fn take(&mut self, index: usize) -> StationId {
        let edge = &mut self.edges[index];
        edge.routed += 1;
        edge.target
    }

    /// Sum of all edge probabilities.
    pub fn total_mass(&self) -> f64 {
        self.edges.iter().map(|e| e.probability).sum()
    }

    /// Edges in selection order.
    pub fn edges(&self) -> &[OutputEdge] {
        &self.edges
    }

    pub fn len(&self) -> usize {
        self.edges.len()
    }

    pub fn is_empty(&self) -> bool {
        self.edges.is_empty()
    }
}
