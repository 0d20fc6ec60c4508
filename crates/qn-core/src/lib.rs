//! `qn-core` — foundational types for the `qnet` queueing-network kernel.
//!
//! This crate is a dependency of every other `qn-*` crate.  It intentionally
//! has no `qn-*` dependencies and minimal external ones (only `rand` and
//! `thiserror`, plus optional `serde`).
//!
//! # What lives here
//!
//! | Module      | Contents                                                   |
//! |-------------|------------------------------------------------------------|
//! | [`ids`]     | `StationId`, `SourceId`, `JobId`                           |
//! | [`time`]    | `SimTime`, `SimConfig`                                     |
//! | [`rng`]     | `Variate`, `UniformVariate`, `ExponentialVariate`, seeding |
//! | [`job`]     | `Job`, the unit of work flowing through the network        |
//! | [`error`]   | `CoreError`, `CoreResult`                                  |
//!
//! # Feature flags
//!
//! | Flag    | Effect                                                     |
//! |---------|------------------------------------------------------------|
//! | `serde` | Adds `Serialize`/`Deserialize` to ids, time, and jobs.     |

pub mod error;
pub mod ids;
pub mod job;
pub mod rng;
pub mod time;

#[cfg(test)]
mod tests;

// ── Re-exports ────────────────────────────────────────────────────────────────

pub use error::{CoreError, CoreResult};
pub use ids::{JobId, SourceId, StationId};
pub use job::Job;
pub use rng::{ExponentialVariate, Stream, UniformVariate, Variate, derive_seed};
pub use time::{SimConfig, SimTime};
