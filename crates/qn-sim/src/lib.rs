//! `qn-sim` — the event-ordered engine that drives a `qn-network`.
//!
//! # Crate layout
//!
//! | Module          | Contents                                                   |
//! |-----------------|------------------------------------------------------------|
//! | [`queue`]       | `EventQueue`, ordered by `(time, seq)`                     |
//! | [`engine`]      | `Engine` state machine, `Simulation`                       |
//! | [`observer`]    | `SimObserver`, `NoopObserver`, `TracingObserver`, …       |
//! | [`summary`]     | `RunSummary`, `StationSummary`, `SinkSummary`              |
//! | [`topology`]    | `TopologyConfig` (serde / JSON)                            |
//! | [`builder`]     | `SimBuilder` fluent construction                           |
//! | [`error`]       | `SimError`, `SimResult<T>`                                 |
//!
//! # Quick-start
//!
//! ```rust,ignore
//! use qn_core::SimConfig;
//! use qn_sim::{SimBuilder, TracingObserver};
//!
//! let mut sim = SimBuilder::new(SimConfig::new(100.0, Some(1)))
//!     .station("server", 1, 2.0)
//!     .sink("exit")
//!     .generator("arrivals", 1.0, "server")
//!     .edge("server", "exit", 1.0)
//!     .build()?;
//! let summary = sim.run(&mut TracingObserver::new())?;
//! assert!(summary.is_conserved());
//! ```

pub mod builder;
pub mod engine;
pub mod error;
pub mod observer;
pub mod queue;
pub mod summary;
pub mod topology;


pub use builder::SimBuilder;
pub use engine::{Engine, EngineState, Simulation};
pub use error::{SimError, SimResult};
pub use observer::{NoopObserver, RecordingObserver, SimObserver, TracingObserver};
pub use queue::EventQueue;
pub use summary::{RunSummary, SinkSummary, StationSummary};
pub use topology::{EdgeSpec, GeneratorSpec, SinkSpec, StationSpec, TopologyConfig};
