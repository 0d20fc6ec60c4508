//! `qn-network` — the queue-station / routing subsystem.
//!
//! # Crate layout
//!
//! | Module          | Contents                                                    |
//! |-----------------|-------------------------------------------------------------|
//! | [`scheduler`]   | `Scheduler` capability trait, `EventOwner`                  |
//! | [`trace`]       | `TraceEvent` advisory records                               |
//! | [`routing`]     | `RoutingTable`, `OutputEdge` (descending-probability walk)  |
//! | [`station`]     | `QueueStation`, `StationStats`                              |
//! | [`sink`]        | `Transducer` (terminal absorber)                            |
//! | [`node`]        | `NetworkNode`: `Active` station or `Sink`                   |
//! | [`generator`]   | `Generator` (Poisson arrival source)                        |
//! | [`network`]     | `Network` arena owning every node and generator             |
//! | [`error`]       | `NetworkError`, `NetworkResult<T>`                          |
//!
//! # Ownership model
//!
//! The network is an arbitrary, possibly cyclic, directed graph.  Nodes live
//! in one `Vec` inside [`Network`]; output edges hold `StationId` indices, not
//! references.  Jobs move by value on every hand-off.
//!
//! Stations never talk to the engine directly.  Each operation that may
//! start a service receives a `&mut dyn Scheduler`, through which the
//! station reports `(owner, delay)` pairs and advisory trace records.

pub mod error;
pub mod generator;
pub mod network;
pub mod node;
pub mod routing;
pub mod scheduler;
pub mod sink;
pub mod station;
pub mod trace;

#[cfg(test)]
mod tests;

pub use error::{NetworkError, NetworkResult};
pub use generator::Generator;
pub use network::Network;
pub use node::NetworkNode;
pub use routing::{OutputEdge, RoutingTable};
pub use scheduler::{EventOwner, Scheduler};
pub use sink::Transducer;
pub use station::{QueueStation, StationStats};
pub use trace::TraceEvent;
