//! `qn-output` — simulation output writers for qnet.
//!
//! | Backend | Files created                          |
//! |---------|----------------------------------------|
//! | CSV     | `trace.csv`, `station_summary.csv`     |
//!
//! Backends implement [`OutputWriter`] and are driven by
//! [`TraceOutputObserver`], which implements `qn_sim::SimObserver`.
//!
//! # Usage
//!
//! ```rust,ignore
//! use qn_output::{CsvWriter, TraceOutputObserver};
//!
//! let writer = CsvWriter::new(Path::new("./output")).unwrap();
//! let mut obs = TraceOutputObserver::new(writer);
//! sim.run(&mut obs).unwrap();
//! obs.take_error().map(|e| eprintln!("output error: {e}"));
//! ```

pub mod csv;
pub mod error;
pub mod observer;
pub mod row;
pub mod writer;


pub use self::csv::CsvWriter;
pub use error::{OutputError, OutputResult};
pub use observer::TraceOutputObserver;
pub use row::{SummaryRow, TraceRow, summary_rows};
pub use writer::OutputWriter;
