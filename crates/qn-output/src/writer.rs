//! The `OutputWriter` trait implemented by backend writers.

use crate::{OutputResult, SummaryRow, TraceRow};

/// A sink for trace rows and end-of-run summary rows.
///
/// The observer never propagates these errors through the engine; it stores
/// them for [`TraceOutputObserver::take_error`][crate::TraceOutputObserver::take_error].
pub trait OutputWriter {
    /// Write a batch of trace rows, in event order.
    fn write_trace(&mut self, rows: &[TraceRow]) -> OutputResult<()>;

    /// Write one summary row per network node.
    fn write_summary(&mut self, rows: &[SummaryRow]) -> OutputResult<()>;

    /// Flush and close all underlying file handles.
    ///
    /// Idempotent: safe to call more than once.
    fn finish(&mut self) -> OutputResult<()>;
}
