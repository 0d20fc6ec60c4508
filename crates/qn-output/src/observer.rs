//! `TraceOutputObserver<W>`: bridges `SimObserver` to an `OutputWriter`.

use qn_core::SimTime;
use qn_network::{Network, TraceEvent};
use qn_sim::{RunSummary, SimObserver};

use crate::row::{TraceRow, summary_rows};
use crate::writer::OutputWriter;
use crate::{OutputError, OutputResult};

/// Trace rows buffered before each write.
const BATCH: usize = 1024;

/// A [`SimObserver`] that writes every trace record and the end-of-run
/// station summary to any [`OutputWriter`] backend.
///
/// Errors from the writer are stored internally because `SimObserver`
/// methods have no return value.  After the run returns, check for errors
/// with [`take_error`][Self::take_error].
pub struct TraceOutputObserver<W: OutputWriter> {
    writer:     W,
    nodes:      Vec<String>,
    sources:    Vec<String>,
    pending:    Vec<TraceRow>,
    last_error: Option<OutputError>,
}

impl<W: OutputWriter> TraceOutputObserver<W> {
    pub fn new(writer: W) -> Self {
        Self {
            writer,
            nodes:      Vec::new(),
            sources:    Vec::new(),
            pending:    Vec::with_capacity(BATCH),
            last_error: None,
        }
    }

    /// Take the stored write error (if any) after the run returns.
    ///
    /// Returns `None` if all writes succeeded.
    pub fn take_error(&mut self) -> Option<OutputError> {
        self.last_error.take()
    }

    fn node(&self, index: usize) -> String {
        self.nodes.get(index).cloned().unwrap_or_default()
    }

    fn row(&self, event: &TraceEvent) -> TraceRow {
        let mut row = TraceRow {
            time:     event.time().as_f64(),
            kind:     event.kind(),
            job:      event.job().0,
            node:     String::new(),
            peer:     None,
            duration: None,
            busy:     None,
            capacity: None,
            sojourn:  None,
        };
        match *event {
            TraceEvent::JobCreated { source, entry, .. } => {
                row.node = self.node(entry.index());
                row.peer = self.sources.get(source.index()).cloned();
            }
            TraceEvent::ServiceStarted { station, duration, busy, capacity, .. } => {
                row.node = self.node(station.index());
                row.duration = Some(duration);
                row.busy = Some(busy);
                row.capacity = Some(capacity);
            }
            TraceEvent::JobRouted { station, target, .. } => {
                row.node = self.node(station.index());
                row.peer = Some(self.node(target.index()));
            }
            TraceEvent::JobAbsorbed { sink, sojourn, .. } => {
                row.node = self.node(sink.index());
                row.sojourn = Some(sojourn);
            }
            TraceEvent::JobRetired { station, .. } => {
                row.node = self.node(station.index());
            }
        }
        row
    }

    fn flush_pending(&mut self) {
        if self.pending.is_empty() {
            return;
        }
        let result = self.writer.write_trace(&self.pending);
        self.pending.clear();
        self.store_err(result);
    }

    fn store_err(&mut self, result: OutputResult<()>) {
        if let Err(e) = result {
            // Keep only the first error.
            if self.last_error.is_none() {
                self.last_error = Some(e);
            }
        }
    }
}

impl<W: OutputWriter> SimObserver for TraceOutputObserver<W> {
    fn on_sim_start(&mut self, network: &Network, _end_time: SimTime) {
        self.nodes = network.nodes().iter().map(|n| n.name().to_owned()).collect();
        self.sources = network.generators().iter().map(|g| g.name().to_owned()).collect();
    }

    fn on_trace(&mut self, event: &TraceEvent) {
        let row = self.row(event);
        self.pending.push(row);
        if self.pending.len() >= BATCH {
            self.flush_pending();
        }
    }

    fn on_sim_end(&mut self, _network: &Network, summary: &RunSummary) {
        self.flush_pending();
        let result = self.writer.write_summary(&summary_rows(summary));
        self.store_err(result);
        let result = self.writer.finish();
        self.store_err(result);
    }
}
