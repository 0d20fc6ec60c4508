//! CSV output backend.
//!
//! Creates two files in the configured output directory:
//! - `trace.csv`
//! - `station_summary.csv`

use std::fs::File;
use std::path::Path;

use csv::Writer;

use crate::writer::OutputWriter;
use crate::{OutputResult, SummaryRow, TraceRow};

const TRACE_HEADER: [&str; 9] =
    ["time", "kind", "job", "node", "peer", "duration", "busy", "capacity", "sojourn"];

const SUMMARY_HEADER: [&str; 12] = [
    "name",
    "kind",
    "capacity",
    "service_rate",
    "arrivals",
    "completed",
    "busy",
    "backlog",
    "max_backlog",
    "utilisation",
    "absorbed",
    "mean_sojourn",
];

/// Writes simulation output to two CSV files.
pub struct CsvWriter {
    trace:    Writer<File>,
    summary:  Writer<File>,
    finished: bool,
}

impl CsvWriter {
    /// Open (or create) the two CSV files in `dir` and write the header rows.
    pub fn new(dir: &Path) -> OutputResult<Self> {
        let mut trace = Writer::from_path(dir.join("trace.csv"))?;
        trace.write_record(TRACE_HEADER)?;

        let mut summary = Writer::from_path(dir.join("station_summary.csv"))?;
        summary.write_record(SUMMARY_HEADER)?;

        Ok(Self {
            trace,
            summary,
            finished: false,
        })
    }
}

fn cell<T: ToString>(value: Option<T>) -> String {
    value.map(|v| v.to_string()).unwrap_or_default()
}

impl OutputWriter for CsvWriter {
    fn write_trace(&mut self, rows: &[TraceRow]) -> OutputResult<()> {
        for row in rows {
            self.trace.write_record(&[
                row.time.to_string(),
                row.kind.to_owned(),
                row.job.to_string(),
                row.node.clone(),
                row.peer.clone().unwrap_or_default(),
                cell(row.duration),
                cell(row.busy),
                cell(row.capacity),
                cell(row.sojourn),
            ])?;
        }
        Ok(())
    }

    fn write_summary(&mut self, rows: &[SummaryRow]) -> OutputResult<()> {
        for row in rows {
            self.summary.write_record(&[
                row.name.clone(),
                row.kind.to_owned(),
                cell(row.capacity),
                cell(row.service_rate),
                cell(row.arrivals),
                cell(row.completed),
                cell(row.busy),
                cell(row.backlog),
                cell(row.max_backlog),
                cell(row.utilisation),
                cell(row.absorbed),
                cell(row.mean_sojourn),
            ])?;
        }
        Ok(())
    }

    fn finish(&mut self) -> OutputResult<()> {
        if self.finished {
            return Ok(());
        }
        self.finished = true;
        self.trace.flush()?;
        self.summary.flush()?;
        Ok(())
    }
}
