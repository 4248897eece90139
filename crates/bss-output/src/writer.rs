//! The `TableWriter` trait implemented by backend writers.

use crate::{EventRow, OutputResult, TimeSeriesRow};

/// Sink for the two result tables.
pub trait TableWriter {
    /// Append a batch of per-minute rows.
    fn write_time_series(&mut self, rows: &[TimeSeriesRow]) -> OutputResult<()>;

    /// Append a batch of event rows.
    fn write_events(&mut self, rows: &[EventRow]) -> OutputResult<()>;

    /// Flush and close all underlying file handles.
    ///
    /// Idempotent: later calls are no-ops.
    fn finish(&mut self) -> OutputResult<()>;
}
