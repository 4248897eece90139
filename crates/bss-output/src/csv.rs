//! CSV output backend.
//!
//! Creates two files in the output directory:
//! - `timeseries.csv`
//! - `events.csv`

use std::fs::{self, File};
use std::path::{Path, PathBuf};

use csv::Writer;
use tracing::info;

use crate::writer::TableWriter;
use crate::{EventRow, OutputResult, TimeSeriesRow};

pub const TIME_SERIES_FILE: &str = "timeseries.csv";
pub const EVENTS_FILE: &str = "events.csv";

/// Writes the result tables to two CSV files.
pub struct CsvWriter {
    dir:         PathBuf,
    time_series: Writer<File>,
    events:      Writer<File>,
    rows:        u64,
    finished:    bool,
}

impl CsvWriter {
    /// Create (or truncate) the two CSV files in `dir` and write the header
    /// rows.  `dir` must exist.
    pub fn new(dir: &Path) -> OutputResult<Self> {
        let mut time_series = Writer::from_path(dir.join(TIME_SERIES_FILE))?;
        time_series.write_record([
            "scenario_id",
            "sim_num",
            "time",
            "finished_journeys",
            "failed_starts",
            "failed_ends",
        ])?;

        let mut events = Writer::from_path(dir.join(EVENTS_FILE))?;
        events.write_record(["scenario_id", "sim_num", "time", "event"])?;

        Ok(Self {
            dir: dir.to_path_buf(),
            time_series,
            events,
            rows: 0,
            finished: false,
        })
    }

    /// Writer for `<root>/<scenario_id>/`, creating the directory if needed.
    pub fn for_scenario(root: &Path, scenario_id: &str) -> OutputResult<Self> {
        let dir = root.join(scenario_id);
        fs::create_dir_all(&dir)?;
        Self::new(&dir)
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }
}

impl TableWriter for CsvWriter {
    fn write_time_series(&mut self, rows: &[TimeSeriesRow]) -> OutputResult<()> {
        for row in rows {
            self.time_series.write_record(&[
                row.scenario_id.clone(),
                row.sim_num.to_string(),
                row.time.to_string(),
                row.finished_journeys.to_string(),
                row.failed_starts.to_string(),
                row.failed_ends.to_string(),
            ])?;
        }
        self.rows += rows.len() as u64;
        Ok(())
    }

    fn write_events(&mut self, rows: &[EventRow]) -> OutputResult<()> {
        for row in rows {
            self.events.write_record(&[
                row.scenario_id.clone(),
                row.sim_num.to_string(),
                row.time.to_string(),
                row.event.as_str().to_owned(),
            ])?;
        }
        self.rows += rows.len() as u64;
        Ok(())
    }

    fn finish(&mut self) -> OutputResult<()> {
        if self.finished {
            return Ok(());
        }
        self.finished = true;
        self.time_series.flush()?;
        self.events.flush()?;
        info!(dir = %self.dir.display(), rows = self.rows, "result tables written");
        Ok(())
    }
}
