//! `bss-output` — result tables for bike-share simulation replicas.
//!
//! Two tables are produced per scenario:
//!
//! | File             | Columns                                                                   |
//! |------------------|---------------------------------------------------------------------------|
//! | `timeseries.csv` | `scenario_id, sim_num, time, finished_journeys, failed_starts, failed_ends` |
//! | `events.csv`     | `scenario_id, sim_num, time, event`                                       |
//!
//! Every row carries the scenario identifier and the replica index
//! (`sim_num`) so tables from many replicas and scenarios can be
//! concatenated.
//!
//! # Usage
//!
//! ```rust,ignore
//! use bss_output::{CsvWriter, TableWriter};
//!
//! let mut writer = CsvWriter::for_scenario(Path::new("./output"), "base_5am")?;
//! writer.write_time_series(&rows)?;
//! writer.write_events(&events)?;
//! writer.finish()?;
//! ```

pub mod csv;
pub mod error;
pub mod row;
pub mod writer;

#[cfg(test)]
mod tests;

pub use csv::CsvWriter;
pub use error::{OutputError, OutputResult};
pub use row::{EventRow, TimeSeriesRow};
pub use writer::TableWriter;
