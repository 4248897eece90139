//! Scenario compatibility descriptor and the snapshot envelope.
//!
//! Any artefact cached to disk (an initial world, a set of fitted duration
//! parameters) records the `ScenarioParams` it was produced under.  Loading
//! it under a different descriptor is a hard [`CoreError::IncompatibleParams`]
//! error; nothing is ever silently reused.

use std::fs::File;
use std::io::{BufReader, BufWriter, Write};
use std::path::Path;

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

use crate::{CoreError, CoreResult};

/// The filter/configuration parameters a scenario's historical inputs were
/// derived with.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScenarioParams {
    /// First year of journey history used.
    pub min_year: u16,
    /// Width of the demand buckets in minutes.
    pub minute_interval: u32,
    /// Whether journeys after the 2020-03-15 cut-off were excluded.
    pub exclude_covid: bool,
    /// Extra filter clauses applied by the parameter-population collaborator.
    pub additional_filters: String,
}

impl Default for ScenarioParams {
    fn default() -> Self {
        Self {
            min_year:           2015,
            minute_interval:    20,
            exclude_covid:      true,
            additional_filters: String::new(),
        }
    }
}

impl ScenarioParams {
    /// Write the descriptor as pretty JSON (the "last used params" file).
    pub fn write_json(&self, path: &Path) -> CoreResult<()> {
        let mut writer = BufWriter::new(File::create(path)?);
        serde_json::to_writer_pretty(&mut writer, self)?;
        writer.flush()?;
        Ok(())
    }

    pub fn read_json(path: &Path) -> CoreResult<Self> {
        let reader = BufReader::new(File::open(path)?);
        Ok(serde_json::from_reader(reader)?)
    }

    /// `true` if the descriptor stored at `path` equals `self`.
    pub fn is_compatible_with_file(&self, path: &Path) -> CoreResult<bool> {
        Ok(&Self::read_json(path)? == self)
    }

    /// Fail with [`CoreError::IncompatibleParams`] unless the descriptor
    /// stored at `path` equals `self`.
    pub fn ensure_compatible(&self, path: &Path) -> CoreResult<()> {
        let found = Self::read_json(path)?;
        self.ensure_matches(&found)
    }

    /// Fail with [`CoreError::IncompatibleParams`] unless `found == self`.
    pub fn ensure_matches(&self, found: &ScenarioParams) -> CoreResult<()> {
        if found == self {
            Ok(())
        } else {
            Err(CoreError::IncompatibleParams {
                expected: Box::new(self.clone()),
                found:    Box::new(found.clone()),
            })
        }
    }
}

// ── Snapshot ──────────────────────────────────────────────────────────────────

/// A payload tagged with the scenario descriptor it was produced under.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Snapshot<T> {
    pub params:  ScenarioParams,
    pub payload: T,
}

impl<T: Serialize + DeserializeOwned> Snapshot<T> {
    pub fn new(params: ScenarioParams, payload: T) -> Self {
        Self { params, payload }
    }

    /// Serialize the snapshot to `path` as JSON.
    pub fn save(&self, path: &Path) -> CoreResult<()> {
        let mut writer = BufWriter::new(File::create(path)?);
        serde_json::to_writer(&mut writer, self)?;
        writer.flush()?;
        Ok(())
    }

    /// Load the payload stored at `path`, checking its descriptor against
    /// `expected` first.
    pub fn load(path: &Path, expected: &ScenarioParams) -> CoreResult<T> {
        let reader = BufReader::new(File::open(path)?);
        let snapshot: Snapshot<T> = serde_json::from_reader(reader)?;
        expected.ensure_matches(&snapshot.params)?;
        Ok(snapshot.payload)
    }
}
