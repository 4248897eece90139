//! On-disk cache of fitted duration parameters.
//!
//! # Layout
//!
//! ```text
//! <dir>/last_used_params.json   ScenarioParams the cache was built under
//! <dir>/<station_id>.json       {"<destination_id>": [location, scale], ...}
//! ```
//!
//! Fitting duration distributions is expensive, so the fitted parameters are
//! cached per origin station.  A cache built under a different
//! `ScenarioParams` is refused with `CoreError::IncompatibleParams`.

use std::collections::BTreeMap;
use std::fs::{self, File};
use std::io::{BufReader, BufWriter, Write};
use std::path::{Path, PathBuf};

use bss_core::{ScenarioParams, StationId};

use crate::{GumbelParams, Network, StationError, StationResult};

const PARAMS_FILE: &str = "last_used_params.json";

/// A duration-parameter cache directory.
#[derive(Clone, Debug)]
pub struct DurationCache {
    dir: PathBuf,
}

impl DurationCache {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn station_file(&self, id: StationId) -> PathBuf {
        self.dir.join(format!("{}.json", id.get()))
    }

    /// `true` if the cache exists and was built under `params`.
    pub fn is_compatible(&self, params: &ScenarioParams) -> StationResult<bool> {
        let path = self.dir.join(PARAMS_FILE);
        if !path.exists() {
            return Ok(false);
        }
        Ok(params.is_compatible_with_file(&path)?)
    }

    /// Write every station's duration table plus the descriptor.
    pub fn save(&self, params: &ScenarioParams, network: &Network) -> StationResult<()> {
        fs::create_dir_all(&self.dir)?;
        for station in network.stations() {
            let mut writer = BufWriter::new(File::create(self.station_file(station.id()))?);
            serde_json::to_writer(&mut writer, station.params().durations())?;
            writer.flush()?;
        }
        params.write_json(&self.dir.join(PARAMS_FILE))?;
        Ok(())
    }

    /// Replace the duration tables of every station that has a cache file.
    /// Returns the number of stations loaded.
    ///
    /// Fails before touching `network` if the cache was built under a
    /// descriptor other than `expected`.
    pub fn load_into(&self, expected: &ScenarioParams, network: &mut Network) -> StationResult<usize> {
        expected.ensure_compatible(&self.dir.join(PARAMS_FILE))?;
        let mut loaded = 0;
        for station in network.stations_mut() {
            let path = self.station_file(station.id());
            if !path.exists() {
                continue;
            }
            let reader = BufReader::new(File::open(&path)?);
            let table: BTreeMap<StationId, GumbelParams> = serde_json::from_reader(reader)
                .map_err(|e| StationError::Parse(format!("{}: {e}", path.display())))?;
            station.params_mut().replace_durations(table);
            loaded += 1;
        }
        Ok(loaded)
    }
}
