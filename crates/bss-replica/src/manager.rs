//! The `SimulationManager`.

use std::path::{Path, PathBuf};

use tracing::info;

use bss_core::{SimRng, Tick};
use bss_output::{CsvWriter, EventRow, TableWriter, TimeSeriesRow};
use bss_sim::{City, EventCounts, ProgressObserver};

use crate::{ReplicaError, ReplicaResult};

/// Tagged tables from one finished replica.
#[derive(Debug, Clone)]
pub struct ReplicaOutcome {
    pub sim_num:     usize,
    pub time_series: Vec<TimeSeriesRow>,
    pub events:      Vec<EventRow>,
    pub totals:      EventCounts,
}

/// Runs `n_simulations` independent replicas of a base city and collects
/// their result tables.
///
/// The base city is never mutated; each replica runs on its own deep clone
/// with its own RNG seeded by
/// [`SimRng::replica_seed`]`(config.seed, sim_num)`.
pub struct SimulationManager {
    base:           City,
    n_simulations:  usize,
    scenario_id:    String,
    time_series:    Vec<TimeSeriesRow>,
    events:         Vec<EventRow>,
    replica_totals: Vec<EventCounts>,
}

impl SimulationManager {
    /// `scenario_id` names the output directory, so it must be a single
    /// non-empty path component.  `base` must not have run yet: every
    /// replica starts at tick zero with an empty log.
    pub fn new(base: City, n_simulations: usize, scenario_id: impl Into<String>) -> ReplicaResult<Self> {
        let scenario_id = scenario_id.into();
        if n_simulations == 0 {
            return Err(ReplicaError::Config("n_simulations must be at least 1".into()));
        }
        if base.now() != Tick::ZERO || !base.log().events().is_empty() {
            return Err(ReplicaError::Config(format!(
                "base city has already run (at {}, {} events logged)",
                base.now(),
                base.log().events().len()
            )));
        }
        if scenario_id.is_empty() || scenario_id.contains(['/', '\\']) || scenario_id == "." || scenario_id == ".." {
            return Err(ReplicaError::Config(format!(
                "scenario id {scenario_id:?} is not a valid directory name"
            )));
        }
        Ok(Self {
            base,
            n_simulations,
            scenario_id,
            time_series: Vec::new(),
            events: Vec::new(),
            replica_totals: Vec::new(),
        })
    }

    pub fn base(&self) -> &City {
        &self.base
    }

    pub fn n_simulations(&self) -> usize {
        self.n_simulations
    }

    pub fn scenario_id(&self) -> &str {
        &self.scenario_id
    }

    /// A fresh copy of the base city, reseeded for replica `sim_num`.
    pub fn replica_world(&self, sim_num: usize) -> City {
        let mut world = self.base.clone();
        world.reseed(SimRng::replica_seed(self.base.config().seed, sim_num as u64));
        world
    }

    /// Run replica `sim_num` to the end of its horizon and tag its tables.
    pub fn run_replica(&self, sim_num: usize) -> ReplicaResult<ReplicaOutcome> {
        info!(scenario = %self.scenario_id, sim_num, "replica started");
        let mut world = self.replica_world(sim_num);
        let mut observer = ProgressObserver::from_config(world.config()).for_replica(sim_num);
        world
            .run(&mut observer)
            .map_err(|source| ReplicaError::Sim { sim_num, source })?;

        let log = world.log();
        Ok(ReplicaOutcome {
            sim_num,
            time_series: TimeSeriesRow::tag_series(&self.scenario_id, sim_num, log.time_series()),
            events:      EventRow::tag_events(&self.scenario_id, sim_num, log.events()),
            totals:      log.totals(),
        })
    }

    /// Run every replica and replace the combined tables with their rows,
    /// ordered by `sim_num`.
    pub fn run_simulations(&mut self) -> ReplicaResult<()> {
        info!(scenario = %self.scenario_id, n = self.n_simulations, "begin simulations");
        let outcomes = self.run_all()?;

        self.time_series.clear();
        self.events.clear();
        self.replica_totals.clear();
        for outcome in outcomes {
            self.time_series.extend(outcome.time_series);
            self.events.extend(outcome.events);
            self.replica_totals.push(outcome.totals);
        }
        info!(
            scenario = %self.scenario_id,
            n = self.n_simulations,
            events = self.events.len(),
            "completed simulations"
        );
        Ok(())
    }

    #[cfg(not(feature = "parallel"))]
    fn run_all(&self) -> ReplicaResult<Vec<ReplicaOutcome>> {
        (0..self.n_simulations).map(|i| self.run_replica(i)).collect()
    }

    #[cfg(feature = "parallel")]
    fn run_all(&self) -> ReplicaResult<Vec<ReplicaOutcome>> {
        use rayon::prelude::*;

        // Indexed collect keeps replica order regardless of completion order.
        let run = || -> ReplicaResult<Vec<ReplicaOutcome>> {
            (0..self.n_simulations)
                .into_par_iter()
                .map(|i| self.run_replica(i))
                .collect()
        };
        match self.base.config().num_threads {
            Some(threads) => rayon::ThreadPoolBuilder::new()
                .num_threads(threads)
                .build()
                .map_err(|e| ReplicaError::Config(format!("thread pool: {e}")))?
                .install(run),
            None => run(),
        }
    }

    // ── Combined tables ───────────────────────────────────────────────────

    /// One row per simulated minute per replica.
    pub fn combined_time_series(&self) -> &[TimeSeriesRow] {
        &self.time_series
    }

    /// Every event of every replica.
    pub fn combined_events(&self) -> &[EventRow] {
        &self.events
    }

    /// Event totals of each replica, indexed by `sim_num`.
    pub fn replica_totals(&self) -> &[EventCounts] {
        &self.replica_totals
    }

    /// Write both combined tables to `writer` and finish it.
    pub fn write_to<W: TableWriter>(&self, writer: &mut W) -> ReplicaResult<()> {
        writer.write_time_series(&self.time_series)?;
        writer.write_events(&self.events)?;
        writer.finish()?;
        Ok(())
    }

    /// Write `<root>/<scenario_id>/timeseries.csv` and `events.csv`.
    /// Returns the scenario directory.
    pub fn write_csv(&self, root: &Path) -> ReplicaResult<PathBuf> {
        let mut writer = CsvWriter::for_scenario(root, &self.scenario_id)?;
        self.write_to(&mut writer)?;
        Ok(writer.dir().to_path_buf())
    }
}
