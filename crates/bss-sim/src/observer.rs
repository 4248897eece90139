//! Observer hooks for progress reporting.

use tracing::info;

use bss_core::{SimConfig, Tick};

use crate::EventCounts;

/// Callbacks invoked by [`City::run`][crate::City::run] and
/// [`City::run_ticks`][crate::City::run_ticks].
///
/// All methods have default no-op implementations.
pub trait CityObserver {
    /// Called before the tick starting at `tick` is processed.
    fn on_tick_start(&mut self, _tick: Tick) {}

    /// Called after the tick starting at `tick` completes.
    ///
    /// `live_journeys` is the number of journeys still on the road and
    /// `totals` the running event counts.
    fn on_tick_end(&mut self, _tick: Tick, _live_journeys: usize, _totals: &EventCounts) {}

    /// Called once after the last tick of a run.
    fn on_run_end(&mut self, _final_tick: Tick, _totals: &EventCounts) {}
}

/// A [`CityObserver`] that does nothing.
pub struct NoopObserver;

impl CityObserver for NoopObserver {}

/// Logs running totals at `info` level every `interval` ticks.
#[derive(Clone, Debug)]
pub struct ProgressObserver {
    interval:   u64,
    sim_num:    Option<usize>,
    ticks_seen: u64,
}

impl ProgressObserver {
    /// `interval == 0` disables the per-tick lines; the end-of-run line is
    /// always logged.
    pub fn new(interval: u64) -> Self {
        Self { interval, sim_num: None, ticks_seen: 0 }
    }

    pub fn from_config(config: &SimConfig) -> Self {
        Self::new(config.progress_interval_ticks)
    }

    /// Tag every line with a replica index.
    pub fn for_replica(mut self, sim_num: usize) -> Self {
        self.sim_num = Some(sim_num);
        self
    }
}

impl CityObserver for ProgressObserver {
    fn on_tick_end(&mut self, tick: Tick, live_journeys: usize, totals: &EventCounts) {
        self.ticks_seen += 1;
        if self.interval == 0 || !self.ticks_seen.is_multiple_of(self.interval) {
            return;
        }
        info!(
            sim_num = ?self.sim_num,
            %tick,
            live_journeys,
            finished_journeys = totals.finished_journeys,
            failed_starts = totals.failed_starts,
            failed_ends = totals.failed_ends,
            "progress"
        );
    }

    fn on_run_end(&mut self, final_tick: Tick, totals: &EventCounts) {
        info!(
            sim_num = ?self.sim_num,
            %final_tick,
            finished_journeys = totals.finished_journeys,
            failed_starts = totals.failed_starts,
            failed_ends = totals.failed_ends,
            "run complete"
        );
    }
}
