//! Top-level run configuration.

use serde::{Deserialize, Serialize};

use crate::{CoreError, CoreResult, MINUTES_PER_DAY, Tick};

/// Run configuration shared by a `City` and the replica manager.
///
/// Typically built in the application crate (or loaded from JSON) and passed
/// to the builders.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct SimConfig {
    /// Width in minutes of the time-of-day buckets keying the historical
    /// parameter tables.  Default: 20.
    pub interval_minutes: u32,

    /// Minutes elapsed per tick.  Default: 1.
    pub tick_minutes: u32,

    /// Ticks per replica.  Default: 1,440 (24 h at one minute per tick).
    pub total_ticks: u64,

    /// Master RNG seed.  The same seed always produces identical results.
    pub seed: u64,

    /// Worker thread count passed to Rayon when replicas run in parallel.
    /// `None` uses all logical cores.
    pub num_threads: Option<usize>,

    /// Log replica progress every N ticks.  0 disables progress logging.
    pub progress_interval_ticks: u64,
}

impl Default for SimConfig {
    fn default() -> Self {
        Self {
            interval_minutes:        20,
            tick_minutes:            1,
            total_ticks:             MINUTES_PER_DAY,
            seed:                    0,
            num_threads:             None,
            progress_interval_ticks: 60,
        }
    }
}

impl SimConfig {
    /// Reject settings the tick loop cannot run with.
    pub fn validate(&self) -> CoreResult<()> {
        if self.interval_minutes == 0 {
            return Err(CoreError::Config("interval_minutes must be at least 1".into()));
        }
        if self.tick_minutes == 0 {
            return Err(CoreError::Config("tick_minutes must be at least 1".into()));
        }
        if self.num_threads == Some(0) {
            return Err(CoreError::Config("num_threads must be at least 1 when set".into()));
        }
        Ok(())
    }

    /// Simulated minute at which a replica ends (exclusive upper bound).
    #[inline]
    pub fn end_tick(&self) -> Tick {
        Tick(self.total_ticks * self.tick_minutes as u64)
    }
}
