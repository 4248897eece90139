//! Simulation time model.
//!
//! # Design
//!
//! Simulated time is an integer count of minutes since the start of the run
//! (`Tick`).  Historical parameters are keyed by time-of-day buckets
//! (`IntervalKey`): with 20-minute granularity the keys are 0, 20, 40, …,
//! 1420.  Using integer minutes keeps bucket arithmetic exact.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Minutes in one simulated day.
pub const MINUTES_PER_DAY: u64 = 1_440;

// ── Tick ─────────────────────────────────────────────────────────────────────

/// An absolute simulation time in minutes since the start of the run.
#[derive(Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Debug, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Tick(pub u64);

impl Tick {
    pub const ZERO: Tick = Tick(0);

    /// Return the tick `n` minutes after `self`.
    #[inline]
    pub fn offset(self, n: u64) -> Tick {
        Tick(self.0 + n)
    }

    /// Minute of the day, wrapping every 24 h.
    #[inline]
    pub fn minute_of_day(self) -> u64 {
        self.0 % MINUTES_PER_DAY
    }
}

impl std::ops::Add<u64> for Tick {
    type Output = Tick;
    #[inline]
    fn add(self, rhs: u64) -> Tick {
        Tick(self.0 + rhs)
    }
}

impl std::ops::Sub for Tick {
    type Output = u64;
    #[inline]
    fn sub(self, rhs: Tick) -> u64 {
        self.0 - rhs.0
    }
}

impl fmt::Display for Tick {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "T{}", self.0)
    }
}

// ── IntervalKey ───────────────────────────────────────────────────────────────

/// Start minute (time of day) of a fixed-width parameter bucket.
#[derive(Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Debug, Serialize, Deserialize)]
#[serde(transparent)]
pub struct IntervalKey(pub u32);

impl IntervalKey {
    /// The bucket containing `tick` for buckets `interval_minutes` wide:
    /// `⌊minute_of_day / size⌋ × size`.
    ///
    /// `interval_minutes` must be non-zero; `SimConfig::validate` and
    /// `CityBuilder` reject zero before a run starts.
    #[inline]
    pub fn containing(tick: Tick, interval_minutes: u32) -> IntervalKey {
        let size = interval_minutes as u64;
        IntervalKey(((tick.minute_of_day() / size) * size) as u32)
    }
}

impl fmt::Display for IntervalKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:02}:{:02}", self.0 / 60, self.0 % 60)
    }
}

// ── SimClock ──────────────────────────────────────────────────────────────────

/// The simulated-time counter owned by a `City`.
///
/// Monotonically increasing; only [`advance`](Self::advance) mutates it.
#[derive(Clone, Debug, Default)]
pub struct SimClock {
    current_tick: Tick,
}

impl SimClock {
    pub fn new() -> Self {
        Self::default()
    }

    #[inline]
    pub fn now(&self) -> Tick {
        self.current_tick
    }

    /// Advance the clock by `minutes`.
    #[inline]
    pub fn advance(&mut self, minutes: u64) {
        self.current_tick = self.current_tick + minutes;
    }

    /// Break elapsed time into (day, hour, minute) components.
    /// Useful for human-readable logging without a datetime library.
    pub fn elapsed_dhm(&self) -> (u64, u32, u32) {
        let total = self.current_tick.0;
        let days = total / MINUTES_PER_DAY;
        let hours = ((total % MINUTES_PER_DAY) / 60) as u32;
        let minutes = (total % 60) as u32;
        (days, hours, minutes)
    }
}

impl fmt::Display for SimClock {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let (d, h, m) = self.elapsed_dhm();
        write!(f, "{} (day {} {:02}:{:02})", self.current_tick, d, h, m)
    }
}
