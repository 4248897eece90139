//! Historical parameter tables attached to a station.
//!
//! Three tables drive a station's demand model:
//!
//! | Table                  | Key                 | Value                                   |
//! |------------------------|---------------------|-----------------------------------------|
//! | demand rate            | `IntervalKey`       | mean journeys per minute                |
//! | destination weights    | `IntervalKey`       | destination ids + historical counts     |
//! | duration params        | destination id      | fitted Gumbel `(location, scale)`       |

use std::collections::BTreeMap;

use rand::Rng;
use rand::distributions::WeightedIndex;
use rand_distr::Gumbel;
use serde::{Deserialize, Serialize};

use bss_core::{IntervalKey, SimRng, StationId};

use crate::{Station, StationError, StationResult};

/// Shortest journey a duration draw can produce, in minutes.
pub const MIN_JOURNEY_MINUTES: u32 = 1;

// ── GumbelParams ──────────────────────────────────────────────────────────────

/// Right-skewed Gumbel fit of journey durations (minutes) for one
/// origin/destination pair.  Serialized as `[location, scale]`.
#[derive(Copy, Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "(f64, f64)", into = "(f64, f64)")]
pub struct GumbelParams {
    location: f64,
    scale:    f64,
}

impl GumbelParams {
    /// Requires a finite location and a finite, strictly positive scale.
    pub fn new(location: f64, scale: f64) -> StationResult<Self> {
        if !location.is_finite() || !scale.is_finite() || scale <= 0.0 {
            return Err(StationError::Config(format!(
                "invalid Gumbel parameters (location {location}, scale {scale})"
            )));
        }
        Ok(Self { location, scale })
    }

    #[inline]
    pub fn location(&self) -> f64 {
        self.location
    }

    #[inline]
    pub fn scale(&self) -> f64 {
        self.scale
    }

    /// Draw one raw duration in minutes.
    pub fn sample(&self, rng: &mut SimRng) -> StationResult<f64> {
        let dist = Gumbel::new(self.location, self.scale)
            .map_err(|e| StationError::Config(format!("Gumbel distribution: {e}")))?;
        Ok(rng.inner().sample(dist))
    }

    /// Draw a duration rounded to whole minutes, floored at
    /// [`MIN_JOURNEY_MINUTES`].
    pub fn sample_minutes(&self, rng: &mut SimRng) -> StationResult<u32> {
        let minutes = self.sample(rng)?.round();
        Ok(minutes.max(MIN_JOURNEY_MINUTES as f64) as u32)
    }
}

impl TryFrom<(f64, f64)> for GumbelParams {
    type Error = StationError;

    fn try_from((location, scale): (f64, f64)) -> StationResult<Self> {
        GumbelParams::new(location, scale)
    }
}

impl From<GumbelParams> for (f64, f64) {
    fn from(p: GumbelParams) -> (f64, f64) {
        (p.location, p.scale)
    }
}

// ── DestinationWeights ────────────────────────────────────────────────────────

/// Empirical categorical distribution over destinations: parallel lists of
/// station ids and historical journey counts.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct DestinationWeights {
    destinations: Vec<StationId>,
    journeys:     Vec<u32>,
}

impl DestinationWeights {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append one destination with its historical journey count.
    pub fn push(&mut self, destination: StationId, journeys: u32) {
        self.destinations.push(destination);
        self.journeys.push(journeys);
    }

    pub fn destinations(&self) -> &[StationId] {
        &self.destinations
    }

    pub fn journeys(&self) -> &[u32] {
        &self.journeys
    }

    /// Count recorded for `destination`, if present.
    pub fn journeys_to(&self, destination: StationId) -> Option<u32> {
        self.destinations
            .iter()
            .position(|&d| d == destination)
            .map(|i| self.journeys[i])
    }

    pub fn len(&self) -> usize {
        self.destinations.len()
    }

    pub fn is_empty(&self) -> bool {
        self.destinations.is_empty()
    }

    /// Weighted draw of one destination.  `None` when the table is empty or
    /// every count is zero.
    pub fn sample(&self, rng: &mut SimRng) -> Option<StationId> {
        let index = WeightedIndex::new(self.journeys.iter().map(|&j| j as u64)).ok()?;
        Some(self.destinations[rng.inner().sample(index)])
    }
}

// ── StationParams ─────────────────────────────────────────────────────────────

/// The three parameter tables of one station.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct StationParams {
    demand:       BTreeMap<IntervalKey, f64>,
    destinations: BTreeMap<IntervalKey, DestinationWeights>,
    durations:    BTreeMap<StationId, GumbelParams>,
}

impl StationParams {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the mean journeys per minute for `interval`.
    pub fn set_demand_rate(&mut self, interval: IntervalKey, rate: f64) -> StationResult<()> {
        if !rate.is_finite() || rate < 0.0 {
            return Err(StationError::Config(format!(
                "demand rate for interval {interval} must be a non-negative number, {rate} was given"
            )));
        }
        self.demand.insert(interval, rate);
        Ok(())
    }

    /// Mean journeys per minute for `interval`, or zero for an unseen interval.
    pub fn demand_rate(&self, interval: IntervalKey) -> f64 {
        self.demand.get(&interval).copied().unwrap_or(0.0)
    }

    /// Append a destination/count pair to the table for `interval`.
    /// Whether any interval has a positive demand rate.
    pub fn has_demand(&self) -> bool {
        self.demand.values().any(|&rate| rate > 0.0)
    }

    pub fn add_destination_volume(&mut self, interval: IntervalKey, destination: StationId, journeys: u32) {
        self.destinations.entry(interval).or_default().push(destination, journeys);
    }

    pub fn destination_weights(&self, interval: IntervalKey) -> Option<&DestinationWeights> {
        self.destinations.get(&interval)
    }

    pub fn set_duration_params(&mut self, destination: StationId, params: GumbelParams) {
        self.durations.insert(destination, params);
    }

    pub fn duration_params(&self, destination: StationId) -> Option<&GumbelParams> {
        self.durations.get(&destination)
    }

    pub fn durations(&self) -> &BTreeMap<StationId, GumbelParams> {
        &self.durations
    }

    /// Replace the whole duration table (used by the duration cache).
    pub fn replace_durations(&mut self, durations: BTreeMap<StationId, GumbelParams>) {
        self.durations = durations;
    }

    /// Every station id referenced by a destination table.
    pub fn referenced_destinations(&self) -> impl Iterator<Item = StationId> + '_ {
        self.destinations.values().flat_map(|w| w.destinations().iter().copied())
    }

    /// Re-check the invariants that deserialization cannot enforce.
    pub(crate) fn validate(&self) -> StationResult<()> {
        for (interval, &rate) in &self.demand {
            if !rate.is_finite() || rate < 0.0 {
                return Err(StationError::Config(format!(
                    "demand rate for interval {interval} is {rate}"
                )));
            }
        }
        for (interval, weights) in &self.destinations {
            if weights.destinations.len() != weights.journeys.len() {
                return Err(StationError::Config(format!(
                    "destination table for interval {interval} has {} ids but {} counts",
                    weights.destinations.len(),
                    weights.journeys.len()
                )));
            }
        }
        Ok(())
    }
}

// ── DurationFallback ──────────────────────────────────────────────────────────

/// Which duration parameters to use when an origin has none recorded for
/// the requested destination.
#[derive(Clone, Debug, Default, PartialEq)]
pub enum DurationFallback {
    /// Borrow the parameters of a uniformly chosen destination of the same
    /// origin.
    #[default]
    AnyDestination,
    /// Always use these parameters.
    Fixed(GumbelParams),
}

impl DurationFallback {
    /// Pick substitute parameters.  `AnyDestination` draws uniformly from
    /// `durations` (the origin's own table) and, when that is empty, from
    /// every pair recorded anywhere in `city`.  `None` only when no station
    /// has any duration parameters.
    pub fn resolve<'a>(
        &'a self,
        durations: &'a BTreeMap<StationId, GumbelParams>,
        city:      &'a [Station],
        rng:       &mut SimRng,
    ) -> Option<&'a GumbelParams> {
        match self {
            DurationFallback::AnyDestination if durations.is_empty() => any_recorded(city, rng),
            DurationFallback::AnyDestination => {
                let pick = rng.gen_range(0..durations.len());
                durations.values().nth(pick)
            }
            DurationFallback::Fixed(params) => Some(params),
        }
    }
}

/// A uniform draw over every (origin, destination) pair in `city`.
fn any_recorded<'a>(city: &'a [Station], rng: &mut SimRng) -> Option<&'a GumbelParams> {
    let total: usize = city.iter().map(|s| s.params().durations().len()).sum();
    if total == 0 {
        return None;
    }
    let mut pick = rng.gen_range(0..total);
    for station in city {
        let table = station.params().durations();
        if pick < table.len() {
            return table.values().nth(pick);
        }
        pick -= table.len();
    }
    None
}
