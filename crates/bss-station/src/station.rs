//! Stations (stores with a demand model) and warehouses (plain stores).

use rand::Rng;
use rand_distr::Poisson;
use serde::{Deserialize, Serialize};
use tracing::warn;

use bss_core::{GeoPoint, IntervalKey, SimRng, StationId, WarehouseId};

use crate::{DurationFallback, StationError, StationParams, StationResult, Store};

/// One journey a station wants to start this tick.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct JourneyProposal {
    pub origin:           StationId,
    pub destination:      StationId,
    pub duration_minutes: u32,
}

// ── Station ───────────────────────────────────────────────────────────────────

/// A docking station: a [`Store`] plus the historical tables that drive its
/// demand, and an optional link to a shared warehouse.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Station {
    id:                  StationId,
    name:                Option<String>,
    pub(crate) store:    Store,
    params:              StationParams,
    pub(crate) warehouse: Option<WarehouseId>,
}

impl Station {
    /// A station with empty parameter tables and no coordinates.
    pub fn new(id: StationId, capacity: u32, docked_init: u32) -> StationResult<Self> {
        Ok(Self {
            id,
            name: None,
            store: Store::new(capacity, docked_init)?,
            params: StationParams::default(),
            warehouse: None,
        })
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    pub fn with_location(mut self, location: Option<GeoPoint>) -> Self {
        self.store.set_location(location);
        self
    }

    pub fn with_params(mut self, params: StationParams) -> Self {
        self.params = params;
        self
    }

    // ── Accessors ─────────────────────────────────────────────────────────

    #[inline]
    pub fn id(&self) -> StationId {
        self.id
    }

    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    #[inline]
    pub fn store(&self) -> &Store {
        &self.store
    }

    /// Direct access for scenario adjustment (`set_docked`, `set_capacity`).
    /// Journey traffic must go through `Network::give_bike`/`take_bike` so the
    /// warehouse buffer is honoured.
    #[inline]
    pub fn store_mut(&mut self) -> &mut Store {
        &mut self.store
    }

    pub fn params(&self) -> &StationParams {
        &self.params
    }

    pub fn params_mut(&mut self) -> &mut StationParams {
        &mut self.params
    }

    /// The warehouse this station is buffered by, if any.
    #[inline]
    pub fn warehouse(&self) -> Option<WarehouseId> {
        self.warehouse
    }

    #[inline]
    pub fn is_warehoused(&self) -> bool {
        self.warehouse.is_some()
    }

    #[inline]
    pub fn docked(&self) -> u32 {
        self.store.docked()
    }

    #[inline]
    pub fn capacity(&self) -> u32 {
        self.store.capacity()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.store.is_empty()
    }

    #[inline]
    pub fn is_full(&self) -> bool {
        self.store.is_full()
    }

    #[inline]
    pub fn location(&self) -> Option<GeoPoint> {
        self.store.location()
    }

    pub fn distance_from(&self, other: &Station) -> f64 {
        self.store.distance_from(&other.store)
    }

    // ── Demand model ──────────────────────────────────────────────────────

    /// Propose the journeys starting here during the next `elapsing` minutes.
    ///
    /// 1. Journey count ~ Poisson(`demand_rate[interval] × elapsing`); an
    ///    unseen interval has rate zero and yields no journeys.
    /// 2. Each destination is a weighted draw from the interval's destination
    ///    table.  Without a usable table the draw is uniform over `city` and
    ///    a warning is logged.
    /// 3. Each duration comes from [`pick_duration`](Self::pick_duration).
    ///
    /// Does not touch any store.
    pub fn decide_journey_demand(
        &self,
        interval:     IntervalKey,
        elapsing:     f64,
        city:         &[Station],
        fallback:     &DurationFallback,
        rng:          &mut SimRng,
    ) -> StationResult<Vec<JourneyProposal>> {
        let mean = self.params.demand_rate(interval) * elapsing;
        if mean <= 0.0 || !mean.is_finite() {
            return Ok(Vec::new());
        }
        let poisson = Poisson::new(mean)
            .map_err(|e| StationError::Config(format!("Poisson distribution: {e}")))?;
        let draw: f64 = rng.inner().sample(poisson);
        let n_journeys = draw as usize;

        let weights = self.params.destination_weights(interval);
        let mut warned = false;
        let mut proposals = Vec::with_capacity(n_journeys);

        for _ in 0..n_journeys {
            let sampled = weights.and_then(|w| w.sample(rng));
            let destination = match sampled {
                Some(id) => id,
                None => {
                    if !warned {
                        warn!(
                            station = %self.id,
                            %interval,
                            "unprecedented demand: no destination distribution, choosing uniformly"
                        );
                        warned = true;
                    }
                    rng.choose(city).map(Station::id).ok_or_else(|| {
                        StationError::Config("no stations to choose a destination from".into())
                    })?
                }
            };
            let duration_minutes = self.pick_duration(destination, fallback, city, rng)?;
            proposals.push(JourneyProposal { origin: self.id, destination, duration_minutes });
        }
        Ok(proposals)
    }

    /// Draw a journey duration (whole minutes, at least one) to `destination`.
    ///
    /// An unprecedented destination borrows parameters through `fallback`
    /// and logs a warning.  `city` is the last resort for an origin with no
    /// table of its own.
    pub fn pick_duration(
        &self,
        destination: StationId,
        fallback:    &DurationFallback,
        city:        &[Station],
        rng:         &mut SimRng,
    ) -> StationResult<u32> {
        if let Some(params) = self.params.duration_params(destination) {
            return params.sample_minutes(rng);
        }
        warn!(
            station = %self.id,
            destination = %destination,
            "unprecedented duration: no parameters for destination, using fallback"
        );
        if self.params.durations().is_empty() && matches!(fallback, DurationFallback::AnyDestination) {
            warn!(station = %self.id, "station has no duration parameters, borrowing from the whole city");
        }
        let params = fallback
            .resolve(self.params.durations(), city, rng)
            .copied()
            .ok_or(StationError::NoDurationParams(self.id))?;
        params.sample_minutes(rng)
    }
}

// ── Warehouse ─────────────────────────────────────────────────────────────────

/// A store with no demand model, shared as an overflow/underflow buffer by
/// one or more stations.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Warehouse {
    id:               WarehouseId,
    name:             Option<String>,
    pub(crate) store: Store,
}

impl Warehouse {
    pub fn new(id: WarehouseId, capacity: u32, docked_init: u32) -> StationResult<Self> {
        Ok(Self { id, name: None, store: Store::new(capacity, docked_init)? })
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    #[inline]
    pub fn id(&self) -> WarehouseId {
        self.id
    }

    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    #[inline]
    pub fn store(&self) -> &Store {
        &self.store
    }

    #[inline]
    pub fn store_mut(&mut self) -> &mut Store {
        &mut self.store
    }
}
