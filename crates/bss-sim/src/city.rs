//! The `City` world and its tick protocol.

use std::fmt;
use std::path::Path;

use serde::Serialize;

use bss_core::{IntervalKey, ScenarioParams, SimClock, SimConfig, SimRng, Snapshot, StationId, Tick, WarehouseId};
use bss_station::{DurationFallback, Network, NetworkSetup, Station, Warehouse};

use crate::{CityBuilder, CityObserver, EventLog, Journey, SimResult};

// ── City ──────────────────────────────────────────────────────────────────────

/// Owns every station, warehouse and live journey, the clock, the RNG and
/// the event log.
///
/// `Clone` is a full value copy: a cloned city shares no station, warehouse,
/// journey or RNG state with the original.
///
/// Create via [`CityBuilder`].
#[derive(Clone, Debug)]
pub struct City {
    config:      SimConfig,
    network:     Network,
    journeys:    Vec<Journey>,
    log:         EventLog,
    rng:         SimRng,
    clock:       SimClock,
    fallback:    DurationFallback,
}

impl City {
    pub(crate) fn from_parts(config: SimConfig, network: Network, fallback: DurationFallback) -> Self {
        Self {
            rng: SimRng::new(config.seed),
            config,
            network,
            journeys: Vec::new(),
            log: EventLog::new(),
            clock: SimClock::new(),
            fallback,
        }
    }

    /// Load a city whose stations and warehouses were saved with
    /// [`save_snapshot`](Self::save_snapshot), refusing a snapshot taken
    /// under a different `ScenarioParams`.
    pub fn load_snapshot(path: &Path, expected: &ScenarioParams, config: SimConfig) -> SimResult<Self> {
        let setup: NetworkSetup = Snapshot::load(path, expected)?;
        let network = Network::from_setup(setup)?;
        CityBuilder::new(config).network(network).build()
    }

    /// Save the current stations and warehouses (not journeys or the log)
    /// tagged with `params`.
    pub fn save_snapshot(&self, path: &Path, params: &ScenarioParams) -> SimResult<()> {
        Snapshot::new(params.clone(), self.network.to_setup()).save(path)?;
        Ok(())
    }

    // ── Running ───────────────────────────────────────────────────────────

    /// Run from the current tick to `config.end_tick()`.
    pub fn run<O: CityObserver>(&mut self, observer: &mut O) -> SimResult<()> {
        let end = self.config.end_tick();
        while self.clock.now() < end {
            self.step(observer)?;
        }
        observer.on_run_end(self.clock.now(), &self.log.totals());
        Ok(())
    }

    /// Run exactly `n` ticks from the current position, ignoring `end_tick`.
    pub fn run_ticks<O: CityObserver>(&mut self, n: u64, observer: &mut O) -> SimResult<()> {
        for _ in 0..n {
            self.step(observer)?;
        }
        Ok(())
    }

    fn step<O: CityObserver>(&mut self, observer: &mut O) -> SimResult<()> {
        let now = self.clock.now();
        observer.on_tick_start(now);
        self.main_elapse_time(self.config.tick_minutes)?;
        observer.on_tick_end(now, self.journeys.len(), &self.log.totals());
        Ok(())
    }

    /// Advance the world by `dt` minutes: move, demand, reassign, then
    /// advance the clock.
    pub fn main_elapse_time(&mut self, dt: u32) -> SimResult<()> {
        let now = self.clock.now();
        self.move_agents(dt as f64, now)?;
        self.demand_phase(dt, now)?;
        self.call_for_new_destinations()?;
        self.clock.advance(dt as u64);
        self.log.extend_to(self.clock.now());
        Ok(())
    }

    /// ① Every live journey travels; finished ones are purged only after all
    /// have moved.
    pub(crate) fn move_agents(&mut self, dt: f64, now: Tick) -> SimResult<()> {
        for journey in &mut self.journeys {
            journey.travel(dt, &mut self.network, &mut self.log, now)?;
        }
        self.journeys.retain(|j| !j.is_finished());
        Ok(())
    }

    /// ② Stations propose journeys for the current interval, in insertion
    /// order.
    fn demand_phase(&mut self, dt: u32, now: Tick) -> SimResult<()> {
        let interval = IntervalKey::containing(now, self.config.interval_minutes);
        for slot in 0..self.network.len() {
            let stations = self.network.stations();
            let proposals = stations[slot].decide_journey_demand(
                interval,
                dt as f64,
                stations,
                &self.fallback,
                &mut self.rng,
            )?;
            for p in proposals {
                self.generate_journey(p.origin, p.destination, p.duration_minutes)?;
            }
        }
        Ok(())
    }

    /// ③ Journeys turned away from a full station look for a new one.
    pub(crate) fn call_for_new_destinations(&mut self) -> SimResult<()> {
        for journey in &mut self.journeys {
            if journey.is_awaiting_destination() {
                journey.reassign(&self.network, &self.fallback, &mut self.rng)?;
            }
        }
        Ok(())
    }

    /// Start a journey from `origin`, or log a failed start if it has no bike.
    /// Returns whether a journey departed.
    pub fn generate_journey(
        &mut self,
        origin:           StationId,
        destination:      StationId,
        duration_minutes: u32,
    ) -> SimResult<bool> {
        if self.network.try_station(origin)?.is_empty() {
            self.log_failed_start();
            return Ok(false);
        }
        let journey = Journey::depart(&mut self.network, origin, destination, duration_minutes)?;
        self.journeys.push(journey);
        Ok(true)
    }

    // ── Event log ─────────────────────────────────────────────────────────

    pub fn log_finished_journey(&mut self) {
        self.log.log_finished_journey(self.clock.now());
    }

    pub fn log_failed_start(&mut self) {
        self.log.log_failed_start(self.clock.now());
    }

    pub fn log_failed_end(&mut self) {
        self.log.log_failed_end(self.clock.now());
    }

    pub fn log(&self) -> &EventLog {
        &self.log
    }

    // ── Accessors ─────────────────────────────────────────────────────────

    pub fn config(&self) -> &SimConfig {
        &self.config
    }

    pub fn now(&self) -> Tick {
        self.clock.now()
    }

    pub fn clock(&self) -> &SimClock {
        &self.clock
    }

    pub fn network(&self) -> &Network {
        &self.network
    }

    pub fn station(&self, id: StationId) -> Option<&Station> {
        self.network.station(id)
    }

    /// For scenario adjustment (forcing a station full or empty, resizing).
    pub fn station_mut(&mut self, id: StationId) -> Option<&mut Station> {
        self.network.station_mut(id)
    }

    pub fn warehouse(&self, id: WarehouseId) -> Option<&Warehouse> {
        self.network.warehouse(id)
    }

    pub fn warehouse_mut(&mut self, id: WarehouseId) -> Option<&mut Warehouse> {
        self.network.warehouse_mut(id)
    }

    /// Journeys currently on the road (including blocked ones).
    pub fn journeys(&self) -> &[Journey] {
        &self.journeys
    }

    pub fn fallback(&self) -> &DurationFallback {
        &self.fallback
    }

    pub fn set_fallback(&mut self, fallback: DurationFallback) {
        self.fallback = fallback;
    }

    /// Replace the RNG with a fresh one seeded from `seed`.
    pub fn reseed(&mut self, seed: u64) {
        self.rng = SimRng::new(seed);
    }

    /// Bikes and docks across the city.
    pub fn describe(&self) -> CitySummary {
        let stations = self.network.stations();
        let warehouses = self.network.warehouses();
        CitySummary {
            station_count:         stations.len(),
            warehouse_count:       warehouses.len(),
            station_bikes:         stations.iter().map(|s| s.docked() as u64).sum(),
            station_docks:         stations.iter().map(|s| s.capacity() as u64).sum(),
            warehouse_bikes:       warehouses.iter().map(|w| w.store().docked() as u64).sum(),
            warehouse_docks:       warehouses.iter().map(|w| w.store().capacity() as u64).sum(),
            largest_station_docks: stations.iter().map(Station::capacity).max(),
            bikes_in_transit:      self.journeys.len() as u64,
        }
    }
}

// ── CitySummary ───────────────────────────────────────────────────────────────

#[derive(Copy, Clone, Debug, PartialEq, Serialize)]
pub struct CitySummary {
    pub station_count:         usize,
    pub warehouse_count:       usize,
    pub station_bikes:         u64,
    pub station_docks:         u64,
    pub warehouse_bikes:       u64,
    pub warehouse_docks:       u64,
    pub largest_station_docks: Option<u32>,
    pub bikes_in_transit:      u64,
}

impl CitySummary {
    /// Docked bikes, stations and warehouses combined (bikes in transit
    /// excluded).
    pub fn total_bikes(&self) -> u64 {
        self.station_bikes + self.warehouse_bikes
    }

    pub fn total_docks(&self) -> u64 {
        self.station_docks + self.warehouse_docks
    }

    /// Share of station docks holding a bike; `None` for a city without
    /// stations.
    pub fn station_availability(&self) -> Option<f64> {
        (self.station_docks > 0).then(|| self.station_bikes as f64 / self.station_docks as f64)
    }

    pub fn total_availability(&self) -> Option<f64> {
        let docks = self.total_docks();
        (docks > 0).then(|| self.total_bikes() as f64 / docks as f64)
    }
}

impl fmt::Display for CitySummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let ratio = |r: Option<f64>| r.map_or_else(|| "n/a".to_string(), |r| format!("{r:.2}"));
        writeln!(f, "city has a total of {} docked bikes:", self.total_bikes())?;
        writeln!(f, "    {} docked at {} stations", self.station_bikes, self.station_count)?;
        writeln!(f, "    {} stored in {} warehouses", self.warehouse_bikes, self.warehouse_count)?;
        writeln!(f, "and a total of {} docks:", self.total_docks())?;
        writeln!(f, "    {} in stations", self.station_docks)?;
        writeln!(f, "    {} in warehouses", self.warehouse_docks)?;
        writeln!(f, "station normalised availability: {}", ratio(self.station_availability()))?;
        writeln!(f, "total normalised availability: {}", ratio(self.total_availability()))?;
        match self.largest_station_docks {
            Some(docks) => writeln!(f, "the largest station has {docks} docks")?,
            None => writeln!(f, "the city has no stations")?,
        }
        write!(f, "{} bikes are in transit", self.bikes_in_transit)
    }
}
