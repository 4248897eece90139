//! Fluent builder for constructing a [`City`].

use bss_core::{SimConfig, StationId, WarehouseId};
use bss_station::{DurationFallback, Network, Station, Warehouse};

use crate::{City, SimError, SimResult};

/// Fluent builder for [`City`].
///
/// # Inputs
///
/// | Method              | Default                          |
/// |---------------------|----------------------------------|
/// | `.network(n)`       | empty network                    |
/// | `.warehouse(w)`     | none                             |
/// | `.station(s)`       | none                             |
/// | `.link(s, w)`       | stations are not warehoused      |
/// | `.fallback(f)`      | `DurationFallback::AnyDestination` |
/// | `.seed(s)`          | `config.seed`                    |
///
/// Warehouses are added before stations, and links after both, so the call
/// order of the builder methods does not matter.
///
/// # Example
///
/// ```rust,ignore
/// let city = CityBuilder::new(SimConfig::default())
///     .warehouse(Warehouse::new(WarehouseId(1), 300, 150)?)
///     .station(Station::new(StationId(6), 18, 9)?)
///     .link(StationId(6), WarehouseId(1))
///     .build()?;
/// ```
pub struct CityBuilder {
    config:     SimConfig,
    network:    Option<Network>,
    warehouses: Vec<Warehouse>,
    stations:   Vec<Station>,
    links:      Vec<(StationId, WarehouseId)>,
    fallback:   DurationFallback,
}

impl CityBuilder {
    pub fn new(config: SimConfig) -> Self {
        Self {
            config,
            network:    None,
            warehouses: Vec::new(),
            stations:   Vec::new(),
            links:      Vec::new(),
            fallback:   DurationFallback::default(),
        }
    }

    /// Start from an already assembled network (e.g. from
    /// `NetworkFiles::load`).  Stations and warehouses added with the other
    /// methods are appended to it.
    pub fn network(mut self, network: Network) -> Self {
        self.network = Some(network);
        self
    }

    pub fn warehouse(mut self, warehouse: Warehouse) -> Self {
        self.warehouses.push(warehouse);
        self
    }

    pub fn station(mut self, station: Station) -> Self {
        self.stations.push(station);
        self
    }

    pub fn stations(mut self, stations: impl IntoIterator<Item = Station>) -> Self {
        self.stations.extend(stations);
        self
    }

    /// Buffer `station` with `warehouse`.
    pub fn link(mut self, station: StationId, warehouse: WarehouseId) -> Self {
        self.links.push((station, warehouse));
        self
    }

    pub fn fallback(mut self, fallback: DurationFallback) -> Self {
        self.fallback = fallback;
        self
    }

    /// Override `config.seed`.
    pub fn seed(mut self, seed: u64) -> Self {
        self.config.seed = seed;
        self
    }

    /// Validate the configuration and the network's referential integrity
    /// and return a city at tick zero.
    pub fn build(self) -> SimResult<City> {
        self.config.validate()?;

        let mut network = self.network.unwrap_or_default();
        for warehouse in self.warehouses {
            network.add_warehouse(warehouse)?;
        }
        for station in self.stations {
            network.add_station(station)?;
        }
        for (station, warehouse) in self.links {
            network.link_warehouse(station, warehouse)?;
        }

        if let Some(&(origin, destination)) = network.dangling_destinations().first() {
            return Err(SimError::Config(format!(
                "{origin} lists destination {destination}, which is not in the city"
            )));
        }

        // A journey needs a duration even when its own pair is unrecorded.
        let stations = network.stations();
        if self.fallback == DurationFallback::AnyDestination
            && stations.iter().all(|s| s.params().durations().is_empty())
        {
            if let Some(busy) = stations.iter().find(|s| s.params().has_demand()) {
                return Err(SimError::Config(format!(
                    "{} has demand but no station has duration parameters; set a fixed fallback",
                    busy.id()
                )));
            }
        }

        Ok(City::from_parts(self.config, network, self.fallback))
    }
}
