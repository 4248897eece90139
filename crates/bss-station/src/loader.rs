//! CSV loaders for the historical parameter tables.
//!
//! # CSV formats
//!
//! ```csv
//! # stations.csv: empty latitude/longitude means "no coordinate"
//! station_id,capacity,common_name,latitude,longitude,docked_init
//! 6,18,"Broadcasting House, Marylebone",51.518117,-0.144228,9
//!
//! # demand.csv: mean journeys per minute per time-of-day interval
//! station_id,interval,rate
//! 6,480,0.12
//!
//! # destinations.csv: historical journey counts per interval
//! station_id,interval,destination_id,journeys
//! 98,240,393,192
//!
//! # durations.csv: fitted Gumbel parameters (minutes)
//! station_id,destination_id,location,scale
//! 393,14,9.163,1.632
//!
//! # warehouses.csv / warehouse_links.csv
//! warehouse_id,capacity,docked_init
//! 1,300,300
//! station_id,warehouse_id
//! 374,1
//! ```
//!
//! Parameter rows whose origin or destination is not a station of the
//! network are skipped; only stations that exist in the set-up table take
//! part in the simulation.

use std::fs::File;
use std::io::Read;
use std::path::{Path, PathBuf};

use serde::Deserialize;

use bss_core::{GeoPoint, IntervalKey, StationId, WarehouseId};

use crate::{GumbelParams, Network, Station, StationError, StationResult, Warehouse};

// ── CSV records ───────────────────────────────────────────────────────────────

#[derive(Deserialize)]
struct StationRecord {
    station_id:  u32,
    capacity:    u32,
    common_name: String,
    latitude:    Option<f64>,
    longitude:   Option<f64>,
    docked_init: u32,
}

#[derive(Deserialize)]
struct DemandRecord {
    station_id: u32,
    interval:   u32,
    rate:       f64,
}

#[derive(Deserialize)]
struct DestinationRecord {
    station_id:     u32,
    interval:       u32,
    destination_id: u32,
    journeys:       u32,
}

#[derive(Deserialize)]
struct DurationRecord {
    station_id:     u32,
    destination_id: u32,
    location:       f64,
    scale:          f64,
}

#[derive(Deserialize)]
struct WarehouseRecord {
    warehouse_id: u16,
    capacity:     u32,
    docked_init:  u32,
}

#[derive(Deserialize)]
struct WarehouseLinkRecord {
    station_id:   u32,
    warehouse_id: u16,
}

// ── File bundle ───────────────────────────────────────────────────────────────

/// Paths of the tables making up one network.
#[derive(Clone, Debug)]
pub struct NetworkFiles {
    pub stations:        PathBuf,
    pub demand:          PathBuf,
    pub destinations:    PathBuf,
    pub durations:       PathBuf,
    pub warehouses:      Option<PathBuf>,
    pub warehouse_links: Option<PathBuf>,
}

impl NetworkFiles {
    /// The conventional file names inside `dir`; warehouse tables are used
    /// only if present.
    pub fn in_dir(dir: &Path) -> Self {
        let optional = |name: &str| Some(dir.join(name)).filter(|p| p.exists());
        Self {
            stations:        dir.join("stations.csv"),
            demand:          dir.join("demand.csv"),
            destinations:    dir.join("destinations.csv"),
            durations:       dir.join("durations.csv"),
            warehouses:      optional("warehouses.csv"),
            warehouse_links: optional("warehouse_links.csv"),
        }
    }

    /// Load every table into a fresh [`Network`].
    pub fn load(&self) -> StationResult<Network> {
        let mut network = Network::new();
        if let Some(path) = &self.warehouses {
            for warehouse in load_warehouses_reader(File::open(path)?)? {
                network.add_warehouse(warehouse)?;
            }
        }
        for station in load_stations_reader(File::open(&self.stations)?)? {
            network.add_station(station)?;
        }
        if let Some(path) = &self.warehouse_links {
            apply_warehouse_links_reader(&mut network, File::open(path)?)?;
        }
        apply_demand_reader(&mut network, File::open(&self.demand)?)?;
        apply_destinations_reader(&mut network, File::open(&self.destinations)?)?;
        apply_durations_reader(&mut network, File::open(&self.durations)?)?;
        Ok(network)
    }
}

// ── Readers ───────────────────────────────────────────────────────────────────

fn parse_err(e: csv::Error) -> StationError {
    StationError::Parse(e.to_string())
}

/// Parse station set-up rows.
pub fn load_stations_reader<R: Read>(reader: R) -> StationResult<Vec<Station>> {
    let mut csv_reader = csv::Reader::from_reader(reader);
    let mut stations = Vec::new();
    for result in csv_reader.deserialize::<StationRecord>() {
        let row = result.map_err(parse_err)?;
        let location = match (row.latitude, row.longitude) {
            (Some(lat), Some(lon)) => Some(GeoPoint::new(lat, lon)),
            _ => None,
        };
        let station = Station::new(StationId(row.station_id), row.capacity, row.docked_init)?
            .with_name(row.common_name)
            .with_location(location);
        stations.push(station);
    }
    Ok(stations)
}

/// Parse warehouse set-up rows.
pub fn load_warehouses_reader<R: Read>(reader: R) -> StationResult<Vec<Warehouse>> {
    let mut csv_reader = csv::Reader::from_reader(reader);
    csv_reader
        .deserialize::<WarehouseRecord>()
        .map(|result| {
            let row = result.map_err(parse_err)?;
            Warehouse::new(WarehouseId(row.warehouse_id), row.capacity, row.docked_init)
        })
        .collect()
}

/// Link stations to warehouses.  Unknown stations or warehouses are errors:
/// a link is explicit scenario configuration, not historical data.
pub fn apply_warehouse_links_reader<R: Read>(network: &mut Network, reader: R) -> StationResult<()> {
    let mut csv_reader = csv::Reader::from_reader(reader);
    for result in csv_reader.deserialize::<WarehouseLinkRecord>() {
        let row = result.map_err(parse_err)?;
        network.link_warehouse(StationId(row.station_id), WarehouseId(row.warehouse_id))?;
    }
    Ok(())
}

/// Fill per-interval demand rates.  Returns the number of rows applied.
pub fn apply_demand_reader<R: Read>(network: &mut Network, reader: R) -> StationResult<usize> {
    let mut csv_reader = csv::Reader::from_reader(reader);
    let mut applied = 0;
    for result in csv_reader.deserialize::<DemandRecord>() {
        let row = result.map_err(parse_err)?;
        if let Some(station) = network.station_mut(StationId(row.station_id)) {
            station.params_mut().set_demand_rate(IntervalKey(row.interval), row.rate)?;
            applied += 1;
        }
    }
    Ok(applied)
}

/// Fill per-interval destination tables.  Returns the number of rows applied.
pub fn apply_destinations_reader<R: Read>(network: &mut Network, reader: R) -> StationResult<usize> {
    let mut csv_reader = csv::Reader::from_reader(reader);
    let mut applied = 0;
    for result in csv_reader.deserialize::<DestinationRecord>() {
        let row = result.map_err(parse_err)?;
        let destination = StationId(row.destination_id);
        if !network.contains(destination) {
            continue;
        }
        if let Some(station) = network.station_mut(StationId(row.station_id)) {
            station
                .params_mut()
                .add_destination_volume(IntervalKey(row.interval), destination, row.journeys);
            applied += 1;
        }
    }
    Ok(applied)
}

/// Fill per-destination duration parameters.  Returns the number of rows
/// applied.
pub fn apply_durations_reader<R: Read>(network: &mut Network, reader: R) -> StationResult<usize> {
    let mut csv_reader = csv::Reader::from_reader(reader);
    let mut applied = 0;
    for result in csv_reader.deserialize::<DurationRecord>() {
        let row = result.map_err(parse_err)?;
        let destination = StationId(row.destination_id);
        if !network.contains(destination) {
            continue;
        }
        if let Some(station) = network.station_mut(StationId(row.station_id)) {
            let params = GumbelParams::new(row.location, row.scale)?;
            station.params_mut().set_duration_params(destination, params);
            applied += 1;
        }
    }
    Ok(applied)
}
