//! The station/warehouse arena.
//!
//! # Data layout
//!
//! Stations and warehouses live in two `Vec`s in insertion order; two
//! `FxHashMap`s map operator ids to slots.  Insertion order is the stable,
//! deterministic order used by the demand phase and by nearest-station tie
//! breaking.
//!
//! # Warehouse buffering
//!
//! Give/take on a warehoused station first tries to keep the station one
//! bike away from either edge:
//!
//! ```text
//! give_bike: docked == 1            → pull one bike from the warehouse (if it has one)
//! take_bike: docked == capacity - 1 → push one bike to the warehouse (if it has room)
//! ```
//!
//! Transfers are instantaneous and free.

use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};

use bss_core::{StationId, WarehouseId};

use crate::store::transfer_one;
use crate::{Station, StationError, StationResult, StoreRef, Warehouse};

/// Plain-data form of a [`Network`], suitable for snapshots.  Warehouse links
/// travel inside each `Station`.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct NetworkSetup {
    pub warehouses: Vec<Warehouse>,
    pub stations:   Vec<Station>,
}

/// Owns every station and warehouse of a city.
#[derive(Clone, Debug, Default)]
pub struct Network {
    stations:        Vec<Station>,
    warehouses:      Vec<Warehouse>,
    station_slots:   FxHashMap<StationId, usize>,
    warehouse_slots: FxHashMap<WarehouseId, usize>,
}

impl Network {
    pub fn new() -> Self {
        Self::default()
    }

    /// Rebuild a network from its plain-data form, re-running every
    /// insertion check.
    pub fn from_setup(setup: NetworkSetup) -> StationResult<Self> {
        let mut network = Self::new();
        for warehouse in setup.warehouses {
            network.add_warehouse(warehouse)?;
        }
        for station in setup.stations {
            network.add_station(station)?;
        }
        Ok(network)
    }

    pub fn to_setup(&self) -> NetworkSetup {
        NetworkSetup {
            warehouses: self.warehouses.clone(),
            stations:   self.stations.clone(),
        }
    }

    // ── Insertion ─────────────────────────────────────────────────────────

    /// Add a warehouse.  Ids must be unique.
    pub fn add_warehouse(&mut self, warehouse: Warehouse) -> StationResult<()> {
        let id = warehouse.id();
        if self.warehouse_slots.contains_key(&id) {
            return Err(StationError::DuplicateWarehouse(id));
        }
        warehouse.store.validate()?;
        self.warehouse_slots.insert(id, self.warehouses.len());
        self.warehouses.push(warehouse);
        Ok(())
    }

    /// Add a station.  Ids must be unique; a pre-set warehouse link must
    /// point at a warehouse already in the network.
    pub fn add_station(&mut self, station: Station) -> StationResult<()> {
        let id = station.id();
        if self.station_slots.contains_key(&id) {
            return Err(StationError::DuplicateStation(id));
        }
        station.store.validate()?;
        station.params().validate()?;
        if let Some(w) = station.warehouse {
            if !self.warehouse_slots.contains_key(&w) {
                return Err(StationError::UnknownWarehouse(w));
            }
        }
        self.station_slots.insert(id, self.stations.len());
        self.stations.push(station);
        Ok(())
    }

    /// Make `warehouse` the buffer of `station`.
    pub fn link_warehouse(&mut self, station: StationId, warehouse: WarehouseId) -> StationResult<()> {
        if !self.warehouse_slots.contains_key(&warehouse) {
            return Err(StationError::UnknownWarehouse(warehouse));
        }
        let slot = self.slot(station)?;
        self.stations[slot].warehouse = Some(warehouse);
        Ok(())
    }

    // ── Lookup ────────────────────────────────────────────────────────────

    fn slot(&self, id: StationId) -> StationResult<usize> {
        self.station_slots.get(&id).copied().ok_or(StationError::UnknownStation(id))
    }

    pub fn contains(&self, id: StationId) -> bool {
        self.station_slots.contains_key(&id)
    }

    pub fn station(&self, id: StationId) -> Option<&Station> {
        self.station_slots.get(&id).map(|&i| &self.stations[i])
    }

    pub fn station_mut(&mut self, id: StationId) -> Option<&mut Station> {
        self.station_slots.get(&id).map(|&i| &mut self.stations[i])
    }

    /// Like [`station`](Self::station) but an unknown id is an error.
    pub fn try_station(&self, id: StationId) -> StationResult<&Station> {
        self.slot(id).map(|i| &self.stations[i])
    }

    pub fn warehouse(&self, id: WarehouseId) -> Option<&Warehouse> {
        self.warehouse_slots.get(&id).map(|&i| &self.warehouses[i])
    }

    pub fn warehouse_mut(&mut self, id: WarehouseId) -> Option<&mut Warehouse> {
        self.warehouse_slots.get(&id).map(|&i| &mut self.warehouses[i])
    }

    /// All stations in insertion order.
    pub fn stations(&self) -> &[Station] {
        &self.stations
    }

    /// All stations, mutably, in insertion order.
    pub fn stations_mut(&mut self) -> &mut [Station] {
        &mut self.stations
    }

    /// All warehouses in insertion order.
    pub fn warehouses(&self) -> &[Warehouse] {
        &self.warehouses
    }

    /// Station ids in insertion order.
    pub fn station_ids(&self) -> Vec<StationId> {
        self.stations.iter().map(Station::id).collect()
    }

    pub fn len(&self) -> usize {
        self.stations.len()
    }

    pub fn is_empty(&self) -> bool {
        self.stations.is_empty()
    }

    /// `(origin, destination)` pairs whose destination table names a station
    /// that is not in the network.
    pub fn dangling_destinations(&self) -> Vec<(StationId, StationId)> {
        self.stations
            .iter()
            .flat_map(|s| {
                s.params()
                    .referenced_destinations()
                    .filter(|d| !self.contains(*d))
                    .map(move |d| (s.id(), d))
            })
            .collect()
    }

    // ── Bike traffic ──────────────────────────────────────────────────────

    /// Undock one bike at `id`, pulling from its warehouse first when the
    /// station is down to its last bike.
    pub fn give_bike(&mut self, id: StationId) -> StationResult<()> {
        let slot = self.slot(id)?;
        let station = &mut self.stations[slot];
        if let Some(w) = station.warehouse {
            let w_slot = *self.warehouse_slots.get(&w).ok_or(StationError::UnknownWarehouse(w))?;
            if station.store.docked() == 1 {
                transfer_one(&mut self.warehouses[w_slot].store, &mut station.store);
            }
        }
        station
            .store
            .give_bike()
            .map_err(|source| StationError::Capacity { store: StoreRef::Station(id), source })
    }

    /// Dock one bike at `id`, pushing one to its warehouse first when the
    /// station is one dock away from full.
    pub fn take_bike(&mut self, id: StationId) -> StationResult<()> {
        let slot = self.slot(id)?;
        let station = &mut self.stations[slot];
        if let Some(w) = station.warehouse {
            let w_slot = *self.warehouse_slots.get(&w).ok_or(StationError::UnknownWarehouse(w))?;
            if station.store.docked() + 1 == station.store.capacity() {
                transfer_one(&mut station.store, &mut self.warehouses[w_slot].store);
            }
        }
        station
            .store
            .take_bike()
            .map_err(|source| StationError::Capacity { store: StoreRef::Station(id), source })
    }

    // ── Search ────────────────────────────────────────────────────────────

    /// The non-full station with coordinates closest to `from`.
    ///
    /// Stations without coordinates produce a NaN distance and are never
    /// selected.  Ties go to the station inserted first.  `None` when no
    /// station qualifies (including when `from` itself has no coordinates).
    pub fn nearest_available(&self, from: StationId) -> StationResult<Option<StationId>> {
        let origin = self.try_station(from)?;
        let mut best: Option<(StationId, f64)> = None;
        for candidate in &self.stations {
            if candidate.is_full() || candidate.location().is_none() {
                continue;
            }
            let d = candidate.distance_from(origin);
            if d.is_nan() {
                continue;
            }
            if best.is_none_or(|(_, best_d)| d < best_d) {
                best = Some((candidate.id(), d));
            }
        }
        Ok(best.map(|(id, _)| id))
    }
}
