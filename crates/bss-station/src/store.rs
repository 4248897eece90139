//! The bounded bike pool shared by stations and warehouses.

use std::fmt;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use bss_core::{GeoPoint, StationId, WarehouseId};

use crate::{StationError, StationResult};

/// Raised when a give/take would break `0 <= docked <= capacity`.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Error)]
pub enum CapacityError {
    #[error("bike underflow: no bike docked")]
    Underflow,

    #[error("bike overflow: all {capacity} docks occupied")]
    Overflow { capacity: u32 },
}

/// Identifies the store an error refers to.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum StoreRef {
    Station(StationId),
    Warehouse(WarehouseId),
}

impl fmt::Display for StoreRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StoreRef::Station(id) => write!(f, "station {id}"),
            StoreRef::Warehouse(id) => write!(f, "warehouse {id}"),
        }
    }
}

/// A pool of `capacity` docks, `docked` of which hold a bike.
///
/// Invariant: `1 <= capacity` and `0 <= docked <= capacity`.  Every mutator
/// either preserves it or fails.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Store {
    capacity: u32,
    docked:   u32,
    location: Option<GeoPoint>,
}

impl Store {
    /// Build a store, rejecting `capacity == 0` and `docked_init > capacity`.
    pub fn new(capacity: u32, docked_init: u32) -> StationResult<Self> {
        let store = Self { capacity, docked: docked_init, location: None };
        store.validate()?;
        Ok(store)
    }

    /// An undefined (NaN or infinite) point is stored as `None`.
    pub fn with_location(mut self, location: Option<GeoPoint>) -> Self {
        self.set_location(location);
        self
    }

    pub(crate) fn validate(&self) -> StationResult<()> {
        if self.capacity < 1 {
            return Err(StationError::Config(format!(
                "capacity must be at least 1, {} was given",
                self.capacity
            )));
        }
        if self.docked > self.capacity {
            return Err(StationError::Config(format!(
                "docked count must be between 0 and capacity {}, {} was given",
                self.capacity, self.docked
            )));
        }
        Ok(())
    }

    // ── Accessors ─────────────────────────────────────────────────────────

    #[inline]
    pub fn capacity(&self) -> u32 {
        self.capacity
    }

    #[inline]
    pub fn docked(&self) -> u32 {
        self.docked
    }

    #[inline]
    pub fn free_docks(&self) -> u32 {
        self.capacity - self.docked
    }

    #[inline]
    pub fn location(&self) -> Option<GeoPoint> {
        self.location
    }

    pub fn set_location(&mut self, location: Option<GeoPoint>) {
        self.location = location.and_then(GeoPoint::defined);
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.docked == 0
    }

    #[inline]
    pub fn is_full(&self) -> bool {
        self.docked == self.capacity
    }

    // ── Bike traffic ──────────────────────────────────────────────────────

    /// Undock one bike.
    pub fn give_bike(&mut self) -> Result<(), CapacityError> {
        if self.is_empty() {
            return Err(CapacityError::Underflow);
        }
        self.docked -= 1;
        Ok(())
    }

    /// Dock one bike.
    pub fn take_bike(&mut self) -> Result<(), CapacityError> {
        if self.is_full() {
            return Err(CapacityError::Overflow { capacity: self.capacity });
        }
        self.docked += 1;
        Ok(())
    }

    /// Euclidean distance between the two stores' coordinates; NaN when
    /// either has none.
    pub fn distance_from(&self, other: &Store) -> f64 {
        GeoPoint::distance_opt(self.location, other.location)
    }

    // ── Scenario adjustment ───────────────────────────────────────────────

    /// Overwrite the docked count (e.g. to force a full or empty station).
    pub fn set_docked(&mut self, docked: u32) -> StationResult<()> {
        if docked > self.capacity {
            return Err(StationError::Config(format!(
                "docked count {docked} exceeds capacity {}",
                self.capacity
            )));
        }
        self.docked = docked;
        Ok(())
    }

    /// Overwrite the capacity; it may not drop below the docked count.
    pub fn set_capacity(&mut self, capacity: u32) -> StationResult<()> {
        if capacity < 1 || capacity < self.docked {
            return Err(StationError::Config(format!(
                "capacity {capacity} must be at least 1 and at least the docked count {}",
                self.docked
            )));
        }
        self.capacity = capacity;
        Ok(())
    }
}

/// Move one bike from `from` to `to` if `from` has one and `to` has room.
/// Returns whether a bike moved.
pub(crate) fn transfer_one(from: &mut Store, to: &mut Store) -> bool {
    if from.is_empty() || to.is_full() {
        return false;
    }
    from.docked -= 1;
    to.docked += 1;
    true
}
