//! Station-subsystem error type.

use thiserror::Error;

use bss_core::{CoreError, StationId, WarehouseId};

use crate::{CapacityError, StoreRef};

/// Errors produced by `bss-station`.
#[derive(Debug, Error)]
pub enum StationError {
    /// Invalid construction parameters (capacity, docked count, rates,
    /// distribution parameters).
    #[error("configuration error: {0}")]
    Config(String),

    /// `give_bike`/`take_bike` against an empty/full store.  Never expected
    /// in normal flow: the city checks emptiness and fullness first.
    #[error("{store}: {source}")]
    Capacity {
        store:  StoreRef,
        source: CapacityError,
    },

    #[error("station {0} is already in the network")]
    DuplicateStation(StationId),

    #[error("warehouse {0} is already in the network")]
    DuplicateWarehouse(WarehouseId),

    #[error("station {0} not found")]
    UnknownStation(StationId),

    #[error("warehouse {0} not found")]
    UnknownWarehouse(WarehouseId),

    #[error("station {0} has no duration parameters to fall back on")]
    NoDurationParams(StationId),

    #[error("parse error: {0}")]
    Parse(String),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Core(#[from] CoreError),
}

pub type StationResult<T> = Result<T, StationError>;
