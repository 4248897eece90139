//! `bss-station` — bike storage entities and their parameter tables.
//!
//! # Crate layout
//!
//! | Module        | Contents                                                        |
//! |---------------|-----------------------------------------------------------------|
//! | [`store`]     | `Store` (bounded bike pool), `CapacityError`, `StoreRef`        |
//! | [`params`]    | `GumbelParams`, `DestinationWeights`, `StationParams`, `DurationFallback` |
//! | [`station`]   | `Station`, `Warehouse`, `JourneyProposal`, demand generation    |
//! | [`network`]   | `Network` arena (stations + warehouses), warehouse buffering, nearest-station search |
//! | [`loader`]    | CSV readers for the station / demand / destination / duration tables |
//! | [`cache`]     | `DurationCache`: per-station JSON cache guarded by `ScenarioParams` |
//! | [`error`]     | `StationError`, `StationResult<T>`                              |
//!
//! # Ownership model
//!
//! The [`Network`] owns every station and every warehouse.  A warehoused
//! station only records the `WarehouseId` it is linked to; all give/take
//! traffic goes through the network so the station and its shared warehouse
//! can be borrowed mutably at the same time.  Cloning a `Network` therefore
//! clones each warehouse exactly once and the links keep pointing at the
//! clones.

pub mod cache;
pub mod error;
pub mod loader;
pub mod network;
pub mod params;
pub mod station;
pub mod store;


pub use cache::DurationCache;
pub use error::{StationError, StationResult};
pub use loader::NetworkFiles;
pub use network::{Network, NetworkSetup};
pub use params::{DestinationWeights, DurationFallback, GumbelParams, MIN_JOURNEY_MINUTES, StationParams};
pub use station::{JourneyProposal, Station, Warehouse};
pub use store::{CapacityError, Store, StoreRef};
