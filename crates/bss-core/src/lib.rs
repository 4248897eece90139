//! `bss-core` — foundational types for the bike-share simulation.
//!
//! This crate is a dependency of every other `bss-*` crate.  It has no
//! `bss-*` dependencies and few external ones (`rand`, `thiserror`, `serde`,
//! `serde_json`).
//!
//! # What lives here
//!
//! | Module          | Contents                                              |
//! |-----------------|-------------------------------------------------------|
//! | [`ids`]         | `StationId`, `WarehouseId`                            |
//! | [`geo`]         | `GeoPoint`, planar distance with a NaN sentinel       |
//! | [`time`]        | `Tick` (minutes), `IntervalKey`, `SimClock`           |
//! | [`rng`]         | `SimRng` (seedable, cloneable per replica)            |
//! | [`config`]      | `SimConfig`                                           |
//! | [`compat`]      | `ScenarioParams`, `Snapshot<T>`                       |
//! | [`error`]       | `CoreError`, `CoreResult`                             |

pub mod compat;
pub mod config;
pub mod error;
pub mod geo;
pub mod ids;
pub mod rng;
pub mod time;

#[cfg(test)]
mod tests;

// ── Re-exports ────────────────────────────────────────────────────────────────

pub use compat::{ScenarioParams, Snapshot};
pub use config::SimConfig;
pub use error::{CoreError, CoreResult};
pub use geo::GeoPoint;
pub use ids::{StationId, WarehouseId};
pub use rng::SimRng;
pub use time::{IntervalKey, MINUTES_PER_DAY, SimClock, Tick};
