//! `bss-sim` — the city world and its tick protocol.
//!
//! # Four-phase tick
//!
//! ```text
//! main_elapse_time(Δt):
//!   ① Move      — every live journey counts down Δt; arrivals dock a bike or
//!                 log a failed end.  Finished journeys are purged afterwards.
//!   ② Demand    — each station (insertion order) proposes journeys for the
//!                 current time-of-day interval; an empty origin logs a
//!                 failed start, otherwise a journey departs.
//!   ③ Reassign  — journeys stuck at a full station head for the nearest
//!                 non-full station with coordinates.
//!   ④ Advance   — the clock moves forward by Δt.
//! ```
//!
//! # Crate layout
//!
//! | Module       | Contents                                               |
//! |--------------|--------------------------------------------------------|
//! | [`journey`]  | `Journey` agent, `JourneyState`, `ARRIVAL_THRESHOLD`   |
//! | [`log`]      | `EventLog`, `EventKind`, `EventCounts`, `Event`        |
//! | [`city`]     | `City` world, `CitySummary`                            |
//! | [`builder`]  | `CityBuilder`                                          |
//! | [`observer`] | `CityObserver`, `NoopObserver`, `ProgressObserver`     |
//!
//! # Quick-start
//!
//! ```rust,ignore
//! use bss_core::SimConfig;
//! use bss_sim::{CityBuilder, NoopObserver};
//!
//! let mut city = CityBuilder::new(SimConfig::default())
//!     .network(network)
//!     .build()?;
//! city.run(&mut NoopObserver)?;
//! println!("{}", city.describe());
//! ```

pub mod builder;
pub mod city;
pub mod error;
pub mod journey;
pub mod log;
pub mod observer;


pub use builder::CityBuilder;
pub use city::{City, CitySummary};
pub use error::{SimError, SimResult};
pub use journey::{ARRIVAL_THRESHOLD, Journey, JourneyState};
pub use log::{Event, EventCounts, EventKind, EventLog};
pub use observer::{CityObserver, NoopObserver, ProgressObserver};
