//! `bss-replica` — independent replicas of one initial city.
//!
//! ```text
//! for sim_num in 0..n_simulations:          (parallel with the `parallel` feature)
//!   world = base.clone()                     full value copy
//!   world.reseed(replica_seed(seed, sim_num))
//!   world.run()                              config.total_ticks ticks
//!   tag time series + events with (scenario_id, sim_num)
//! merge in sim_num order → combined tables → CSV
//! ```
//!
//! # Cargo features
//!
//! | Feature    | Effect                                                        |
//! |------------|---------------------------------------------------------------|
//! | `parallel` | Runs replicas on Rayon (`SimConfig::num_threads` workers).    |

pub mod error;
pub mod manager;

#[cfg(test)]
mod tests;

pub use error::{ReplicaError, ReplicaResult};
pub use manager::{ReplicaOutcome, SimulationManager};
