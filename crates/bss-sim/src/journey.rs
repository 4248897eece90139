//! The journey agent: one bike in transit between two stations.
//!
//! ```text
//!            travel: remaining < ARRIVAL_THRESHOLD
//! InTransit ──────────────────────────────────────► Finished       (destination had room)
//!     ▲               │
//!     │               └───────────────────────────► AwaitingDestination (destination full,
//!     │                                                  │                failed end logged)
//!     └──────────── reassign: nearest non-full ──────────┘
//! ```

use tracing::debug;

use bss_core::{SimRng, StationId, Tick};
use bss_station::{DurationFallback, Network};

use crate::{EventLog, SimResult};

/// A journey whose remaining duration drops below this many minutes has
/// arrived.  Durations are whole minutes, so with whole-minute ticks this is
/// the same as "remaining reached zero".
pub const ARRIVAL_THRESHOLD: f64 = 0.5;

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum JourneyState {
    InTransit,
    /// Arrived at a full station.  Skipped by the move phase until the
    /// reassignment phase finds it a new destination.
    AwaitingDestination,
    Finished,
}

#[derive(Clone, Debug)]
pub struct Journey {
    origin:      StationId,
    destination: StationId,
    remaining:   f64,
    state:       JourneyState,
}

impl Journey {
    /// Undock a bike at `origin` and start riding to `destination`.
    ///
    /// The caller checks `origin` is non-empty first; an empty origin is a
    /// capacity error.
    pub fn depart(
        network:          &mut Network,
        origin:           StationId,
        destination:      StationId,
        duration_minutes: u32,
    ) -> SimResult<Self> {
        network.give_bike(origin)?;
        Ok(Self {
            origin,
            destination,
            remaining: duration_minutes as f64,
            state: JourneyState::InTransit,
        })
    }

    pub fn origin(&self) -> StationId {
        self.origin
    }

    pub fn destination(&self) -> StationId {
        self.destination
    }

    /// Minutes left before arrival.
    pub fn remaining(&self) -> f64 {
        self.remaining
    }

    pub fn state(&self) -> JourneyState {
        self.state
    }

    pub fn is_finished(&self) -> bool {
        self.state == JourneyState::Finished
    }

    pub fn is_awaiting_destination(&self) -> bool {
        self.state == JourneyState::AwaitingDestination
    }

    /// Count down `dt` minutes and handle arrival.
    pub fn travel(&mut self, dt: f64, network: &mut Network, log: &mut EventLog, now: Tick) -> SimResult<()> {
        if self.state != JourneyState::InTransit {
            return Ok(());
        }
        self.remaining -= dt;
        if self.remaining < ARRIVAL_THRESHOLD {
            self.arrive(network, log, now)?;
        }
        Ok(())
    }

    fn arrive(&mut self, network: &mut Network, log: &mut EventLog, now: Tick) -> SimResult<()> {
        if network.try_station(self.destination)?.is_full() {
            log.log_failed_end(now);
            self.state = JourneyState::AwaitingDestination;
        } else {
            network.take_bike(self.destination)?;
            self.state = JourneyState::Finished;
            log.log_finished_journey(now);
        }
        Ok(())
    }

    /// Send an awaiting journey on to the nearest non-full station with
    /// coordinates, drawing a fresh duration from the station it was turned
    /// away from.
    ///
    /// Returns `false` (and stays awaiting) when no station qualifies.
    pub fn reassign(
        &mut self,
        network:  &Network,
        fallback: &DurationFallback,
        rng:      &mut SimRng,
    ) -> SimResult<bool> {
        if self.state != JourneyState::AwaitingDestination {
            return Ok(false);
        }
        let previous = self.destination;
        let Some(next) = network.nearest_available(previous)? else {
            debug!(station = %previous, "no non-full station to reassign to; journey stays blocked");
            return Ok(false);
        };
        let minutes = network
            .try_station(previous)?
            .pick_duration(next, fallback, network.stations(), rng)?;
        self.destination = next;
        self.remaining = minutes as f64;
        self.state = JourneyState::InTransit;
        Ok(true)
    }
}
