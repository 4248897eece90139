//! Plain data row types written by output backends.

use bss_sim::{Event, EventCounts, EventKind};

/// Event counts for one simulated minute of one replica.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TimeSeriesRow {
    pub scenario_id:       String,
    pub sim_num:           usize,
    /// Simulated minute since the start of the run.
    pub time:              u64,
    pub finished_journeys: u64,
    pub failed_starts:     u64,
    pub failed_ends:       u64,
}

impl TimeSeriesRow {
    pub fn new(scenario_id: &str, sim_num: usize, time: u64, counts: &EventCounts) -> Self {
        Self {
            scenario_id:       scenario_id.to_owned(),
            sim_num,
            time,
            finished_journeys: counts.finished_journeys,
            failed_starts:     counts.failed_starts,
            failed_ends:       counts.failed_ends,
        }
    }

    /// Tag a replica's whole per-minute series; row `i` is minute `i`.
    pub fn tag_series(scenario_id: &str, sim_num: usize, series: &[EventCounts]) -> Vec<Self> {
        series
            .iter()
            .enumerate()
            .map(|(minute, counts)| Self::new(scenario_id, sim_num, minute as u64, counts))
            .collect()
    }

    pub fn counts(&self) -> EventCounts {
        EventCounts {
            finished_journeys: self.finished_journeys,
            failed_starts:     self.failed_starts,
            failed_ends:       self.failed_ends,
        }
    }
}

/// One logged event of one replica.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EventRow {
    pub scenario_id: String,
    pub sim_num:     usize,
    pub time:        u64,
    pub event:       EventKind,
}

impl EventRow {
    /// Tag a replica's chronological event list.
    pub fn tag_events(scenario_id: &str, sim_num: usize, events: &[Event]) -> Vec<Self> {
        events
            .iter()
            .map(|e| Self {
                scenario_id: scenario_id.to_owned(),
                sim_num,
                time:        e.tick.0,
                event:       e.kind,
            })
            .collect()
    }
}
