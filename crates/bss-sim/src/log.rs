//! The city's event log.
//!
//! Every event is one `(tick, kind)` pair appended through [`EventLog::record`],
//! the only mutator.  The same call bumps the per-minute row and the running
//! total, so the three views always agree:
//!
//! ```text
//! Σ time_series[*].kind == totals.kind == events.filter(kind).count()
//! ```

use std::fmt;

use serde::Serialize;

use bss_core::Tick;

/// What happened.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum EventKind {
    FinishedJourney,
    FailedStart,
    FailedEnd,
}

impl EventKind {
    pub const ALL: [EventKind; 3] = [EventKind::FinishedJourney, EventKind::FailedStart, EventKind::FailedEnd];

    /// Column / event name used in exported tables.
    pub fn as_str(self) -> &'static str {
        match self {
            EventKind::FinishedJourney => "finished_journeys",
            EventKind::FailedStart => "failed_starts",
            EventKind::FailedEnd => "failed_ends",
        }
    }
}

impl fmt::Display for EventKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One count per event kind.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Serialize)]
pub struct EventCounts {
    pub finished_journeys: u64,
    pub failed_starts:     u64,
    pub failed_ends:       u64,
}

impl EventCounts {
    pub fn get(&self, kind: EventKind) -> u64 {
        match kind {
            EventKind::FinishedJourney => self.finished_journeys,
            EventKind::FailedStart => self.failed_starts,
            EventKind::FailedEnd => self.failed_ends,
        }
    }

    fn bump(&mut self, kind: EventKind) {
        match kind {
            EventKind::FinishedJourney => self.finished_journeys += 1,
            EventKind::FailedStart => self.failed_starts += 1,
            EventKind::FailedEnd => self.failed_ends += 1,
        }
    }

    pub fn total(&self) -> u64 {
        self.finished_journeys + self.failed_starts + self.failed_ends
    }
}

impl std::ops::AddAssign for EventCounts {
    fn add_assign(&mut self, rhs: EventCounts) {
        self.finished_journeys += rhs.finished_journeys;
        self.failed_starts += rhs.failed_starts;
        self.failed_ends += rhs.failed_ends;
    }
}

/// One entry of the chronological event list.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize)]
pub struct Event {
    pub tick: Tick,
    pub kind: EventKind,
}

/// Chronological event list plus its per-minute and total aggregates.
#[derive(Clone, Debug, Default)]
pub struct EventLog {
    events: Vec<Event>,
    series: Vec<EventCounts>,
    totals: EventCounts,
}

impl EventLog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append one event at `tick`.
    pub fn record(&mut self, tick: Tick, kind: EventKind) {
        self.extend_to(tick + 1);
        self.series[tick.0 as usize].bump(kind);
        self.totals.bump(kind);
        self.events.push(Event { tick, kind });
    }

    pub fn log_finished_journey(&mut self, tick: Tick) {
        self.record(tick, EventKind::FinishedJourney);
    }

    pub fn log_failed_start(&mut self, tick: Tick) {
        self.record(tick, EventKind::FailedStart);
    }

    pub fn log_failed_end(&mut self, tick: Tick) {
        self.record(tick, EventKind::FailedEnd);
    }

    /// Make sure the time series has a (possibly all-zero) row for every
    /// minute before `end`.
    pub fn extend_to(&mut self, end: Tick) {
        let rows = end.0 as usize;
        if self.series.len() < rows {
            self.series.resize(rows, EventCounts::default());
        }
    }

    /// Per-minute counts; row `i` holds the events of minute `i`.
    pub fn time_series(&self) -> &[EventCounts] {
        &self.series
    }

    /// Every event in the order it was logged.
    pub fn events(&self) -> &[Event] {
        &self.events
    }

    pub fn totals(&self) -> EventCounts {
        self.totals
    }
}
