//! Event schedule: a min-priority queue of timestamped events plus the logical clock.
//!
//! Timestamps are simulation minutes since midnight. Ordering is total:
//! earliest timestamp first, ties broken by insertion sequence.

use std::cmp::Ordering;
use std::collections::BinaryHeap;

use bevy_ecs::prelude::{Entity, Resource};

use crate::error::{SimError, SimResult};

/// Minutes in one simulated hour.
pub const MINUTES_PER_HOUR: f64 = 60.0;

/// Minutes in one simulated day (default horizon).
pub const MINUTES_PER_DAY: f64 = 24.0 * MINUTES_PER_HOUR;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum EventKind {
    StopArrival,
    VehicleArrival,
    StatsSample,
}

/// Stable handle to the entity that must act. Resolved through the world at dispatch time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EventSubject {
    Stop(Entity),
    Vehicle(Entity),
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Event {
    pub timestamp: f64,
    pub kind: EventKind,
    pub subject: Option<EventSubject>,
    /// Monotonic insertion counter; secondary sort key.
    pub sequence: u64,
}

impl Eq for Event {}

impl Ord for Event {
    fn cmp(&self, other: &Self) -> Ordering {
        // Reverse ordering to make BinaryHeap a min-heap by (timestamp, sequence).
        other
            .timestamp
            .total_cmp(&self.timestamp)
            .then_with(|| other.sequence.cmp(&self.sequence))
    }
}

impl PartialOrd for Event {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

/// The event being dispatched in the current step.
#[derive(Debug, Clone, Copy, Resource)]
pub struct CurrentEvent(pub Event);

#[derive(Debug, Default, Resource)]
pub struct SimulationClock {
    now: f64,
    next_sequence: u64,
    events: BinaryHeap<Event>,
}

impl SimulationClock {
    pub fn now(&self) -> f64 {
        self.now
    }

    /// Push an event at an absolute timestamp.
    pub fn schedule_at(&mut self, timestamp: f64, kind: EventKind, subject: Option<EventSubject>) {
        debug_assert!(
            timestamp.is_finite() && timestamp >= self.now,
            "event timestamp must be finite and >= current time"
        );
        let sequence = self.next_sequence;
        self.next_sequence += 1;
        self.events.push(Event {
            timestamp,
            kind,
            subject,
            sequence,
        });
    }

    /// Push an event `interval` minutes after the current time.
    pub fn schedule_in(&mut self, interval: f64, kind: EventKind, subject: Option<EventSubject>) {
        debug_assert!(interval >= 0.0, "interval must be non-negative");
        self.schedule_at(self.now + interval, kind, subject);
    }

    /// Remove the earliest event and advance the clock to it.
    pub fn pop_next(&mut self) -> SimResult<Event> {
        let event = self
            .events
            .pop()
            .ok_or(SimError::EmptySchedule { now: self.now })?;
        self.now = event.timestamp;
        Ok(event)
    }

    pub fn next_event_time(&self) -> Option<f64> {
        self.events.peek().map(|e| e.timestamp)
    }

    pub fn pending_events(&self) -> usize {
        self.events.len()
    }

    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }

    /// Number of events pending for `kind`. Linear in queue size; meant for checks, not hot paths.
    pub fn pending_of_kind(&self, kind: EventKind) -> usize {
        self.events.iter().filter(|e| e.kind == kind).count()
    }
}
