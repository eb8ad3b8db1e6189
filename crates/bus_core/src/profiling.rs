//! Event processing metrics: counts by kind and wall-clock throughput.

use std::collections::HashMap;
use std::time::Instant;

use bevy_ecs::prelude::Resource;

use crate::clock::EventKind;

#[derive(Debug, Default, Resource)]
pub struct EventMetrics {
    /// Total events processed.
    pub events_processed: u64,
    /// Start time for rate calculation.
    pub start_time: Option<Instant>,
    pub events_by_kind: HashMap<EventKind, u64>,
}

impl EventMetrics {
    pub fn record_event(&mut self, kind: EventKind) {
        if self.start_time.is_none() {
            self.start_time = Some(Instant::now());
        }
        self.events_processed += 1;
        *self.events_by_kind.entry(kind).or_insert(0) += 1;
    }

    pub fn count(&self, kind: EventKind) -> u64 {
        self.events_by_kind.get(&kind).copied().unwrap_or(0)
    }

    /// Events per wall-clock second since the first recorded event.
    pub fn events_per_second(&self) -> f64 {
        match self.start_time {
            Some(start) => {
                let elapsed = start.elapsed().as_secs_f64();
                if elapsed > 0.0 {
                    self.events_processed as f64 / elapsed
                } else {
                    0.0
                }
            }
            None => 0.0,
        }
    }

    pub fn log_summary(&self) {
        tracing::info!(
            events = self.events_processed,
            events_per_second = format!("{:.0}", self.events_per_second()),
            "event processing summary"
        );
        let mut entries: Vec<_> = self.events_by_kind.iter().collect();
        entries.sort_by(|a, b| b.1.cmp(a.1));
        for (kind, count) in entries {
            tracing::info!(kind = ?kind, count, "events by kind");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn counts_by_kind() {
        let mut metrics = EventMetrics::default();
        metrics.record_event(EventKind::StopArrival);
        metrics.record_event(EventKind::StopArrival);
        metrics.record_event(EventKind::StatsSample);
        assert_eq!(metrics.events_processed, 3);
        assert_eq!(metrics.count(EventKind::StopArrival), 2);
        assert_eq!(metrics.count(EventKind::VehicleArrival), 0);
        assert!(metrics.start_time.is_some());
    }
}
