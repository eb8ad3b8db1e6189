//! Telemetry / KPIs: served passengers, reneges, vehicle trace and occupancy samples.


use bevy_ecs::prelude::Resource;

use crate::ecs::{Passenger, PassengerId, StopId, VehicleId};

/// One vehicle visit: everyone who got off at `stop` when `vehicle` arrived at `time`.
/// Visits where nobody alighted are kept too, so the log doubles as a visit trace.
#[derive(Debug, Clone, PartialEq)]
pub struct ServedBatch {
    pub time: f64,
    pub vehicle: VehicleId,
    pub stop: StopId,
    pub passengers: Vec<Passenger>,
}

/// One passenger who left a stop queue without boarding.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RenegedRecord {
    pub time: f64,
    pub stop: StopId,
    pub passenger: PassengerId,
    pub wait: f64,
    /// Queue position when evicted (1 = head).
    pub rank: usize,
}

/// Vehicle reaching a stop, before any unloading.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct VehicleArrivalRecord {
    pub time: f64,
    pub vehicle: VehicleId,
    pub stop: StopId,
    /// Full flag as of the previous departure.
    pub full: bool,
}

/// Collects simulation telemetry. Inserted by `build_scenario`.
#[derive(Debug, Default, Resource)]
pub struct SimTelemetry {
    pub served: Vec<ServedBatch>,
    pub reneged: Vec<RenegedRecord>,
    pub vehicle_arrivals: Vec<VehicleArrivalRecord>,
    /// Arrival timestamps at the tracked stop.
    pub tracked_arrivals: Vec<f64>,
    pub passengers_generated: u64,
    pub passengers_served: u64,
    pub passengers_reneged: u64,
    /// Longest stop queue observed right after an arrival.
    pub max_queue_length: usize,
}

impl SimTelemetry {
    /// Hand out the next passenger id and count the passenger as generated.
    pub fn next_passenger_id(&mut self) -> PassengerId {
        let id = PassengerId(self.passengers_generated);
        self.passengers_generated += 1;
        id
    }

    pub fn observe_queue_length(&mut self, len: usize) {
        if len > self.max_queue_length {
            self.max_queue_length = len;
        }
    }

    pub fn record_served(&mut self, batch: ServedBatch) {
        self.passengers_served += batch.passengers.len() as u64;
        self.served.push(batch);
    }

    pub fn record_reneged(&mut self, record: RenegedRecord) {
        self.passengers_reneged += 1;
        self.reneged.push(record);
    }

    /// Wait time of every served passenger, in service order.
    pub fn wait_times(&self) -> Vec<f64> {
        self.served
            .iter()
            .flat_map(|batch| batch.passengers.iter())
            .filter_map(Passenger::wait_time)
            .collect()
    }

    pub fn mean_wait(&self) -> Option<f64> {
        mean(&self.wait_times())
    }

    pub fn reneged_wait_times(&self) -> Vec<f64> {
        self.reneged.iter().map(|r| r.wait).collect()
    }

    /// Running total of passengers dropped off by `vehicle`, one point per visit.
    pub fn cumulative_departures(&self, vehicle: VehicleId) -> Vec<(f64, u64)> {
        let mut total = 0u64;
        self.served
            .iter()
            .filter(|batch| batch.vehicle == vehicle)
            .map(|batch| {
                total += batch.passengers.len() as u64;
                (batch.time, total)
            })
            .collect()
    }

    /// Gaps between consecutive arrivals at the tracked stop.
    pub fn tracked_inter_arrivals(&self) -> Vec<f64> {
        self.tracked_arrivals
            .windows(2)
            .map(|pair| pair[1] - pair[0])
            .collect()
    }

    /// Gaps between consecutive arrivals of `vehicle` at any stop.
    pub fn vehicle_inter_arrivals(&self, vehicle: VehicleId) -> Vec<f64> {
        let times: Vec<f64> = self
            .vehicle_arrivals
            .iter()
            .filter(|r| r.vehicle == vehicle)
            .map(|r| r.time)
            .collect();
        times.windows(2).map(|pair| pair[1] - pair[0]).collect()
    }
}

/// Passenger ledger at one instant. Conservation holds when
/// `generated == waiting + onboard + served + reneged`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PassengerCounts {
    pub generated: u64,
    pub waiting: u64,
    pub onboard: u64,
    pub served: u64,
    pub reneged: u64,
}

impl PassengerCounts {
    pub fn is_conserved(&self) -> bool {
        self.generated == self.waiting + self.onboard + self.served + self.reneged
    }
}

/// State of the line at a sample instant.
#[derive(Debug, Clone, PartialEq)]
pub struct StatsSnapshot {
    pub timestamp: f64,
    /// Onboard count per vehicle, in vehicle id order.
    pub onboard_by_vehicle: Vec<usize>,
    /// Longest stop queue at this instant.
    pub max_queue_length: usize,
    pub counts: PassengerCounts,
}

impl StatsSnapshot {
    pub fn mean_onboard(&self) -> f64 {
        if self.onboard_by_vehicle.is_empty() {
            return 0.0;
        }
        self.onboard_by_vehicle.iter().sum::<usize>() as f64 / self.onboard_by_vehicle.len() as f64
    }
}

/// Snapshot capture configuration.
#[derive(Debug, Clone, Copy, Resource)]
pub struct SimSnapshotConfig {
    pub interval: f64,
    /// Trailing samples averaged for the steady-state estimate.
    pub steady_state_window: usize,
}

impl Default for SimSnapshotConfig {
    fn default() -> Self {
        Self {
            interval: 10.0,
            steady_state_window: 10,
        }
    }
}

/// Append-only sample history, oldest first.
#[derive(Debug, Default, Resource)]
pub struct SimSnapshots {
    pub snapshots: Vec<StatsSnapshot>,
    pub last_snapshot_at: Option<f64>,
}

impl SimSnapshots {
    pub fn push(&mut self, snapshot: StatsSnapshot) {
        self.last_snapshot_at = Some(snapshot.timestamp);
        self.snapshots.push(snapshot);
    }

    /// Mean over the last `window` samples of the per-sample mean onboard count.
    pub fn steady_state_mean(&self, window: usize) -> Option<f64> {
        let take = window.min(self.snapshots.len());
        if take == 0 {
            return None;
        }
        let start = self.snapshots.len() - take;
        let total: f64 = self.snapshots[start..]
            .iter()
            .map(StatsSnapshot::mean_onboard)
            .sum();
        Some(total / take as f64)
    }
}

pub(crate) fn mean(values: &[f64]) -> Option<f64> {
    if values.is_empty() {
        None
    } else {
        Some(values.iter().sum::<f64>() / values.len() as f64)
    }
}
