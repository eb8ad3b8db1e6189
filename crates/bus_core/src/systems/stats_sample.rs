use bevy_ecs::prelude::{Query, Res, ResMut};

use crate::clock::{CurrentEvent, EventKind, SimulationClock};
use crate::ecs::{RouteDirectory, Stop, Vehicle};
use crate::telemetry::{
    PassengerCounts, SimSnapshotConfig, SimSnapshots, SimTelemetry, StatsSnapshot,
};

/// Periodic occupancy sample. Reschedules itself every `config.interval` minutes.
#[allow(clippy::too_many_arguments)]
pub fn stats_sample_system(
    mut clock: ResMut<SimulationClock>,
    event: Res<CurrentEvent>,
    config: Res<SimSnapshotConfig>,
    directory: Res<RouteDirectory>,
    telemetry: Res<SimTelemetry>,
    mut snapshots: ResMut<SimSnapshots>,
    vehicles: Query<&Vehicle>,
    stops: Query<&Stop>,
) {
    if event.0.kind != EventKind::StatsSample {
        return;
    }

    let onboard_by_vehicle: Vec<usize> = directory
        .vehicles()
        .iter()
        .filter_map(|entity| vehicles.get(*entity).ok())
        .map(Vehicle::onboard_count)
        .collect();

    let mut waiting = 0u64;
    let mut max_queue_length = 0usize;
    for stop in stops.iter() {
        waiting += stop.queue_len() as u64;
        max_queue_length = max_queue_length.max(stop.queue_len());
    }

    let counts = PassengerCounts {
        generated: telemetry.passengers_generated,
        waiting,
        onboard: onboard_by_vehicle.iter().map(|n| *n as u64).sum(),
        served: telemetry.passengers_served,
        reneged: telemetry.passengers_reneged,
    };
    debug_assert!(counts.is_conserved(), "passenger ledger out of balance: {counts:?}");

    let now = clock.now();
    snapshots.push(StatsSnapshot {
        timestamp: now,
        onboard_by_vehicle,
        max_queue_length,
        counts,
    });

    clock.schedule_in(config.interval, EventKind::StatsSample, None);
}
