#![allow(dead_code)]

use bevy_ecs::prelude::World;
use bus_core::distributions::{ArrivalProcess, TruncatedNormal};
use bus_core::ecs::{Stop, Vehicle};
use bus_core::scenario::{build_scenario, initialize_simulation, ScenarioParams};
use bus_core::telemetry::{PassengerCounts, SimTelemetry};

/// Build a world from `params` and seed the initial events.
pub fn built_world(params: ScenarioParams) -> World {
    let mut world = World::new();
    build_scenario(&mut world, params).expect("scenario parameters should be valid");
    initialize_simulation(&mut world).expect("initialize");
    world
}

/// Default line, seeded, shortened to `horizon_min`.
pub fn seeded_params(seed: u64, horizon_min: f64) -> ScenarioParams {
    ScenarioParams::default()
        .with_seed(seed)
        .with_horizon_min(horizon_min)
}

/// One stop, one vehicle of capacity 2, one passenger per minute, instant dwell
/// and a fixed one-minute transit.
pub fn single_stop_params(horizon_min: f64) -> ScenarioParams {
    ScenarioParams::default()
        .with_seed(1)
        .with_stops(1)
        .with_vehicles(1)
        .with_capacity(2)
        .with_arrival_rate(1.0)
        .with_arrival_process(ArrivalProcess::Fixed)
        .with_instant_dwell()
        .with_transit(TruncatedNormal::fixed(1.0))
        .with_horizon_min(horizon_min)
}

/// Passenger ledger read from the live entities.
pub fn live_counts(world: &mut World) -> PassengerCounts {
    let waiting: u64 = world
        .query::<&Stop>()
        .iter(world)
        .map(|s| s.queue_len() as u64)
        .sum();
    let onboard: u64 = world
        .query::<&Vehicle>()
        .iter(world)
        .map(|v| v.onboard_count() as u64)
        .sum();
    let telemetry = world.resource::<SimTelemetry>();
    PassengerCounts {
        generated: telemetry.passengers_generated,
        waiting,
        onboard,
        served: telemetry.passengers_served,
        reneged: telemetry.passengers_reneged,
    }
}
