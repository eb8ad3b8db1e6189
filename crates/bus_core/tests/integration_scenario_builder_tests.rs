mod support;

use bevy_ecs::prelude::World;
use bus_core::clock::{EventKind, SimulationClock};
use bus_core::ecs::{RouteDirectory, Stop, StopId, Vehicle};
use bus_core::error::SimError;
use bus_core::patterns::SinusoidalDemand;
use bus_core::scenario::{build_scenario, ScenarioParams};

use support::world::built_world;

#[test]
fn default_line_has_fifteen_stops_and_five_buses() {
    let mut world = built_world(ScenarioParams::default().with_seed(7));

    let stops = world.query::<&Stop>().iter(&world).count();
    let vehicles = world.query::<&Vehicle>().iter(&world).count();
    assert_eq!(stops, 15);
    assert_eq!(vehicles, 5);

    for vehicle in world.query::<&Vehicle>().iter(&world) {
        assert_eq!(vehicle.capacity, 130);
        assert_eq!(vehicle.route_length, 15);
        assert_eq!(vehicle.onboard_count(), 0);
        assert!(!vehicle.full);
    }
}

#[test]
fn every_entity_has_one_initial_event_at_zero() {
    let world = built_world(ScenarioParams::default().with_seed(7));
    let clock = world.resource::<SimulationClock>();
    assert_eq!(clock.pending_of_kind(EventKind::StopArrival), 15);
    assert_eq!(clock.pending_of_kind(EventKind::VehicleArrival), 5);
    assert_eq!(clock.pending_of_kind(EventKind::StatsSample), 1);
    assert_eq!(clock.next_event_time(), Some(0.0));
}

#[test]
fn more_vehicles_than_stops_wrap_starting_positions() {
    let world = built_world(
        ScenarioParams::default()
            .with_seed(7)
            .with_stops(3)
            .with_vehicles(5),
    );
    let directory = world.resource::<RouteDirectory>();
    let starts: Vec<StopId> = directory
        .vehicles()
        .iter()
        .map(|e| world.get::<Vehicle>(*e).expect("vehicle").location)
        .collect();
    assert_eq!(
        starts,
        vec![StopId(1), StopId(2), StopId(3), StopId(1), StopId(2)]
    );
}

#[test]
fn time_varying_demand_sets_midnight_rate() {
    let mut world = built_world(
        ScenarioParams::default()
            .with_seed(7)
            .with_time_varying_demand(true),
    );
    let expected = SinusoidalDemand::default().rate_at(0.0);
    for stop in world.query::<&Stop>().iter(&world) {
        assert!((stop.arrival_rate - expected).abs() < 1e-12);
    }
}

#[test]
fn rejects_invalid_configurations() {
    let cases = [
        ScenarioParams::default().with_stops(0),
        ScenarioParams::default().with_vehicles(0),
        ScenarioParams::default().with_capacity(0),
        ScenarioParams::default().with_horizon_min(0.0),
        ScenarioParams::default().with_arrival_rate(0.0),
        ScenarioParams::default().with_sampling(0.0, 10),
        ScenarioParams::default().with_sampling(10.0, 0),
        ScenarioParams::default().with_tracked_stop(16),
    ];
    for params in cases {
        let mut world = World::new();
        assert!(
            matches!(
                build_scenario(&mut world, params.clone()),
                Err(SimError::InvalidConfiguration(_))
            ),
            "accepted {params:?}"
        );
    }
}
