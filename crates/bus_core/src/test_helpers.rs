//! Test helpers for common test setup and utilities.
//!
//! Shared fixtures for unit and integration tests: a world with every resource
//! the systems read, a small line of stops and vehicles, and passenger builders.

use bevy_ecs::prelude::{Entity, World};

use crate::clock::{CurrentEvent, EventKind, EventSubject, SimulationClock};
use crate::distributions::{ArrivalProcess, TruncatedNormal};
use crate::ecs::{Passenger, PassengerId, RouteDirectory, Stop, StopId, Vehicle, VehicleId};
use crate::patterns::ArrivalRate;
use crate::profiling::EventMetrics;
use crate::rng::SimRng;
use crate::scenario::{
    DemandConfig, RenegingConfig, RouteConfig, SimulationEndTime, TrackedStop,
    VehicleTimingConfig, DEFAULT_DESTINATION_SPAN,
};
use crate::systems::DispatchFault;
use crate::telemetry::{SimSnapshotConfig, SimSnapshots, SimTelemetry};

/// Seed used by every helper that needs randomness.
pub const TEST_SEED: u64 = 0x5eed;

/// A waiting passenger bound for `destination`, arrived at `arrival_time`.
pub fn test_passenger(id: u64, arrival_time: f64, source: u32, destination: u32) -> Passenger {
    Passenger {
        id: PassengerId(id),
        arrival_time,
        source_stop: StopId(source),
        destination_stop: StopId(destination),
        departure_time: None,
    }
}

/// Create a test world with every resource the systems read but no entities.
///
/// Dwell is instant and transit is a fixed 2 minutes so timings are exact.
pub fn create_test_world(num_stops: u32) -> World {
    let mut world = World::new();
    world.insert_resource(SimulationClock::default());
    world.insert_resource(SimRng::seeded(TEST_SEED));
    world.insert_resource(SimulationEndTime(f64::INFINITY));
    world.insert_resource(SimTelemetry::default());
    world.insert_resource(SimSnapshotConfig::default());
    world.insert_resource(SimSnapshots::default());
    world.insert_resource(EventMetrics::default());
    world.insert_resource(DispatchFault::default());
    world.insert_resource(RouteConfig {
        num_stops,
        destination_span: DEFAULT_DESTINATION_SPAN,
    });
    world.insert_resource(DemandConfig {
        rate: ArrivalRate::Constant(1.0),
        inter_arrival: ArrivalProcess::Fixed.distribution(),
    });
    world.insert_resource(RenegingConfig::default());
    world.insert_resource(VehicleTimingConfig {
        transit: TruncatedNormal::fixed(2.0),
        boarding: crate::distributions::ServiceTime::instant(),
        alighting: crate::distributions::ServiceTime::instant(),
    });
    world.insert_resource(TrackedStop(StopId(1)));
    world
}

/// Spawn `num_stops` stops and `num_vehicles` vehicles (vehicle n at stop n) and
/// register them in the [`RouteDirectory`]. Returns `(stops, vehicles)`.
pub fn spawn_line(
    world: &mut World,
    num_stops: u32,
    num_vehicles: u32,
    capacity: usize,
) -> (Vec<Entity>, Vec<Entity>) {
    let stops: Vec<Entity> = (1..=num_stops)
        .map(|i| world.spawn(Stop::new(StopId(i), 1.0)).id())
        .collect();
    let vehicles: Vec<Entity> = (1..=num_vehicles)
        .map(|i| {
            world
                .spawn(Vehicle::new(
                    VehicleId(i),
                    crate::scenario::starting_stop(i, num_stops),
                    capacity,
                    num_stops,
                ))
                .id()
        })
        .collect();
    world.insert_resource(RouteDirectory::new(stops.clone(), vehicles.clone()));
    (stops, vehicles)
}

/// Schedule `kind` for `subject` at `at`, pop it and make it the current event.
///
/// # Panics
///
/// Panics if `at` lies before the clock or the clock is missing.
pub fn make_current(world: &mut World, at: f64, kind: EventKind, subject: Option<EventSubject>) {
    let mut clock = world.resource_mut::<SimulationClock>();
    clock.schedule_at(at, kind, subject);
    let event = clock.pop_next().expect("event was just scheduled");
    world.insert_resource(CurrentEvent(event));
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn line_registers_entities_in_order() {
        let mut world = create_test_world(4);
        let (stops, vehicles) = spawn_line(&mut world, 4, 2, 10);
        let directory = world.resource::<RouteDirectory>();
        assert_eq!(directory.stops(), stops.as_slice());
        assert_eq!(directory.vehicles(), vehicles.as_slice());
        let second = world.get::<Vehicle>(vehicles[1]).expect("vehicle");
        assert_eq!(second.location, StopId(2));
    }

    #[test]
    fn make_current_advances_clock() {
        let mut world = create_test_world(1);
        make_current(&mut world, 3.0, EventKind::StatsSample, None);
        assert_eq!(world.resource::<SimulationClock>().now(), 3.0);
        assert_eq!(world.resource::<CurrentEvent>().0.kind, EventKind::StatsSample);
    }
}
