use bevy_ecs::prelude::{Entity, World};

use crate::clock::{EventKind, EventSubject, SimulationClock};
use crate::ecs::{RouteDirectory, Stop, StopId, Vehicle, VehicleId};
use crate::error::{SimError, SimResult};
use crate::profiling::EventMetrics;
use crate::rng::SimRng;
use crate::scenario::params::{
    DemandConfig, RenegingConfig, RouteConfig, ScenarioParams, SimulationEndTime, TrackedStop,
    VehicleTimingConfig,
};
use crate::systems::DispatchFault;
use crate::telemetry::{SimSnapshotConfig, SimSnapshots, SimTelemetry};

/// Starting stop of the `index`-th vehicle (1-based): vehicle n starts at stop n,
/// wrapping when there are more vehicles than stops.
pub fn starting_stop(index: u32, num_stops: u32) -> StopId {
    StopId(((index - 1) % num_stops) + 1)
}

/// Validate `params`, spawn stops and vehicles, and insert every resource the
/// systems read. Call [`initialize_simulation`] afterwards to seed the schedule.
pub fn build_scenario(world: &mut World, params: ScenarioParams) -> SimResult<()> {
    params.validate()?;

    // Validated to fit in u32.
    let num_stops = params.num_stops as u32;
    let rate = params.arrival_rate();
    let initial_rate = rate.rate_at(0.0);

    world.insert_resource(SimulationClock::default());
    world.insert_resource(SimRng::from_seed_option(params.seed));
    world.insert_resource(SimulationEndTime(params.horizon_min));
    world.insert_resource(SimTelemetry::default());
    world.insert_resource(SimSnapshotConfig {
        interval: params.sample_interval_min,
        steady_state_window: params.steady_state_window,
    });
    world.insert_resource(SimSnapshots::default());
    world.insert_resource(EventMetrics::default());
    world.insert_resource(DispatchFault::default());

    world.insert_resource(RouteConfig {
        num_stops,
        destination_span: params.destination_span,
    });
    world.insert_resource(DemandConfig {
        rate,
        inter_arrival: params.arrival_process.distribution(),
    });
    world.insert_resource(RenegingConfig {
        enabled: params.reneging,
        protected_ranks: params.protected_ranks,
        patience: params.patience_min,
    });
    world.insert_resource(VehicleTimingConfig {
        transit: params.transit,
        boarding: params.boarding,
        alighting: params.alighting,
    });
    world.insert_resource(TrackedStop(StopId(params.tracked_stop)));

    let stops: Vec<Entity> = (1..=num_stops)
        .map(|i| world.spawn(Stop::new(StopId(i), initial_rate)).id())
        .collect();
    let vehicles: Vec<Entity> = (1..=params.num_vehicles as u32)
        .map(|i| {
            world
                .spawn(Vehicle::new(
                    VehicleId(i),
                    starting_stop(i, num_stops),
                    params.vehicle_capacity,
                    num_stops,
                ))
                .id()
        })
        .collect();
    world.insert_resource(RouteDirectory::new(stops, vehicles));

    tracing::info!(
        stops = params.num_stops,
        vehicles = params.num_vehicles,
        capacity = params.vehicle_capacity,
        horizon_min = params.horizon_min,
        time_varying = params.time_varying_demand,
        reneging = params.reneging,
        seed = ?params.seed,
        "bus line scenario built"
    );
    Ok(())
}

/// Seed the schedule with every entity's first event at t = 0: stops first,
/// then vehicles, then the sampler. Insertion order settles the tie.
///
/// Fails with [`SimError::MissingResource`] on a world not set up by [`build_scenario`].
pub fn initialize_simulation(world: &mut World) -> SimResult<()> {
    let directory = world
        .get_resource::<RouteDirectory>()
        .ok_or(SimError::MissingResource("RouteDirectory"))?;
    let stops = directory.stops().to_vec();
    let vehicles = directory.vehicles().to_vec();
    let mut clock = world
        .get_resource_mut::<SimulationClock>()
        .ok_or(SimError::MissingResource("SimulationClock"))?;
    for stop in stops {
        clock.schedule_at(0.0, EventKind::StopArrival, Some(EventSubject::Stop(stop)));
    }
    for vehicle in vehicles {
        clock.schedule_at(
            0.0,
            EventKind::VehicleArrival,
            Some(EventSubject::Vehicle(vehicle)),
        );
    }
    clock.schedule_at(0.0, EventKind::StatsSample, None);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn vehicles_start_at_their_own_stop() {
        assert_eq!(starting_stop(1, 15), StopId(1));
        assert_eq!(starting_stop(5, 15), StopId(5));
        assert_eq!(starting_stop(16, 15), StopId(1));
        assert_eq!(starting_stop(3, 1), StopId(1));
    }

    #[test]
    fn build_spawns_entities_and_resources() {
        let mut world = World::new();
        build_scenario(&mut world, ScenarioParams::default().with_seed(1)).expect("build");

        let directory = world.resource::<RouteDirectory>();
        assert_eq!(directory.stops().len(), 15);
        assert_eq!(directory.vehicles().len(), 5);

        let mut locations: Vec<u32> = world
            .query::<&Vehicle>()
            .iter(&world)
            .map(|v| v.location.0)
            .collect();
        locations.sort_unstable();
        assert_eq!(locations, vec![1, 2, 3, 4, 5]);
        assert!(world.get_resource::<SimulationEndTime>().is_some());
    }

    #[test]
    fn initial_events_in_insertion_order() {
        let mut world = World::new();
        let params = ScenarioParams::default()
            .with_seed(1)
            .with_stops(2)
            .with_vehicles(2);
        build_scenario(&mut world, params).expect("build");
        initialize_simulation(&mut world).expect("initialize");

        let mut clock = world.resource_mut::<SimulationClock>();
        assert_eq!(clock.pending_events(), 5);
        let kinds: Vec<EventKind> = (0..5)
            .map(|_| clock.pop_next().expect("event").kind)
            .collect();
        assert_eq!(
            kinds,
            vec![
                EventKind::StopArrival,
                EventKind::StopArrival,
                EventKind::VehicleArrival,
                EventKind::VehicleArrival,
                EventKind::StatsSample,
            ]
        );
    }

    #[test]
    fn initialize_requires_built_world() {
        let mut world = World::new();
        assert!(matches!(
            initialize_simulation(&mut world),
            Err(SimError::MissingResource("RouteDirectory"))
        ));

        world.insert_resource(RouteDirectory::new(Vec::new(), Vec::new()));
        assert!(matches!(
            initialize_simulation(&mut world),
            Err(SimError::MissingResource("SimulationClock"))
        ));
    }

    #[test]
    fn invalid_params_leave_world_untouched() {
        let mut world = World::new();
        let result = build_scenario(&mut world, ScenarioParams::default().with_vehicles(0));
        assert!(matches!(result, Err(SimError::InvalidConfiguration(_))));
        assert!(world.get_resource::<SimulationClock>().is_none());
    }
}
