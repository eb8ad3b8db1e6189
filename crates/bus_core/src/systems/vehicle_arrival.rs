use bevy_ecs::prelude::{Query, Res, ResMut};

use crate::clock::{CurrentEvent, EventKind, EventSubject, SimulationClock};
use crate::ecs::{RouteDirectory, Stop, Vehicle};
use crate::error::SimError;
use crate::rng::SimRng;
use crate::scenario::VehicleTimingConfig;
use crate::systems::DispatchFault;
use crate::telemetry::{ServedBatch, SimTelemetry, VehicleArrivalRecord};

/// A vehicle reaches the stop at its current location.
///
/// Unload, then load in FIFO order up to the free seats, then move on. The next
/// arrival is scheduled after `transit + unload + load`.
#[allow(clippy::too_many_arguments)]
pub fn vehicle_arrival_system(
    mut clock: ResMut<SimulationClock>,
    event: Res<CurrentEvent>,
    mut rng: ResMut<SimRng>,
    timing: Res<VehicleTimingConfig>,
    directory: Res<RouteDirectory>,
    mut telemetry: ResMut<SimTelemetry>,
    mut fault: ResMut<DispatchFault>,
    mut vehicles: Query<&mut Vehicle>,
    mut stops: Query<&mut Stop>,
) {
    if event.0.kind != EventKind::VehicleArrival {
        return;
    }
    let Some(EventSubject::Vehicle(vehicle_entity)) = event.0.subject else {
        fault.raise(SimError::UnroutableEvent {
            kind: event.0.kind,
            timestamp: event.0.timestamp,
        });
        return;
    };
    let Ok(mut vehicle) = vehicles.get_mut(vehicle_entity) else {
        fault.raise(SimError::UnroutableEvent {
            kind: event.0.kind,
            timestamp: event.0.timestamp,
        });
        return;
    };

    let now = clock.now();
    let location = vehicle.location;
    let Some(mut stop) = directory
        .stop(location)
        .and_then(|entity| stops.get_mut(entity).ok())
    else {
        fault.raise(SimError::UnknownStop(location));
        return;
    };

    telemetry.vehicle_arrivals.push(VehicleArrivalRecord {
        time: now,
        vehicle: vehicle.id,
        stop: location,
        full: vehicle.full,
    });

    let alighting = vehicle.unload_at(location);
    let unload_time = timing.alighting.duration(rng.inner(), alighting.len());

    let boarding = stop.take_front(vehicle.free_seats());
    let boarded = boarding.len();
    let load_time = timing.boarding.duration(rng.inner(), boarded);
    vehicle.board(boarding, now);

    tracing::trace!(
        t = now,
        vehicle = %vehicle.id,
        stop = %location,
        alighted = alighting.len(),
        boarded,
        onboard = vehicle.onboard_count(),
        "vehicle served stop"
    );

    telemetry.record_served(ServedBatch {
        time: now,
        vehicle: vehicle.id,
        stop: location,
        passengers: alighting,
    });

    vehicle.advance();
    let transit = timing.transit.sample(rng.inner());
    clock.schedule_in(
        transit + unload_time + load_time,
        EventKind::VehicleArrival,
        Some(EventSubject::Vehicle(vehicle_entity)),
    );
}

#[cfg(test)]
mod tests {
    use super::*;
    use bevy_ecs::prelude::{Entity, Schedule, World};

    use crate::distributions::{ServiceTime, TruncatedNormal};
    use crate::ecs::{Passenger, PassengerId, StopId, VehicleId};

    struct Line {
        world: World,
        stops: Vec<Entity>,
        vehicle: Entity,
    }

    fn line(num_stops: u32, capacity: usize, start: u32) -> Line {
        let mut world = World::new();
        world.insert_resource(SimulationClock::default());
        world.insert_resource(SimRng::seeded(5));
        world.insert_resource(VehicleTimingConfig {
            transit: TruncatedNormal::fixed(2.0),
            boarding: ServiceTime::instant(),
            alighting: ServiceTime::instant(),
        });
        world.insert_resource(SimTelemetry::default());
        world.insert_resource(DispatchFault::default());
        let stops: Vec<Entity> = (1..=num_stops)
            .map(|i| world.spawn(Stop::new(StopId(i), 1.0)).id())
            .collect();
        let vehicle = world
            .spawn(Vehicle::new(VehicleId(1), StopId(start), capacity, num_stops))
            .id();
        world.insert_resource(RouteDirectory::new(stops.clone(), vec![vehicle]));
        Line {
            world,
            stops,
            vehicle,
        }
    }

    fn waiting(id: u64, arrival: f64, destination: u32) -> Passenger {
        Passenger {
            id: PassengerId(id),
            arrival_time: arrival,
            source_stop: StopId(1),
            destination_stop: StopId(destination),
            departure_time: None,
        }
    }

    fn dispatch(line: &mut Line, at: f64) {
        line.world.resource_mut::<SimulationClock>().schedule_at(
            at,
            EventKind::VehicleArrival,
            Some(EventSubject::Vehicle(line.vehicle)),
        );
        let event = line
            .world
            .resource_mut::<SimulationClock>()
            .pop_next()
            .expect("event");
        line.world.insert_resource(CurrentEvent(event));
        let mut schedule = Schedule::default();
        schedule.add_systems(vehicle_arrival_system);
        schedule.run(&mut line.world);
        // Drop the follow-up arrival so the next dispatch controls the time.
        let _ = line.world.resource_mut::<SimulationClock>().pop_next();
    }

    #[test]
    fn boards_fifo_up_to_capacity_and_sets_full() {
        let mut line = line(3, 2, 1);
        {
            let mut stop = line.world.get_mut::<Stop>(line.stops[0]).expect("stop");
            stop.enqueue(waiting(0, 0.5, 2));
            stop.enqueue(waiting(1, 0.2, 3));
            stop.enqueue(waiting(2, 0.9, 2));
        }
        dispatch(&mut line, 1.0);

        let vehicle = line.world.get::<Vehicle>(line.vehicle).expect("vehicle");
        let ids: Vec<u64> = vehicle.onboard().iter().map(|p| p.id.0).collect();
        assert_eq!(ids, vec![1, 0]);
        assert!(vehicle.full);
        assert_eq!(vehicle.location, StopId(2));
        assert!(vehicle
            .onboard()
            .iter()
            .all(|p| p.departure_time == Some(1.0)));

        let stop = line.world.get::<Stop>(line.stops[0]).expect("stop");
        assert_eq!(stop.queue_len(), 1);
    }

    #[test]
    fn unloads_at_destination_and_records_wait() {
        let mut line = line(3, 10, 1);
        line.world
            .get_mut::<Stop>(line.stops[0])
            .expect("stop")
            .enqueue(waiting(0, 0.0, 2));
        dispatch(&mut line, 1.5);
        dispatch(&mut line, 4.0);

        let telemetry = line.world.resource::<SimTelemetry>();
        assert_eq!(telemetry.passengers_served, 1);
        let last = telemetry.served.last().expect("batch");
        assert_eq!(last.stop, StopId(2));
        assert_eq!(last.passengers.len(), 1);
        assert_eq!(telemetry.wait_times(), vec![1.5]);
        assert_eq!(telemetry.vehicle_arrivals.len(), 2);

        let vehicle = line.world.get::<Vehicle>(line.vehicle).expect("vehicle");
        assert_eq!(vehicle.onboard_count(), 0);
        assert!(!vehicle.full);
    }

    #[test]
    fn full_vehicle_boards_nobody_without_delay() {
        let mut line = line(3, 1, 1);
        line.world
            .get_mut::<Vehicle>(line.vehicle)
            .expect("vehicle")
            .board(vec![waiting(0, 0.0, 3)], 0.0);
        line.world.insert_resource(VehicleTimingConfig {
            transit: TruncatedNormal::fixed(2.0),
            boarding: ServiceTime::boarding(),
            alighting: ServiceTime::alighting(),
        });
        line.world
            .get_mut::<Stop>(line.stops[0])
            .expect("stop")
            .enqueue(waiting(1, 0.0, 2));

        line.world.resource_mut::<SimulationClock>().schedule_at(
            1.0,
            EventKind::VehicleArrival,
            Some(EventSubject::Vehicle(line.vehicle)),
        );
        let event = line
            .world
            .resource_mut::<SimulationClock>()
            .pop_next()
            .expect("event");
        line.world.insert_resource(CurrentEvent(event));
        let mut schedule = Schedule::default();
        schedule.add_systems(vehicle_arrival_system);
        schedule.run(&mut line.world);

        // Nobody alights at stop 1 and no seat is free: dwell is zero.
        assert_eq!(
            line.world.resource::<SimulationClock>().next_event_time(),
            Some(3.0)
        );
        let stop = line.world.get::<Stop>(line.stops[0]).expect("stop");
        assert_eq!(stop.queue_len(), 1);
    }

    #[test]
    fn wraps_from_last_stop_to_first() {
        let mut line = line(4, 10, 4);
        dispatch(&mut line, 0.0);
        let vehicle = line.world.get::<Vehicle>(line.vehicle).expect("vehicle");
        assert_eq!(vehicle.location, StopId(1));
    }

    #[test]
    fn unknown_location_raises_fault() {
        let mut line = line(2, 10, 1);
        line.world
            .get_mut::<Vehicle>(line.vehicle)
            .expect("vehicle")
            .location = StopId(9);
        line.world.resource_mut::<SimulationClock>().schedule_at(
            0.0,
            EventKind::VehicleArrival,
            Some(EventSubject::Vehicle(line.vehicle)),
        );
        let event = line
            .world
            .resource_mut::<SimulationClock>()
            .pop_next()
            .expect("event");
        line.world.insert_resource(CurrentEvent(event));
        let mut schedule = Schedule::default();
        schedule.add_systems(vehicle_arrival_system);
        schedule.run(&mut line.world);
        assert!(matches!(
            line.world.resource_mut::<DispatchFault>().take(),
            Some(SimError::UnknownStop(StopId(9)))
        ));
    }
}
