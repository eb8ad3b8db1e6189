use bevy_ecs::prelude::{Query, Res, ResMut};

use crate::clock::{CurrentEvent, EventKind, EventSubject, SimulationClock};
use crate::ecs::{Passenger, Stop};
use crate::error::SimError;
use crate::rng::SimRng;
use crate::scenario::{DemandConfig, RenegingConfig, RouteConfig, TrackedStop};
use crate::systems::DispatchFault;
use crate::telemetry::{RenegedRecord, SimTelemetry};

/// A passenger shows up at a stop.
///
/// Evicts impatient passengers (when reneging is on), enqueues the newcomer,
/// refreshes the stop's rate and schedules the stop's next arrival. Every stop
/// always has exactly one arrival pending.
#[allow(clippy::too_many_arguments)]
pub fn stop_arrival_system(
    mut clock: ResMut<SimulationClock>,
    event: Res<CurrentEvent>,
    mut rng: ResMut<SimRng>,
    route: Res<RouteConfig>,
    demand: Res<DemandConfig>,
    reneging: Res<RenegingConfig>,
    tracked: Res<TrackedStop>,
    mut telemetry: ResMut<SimTelemetry>,
    mut fault: ResMut<DispatchFault>,
    mut stops: Query<&mut Stop>,
) {
    if event.0.kind != EventKind::StopArrival {
        return;
    }
    let unroutable = SimError::UnroutableEvent {
        kind: event.0.kind,
        timestamp: event.0.timestamp,
    };
    let Some(EventSubject::Stop(stop_entity)) = event.0.subject else {
        fault.raise(unroutable);
        return;
    };
    let Ok(mut stop) = stops.get_mut(stop_entity) else {
        fault.raise(unroutable);
        return;
    };

    let now = clock.now();

    if reneging.enabled {
        for eviction in stop.evict_impatient(now, reneging.protected_ranks, reneging.patience) {
            let wait = eviction.passenger.waited_until(now);
            tracing::debug!(
                t = now,
                stop = %stop.id,
                passenger = eviction.passenger.id.0,
                wait,
                rank = eviction.rank,
                "passenger reneged"
            );
            telemetry.record_reneged(RenegedRecord {
                time: now,
                stop: stop.id,
                passenger: eviction.passenger.id,
                wait,
                rank: eviction.rank,
            });
        }
    }

    let k = rng.gen_range(0..route.destination_span);
    let passenger = Passenger {
        id: telemetry.next_passenger_id(),
        arrival_time: now,
        source_stop: stop.id,
        destination_stop: route.destination_from(stop.id, k),
        departure_time: None,
    };
    let queue_len = stop.enqueue(passenger);
    telemetry.observe_queue_length(queue_len);
    if stop.id == tracked.0 {
        telemetry.tracked_arrivals.push(now);
    }

    if demand.rate.is_time_varying() {
        stop.arrival_rate = demand.rate.rate_at(now);
    }

    let gap = demand.inter_arrival.sample(rng.inner(), stop.arrival_rate);
    if !gap.is_finite() {
        fault.raise(SimError::InvalidConfiguration(format!(
            "{} arrival rate {} yields no next arrival",
            stop.id, stop.arrival_rate
        )));
        return;
    }
    clock.schedule_in(gap, EventKind::StopArrival, Some(EventSubject::Stop(stop_entity)));
}
