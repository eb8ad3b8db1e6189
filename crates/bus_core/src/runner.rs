//! Simulation runner: advances the clock and routes events into the ECS.
//!
//! Clock progression and event routing happen here, outside systems. Each step
//! pops the next event from [SimulationClock], inserts it as [CurrentEvent],
//! then runs the schedule. The schedule is the dispatch table: one system per
//! [EventKind], gated by a run condition.

use bevy_ecs::prelude::Res;
use bevy_ecs::prelude::{Schedule, World};
use bevy_ecs::schedule::{ExecutorKind, IntoSystemConfigs};

use crate::clock::{CurrentEvent, Event, EventKind, SimulationClock};
use crate::error::{SimError, SimResult};
use crate::profiling::EventMetrics;
use crate::scenario::SimulationEndTime;
use crate::systems::{
    stats_sample::stats_sample_system, stop_arrival::stop_arrival_system,
    vehicle_arrival::vehicle_arrival_system, DispatchFault,
};

fn is_stop_arrival(event: Option<Res<CurrentEvent>>) -> bool {
    event
        .map(|e| e.0.kind == EventKind::StopArrival)
        .unwrap_or(false)
}

fn is_vehicle_arrival(event: Option<Res<CurrentEvent>>) -> bool {
    event
        .map(|e| e.0.kind == EventKind::VehicleArrival)
        .unwrap_or(false)
}

fn is_stats_sample(event: Option<Res<CurrentEvent>>) -> bool {
    event
        .map(|e| e.0.kind == EventKind::StatsSample)
        .unwrap_or(false)
}

/// Pop the next event unless it lies at or past [SimulationEndTime].
fn pop_within_horizon(world: &mut World) -> SimResult<Option<Event>> {
    let end = world.get_resource::<SimulationEndTime>().map(|e| e.0);
    let mut clock = world
        .get_resource_mut::<SimulationClock>()
        .ok_or(SimError::MissingResource("SimulationClock"))?;

    if let (Some(end), Some(ts)) = (end, clock.next_event_time()) {
        if ts >= end {
            tracing::debug!(next = ts, horizon = end, "horizon reached");
            return Ok(None);
        }
    }

    let event = clock.pop_next()?;
    tracing::trace!(t = event.timestamp, kind = ?event.kind, seq = event.sequence, "dispatch");
    Ok(Some(event))
}

fn dispatch(world: &mut World, schedule: &mut Schedule, event: Event) -> SimResult<()> {
    world.insert_resource(CurrentEvent(event));

    if let Some(mut metrics) = world.get_resource_mut::<EventMetrics>() {
        metrics.record_event(event.kind);
    }

    schedule.run(world);

    match world
        .get_resource_mut::<DispatchFault>()
        .and_then(|mut fault| fault.take())
    {
        Some(error) => Err(error),
        None => Ok(()),
    }
}

/// Runs one simulation step: pops the next event, inserts it as [CurrentEvent], then runs the schedule.
///
/// Returns `Ok(true)` if an event was processed and `Ok(false)` once the next
/// event is at or past [SimulationEndTime]. An empty schedule before the
/// horizon is an error: every stop, vehicle and the sampler keep one event pending.
pub fn run_next_event(world: &mut World, schedule: &mut Schedule) -> SimResult<bool> {
    match pop_within_horizon(world)? {
        Some(event) => {
            dispatch(world, schedule, event)?;
            Ok(true)
        }
        None => Ok(false),
    }
}

/// Runs one simulation step and invokes `hook` after the schedule completes.
pub fn run_next_event_with_hook<F>(
    world: &mut World,
    schedule: &mut Schedule,
    mut hook: F,
) -> SimResult<bool>
where
    F: FnMut(&World, &Event),
{
    match pop_within_horizon(world)? {
        Some(event) => {
            dispatch(world, schedule, event)?;
            hook(world, &event);
            Ok(true)
        }
        None => Ok(false),
    }
}

/// Runs simulation steps until the horizon. Returns the number of events processed.
pub fn run_until_horizon(world: &mut World, schedule: &mut Schedule) -> SimResult<usize> {
    if world.get_resource::<SimulationEndTime>().is_none() {
        return Err(SimError::MissingResource("SimulationEndTime"));
    }
    let mut steps = 0;
    while run_next_event(world, schedule)? {
        steps += 1;
    }
    Ok(steps)
}

/// Runs simulation steps until the horizon and invokes `hook` after each step.
pub fn run_until_horizon_with_hook<F>(
    world: &mut World,
    schedule: &mut Schedule,
    mut hook: F,
) -> SimResult<usize>
where
    F: FnMut(&World, &Event),
{
    if world.get_resource::<SimulationEndTime>().is_none() {
        return Err(SimError::MissingResource("SimulationEndTime"));
    }
    let mut steps = 0;
    while run_next_event_with_hook(world, schedule, &mut hook)? {
        steps += 1;
    }
    Ok(steps)
}

/// Builds the simulation schedule: one handler per event kind.
///
/// Runs on the single-threaded executor so systems fire in a fixed order and
/// the shared random stream is consumed deterministically.
pub fn simulation_schedule() -> Schedule {
    let mut schedule = Schedule::default();
    schedule.set_executor_kind(ExecutorKind::SingleThreaded);

    schedule.add_systems((
        // StopArrival
        stop_arrival_system.run_if(is_stop_arrival),
        // VehicleArrival
        vehicle_arrival_system.run_if(is_vehicle_arrival),
        // StatsSample
        stats_sample_system.run_if(is_stats_sample),
    ));

    schedule
}
