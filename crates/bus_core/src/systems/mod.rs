//! Event handlers. Each system reacts to one [`EventKind`](crate::clock::EventKind),
//! mutates the entity named by the event and schedules that entity's next occurrence.

use bevy_ecs::prelude::Resource;

use crate::error::SimError;

pub mod stats_sample;
pub mod stop_arrival;
pub mod vehicle_arrival;

/// Error raised inside a system during the current step.
///
/// Systems cannot return `Result`, so they park the first failure here and the
/// runner turns it into `Err` once the step finishes.
#[derive(Debug, Default, Resource)]
pub struct DispatchFault(Option<SimError>);

impl DispatchFault {
    pub fn raise(&mut self, error: SimError) {
        tracing::error!(%error, "event dispatch failed");
        if self.0.is_none() {
            self.0 = Some(error);
        }
    }

    pub fn take(&mut self) -> Option<SimError> {
        self.0.take()
    }

    pub fn is_raised(&self) -> bool {
        self.0.is_some()
    }
}

#[cfg(test)]
mod end_to_end_tests {
    use bevy_ecs::prelude::World;

    use crate::ecs::{Stop, Vehicle};
    use crate::runner::{run_until_horizon, simulation_schedule};
    use crate::scenario::{build_scenario, initialize_simulation, ScenarioParams};
    use crate::telemetry::{SimSnapshots, SimTelemetry};

    #[test]
    fn two_hour_run_serves_passengers() {
        let mut world = World::new();
        let params = ScenarioParams::default()
            .with_seed(3)
            .with_vehicles(3)
            .with_stops(6)
            .with_horizon_min(120.0);
        build_scenario(&mut world, params).expect("valid scenario");
        initialize_simulation(&mut world).expect("initialize");

        let mut schedule = simulation_schedule();
        let steps = run_until_horizon(&mut world, &mut schedule).expect("run completes");
        assert!(steps > 0);

        let telemetry = world.resource::<SimTelemetry>();
        assert!(telemetry.passengers_generated > 0);
        assert!(telemetry.passengers_served > 0);
        assert!(telemetry.wait_times().iter().all(|w| *w >= 0.0));

        let waiting: u64 = world
            .query::<&Stop>()
            .iter(&world)
            .map(|s| s.queue_len() as u64)
            .sum();
        let onboard: u64 = world
            .query::<&Vehicle>()
            .iter(&world)
            .map(|v| v.onboard_count() as u64)
            .sum();
        let telemetry = world.resource::<SimTelemetry>();
        assert_eq!(
            telemetry.passengers_generated,
            waiting + onboard + telemetry.passengers_served + telemetry.passengers_reneged
        );

        // Samples at 0, 10, ..., 110.
        assert_eq!(world.resource::<SimSnapshots>().snapshots.len(), 12);
    }
}
