#![allow(dead_code)]

use bevy_ecs::prelude::World;
use bevy_ecs::schedule::Schedule;
use bus_core::clock::Event;
use bus_core::runner::{run_next_event, run_until_horizon_with_hook, simulation_schedule};

/// Helper that owns a reusable `Schedule` so tests can step or drain the event queue.
pub struct ScheduleRunner {
    schedule: Schedule,
}

impl Default for ScheduleRunner {
    fn default() -> Self {
        Self::new()
    }
}

impl ScheduleRunner {
    /// Create a runner with the default simulation schedule.
    pub fn new() -> Self {
        Self {
            schedule: simulation_schedule(),
        }
    }

    /// Run a single event (returns `true` if an event was processed).
    pub fn run_one(&mut self, world: &mut World) -> bool {
        run_next_event(world, &mut self.schedule).expect("event dispatch")
    }

    /// Run up to `max_steps` events, returning the number executed.
    pub fn run_steps(&mut self, world: &mut World, max_steps: usize) -> usize {
        let mut steps = 0;
        while steps < max_steps && self.run_one(world) {
            steps += 1;
        }
        steps
    }

    /// Drive the simulation to the horizon, calling `hook` after every event.
    pub fn run_full_with_hook<F>(&mut self, world: &mut World, hook: F) -> usize
    where
        F: FnMut(&World, &Event),
    {
        run_until_horizon_with_hook(world, &mut self.schedule, hook).expect("run to horizon")
    }

    /// Drive the simulation to the horizon.
    pub fn run_full(&mut self, world: &mut World) -> usize {
        self.run_full_with_hook(world, |_, _| {})
    }
}
