//! One bus line run: build the world, run to the horizon, query the results.

use bevy_ecs::prelude::{Schedule, World};
use serde::{Deserialize, Serialize};

use crate::clock::{Event, SimulationClock};
use crate::ecs::{RouteDirectory, Stop, Vehicle, VehicleId};
use crate::error::{SimError, SimResult};
use crate::profiling::EventMetrics;
use crate::runner::{run_until_horizon, run_until_horizon_with_hook, simulation_schedule};
use crate::scenario::{build_scenario, initialize_simulation, ScenarioParams};
use crate::telemetry::{
    PassengerCounts, RenegedRecord, ServedBatch, SimSnapshotConfig, SimSnapshots, SimTelemetry,
    StatsSnapshot, VehicleArrivalRecord,
};

/// Headline numbers of a finished run.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RunSummary {
    pub num_vehicles: usize,
    pub final_time: f64,
    pub events_processed: u64,
    pub generated: u64,
    pub served: u64,
    pub reneged: u64,
    pub waiting: u64,
    pub onboard: u64,
    /// `None` when nobody reached a destination.
    pub mean_wait: Option<f64>,
    pub max_queue_length: usize,
    pub steady_state_mean: Option<f64>,
}

pub struct BusSimulation {
    world: World,
    schedule: Schedule,
    params: ScenarioParams,
}

impl BusSimulation {
    /// Build the world and seed the initial events. Fails on invalid parameters.
    pub fn new(params: ScenarioParams) -> SimResult<Self> {
        let mut world = World::new();
        build_scenario(&mut world, params.clone())?;
        initialize_simulation(&mut world)?;
        Ok(Self {
            world,
            schedule: simulation_schedule(),
            params,
        })
    }

    /// Run to the horizon and return the number of events processed.
    pub fn run(&mut self) -> SimResult<usize> {
        let steps = run_until_horizon(&mut self.world, &mut self.schedule)?;
        self.log_completion(steps);
        Ok(steps)
    }

    /// Run to the horizon, calling `hook` after every event.
    pub fn run_with_hook<F>(&mut self, hook: F) -> SimResult<usize>
    where
        F: FnMut(&World, &Event),
    {
        let steps = run_until_horizon_with_hook(&mut self.world, &mut self.schedule, hook)?;
        self.log_completion(steps);
        Ok(steps)
    }

    fn log_completion(&self, steps: usize) {
        let telemetry = self.telemetry();
        tracing::info!(
            events = steps,
            t = self.now(),
            generated = telemetry.passengers_generated,
            served = telemetry.passengers_served,
            reneged = telemetry.passengers_reneged,
            max_queue = telemetry.max_queue_length,
            "run complete"
        );
    }

    pub fn params(&self) -> &ScenarioParams {
        &self.params
    }

    pub fn world(&self) -> &World {
        &self.world
    }

    pub fn world_mut(&mut self) -> &mut World {
        &mut self.world
    }

    pub fn now(&self) -> f64 {
        self.world
            .get_resource::<SimulationClock>()
            .map(SimulationClock::now)
            .unwrap_or(0.0)
    }

    pub fn telemetry(&self) -> &SimTelemetry {
        self.world.resource::<SimTelemetry>()
    }

    pub fn snapshots(&self) -> impl Iterator<Item = &StatsSnapshot> {
        self.world.resource::<SimSnapshots>().snapshots.iter()
    }

    /// Every vehicle visit with the passengers who alighted.
    pub fn served_log(&self) -> &[ServedBatch] {
        &self.telemetry().served
    }

    pub fn wait_times(&self) -> Vec<f64> {
        self.telemetry().wait_times()
    }

    pub fn mean_wait(&self) -> Option<f64> {
        self.telemetry().mean_wait()
    }

    pub fn max_queue_length(&self) -> usize {
        self.telemetry().max_queue_length
    }

    pub fn reneged(&self) -> &[RenegedRecord] {
        &self.telemetry().reneged
    }

    pub fn reneged_wait_times(&self) -> Vec<f64> {
        self.telemetry().reneged_wait_times()
    }

    pub fn vehicle_trace(&self) -> &[VehicleArrivalRecord] {
        &self.telemetry().vehicle_arrivals
    }

    pub fn tracked_arrivals(&self) -> &[f64] {
        &self.telemetry().tracked_arrivals
    }

    pub fn cumulative_departures(&self, vehicle: VehicleId) -> Vec<(f64, u64)> {
        self.telemetry().cumulative_departures(vehicle)
    }

    /// Trailing-window mean of per-sample mean occupancy.
    pub fn steady_state_mean(&self) -> Option<f64> {
        let window = self.world.resource::<SimSnapshotConfig>().steady_state_window;
        self.world
            .resource::<SimSnapshots>()
            .steady_state_mean(window)
    }

    /// Live passenger ledger, read straight from the entities.
    pub fn passenger_counts(&mut self) -> PassengerCounts {
        let waiting: u64 = self
            .world
            .query::<&Stop>()
            .iter(&self.world)
            .map(|s| s.queue_len() as u64)
            .sum();
        let onboard: u64 = self
            .world
            .query::<&Vehicle>()
            .iter(&self.world)
            .map(|v| v.onboard_count() as u64)
            .sum();
        let telemetry = self.telemetry();
        PassengerCounts {
            generated: telemetry.passengers_generated,
            waiting,
            onboard,
            served: telemetry.passengers_served,
            reneged: telemetry.passengers_reneged,
        }
    }

    /// Current state of every vehicle, in vehicle id order.
    pub fn vehicles(&self) -> SimResult<Vec<&Vehicle>> {
        let directory = self
            .world
            .get_resource::<RouteDirectory>()
            .ok_or(SimError::MissingResource("RouteDirectory"))?;
        Ok(directory
            .vehicles()
            .iter()
            .filter_map(|entity| self.world.get::<Vehicle>(*entity))
            .collect())
    }

    pub fn summary(&mut self) -> RunSummary {
        let counts = self.passenger_counts();
        let events_processed = self
            .world
            .get_resource::<EventMetrics>()
            .map(|m| m.events_processed)
            .unwrap_or(0);
        RunSummary {
            num_vehicles: self.params.num_vehicles,
            final_time: self.now(),
            events_processed,
            generated: counts.generated,
            served: counts.served,
            reneged: counts.reneged,
            waiting: counts.waiting,
            onboard: counts.onboard,
            mean_wait: self.mean_wait(),
            max_queue_length: self.max_queue_length(),
            steady_state_mean: self.steady_state_mean(),
        }
    }
}
