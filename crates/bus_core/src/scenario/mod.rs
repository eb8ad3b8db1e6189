//! Scenario setup: validate parameters, spawn stops and vehicles, insert config resources.

mod build;
mod params;

pub use build::{build_scenario, initialize_simulation, starting_stop};
pub use params::{
    DemandConfig, RenegingConfig, RouteConfig, ScenarioParams, SimulationEndTime, TrackedStop,
    VehicleTimingConfig, DEFAULT_DESTINATION_SPAN, DEFAULT_NUM_STOPS, DEFAULT_PATIENCE_MIN,
    DEFAULT_PROTECTED_RANKS, DEFAULT_VEHICLE_CAPACITY,
};
