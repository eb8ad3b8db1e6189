pub mod clock;
pub mod distributions;
pub mod ecs;
pub mod error;
pub mod patterns;
pub mod profiling;
pub mod rng;
pub mod runner;
pub mod scenario;
pub mod simulation;
pub mod systems;
pub mod telemetry;
pub mod telemetry_export;

#[cfg(any(test, feature = "test-helpers"))]
pub mod test_helpers;
