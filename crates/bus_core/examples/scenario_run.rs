//! Run one day of the default bus line (15 stops, 5 vehicles) and print the results.
//!
//! Run with: cargo run -p bus_core --example scenario_run
//! Logging:  RUST_LOG=bus_core=debug cargo run -p bus_core --example scenario_run
//! Export:   SIM_EXPORT_DIR=/path cargo run -p bus_core --example scenario_run

use std::env;
use std::path::PathBuf;

use bus_core::scenario::ScenarioParams;
use bus_core::simulation::BusSimulation;
use bus_core::telemetry::{SimSnapshots, SimTelemetry};
use bus_core::telemetry_export::write_run_parquet;
use tracing_subscriber::EnvFilter;

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    const NUM_VEHICLES: usize = 5;
    const SEED: u64 = 123;

    let params = ScenarioParams::default()
        .with_seed(SEED)
        .with_vehicles(NUM_VEHICLES);
    let mut sim = match BusSimulation::new(params) {
        Ok(sim) => sim,
        Err(err) => {
            eprintln!("Invalid scenario: {}", err);
            return;
        }
    };
    let steps = match sim.run() {
        Ok(steps) => steps,
        Err(err) => {
            eprintln!("Simulation failed: {}", err);
            return;
        }
    };

    let summary = sim.summary();
    println!(
        "--- Bus line ({} stops, {} vehicles, {} min, seed {}) ---",
        sim.params().num_stops,
        NUM_VEHICLES,
        sim.params().horizon_min,
        SEED
    );
    println!("Events processed:    {}", steps);
    println!("Final time:          {:.1} min", summary.final_time);
    println!("Generated:           {}", summary.generated);
    println!("Served:              {}", summary.served);
    println!("Still waiting:       {}", summary.waiting);
    println!("Still on board:      {}", summary.onboard);
    println!("Max queue length:    {}", summary.max_queue_length);
    match summary.mean_wait {
        Some(wait) => println!("Mean wait:           {:.2} min", wait),
        None => println!("Mean wait:           n/a"),
    }
    match summary.steady_state_mean {
        Some(mean) => println!("Steady-state load:   {:.1} passengers/vehicle", mean),
        None => println!("Steady-state load:   n/a"),
    }

    println!("\nFirst 10 vehicle arrivals:");
    for record in sim.vehicle_trace().iter().take(10) {
        println!(
            "  t={:>7.2}  {}  at {}{}",
            record.time,
            record.vehicle,
            record.stop,
            if record.full { "  (full)" } else { "" }
        );
    }

    if let Ok(export_dir) = env::var("SIM_EXPORT_DIR") {
        let export_path = PathBuf::from(export_dir);
        let world = sim.world();
        let telemetry = world.resource::<SimTelemetry>();
        let snapshots = world.resource::<SimSnapshots>();
        match write_run_parquet(&export_path, telemetry, snapshots) {
            Ok(()) => println!("\nExported parquet tables to {}", export_path.display()),
            Err(err) => eprintln!("Failed to export telemetry: {}", err),
        }
    }
}
