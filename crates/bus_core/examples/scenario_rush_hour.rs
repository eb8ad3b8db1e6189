//! Rush-hour day: time-varying demand with impatient passengers.
//!
//! Reports throughput and the wait distributions of served and reneged passengers.
//!
//! Run with: cargo run -p bus_core --example scenario_rush_hour --release

use std::time::Instant;

use bus_core::profiling::EventMetrics;
use bus_core::scenario::ScenarioParams;
use bus_core::simulation::BusSimulation;
use tracing_subscriber::EnvFilter;

fn percentiles(mut values: Vec<f64>) -> Option<(f64, f64, f64, f64, f64)> {
    if values.is_empty() {
        return None;
    }
    values.sort_by(f64::total_cmp);
    let at = |q: f64| values[((values.len() - 1) as f64 * q) as usize];
    let avg = values.iter().sum::<f64>() / values.len() as f64;
    Some((avg, at(0.5), at(0.9), at(0.99), values[values.len() - 1]))
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    const NUM_VEHICLES: usize = 3;

    let build_start = Instant::now();
    let params = ScenarioParams::default()
        .with_seed(42)
        .with_vehicles(NUM_VEHICLES)
        .with_time_varying_demand(true)
        .with_reneging(true);
    let mut sim = match BusSimulation::new(params) {
        Ok(sim) => sim,
        Err(err) => {
            eprintln!("Invalid scenario: {}", err);
            return;
        }
    };
    println!("Build time: {:.3}s", build_start.elapsed().as_secs_f64());

    let run_start = Instant::now();
    let steps = match sim.run() {
        Ok(steps) => steps,
        Err(err) => {
            eprintln!("Simulation failed: {}", err);
            return;
        }
    };
    let run_elapsed = run_start.elapsed();

    let summary = sim.summary();
    println!("\n--- Simulation Results ---");
    println!("Events processed:    {}", steps);
    println!("Wall-clock time:     {:.2}s", run_elapsed.as_secs_f64());
    println!(
        "Events per second:   {:.0}",
        steps as f64 / run_elapsed.as_secs_f64()
    );

    println!("\n--- Outcomes ---");
    println!("Generated:           {}", summary.generated);
    println!("Served:              {}", summary.served);
    println!("Reneged:             {}", summary.reneged);
    println!("Max queue length:    {}", summary.max_queue_length);

    println!("\n--- Wait Distributions (minutes) ---");
    println!(
        "{:12} {:>8} {:>8} {:>8} {:>8} {:>8}",
        "", "avg", "p50", "p90", "p99", "max"
    );
    for (label, values) in [
        ("Served", sim.wait_times()),
        ("Reneged", sim.reneged_wait_times()),
    ] {
        match percentiles(values) {
            Some((avg, p50, p90, p99, max)) => println!(
                "{:12} {:>8.2} {:>8.2} {:>8.2} {:>8.2} {:>8.2}",
                label, avg, p50, p90, p99, max
            ),
            None => println!("{:12} {:>8}", label, "n/a"),
        }
    }

    sim.world().resource::<EventMetrics>().log_summary();
}
