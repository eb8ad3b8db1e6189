//! Example: how many buses does the line need?
//!
//! Runs a full day with time-varying demand and impatient passengers for every
//! bus count from 1 to `MAX_BUSES`, then prints the mean wait, longest queue
//! and steady-state occupancy with 95% error bars.
//!
//! Run with: cargo run -p bus_experiments --example bus_count_sweep --release
//! Export:   SIM_EXPORT_DIR=/path cargo run -p bus_experiments --example bus_count_sweep --release

use std::env;
use std::fs;
use std::path::PathBuf;

use bus_experiments::{
    export_results_to_csv, export_results_to_parquet, export_summary_to_csv, export_to_json,
    run_batch, summarize, Aggregate, BatchConfig,
};
use tracing_subscriber::EnvFilter;

const MAX_BUSES: usize = 8;
const RUN_COUNT: usize = 5;

fn cell(aggregate: Option<Aggregate>) -> String {
    match aggregate {
        Some(Aggregate {
            mean,
            half_width: Some(hw),
            ..
        }) => format!("{:>8.2} ± {:<6.2}", mean, hw),
        Some(Aggregate { mean, .. }) => format!("{:>8.2}         ", mean),
        None => format!("{:>8}         ", "n/a"),
    }
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")))
        .init();

    let config = BatchConfig::default()
        .with_max_buses(MAX_BUSES)
        .with_run_count(RUN_COUNT);
    println!(
        "Running {} replications ({} bus counts x {} runs)...",
        config.total_runs(),
        MAX_BUSES,
        RUN_COUNT
    );

    let results = run_batch(&config, true)?;
    let summaries = summarize(&results);

    println!(
        "\n{:>5}  {:^17}  {:^17}  {:^17}",
        "buses", "mean wait (min)", "max queue", "steady occupancy"
    );
    for summary in &summaries {
        println!(
            "{:>5}  {}  {}  {}",
            summary.num_vehicles,
            cell(summary.mean_wait),
            cell(summary.max_queue_length),
            cell(summary.steady_state_mean)
        );
    }

    if let Ok(export_dir) = env::var("SIM_EXPORT_DIR") {
        let export_path = PathBuf::from(export_dir);
        fs::create_dir_all(&export_path)?;
        export_results_to_csv(&results, export_path.join("replications.csv"))?;
        export_results_to_parquet(&results, export_path.join("replications.parquet"))?;
        export_summary_to_csv(&summaries, export_path.join("summary.csv"))?;
        export_to_json(&summaries, export_path.join("summary.json"))?;
        println!("\nExported results to {}", export_path.display());
    }

    Ok(())
}
