//! Replication framework for bus line experiments.
//!
//! Runs the bus line simulation for every bus count from 1 to `max_buses`,
//! several independent replications each, and aggregates the headline metrics
//! (mean wait, longest queue, steady-state occupancy) into a mean with a 95%
//! error bar.
//!
//! # Quick Start
//!
//! ```no_run
//! use bus_experiments::{run_batch, summarize, BatchConfig};
//!
//! let config = BatchConfig::default().with_max_buses(8).with_run_count(10);
//! let results = run_batch(&config, true).unwrap();
//! for summary in summarize(&results) {
//!     println!("{} buses: {:?}", summary.num_vehicles, summary.mean_wait);
//! }
//! ```
//!
//! # Architecture
//!
//! - [`parameters`]: batch configuration and its expansion into replication sets
//! - [`runner`]: replication execution with progress reporting
//! - [`metrics`]: per-replication metrics and per-bus-count aggregation
//! - [`export`]: CSV, JSON and Parquet output

pub mod error;
pub mod export;
pub mod metrics;
pub mod parameters;
pub mod runner;

pub use error::{ExperimentError, ExperimentResult};
pub use export::{
    export_results_to_csv, export_results_to_parquet, export_summary_to_csv, export_to_json,
};
pub use metrics::{summarize, Aggregate, BusCountSummary, ReplicationResult};
pub use parameters::{BatchConfig, ReplicationSet};
pub use runner::{run_batch, run_replications, run_single_replication};
