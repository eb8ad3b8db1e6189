//! Parquet export of run telemetry for external analysis and plotting.

use std::path::Path;

use crate::error::ExportError;
use crate::telemetry::{SimSnapshots, SimTelemetry};

mod reneged;
mod served_passengers;
mod snapshots;
mod utils;
mod validate;
mod vehicle_trace;

pub use reneged::write_reneged_parquet;
pub use served_passengers::write_served_passengers_parquet;
pub use snapshots::{write_snapshot_counts_parquet, write_vehicle_occupancy_parquet};
pub use validate::validate_served_batch;
pub use vehicle_trace::write_vehicle_trace_parquet;

/// Write every telemetry table into `dir` under fixed file names.
pub fn write_run_parquet<P: AsRef<Path>>(
    dir: P,
    telemetry: &SimTelemetry,
    snapshots: &SimSnapshots,
) -> Result<(), ExportError> {
    let dir = dir.as_ref();
    std::fs::create_dir_all(dir)?;
    write_served_passengers_parquet(dir.join("served_passengers.parquet"), telemetry)?;
    write_reneged_parquet(dir.join("reneged.parquet"), telemetry)?;
    write_vehicle_trace_parquet(dir.join("vehicle_trace.parquet"), telemetry)?;
    write_snapshot_counts_parquet(dir.join("snapshot_counts.parquet"), snapshots)?;
    write_vehicle_occupancy_parquet(dir.join("vehicle_occupancy.parquet"), snapshots)?;
    tracing::info!(dir = %dir.display(), "telemetry written");
    Ok(())
}
