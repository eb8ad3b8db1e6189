//! Result export: per-replication rows and per-bus-count summaries.

use std::path::Path;

use serde::Serialize;

use crate::error::ExperimentResult;
use crate::metrics::{BusCountSummary, ReplicationResult};

#[path = "export/csv.rs"]
mod csv;
#[path = "export/json.rs"]
mod json;
#[path = "export/parquet.rs"]
mod parquet;
#[path = "export/writer_utils.rs"]
mod writer_utils;

/// Export replication results to CSV, one row per replication.
///
/// Missing metrics (no served passengers, no samples) are written as empty cells.
pub fn export_results_to_csv(
    results: &[ReplicationResult],
    path: impl AsRef<Path>,
) -> ExperimentResult<()> {
    writer_utils::ensure_not_empty(results)?;
    let file = writer_utils::create_output_file(path)?;
    csv::export_results_impl(results, file)
}

/// Export per-bus-count summaries to CSV with mean, sem and 95% half-width columns.
pub fn export_summary_to_csv(
    summaries: &[BusCountSummary],
    path: impl AsRef<Path>,
) -> ExperimentResult<()> {
    writer_utils::ensure_not_empty(summaries)?;
    let file = writer_utils::create_output_file(path)?;
    csv::export_summary_impl(summaries, file)
}

/// Export any serializable rows to a pretty-printed JSON array.
pub fn export_to_json<T: Serialize>(items: &[T], path: impl AsRef<Path>) -> ExperimentResult<()> {
    let file = writer_utils::create_output_file(path)?;
    json::export_to_json_impl(items, file)
}

/// Export replication results to Parquet.
pub fn export_results_to_parquet(
    results: &[ReplicationResult],
    path: impl AsRef<Path>,
) -> ExperimentResult<()> {
    writer_utils::ensure_not_empty(results)?;
    let file = writer_utils::create_output_file(path)?;
    parquet::export_to_parquet_impl(results, file)
}
