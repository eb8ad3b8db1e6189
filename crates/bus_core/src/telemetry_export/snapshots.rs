use std::path::Path;
use std::sync::Arc;

use arrow::array::{ArrayRef, Float64Array, UInt32Array, UInt64Array};
use arrow::datatypes::Schema;

use crate::error::ExportError;
use crate::telemetry::SimSnapshots;

use super::utils::{f64_field, u32_field, u64_field, write_record_batch};

/// Ledger counts and queue length per sample.
pub fn write_snapshot_counts_parquet<P: AsRef<Path>>(
    path: P,
    snapshots: &SimSnapshots,
) -> Result<(), ExportError> {
    let n = snapshots.snapshots.len();
    let mut timestamp = Vec::with_capacity(n);
    let mut mean_onboard = Vec::with_capacity(n);
    let mut max_queue_length = Vec::with_capacity(n);
    let mut generated = Vec::with_capacity(n);
    let mut waiting = Vec::with_capacity(n);
    let mut onboard = Vec::with_capacity(n);
    let mut served = Vec::with_capacity(n);
    let mut reneged = Vec::with_capacity(n);

    for snapshot in &snapshots.snapshots {
        timestamp.push(snapshot.timestamp);
        mean_onboard.push(snapshot.mean_onboard());
        max_queue_length.push(snapshot.max_queue_length as u64);
        generated.push(snapshot.counts.generated);
        waiting.push(snapshot.counts.waiting);
        onboard.push(snapshot.counts.onboard);
        served.push(snapshot.counts.served);
        reneged.push(snapshot.counts.reneged);
    }

    let schema = Schema::new(vec![
        f64_field("timestamp"),
        f64_field("mean_onboard"),
        u64_field("max_queue_length"),
        u64_field("generated"),
        u64_field("waiting"),
        u64_field("onboard"),
        u64_field("served"),
        u64_field("reneged"),
    ]);

    let arrays: Vec<ArrayRef> = vec![
        Arc::new(Float64Array::from(timestamp)),
        Arc::new(Float64Array::from(mean_onboard)),
        Arc::new(UInt64Array::from(max_queue_length)),
        Arc::new(UInt64Array::from(generated)),
        Arc::new(UInt64Array::from(waiting)),
        Arc::new(UInt64Array::from(onboard)),
        Arc::new(UInt64Array::from(served)),
        Arc::new(UInt64Array::from(reneged)),
    ];

    write_record_batch(path, schema, arrays)
}

/// Long format: one row per (sample, vehicle).
pub fn write_vehicle_occupancy_parquet<P: AsRef<Path>>(
    path: P,
    snapshots: &SimSnapshots,
) -> Result<(), ExportError> {
    let mut timestamp = Vec::new();
    let mut vehicle = Vec::new();
    let mut onboard = Vec::new();

    for snapshot in &snapshots.snapshots {
        for (idx, count) in snapshot.onboard_by_vehicle.iter().enumerate() {
            timestamp.push(snapshot.timestamp);
            vehicle.push(idx as u32 + 1);
            onboard.push(*count as u64);
        }
    }

    let schema = Schema::new(vec![
        f64_field("timestamp"),
        u32_field("vehicle"),
        u64_field("onboard"),
    ]);

    let arrays: Vec<ArrayRef> = vec![
        Arc::new(Float64Array::from(timestamp)),
        Arc::new(UInt32Array::from(vehicle)),
        Arc::new(UInt64Array::from(onboard)),
    ];

    write_record_batch(path, schema, arrays)
}
