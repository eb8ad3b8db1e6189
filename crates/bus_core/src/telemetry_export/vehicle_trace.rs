use std::path::Path;
use std::sync::Arc;

use arrow::array::{ArrayRef, BooleanArray, Float64Array, UInt32Array};
use arrow::datatypes::Schema;

use crate::error::ExportError;
use crate::telemetry::SimTelemetry;

use super::utils::{bool_field, f64_field, u32_field, write_record_batch};

/// Every vehicle arrival: `(time, vehicle, stop, full)`.
pub fn write_vehicle_trace_parquet<P: AsRef<Path>>(
    path: P,
    telemetry: &SimTelemetry,
) -> Result<(), ExportError> {
    let records = &telemetry.vehicle_arrivals;
    let schema = Schema::new(vec![
        f64_field("time"),
        u32_field("vehicle"),
        u32_field("stop"),
        bool_field("full"),
    ]);

    let arrays: Vec<ArrayRef> = vec![
        Arc::new(Float64Array::from_iter_values(records.iter().map(|r| r.time))),
        Arc::new(UInt32Array::from_iter_values(
            records.iter().map(|r| r.vehicle.0),
        )),
        Arc::new(UInt32Array::from_iter_values(records.iter().map(|r| r.stop.0))),
        Arc::new(BooleanArray::from(
            records.iter().map(|r| r.full).collect::<Vec<bool>>(),
        )),
    ];

    write_record_batch(path, schema, arrays)
}
