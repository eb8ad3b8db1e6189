use std::path::Path;
use std::sync::Arc;

use arrow::array::{ArrayRef, Float64Array, UInt32Array, UInt64Array};
use arrow::datatypes::Schema;

use crate::error::ExportError;
use crate::telemetry::SimTelemetry;

use super::utils::{f64_field, u32_field, u64_field, write_record_batch};

pub fn write_reneged_parquet<P: AsRef<Path>>(
    path: P,
    telemetry: &SimTelemetry,
) -> Result<(), ExportError> {
    let records = &telemetry.reneged;
    let schema = Schema::new(vec![
        f64_field("time"),
        u32_field("stop"),
        u64_field("passenger"),
        f64_field("wait"),
        u64_field("rank"),
    ]);

    let arrays: Vec<ArrayRef> = vec![
        Arc::new(Float64Array::from_iter_values(records.iter().map(|r| r.time))),
        Arc::new(UInt32Array::from_iter_values(records.iter().map(|r| r.stop.0))),
        Arc::new(UInt64Array::from_iter_values(
            records.iter().map(|r| r.passenger.0),
        )),
        Arc::new(Float64Array::from_iter_values(records.iter().map(|r| r.wait))),
        Arc::new(UInt64Array::from_iter_values(
            records.iter().map(|r| r.rank as u64),
        )),
    ];

    write_record_batch(path, schema, arrays)
}
