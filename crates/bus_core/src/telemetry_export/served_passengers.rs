use std::path::Path;
use std::sync::Arc;

use arrow::array::{ArrayRef, Float64Array, UInt32Array, UInt64Array};
use arrow::datatypes::Schema;

use crate::error::ExportError;
use crate::telemetry::SimTelemetry;

use super::utils::{f64_field, u32_field, u64_field, write_record_batch};

/// One row per passenger dropped off, in service order.
pub fn write_served_passengers_parquet<P: AsRef<Path>>(
    path: P,
    telemetry: &SimTelemetry,
) -> Result<(), ExportError> {
    let rows = telemetry.passengers_served as usize;
    let mut served_at = Vec::with_capacity(rows);
    let mut vehicle = Vec::with_capacity(rows);
    let mut passenger = Vec::with_capacity(rows);
    let mut source_stop = Vec::with_capacity(rows);
    let mut destination_stop = Vec::with_capacity(rows);
    let mut arrival_time = Vec::with_capacity(rows);
    let mut departure_time = Vec::with_capacity(rows);
    let mut wait = Vec::with_capacity(rows);

    for batch in &telemetry.served {
        for p in &batch.passengers {
            let Some(boarded) = p.departure_time else {
                continue;
            };
            served_at.push(batch.time);
            vehicle.push(batch.vehicle.0);
            passenger.push(p.id.0);
            source_stop.push(p.source_stop.0);
            destination_stop.push(p.destination_stop.0);
            arrival_time.push(p.arrival_time);
            departure_time.push(boarded);
            wait.push(boarded - p.arrival_time);
        }
    }

    let schema = Schema::new(vec![
        f64_field("served_at"),
        u32_field("vehicle"),
        u64_field("passenger"),
        u32_field("source_stop"),
        u32_field("destination_stop"),
        f64_field("arrival_time"),
        f64_field("departure_time"),
        f64_field("wait"),
    ]);

    let arrays: Vec<ArrayRef> = vec![
        Arc::new(Float64Array::from(served_at)),
        Arc::new(UInt32Array::from(vehicle)),
        Arc::new(UInt64Array::from(passenger)),
        Arc::new(UInt32Array::from(source_stop)),
        Arc::new(UInt32Array::from(destination_stop)),
        Arc::new(Float64Array::from(arrival_time)),
        Arc::new(Float64Array::from(departure_time)),
        Arc::new(Float64Array::from(wait)),
    ];

    write_record_batch(path, schema, arrays)
}
