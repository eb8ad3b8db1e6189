mod support;

use std::fs::File;
use std::path::Path;

use bus_core::ecs::{StopId, VehicleId};
use bus_core::simulation::BusSimulation;
use bus_core::telemetry::{ServedBatch, SimSnapshots, SimTelemetry};
use bus_core::telemetry_export::{
    validate_served_batch, write_reneged_parquet, write_run_parquet,
    write_served_passengers_parquet, write_snapshot_counts_parquet, write_vehicle_trace_parquet,
};
use bus_core::test_helpers::test_passenger;
use parquet::arrow::arrow_reader::ParquetRecordBatchReaderBuilder;

use support::world::seeded_params;

fn parquet_field_specs(path: &Path) -> Vec<(String, String, bool)> {
    let file = File::open(path).expect("parquet file should exist");
    let builder =
        ParquetRecordBatchReaderBuilder::try_new(file).expect("parquet reader should build");
    builder
        .schema()
        .fields()
        .iter()
        .map(|field| {
            (
                field.name().to_string(),
                field.data_type().to_string(),
                field.is_nullable(),
            )
        })
        .collect()
}

fn parquet_row_count(path: &Path) -> usize {
    let file = File::open(path).expect("parquet file should exist");
    let reader = ParquetRecordBatchReaderBuilder::try_new(file)
        .expect("parquet reader should build")
        .build()
        .expect("reader");
    reader
        .map(|batch| batch.expect("record batch").num_rows())
        .sum()
}

fn field(name: &str, data_type: &str) -> (String, String, bool) {
    (name.to_string(), data_type.to_string(), false)
}

fn served_batch(stop: u32, time: f64, passengers: Vec<(f64, f64, u32)>) -> ServedBatch {
    ServedBatch {
        time,
        vehicle: VehicleId(1),
        stop: StopId(stop),
        passengers: passengers
            .into_iter()
            .enumerate()
            .map(|(i, (arrival, departure, destination))| {
                let mut p = test_passenger(i as u64, arrival, 1, destination);
                p.departure_time = Some(departure);
                p
            })
            .collect(),
    }
}

#[test]
fn validate_consistent_batch() {
    let batch = served_batch(3, 10.0, vec![(1.0, 4.0, 3), (2.0, 4.0, 3)]);
    assert!(validate_served_batch(&batch).is_none());
}

#[test]
fn validate_flags_out_of_order_times() {
    let boarded_before_arrival = served_batch(3, 10.0, vec![(5.0, 4.0, 3)]);
    assert!(validate_served_batch(&boarded_before_arrival).is_some());

    let served_before_boarding = served_batch(3, 3.0, vec![(1.0, 4.0, 3)]);
    assert!(validate_served_batch(&served_before_boarding).is_some());
}

#[test]
fn validate_flags_wrong_stop_and_missing_boarding() {
    let wrong_stop = served_batch(2, 10.0, vec![(1.0, 4.0, 3)]);
    assert!(validate_served_batch(&wrong_stop).is_some());

    let mut never_boarded = served_batch(3, 10.0, vec![(1.0, 4.0, 3)]);
    never_boarded.passengers[0].departure_time = None;
    assert!(validate_served_batch(&never_boarded).is_some());
}

#[test]
fn every_served_batch_of_a_run_is_consistent() {
    let mut sim = BusSimulation::new(seeded_params(42, 240.0).with_reneging(true))
        .expect("params");
    sim.run().expect("run");

    let errors: Vec<String> = sim
        .served_log()
        .iter()
        .filter_map(validate_served_batch)
        .collect();
    assert!(errors.is_empty(), "{}", errors.join("\n"));
}

#[test]
fn served_passengers_schema_and_rows() {
    let mut telemetry = SimTelemetry::default();
    telemetry.record_served(served_batch(3, 10.0, vec![(1.0, 4.0, 3), (2.0, 4.0, 3)]));
    telemetry.record_served(served_batch(2, 12.0, vec![]));

    let dir = tempfile::tempdir().expect("tempdir");
    let path = dir.path().join("served.parquet");
    write_served_passengers_parquet(&path, &telemetry).expect("write served passengers");

    assert_eq!(
        parquet_field_specs(&path),
        vec![
            field("served_at", "Float64"),
            field("vehicle", "UInt32"),
            field("passenger", "UInt64"),
            field("source_stop", "UInt32"),
            field("destination_stop", "UInt32"),
            field("arrival_time", "Float64"),
            field("departure_time", "Float64"),
            field("wait", "Float64"),
        ]
    );
    assert_eq!(parquet_row_count(&path), 2);
}

#[test]
fn reneged_and_trace_schemas() {
    let telemetry = SimTelemetry::default();
    let dir = tempfile::tempdir().expect("tempdir");

    let reneged = dir.path().join("reneged.parquet");
    write_reneged_parquet(&reneged, &telemetry).expect("write reneged");
    assert_eq!(
        parquet_field_specs(&reneged),
        vec![
            field("time", "Float64"),
            field("stop", "UInt32"),
            field("passenger", "UInt64"),
            field("wait", "Float64"),
            field("rank", "UInt64"),
        ]
    );
    assert_eq!(parquet_row_count(&reneged), 0);

    let trace = dir.path().join("trace.parquet");
    write_vehicle_trace_parquet(&trace, &telemetry).expect("write trace");
    assert_eq!(
        parquet_field_specs(&trace),
        vec![
            field("time", "Float64"),
            field("vehicle", "UInt32"),
            field("stop", "UInt32"),
            field("full", "Boolean"),
        ]
    );
}

#[test]
fn snapshot_counts_have_one_row_per_sample() {
    let mut sim = BusSimulation::new(seeded_params(5, 60.0)).expect("params");
    sim.run().expect("run");

    let dir = tempfile::tempdir().expect("tempdir");
    let path = dir.path().join("counts.parquet");
    let snapshots = sim.world().resource::<SimSnapshots>();
    write_snapshot_counts_parquet(&path, snapshots).expect("write counts");
    assert_eq!(parquet_row_count(&path), 6);
}

#[test]
fn full_run_export_writes_every_table() {
    let mut sim = BusSimulation::new(seeded_params(6, 120.0).with_reneging(true))
        .expect("params");
    sim.run().expect("run");

    let dir = tempfile::tempdir().expect("tempdir");
    let out = dir.path().join("run");
    write_run_parquet(
        &out,
        sim.telemetry(),
        sim.world().resource::<SimSnapshots>(),
    )
    .expect("export run");

    for name in [
        "served_passengers.parquet",
        "reneged.parquet",
        "vehicle_trace.parquet",
        "snapshot_counts.parquet",
        "vehicle_occupancy.parquet",
    ] {
        assert!(out.join(name).exists(), "{name} missing");
    }
    assert_eq!(
        parquet_row_count(&out.join("served_passengers.parquet")) as u64,
        sim.telemetry().passengers_served
    );
    assert_eq!(
        parquet_row_count(&out.join("vehicle_trace.parquet")),
        sim.vehicle_trace().len()
    );
}
