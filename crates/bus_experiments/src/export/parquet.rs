use std::sync::Arc;

use arrow::array::{ArrayRef, Float64Array, StringArray, UInt64Array};
use arrow::datatypes::{DataType, Field, Schema};
use arrow::record_batch::RecordBatch;
use parquet::arrow::ArrowWriter;
use parquet::file::properties::WriterProperties;

use crate::error::ExperimentResult;
use crate::metrics::ReplicationResult;

pub(crate) fn export_to_parquet_impl(
    results: &[ReplicationResult],
    file: std::fs::File,
) -> ExperimentResult<()> {
    let batch = build_record_batch(results)?;
    let props = WriterProperties::builder().build();
    let mut writer = ArrowWriter::try_new(file, batch.schema(), Some(props))?;
    writer.write(&batch)?;
    writer.close()?;

    Ok(())
}

fn build_record_batch(
    results: &[ReplicationResult],
) -> Result<RecordBatch, arrow::error::ArrowError> {
    let schema = Arc::new(parquet_schema());
    let arrays = build_arrays(results);

    RecordBatch::try_new(schema, arrays)
}

fn parquet_schema() -> Schema {
    Schema::new(vec![
        Field::new("experiment_id", DataType::Utf8, false),
        Field::new("run_id", DataType::UInt64, false),
        Field::new("num_vehicles", DataType::UInt64, false),
        Field::new("replication", DataType::UInt64, false),
        Field::new("seed", DataType::UInt64, false),
        Field::new("mean_wait", DataType::Float64, true),
        Field::new("max_queue_length", DataType::UInt64, false),
        Field::new("steady_state_mean", DataType::Float64, true),
        Field::new("generated", DataType::UInt64, false),
        Field::new("served", DataType::UInt64, false),
        Field::new("reneged", DataType::UInt64, false),
        Field::new("events_processed", DataType::UInt64, false),
    ])
}

fn u64_column<F>(results: &[ReplicationResult], f: F) -> ArrayRef
where
    F: Fn(&ReplicationResult) -> u64,
{
    Arc::new(UInt64Array::from(results.iter().map(f).collect::<Vec<_>>()))
}

fn optional_f64_column<F>(results: &[ReplicationResult], f: F) -> ArrayRef
where
    F: Fn(&ReplicationResult) -> Option<f64>,
{
    Arc::new(Float64Array::from(results.iter().map(f).collect::<Vec<_>>()))
}

fn build_arrays(results: &[ReplicationResult]) -> Vec<ArrayRef> {
    vec![
        Arc::new(StringArray::from(
            results
                .iter()
                .map(|r| r.experiment_id.as_str())
                .collect::<Vec<_>>(),
        )),
        u64_column(results, |r| r.run_id as u64),
        u64_column(results, |r| r.num_vehicles as u64),
        u64_column(results, |r| r.replication as u64),
        u64_column(results, |r| r.seed),
        optional_f64_column(results, |r| r.mean_wait),
        u64_column(results, |r| r.max_queue_length as u64),
        optional_f64_column(results, |r| r.steady_state_mean),
        u64_column(results, |r| r.generated),
        u64_column(results, |r| r.served),
        u64_column(results, |r| r.reneged),
        u64_column(results, |r| r.events_processed),
    ]
}
