use std::fs::File;
use std::path::Path;
use std::sync::Arc;

use arrow::array::ArrayRef;
use arrow::datatypes::{DataType, Field, Schema};
use arrow::record_batch::RecordBatch;
use parquet::arrow::ArrowWriter;

use crate::error::ExportError;

pub(super) fn u64_field(name: &'static str) -> Field {
    Field::new(name, DataType::UInt64, false)
}

pub(super) fn u32_field(name: &'static str) -> Field {
    Field::new(name, DataType::UInt32, false)
}

pub(super) fn bool_field(name: &'static str) -> Field {
    Field::new(name, DataType::Boolean, false)
}

pub(super) fn f64_field(name: &'static str) -> Field {
    Field::new(name, DataType::Float64, false)
}

pub(super) fn write_record_batch<P: AsRef<Path>>(
    path: P,
    schema: Schema,
    arrays: Vec<ArrayRef>,
) -> Result<(), ExportError> {
    let schema = Arc::new(schema);
    let batch = RecordBatch::try_new(schema.clone(), arrays)?;
    let file = File::create(path)?;
    let mut writer = ArrowWriter::try_new(file, schema, None)?;
    writer.write(&batch)?;
    writer.close()?;
    Ok(())
}
