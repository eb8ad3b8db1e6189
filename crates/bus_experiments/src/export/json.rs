use serde::Serialize;

use crate::error::ExperimentResult;

pub(crate) fn export_to_json_impl<T: Serialize>(
    items: &[T],
    file: std::fs::File,
) -> ExperimentResult<()> {
    serde_json::to_writer_pretty(file, items)?;
    Ok(())
}
