use crate::error::ExperimentResult;
use crate::metrics::{Aggregate, BusCountSummary, ReplicationResult};

pub(crate) fn export_results_impl(
    results: &[ReplicationResult],
    file: std::fs::File,
) -> ExperimentResult<()> {
    let mut wtr = csv::Writer::from_writer(file);
    for result in results {
        wtr.serialize(result)?;
    }
    wtr.flush()?;
    Ok(())
}

fn aggregate_cells(aggregate: Option<&Aggregate>) -> [String; 3] {
    let opt = |v: Option<f64>| v.map(|v| v.to_string()).unwrap_or_default();
    match aggregate {
        Some(a) => [a.mean.to_string(), opt(a.sem), opt(a.half_width)],
        None => [String::new(), String::new(), String::new()],
    }
}

pub(crate) fn export_summary_impl(
    summaries: &[BusCountSummary],
    file: std::fs::File,
) -> ExperimentResult<()> {
    let mut wtr = csv::Writer::from_writer(file);

    wtr.write_record([
        "num_vehicles",
        "runs",
        "mean_wait",
        "mean_wait_sem",
        "mean_wait_ci95",
        "max_queue_length",
        "max_queue_length_sem",
        "max_queue_length_ci95",
        "steady_state_mean",
        "steady_state_mean_sem",
        "steady_state_mean_ci95",
    ])?;

    for summary in summaries {
        let mut record = vec![summary.num_vehicles.to_string(), summary.runs.to_string()];
        for aggregate in [
            summary.mean_wait.as_ref(),
            summary.max_queue_length.as_ref(),
            summary.steady_state_mean.as_ref(),
        ] {
            record.extend(aggregate_cells(aggregate));
        }
        wtr.write_record(&record)?;
    }

    wtr.flush()?;
    Ok(())
}
