//! Replication execution.
//!
//! Every replication builds its own world and random stream, so runs share
//! nothing and each result depends only on its own seed.

use bus_core::simulation::BusSimulation;
use indicatif::{ProgressBar, ProgressStyle};

use crate::error::ExperimentResult;
use crate::metrics::{extract_metrics, ReplicationResult};
use crate::parameters::{BatchConfig, ReplicationSet};

/// Run one replication to its horizon and extract its metrics.
pub fn run_single_replication(set: &ReplicationSet) -> ExperimentResult<ReplicationResult> {
    let mut sim = BusSimulation::new(set.scenario_params())?;
    sim.run()?;
    Ok(extract_metrics(set, &mut sim))
}

fn progress_bar(total: usize) -> ProgressBar {
    let bar = ProgressBar::new(total as u64);
    let style = ProgressStyle::default_bar()
        .template("{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} ({eta})")
        .map(|style| style.progress_chars("#>-"))
        .unwrap_or_else(|_| ProgressStyle::default_bar());
    bar.set_style(style);
    bar
}

/// Run replications one after another, results in input order.
///
/// The first failing replication aborts the batch.
pub fn run_replications(
    sets: &[ReplicationSet],
    show_progress: bool,
) -> ExperimentResult<Vec<ReplicationResult>> {
    let total = sets.len();
    let pb = (show_progress && total > 0).then(|| progress_bar(total));

    tracing::info!(replications = total, "starting batch");

    let mut results = Vec::with_capacity(total);
    for set in sets {
        let result = run_single_replication(set)?;
        tracing::debug!(
            run = set.run_id,
            buses = set.num_vehicles,
            seed = set.seed,
            mean_wait = ?result.mean_wait,
            max_queue = result.max_queue_length,
            "replication finished"
        );
        results.push(result);
        if let Some(ref progress_bar) = pb {
            progress_bar.inc(1);
        }
    }

    if let Some(ref progress_bar) = pb {
        progress_bar.finish_with_message("Completed");
    }

    Ok(results)
}

/// Validate `config`, expand it and run every replication.
pub fn run_batch(config: &BatchConfig, show_progress: bool) -> ExperimentResult<Vec<ReplicationResult>> {
    config.validate()?;
    let sets = config.generate();
    run_replications(&sets, show_progress)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ExperimentError;

    fn short_batch() -> BatchConfig {
        BatchConfig::default()
            .with_max_buses(2)
            .with_run_count(2)
            .with_horizon_min(240.0)
    }

    #[test]
    fn single_replication_produces_metrics() {
        let sets = short_batch().generate();
        let result = run_single_replication(&sets[0]).expect("run");

        assert_eq!(result.num_vehicles, 1);
        assert_eq!(result.seed, sets[0].seed);
        assert!(result.generated > 0);
        assert!(result.events_processed > 0);
        assert!(result.served + result.reneged <= result.generated);
    }

    #[test]
    fn batch_results_follow_input_order() {
        let results = run_batch(&short_batch(), false).expect("batch");

        assert_eq!(results.len(), 4);
        let order: Vec<(usize, usize)> = results
            .iter()
            .map(|r| (r.num_vehicles, r.replication))
            .collect();
        assert_eq!(order, vec![(1, 0), (1, 1), (2, 0), (2, 1)]);
    }

    #[test]
    fn replication_depends_only_on_its_seed() {
        let sets = short_batch().generate();
        let in_batch = run_replications(&sets, false).expect("batch");
        let alone = run_single_replication(&sets[3]).expect("run");
        assert_eq!(in_batch[3], alone);
    }

    #[test]
    fn invalid_config_fails_before_running() {
        let config = short_batch().with_run_count(0);
        assert!(matches!(
            run_batch(&config, false),
            Err(ExperimentError::InvalidConfiguration(_))
        ));
    }
}
