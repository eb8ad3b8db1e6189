//! Metrics extraction from finished replications and aggregation per bus count.

use std::collections::BTreeMap;

use bus_core::simulation::BusSimulation;
use serde::{Deserialize, Serialize};

use crate::parameters::ReplicationSet;

/// z-score of a two-sided 95% normal interval.
pub const CI95_Z: f64 = 1.96;

/// Metrics of a single replication.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReplicationResult {
    pub experiment_id: String,
    pub run_id: usize,
    pub num_vehicles: usize,
    pub replication: usize,
    pub seed: u64,
    /// Mean wait of served passengers in minutes; `None` if nobody was served.
    pub mean_wait: Option<f64>,
    pub max_queue_length: usize,
    /// Mean vehicle occupancy over the trailing sample window.
    pub steady_state_mean: Option<f64>,
    pub generated: u64,
    pub served: u64,
    pub reneged: u64,
    pub events_processed: u64,
}

/// Extract metrics from a simulation that has run to its horizon.
pub fn extract_metrics(set: &ReplicationSet, sim: &mut BusSimulation) -> ReplicationResult {
    let summary = sim.summary();
    ReplicationResult {
        experiment_id: set.experiment_id.clone(),
        run_id: set.run_id,
        num_vehicles: set.num_vehicles,
        replication: set.replication,
        seed: set.seed,
        mean_wait: summary.mean_wait,
        max_queue_length: summary.max_queue_length,
        steady_state_mean: summary.steady_state_mean,
        generated: summary.generated,
        served: summary.served,
        reneged: summary.reneged,
        events_processed: summary.events_processed,
    }
}

/// Sample mean with its standard error and 95% half-width.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Aggregate {
    pub samples: usize,
    pub mean: f64,
    /// Standard error of the mean (sample standard deviation over √n).
    /// `None` with a single sample.
    pub sem: Option<f64>,
    /// `CI95_Z · sem`.
    pub half_width: Option<f64>,
}

impl Aggregate {
    /// `None` for an empty sample.
    pub fn from_samples(values: &[f64]) -> Option<Self> {
        if values.is_empty() {
            return None;
        }
        let n = values.len() as f64;
        let mean = values.iter().sum::<f64>() / n;
        let sem = if values.len() > 1 {
            let variance = values.iter().map(|v| (v - mean).powi(2)).sum::<f64>() / (n - 1.0);
            Some(variance.sqrt() / n.sqrt())
        } else {
            None
        };
        Some(Self {
            samples: values.len(),
            mean,
            sem,
            half_width: sem.map(|s| CI95_Z * s),
        })
    }
}

/// Aggregated metrics for one bus count.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BusCountSummary {
    pub num_vehicles: usize,
    pub runs: usize,
    /// Over replications where someone was served.
    pub mean_wait: Option<Aggregate>,
    pub max_queue_length: Option<Aggregate>,
    pub steady_state_mean: Option<Aggregate>,
}

/// Group results by bus count, ascending.
pub fn summarize(results: &[ReplicationResult]) -> Vec<BusCountSummary> {
    let mut groups: BTreeMap<usize, Vec<&ReplicationResult>> = BTreeMap::new();
    for result in results {
        groups.entry(result.num_vehicles).or_default().push(result);
    }

    groups
        .into_iter()
        .map(|(num_vehicles, runs)| {
            let waits: Vec<f64> = runs.iter().filter_map(|r| r.mean_wait).collect();
            let queues: Vec<f64> = runs.iter().map(|r| r.max_queue_length as f64).collect();
            let occupancy: Vec<f64> = runs.iter().filter_map(|r| r.steady_state_mean).collect();
            BusCountSummary {
                num_vehicles,
                runs: runs.len(),
                mean_wait: Aggregate::from_samples(&waits),
                max_queue_length: Aggregate::from_samples(&queues),
                steady_state_mean: Aggregate::from_samples(&occupancy),
            }
        })
        .collect()
}
