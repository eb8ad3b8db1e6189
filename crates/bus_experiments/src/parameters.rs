//! Replication plan for bus-count sweeps.
//!
//! A [BatchConfig] expands into one [ReplicationSet] per (bus count, run)
//! pair. Each set carries its own seed so runs are independent and
//! reproducible regardless of the order they execute in.

use bus_core::scenario::ScenarioParams;
use serde::{Deserialize, Serialize};

use crate::error::{ExperimentError, ExperimentResult};

/// One replication: a scenario plus the bookkeeping needed to identify it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReplicationSet {
    /// Base scenario parameters with the bus count applied.
    pub params: ScenarioParams,
    pub experiment_id: String,
    pub num_vehicles: usize,
    /// Replication index within this bus count, starting at 0.
    pub replication: usize,
    /// Position in the whole batch, starting at 0.
    pub run_id: usize,
    pub seed: u64,
}

impl ReplicationSet {
    /// Get the scenario params with seed applied.
    pub fn scenario_params(&self) -> ScenarioParams {
        let mut params = self.params.clone();
        params.seed = Some(self.seed);
        params
    }
}

/// Sweep over bus counts `1..=max_buses`, `run_count` replications each.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BatchConfig {
    pub experiment_id: String,
    pub max_buses: usize,
    pub run_count: usize,
    /// Seed of the first replication; later replications count up from here.
    pub base_seed: u64,
    /// Scenario shared by every replication. Its vehicle count and seed are overridden.
    pub base: ScenarioParams,
}

impl Default for BatchConfig {
    fn default() -> Self {
        Self {
            experiment_id: "bus-count".to_string(),
            max_buses: 5,
            run_count: 3,
            base_seed: 42,
            base: ScenarioParams::default()
                .with_time_varying_demand(true)
                .with_reneging(true),
        }
    }
}

impl BatchConfig {
    pub fn with_max_buses(mut self, max_buses: usize) -> Self {
        self.max_buses = max_buses;
        self
    }

    pub fn with_run_count(mut self, run_count: usize) -> Self {
        self.run_count = run_count;
        self
    }

    pub fn with_base_seed(mut self, seed: u64) -> Self {
        self.base_seed = seed;
        self
    }

    pub fn with_experiment_id(mut self, id: impl Into<String>) -> Self {
        self.experiment_id = id.into();
        self
    }

    pub fn with_base(mut self, base: ScenarioParams) -> Self {
        self.base = base;
        self
    }

    /// Shorten or lengthen every replication.
    pub fn with_horizon_min(mut self, horizon_min: f64) -> Self {
        self.base.horizon_min = horizon_min;
        self
    }

    pub fn total_runs(&self) -> usize {
        self.max_buses * self.run_count
    }

    pub fn validate(&self) -> ExperimentResult<()> {
        if self.max_buses == 0 {
            return Err(ExperimentError::InvalidConfiguration(
                "max_buses must be at least 1".into(),
            ));
        }
        if self.run_count == 0 {
            return Err(ExperimentError::InvalidConfiguration(
                "run_count must be at least 1".into(),
            ));
        }
        self.base.clone().with_vehicles(1).validate()?;
        Ok(())
    }

    /// Expand into replication sets, ordered by bus count then replication.
    pub fn generate(&self) -> Vec<ReplicationSet> {
        let mut sets = Vec::with_capacity(self.total_runs());
        for num_vehicles in 1..=self.max_buses {
            for replication in 0..self.run_count {
                let run_id = sets.len();
                sets.push(ReplicationSet {
                    params: self.base.clone().with_vehicles(num_vehicles),
                    experiment_id: format!("{}-{}bus", self.experiment_id, num_vehicles),
                    num_vehicles,
                    replication,
                    run_id,
                    seed: self.base_seed.wrapping_add(run_id as u64),
                });
            }
        }
        sets
    }
}
