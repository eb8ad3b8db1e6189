//! Random process generators: inter-arrival gaps and service durations.
//!
//! All durations are in simulation minutes and never negative. Callers pass the
//! run's generator in explicitly; nothing here owns random state.

use rand::rngs::StdRng;
use rand_distr::{Distribution, Exp, StandardNormal};
use serde::{Deserialize, Serialize};

/// Truncation bound of the duration distributions, in standard deviations above the mean.
pub const DEFAULT_UPPER_SD: f64 = 10.0;

/// Trait for sampling passenger inter-arrival gaps (in minutes).
pub trait InterArrivalDistribution: Send + Sync + std::fmt::Debug {
    /// Sample the gap until the next arrival at a stop whose current rate is
    /// `rate_per_min` arrivals per minute.
    fn sample(&self, rng: &mut StdRng, rate_per_min: f64) -> f64;
}

/// Exponential gaps: a Poisson arrival process.
#[derive(Debug, Clone, Copy, Default)]
pub struct ExponentialInterArrival;

impl InterArrivalDistribution for ExponentialInterArrival {
    fn sample(&self, rng: &mut StdRng, rate_per_min: f64) -> f64 {
        if rate_per_min <= 0.0 {
            return f64::INFINITY;
        }
        match Exp::new(rate_per_min) {
            Ok(exp) => exp.sample(rng),
            Err(_) => f64::INFINITY,
        }
    }
}

/// Constant gaps of exactly `1 / rate`. Used for deterministic scenarios.
#[derive(Debug, Clone, Copy, Default)]
pub struct UniformInterArrival;

impl InterArrivalDistribution for UniformInterArrival {
    fn sample(&self, _rng: &mut StdRng, rate_per_min: f64) -> f64 {
        if rate_per_min <= 0.0 {
            return f64::INFINITY;
        }
        1.0 / rate_per_min
    }
}

/// Which inter-arrival process stops use.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum ArrivalProcess {
    #[default]
    Poisson,
    Fixed,
}

impl ArrivalProcess {
    pub fn distribution(self) -> Box<dyn InterArrivalDistribution> {
        match self {
            ArrivalProcess::Poisson => Box::new(ExponentialInterArrival),
            ArrivalProcess::Fixed => Box::new(UniformInterArrival),
        }
    }
}

/// Normal distribution truncated to `[mean, mean + upper_sd * std_dev]`.
///
/// The lower cut sits at the mean, so every draw is at least `mean`. A zero
/// `std_dev` makes the distribution a point mass at `mean`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TruncatedNormal {
    pub mean: f64,
    pub std_dev: f64,
    pub upper_sd: f64,
}

impl TruncatedNormal {
    pub fn new(mean: f64, std_dev: f64) -> Self {
        Self {
            mean,
            std_dev,
            upper_sd: DEFAULT_UPPER_SD,
        }
    }

    /// Point mass at `value`.
    pub fn fixed(value: f64) -> Self {
        Self::new(value, 0.0)
    }

    pub fn min(&self) -> f64 {
        self.mean.max(0.0)
    }

    pub fn max(&self) -> f64 {
        (self.mean + self.upper_sd * self.std_dev).max(0.0)
    }

    pub fn sample(&self, rng: &mut StdRng) -> f64 {
        if self.std_dev <= 0.0 || self.upper_sd <= 0.0 {
            return self.min();
        }
        // |Z| conditioned on |Z| <= upper has the same law as Z conditioned on 0 <= Z <= upper.
        let z = loop {
            let draw: f64 = StandardNormal.sample(rng);
            let draw = draw.abs();
            if draw <= self.upper_sd {
                break draw;
            }
        };
        (self.mean + self.std_dev * z).max(0.0)
    }
}

/// Boarding / alighting duration for a batch of `n` passengers.
///
/// Mean grows linearly with `n`, spread with `sqrt(n)`. An empty batch takes
/// no time at all.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ServiceTime {
    pub mean_per_passenger: f64,
    pub spread_per_sqrt_passenger: f64,
}

impl ServiceTime {
    pub fn new(mean_per_passenger: f64, spread_per_sqrt_passenger: f64) -> Self {
        Self {
            mean_per_passenger,
            spread_per_sqrt_passenger,
        }
    }

    /// Service that always takes zero time.
    pub fn instant() -> Self {
        Self::new(0.0, 0.0)
    }

    /// Default boarding time: 0.05 min per passenger.
    pub fn boarding() -> Self {
        Self::new(0.05, 0.01)
    }

    /// Default alighting time: 0.03 min per passenger.
    pub fn alighting() -> Self {
        Self::new(0.03, 0.01)
    }

    pub fn distribution_for(&self, count: usize) -> TruncatedNormal {
        let n = count as f64;
        TruncatedNormal::new(
            self.mean_per_passenger * n,
            self.spread_per_sqrt_passenger * n.sqrt(),
        )
    }

    pub fn duration(&self, rng: &mut StdRng, count: usize) -> f64 {
        if count == 0 {
            return 0.0;
        }
        self.distribution_for(count).sample(rng)
    }
}
