//! The run's single random stream.
//!
//! Every stochastic draw in a run (inter-arrival gaps, destinations, dwell and
//! transit durations) reads from one seeded `StdRng` held as a world resource.
//! Systems run one at a time, so the order of draws is fixed by the event order
//! and two runs with the same seed replay identically.

use bevy_ecs::prelude::Resource;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

#[derive(Debug, Resource)]
pub struct SimRng(StdRng);

impl SimRng {
    pub fn seeded(seed: u64) -> Self {
        SimRng(StdRng::seed_from_u64(seed))
    }

    /// Unseeded stream for exploratory runs; not reproducible.
    pub fn from_entropy() -> Self {
        SimRng(StdRng::from_entropy())
    }

    /// Seeded when `seed` is given, entropy otherwise.
    pub fn from_seed_option(seed: Option<u64>) -> Self {
        match seed {
            Some(seed) => Self::seeded(seed),
            None => Self::from_entropy(),
        }
    }

    /// Expose the inner generator for use with `rand_distr` types.
    #[inline]
    pub fn inner(&mut self) -> &mut StdRng {
        &mut self.0
    }

    #[inline]
    pub fn gen_range<T, R>(&mut self, range: R) -> T
    where
        T: rand::distributions::uniform::SampleUniform,
        R: rand::distributions::uniform::SampleRange<T>,
    {
        self.0.gen_range(range)
    }
}
