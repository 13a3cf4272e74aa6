//! Randomized worker parameters
//!
//! Each worker gets an independently drawn capacity and cycle delay from the
//! configured ranges. A seed makes a run's parameters reproducible.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::ops::RangeInclusive;

use shared::{WorkerDescriptor, WorkerId};

use crate::config::RunConfig;
use crate::traits::DescriptorSource;

pub struct RandomDescriptorSource {
    rng: StdRng,
    capacity_range: RangeInclusive<u32>,
    cycle_delay_range_ms: RangeInclusive<u64>,
}

impl RandomDescriptorSource {
    pub fn new(capacity_range: RangeInclusive<u32>, cycle_delay_range_ms: RangeInclusive<u64>) -> Self {
        Self {
            rng: StdRng::from_entropy(),
            capacity_range,
            cycle_delay_range_ms,
        }
    }

    pub fn seeded(seed: u64, capacity_range: RangeInclusive<u32>, cycle_delay_range_ms: RangeInclusive<u64>) -> Self {
        Self {
            rng: StdRng::seed_from_u64(seed),
            capacity_range,
            cycle_delay_range_ms,
        }
    }

    /// Draw from the ranges in `config`, seeded when `seed` is given
    pub fn from_config(config: &RunConfig, seed: Option<u64>) -> Self {
        let capacity = config.capacity_range.clone();
        let delay = config.cycle_delay_range_ms.clone();
        match seed {
            Some(seed) => Self::seeded(seed, capacity, delay),
            None => Self::new(capacity, delay),
        }
    }
}

impl DescriptorSource for RandomDescriptorSource {
    fn describe(&mut self, id: WorkerId) -> WorkerDescriptor {
        let capacity = self.rng.gen_range(self.capacity_range.clone());
        let cycle_delay_ms = self.rng.gen_range(self.cycle_delay_range_ms.clone());
        WorkerDescriptor::new(id, capacity, cycle_delay_ms)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use shared::{DEFAULT_CAPACITY_RANGE, DEFAULT_CYCLE_DELAY_RANGE_MS};

    #[test]
    fn test_draws_stay_in_range() {
        let mut source = RandomDescriptorSource::new(DEFAULT_CAPACITY_RANGE, DEFAULT_CYCLE_DELAY_RANGE_MS);
        for id in 1..=200 {
            let descriptor = source.describe(WorkerId(id));
            assert_eq!(descriptor.id, WorkerId(id));
            assert!((10..=50).contains(&descriptor.capacity));
            assert!((500..=1200).contains(&descriptor.cycle_delay_ms));
        }
    }

    #[test]
    fn test_same_seed_same_parameters() {
        let draw = |seed| {
            let mut source = RandomDescriptorSource::seeded(seed, 10..=50, 500..=1200);
            (1..=8).map(|id| source.describe(WorkerId(id))).collect::<Vec<_>>()
        };
        assert_eq!(draw(7), draw(7));
    }

    #[test]
    fn test_from_config_uses_configured_ranges() {
        let config = RunConfig::new(3, 10).with_capacity_range(5..=5).with_cycle_delay_range_ms(0..=0);
        let mut source = RandomDescriptorSource::from_config(&config, None);
        let descriptor = source.describe(WorkerId(2));
        assert_eq!(descriptor.capacity, 5);
        assert_eq!(descriptor.cycle_delay_ms, 0);
    }
}
