//! Test fixtures for orchestrator tests

use orchestrator::{MockDescriptorSource, RunConfig};
use shared::{WorkerDescriptor, WorkerId};

pub struct TestFixtures;

impl TestFixtures {
    /// Capacities used by the three-worker order scenario
    pub const SCENARIO_CAPACITIES: [u32; 3] = [40, 30, 50];
    pub const SCENARIO_ORDER_SIZE: u32 = 100;

    /// Short simulated delays keep paused-clock tests cheap
    pub const FAST_DELAY_MS: u64 = 5;

    /// Configuration with tight delay range and no reap limit
    pub fn config(worker_count: u32, order_size: u32) -> RunConfig {
        RunConfig::new(worker_count, order_size).with_cycle_delay_range_ms(0..=10)
    }

    /// Descriptor source handing out `capacities[id - 1]` with per-worker delays
    pub fn descriptors(capacities: &[u32], delay_ms: u64) -> MockDescriptorSource {
        let capacities = capacities.to_vec();
        let mut source = MockDescriptorSource::new();
        source
            .expect_describe()
            .times(capacities.len())
            .returning(move |id: WorkerId| {
                let capacity = capacities[(id.get() - 1) as usize];
                WorkerDescriptor::new(id, capacity, delay_ms * u64::from(id.get()))
            });
        source
    }

    /// Descriptor source that must never be consulted
    pub fn unused_descriptors() -> MockDescriptorSource {
        let mut source = MockDescriptorSource::new();
        source.expect_describe().never();
        source
    }
}
