//! Producer-specific data types

use shared::WorkerId;

/// Lifecycle of a production worker
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WorkerPhase {
    Running,
    Terminated,
}

/// Local counters a worker keeps about its own output
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WorkerSummary {
    pub worker_id: WorkerId,
    pub total_produced: u64,
    pub cycles: u64,
}

impl WorkerSummary {
    pub fn new(worker_id: WorkerId) -> Self {
        Self {
            worker_id,
            total_produced: 0,
            cycles: 0,
        }
    }

    pub fn record_batch(&mut self, allocated: u32) {
        self.total_produced += u64::from(allocated);
        self.cycles += 1;
    }
}

/// Reports that could not be delivered
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub(crate) struct DeliveryFailures {
    pub messages: u32,
    pub units: u64,
}

impl DeliveryFailures {
    pub fn record(&mut self, units: u32) {
        self.messages += 1;
        self.units += u64::from(units);
    }

    pub fn is_empty(&self) -> bool {
        self.messages == 0
    }
}
