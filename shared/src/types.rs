//! Core types used throughout the production run

use serde::{Deserialize, Serialize};
use std::fmt;
use std::ops::RangeInclusive;
use std::time::Duration;
use uuid::Uuid;

use crate::errors::{SharedError, SharedResult};

/// Upper bound on the number of production workers in one run
pub const MAX_WORKERS: u32 = 40;

/// Default range a worker's per-cycle capacity is drawn from
pub const DEFAULT_CAPACITY_RANGE: RangeInclusive<u32> = 10..=50;

/// Default range a worker's simulated production time is drawn from (milliseconds)
pub const DEFAULT_CYCLE_DELAY_RANGE_MS: RangeInclusive<u64> = 500..=1200;

/// Identity of a production worker, 1-based
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct WorkerId(pub u32);

impl WorkerId {
    pub fn get(self) -> u32 {
        self.0
    }
}

impl fmt::Display for WorkerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.0, f)
    }
}

impl From<u32> for WorkerId {
    fn from(id: u32) -> Self {
        WorkerId(id)
    }
}

/// Identifier for any concurrent unit taking part in a run
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum UnitId {
    /// Supervising unit (singleton)
    Orchestrator,
    /// Production worker with its 1-based id
    Worker(WorkerId),
    /// Report consumer (singleton)
    Aggregator,
}

impl fmt::Display for UnitId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            UnitId::Orchestrator => write!(f, "orchestrator"),
            UnitId::Worker(id) => write!(f, "worker_{id}"),
            UnitId::Aggregator => write!(f, "aggregator"),
        }
    }
}

/// Identifier of a single run, used to name its shared resources
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RunId(Uuid);

impl RunId {
    pub fn new() -> Self {
        RunId(Uuid::new_v4())
    }

    /// Name for a resource owned by this run, e.g. `inventory-1a2b3c4d`
    pub fn resource_name(&self, kind: &str) -> String {
        let simple = self.0.simple().to_string();
        format!("{kind}-{}", &simple[..8])
    }
}

impl Default for RunId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for RunId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// The fixed production order for one run
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Order {
    pub size: u32,
}

impl Order {
    pub fn new(size: u32) -> Self {
        Self { size }
    }
}

/// Launch parameters for one production worker
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct WorkerDescriptor {
    pub id: WorkerId,
    /// Largest batch this worker may claim per cycle
    pub capacity: u32,
    /// Simulated production time per cycle
    pub cycle_delay_ms: u64,
}

impl WorkerDescriptor {
    pub fn new(id: WorkerId, capacity: u32, cycle_delay_ms: u64) -> Self {
        Self {
            id,
            capacity,
            cycle_delay_ms,
        }
    }

    pub fn cycle_delay(&self) -> Duration {
        Duration::from_millis(self.cycle_delay_ms)
    }

    pub fn validate(&self) -> SharedResult<()> {
        if self.id.get() == 0 {
            return Err(SharedError::InvalidConfig {
                field: "worker id".to_string(),
                value: "0".to_string(),
            });
        }
        if self.capacity == 0 {
            return Err(SharedError::InvalidConfig {
                field: format!("capacity of worker {}", self.id),
                value: "0".to_string(),
            });
        }
        Ok(())
    }
}
