//! Final tally handed from the Aggregator back to the Orchestrator

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::errors::{SharedError, SharedResult};
use crate::types::{RunId, WorkerId};

/// Per-worker line of the final report
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct WorkerTotals {
    pub worker_id: WorkerId,
    pub total_produced: u64,
    pub cycles: u64,
}

/// Final report of a run, workers listed in ascending id order
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FinalReport {
    pub run_id: RunId,
    pub order_size: u32,
    pub grand_total: u64,
    pub workers: Vec<WorkerTotals>,
}

impl FinalReport {
    /// Whether every ordered unit was reported exactly once
    pub fn is_balanced(&self) -> bool {
        self.grand_total == u64::from(self.order_size)
    }

    pub fn worker(&self, id: WorkerId) -> Option<&WorkerTotals> {
        self.workers.iter().find(|w| w.worker_id == id)
    }

    /// Pretty JSON for writing the report to disk
    pub fn to_json_pretty(&self) -> SharedResult<String> {
        serde_json::to_string_pretty(self).map_err(|e| SharedError::SerializationError { message: e.to_string() })
    }

    /// Lines of the human-readable report
    pub fn lines(&self) -> Vec<String> {
        let mut lines = Vec::with_capacity(self.workers.len() + 3);
        lines.push("****** Final Report ******".to_string());
        for totals in &self.workers {
            lines.push(format!(
                "Worker # {:>2} made a total of {:>4} units in {:>5} iterations",
                totals.worker_id, totals.total_produced, totals.cycles
            ));
        }
        lines.push("==============================".to_string());
        lines.push(format!(
            "Grand total units made = {:>5}   vs  order size of {:>5}",
            self.grand_total, self.order_size
        ));
        lines
    }
}

impl fmt::Display for FinalReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for line in self.lines() {
            writeln!(f, "{line}")?;
        }
        Ok(())
    }
}
