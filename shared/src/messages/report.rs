//! Worker → Aggregator report messages

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::types::WorkerId;

/// Report carried on the report channel, tagged with the sending worker
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ReportMessage {
    /// A batch was produced
    Progress {
        worker_id: WorkerId,
        batch_size: u32,
        cycle_delay_ms: u64,
    },

    /// The worker found the inventory exhausted and stopped; always its last message
    Completion { worker_id: WorkerId },
}

impl ReportMessage {
    pub fn progress(worker_id: WorkerId, batch_size: u32, cycle_delay_ms: u64) -> Self {
        ReportMessage::Progress {
            worker_id,
            batch_size,
            cycle_delay_ms,
        }
    }

    pub fn completion(worker_id: WorkerId) -> Self {
        ReportMessage::Completion { worker_id }
    }

    pub fn worker_id(&self) -> WorkerId {
        match self {
            ReportMessage::Progress { worker_id, .. } | ReportMessage::Completion { worker_id } => *worker_id,
        }
    }

    /// Units carried by this message (zero for completions)
    pub fn units(&self) -> u32 {
        match self {
            ReportMessage::Progress { batch_size, .. } => *batch_size,
            ReportMessage::Completion { .. } => 0,
        }
    }

    pub fn is_completion(&self) -> bool {
        matches!(self, ReportMessage::Completion { .. })
    }
}

impl fmt::Display for ReportMessage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ReportMessage::Progress {
                worker_id,
                batch_size,
                cycle_delay_ms,
            } => write!(
                f,
                "worker #{worker_id:>2} produced {batch_size:>4} units in {cycle_delay_ms:>4} ms"
            ),
            ReportMessage::Completion { worker_id } => {
                write!(f, "worker #{worker_id:>2}        COMPLETED its task")
            }
        }
    }
}
