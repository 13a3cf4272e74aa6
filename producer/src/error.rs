//! Producer error types

use shared::{SharedError, WorkerId};
use thiserror::Error;

/// Result type for producer operations
pub type ProducerResult<T> = Result<T, ProducerError>;

/// Producer error types
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ProducerError {
    #[error("Invalid worker descriptor: {0}")]
    Descriptor(SharedError),

    #[error("Inventory access failed for worker {worker_id}: {source}")]
    Inventory { worker_id: WorkerId, source: SharedError },

    #[error("Worker {worker_id} failed to deliver {messages} report(s) covering {units} unit(s)")]
    ReportsLost { worker_id: WorkerId, messages: u32, units: u64 },
}
