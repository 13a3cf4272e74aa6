//! Aggregator error types

use shared::SharedError;
use thiserror::Error;

pub type AggregatorResult<T> = Result<T, AggregatorError>;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum AggregatorError {
    #[error("Worker count must be between 1 and {max}, got {count}")]
    InvalidWorkerCount { count: u32, max: u32 },

    #[error("Report channel failed after {finished} of {expected} completions: {source}")]
    ReceiveFailed {
        finished: u32,
        expected: u32,
        source: SharedError,
    },

    #[error("Barrier failure: {0}")]
    Barrier(SharedError),

    #[error("Inventory unavailable for the final report: {0}")]
    Inventory(SharedError),
}
