//! Orchestrator-specific error types

use aggregator::AggregatorError;
use shared::SharedError;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum OrchestratorError {
    #[error("Configuration error: {field}: {reason}")]
    ConfigurationError { field: String, reason: String },

    #[error("Failed to create shared resources: {0}")]
    ResourceCreation(SharedError),

    #[error("Barrier failure: {0}")]
    Barrier(SharedError),

    #[error("Aggregator failed: {0}")]
    AggregatorFailed(#[from] AggregatorError),

    #[error("Failed to join {unit}: {message}")]
    UnitJoin { unit: String, message: String },

    #[error("Spawned units still running after {waited_ms} ms")]
    ReapTimeout { waited_ms: u64 },

    #[error("Run interrupted")]
    Interrupted,

    #[error("Shared component error: {0}")]
    SharedError(#[from] SharedError),

    #[error("I/O error: {0}")]
    IoError(#[from] std::io::Error),
}

impl OrchestratorError {
    pub fn config(field: impl Into<String>, reason: impl Into<String>) -> Self {
        OrchestratorError::ConfigurationError {
            field: field.into(),
            reason: reason.into(),
        }
    }

    pub fn is_configuration(&self) -> bool {
        matches!(self, OrchestratorError::ConfigurationError { .. })
    }
}

pub type OrchestratorResult<T> = Result<T, OrchestratorError>;
