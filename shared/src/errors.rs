//! Shared error types for the production run

use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SharedError {
    #[error("Invalid configuration: {field} = {value}")]
    InvalidConfig { field: String, value: String },

    #[error("Failed to create {resource}: {reason}")]
    ResourceCreation { resource: String, reason: String },

    #[error("{resource} has been destroyed")]
    ResourceDestroyed { resource: String },

    #[error("Invalid claim of {requested} units")]
    InvalidClaim { requested: u32 },

    #[error("Report channel {channel} is closed")]
    ChannelClosed { channel: String },

    #[error("No report received on {channel} within {waited_ms} ms")]
    Stalled { channel: String, waited_ms: u64 },

    #[error("Barrier {barrier} was already posted")]
    AlreadyPosted { barrier: String },

    #[error("Barrier {barrier} was already waited on")]
    AlreadyWaited { barrier: String },

    #[error("Barrier {barrier} was abandoned by its poster")]
    Abandoned { barrier: String },

    #[error("Serialization failed: {message}")]
    SerializationError { message: String },
}

pub type SharedResult<T> = Result<T, SharedError>;
