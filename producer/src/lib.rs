//! Production worker library
//!
//! A production worker repeatedly claims a batch from the shared inventory,
//! simulates producing it, and reports the batch to the aggregator until the
//! inventory is exhausted, then reports completion.

pub mod core;
pub mod error;
pub mod types;

pub use crate::core::ProductionWorker;
pub use error::{ProducerError, ProducerResult};
pub use types::{WorkerPhase, WorkerSummary};
