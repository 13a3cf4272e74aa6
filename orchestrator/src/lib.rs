//! Orchestrator library for coordinating a fixed-size production run
//!
//! The orchestrator creates the run's shared inventory, report channel and
//! barriers, spawns the production workers and the aggregator, hands control
//! to the aggregator for the final report, and owns teardown on both the
//! normal and the interrupt path.

pub mod config;
pub mod core;
pub mod error;
pub mod orchestrator;
pub mod services;
pub mod traits;

// Re-export commonly used types
pub use config::RunConfig;
pub use crate::core::{ResourceBundle, TeardownReason};
pub use error::{OrchestratorError, OrchestratorResult};
pub use orchestrator::{Orchestrator, RunOutcome};
pub use traits::{DescriptorSource, MockDescriptorSource, UnitHandle, UnitSpawner};
