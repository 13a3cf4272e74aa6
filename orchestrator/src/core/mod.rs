//! Core orchestrator state
//!
//! The shared resources of a run and their teardown.

pub mod resources;

pub use resources::{ResourceBundle, TeardownReason};
