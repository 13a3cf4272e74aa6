//! Core worker loop

pub mod worker;

pub use worker::ProductionWorker;
