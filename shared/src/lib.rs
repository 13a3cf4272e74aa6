//! Shared types for the production run
//!
//! Contains the types every unit of a run agrees on: identities, report
//! messages, and the synchronization primitives (Shared Inventory, Report
//! Channel, one-shot barriers) that workers, the aggregator and the
//! orchestrator coordinate through.

pub mod errors;
pub mod logging;
pub mod messages;
pub mod sync;
pub mod types;

pub use errors::*;
pub use types::*;

pub use messages::{FinalReport, ReportMessage, WorkerTotals};
pub use sync::{report_channel, OneShotBarrier, ReportReceiver, ReportSender, SharedInventory};
