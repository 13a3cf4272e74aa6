//! Message types exchanged between the units of a run
//!
//! - `report`: Worker → Aggregator progress and completion reports
//! - `summary`: Aggregator → Orchestrator final tally

pub mod report;
pub mod summary;

pub use report::ReportMessage;
pub use summary::{FinalReport, WorkerTotals};
