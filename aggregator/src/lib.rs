//! Aggregator library
//!
//! The aggregator is the single consumer of the report channel. It tallies
//! per-worker output until every worker has reported completion, hands
//! control to the orchestrator through the `AllDone` barrier, and prints the
//! final report once `PrintGranted` is posted.

pub mod aggregator;
pub mod error;
pub mod tally;

pub use aggregator::{Aggregator, AggregatorLinks, AggregatorPhase};
pub use error::{AggregatorError, AggregatorResult};
pub use tally::{Tally, TallyEvent, WorkerStatistics};
