//! Synchronization primitives shared by the units of a run
//!
//! - `inventory`: the lock-guarded counter of unclaimed order units
//! - `channel`: the ordered multi-producer report channel
//! - `barrier`: one-shot rendezvous tokens

pub mod barrier;
pub mod channel;
pub mod inventory;

pub use barrier::OneShotBarrier;
pub use channel::{report_channel, ReportReceiver, ReportSender};
pub use inventory::{InventoryState, SharedInventory};
