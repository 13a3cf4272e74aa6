//! Shared resources of one run and their single teardown routine
//!
//! Teardown runs from the normal completion path and from the interrupt path.
//! Only the first call does anything; later calls return `false`.

use std::fmt;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use tokio::sync::Mutex;
use tokio::task::AbortHandle;

use shared::{logging, process_debug, process_info, process_warn};
use shared::{report_channel, OneShotBarrier, Order, ReportReceiver, ReportSender, RunId, SharedInventory, UnitId};

use crate::error::{OrchestratorError, OrchestratorResult};

const UNIT: UnitId = UnitId::Orchestrator;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TeardownReason {
    /// Every unit terminated on its own
    Completed,
    /// The run failed; anything still running is stopped
    Failed,
    /// An external interrupt or termination request arrived
    Interrupted,
}

impl TeardownReason {
    fn stops_units(self) -> bool {
        !matches!(self, TeardownReason::Completed)
    }
}

impl fmt::Display for TeardownReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TeardownReason::Completed => write!(f, "run completed"),
            TeardownReason::Failed => write!(f, "run failed"),
            TeardownReason::Interrupted => write!(f, "interrupted"),
        }
    }
}

pub struct ResourceBundle {
    run_id: RunId,
    inventory: SharedInventory,
    channel_name: String,
    all_done: Arc<OneShotBarrier>,
    print_granted: Arc<OneShotBarrier>,
    units: Mutex<Vec<(UnitId, AbortHandle)>>,
    torn_down: AtomicBool,
}

impl ResourceBundle {
    /// Create inventory, report channel and both barriers for a run.
    ///
    /// The channel ends are handed out rather than kept: the channel closes once
    /// every worker and the aggregator have let go of it.
    pub fn create(
        run_id: RunId,
        order: Order,
        channel_bound: usize,
    ) -> OrchestratorResult<(Self, ReportSender, ReportReceiver)> {
        let channel_name = run_id.resource_name("reports");
        let (sender, receiver) =
            report_channel(channel_name.clone(), channel_bound).map_err(OrchestratorError::ResourceCreation)?;

        let bundle = Self {
            run_id,
            inventory: SharedInventory::create(run_id.resource_name("inventory"), order),
            channel_name,
            all_done: Arc::new(OneShotBarrier::new(run_id.resource_name("all-done"))),
            print_granted: Arc::new(OneShotBarrier::new(run_id.resource_name("print-granted"))),
            units: Mutex::new(Vec::new()),
            torn_down: AtomicBool::new(false),
        };

        process_debug!(
            UNIT,
            "Created {}, {}, {} and {}",
            bundle.inventory.name(),
            bundle.channel_name,
            bundle.all_done.name(),
            bundle.print_granted.name()
        );
        Ok((bundle, sender, receiver))
    }

    pub fn run_id(&self) -> RunId {
        self.run_id
    }

    pub fn inventory(&self) -> &SharedInventory {
        &self.inventory
    }

    pub fn all_done(&self) -> &Arc<OneShotBarrier> {
        &self.all_done
    }

    pub fn print_granted(&self) -> &Arc<OneShotBarrier> {
        &self.print_granted
    }

    /// Track a spawned unit so teardown can stop it
    pub async fn register(&self, unit: UnitId, abort: AbortHandle) {
        self.units.lock().await.push((unit, abort));
    }

    pub async fn unit_count(&self) -> usize {
        self.units.lock().await.len()
    }

    /// Forcibly stop every registered unit that has not finished yet
    pub async fn abort_units(&self) -> usize {
        let units = self.units.lock().await;
        let mut aborted = 0;
        for (unit, abort) in units.iter() {
            if !abort.is_finished() {
                abort.abort();
                aborted += 1;
                process_warn!(UNIT, "🔪 Terminated {}", unit);
            }
        }
        aborted
    }

    pub fn is_torn_down(&self) -> bool {
        self.torn_down.load(Ordering::Acquire)
    }

    /// Release every shared resource. Returns `false` if teardown already ran.
    pub async fn teardown(&self, reason: TeardownReason) -> bool {
        if self.torn_down.swap(true, Ordering::AcqRel) {
            process_debug!(UNIT, "Teardown already done, ignoring request ({})", reason);
            return false;
        }

        process_info!(UNIT, "🧹 Cleaning up after the aggregator and worker units ({})", reason);

        if reason.stops_units() {
            let aborted = self.abort_units().await;
            if aborted > 0 {
                process_warn!(UNIT, "Stopped {} unit(s) that were still running", aborted);
            }
        }

        self.inventory.destroy().await;
        self.all_done.destroy();
        self.print_granted.destroy();
        self.units.lock().await.clear();

        logging::log_success(
            &UNIT,
            &format!(
                "Released {}, {}, {} and {}",
                self.inventory.name(),
                self.channel_name,
                self.all_done.name(),
                self.print_granted.name()
            ),
        );
        true
    }
}
