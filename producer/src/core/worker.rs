//! Production worker loop
//!
//! Each cycle takes the inventory lock once, claims up to `capacity` units and
//! releases the lock before the simulated production delay, so one worker's
//! production never blocks another worker's claim. A zero allocation ends the
//! loop; the completion report is always the worker's last message.

use shared::{process_debug, process_error, process_info, process_warn};
use shared::{ReportMessage, ReportSender, SharedInventory, UnitId, WorkerDescriptor, WorkerId};

use crate::error::{ProducerError, ProducerResult};
use crate::types::{DeliveryFailures, WorkerPhase, WorkerSummary};

pub struct ProductionWorker {
    descriptor: WorkerDescriptor,
    inventory: SharedInventory,
    reports: ReportSender,
    phase: WorkerPhase,
}

impl ProductionWorker {
    pub fn new(descriptor: WorkerDescriptor, inventory: SharedInventory, reports: ReportSender) -> ProducerResult<Self> {
        descriptor.validate().map_err(ProducerError::Descriptor)?;
        Ok(Self {
            descriptor,
            inventory,
            reports,
            phase: WorkerPhase::Running,
        })
    }

    pub fn id(&self) -> WorkerId {
        self.descriptor.id
    }

    pub fn descriptor(&self) -> &WorkerDescriptor {
        &self.descriptor
    }

    pub fn phase(&self) -> WorkerPhase {
        self.phase
    }

    /// Run until the inventory is exhausted.
    ///
    /// Returns the worker's own counters, or `ReportsLost` if any report could
    /// not be delivered; the claim behind an undelivered report is never undone.
    pub async fn run(mut self) -> ProducerResult<WorkerSummary> {
        let unit = UnitId::Worker(self.descriptor.id);
        let mut summary = WorkerSummary::new(self.descriptor.id);
        let mut lost = DeliveryFailures::default();

        process_info!(
            unit,
            "🏭 Worker #{:>2}: STARTED. Capacity = {:>4}, in {:>5} ms",
            self.descriptor.id,
            self.descriptor.capacity,
            self.descriptor.cycle_delay_ms
        );

        while self.phase == WorkerPhase::Running {
            let allocated = match self.inventory.claim(self.descriptor.capacity).await {
                Ok(allocated) => allocated,
                Err(source) => {
                    process_error!(unit, "❌ Inventory claim failed: {}", source);
                    self.phase = WorkerPhase::Terminated;
                    return Err(ProducerError::Inventory {
                        worker_id: self.descriptor.id,
                        source,
                    });
                }
            };

            if allocated == 0 {
                self.phase = WorkerPhase::Terminated;
                continue;
            }

            process_info!(
                unit,
                "🔧 Worker #{:>2}: going to make {:>5} units in {:>4} ms",
                self.descriptor.id,
                allocated,
                self.descriptor.cycle_delay_ms
            );
            tokio::time::sleep(self.descriptor.cycle_delay()).await;

            let progress = ReportMessage::progress(self.descriptor.id, allocated, self.descriptor.cycle_delay_ms);
            if let Err(e) = self.reports.send(progress).await {
                process_error!(unit, "❌ Progress report for {} units failed to send: {}", allocated, e);
                lost.record(allocated);
            }
            summary.record_batch(allocated);
        }

        if let Err(e) = self.reports.send(ReportMessage::completion(self.descriptor.id)).await {
            process_error!(unit, "❌ Completion report failed to send: {}", e);
            lost.record(0);
        }

        process_info!(
            unit,
            ">>> Worker #{:>3}: terminating after making a total of {:>5} units in {:>5} iterations",
            self.descriptor.id,
            summary.total_produced,
            summary.cycles
        );

        if !lost.is_empty() {
            process_warn!(
                unit,
                "⚠️ {} report(s) covering {} unit(s) never reached the aggregator",
                lost.messages,
                lost.units
            );
            return Err(ProducerError::ReportsLost {
                worker_id: self.descriptor.id,
                messages: lost.messages,
                units: lost.units,
            });
        }

        process_debug!(unit, "All reports delivered");
        Ok(summary)
    }
}
