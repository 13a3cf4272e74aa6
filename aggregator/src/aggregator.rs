//! Aggregator state machine
//!
//! `Collecting → AwaitingPrintGrant → Reporting → Terminated`. Collection ends
//! exactly when one completion has arrived from each of the N workers; an
//! empty channel says nothing about whether workers are done.

use std::sync::Arc;
use std::time::Duration;

use shared::{process_debug, process_error, process_info, process_warn};
use shared::{FinalReport, OneShotBarrier, ReportMessage, ReportReceiver, RunId, SharedInventory, UnitId, MAX_WORKERS};

use crate::error::{AggregatorError, AggregatorResult};
use crate::tally::{Tally, TallyEvent};

const UNIT: UnitId = UnitId::Aggregator;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AggregatorPhase {
    Collecting,
    AwaitingPrintGrant,
    Reporting,
    Terminated,
}

/// Shared resources the aggregator is attached to
pub struct AggregatorLinks {
    pub reports: ReportReceiver,
    /// Posted by the aggregator, waited by the orchestrator
    pub all_done: Arc<OneShotBarrier>,
    /// Posted by the orchestrator, waited by the aggregator
    pub print_granted: Arc<OneShotBarrier>,
    pub inventory: SharedInventory,
}

pub struct Aggregator {
    run_id: RunId,
    links: AggregatorLinks,
    tally: Tally,
    phase: AggregatorPhase,
    stall_timeout: Option<Duration>,
}

impl Aggregator {
    pub fn new(run_id: RunId, worker_count: u32, links: AggregatorLinks) -> AggregatorResult<Self> {
        if worker_count == 0 || worker_count > MAX_WORKERS {
            return Err(AggregatorError::InvalidWorkerCount {
                count: worker_count,
                max: MAX_WORKERS,
            });
        }
        Ok(Self {
            run_id,
            links,
            tally: Tally::new(worker_count),
            phase: AggregatorPhase::Collecting,
            stall_timeout: None,
        })
    }

    /// Give up collecting if no report arrives within `timeout` (`None` waits forever)
    pub fn with_stall_timeout(mut self, timeout: Option<Duration>) -> Self {
        self.stall_timeout = timeout;
        self
    }

    pub fn phase(&self) -> AggregatorPhase {
        self.phase
    }

    pub fn worker_count(&self) -> u32 {
        self.tally.worker_count()
    }

    pub async fn run(mut self) -> AggregatorResult<FinalReport> {
        process_info!(UNIT, "🚀 Aggregator started, expecting {} worker(s)", self.tally.worker_count());

        if let Err(e) = self.collect().await {
            // The orchestrator must not wait for an AllDone that will never come.
            self.links.all_done.abandon();
            self.phase = AggregatorPhase::Terminated;
            return Err(e);
        }
        self.links.reports.close();

        self.phase = AggregatorPhase::AwaitingPrintGrant;
        self.links.all_done.post().map_err(AggregatorError::Barrier)?;
        process_info!(UNIT, "🏁 Manufacturing is complete. Awaiting permission to print final report");

        if let Err(e) = self.links.print_granted.wait().await {
            process_error!(UNIT, "❌ Print permission never arrived: {}", e);
            self.phase = AggregatorPhase::Terminated;
            return Err(AggregatorError::Barrier(e));
        }

        self.phase = AggregatorPhase::Reporting;
        let order_size = self
            .links
            .inventory
            .order_size()
            .await
            .map_err(AggregatorError::Inventory)?;

        let report = self.tally.clone().into_report(self.run_id, order_size);
        for line in report.lines() {
            process_info!(UNIT, "{}", line);
        }
        if !report.is_balanced() {
            process_warn!(
                UNIT,
                "⚠️ Reported total {} differs from order size {}",
                report.grand_total,
                report.order_size
            );
        }

        self.phase = AggregatorPhase::Terminated;
        process_info!(UNIT, ">>> Aggregator terminated");
        Ok(report)
    }

    async fn collect(&mut self) -> AggregatorResult<()> {
        while !self.tally.is_complete() {
            let received = match self.stall_timeout {
                Some(timeout) => self.links.reports.recv_within(timeout).await,
                None => self.links.reports.recv().await,
            };

            let message = match received {
                Ok(message) => message,
                Err(source) => {
                    process_error!(UNIT, "❌ Report receive failed: {}", source);
                    return Err(AggregatorError::ReceiveFailed {
                        finished: self.tally.finished_count(),
                        expected: self.tally.worker_count(),
                        source,
                    });
                }
            };

            self.record(message);
        }
        Ok(())
    }

    fn record(&mut self, message: ReportMessage) {
        match self.tally.apply(message) {
            TallyEvent::Produced { .. } => {
                process_info!(UNIT, "📦 {}", message);
            }
            TallyEvent::Finished { worker_id, finished } => {
                process_info!(UNIT, "✅ {}", message);
                process_debug!(
                    UNIT,
                    "Worker {} finished ({}/{})",
                    worker_id,
                    finished,
                    self.tally.worker_count()
                );
            }
            TallyEvent::DuplicateCompletion { worker_id } => {
                process_warn!(UNIT, "⚠️ Ignoring repeated completion from worker {}", worker_id);
            }
            TallyEvent::UnknownWorker { worker_id } => {
                process_warn!(UNIT, "⚠️ Ignoring report from unknown worker {}: {}", worker_id, message);
            }
        }
    }
}
