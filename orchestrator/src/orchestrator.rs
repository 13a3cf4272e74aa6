//! Main orchestrator implementation
//!
//! Creates the run's shared resources, spawns the workers and the aggregator,
//! performs the two-phase handoff (`AllDone` then `PrintGranted`), reaps every
//! unit and tears the resources down. An interrupt at any point after the
//! resources exist takes the same teardown path and stops every unit.

use std::future::Future;

use aggregator::{Aggregator, AggregatorLinks, AggregatorResult};
use producer::{ProducerResult, ProductionWorker, WorkerSummary};
use shared::{logging, process_debug, process_error, process_info, process_warn};
use shared::{
    FinalReport, ReportReceiver, ReportSender, RunId, SharedError, SharedResult, UnitId, WorkerDescriptor, WorkerId,
};

use crate::config::RunConfig;
use crate::core::{ResourceBundle, TeardownReason};
use crate::error::{OrchestratorError, OrchestratorResult};
use crate::traits::{DescriptorSource, UnitHandle, UnitSpawner};

const UNIT: UnitId = UnitId::Orchestrator;

type WorkerHandle = UnitHandle<ProducerResult<WorkerSummary>>;
type AggregatorHandle = UnitHandle<AggregatorResult<FinalReport>>;
type AggregatorExit = OrchestratorResult<AggregatorResult<FinalReport>>;

/// Result of a run that reached the final report
#[derive(Debug, Clone)]
pub struct RunOutcome {
    pub report: FinalReport,
    /// Summaries of the workers that terminated cleanly, by ascending id
    pub workers: Vec<WorkerSummary>,
    /// Workers that failed or could not be joined
    pub failed_workers: Vec<WorkerId>,
}

pub struct Orchestrator<D, S>
where
    D: DescriptorSource,
    S: UnitSpawner,
{
    config: RunConfig,
    run_id: RunId,
    descriptors: D,
    spawner: S,
}

impl<D, S> Orchestrator<D, S>
where
    D: DescriptorSource,
    S: UnitSpawner,
{
    /// Create an orchestrator; the configuration is rejected here, before any resource exists
    pub fn new(config: RunConfig, descriptors: D, spawner: S) -> OrchestratorResult<Self> {
        config.validate()?;
        Ok(Self {
            config,
            run_id: RunId::new(),
            descriptors,
            spawner,
        })
    }

    pub fn run_id(&self) -> RunId {
        self.run_id
    }

    pub fn config(&self) -> &RunConfig {
        &self.config
    }

    /// Drive one run to completion, or until `shutdown` resolves
    pub async fn run<F>(mut self, shutdown: F) -> OrchestratorResult<RunOutcome>
    where
        F: Future<Output = ()>,
    {
        logging::log_startup(&UNIT, &format!("run {}", self.run_id));
        process_info!(UNIT, "🧾 Will request an order of size = {} units", self.config.order.size);
        if self.config.order.size == 0 {
            process_warn!(UNIT, "⚠️ Order is empty, workers will complete without producing");
        }

        let descriptors = self.describe_workers()?;

        let (bundle, sender, receiver) =
            ResourceBundle::create(self.run_id, self.config.order, self.config.channel_bound)?;

        let (workers, aggregator) = match self.spawn_units(&bundle, descriptors, sender, receiver).await {
            Ok(units) => units,
            Err(e) => {
                logging::log_error(&UNIT, "Spawning units", &e);
                bundle.teardown(TeardownReason::Failed).await;
                return Err(e);
            }
        };

        let outcome = tokio::select! {
            outcome = self.supervise(&bundle, workers, aggregator) => outcome,
            _ = shutdown => {
                logging::log_shutdown(&UNIT, "interrupt received, terminating all units");
                bundle.teardown(TeardownReason::Interrupted).await;
                return Err(OrchestratorError::Interrupted);
            }
        };

        let reason = match &outcome {
            Ok(_) => TeardownReason::Completed,
            Err(_) => TeardownReason::Failed,
        };
        bundle.teardown(reason).await;

        match &outcome {
            Ok(run) => logging::log_success(
                &UNIT,
                &format!(
                    "Run finished: {} of {} units reported",
                    run.report.grand_total, run.report.order_size
                ),
            ),
            Err(e) => logging::log_error(&UNIT, "Run", e),
        }
        outcome
    }

    /// Draw and validate every worker's parameters up front
    fn describe_workers(&mut self) -> OrchestratorResult<Vec<WorkerDescriptor>> {
        (1..=self.config.worker_count)
            .map(|id| {
                let id = WorkerId(id);
                let descriptor = self.descriptors.describe(id);
                if descriptor.id != id {
                    return Err(OrchestratorError::config(
                        "worker descriptor",
                        format!("requested worker {id}, got worker {}", descriptor.id),
                    ));
                }
                descriptor
                    .validate()
                    .map_err(|e| OrchestratorError::config("worker descriptor", e.to_string()))?;
                if !self.config.outlasts_cycle(descriptor.cycle_delay()) {
                    return Err(OrchestratorError::config(
                        "worker descriptor",
                        format!(
                            "worker {id} cycle delay of {} ms reaches the stall timeout",
                            descriptor.cycle_delay_ms
                        ),
                    ));
                }
                Ok(descriptor)
            })
            .collect()
    }

    async fn spawn_units(
        &self,
        bundle: &ResourceBundle,
        descriptors: Vec<WorkerDescriptor>,
        sender: ReportSender,
        receiver: ReportReceiver,
    ) -> OrchestratorResult<(Vec<WorkerHandle>, AggregatorHandle)> {
        process_info!(UNIT, "Creating {} worker(s)", descriptors.len());

        let mut workers = Vec::with_capacity(descriptors.len());
        for descriptor in descriptors {
            let worker = ProductionWorker::new(descriptor, bundle.inventory().clone(), sender.clone())
                .map_err(|e| OrchestratorError::config("worker descriptor", e.to_string()))?;
            let handle = self.spawner.spawn_worker(worker);
            bundle.register(handle.unit(), handle.abort_handle()).await;
            process_info!(
                UNIT,
                "🏭 Worker #{:>3} was created, with capacity = {:>4} and delay = {:>4} ms",
                descriptor.id,
                descriptor.capacity,
                descriptor.cycle_delay_ms
            );
            workers.push(handle);
        }
        // Only the workers hold senders from here on.
        drop(sender);

        let links = AggregatorLinks {
            reports: receiver,
            all_done: bundle.all_done().clone(),
            print_granted: bundle.print_granted().clone(),
            inventory: bundle.inventory().clone(),
        };
        let aggregator =
            Aggregator::new(self.run_id, self.config.worker_count, links)?.with_stall_timeout(self.config.stall_timeout);
        let aggregator = self.spawner.spawn_aggregator(aggregator);
        bundle.register(aggregator.unit(), aggregator.abort_handle()).await;

        Ok((workers, aggregator))
    }

    async fn supervise(
        &self,
        bundle: &ResourceBundle,
        workers: Vec<WorkerHandle>,
        mut aggregator: AggregatorHandle,
    ) -> OrchestratorResult<RunOutcome> {
        // A dead aggregator never posts or abandons AllDone, so watch its task as well.
        let (handoff, early_exit) = tokio::select! {
            biased;
            waited = bundle.all_done().wait() => (Self::grant_print(bundle, waited), None),
            exited = aggregator.exited() => {
                process_error!(UNIT, "❌ Aggregator terminated before reporting completion");
                let abandoned = SharedError::Abandoned {
                    barrier: bundle.all_done().name().to_string(),
                };
                (Err(OrchestratorError::Barrier(abandoned)), Some(exited))
            }
        };

        let reaped = match self.config.reap_timeout {
            Some(limit) => tokio::time::timeout(limit, Self::reap(workers, aggregator, early_exit))
                .await
                .map_err(|_| OrchestratorError::ReapTimeout {
                    waited_ms: limit.as_millis() as u64,
                })
                .and_then(|reaped| reaped),
            None => Self::reap(workers, aggregator, early_exit).await,
        };

        // The aggregator's own failure explains a missing handoff better than the barrier does.
        reaped.and_then(|outcome| handoff.map(|_| outcome))
    }

    /// Second half of the handoff: let the aggregator print once every worker is done
    fn grant_print(bundle: &ResourceBundle, all_done: SharedResult<()>) -> OrchestratorResult<()> {
        match all_done {
            Ok(()) => {
                process_info!(UNIT, "📣 Aggregator says all workers have completed their mission");
                let granted = bundle.print_granted().post().map_err(OrchestratorError::Barrier);
                if granted.is_ok() {
                    process_info!(UNIT, "🖨️ Permission granted to print final report");
                }
                granted
            }
            Err(e) => {
                process_error!(UNIT, "❌ Aggregator will not report completion: {}", e);
                Err(OrchestratorError::Barrier(e))
            }
        }
    }

    /// Wait for every worker and then the aggregator to terminate
    async fn reap(
        workers: Vec<WorkerHandle>,
        aggregator: AggregatorHandle,
        early_exit: Option<AggregatorExit>,
    ) -> OrchestratorResult<RunOutcome> {
        let mut summaries = Vec::with_capacity(workers.len());
        let mut failed_workers = Vec::new();

        for handle in workers {
            let unit = handle.unit();
            match handle.join().await {
                Ok(Ok(summary)) => {
                    process_debug!(
                        UNIT,
                        "Reaped {} ({} units in {} cycles)",
                        unit,
                        summary.total_produced,
                        summary.cycles
                    );
                    summaries.push(summary);
                }
                Ok(Err(e)) => {
                    logging::log_error(&unit, "Worker", &e);
                    if let UnitId::Worker(id) = unit {
                        failed_workers.push(id);
                    }
                }
                Err(e) => {
                    logging::log_error(&unit, "Joining worker", &e);
                    if let UnitId::Worker(id) = unit {
                        failed_workers.push(id);
                    }
                }
            }
        }

        let exited = match early_exit {
            Some(exited) => exited,
            None => aggregator.join().await,
        };
        let report = exited??;
        if !failed_workers.is_empty() {
            process_warn!(UNIT, "⚠️ {} worker(s) did not terminate cleanly", failed_workers.len());
        }

        Ok(RunOutcome {
            report,
            workers: summaries,
            failed_workers,
        })
    }
}
