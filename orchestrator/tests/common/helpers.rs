//! Test helpers for orchestrator tests

use std::future::Future;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use aggregator::{Aggregator, AggregatorResult};
use orchestrator::services::RealUnitSpawner;
use orchestrator::{
    DescriptorSource, Orchestrator, OrchestratorResult, RunConfig, RunOutcome, UnitHandle, UnitSpawner,
};
use producer::{ProducerResult, ProductionWorker, WorkerSummary};
use shared::{FinalReport, UnitId, WorkerId};
use tokio::task::AbortHandle;

/// How the recording spawner treats one particular worker
#[derive(Debug, Clone, Copy)]
pub enum Fault {
    None,
    /// The worker's task panics before doing any work
    Crash(WorkerId),
    /// The worker finishes its loop but its task lingers afterwards
    Linger(WorkerId, Duration),
    /// The aggregator's task panics before collecting anything
    CrashAggregator,
}

/// Spawner that delegates to the real one and remembers every unit it started
#[derive(Clone)]
pub struct RecordingSpawner {
    inner: RealUnitSpawner,
    fault: Fault,
    spawned: Arc<Mutex<Vec<(UnitId, AbortHandle)>>>,
}

impl RecordingSpawner {
    pub fn new() -> Self {
        Self::with_fault(Fault::None)
    }

    pub fn with_fault(fault: Fault) -> Self {
        Self {
            inner: RealUnitSpawner::new(),
            fault,
            spawned: Arc::new(Mutex::new(Vec::new())),
        }
    }

    pub fn spawned_units(&self) -> Vec<UnitId> {
        self.spawned.lock().unwrap().iter().map(|(unit, _)| *unit).collect()
    }

    /// Units whose tasks have not terminated yet
    pub fn running_units(&self) -> Vec<UnitId> {
        self.spawned
            .lock()
            .unwrap()
            .iter()
            .filter(|(_, abort)| !abort.is_finished())
            .map(|(unit, _)| *unit)
            .collect()
    }

    fn record<T>(&self, handle: UnitHandle<T>) -> UnitHandle<T> {
        self.spawned.lock().unwrap().push((handle.unit(), handle.abort_handle()));
        handle
    }
}

impl UnitSpawner for RecordingSpawner {
    fn spawn_worker(&self, worker: ProductionWorker) -> UnitHandle<ProducerResult<WorkerSummary>> {
        let id = worker.id();
        let handle = match self.fault {
            Fault::Crash(target) if target == id => {
                let task = tokio::spawn(async move {
                    drop(worker);
                    let crashed: Option<ProducerResult<WorkerSummary>> = None;
                    crashed.expect("simulated worker crash")
                });
                UnitHandle::new(UnitId::Worker(id), task)
            }
            Fault::Linger(target, linger) if target == id => {
                let task = tokio::spawn(async move {
                    let result = worker.run().await;
                    tokio::time::sleep(linger).await;
                    result
                });
                UnitHandle::new(UnitId::Worker(id), task)
            }
            _ => self.inner.spawn_worker(worker),
        };
        self.record(handle)
    }

    fn spawn_aggregator(&self, aggregator: Aggregator) -> UnitHandle<AggregatorResult<FinalReport>> {
        let handle = match self.fault {
            Fault::CrashAggregator => {
                let task = tokio::spawn(async move {
                    drop(aggregator);
                    let crashed: Option<AggregatorResult<FinalReport>> = None;
                    crashed.expect("simulated aggregator crash")
                });
                UnitHandle::new(UnitId::Aggregator, task)
            }
            _ => self.inner.spawn_aggregator(aggregator),
        };
        self.record(handle)
    }
}

pub struct TestHelpers;

impl TestHelpers {
    /// Run an orchestrator without any interrupt
    pub async fn run_to_completion<D>(config: RunConfig, descriptors: D) -> OrchestratorResult<RunOutcome>
    where
        D: DescriptorSource,
    {
        Orchestrator::new(config, descriptors, RealUnitSpawner::new())?
            .run(std::future::pending())
            .await
    }

    pub async fn run_with<D, F>(
        config: RunConfig,
        descriptors: D,
        spawner: RecordingSpawner,
        shutdown: F,
    ) -> OrchestratorResult<RunOutcome>
    where
        D: DescriptorSource,
        F: Future<Output = ()>,
    {
        Orchestrator::new(config, descriptors, spawner)?.run(shutdown).await
    }

    /// Let aborted tasks observe their cancellation
    pub async fn settle() {
        tokio::time::sleep(Duration::from_millis(1)).await;
    }

    /// Check the report against the order and against what workers claim they made
    pub fn assert_balanced(outcome: &RunOutcome, order_size: u32, worker_count: u32) {
        let report = &outcome.report;
        assert_eq!(report.order_size, order_size);
        assert_eq!(report.grand_total, u64::from(order_size));
        assert!(report.is_balanced());

        let ids: Vec<u32> = report.workers.iter().map(|w| w.worker_id.get()).collect();
        assert_eq!(ids, (1..=worker_count).collect::<Vec<_>>());

        let summed: u64 = report.workers.iter().map(|w| w.total_produced).sum();
        assert_eq!(summed, report.grand_total);

        for summary in &outcome.workers {
            let totals = report.worker(summary.worker_id).expect("worker missing from report");
            assert_eq!(totals.total_produced, summary.total_produced);
            assert_eq!(totals.cycles, summary.cycles);
        }
    }
}
