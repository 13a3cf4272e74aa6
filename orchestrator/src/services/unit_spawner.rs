//! Real unit spawner
//!
//! Runs every worker and the aggregator as its own tokio task, instrumented
//! with a span naming the unit.

use tracing::Instrument;

use aggregator::{Aggregator, AggregatorResult};
use producer::{ProducerResult, ProductionWorker, WorkerSummary};
use shared::{process_debug, FinalReport, UnitId};

use crate::traits::{UnitHandle, UnitSpawner};

#[derive(Debug, Default, Clone)]
pub struct RealUnitSpawner;

impl RealUnitSpawner {
    pub fn new() -> Self {
        Self
    }
}

impl UnitSpawner for RealUnitSpawner {
    fn spawn_worker(&self, worker: ProductionWorker) -> UnitHandle<ProducerResult<WorkerSummary>> {
        let unit = UnitId::Worker(worker.id());
        let span = tracing::info_span!("worker", id = worker.id().get());
        let handle = tokio::spawn(worker.run().instrument(span));
        process_debug!(UnitId::Orchestrator, "Spawned {}", unit);
        UnitHandle::new(unit, handle)
    }

    fn spawn_aggregator(&self, aggregator: Aggregator) -> UnitHandle<AggregatorResult<FinalReport>> {
        let span = tracing::info_span!("aggregator", workers = aggregator.worker_count());
        let handle = tokio::spawn(aggregator.run().instrument(span));
        process_debug!(UnitId::Orchestrator, "Spawned {}", UnitId::Aggregator);
        UnitHandle::new(UnitId::Aggregator, handle)
    }
}
