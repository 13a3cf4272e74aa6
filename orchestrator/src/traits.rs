//! Seams between the orchestrator core and the outside world
//!
//! How worker parameters are chosen and how concurrent units are started are
//! both external concerns; the orchestrator only needs the capabilities below.

use tokio::task::{AbortHandle, JoinHandle};

use aggregator::{Aggregator, AggregatorResult};
use producer::{ProducerResult, ProductionWorker, WorkerSummary};
use shared::{FinalReport, UnitId, WorkerDescriptor, WorkerId};

use crate::error::{OrchestratorError, OrchestratorResult};

/// Source of per-worker launch parameters
#[mockall::automock]
pub trait DescriptorSource: Send {
    /// Produce the descriptor for worker `id`
    fn describe(&mut self, id: WorkerId) -> WorkerDescriptor;
}

/// Capability to start workers and the aggregator as concurrent units
pub trait UnitSpawner: Send + Sync {
    fn spawn_worker(&self, worker: ProductionWorker) -> UnitHandle<ProducerResult<WorkerSummary>>;

    fn spawn_aggregator(&self, aggregator: Aggregator) -> UnitHandle<AggregatorResult<FinalReport>>;
}

/// Handle to one spawned unit
#[derive(Debug)]
pub struct UnitHandle<T> {
    unit: UnitId,
    handle: JoinHandle<T>,
}

impl<T> UnitHandle<T> {
    pub fn new(unit: UnitId, handle: JoinHandle<T>) -> Self {
        Self { unit, handle }
    }

    pub fn unit(&self) -> UnitId {
        self.unit
    }

    /// Handle that can forcibly stop the unit without consuming this one
    pub fn abort_handle(&self) -> AbortHandle {
        self.handle.abort_handle()
    }

    pub fn is_finished(&self) -> bool {
        self.handle.is_finished()
    }

    /// Wait for the unit to terminate
    pub async fn join(mut self) -> OrchestratorResult<T> {
        self.exited().await
    }

    /// Wait for the unit to terminate while keeping the handle.
    ///
    /// Must not be awaited again once it has returned.
    pub async fn exited(&mut self) -> OrchestratorResult<T> {
        let unit = self.unit;
        (&mut self.handle).await.map_err(|e| OrchestratorError::UnitJoin {
            unit: unit.to_string(),
            message: if e.is_cancelled() {
                "cancelled".to_string()
            } else {
                format!("panicked: {e}")
            },
        })
    }
}
