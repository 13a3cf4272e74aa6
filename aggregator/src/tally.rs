//! Pure tally state
//!
//! Kept free of channels and barriers so the counting rules can be tested
//! without a runtime.

use std::collections::BTreeSet;

use shared::{FinalReport, ReportMessage, RunId, WorkerId, WorkerTotals};

/// Output attributed to one worker
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct WorkerStatistics {
    pub total_produced: u64,
    pub cycles: u64,
}

/// What applying one report did to the tally
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TallyEvent {
    Produced { worker_id: WorkerId, batch_size: u32 },
    Finished { worker_id: WorkerId, finished: u32 },
    DuplicateCompletion { worker_id: WorkerId },
    UnknownWorker { worker_id: WorkerId },
}

#[derive(Debug, Clone)]
pub struct Tally {
    // Index 0 is worker 1
    workers: Vec<WorkerStatistics>,
    finished: BTreeSet<WorkerId>,
    grand_total: u64,
}

impl Tally {
    pub fn new(worker_count: u32) -> Self {
        Self {
            workers: vec![WorkerStatistics::default(); worker_count as usize],
            finished: BTreeSet::new(),
            grand_total: 0,
        }
    }

    pub fn worker_count(&self) -> u32 {
        self.workers.len() as u32
    }

    pub fn apply(&mut self, message: ReportMessage) -> TallyEvent {
        let worker_id = message.worker_id();
        let Some(index) = self.index_of(worker_id) else {
            return TallyEvent::UnknownWorker { worker_id };
        };

        match message {
            ReportMessage::Progress { batch_size, .. } => {
                let stats = &mut self.workers[index];
                stats.total_produced += u64::from(batch_size);
                stats.cycles += 1;
                self.grand_total += u64::from(batch_size);
                TallyEvent::Produced { worker_id, batch_size }
            }
            ReportMessage::Completion { .. } => {
                if self.finished.insert(worker_id) {
                    TallyEvent::Finished {
                        worker_id,
                        finished: self.finished_count(),
                    }
                } else {
                    TallyEvent::DuplicateCompletion { worker_id }
                }
            }
        }
    }

    /// Whether one completion has been seen from every worker
    pub fn is_complete(&self) -> bool {
        self.finished_count() == self.worker_count()
    }

    pub fn finished_count(&self) -> u32 {
        self.finished.len() as u32
    }

    pub fn grand_total(&self) -> u64 {
        self.grand_total
    }

    pub fn statistics(&self, worker_id: WorkerId) -> Option<WorkerStatistics> {
        self.index_of(worker_id).map(|index| self.workers[index])
    }

    pub fn into_report(self, run_id: RunId, order_size: u32) -> FinalReport {
        let workers = self
            .workers
            .iter()
            .enumerate()
            .map(|(index, stats)| WorkerTotals {
                worker_id: WorkerId(index as u32 + 1),
                total_produced: stats.total_produced,
                cycles: stats.cycles,
            })
            .collect();

        FinalReport {
            run_id,
            order_size,
            grand_total: self.grand_total,
            workers,
        }
    }

    fn index_of(&self, worker_id: WorkerId) -> Option<usize> {
        let id = worker_id.get() as usize;
        (1..=self.workers.len()).contains(&id).then(|| id - 1)
    }
}
