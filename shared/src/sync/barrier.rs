//! One-shot rendezvous tokens
//!
//! A barrier is posted at most once by one party and waited at most once by
//! another. The poster may instead abandon it, and teardown may destroy it;
//! either releases a blocked waiter with an error instead of leaving it hanging.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use tokio::sync::watch;

use crate::errors::{SharedError, SharedResult};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum BarrierState {
    Pending,
    Posted,
    Abandoned,
    Destroyed,
}

#[derive(Debug)]
pub struct OneShotBarrier {
    name: Arc<str>,
    state: watch::Sender<BarrierState>,
    posted: AtomicBool,
    waited: AtomicBool,
}

impl OneShotBarrier {
    pub fn new(name: impl Into<String>) -> Self {
        let name: String = name.into();
        let (state, _) = watch::channel(BarrierState::Pending);
        Self {
            name: name.into(),
            state,
            posted: AtomicBool::new(false),
            waited: AtomicBool::new(false),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Fire the barrier, releasing the waiter
    pub fn post(&self) -> SharedResult<()> {
        if self.posted.swap(true, Ordering::AcqRel) {
            return Err(SharedError::AlreadyPosted {
                barrier: self.name.to_string(),
            });
        }
        let fired = self.state.send_if_modified(|state| {
            if *state == BarrierState::Pending {
                *state = BarrierState::Posted;
                return true;
            }
            false
        });
        if fired {
            Ok(())
        } else {
            Err(SharedError::ResourceDestroyed {
                resource: self.name.to_string(),
            })
        }
    }

    /// Give up on posting; the waiter is released with `Abandoned`
    pub fn abandon(&self) {
        if self.posted.swap(true, Ordering::AcqRel) {
            return;
        }
        self.state.send_if_modified(|state| {
            if *state == BarrierState::Pending {
                *state = BarrierState::Abandoned;
                return true;
            }
            false
        });
    }

    /// Block until the barrier is posted, abandoned or destroyed
    pub async fn wait(&self) -> SharedResult<()> {
        if self.waited.swap(true, Ordering::AcqRel) {
            return Err(SharedError::AlreadyWaited {
                barrier: self.name.to_string(),
            });
        }

        let mut rx = self.state.subscribe();
        let outcome = match rx.wait_for(|state| *state != BarrierState::Pending).await {
            Ok(state) => *state,
            Err(_) => BarrierState::Destroyed,
        };

        match outcome {
            BarrierState::Posted => Ok(()),
            BarrierState::Abandoned => Err(SharedError::Abandoned {
                barrier: self.name.to_string(),
            }),
            BarrierState::Pending | BarrierState::Destroyed => Err(SharedError::ResourceDestroyed {
                resource: self.name.to_string(),
            }),
        }
    }

    /// Destroy the barrier. Returns `false` if it already was.
    pub fn destroy(&self) -> bool {
        let previous = self.state.send_replace(BarrierState::Destroyed);
        previous != BarrierState::Destroyed
    }

    pub fn is_posted(&self) -> bool {
        *self.state.borrow() == BarrierState::Posted
    }
}
