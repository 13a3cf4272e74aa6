//! Process shutdown requests
//!
//! Signal handlers are registered when the listener is installed, not when the
//! run first polls it, so a Ctrl+C that arrives while units are still being
//! described or spawned is held until the run can tear down.

use std::sync::Arc;
use tokio::sync::Notify;

use shared::{logging, UnitId};

use crate::error::OrchestratorResult;

const UNIT: UnitId = UnitId::Orchestrator;

/// Latched shutdown request shared between the signal listener and the run
#[derive(Debug, Clone, Default)]
pub struct ShutdownSignal {
    notify: Arc<Notify>,
}

impl ShutdownSignal {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register Ctrl+C (and SIGTERM on unix) and latch the first one received
    #[cfg(unix)]
    pub fn install() -> OrchestratorResult<Self> {
        use tokio::signal::unix::{signal, SignalKind};

        let shutdown = Self::new();
        let mut interrupt = signal(SignalKind::interrupt())?;
        let mut terminate = signal(SignalKind::terminate())?;

        let latch = shutdown.clone();
        tokio::spawn(async move {
            let received = tokio::select! {
                _ = interrupt.recv() => "Ctrl+C",
                _ = terminate.recv() => "SIGTERM",
            };
            logging::log_shutdown(&UNIT, &format!("{received} received"));
            latch.trigger();
        });
        Ok(shutdown)
    }

    #[cfg(not(unix))]
    pub fn install() -> OrchestratorResult<Self> {
        let shutdown = Self::new();
        let latch = shutdown.clone();
        tokio::spawn(async move {
            match tokio::signal::ctrl_c().await {
                Ok(()) => {
                    logging::log_shutdown(&UNIT, "Ctrl+C received");
                    latch.trigger();
                }
                Err(err) => logging::log_error(&UNIT, "Ctrl+C handler", &err),
            }
        });
        Ok(shutdown)
    }

    /// Request shutdown; a request made before anyone waits is kept
    pub fn trigger(&self) {
        self.notify.notify_one();
    }

    /// Resolves once shutdown has been requested
    pub async fn triggered(self) {
        self.notify.notified().await;
    }
}
