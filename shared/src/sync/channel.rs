//! Report Channel: ordered multi-producer, single-consumer conduit for worker reports

use std::sync::Arc;
use std::time::Duration;
use tokio::sync::mpsc;

use crate::errors::{SharedError, SharedResult};
use crate::messages::ReportMessage;

/// Create a bounded report channel.
///
/// Each sender preserves FIFO order for its own messages; nothing is ordered
/// across senders.
pub fn report_channel(name: impl Into<String>, bound: usize) -> SharedResult<(ReportSender, ReportReceiver)> {
    let name: Arc<str> = name.into().into();
    if bound == 0 {
        return Err(SharedError::ResourceCreation {
            resource: name.to_string(),
            reason: "channel bound must be at least 1".to_string(),
        });
    }

    let (tx, rx) = mpsc::channel(bound);
    Ok((
        ReportSender { name: name.clone(), tx },
        ReportReceiver { name, rx },
    ))
}

/// Producer end, cloned once per worker
#[derive(Debug, Clone)]
pub struct ReportSender {
    name: Arc<str>,
    tx: mpsc::Sender<ReportMessage>,
}

impl ReportSender {
    /// Send one report, waiting for room if the channel is full.
    ///
    /// Fails only when the receiver is gone; the message is never dropped silently.
    pub async fn send(&self, message: ReportMessage) -> SharedResult<()> {
        self.tx.send(message).await.map_err(|_| SharedError::ChannelClosed {
            channel: self.name.to_string(),
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }
}

/// Consumer end, owned by the aggregator
#[derive(Debug)]
pub struct ReportReceiver {
    name: Arc<str>,
    rx: mpsc::Receiver<ReportMessage>,
}

impl ReportReceiver {
    /// Block until the next report. Fails once every sender has been dropped.
    pub async fn recv(&mut self) -> SharedResult<ReportMessage> {
        self.rx.recv().await.ok_or_else(|| SharedError::ChannelClosed {
            channel: self.name.to_string(),
        })
    }

    /// Like [`recv`](Self::recv) but gives up with `Stalled` after `timeout`.
    pub async fn recv_within(&mut self, timeout: Duration) -> SharedResult<ReportMessage> {
        match tokio::time::timeout(timeout, self.recv()).await {
            Ok(result) => result,
            Err(_) => Err(SharedError::Stalled {
                channel: self.name.to_string(),
                waited_ms: timeout.as_millis() as u64,
            }),
        }
    }

    /// Close the channel; pending messages can still be drained.
    pub fn close(&mut self) {
        self.rx.close();
    }

    pub fn name(&self) -> &str {
        &self.name
    }
}
