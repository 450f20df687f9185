//! Non-blocking audit recorder.
//!
//! [`AuditRecorder::record`] hands the event to a bounded channel and returns
//! immediately. A background worker drains the channel into an [`AuditSink`].
//! When the channel is full or the worker has stopped, the event is dropped
//! and a warning is logged.

use std::future::Future;
use std::sync::Arc;

use tokio::sync::mpsc;
use tokio::sync::mpsc::error::TrySendError;
use tokio::task::JoinHandle;
use tracing::{debug, warn};

use super::error::AuditError;
use super::types::AuditEvent;

/// Destination for audit events.
///
/// This trait is implemented by the db crate to provide actual database operations.
pub trait AuditSink: Send + Sync + 'static {
    /// Append one event.
    fn append(&self, event: AuditEvent) -> impl Future<Output = Result<(), AuditError>> + Send;
}

/// Cloneable handle for recording audit events.
#[derive(Debug, Clone)]
pub struct AuditRecorder {
    tx: mpsc::Sender<AuditEvent>,
}

impl AuditRecorder {
    /// Creates a recorder and the receiving end of its channel.
    ///
    /// A capacity of zero is treated as one.
    #[must_use]
    pub fn channel(capacity: usize) -> (Self, mpsc::Receiver<AuditEvent>) {
        let (tx, rx) = mpsc::channel(capacity.max(1));
        (Self { tx }, rx)
    }

    /// Creates a recorder whose worker drains into `sink`.
    ///
    /// Must be called from within a tokio runtime.
    pub fn spawn<S: AuditSink>(sink: Arc<S>, capacity: usize) -> (Self, JoinHandle<()>) {
        let (recorder, rx) = Self::channel(capacity);
        let handle = tokio::spawn(run_worker(sink, rx));
        (recorder, handle)
    }

    /// Queues an event without waiting for storage.
    pub fn record(&self, event: AuditEvent) {
        match self.tx.try_send(event) {
            Ok(()) => {}
            Err(TrySendError::Full(event)) => {
                warn!(
                    action = %event.action,
                    actor_id = %event.actor_id,
                    "Audit channel full, dropping event"
                );
            }
            Err(TrySendError::Closed(event)) => {
                warn!(
                    action = %event.action,
                    actor_id = %event.actor_id,
                    "Audit worker stopped, dropping event"
                );
            }
        }
    }
}

/// Drains events into the sink until every recorder handle is dropped.
///
/// Sink failures are logged and the event is discarded; nothing is retried.
pub async fn run_worker<S: AuditSink>(sink: Arc<S>, mut rx: mpsc::Receiver<AuditEvent>) {
    while let Some(event) = rx.recv().await {
        let action = event.action;
        let actor_id = event.actor_id;
        match sink.append(event).await {
            Ok(()) => debug!(action = %action, actor_id = %actor_id, "Audit event stored"),
            Err(e) => warn!(
                action = %action,
                actor_id = %actor_id,
                error = %e,
                "Failed to store audit event"
            ),
        }
    }
    debug!("Audit worker stopped");
}
