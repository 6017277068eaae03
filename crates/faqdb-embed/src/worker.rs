//! Background embedding generation for write paths.
//!
//! Record writes must not wait on the embedding backend. Instead they submit
//! jobs to this worker's queue; outcomes (including failures and degraded
//! vectors) come back on a separate channel that the ingestion side consumes
//! and may use to resubmit.

use std::sync::Arc;

use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tracing::warn;

use faqdb_core::{Error, Result};

use crate::service::{Embedding, EmbeddingService};

#[derive(Debug, Clone)]
pub struct EmbedJob {
    pub id: String,
    pub text: String,
}

#[derive(Debug)]
pub struct EmbedOutcome {
    pub id: String,
    pub result: Result<Embedding>,
}

pub struct EmbedWorker {
    jobs: mpsc::Sender<EmbedJob>,
    handle: JoinHandle<()>,
}

impl EmbedWorker {
    /// Spawn the worker task. Returns the handle plus the outcome channel.
    pub fn spawn(
        service: Arc<EmbeddingService>,
        queue_depth: usize,
    ) -> (Self, mpsc::Receiver<EmbedOutcome>) {
        let (job_tx, mut job_rx) = mpsc::channel::<EmbedJob>(queue_depth);
        let (out_tx, out_rx) = mpsc::channel::<EmbedOutcome>(queue_depth);
        let handle = tokio::spawn(async move {
            while let Some(job) = job_rx.recv().await {
                let result = service.generate(&job.text).await;
                if let Err(e) = &result {
                    warn!(id = %job.id, error = %e, "background embed job failed");
                }
                // If the consumer went away, keep draining so producers unblock.
                let _ = out_tx.send(EmbedOutcome { id: job.id, result }).await;
            }
        });
        (Self { jobs: job_tx, handle }, out_rx)
    }

    /// Fire-and-forget submission. Returns false when the queue is full or
    /// closed; the write path never blocks on embedding.
    pub fn submit(&self, id: impl Into<String>, text: impl Into<String>) -> bool {
        let job = EmbedJob { id: id.into(), text: text.into() };
        match self.jobs.try_send(job) {
            Ok(()) => true,
            Err(mpsc::error::TrySendError::Full(job)) => {
                warn!(id = %job.id, "embed queue full, dropping job");
                false
            }
            Err(mpsc::error::TrySendError::Closed(job)) => {
                warn!(id = %job.id, "embed worker stopped, dropping job");
                false
            }
        }
    }

    /// Close the queue and wait for in-flight jobs to finish.
    pub async fn shutdown(self) -> Result<()> {
        drop(self.jobs);
        self.handle
            .await
            .map_err(|e| Error::BackendUnavailable(format!("embed worker panicked: {e}")))
    }
}
