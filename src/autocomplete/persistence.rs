//! Write-Through Persistence
//!
//! Recorded occurrences are applied to the index synchronously and handed to this
//! queue for the store. A single background worker drains the queue in order:
//!
//! 1. Each write runs under a timeout (`ServiceConfig::persist_timeout`).
//! 2. Failed writes are retried with exponential backoff plus jitter, up to
//!    `ServiceConfig::persist_max_attempts` tries in total.
//! 3. A write that times out is never retried: it may still land, and increments
//!    are not idempotent. It is counted as `timed_out` with an unknown outcome.
//! 4. Terminal failures are logged and counted; the in-memory increment stays.
//!
//! The queue is bounded. When it is full the write is dropped and counted, so the
//! request path never waits on the store.

use super::types::{PersistenceSnapshot, ServiceConfig};
use crate::storage::{WordRecord, WordStore};

use anyhow::Result;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::{mpsc, oneshot};

const INITIAL_BACKOFF_MS: u64 = 150;
const MAX_BACKOFF_MS: u64 = 1200;
const MAX_JITTER_MS: u64 = 50;

enum WriteJob {
    Increment { word: String, increment_by: u64 },
    /// Acknowledged once every job queued before it has been attempted.
    Flush(oneshot::Sender<()>),
}

/// Counters shared between the queue handle and the worker.
#[derive(Debug, Default)]
pub struct PersistenceStats {
    enqueued: AtomicU64,
    persisted: AtomicU64,
    retried: AtomicU64,
    failed: AtomicU64,
    timed_out: AtomicU64,
    dropped: AtomicU64,
}

impl PersistenceStats {
    pub fn snapshot(&self) -> PersistenceSnapshot {
        PersistenceSnapshot {
            enqueued: self.enqueued.load(Ordering::Relaxed),
            persisted: self.persisted.load(Ordering::Relaxed),
            retried: self.retried.load(Ordering::Relaxed),
            failed: self.failed.load(Ordering::Relaxed),
            timed_out: self.timed_out.load(Ordering::Relaxed),
            dropped: self.dropped.load(Ordering::Relaxed),
        }
    }
}

/// Handle used by the service to schedule store writes.
pub struct WriteThroughQueue {
    sender: mpsc::Sender<WriteJob>,
    stats: Arc<PersistenceStats>,
}

impl WriteThroughQueue {
    /// Spawns the worker on the current tokio runtime.
    ///
    /// The worker stops once the queue handle is dropped and the backlog is drained.
    pub fn spawn(store: Arc<dyn WordStore>, config: &ServiceConfig) -> Self {
        let (sender, receiver) = mpsc::channel(config.persist_queue_capacity.max(1));
        let stats = Arc::new(PersistenceStats::default());

        let worker = PersistenceWorker {
            store,
            receiver,
            stats: stats.clone(),
            timeout: config.persist_timeout,
            max_attempts: config.persist_max_attempts.max(1),
        };
        tokio::spawn(worker.run());

        Self { sender, stats }
    }

    /// Schedules `word += increment_by` in the store without waiting for it.
    ///
    /// Returns `false` if the write was dropped.
    pub fn enqueue(&self, word: String, increment_by: u64) -> bool {
        let job = WriteJob::Increment { word, increment_by };
        match self.sender.try_send(job) {
            Ok(()) => {
                self.stats.enqueued.fetch_add(1, Ordering::Relaxed);
                true
            }
            Err(mpsc::error::TrySendError::Full(WriteJob::Increment { word, .. })) => {
                self.stats.dropped.fetch_add(1, Ordering::Relaxed);
                tracing::warn!(
                    "Persistence queue full, dropping store write for '{}' (in-memory count kept)",
                    word
                );
                false
            }
            Err(_) => {
                self.stats.dropped.fetch_add(1, Ordering::Relaxed);
                tracing::error!("Persistence worker is gone, store write dropped");
                false
            }
        }
    }

    /// Waits until every write queued so far has either landed or failed for good.
    pub async fn flush(&self) -> Result<()> {
        let (ack, done) = oneshot::channel();
        self.sender
            .send(WriteJob::Flush(ack))
            .await
            .map_err(|_| anyhow::anyhow!("persistence worker is not running"))?;
        done.await
            .map_err(|_| anyhow::anyhow!("persistence worker stopped before flushing"))?;
        Ok(())
    }

    pub fn stats(&self) -> PersistenceSnapshot {
        self.stats.snapshot()
    }
}

struct PersistenceWorker {
    store: Arc<dyn WordStore>,
    receiver: mpsc::Receiver<WriteJob>,
    stats: Arc<PersistenceStats>,
    timeout: Duration,
    max_attempts: usize,
}

impl PersistenceWorker {
    async fn run(mut self) {
        tracing::debug!("Persistence worker started");

        while let Some(job) = self.receiver.recv().await {
            match job {
                WriteJob::Increment { word, increment_by } => {
                    match self.write_with_retry(&word, increment_by).await {
                        Ok(record) => {
                            self.stats.persisted.fetch_add(1, Ordering::Relaxed);
                            tracing::debug!(
                                "Persisted '{}' (stored frequency={})",
                                record.word,
                                record.frequency
                            );
                        }
                        Err(WriteError::TimedOut) => {
                            self.stats.timed_out.fetch_add(1, Ordering::Relaxed);
                            tracing::error!(
                                "Store write for '{}' timed out after {:?}, not retried. The store may or may not hold it",
                                word,
                                self.timeout
                            );
                        }
                        Err(WriteError::Failed(e)) => {
                            self.stats.failed.fetch_add(1, Ordering::Relaxed);
                            tracing::error!(
                                "Failed to persist '{}' after {} attempts: {:#}. In-memory count is now ahead of the store",
                                word,
                                self.max_attempts,
                                e
                            );
                        }
                    }
                }
                WriteJob::Flush(ack) => {
                    let _ = ack.send(());
                }
            }
        }

        tracing::debug!("Persistence worker stopped");
    }

    async fn write_with_retry(
        &self,
        word: &str,
        increment_by: u64,
    ) -> Result<WordRecord, WriteError> {
        let mut delay_ms = INITIAL_BACKOFF_MS;

        for attempt in 0..self.max_attempts {
            let result =
                tokio::time::timeout(self.timeout, self.store.upsert_increment(word, increment_by))
                    .await;

            let error = match result {
                Ok(Ok(record)) => return Ok(record),
                Ok(Err(e)) => e,
                Err(_) => return Err(WriteError::TimedOut),
            };

            if attempt + 1 == self.max_attempts {
                return Err(WriteError::Failed(error));
            }

            self.stats.retried.fetch_add(1, Ordering::Relaxed);
            tracing::warn!(
                "Store write for '{}' failed (attempt {}/{}): {:#}",
                word,
                attempt + 1,
                self.max_attempts,
                error
            );

            let jitter = rand::random::<u64>() % MAX_JITTER_MS;
            tokio::time::sleep(Duration::from_millis(delay_ms + jitter)).await;
            delay_ms = (delay_ms * 2).min(MAX_BACKOFF_MS);
        }

        Err(WriteError::Failed(anyhow::anyhow!("Retry attempts exhausted")))
    }
}

enum WriteError {
    /// The store answered with an error on every attempt.
    Failed(anyhow::Error),
    /// No answer within the timeout; the write may still have been applied.
    TimedOut,
}
