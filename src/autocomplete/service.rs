//! Autocomplete Service
//!
//! Owns the lock-guarded `PrefixTrie` and a handle to the `WordStore`, and exposes
//! the hydrate / suggest / record contract used by the HTTP handlers.
//!
//! ## Lifecycle
//! `new` -> `hydrate` -> `Ready` -> (`flush` on shutdown). `suggest` and
//! `record_occurrence` fail until the service is `Ready`, so traffic arriving early
//! never sees a half-loaded index.
//!
//! ## Consistency
//! Recorded occurrences update the trie under the write lock before returning; the
//! store write is queued and may fail later. The trie can therefore run ahead of the
//! store, and that gap is visible through `stats().persistence`.

use super::persistence::WriteThroughQueue;
use super::types::{HydrationPolicy, HydrationReport, ServiceConfig, ServiceState, ServiceStats};
use crate::storage::WordStore;
use crate::trie::PrefixTrie;

use anyhow::{Context, Result};
use std::sync::Arc;
use tokio::sync::{watch, RwLock};

pub struct AutocompleteService {
    trie: RwLock<PrefixTrie>,
    state: watch::Sender<ServiceState>,
    store: Arc<dyn WordStore>,
    writes: WriteThroughQueue,
    config: ServiceConfig,
}

impl AutocompleteService {
    /// Creates an empty, `Uninitialized` service and starts its persistence worker.
    ///
    /// Must be called from inside a tokio runtime.
    pub fn new(store: Arc<dyn WordStore>, config: ServiceConfig) -> Arc<Self> {
        let writes = WriteThroughQueue::spawn(store.clone(), &config);
        let (state, _) = watch::channel(ServiceState::Uninitialized);

        Arc::new(Self {
            trie: RwLock::new(PrefixTrie::new()),
            state,
            store,
            writes,
            config,
        })
    }

    /// Loads every stored record into the trie and moves the service to `Ready`.
    ///
    /// Runs once. If the store cannot be read, `HydrationPolicy::Abort` leaves the
    /// service `Failed` and returns the error; `HydrationPolicy::StartEmpty` goes
    /// `Ready` with an empty trie and a degraded report.
    pub async fn hydrate(&self) -> Result<HydrationReport> {
        let started = self.state.send_if_modified(|state| {
            if *state == ServiceState::Uninitialized {
                *state = ServiceState::Hydrating;
                true
            } else {
                false
            }
        });
        if !started {
            anyhow::bail!("hydration already ran (state: {})", self.state());
        }

        tracing::info!("Loading words from store...");

        let records = match self.store.list_all().await {
            Ok(records) => records,
            Err(e) => return self.hydration_failed(e),
        };

        let mut report = HydrationReport::default();
        {
            let mut trie = self.trie.write().await;
            for record in records {
                let word = normalize_word(&record.word);
                if word.is_empty() || record.frequency == 0 {
                    tracing::debug!("Skipping stored record {:?}", record);
                    report.skipped += 1;
                    continue;
                }
                trie.insert(&word, record.frequency);
                report.loaded += 1;
            }
            report.words = trie.len();
        }

        self.state.send_replace(ServiceState::Ready);
        tracing::info!(
            "Index hydrated: {} records loaded, {} skipped, {} distinct words",
            report.loaded,
            report.skipped,
            report.words
        );

        Ok(report)
    }

    fn hydration_failed(&self, error: anyhow::Error) -> Result<HydrationReport> {
        match self.config.hydration_policy {
            HydrationPolicy::Abort => {
                self.state.send_replace(ServiceState::Failed);
                tracing::error!("Hydration failed, service will not become ready: {:#}", error);
                Err(error.context("failed to read words from store"))
            }
            HydrationPolicy::StartEmpty => {
                self.state.send_replace(ServiceState::Ready);
                tracing::error!(
                    "Hydration failed, serving from an EMPTY index: {:#}",
                    error
                );
                Ok(HydrationReport {
                    degraded: true,
                    ..HydrationReport::default()
                })
            }
        }
    }

    /// Ranked completions for `prefix`.
    ///
    /// Prefixes shorter than `min_prefix_len` chars return an empty list.
    pub async fn suggest(&self, prefix: &str) -> Result<Vec<String>> {
        self.ensure_ready()?;

        let prefix = normalize_word(prefix);
        if prefix.chars().count() < self.config.min_prefix_len {
            return Ok(Vec::new());
        }

        Ok(self.trie.read().await.suggestions(&prefix))
    }

    /// Counts one more use of `word`.
    ///
    /// The trie is updated before this returns and later suggestions see it; the
    /// store write is queued and its failure never surfaces here. Returns the
    /// in-memory frequency, or `None` if `word` is empty.
    pub async fn record_occurrence(&self, word: &str) -> Result<Option<u64>> {
        self.ensure_ready()?;

        let word = normalize_word(word);
        if word.is_empty() {
            return Ok(None);
        }

        let frequency = {
            let mut trie = self.trie.write().await;
            trie.insert(&word, 1);
            trie.frequency(&word).unwrap_or(0)
        };

        self.writes.enqueue(word, 1);
        Ok(Some(frequency))
    }

    /// In-memory frequency of an exact word.
    pub async fn frequency(&self, word: &str) -> Option<u64> {
        self.trie.read().await.frequency(&normalize_word(word))
    }

    /// Waits for every store write queued so far to land or fail for good.
    pub async fn flush(&self) -> Result<()> {
        self.writes
            .flush()
            .await
            .context("failed to flush pending store writes")
    }

    pub fn state(&self) -> ServiceState {
        *self.state.borrow()
    }

    /// Resolves once the service leaves `Uninitialized`/`Hydrating`, with the new state.
    pub async fn wait_for_hydration(&self) -> ServiceState {
        let mut receiver = self.state.subscribe();
        let result = receiver
            .wait_for(|state| matches!(state, ServiceState::Ready | ServiceState::Failed))
            .await
            .map(|state| *state);
        result.unwrap_or(ServiceState::Failed)
    }

    pub async fn word_count(&self) -> usize {
        self.trie.read().await.len()
    }

    pub async fn stats(&self) -> ServiceStats {
        ServiceStats {
            state: self.state(),
            words: self.word_count().await,
            persistence: self.writes.stats(),
        }
    }

    fn ensure_ready(&self) -> Result<()> {
        let state = self.state();
        if state != ServiceState::Ready {
            anyhow::bail!("autocomplete service is not ready (state: {})", state);
        }
        Ok(())
    }
}

/// The single case policy applied to stored, recorded and queried words.
pub fn normalize_word(raw: &str) -> String {
    raw.to_lowercase()
}
