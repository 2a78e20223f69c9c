use super::store::{WordRecord, WordStore};

use anyhow::Result;
use async_trait::async_trait;
use dashmap::DashMap;

/// Process-local word store backed by a sharded concurrent map.
///
/// Nothing survives a restart; used for tests and for running without a store file.
#[derive(Debug, Default)]
pub struct MemoryWordStore {
    words: DashMap<String, u64>,
}

impl MemoryWordStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds a store pre-populated with `records`, merging duplicate words.
    pub fn with_records(records: impl IntoIterator<Item = WordRecord>) -> Self {
        let store = Self::new();
        for record in records {
            store.increment(&record.word, record.frequency);
        }
        store
    }

    pub fn get(&self, word: &str) -> Option<u64> {
        self.words.get(word).map(|entry| *entry.value())
    }

    pub fn len(&self) -> usize {
        self.words.len()
    }

    pub fn is_empty(&self) -> bool {
        self.words.is_empty()
    }

    fn increment(&self, word: &str, increment_by: u64) -> u64 {
        // The entry guard holds the shard lock, so read-modify-write is atomic.
        let mut entry = self.words.entry(word.to_string()).or_insert(0);
        *entry = entry.saturating_add(increment_by);
        *entry
    }
}

#[async_trait]
impl WordStore for MemoryWordStore {
    async fn list_all(&self) -> Result<Vec<WordRecord>> {
        Ok(self
            .words
            .iter()
            .map(|entry| WordRecord::new(entry.key().clone(), *entry.value()))
            .collect())
    }

    async fn upsert_increment(&self, word: &str, increment_by: u64) -> Result<WordRecord> {
        let frequency = self.increment(word, increment_by);
        tracing::debug!("Upserted '{}' in memory store (frequency={})", word, frequency);
        Ok(WordRecord::new(word, frequency))
    }
}
