use anyhow::Result;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};

/// A persisted vocabulary entry. `word` is the uniqueness key.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct WordRecord {
    pub word: String,
    #[serde(default = "default_frequency")]
    pub frequency: u64,
}

fn default_frequency() -> u64 {
    1
}

impl WordRecord {
    pub fn new(word: impl Into<String>, frequency: u64) -> Self {
        Self {
            word: word.into(),
            frequency,
        }
    }
}

/// The durable word table the in-memory index is rebuilt from.
///
/// Implementations must make `upsert_increment` atomic per word: concurrent calls
/// for the same word may not lose increments.
#[async_trait]
pub trait WordStore: Send + Sync {
    /// Every stored record, in no particular order. Used only during hydration.
    async fn list_all(&self) -> Result<Vec<WordRecord>>;

    /// Creates `word` with `frequency = increment_by`, or adds `increment_by` to it.
    async fn upsert_increment(&self, word: &str, increment_by: u64) -> Result<WordRecord>;
}
