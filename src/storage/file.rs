//! JSON File Word Store
//!
//! Keeps the word table in memory and writes the whole table back to disk after
//! every upsert. The file is a JSON array of `WordRecord`s.
//!
//! Writes go to a sibling temporary file first and are then renamed over the real
//! one, so a crash mid-write leaves the previous table intact. The in-memory table
//! only changes once the new file is in place.

use super::store::{WordRecord, WordStore};

use anyhow::{Context, Result};
use async_trait::async_trait;
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tokio::fs;
use tokio::sync::Mutex;

pub struct FileWordStore {
    inner: Arc<FileTable>,
}

struct FileTable {
    path: PathBuf,
    words: Mutex<BTreeMap<String, u64>>,
}

impl FileWordStore {
    /// Opens the store at `path`. A missing file is treated as an empty table.
    pub async fn open(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref().to_path_buf();

        let words = match fs::read_to_string(&path).await {
            Ok(raw) => {
                let records: Vec<WordRecord> = serde_json::from_str(&raw)
                    .with_context(|| format!("failed to parse word store {}", path.display()))?;
                let mut words = BTreeMap::new();
                for record in records {
                    let frequency = words.entry(record.word).or_insert(0u64);
                    *frequency = frequency.saturating_add(record.frequency);
                }
                words
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                tracing::info!("Word store {} does not exist yet, starting empty", path.display());
                BTreeMap::new()
            }
            Err(e) => {
                return Err(e)
                    .with_context(|| format!("failed to read word store {}", path.display()));
            }
        };

        tracing::info!("Opened word store {} ({} words)", path.display(), words.len());

        Ok(Self {
            inner: Arc::new(FileTable {
                path,
                words: Mutex::new(words),
            }),
        })
    }
}

impl FileTable {
    /// Writes the updated table to disk, then commits it to memory.
    ///
    /// The lock is held across the write so snapshots land in upsert order.
    async fn upsert(&self, word: String, increment_by: u64) -> Result<WordRecord> {
        let mut words = self.words.lock().await;

        let frequency = words
            .get(&word)
            .copied()
            .unwrap_or(0)
            .saturating_add(increment_by);
        let mut updated = words.clone();
        updated.insert(word.clone(), frequency);

        self.write_snapshot(&updated).await?;
        *words = updated;

        Ok(WordRecord::new(word, frequency))
    }

    async fn write_snapshot(&self, words: &BTreeMap<String, u64>) -> Result<()> {
        let records: Vec<WordRecord> = words
            .iter()
            .map(|(word, frequency)| WordRecord::new(word.clone(), *frequency))
            .collect();
        let payload = serde_json::to_vec_pretty(&records)?;

        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent).await.with_context(|| {
                    format!("failed to create store directory {}", parent.display())
                })?;
            }
        }

        let mut tmp_name = self.path.as_os_str().to_owned();
        tmp_name.push(".tmp");
        let tmp_path = PathBuf::from(tmp_name);

        fs::write(&tmp_path, payload)
            .await
            .with_context(|| format!("failed to write {}", tmp_path.display()))?;
        fs::rename(&tmp_path, &self.path)
            .await
            .with_context(|| format!("failed to replace {}", self.path.display()))?;
        Ok(())
    }
}

#[async_trait]
impl WordStore for FileWordStore {
    async fn list_all(&self) -> Result<Vec<WordRecord>> {
        let words = self.inner.words.lock().await;
        Ok(words
            .iter()
            .map(|(word, frequency)| WordRecord::new(word.clone(), *frequency))
            .collect())
    }

    async fn upsert_increment(&self, word: &str, increment_by: u64) -> Result<WordRecord> {
        // Runs as its own task: dropping this future (e.g. on timeout) does not
        // stop a write halfway, the upsert either fully lands or fully fails.
        let table = self.inner.clone();
        let word = word.to_string();
        tokio::spawn(async move { table.upsert(word, increment_by).await })
            .await
            .context("word store write task panicked")?
    }
}
