//! Storage Module Tests
//!
//! ## Test Scopes
//! - **MemoryWordStore**: upsert semantics and atomic increments under concurrency.
//! - **FileWordStore**: reopening from disk, missing files, corrupt files.
//! - **WordRecord**: JSON shape and the default frequency.

#[cfg(test)]
mod tests {
    use crate::storage::{FileWordStore, MemoryWordStore, WordRecord, WordStore};
    use std::path::PathBuf;
    use std::sync::Arc;

    fn temp_store_path(name: &str) -> PathBuf {
        let nanos = std::time::SystemTime::now()
            .duration_since(std::time::UNIX_EPOCH)
            .unwrap()
            .as_nanos();
        std::env::temp_dir()
            .join(format!("autocomplete-{}-{}-{}", name, std::process::id(), nanos))
            .join("words.json")
    }

    fn sorted(mut records: Vec<WordRecord>) -> Vec<WordRecord> {
        records.sort_by(|a, b| a.word.cmp(&b.word));
        records
    }

    // ============================================================
    // WORD RECORD TESTS
    // ============================================================

    #[test]
    fn test_word_record_json_shape() {
        let record = WordRecord::new("apple", 3);
        let json = serde_json::to_value(&record).unwrap();

        assert_eq!(json, serde_json::json!({"word": "apple", "frequency": 3}));
    }

    #[test]
    fn test_word_record_frequency_defaults_to_one() {
        let record: WordRecord = serde_json::from_str(r#"{"word": "pear"}"#).unwrap();

        assert_eq!(record.frequency, 1);
    }

    // ============================================================
    // MEMORY STORE TESTS
    // ============================================================

    #[tokio::test]
    async fn test_memory_upsert_creates_then_increments() {
        let store = MemoryWordStore::new();

        let created = store.upsert_increment("cat", 1).await.unwrap();
        assert_eq!(created, WordRecord::new("cat", 1));

        let updated = store.upsert_increment("cat", 2).await.unwrap();
        assert_eq!(updated.frequency, 3);
        assert_eq!(store.len(), 1);
    }

    #[tokio::test]
    async fn test_memory_list_all() {
        let store = MemoryWordStore::with_records(vec![
            WordRecord::new("b", 2),
            WordRecord::new("a", 1),
            WordRecord::new("b", 3),
        ]);

        let records = sorted(store.list_all().await.unwrap());
        assert_eq!(
            records,
            vec![WordRecord::new("a", 1), WordRecord::new("b", 5)]
        );
    }

    #[tokio::test]
    async fn test_memory_concurrent_upserts_do_not_lose_increments() {
        let store = Arc::new(MemoryWordStore::new());

        let mut handles = Vec::new();
        for _ in 0..16 {
            let store = store.clone();
            handles.push(tokio::spawn(async move {
                for _ in 0..50 {
                    store.upsert_increment("hot", 1).await.unwrap();
                }
            }));
        }
        for handle in handles {
            handle.await.unwrap();
        }

        assert_eq!(store.get("hot"), Some(800));
    }

    // ============================================================
    // FILE STORE TESTS
    // ============================================================

    #[tokio::test]
    async fn test_file_store_missing_file_is_empty() {
        let path = temp_store_path("missing");
        let store = FileWordStore::open(&path).await.unwrap();

        assert!(store.list_all().await.unwrap().is_empty());
        assert!(!path.exists(), "Opening must not create the file");
    }

    #[tokio::test]
    async fn test_file_store_survives_reopen() {
        let path = temp_store_path("reopen");

        {
            let store = FileWordStore::open(&path).await.unwrap();
            store.upsert_increment("apple", 1).await.unwrap();
            store.upsert_increment("apple", 1).await.unwrap();
            store.upsert_increment("app", 1).await.unwrap();
        }

        let reopened = FileWordStore::open(&path).await.unwrap();
        let records = sorted(reopened.list_all().await.unwrap());
        assert_eq!(
            records,
            vec![WordRecord::new("app", 1), WordRecord::new("apple", 2)]
        );

        let _ = std::fs::remove_dir_all(path.parent().unwrap());
    }

    #[tokio::test]
    async fn test_file_store_reads_records_without_frequency() {
        let path = temp_store_path("defaults");
        std::fs::create_dir_all(path.parent().unwrap()).unwrap();
        std::fs::write(&path, r#"[{"word": "one"}, {"word": "two", "frequency": 4}]"#).unwrap();

        let store = FileWordStore::open(&path).await.unwrap();
        let records = sorted(store.list_all().await.unwrap());
        assert_eq!(
            records,
            vec![WordRecord::new("one", 1), WordRecord::new("two", 4)]
        );

        let _ = std::fs::remove_dir_all(path.parent().unwrap());
    }

    #[tokio::test]
    async fn test_file_store_rejects_corrupt_file() {
        let path = temp_store_path("corrupt");
        std::fs::create_dir_all(path.parent().unwrap()).unwrap();
        std::fs::write(&path, "not json").unwrap();

        let result = FileWordStore::open(&path).await;
        assert!(result.is_err());

        let _ = std::fs::remove_dir_all(path.parent().unwrap());
    }

    #[tokio::test]
    async fn test_file_store_failed_write_rolls_back() {
        let path = temp_store_path("rollback");
        let store = FileWordStore::open(&path).await.unwrap();

        // A directory now sits where the file should go, so the final rename fails.
        std::fs::create_dir_all(&path).unwrap();
        std::fs::write(path.join("occupied"), "x").unwrap();

        assert!(store.upsert_increment("ghost", 1).await.is_err());
        assert!(store.list_all().await.unwrap().is_empty());

        let _ = std::fs::remove_dir_all(path.parent().unwrap());
    }

    #[tokio::test]
    async fn test_file_store_abandoned_upsert_lands_exactly_once() {
        let path = temp_store_path("abandoned");
        let store = FileWordStore::open(&path).await.unwrap();

        // The first upsert is polled once, then dropped before it can finish
        tokio::select! {
            biased;
            _ = store.upsert_increment("cat", 1) => panic!("write finished without yielding"),
            _ = std::future::ready(()) => {}
        }

        // Queued behind the abandoned write on the table lock
        let record = store.upsert_increment("cat", 1).await.unwrap();
        assert_eq!(record.frequency, 2);

        let reopened = FileWordStore::open(&path).await.unwrap();
        assert_eq!(
            reopened.list_all().await.unwrap(),
            vec![WordRecord::new("cat", 2)]
        );

        let _ = std::fs::remove_dir_all(path.parent().unwrap());
    }
}
