//! SQLite storage backend
//!
//! Uses rusqlite behind a deadpool connection pool. Each operation checks a
//! connection out of the pool, runs on the pool's blocking thread via
//! `interact`, and returns the connection when the guard is dropped.

use crate::error::{FeedbackError, Result};
use crate::storage::FeedbackStore;
use crate::types::{FeedbackRecord, RecordId, StoredFeedback, TIMESTAMP_FORMAT};
use async_trait::async_trait;
use chrono::NaiveDateTime;
use deadpool_sqlite::{Config, Pool, PoolConfig, Runtime};
use rusqlite::OptionalExtension;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

/// Default connection pool size
const DEFAULT_POOL_SIZE: usize = 4;

const CREATE_SCHEMA: &str = "
CREATE TABLE IF NOT EXISTS feedback (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    username TEXT NOT NULL,
    text TEXT NOT NULL,
    created_at TEXT NOT NULL
);
CREATE INDEX IF NOT EXISTS idx_feedback_username ON feedback (username);
";

/// SQLite-backed feedback store
pub struct SqliteFeedbackStore {
    pool: Pool,
    db_path: PathBuf,
}

impl SqliteFeedbackStore {
    /// Open the store at `db_path` and make sure the schema exists
    ///
    /// # Example
    /// ```ignore
    /// let store = SqliteFeedbackStore::open("feedback.db").await?;
    /// ```
    pub async fn open<P: AsRef<Path>>(db_path: P) -> Result<Self> {
        Self::open_with_pool_size(db_path, DEFAULT_POOL_SIZE).await
    }

    /// Open the store with a custom pool size
    pub async fn open_with_pool_size<P: AsRef<Path>>(db_path: P, pool_size: usize) -> Result<Self> {
        let db_path = db_path.as_ref().to_path_buf();
        info!(
            "Opening feedback store at: {} (pool_size: {})",
            db_path.display(),
            pool_size
        );

        if let Some(parent) = db_path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)?;
            }
        }

        let mut config = Config::new(db_path.clone());
        config.pool = Some(PoolConfig::new(pool_size.max(1)));
        let pool = config.create_pool(Runtime::Tokio1).map_err(|e| {
            FeedbackError::Storage(format!("Failed to create connection pool: {}", e))
        })?;

        let store = Self { pool, db_path };
        store.init_schema().await?;

        Ok(store)
    }

    /// Path of the underlying database file
    pub fn db_path(&self) -> &Path {
        &self.db_path
    }

    /// Create the feedback table if it is missing
    ///
    /// Safe to call multiple times (uses IF NOT EXISTS).
    pub async fn init_schema(&self) -> Result<()> {
        let conn = self.pool.get().await?;

        conn.interact(|conn| conn.execute_batch(CREATE_SCHEMA))
            .await??;

        debug!("Feedback schema ready");
        Ok(())
    }

    /// Total number of stored records
    pub async fn count(&self) -> Result<usize> {
        let conn = self.pool.get().await?;

        let count: i64 = conn
            .interact(|conn| conn.query_row("SELECT COUNT(*) FROM feedback", [], |row| row.get(0)))
            .await??;

        Ok(count as usize)
    }

    /// Fetch one record by id
    pub async fn get(&self, id: RecordId) -> Result<Option<FeedbackRecord>> {
        let conn = self.pool.get().await?;

        let row = conn
            .interact(move |conn| {
                conn.query_row(
                    "SELECT id, username, text, created_at FROM feedback WHERE id = ?1",
                    rusqlite::params![id],
                    |row| {
                        Ok((
                            row.get::<_, RecordId>(0)?,
                            row.get::<_, String>(1)?,
                            row.get::<_, String>(2)?,
                            row.get::<_, String>(3)?,
                        ))
                    },
                )
                .optional()
            })
            .await??;

        row.map(|(id, username, text, created_at)| {
            Ok(FeedbackRecord {
                id,
                username,
                text,
                created_at: parse_timestamp(&created_at)?,
            })
        })
        .transpose()
    }
}

fn parse_timestamp(raw: &str) -> Result<NaiveDateTime> {
    NaiveDateTime::parse_from_str(raw, TIMESTAMP_FORMAT).map_err(|e| {
        FeedbackError::Storage(format!(
            "Invalid timestamp '{}' in feedback table: {}",
            raw, e
        ))
    })
}

fn format_timestamp(created_at: NaiveDateTime) -> String {
    created_at.format(TIMESTAMP_FORMAT).to_string()
}

fn validate_record(username: &str, text: &str) -> Result<()> {
    if username.is_empty() {
        return Err(FeedbackError::Validation(
            "Username cannot be empty".to_string(),
        ));
    }
    if text.is_empty() {
        return Err(FeedbackError::Validation(
            "Feedback text cannot be empty".to_string(),
        ));
    }
    Ok(())
}

#[async_trait]
impl FeedbackStore for SqliteFeedbackStore {
    async fn append(
        &self,
        username: &str,
        text: &str,
        created_at: NaiveDateTime,
    ) -> Result<RecordId> {
        validate_record(username, text)?;

        let username = username.to_string();
        let text = text.to_string();
        let created_at = format_timestamp(created_at);

        let conn = self.pool.get().await?;
        let id = conn
            .interact(move |conn| -> rusqlite::Result<RecordId> {
                conn.execute(
                    "INSERT INTO feedback (username, text, created_at) VALUES (?1, ?2, ?3)",
                    rusqlite::params![username, text, created_at],
                )?;
                Ok(conn.last_insert_rowid())
            })
            .await??;

        debug!("Stored feedback record {}", id);
        Ok(id)
    }

    async fn append_batch(
        &self,
        username: &str,
        texts: &[String],
        created_at: NaiveDateTime,
    ) -> Result<Vec<RecordId>> {
        if texts.is_empty() {
            return Ok(Vec::new());
        }
        for text in texts {
            validate_record(username, text)?;
        }

        let username = username.to_string();
        let texts = texts.to_vec();
        let created_at = format_timestamp(created_at);

        let conn = self.pool.get().await?;
        let ids = conn
            .interact(move |conn| -> rusqlite::Result<Vec<RecordId>> {
                let tx = conn.transaction()?;
                let mut ids = Vec::with_capacity(texts.len());
                {
                    let mut stmt = tx.prepare(
                        "INSERT INTO feedback (username, text, created_at) VALUES (?1, ?2, ?3)",
                    )?;
                    for text in &texts {
                        stmt.execute(rusqlite::params![username, text, created_at])?;
                        ids.push(tx.last_insert_rowid());
                    }
                }
                tx.commit()?;
                Ok(ids)
            })
            .await??;

        info!("Stored {} feedback records", ids.len());
        Ok(ids)
    }

    async fn list_by_username(&self, username: &str) -> Result<Vec<StoredFeedback>> {
        debug!("Listing feedback for '{}'", username);

        let username = username.to_string();
        let conn = self.pool.get().await?;

        let rows = conn
            .interact(move |conn| -> rusqlite::Result<Vec<(String, String)>> {
                let mut stmt = conn.prepare(
                    "SELECT text, created_at FROM feedback WHERE username = ?1 ORDER BY id",
                )?;
                let rows = stmt
                    .query_map(rusqlite::params![username], |row| {
                        Ok((row.get(0)?, row.get(1)?))
                    })?
                    .collect::<rusqlite::Result<Vec<_>>>()?;
                Ok(rows)
            })
            .await??;

        rows.into_iter()
            .map(|(text, created_at)| {
                Ok(StoredFeedback {
                    text,
                    created_at: parse_timestamp(&created_at)?,
                })
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use tempfile::TempDir;

    async fn create_test_store() -> (SqliteFeedbackStore, TempDir) {
        let temp_dir = TempDir::new().unwrap();
        let db_path = temp_dir.path().join("test.db");
        let store = SqliteFeedbackStore::open(db_path).await.unwrap();
        (store, temp_dir)
    }

    fn at(hour: u32, minute: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2024, 5, 1)
            .unwrap()
            .and_hms_opt(hour, minute, 0)
            .unwrap()
    }

    #[tokio::test]
    async fn test_append_and_list_in_insertion_order() {
        let (store, _temp) = create_test_store().await;

        let first = store.append("alice", "first", at(10, 0)).await.unwrap();
        let second = store.append("alice", "second", at(9, 0)).await.unwrap();
        store.append("bob", "other user", at(11, 0)).await.unwrap();
        let third = store.append("alice", "third", at(12, 0)).await.unwrap();

        assert!(first < second && second < third);

        let listed = store.list_by_username("alice").await.unwrap();
        let texts: Vec<_> = listed.iter().map(|f| f.text.as_str()).collect();
        assert_eq!(texts, vec!["first", "second", "third"]);
        assert_eq!(listed[1].created_at, at(9, 0));
    }

    #[tokio::test]
    async fn test_get_record_by_id() {
        let (store, _temp) = create_test_store().await;

        let id = store.append("erin", "hello", at(14, 5)).await.unwrap();
        let record = store.get(id).await.unwrap().unwrap();

        assert_eq!(record.id, id);
        assert_eq!(record.username, "erin");
        assert_eq!(record.text, "hello");
        assert_eq!(record.created_at, at(14, 5));
        assert!(store.get(id + 100).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_unknown_user_is_empty() {
        let (store, _temp) = create_test_store().await;

        let listed = store.list_by_username("nobody").await.unwrap();
        assert!(listed.is_empty());
    }

    #[tokio::test]
    async fn test_username_match_is_exact() {
        let (store, _temp) = create_test_store().await;
        store.append("Alice", "capitalised", at(8, 0)).await.unwrap();

        assert!(store.list_by_username("alice").await.unwrap().is_empty());
        assert_eq!(store.list_by_username("Alice").await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_append_batch() {
        let (store, _temp) = create_test_store().await;
        let texts = vec!["one".to_string(), "two".to_string(), "three".to_string()];

        let ids = store.append_batch("carol", &texts, at(7, 30)).await.unwrap();
        assert_eq!(ids.len(), 3);
        assert!(ids.windows(2).all(|w| w[0] < w[1]));

        let listed = store.list_by_username("carol").await.unwrap();
        let listed_texts: Vec<_> = listed.into_iter().map(|f| f.text).collect();
        assert_eq!(listed_texts, texts);
        assert_eq!(store.count().await.unwrap(), 3);
    }

    #[tokio::test]
    async fn test_empty_batch_is_noop() {
        let (store, _temp) = create_test_store().await;

        let ids = store.append_batch("carol", &[], at(7, 30)).await.unwrap();
        assert!(ids.is_empty());
        assert_eq!(store.count().await.unwrap(), 0);
    }

    #[tokio::test]
    async fn test_empty_text_rejected() {
        let (store, _temp) = create_test_store().await;

        let result = store.append("alice", "", at(7, 0)).await;
        assert!(matches!(result, Err(FeedbackError::Validation(_))));

        let result = store.append("", "text", at(7, 0)).await;
        assert!(matches!(result, Err(FeedbackError::Validation(_))));
    }

    #[tokio::test]
    async fn test_schema_init_is_idempotent_and_data_persists() {
        let temp_dir = TempDir::new().unwrap();
        let db_path = temp_dir.path().join("persist.db");

        {
            let store = SqliteFeedbackStore::open(&db_path).await.unwrap();
            store.append("dave", "kept", at(6, 0)).await.unwrap();
            store.init_schema().await.unwrap();
        }

        let reopened = SqliteFeedbackStore::open(&db_path).await.unwrap();
        let listed = reopened.list_by_username("dave").await.unwrap();
        assert_eq!(listed.len(), 1);
        assert_eq!(listed[0].text, "kept");
    }

    #[tokio::test]
    async fn test_unopenable_database_is_storage_error() {
        let temp_dir = TempDir::new().unwrap();

        // a directory cannot be opened as a database file
        let result = SqliteFeedbackStore::open(temp_dir.path()).await;

        match result {
            Err(FeedbackError::Storage(message)) => {
                assert!(message.contains("unable to open database file"), "{}", message)
            }
            Err(other) => panic!("expected a storage error, got {}", other),
            Ok(_) => panic!("expected opening a directory to fail"),
        }
    }

    #[tokio::test]
    async fn test_open_creates_parent_directory() {
        let temp_dir = TempDir::new().unwrap();
        let db_path = temp_dir.path().join("nested").join("dir").join("feedback.db");

        let store = SqliteFeedbackStore::open(&db_path).await.unwrap();
        assert_eq!(store.db_path(), db_path.as_path());
        assert!(db_path.parent().unwrap().exists());
    }
}
