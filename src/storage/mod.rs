//! Storage layer for generated feedback
//!
//! The store is an append-only log: records are never updated or deleted.

pub mod sqlite;

use crate::error::Result;
use crate::types::{RecordId, StoredFeedback};
use async_trait::async_trait;
use chrono::NaiveDateTime;

pub use sqlite::SqliteFeedbackStore;

/// Storage backend trait defining all required operations
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait FeedbackStore: Send + Sync {
    /// Durably add one feedback record and return its id
    async fn append(
        &self,
        username: &str,
        text: &str,
        created_at: NaiveDateTime,
    ) -> Result<RecordId>;

    /// Add every text of one generation request in a single transaction
    async fn append_batch(
        &self,
        username: &str,
        texts: &[String],
        created_at: NaiveDateTime,
    ) -> Result<Vec<RecordId>>;

    /// All feedback for `username` in insertion order (empty if none)
    async fn list_by_username(&self, username: &str) -> Result<Vec<StoredFeedback>>;
}
