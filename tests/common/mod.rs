//! Common test utilities and helpers

#![allow(dead_code)]

use async_trait::async_trait;
use axum::{
    body::{to_bytes, Body},
    http::{Request, StatusCode},
    Router,
};
use chrono::NaiveDateTime;
use feedback_analyzer::{
    api::{build_router, AppState},
    FeedbackError, FeedbackService, FeedbackStore, RecordId, Result, SentimentClassifier,
    SentimentLabel, SentimentResult, SqliteFeedbackStore, StoredFeedback,
};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use tempfile::TempDir;
use tower::ServiceExt;

/// Create a SQLite store in a temporary directory
///
/// Keep the returned `TempDir` alive for the duration of the test.
pub async fn create_test_store() -> (Arc<SqliteFeedbackStore>, TempDir) {
    let temp_dir = TempDir::new().expect("Failed to create temp dir");
    let store = SqliteFeedbackStore::open(temp_dir.path().join("feedback.db"))
        .await
        .expect("Failed to create test store");
    (Arc::new(store), temp_dir)
}

/// Labels a text NEGATIVE when it contains any of the trigger words
pub struct StubClassifier {
    triggers: Vec<String>,
    calls: AtomicUsize,
}

impl StubClassifier {
    pub fn negative_on(triggers: &[&str]) -> Self {
        Self {
            triggers: triggers.iter().map(|t| t.to_lowercase()).collect(),
            calls: AtomicUsize::new(0),
        }
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl SentimentClassifier for StubClassifier {
    async fn classify(&self, texts: &[String]) -> Result<Vec<SentimentResult>> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        Ok(texts
            .iter()
            .map(|text| {
                let lowered = text.to_lowercase();
                let label = if self.triggers.iter().any(|t| lowered.contains(t.as_str())) {
                    SentimentLabel::Negative
                } else {
                    SentimentLabel::Positive
                };
                SentimentResult::new(text.clone(), label, 0.99)
            })
            .collect())
    }

    fn model_name(&self) -> &str {
        "stub"
    }
}

/// Always fails, as an unreachable model backend would
pub struct FailingClassifier;

#[async_trait]
impl SentimentClassifier for FailingClassifier {
    async fn classify(&self, _texts: &[String]) -> Result<Vec<SentimentResult>> {
        Err(FeedbackError::Classifier("model backend unavailable".to_string()))
    }

    fn model_name(&self) -> &str {
        "failing"
    }
}

/// Store whose every operation fails, as a locked or missing database would
pub struct UnavailableStore;

impl UnavailableStore {
    fn error() -> FeedbackError {
        FeedbackError::Storage("database is locked".to_string())
    }
}

#[async_trait]
impl FeedbackStore for UnavailableStore {
    async fn append(
        &self,
        _username: &str,
        _text: &str,
        _created_at: NaiveDateTime,
    ) -> Result<RecordId> {
        Err(Self::error())
    }

    async fn append_batch(
        &self,
        _username: &str,
        _texts: &[String],
        _created_at: NaiveDateTime,
    ) -> Result<Vec<RecordId>> {
        Err(Self::error())
    }

    async fn list_by_username(&self, _username: &str) -> Result<Vec<StoredFeedback>> {
        Err(Self::error())
    }
}

/// Build a router over an arbitrary store and classifier
pub fn create_router_with(
    store: Arc<dyn FeedbackStore>,
    classifier: Arc<dyn SentimentClassifier>,
) -> Router {
    build_router(AppState::new(FeedbackService::new(store, classifier)))
}

/// Build a router over a fresh store and the given classifier
pub async fn create_test_router(
    classifier: Arc<dyn SentimentClassifier>,
) -> (Router, Arc<SqliteFeedbackStore>, TempDir) {
    let (store, temp_dir) = create_test_store().await;
    (create_router_with(store.clone(), classifier), store, temp_dir)
}

/// Issue a GET and decode the JSON body
pub async fn get_json(router: &Router, uri: &str) -> (StatusCode, serde_json::Value) {
    let response = router
        .clone()
        .oneshot(
            Request::builder()
                .uri(uri)
                .body(Body::empty())
                .expect("Failed to build request"),
        )
        .await
        .expect("Request failed");

    let status = response.status();
    let bytes = to_bytes(response.into_body(), usize::MAX)
        .await
        .expect("Failed to read body");
    let json = serde_json::from_slice(&bytes).expect("Body is not JSON");
    (status, json)
}
