//! Feedback service shared by the HTTP surface and the CLI

use crate::analysis::{AnalysisOutcome, FeedbackAnalyzer};
use crate::error::Result;
use crate::generator::FeedbackGenerator;
use crate::sentiment::SentimentClassifier;
use crate::storage::FeedbackStore;
use crate::types::StoredFeedback;
use chrono::{Local, NaiveDateTime, Timelike};
use std::sync::Arc;
use tracing::info;

/// Generates, stores and analyzes feedback
#[derive(Clone)]
pub struct FeedbackService {
    store: Arc<dyn FeedbackStore>,
    analyzer: FeedbackAnalyzer,
    generator: FeedbackGenerator,
}

impl FeedbackService {
    pub fn new(store: Arc<dyn FeedbackStore>, classifier: Arc<dyn SentimentClassifier>) -> Self {
        Self {
            store,
            analyzer: FeedbackAnalyzer::new(classifier),
            generator: FeedbackGenerator::new(),
        }
    }

    pub fn with_analyzer(mut self, analyzer: FeedbackAnalyzer) -> Self {
        self.analyzer = analyzer;
        self
    }

    /// Name of the model behind the analyzer
    pub fn classifier_name(&self) -> &str {
        self.analyzer.classifier().model_name()
    }

    /// Generate up to ten mock feedback strings and persist them
    ///
    /// Negative counts yield no items.
    pub async fn generate_feedback(&self, username: &str, count: i64) -> Result<Vec<String>> {
        let count = usize::try_from(count).unwrap_or(0);
        let feedback = self.generator.generate(username, count);

        let ids = self
            .store
            .append_batch(username, &feedback, now())
            .await?;
        info!("Stored {} feedback items for '{}'", ids.len(), username);

        Ok(feedback)
    }

    /// Everything stored for `username`, oldest first
    pub async fn stored_feedback(&self, username: &str) -> Result<Vec<StoredFeedback>> {
        self.store.list_by_username(username).await
    }

    /// Run the analysis pipeline over everything stored for `username`
    pub async fn analyze(&self, username: &str) -> Result<AnalysisOutcome> {
        let texts: Vec<String> = self
            .store
            .list_by_username(username)
            .await?
            .into_iter()
            .map(|record| record.text)
            .collect();

        self.analyzer.analyze(username, &texts).await
    }
}

/// Local wall-clock time truncated to whole seconds
fn now() -> NaiveDateTime {
    let now = Local::now().naive_local();
    now.with_nanosecond(0).unwrap_or(now)
}
