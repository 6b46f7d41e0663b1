//! Feedback analysis pipeline
//!
//! Stored texts → sentiment classification → keyword frequency → insights.
//! A user with no stored feedback short-circuits before the classifier runs.

pub mod insights;
pub mod keywords;

pub use insights::{rank_insights, synthesize, SuggestionTable, DEFAULT_INSIGHT_LIMIT};
pub use keywords::{extract_top_keywords, DEFAULT_KEYWORD_LIMIT};

use crate::error::Result;
use crate::sentiment::{ensure_aligned, SentimentClassifier};
use crate::types::{KeywordCount, SentimentResult};
use serde::Serialize;
use std::collections::HashSet;
use std::sync::Arc;
use tracing::{debug, info};

/// Full analysis of one user's feedback
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct AnalysisReport {
    pub sentiment_analysis: Vec<SentimentResult>,
    pub keywords: Vec<KeywordCount>,
    pub insights: Vec<String>,
}

/// Result of analyzing a user
#[derive(Debug, Clone, PartialEq)]
pub enum AnalysisOutcome {
    /// Nothing stored for the user
    NoFeedback,
    Report(AnalysisReport),
}

/// Runs the classifier, keyword and insight stages over a batch of texts
#[derive(Clone)]
pub struct FeedbackAnalyzer {
    classifier: Arc<dyn SentimentClassifier>,
    suggestions: SuggestionTable,
    keyword_limit: usize,
    insight_limit: usize,
}

impl FeedbackAnalyzer {
    pub fn new(classifier: Arc<dyn SentimentClassifier>) -> Self {
        Self {
            classifier,
            suggestions: SuggestionTable::default(),
            keyword_limit: DEFAULT_KEYWORD_LIMIT,
            insight_limit: DEFAULT_INSIGHT_LIMIT,
        }
    }

    /// Replace the built-in suggestion table
    pub fn with_suggestions(mut self, suggestions: SuggestionTable) -> Self {
        self.suggestions = suggestions;
        self
    }

    pub fn with_limits(mut self, keyword_limit: usize, insight_limit: usize) -> Self {
        self.keyword_limit = keyword_limit;
        self.insight_limit = insight_limit;
        self
    }

    pub fn classifier(&self) -> &Arc<dyn SentimentClassifier> {
        &self.classifier
    }

    /// Analyze `texts` stored for `username`
    ///
    /// All texts are classified in a single call. Classifier failures
    /// propagate; there is no partial report.
    pub async fn analyze(&self, username: &str, texts: &[String]) -> Result<AnalysisOutcome> {
        if texts.is_empty() {
            debug!("No feedback stored for '{}', skipping analysis", username);
            return Ok(AnalysisOutcome::NoFeedback);
        }

        info!(
            "Analyzing {} feedback items for '{}' with {}",
            texts.len(),
            username,
            self.classifier.model_name()
        );

        let sentiment_analysis = self.classifier.classify(texts).await?;
        ensure_aligned(texts.len(), &sentiment_analysis)?;

        let exclude: HashSet<String> = [username.to_string()].into_iter().collect();
        let keywords = extract_top_keywords(texts, &exclude, self.keyword_limit);
        let insights = synthesize(
            &keywords,
            &sentiment_analysis,
            &self.suggestions,
            self.insight_limit,
        );

        Ok(AnalysisOutcome::Report(AnalysisReport {
            sentiment_analysis,
            keywords,
            insights,
        }))
    }
}
