//! Feedback Analyzer - mock customer feedback with basic text analytics
//!
//! Generates template-based feedback for a username, persists it in SQLite and
//! analyzes everything stored for that user:
//! - Sentiment classification through a pre-trained model
//! - Keyword frequency with stop-word and username filtering
//! - Suggestion "insights" for keywords that appear in negative feedback
//!
//! # Architecture
//!
//! - **Types**: Core data structures (FeedbackRecord, SentimentResult, etc.)
//! - **Storage**: Append-only SQLite feedback store
//! - **Sentiment**: Pluggable classifier backends (remote, local, lexicon)
//! - **Analysis**: Keyword extraction and insight synthesis
//! - **Service**: Generation, retrieval and analysis pipeline
//! - **API**: axum HTTP surface
//!
//! # Example
//!
//! ```ignore
//! use feedback_analyzer::{FeedbackService, LexiconSentimentClassifier, SqliteFeedbackStore};
//! use std::sync::Arc;
//!
//! #[tokio::main]
//! async fn main() -> feedback_analyzer::Result<()> {
//!     let store = SqliteFeedbackStore::open("feedback.db").await?;
//!     let service = FeedbackService::new(
//!         Arc::new(store),
//!         Arc::new(LexiconSentimentClassifier::new()),
//!     );
//!
//!     service.generate_feedback("alice", 5).await?;
//!     let outcome = service.analyze("alice").await?;
//!     println!("{:?}", outcome);
//!     Ok(())
//! }
//! ```

pub mod analysis;
pub mod api;
pub mod config;
pub mod error;
pub mod generator;
pub mod sentiment;
pub mod service;
pub mod storage;
pub mod types;

// Re-export commonly used types
pub use analysis::{AnalysisOutcome, AnalysisReport, FeedbackAnalyzer};
pub use config::{AppConfig, ClassifierBackend, ClassifierConfig};
pub use error::{FeedbackError, Result};
pub use generator::FeedbackGenerator;
pub use sentiment::{
    build_classifier, LexiconSentimentClassifier, RemoteSentimentClassifier, SentimentClassifier,
};
pub use service::FeedbackService;
pub use storage::{FeedbackStore, SqliteFeedbackStore};
pub use types::{
    FeedbackRecord, Insight, KeywordCount, RecordId, SentimentLabel, SentimentResult,
    StoredFeedback,
};
