//! Sentiment classification services
//!
//! The analysis pipeline only depends on the batch [`SentimentClassifier`]
//! contract. Backends:
//! - [`RemoteSentimentClassifier`]: Hugging Face Inference API
//! - `LocalSentimentClassifier`: in-process ONNX model via fastembed
//!   (requires the `local-model` feature)
//! - [`LexiconSentimentClassifier`]: word-list scorer for offline use

pub mod lexicon;
#[cfg(feature = "local-model")]
pub mod local;
pub mod remote;

use crate::config::{ClassifierBackend, ClassifierConfig};
use crate::error::{FeedbackError, Result};
use crate::types::SentimentResult;
use async_trait::async_trait;
use std::sync::Arc;
use tracing::info;

pub use lexicon::LexiconSentimentClassifier;
#[cfg(feature = "local-model")]
pub use local::LocalSentimentClassifier;
pub use remote::RemoteSentimentClassifier;

/// Sentiment classifier trait defining required operations
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait SentimentClassifier: Send + Sync {
    /// Classify a batch of texts
    ///
    /// The result has the same length and order as `texts`.
    async fn classify(&self, texts: &[String]) -> Result<Vec<SentimentResult>>;

    /// Get model name
    fn model_name(&self) -> &str;
}

/// Construct the classifier selected by configuration
pub async fn build_classifier(config: &ClassifierConfig) -> Result<Arc<dyn SentimentClassifier>> {
    info!(
        "Initializing sentiment classifier: backend={}, model={}",
        config.backend,
        config.resolved_model()
    );

    match config.backend {
        ClassifierBackend::Remote => Ok(Arc::new(RemoteSentimentClassifier::new(config)?)),
        ClassifierBackend::Lexicon => Ok(Arc::new(LexiconSentimentClassifier::new())),
        #[cfg(feature = "local-model")]
        ClassifierBackend::Local => Ok(Arc::new(LocalSentimentClassifier::new(config).await?)),
        #[cfg(not(feature = "local-model"))]
        ClassifierBackend::Local => Err(FeedbackError::Classifier(
            "Local backend requires building with the `local-model` feature".to_string(),
        )),
    }
}

/// Check that a backend returned exactly one result per input
pub(crate) fn ensure_aligned(expected: usize, results: &[SentimentResult]) -> Result<()> {
    if results.len() != expected {
        return Err(FeedbackError::Classifier(format!(
            "Classifier returned {} results for {} texts",
            results.len(),
            expected
        )));
    }
    Ok(())
}
