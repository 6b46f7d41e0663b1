//! Local sentiment classification using fastembed
//!
//! Runs a pre-trained sentence-embedding model in-process with ONNX Runtime
//! and labels each text by its similarity to positive and negative anchor
//! sentences. Models are downloaded on first use to the cache directory.

use crate::config::ClassifierConfig;
use crate::error::{FeedbackError, Result};
use crate::sentiment::{ensure_aligned, SentimentClassifier};
use crate::types::{SentimentLabel, SentimentResult};
use async_trait::async_trait;
use fastembed::{EmbeddingModel, InitOptions, TextEmbedding};
use std::sync::{Arc, Mutex};
use tokio::task;
use tracing::{debug, info};

const POSITIVE_ANCHORS: &[&str] = &[
    "I love this, great job and amazing service.",
    "Thank you, this is the best experience I have had.",
    "Fast, helpful and wonderful. Very happy customer.",
];

const NEGATIVE_ANCHORS: &[&str] = &[
    "This is terrible, I hate it and it keeps breaking.",
    "Awful experience, far too slow and too expensive.",
    "The app crashed again, very disappointed customer.",
];

/// Sharpens the softmax over mean anchor similarities
const SIMILARITY_TEMPERATURE: f32 = 0.05;

/// Local embedding-similarity sentiment classifier
pub struct LocalSentimentClassifier {
    /// The underlying fastembed model (wrapped in Arc<Mutex> for thread-safe interior mutability)
    model: Arc<Mutex<TextEmbedding>>,
    model_name: String,
    positive_anchors: Vec<Vec<f32>>,
    negative_anchors: Vec<Vec<f32>>,
}

impl LocalSentimentClassifier {
    /// Load the configured model and embed the anchor sentences
    ///
    /// May download the model if it is not cached yet.
    pub async fn new(config: &ClassifierConfig) -> Result<Self> {
        let model_name = config.resolved_model().to_string();
        info!(
            "Initializing local sentiment model: model={}, cache={:?}",
            model_name, config.cache_dir
        );

        let mut init_options = InitOptions::default();
        init_options.model_name = Self::model_name_to_enum(&model_name)?;
        init_options.show_download_progress = false;
        if let Some(cache_dir) = &config.cache_dir {
            init_options.cache_dir = cache_dir.clone();
        }

        let model = task::spawn_blocking(move || TextEmbedding::try_new(init_options))
            .await
            .map_err(|e| FeedbackError::Other(format!("Task join error: {}", e)))?
            .map_err(|e| FeedbackError::Classifier(format!("Failed to load model: {}", e)))?;
        let model = Arc::new(Mutex::new(model));

        let positive_anchors = embed_blocking(&model, owned(POSITIVE_ANCHORS)).await?;
        let negative_anchors = embed_blocking(&model, owned(NEGATIVE_ANCHORS)).await?;

        info!("Local sentiment model ready");

        Ok(Self {
            model,
            model_name,
            positive_anchors,
            negative_anchors,
        })
    }

    /// Map model name string to fastembed's EmbeddingModel enum
    fn model_name_to_enum(model_name: &str) -> Result<EmbeddingModel> {
        match model_name {
            "all-MiniLM-L6-v2" => Ok(EmbeddingModel::AllMiniLML6V2),
            "all-MiniLM-L12-v2" => Ok(EmbeddingModel::AllMiniLML12V2),
            "bge-small-en-v1.5" => Ok(EmbeddingModel::BGESmallENV15),
            "bge-base-en-v1.5" => Ok(EmbeddingModel::BGEBaseENV15),
            "nomic-embed-text-v1.5" => Ok(EmbeddingModel::NomicEmbedTextV15),
            _ => Err(FeedbackError::Config(config::ConfigError::Message(format!(
                "Unsupported local model: '{}'",
                model_name
            )))),
        }
    }
}

fn owned(items: &[&str]) -> Vec<String> {
    items.iter().map(|s| s.to_string()).collect()
}

/// Embed texts on a blocking thread (fastembed is synchronous)
async fn embed_blocking(
    model: &Arc<Mutex<TextEmbedding>>,
    texts: Vec<String>,
) -> Result<Vec<Vec<f32>>> {
    let model = Arc::clone(model);

    task::spawn_blocking(move || {
        let mut model_guard = model
            .lock()
            .map_err(|e| format!("Mutex lock failed: {}", e))?;

        model_guard
            .embed(texts, None)
            .map_err(|e| format!("Embedding generation failed: {}", e))
    })
    .await
    .map_err(|e| FeedbackError::Other(format!("Task join error: {}", e)))?
    .map_err(FeedbackError::Classifier)
}

/// Calculate cosine similarity between two vectors
fn cosine_similarity(a: &[f32], b: &[f32]) -> f32 {
    if a.len() != b.len() {
        return 0.0;
    }

    let dot_product: f32 = a.iter().zip(b.iter()).map(|(x, y)| x * y).sum();
    let magnitude_a: f32 = a.iter().map(|x| x * x).sum::<f32>().sqrt();
    let magnitude_b: f32 = b.iter().map(|x| x * x).sum::<f32>().sqrt();

    if magnitude_a == 0.0 || magnitude_b == 0.0 {
        return 0.0;
    }

    dot_product / (magnitude_a * magnitude_b)
}

fn mean_similarity(embedding: &[f32], anchors: &[Vec<f32>]) -> f32 {
    if anchors.is_empty() {
        return 0.0;
    }
    anchors
        .iter()
        .map(|anchor| cosine_similarity(embedding, anchor))
        .sum::<f32>()
        / anchors.len() as f32
}

/// Two-class softmax over anchor similarities
fn label_from_similarities(positive: f32, negative: f32) -> (SentimentLabel, f32) {
    let p_negative = 1.0 / (1.0 + ((positive - negative) / SIMILARITY_TEMPERATURE).exp());
    if p_negative > 0.5 {
        (SentimentLabel::Negative, p_negative)
    } else {
        (SentimentLabel::Positive, 1.0 - p_negative)
    }
}

#[async_trait]
impl SentimentClassifier for LocalSentimentClassifier {
    async fn classify(&self, texts: &[String]) -> Result<Vec<SentimentResult>> {
        if texts.is_empty() {
            return Ok(Vec::new());
        }

        debug!("Classifying batch of {} texts locally", texts.len());
        let embeddings = embed_blocking(&self.model, texts.to_vec()).await?;

        let results: Vec<SentimentResult> = texts
            .iter()
            .zip(&embeddings)
            .map(|(text, embedding)| {
                let positive = mean_similarity(embedding, &self.positive_anchors);
                let negative = mean_similarity(embedding, &self.negative_anchors);
                let (label, confidence) = label_from_similarities(positive, negative);
                SentimentResult::new(text.clone(), label, confidence)
            })
            .collect();

        ensure_aligned(texts.len(), &results)?;
        Ok(results)
    }

    fn model_name(&self) -> &str {
        &self.model_name
    }
}
