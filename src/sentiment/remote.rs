//! Remote sentiment classification using the Hugging Face Inference API
//!
//! Sends one batched text-classification request per call and picks the
//! highest-scoring label for every input.

use crate::config::ClassifierConfig;
use crate::error::{FeedbackError, Result};
use crate::sentiment::SentimentClassifier;
use crate::types::{SentimentLabel, SentimentResult};
use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::debug;

/// Hugging Face text-classification client
pub struct RemoteSentimentClassifier {
    client: Client,
    api_token: Option<String>,
    model: String,
    base_url: String,
}

/// Inference API request structure
#[derive(Debug, Serialize)]
struct ClassificationRequest<'a> {
    inputs: &'a [String],
}

#[derive(Debug, Clone, Deserialize)]
struct LabelScore {
    label: String,
    score: f32,
}

/// Inference API response structure
///
/// Batched requests return one list of label scores per input; some
/// deployments return a single top label per input instead.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum ClassificationResponse {
    Nested(Vec<Vec<LabelScore>>),
    Flat(Vec<LabelScore>),
}

/// API error response
#[derive(Debug, Deserialize)]
struct ErrorResponse {
    error: Option<String>,
}

impl RemoteSentimentClassifier {
    /// Create a new remote classifier from configuration
    pub fn new(config: &ClassifierConfig) -> Result<Self> {
        if config.model.is_empty() {
            return Err(FeedbackError::Validation(
                "Model name cannot be empty".to_string(),
            ));
        }

        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| FeedbackError::Classifier(format!("Failed to build HTTP client: {}", e)))?;

        Ok(Self {
            client,
            api_token: config.api_token.clone().filter(|t| !t.is_empty()),
            model: config.model.clone(),
            base_url: config.base_url.trim_end_matches('/').to_string(),
        })
    }

    fn endpoint(&self) -> String {
        format!("{}/models/{}", self.base_url, self.model)
    }

    /// Call the Inference API once
    async fn call_api(&self, texts: &[String]) -> Result<ClassificationResponse> {
        debug!(
            "Calling inference API: {} texts, model: {}",
            texts.len(),
            self.model
        );

        let mut request = self
            .client
            .post(self.endpoint())
            .json(&ClassificationRequest { inputs: texts });

        if let Some(token) = &self.api_token {
            request = request.bearer_auth(token);
        }

        let response = request
            .send()
            .await
            .map_err(|e| FeedbackError::Classifier(format!("Request failed: {}", e)))?;

        let status = response.status();

        match status {
            StatusCode::OK => response
                .json::<ClassificationResponse>()
                .await
                .map_err(|e| FeedbackError::Classifier(format!("Invalid response body: {}", e))),
            StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => Err(FeedbackError::Classifier(
                "Invalid or missing API token".to_string(),
            )),
            _ => {
                let error_text = response
                    .text()
                    .await
                    .unwrap_or_else(|_| "Unknown error".to_string());
                let message = serde_json::from_str::<ErrorResponse>(&error_text)
                    .ok()
                    .and_then(|e| e.error)
                    .unwrap_or(error_text);

                Err(FeedbackError::Classifier(format!(
                    "API error (status {}): {}",
                    status, message
                )))
            }
        }
    }
}

/// Turn an API response into one result per input text
fn into_results(texts: &[String], response: ClassificationResponse) -> Result<Vec<SentimentResult>> {
    let best: Vec<LabelScore> = match response {
        ClassificationResponse::Nested(per_input) => per_input
            .into_iter()
            .map(|scores| {
                scores
                    .into_iter()
                    .max_by(|a, b| a.score.total_cmp(&b.score))
                    .ok_or_else(|| FeedbackError::Classifier("Empty label list".to_string()))
            })
            .collect::<Result<_>>()?,
        // A single input may come back as every label score for that input
        ClassificationResponse::Flat(scores) if texts.len() == 1 && scores.len() > 1 => scores
            .into_iter()
            .max_by(|a, b| a.score.total_cmp(&b.score))
            .into_iter()
            .collect(),
        ClassificationResponse::Flat(top) => top,
    };

    if best.len() != texts.len() {
        return Err(FeedbackError::Classifier(format!(
            "Classifier returned {} results for {} texts",
            best.len(),
            texts.len()
        )));
    }

    texts
        .iter()
        .zip(best)
        .map(|(text, scored)| {
            let label = SentimentLabel::from_model_label(&scored.label).ok_or_else(|| {
                FeedbackError::Classifier(format!("Unexpected label '{}'", scored.label))
            })?;
            Ok(SentimentResult::new(text.clone(), label, scored.score))
        })
        .collect()
}

#[async_trait]
impl SentimentClassifier for RemoteSentimentClassifier {
    async fn classify(&self, texts: &[String]) -> Result<Vec<SentimentResult>> {
        if texts.is_empty() {
            return Ok(Vec::new());
        }

        let response = self.call_api(texts).await?;
        let results = into_results(texts, response)?;

        debug!("Classified {} texts", results.len());
        Ok(results)
    }

    fn model_name(&self) -> &str {
        &self.model
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn texts(items: &[&str]) -> Vec<String> {
        items.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_nested_response_picks_best_label() {
        let body = r#"[
            [{"label": "NEGATIVE", "score": 0.98}, {"label": "POSITIVE", "score": 0.02}],
            [{"label": "POSITIVE", "score": 0.91}, {"label": "NEGATIVE", "score": 0.09}]
        ]"#;
        let response: ClassificationResponse = serde_json::from_str(body).unwrap();

        let results = into_results(&texts(&["so slow", "love it"]), response).unwrap();

        assert_eq!(results.len(), 2);
        assert_eq!(results[0].text, "so slow");
        assert_eq!(results[0].label, SentimentLabel::Negative);
        assert!((results[0].confidence - 0.98).abs() < 1e-6);
        assert_eq!(results[1].label, SentimentLabel::Positive);
    }

    #[test]
    fn test_flat_response() {
        let body = r#"[{"label": "LABEL_1", "score": 0.7}, {"label": "LABEL_0", "score": 0.6}]"#;
        let response: ClassificationResponse = serde_json::from_str(body).unwrap();

        let results = into_results(&texts(&["a", "b"]), response).unwrap();

        assert_eq!(results[0].label, SentimentLabel::Positive);
        assert_eq!(results[1].label, SentimentLabel::Negative);
    }

    #[test]
    fn test_flat_scores_for_single_input() {
        let body = r#"[{"label": "POSITIVE", "score": 0.12}, {"label": "NEGATIVE", "score": 0.88}]"#;
        let response: ClassificationResponse = serde_json::from_str(body).unwrap();

        let results = into_results(&texts(&["so slow"]), response).unwrap();

        assert_eq!(results.len(), 1);
        assert_eq!(results[0].label, SentimentLabel::Negative);
        assert!((results[0].confidence - 0.88).abs() < 1e-6);
    }

    #[test]
    fn test_length_mismatch_is_error() {
        let body = r#"[[{"label": "POSITIVE", "score": 0.9}]]"#;
        let response: ClassificationResponse = serde_json::from_str(body).unwrap();

        let result = into_results(&texts(&["a", "b"]), response);
        assert!(matches!(result, Err(FeedbackError::Classifier(_))));
    }

    #[test]
    fn test_unknown_label_is_error() {
        let body = r#"[[{"label": "NEUTRAL", "score": 0.9}]]"#;
        let response: ClassificationResponse = serde_json::from_str(body).unwrap();

        let result = into_results(&texts(&["a"]), response);
        assert!(matches!(result, Err(FeedbackError::Classifier(_))));
    }

    #[test]
    fn test_endpoint_and_token() {
        let config = ClassifierConfig {
            base_url: "http://localhost:9000/".to_string(),
            model: "my/model".to_string(),
            api_token: Some(String::new()),
            ..ClassifierConfig::default()
        };

        let classifier = RemoteSentimentClassifier::new(&config).unwrap();
        assert_eq!(classifier.endpoint(), "http://localhost:9000/models/my/model");
        assert!(classifier.api_token.is_none());
    }

    #[tokio::test]
    async fn test_empty_batch_skips_request() {
        let config = ClassifierConfig {
            base_url: "http://127.0.0.1:1".to_string(),
            ..ClassifierConfig::default()
        };
        let classifier = RemoteSentimentClassifier::new(&config).unwrap();

        let results = classifier.classify(&[]).await.unwrap();
        assert!(results.is_empty());
    }

    #[tokio::test]
    async fn test_unreachable_backend_is_classifier_error() {
        let config = ClassifierConfig {
            base_url: "http://127.0.0.1:1".to_string(),
            timeout_secs: 2,
            ..ClassifierConfig::default()
        };
        let classifier = RemoteSentimentClassifier::new(&config).unwrap();

        let result = classifier.classify(&texts(&["hello"])).await;
        assert!(matches!(result, Err(FeedbackError::Classifier(_))));
    }
}
