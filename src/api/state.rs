//! Shared handler state and response bodies

use crate::analysis::{AnalysisOutcome, AnalysisReport};
use crate::error::FeedbackError;
use crate::service::FeedbackService;
use crate::types::StoredFeedback;
use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::{error, warn};

/// Message returned by `/analyze` when nothing is stored
pub const NO_FEEDBACK_MESSAGE: &str = "No feedback found";

/// Handler state
#[derive(Clone)]
pub struct AppState {
    pub service: Arc<FeedbackService>,
}

impl AppState {
    pub fn new(service: FeedbackService) -> Self {
        Self {
            service: Arc::new(service),
        }
    }
}

/// `/feedback/{username}` body
#[derive(Debug, Serialize, Deserialize)]
pub struct FeedbackResponse {
    pub username: String,
    pub feedback: Vec<String>,
}

/// `/stored-feedback/{username}` body
#[derive(Debug, Serialize, Deserialize)]
pub struct StoredFeedbackResponse {
    pub username: String,
    pub feedback: Vec<StoredFeedback>,
}

/// `/analyze/{username}` body
#[derive(Debug, Serialize)]
#[serde(untagged)]
pub enum AnalyzeResponse {
    Empty {
        username: String,
        analysis: &'static str,
    },
    Report {
        username: String,
        #[serde(flatten)]
        report: AnalysisReport,
    },
}

impl AnalyzeResponse {
    pub fn new(username: String, outcome: AnalysisOutcome) -> Self {
        match outcome {
            AnalysisOutcome::NoFeedback => AnalyzeResponse::Empty {
                username,
                analysis: NO_FEEDBACK_MESSAGE,
            },
            AnalysisOutcome::Report(report) => AnalyzeResponse::Report { username, report },
        }
    }
}

/// Error body
#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub detail: String,
}

impl FeedbackError {
    /// HTTP status for this error kind
    pub fn status_code(&self) -> StatusCode {
        match self {
            FeedbackError::Validation(_) => StatusCode::UNPROCESSABLE_ENTITY,
            FeedbackError::Classifier(_) => StatusCode::BAD_GATEWAY,
            FeedbackError::Storage(_)
            | FeedbackError::Config(_)
            | FeedbackError::Io(_)
            | FeedbackError::Serialization(_)
            | FeedbackError::Other(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for FeedbackError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        if status.is_server_error() {
            error!("Request failed: {}", self);
        } else {
            warn!("Rejected request: {}", self);
        }

        (
            status,
            Json(ErrorResponse {
                detail: self.to_string(),
            }),
        )
            .into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{KeywordCount, SentimentLabel, SentimentResult};

    #[test]
    fn test_empty_analysis_shape() {
        let body = AnalyzeResponse::new("nobody".to_string(), AnalysisOutcome::NoFeedback);
        let json = serde_json::to_value(&body).unwrap();

        assert_eq!(
            json,
            serde_json::json!({"username": "nobody", "analysis": "No feedback found"})
        );
    }

    #[test]
    fn test_report_is_flattened() {
        let report = AnalysisReport {
            sentiment_analysis: vec![SentimentResult::new(
                "slow",
                SentimentLabel::Negative,
                0.5,
            )],
            keywords: vec![KeywordCount {
                word: "slow".to_string(),
                count: 1,
            }],
            insights: vec!["x".to_string()],
        };
        let body = AnalyzeResponse::new("alice".to_string(), AnalysisOutcome::Report(report));
        let json = serde_json::to_value(&body).unwrap();

        assert_eq!(json["username"], "alice");
        assert_eq!(json["sentiment_analysis"][0]["sentiment"], "NEGATIVE");
        assert_eq!(json["keywords"][0]["count"], 1);
        assert_eq!(json["insights"][0], "x");
        assert!(json.get("analysis").is_none());
    }

    #[test]
    fn test_status_mapping() {
        assert_eq!(
            FeedbackError::Validation("bad".into()).status_code(),
            StatusCode::UNPROCESSABLE_ENTITY
        );
        assert_eq!(
            FeedbackError::Classifier("down".into()).status_code(),
            StatusCode::BAD_GATEWAY
        );
        assert_eq!(
            FeedbackError::Storage("locked".into()).status_code(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }
}
