//! HTTP API server

use super::state::{AnalyzeResponse, AppState, FeedbackResponse, StoredFeedbackResponse};
use crate::error::{FeedbackError, Result};
use crate::generator::DEFAULT_FEEDBACK_COUNT;
use crate::service::FeedbackService;
use axum::{
    extract::{rejection::QueryRejection, Path, Query, State},
    routing::get,
    Json, Router,
};
use serde::{Deserialize, Serialize};
use std::net::SocketAddr;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::{debug, info, warn};

/// Greeting served at `/`
pub const ROOT_MESSAGE: &str = "Hello World from Customer Feedback Analyzer!";

/// API server configuration
#[derive(Debug, Clone)]
pub struct ApiServerConfig {
    /// Server address
    pub addr: SocketAddr,
}

impl Default for ApiServerConfig {
    fn default() -> Self {
        Self {
            addr: ([127, 0, 0, 1], 8000).into(),
        }
    }
}

/// API server
pub struct ApiServer {
    config: ApiServerConfig,
    state: AppState,
}

impl ApiServer {
    /// Create new API server
    pub fn new(config: ApiServerConfig, service: FeedbackService) -> Self {
        Self {
            config,
            state: AppState::new(service),
        }
    }

    /// Get the router without binding a socket
    pub fn router(&self) -> Router {
        build_router(self.state.clone())
    }

    /// Serve until Ctrl+C
    pub async fn serve(self) -> Result<()> {
        let router = self.router();
        let listener = tokio::net::TcpListener::bind(self.config.addr).await?;
        info!("API server listening on http://{}", listener.local_addr()?);

        axum::serve(listener, router)
            .with_graceful_shutdown(shutdown_signal())
            .await?;

        info!("API server stopped");
        Ok(())
    }
}

/// Build router
pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/", get(root_handler))
        // Feedback endpoints
        .route("/feedback/:username", get(generate_handler))
        .route("/stored-feedback/:username", get(stored_handler))
        .route("/analyze/:username", get(analyze_handler))
        // Health check
        .route("/health", get(health_handler))
        // State
        .with_state(state)
        // Middleware
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
}

async fn shutdown_signal() {
    match tokio::signal::ctrl_c().await {
        Ok(()) => info!("Shutdown signal received"),
        Err(e) => warn!("Failed to listen for Ctrl+C: {}", e),
    }
}

/// Root handler
#[derive(Debug, Serialize, Deserialize)]
pub struct RootResponse {
    pub message: String,
}

async fn root_handler() -> Json<RootResponse> {
    Json(RootResponse {
        message: ROOT_MESSAGE.to_string(),
    })
}

/// Generate handler
#[derive(Debug, Deserialize)]
pub struct GenerateParams {
    count: Option<String>,
}

/// Parse `count`, saturating integers outside the `i64` range
fn parse_count(raw: &str) -> Result<i64> {
    let raw = raw.trim();
    if let Ok(count) = raw.parse::<i64>() {
        return Ok(count);
    }

    let (negative, digits) = match raw.strip_prefix('-') {
        Some(digits) => (true, digits),
        None => (false, raw.strip_prefix('+').unwrap_or(raw)),
    };
    if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
        return Err(FeedbackError::Validation(format!(
            "count: invalid integer '{}'",
            raw
        )));
    }

    Ok(if negative { i64::MIN } else { i64::MAX })
}

async fn generate_handler(
    State(state): State<AppState>,
    Path(username): Path<String>,
    params: std::result::Result<Query<GenerateParams>, QueryRejection>,
) -> Result<Json<FeedbackResponse>> {
    let Query(params) =
        params.map_err(|rejection| FeedbackError::Validation(rejection.body_text()))?;
    let count = match params.count.as_deref() {
        Some(raw) => parse_count(raw)?,
        None => DEFAULT_FEEDBACK_COUNT as i64,
    };
    debug!("Generate request: username={}, count={}", username, count);

    let feedback = state.service.generate_feedback(&username, count).await?;
    Ok(Json(FeedbackResponse { username, feedback }))
}

/// Stored feedback handler
async fn stored_handler(
    State(state): State<AppState>,
    Path(username): Path<String>,
) -> Result<Json<StoredFeedbackResponse>> {
    let feedback = state.service.stored_feedback(&username).await?;
    Ok(Json(StoredFeedbackResponse { username, feedback }))
}

/// Analyze handler
async fn analyze_handler(
    State(state): State<AppState>,
    Path(username): Path<String>,
) -> Result<Json<AnalyzeResponse>> {
    let outcome = state.service.analyze(&username).await?;
    Ok(Json(AnalyzeResponse::new(username, outcome)))
}

/// Health check handler
#[derive(Debug, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
    pub classifier: String,
}

async fn health_handler(State(state): State<AppState>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        classifier: state.service.classifier_name().to_string(),
    })
}
