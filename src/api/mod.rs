//! HTTP API for feedback generation and analysis
//!
//! Provides:
//! - Feedback generation and retrieval endpoints
//! - Per-user analysis endpoint
//! - Health check

pub mod server;
pub mod state;

pub use server::{build_router, ApiServer, ApiServerConfig};
pub use state::{AnalyzeResponse, AppState, ErrorResponse, FeedbackResponse, StoredFeedbackResponse};
