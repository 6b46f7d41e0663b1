//! Generate and persist feedback from the command line

use super::helpers::{build_service, print_json};
use feedback_analyzer::{api::FeedbackResponse, error::Result, AppConfig};

/// Handle `generate`
pub async fn handle(config: AppConfig, username: String, count: i64) -> Result<()> {
    let service = build_service(&config).await?;
    let feedback = service.generate_feedback(&username, count).await?;

    print_json(&FeedbackResponse { username, feedback })
}
