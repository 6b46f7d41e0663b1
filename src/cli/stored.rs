//! Print stored feedback

use super::helpers::{build_service, print_json};
use feedback_analyzer::{api::StoredFeedbackResponse, error::Result, AppConfig};

/// Handle `stored`
pub async fn handle(config: AppConfig, username: String) -> Result<()> {
    let service = build_service(&config).await?;
    let feedback = service.stored_feedback(&username).await?;

    print_json(&StoredFeedbackResponse { username, feedback })
}
