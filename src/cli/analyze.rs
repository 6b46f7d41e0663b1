//! Run the analysis pipeline for one user

use super::helpers::{build_service, print_json};
use feedback_analyzer::{api::AnalyzeResponse, error::Result, AppConfig};

/// Handle `analyze`
pub async fn handle(config: AppConfig, username: String) -> Result<()> {
    let service = build_service(&config).await?;
    let outcome = service.analyze(&username).await?;

    print_json(&AnalyzeResponse::new(username, outcome))
}
