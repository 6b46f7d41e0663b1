//! Shared helper functions for CLI commands

use feedback_analyzer::{
    build_classifier, error::Result, AppConfig, FeedbackService, SqliteFeedbackStore,
};
use serde::Serialize;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::debug;

/// Load configuration and apply the global CLI overrides
pub fn load_config(config_path: Option<&Path>, db_path: Option<PathBuf>) -> Result<AppConfig> {
    let mut config = AppConfig::load(config_path)?;
    if let Some(db_path) = db_path {
        debug!("Database path overridden: {}", db_path.display());
        config.storage.db_path = db_path;
    }
    Ok(config)
}

/// Open the store and classifier described by `config`
pub async fn build_service(config: &AppConfig) -> Result<FeedbackService> {
    let store =
        SqliteFeedbackStore::open_with_pool_size(&config.storage.db_path, config.storage.pool_size)
            .await?;
    let classifier = build_classifier(&config.classifier).await?;

    Ok(FeedbackService::new(Arc::new(store), classifier))
}

/// Pretty-print a value as JSON on stdout
pub fn print_json<T: Serialize>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}
