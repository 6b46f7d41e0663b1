//! HTTP server command

use super::helpers::build_service;
use feedback_analyzer::{
    api::{ApiServer, ApiServerConfig},
    error::Result,
    AppConfig,
};
use std::net::SocketAddr;
use tracing::debug;

/// Handle `serve`
pub async fn handle(config: AppConfig, addr: Option<String>) -> Result<()> {
    let addr: SocketAddr = match addr {
        Some(addr) => addr
            .parse()
            .map_err(|e| anyhow::anyhow!("Invalid address '{}': {}", addr, e))?,
        None => config.server.addr,
    };

    debug!("Starting HTTP API server...");
    let service = build_service(&config).await?;
    ApiServer::new(ApiServerConfig { addr }, service).serve().await
}
