//! Show the effective configuration

use feedback_analyzer::{error::Result, AppConfig};

/// Handle `config`
pub fn handle(config: &AppConfig) -> Result<()> {
    print!("{}", config.to_redacted_toml()?);
    Ok(())
}
