//! Configuration for the feedback analyzer
//!
//! Settings are layered with the `config` crate:
//! 1. Built-in defaults
//! 2. Optional TOML file
//! 3. Environment variables prefixed `FEEDBACK_`, with `__` between sections
//!    (e.g. `FEEDBACK_CLASSIFIER__API_TOKEN`)

use crate::error::{FeedbackError, Result};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::net::SocketAddr;
use std::path::{Path, PathBuf};
use tracing::debug;

/// Environment variable prefix
const ENV_PREFIX: &str = "FEEDBACK";

/// Default Hugging Face checkpoint behind the stock sentiment-analysis pipeline
pub const DEFAULT_REMOTE_MODEL: &str = "distilbert/distilbert-base-uncased-finetuned-sst-2-english";

/// Default fastembed model for the local backend
pub const DEFAULT_LOCAL_MODEL: &str = "all-MiniLM-L6-v2";

/// Default Inference API base URL
pub const DEFAULT_INFERENCE_URL: &str = "https://api-inference.huggingface.co";

/// Top-level application configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub server: ServerConfig,
    pub storage: StorageConfig,
    pub classifier: ClassifierConfig,
}

/// HTTP server settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    /// Address the HTTP server binds to
    pub addr: SocketAddr,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            addr: ([127, 0, 0, 1], 8000).into(),
        }
    }
}

/// Feedback store settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct StorageConfig {
    /// SQLite database file
    pub db_path: PathBuf,
    /// Maximum pooled connections
    pub pool_size: usize,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            db_path: default_db_path(),
            pool_size: 4,
        }
    }
}

/// Which sentiment backend to run
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum ClassifierBackend {
    /// Hugging Face Inference API
    #[default]
    Remote,
    /// In-process ONNX model (requires the `local-model` feature)
    Local,
    /// Word-list scorer
    Lexicon,
}

impl fmt::Display for ClassifierBackend {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ClassifierBackend::Remote => write!(f, "remote"),
            ClassifierBackend::Local => write!(f, "local"),
            ClassifierBackend::Lexicon => write!(f, "lexicon"),
        }
    }
}

/// Sentiment classifier settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ClassifierConfig {
    pub backend: ClassifierBackend,
    /// Model identifier (Hub id for `remote`, fastembed name for `local`)
    pub model: String,
    /// Inference API base URL
    pub base_url: String,
    /// Bearer token for the Inference API
    pub api_token: Option<String>,
    /// HTTP request timeout in seconds
    pub timeout_secs: u64,
    /// Model cache directory for the local backend
    pub cache_dir: Option<PathBuf>,
}

impl Default for ClassifierConfig {
    fn default() -> Self {
        Self {
            backend: ClassifierBackend::Remote,
            model: DEFAULT_REMOTE_MODEL.to_string(),
            base_url: DEFAULT_INFERENCE_URL.to_string(),
            api_token: None,
            timeout_secs: 60,
            cache_dir: None,
        }
    }
}

impl ClassifierConfig {
    /// Model to load for the configured backend
    ///
    /// The local backend cannot run Hub checkpoints, so an untouched remote
    /// default resolves to [`DEFAULT_LOCAL_MODEL`] there.
    pub fn resolved_model(&self) -> &str {
        match self.backend {
            ClassifierBackend::Local if self.model == DEFAULT_REMOTE_MODEL => DEFAULT_LOCAL_MODEL,
            _ => self.model.as_str(),
        }
    }
}

/// Get the default database path under the local data directory
pub fn default_db_path() -> PathBuf {
    dirs::data_local_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("feedback-analyzer")
        .join("feedback.db")
}

impl AppConfig {
    /// Load configuration from defaults, an optional TOML file and the environment
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let mut builder =
            config::Config::builder().add_source(config::Config::try_from(&AppConfig::default())?);

        if let Some(path) = path {
            debug!("Loading configuration file: {}", path.display());
            builder = builder.add_source(config::File::from(path).required(true));
        }

        builder = builder.add_source(
            config::Environment::with_prefix(ENV_PREFIX)
                .prefix_separator("_")
                .separator("__"),
        );

        let config: AppConfig = builder.build()?.try_deserialize()?;
        config.validate()?;
        Ok(config)
    }

    /// Load configuration from a TOML string (no environment overrides)
    pub fn from_toml(toml_str: &str) -> Result<Self> {
        let config: AppConfig = config::Config::builder()
            .add_source(config::Config::try_from(&AppConfig::default())?)
            .add_source(config::File::from_str(toml_str, config::FileFormat::Toml))
            .build()?
            .try_deserialize()?;
        config.validate()?;
        Ok(config)
    }

    /// Validate configuration values
    pub fn validate(&self) -> Result<()> {
        if self.storage.pool_size == 0 {
            return Err(invalid("storage.pool_size must be at least 1"));
        }
        if self.classifier.timeout_secs == 0 {
            return Err(invalid("classifier.timeout_secs must be at least 1"));
        }
        if self.classifier.model.trim().is_empty() {
            return Err(invalid("classifier.model cannot be empty"));
        }
        Ok(())
    }

    /// Render as TOML with the API token redacted
    pub fn to_redacted_toml(&self) -> Result<String> {
        let mut shown = self.clone();
        if shown.classifier.api_token.is_some() {
            shown.classifier.api_token = Some("********".to_string());
        }
        toml::to_string_pretty(&shown).map_err(|e| FeedbackError::Other(e.to_string()))
    }
}

fn invalid(message: &str) -> FeedbackError {
    FeedbackError::Config(config::ConfigError::Message(message.to_string()))
}
