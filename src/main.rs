//! Feedback Analyzer
//!
//! Command-line entry point: runs the HTTP API or drives the generate, list
//! and analyze operations directly against the configured store.

mod cli;

use clap::{Parser, Subcommand};
use feedback_analyzer::{error::Result, generator::DEFAULT_FEEDBACK_COUNT};
use std::path::PathBuf;
use tracing::{debug, Level};
use tracing_subscriber::{self, EnvFilter};

#[derive(Parser)]
#[command(name = "feedback-analyzer")]
#[command(about = "Mock customer feedback generator and analyzer", long_about = None)]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Configuration file (TOML)
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Database path (overrides configuration)
    #[arg(long, global = true)]
    db_path: Option<PathBuf>,

    /// Set log level
    #[arg(short, long, global = true, default_value = "info")]
    log_level: String,
}

#[derive(Subcommand)]
enum Commands {
    /// Start the HTTP API server
    Serve {
        /// Server address (overrides configuration)
        #[arg(long)]
        addr: Option<String>,
    },

    /// Generate and store mock feedback for a user
    Generate {
        username: String,

        /// Number of items (capped at 10)
        #[arg(short = 'n', long, default_value_t = DEFAULT_FEEDBACK_COUNT as i64, allow_negative_numbers = true)]
        count: i64,
    },

    /// Show stored feedback for a user
    Stored { username: String },

    /// Analyze stored feedback for a user
    Analyze { username: String },

    /// Print the effective configuration
    Config,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize tracing
    let level = match cli.log_level.as_str() {
        "trace" => Level::TRACE,
        "debug" => Level::DEBUG,
        "info" => Level::INFO,
        "warn" => Level::WARN,
        "error" => Level::ERROR,
        _ => Level::INFO,
    };

    let filter = EnvFilter::new(format!(
        "feedback_analyzer={level},tower_http={level},reqwest=warn",
        level = level.as_str().to_lowercase()
    ));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr) // Write logs to stderr, not stdout
        .init();

    debug!("Feedback Analyzer v{} starting...", env!("CARGO_PKG_VERSION"));

    let config = cli::helpers::load_config(cli.config.as_deref(), cli.db_path)?;

    match cli.command {
        Commands::Serve { addr } => cli::serve::handle(config, addr).await,
        Commands::Generate { username, count } => {
            cli::generate::handle(config, username, count).await
        }
        Commands::Stored { username } => cli::stored::handle(config, username).await,
        Commands::Analyze { username } => cli::analyze::handle(config, username).await,
        Commands::Config => cli::config::handle(&config),
    }
}
