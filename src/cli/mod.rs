//! CLI command handlers
//!
//! Each subcommand is implemented in its own module.

pub mod analyze;
pub mod config;
pub mod generate;
pub mod helpers;
pub mod serve;
pub mod stored;
