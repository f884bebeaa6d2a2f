//! CLI module for the registration service
//!
//! Subcommands:
//! - `serve`: run the HTTP API
//! - `migrate`: apply PostgreSQL schema migrations, or revert the latest one

pub mod migrate;
pub mod serve;

use clap::{Args, Parser, Subcommand};

use crate::config::AppConfig;

/// Phone number registration service
#[derive(Parser)]
#[command(name = "ts-register")]
#[command(version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand)]
pub enum Command {
    /// Run the HTTP API server
    Serve,

    /// Apply pending database migrations
    Migrate(MigrateArgs),
}

#[derive(Args, Debug, Default)]
pub struct MigrateArgs {
    /// Revert the latest applied migration instead of applying pending ones
    #[arg(long)]
    pub revert: bool,
}

/// Load `.env` and the layered configuration, falling back to defaults
pub(crate) fn load_config() -> AppConfig {
    dotenvy::dotenv().ok();

    AppConfig::load().unwrap_or_else(|e| {
        eprintln!("Failed to load configuration, using defaults: {}", e);
        AppConfig::default()
    })
}
