// ProfitPulse - Poker session analytics
//
// Logs discrete poker sessions and derives a dashboard from them: running
// bankroll, per-dimension performance breakdowns, variance and streaks, and
// rule-based advisory notes.
//
// Architecture:
// - Session model: raw session records, validated at the repository boundary
// - Storage: JSON-file session repository (whole-file rewrite per change)
// - Analytics: pure engine recomputed from the full history on every query
// - Server (axum): local JSON API over the engine and session CRUD
// - CLI (clap): serve, report, export, config

mod analytics;
mod cli;
mod config;
mod demo;
mod export;
mod logging;
mod server;
mod session;
mod storage;

use anyhow::Result;
use clap::Parser;
use cli::{Cli, Commands};
use config::Config;

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    let command = cli.command.unwrap_or(Commands::Serve);

    // Config management runs before anything reads the config file
    if let Commands::Config {
        show,
        path,
        reset,
        edit,
    } = command
    {
        return cli::handle_config(show, path, reset, edit);
    }

    // Ensure config template exists (helps users discover options)
    Config::ensure_config_exists();

    let config = Config::from_env()?;

    // Must stay alive until exit so buffered file logs are flushed
    let _log_guard = logging::init(&config.logging);

    tracing::debug!(?config, "Configuration loaded");

    match command {
        Commands::Serve => {
            tracing::info!("ProfitPulse v{} starting", config::VERSION);
            server::serve(&config).await
        }
        Commands::Report => cli::run_report(&config),
        Commands::Export { output } => cli::run_export(&config, output.as_deref()),
        Commands::Config { .. } => Ok(()),
    }
}
