// CLI module - command-line argument parsing and handlers
//
// Subcommands:
// - serve (default): run the HTTP API
// - report: print the analytics report to stdout
// - export: write the session history as CSV
// - config --show|--path|--reset|--edit: configuration management

use crate::analytics::{
    Analytics, BankrollSeries, DerivedSession, Dimension, GroupEntry, RangeMode, SeriesMode,
    StatsSnapshot,
};
use crate::config::{Config, VERSION};
use crate::export;
use crate::storage::SessionStore;
use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use std::fmt::{self, Write as _};
use std::io::Write;
use std::path::{Path, PathBuf};
use std::process::Command;

/// ProfitPulse - poker session analytics
#[derive(Parser)]
#[command(name = "profitpulse")]
#[command(version = VERSION)]
#[command(about = "Poker bankroll and session analytics", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand, Debug, PartialEq)]
pub enum Commands {
    /// Run the HTTP API (default)
    Serve,

    /// Print summary, breakdowns and advice
    Report,

    /// Export all sessions as CSV
    Export {
        /// Write to this file instead of stdout
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Manage configuration
    Config {
        /// Show effective configuration
        #[arg(long)]
        show: bool,

        /// Show config file path
        #[arg(long)]
        path: bool,

        /// Reset config file to defaults
        #[arg(long)]
        reset: bool,

        /// Open config file in $EDITOR
        #[arg(long)]
        edit: bool,
    },
}

// ─────────────────────────────────────────────────────────────────────────────
// Report / export
// ─────────────────────────────────────────────────────────────────────────────

/// `profitpulse report`
pub fn run_report(config: &Config) -> Result<()> {
    let store = SessionStore::open(&config.data_file, config.analytics.seed_demo_data)?;
    let analytics = Analytics::new(store.sessions(), config.analytics.settings());

    let mut stdout = std::io::stdout().lock();
    stdout
        .write_all(render_report(&analytics)?.as_bytes())
        .context("Failed to write report")?;
    Ok(())
}

/// `profitpulse export [--output FILE]`
pub fn run_export(config: &Config, output: Option<&Path>) -> Result<()> {
    let store = SessionStore::open(&config.data_file, config.analytics.seed_demo_data)?;

    match output {
        Some(path) => {
            let file = std::fs::File::create(path)
                .with_context(|| format!("Failed to create {}", path.display()))?;
            export::write_csv(store.sessions(), file)?;
            tracing::info!(
                path = %path.display(),
                sessions = store.sessions().len(),
                "CSV export written"
            );
        }
        None => export::write_csv(store.sessions(), std::io::stdout().lock())?,
    }
    Ok(())
}

/// Widest bar in the bankroll graph
const GRAPH_WIDTH: f64 = 40.0;

/// Plain-text report: summary, sessions, stats, graph, breakdowns, advice
pub fn render_report(analytics: &Analytics<'_>) -> Result<String> {
    let mut out = String::new();
    write_report(&mut out, analytics)?;
    Ok(out)
}

fn write_report(out: &mut String, analytics: &Analytics<'_>) -> fmt::Result {
    writeln!(out, "=== ProfitPulse Report ===")?;
    for line in analytics.summary_lines() {
        writeln!(out, "{}", line)?;
    }

    write_sessions(out, analytics.sessions())?;
    write_stats(out, &analytics.advanced_stats())?;
    write_graph(
        out,
        &analytics.bankroll_series(RangeMode::All, SeriesMode::Bankroll),
    )?;

    for dimension in Dimension::ALL {
        write_groups(out, dimension, &analytics.grouped_stats(dimension))?;
    }

    writeln!(out, "\n--- Advice ---")?;
    for note in analytics.advisory_notes() {
        writeln!(out, "* {}", note.text)?;
    }
    Ok(())
}

fn write_sessions(out: &mut String, sessions: &[DerivedSession<'_>]) -> fmt::Result {
    writeln!(out, "\n--- Sessions ---")?;
    if sessions.is_empty() {
        return writeln!(out, "(no sessions)");
    }
    for (i, derived) in sessions.iter().enumerate() {
        let session = derived.session;
        let hours = session
            .hours_played
            .map(|h| format!("{:.2}h", h))
            .unwrap_or_else(|| "n/a".to_string());
        writeln!(
            out,
            "{:2}) {} | {:<18} | Buy-in: {:6.2} | Cash-out: {:6.2} | Profit: {:+6.2} | Hours: {:<7} | Hourly: {:<9} | {} | {}",
            i + 1,
            session.date.format("%Y-%m-%d"),
            session.game,
            session.buy_in,
            session.cash_out,
            derived.profit,
            hours,
            format_hourly(derived.hourly_rate),
            session.location,
            session.notes
        )?;
    }
    Ok(())
}

fn write_stats(out: &mut String, stats: &StatsSnapshot) -> fmt::Result {
    writeln!(out, "\n--- Risk ---")?;
    if let (Some(mean), Some(stdev)) = (stats.mean_profit, stats.stdev) {
        writeln!(out, "Mean profit per session: {:+.2}", mean)?;
        writeln!(out, "Std deviation: {:.2}", stdev)?;
    }
    if let Some(range) = &stats.rough_range {
        writeln!(
            out,
            "Single session range: {:+.2} to {:+.2} ({})",
            range.low, range.high, range.label
        )?;
    }
    writeln!(
        out,
        "Longest win streak: {} | Longest losing streak: {}",
        stats.streaks.best_win_streak, stats.streaks.worst_lose_streak
    )?;
    writeln!(out, "Bullets fired: {}", stats.totals.total_bullets)?;

    let highlights = [
        ("Biggest win", &stats.biggest_win),
        ("Biggest loss", &stats.biggest_loss),
    ];
    for (label, highlight) in highlights {
        if let Some(h) = highlight {
            writeln!(
                out,
                "{}: {:+.2} in {} at {} on {}",
                label,
                h.profit,
                h.game,
                h.location,
                h.date.format("%Y-%m-%d")
            )?;
        }
    }
    Ok(())
}

/// Horizontal bars scaled between the lowest and highest bankroll
fn write_graph(out: &mut String, series: &BankrollSeries) -> fmt::Result {
    writeln!(out, "\n--- Bankroll Over Time ---")?;
    if series.values.is_empty() {
        return writeln!(out, "No sessions yet, nothing to graph.");
    }

    let min = series.values.iter().copied().fold(f64::INFINITY, f64::min);
    let max = series.values.iter().copied().fold(f64::NEG_INFINITY, f64::max);
    let span = if max > min { max - min } else { 1.0 };

    for (label, value) in series.labels.iter().zip(&series.values) {
        let bar_len = ((value - min) / span * GRAPH_WIDTH) as usize;
        writeln!(out, "{:<11}: {:8.2} | {}", label, value, "#".repeat(bar_len))?;
    }
    Ok(())
}

fn write_groups(out: &mut String, dimension: Dimension, groups: &[GroupEntry]) -> fmt::Result {
    writeln!(out, "\n--- By {} ---", dimension.as_str())?;
    if groups.is_empty() {
        return writeln!(out, "(no sessions)");
    }
    for group in groups {
        writeln!(
            out,
            "{:<18} {:>3} sessions | profit {:>+9.2} | hours {:>6.2} | {}",
            group.key,
            group.bucket.count,
            group.bucket.total_profit,
            group.bucket.total_hours,
            format_hourly(group.bucket.hourly)
        )?;
    }
    Ok(())
}

fn format_hourly(hourly: Option<f64>) -> String {
    hourly
        .map(|h| format!("{:+.2}/h", h))
        .unwrap_or_else(|| "n/a".to_string())
}

// ─────────────────────────────────────────────────────────────────────────────
// Config subcommand
// ─────────────────────────────────────────────────────────────────────────────

/// `profitpulse config ...`
pub fn handle_config(show: bool, path: bool, reset: bool, edit: bool) -> Result<()> {
    if path {
        handle_config_path()
    } else if show {
        handle_config_show()
    } else if reset {
        handle_config_reset()
    } else if edit {
        handle_config_edit()
    } else {
        println!("Usage: profitpulse config [--show|--path|--reset|--edit]");
        println!();
        println!("Options:");
        println!("  --show    Display effective configuration");
        println!("  --path    Show config file path");
        println!("  --reset   Reset config file to defaults");
        println!("  --edit    Open config file in $EDITOR");
        Ok(())
    }
}

fn handle_config_path() -> Result<()> {
    let path = Config::config_path().context("Could not determine config path")?;
    println!("{}", path.display());
    Ok(())
}

fn handle_config_show() -> Result<()> {
    let config = Config::from_env()?;

    println!("# Effective configuration (env > file > defaults)");
    println!();
    print!("{}", config.to_toml());

    println!();
    if let Some(path) = Config::config_path() {
        if path.exists() {
            println!("# Source: {}", path.display());
        } else {
            println!("# Source: defaults (no config file)");
        }
    }
    Ok(())
}

fn handle_config_reset() -> Result<()> {
    let path = Config::config_path().context("Could not determine config path")?;

    if path.exists() {
        eprint!(
            "Config file exists at {}. Overwrite? [y/N] ",
            path.display()
        );
        std::io::stderr().flush()?;

        let mut input = String::new();
        std::io::stdin()
            .read_line(&mut input)
            .context("Failed to read confirmation")?;

        if !input.trim().eq_ignore_ascii_case("y") {
            println!("Aborted.");
            return Ok(());
        }
    }

    let path = Config::reset_config_file()?;
    println!("Config reset to defaults: {}", path.display());
    Ok(())
}

fn handle_config_edit() -> Result<()> {
    let path = Config::config_path().context("Could not determine config path")?;

    if !path.exists() {
        Config::ensure_config_exists();
        println!("Created new config file: {}", path.display());
    }

    let editor = std::env::var("EDITOR")
        .or_else(|_| std::env::var("VISUAL"))
        .unwrap_or_else(|_| {
            if cfg!(windows) {
                "notepad".to_string()
            } else {
                "nano".to_string()
            }
        });

    println!("Opening {} with {}", path.display(), editor);

    let status = Command::new(&editor).arg(&path).status().with_context(|| {
        format!(
            "Failed to launch editor '{}'. Set $EDITOR to your preferred editor",
            editor
        )
    })?;
    anyhow::ensure!(status.success(), "Editor exited with status: {}", status);
    Ok(())
}
