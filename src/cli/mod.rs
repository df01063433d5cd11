//! CLI interface for gamblebot
//!
//! Provides subcommands for:
//! - `report`: Rank 2+ TD props by edge and log the picks
//! - `likely`: Rank players by 2+ TD probability
//! - `evaluate`: Score logged picks against results
//! - `config`: Show the effective configuration

mod evaluate;
mod report;

pub use evaluate::EvaluateArgs;
pub use report::{ReportArgs, ReportMode};

use crate::config::Config;
use clap::{Parser, Subcommand};

#[derive(Parser, Debug)]
#[command(name = "gamblebot")]
#[command(about = "NFL 2+ touchdown probabilities, prices and stakes")]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Path to configuration file
    #[arg(short, long, global = true, default_value = "gamblebot.toml")]
    pub config: String,

    /// Log level override (RUST_LOG still wins)
    #[arg(long, global = true)]
    pub log_level: Option<String>,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Rank players by edge against the best 2+ TD price
    Report(ReportArgs),
    /// Rank players by model probability (not logged)
    Likely(ReportArgs),
    /// Evaluate logged predictions for a week
    Evaluate(EvaluateArgs),
    /// Show configuration
    Config,
}

/// Human-readable dump of the effective configuration
pub fn describe_config(config: &Config) -> String {
    let books = if config.report.books.is_empty() {
        "all".to_string()
    } else {
        config.report.books.join(",")
    };
    let key_state = if config.odds_api_key().is_ok() { "set" } else { "missing" };

    format!(
        "Current configuration:\n  \
         Model: recent_window={}, prior_games={}\n  \
         Filter: positions={}, min_recent_opps={}, exclude_injured={}\n  \
         Staking: Kelly={}, Unit={}\n  \
         Report: top={}, books={}\n  \
         Odds: {} regions={} api_key={}\n  \
         Data: {} local_dir={} log={}\n  \
         Telemetry: level={} format={:?}",
        config.model.recent_window,
        config.model.prior_games,
        config.filter.positions.join(","),
        config.filter.min_recent_opps,
        config.filter.exclude_injured,
        config.staking.kelly_fraction,
        config.staking.unit_size,
        config.report.top,
        books,
        config.odds.base_url,
        config.odds.regions,
        key_state,
        config.data.nflverse_url,
        config
            .data
            .local_dir
            .as_ref()
            .map(|d| d.display().to_string())
            .unwrap_or_else(|| "-".to_string()),
        config.data.log_path.display(),
        config.telemetry.log_level,
        config.telemetry.format,
    )
}
