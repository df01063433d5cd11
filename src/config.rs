//! Configuration types for gamblebot
//!
//! Every section and key has a default, so an empty or partial file is
//! valid. Command-line flags override what is loaded here.

use crate::error::PipelineError;
use crate::telemetry::LogFormat;
use rust_decimal::Decimal;
use serde::Deserialize;
use std::path::PathBuf;

/// Environment variable holding The Odds API key
pub const ODDS_API_KEY_ENV: &str = "THEODDS_API_KEY";

/// Last week number (regular season plus playoffs)
pub const MAX_WEEK: u32 = 22;

/// Root configuration structure
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub model: ModelConfig,
    #[serde(default)]
    pub filter: FilterSettings,
    #[serde(default)]
    pub staking: StakingConfig,
    #[serde(default)]
    pub report: ReportConfig,
    #[serde(default)]
    pub odds: OddsConfig,
    #[serde(default)]
    pub data: DataConfig,
    #[serde(default)]
    pub telemetry: TelemetryConfig,
}

/// Touchdown model configuration
#[derive(Debug, Clone, Deserialize)]
pub struct ModelConfig {
    /// Trailing games in the recent-opportunity average
    #[serde(default = "default_recent_window")]
    pub recent_window: usize,

    /// Shrinkage strength in games when population variance is unusable
    #[serde(default = "default_prior_games")]
    pub prior_games: f64,
}

fn default_recent_window() -> usize {
    4
}
fn default_prior_games() -> f64 {
    8.0
}

impl Default for ModelConfig {
    fn default() -> Self {
        Self {
            recent_window: default_recent_window(),
            prior_games: default_prior_games(),
        }
    }
}

/// Eligibility filter configuration
#[derive(Debug, Clone, Deserialize)]
pub struct FilterSettings {
    #[serde(default = "default_positions")]
    pub positions: Vec<String>,

    /// Minimum recent rush attempts + targets per game
    #[serde(default = "default_min_recent_opps")]
    pub min_recent_opps: f64,

    #[serde(default = "default_true")]
    pub exclude_injured: bool,
}

fn default_positions() -> Vec<String> {
    vec!["RB".to_string(), "WR".to_string(), "TE".to_string()]
}
fn default_min_recent_opps() -> f64 {
    3.0
}
fn default_true() -> bool {
    true
}

impl Default for FilterSettings {
    fn default() -> Self {
        Self {
            positions: default_positions(),
            min_recent_opps: default_min_recent_opps(),
            exclude_injured: true,
        }
    }
}

/// Stake sizing configuration
#[derive(Debug, Clone, Deserialize)]
pub struct StakingConfig {
    /// Multiplier on full Kelly, in (0, 1]
    #[serde(default = "default_kelly_fraction")]
    pub kelly_fraction: Decimal,

    /// Bankroll unit stakes are expressed in
    #[serde(default = "default_unit_size")]
    pub unit_size: Decimal,
}

fn default_kelly_fraction() -> Decimal {
    Decimal::new(5, 1) // 0.5 = half Kelly
}
fn default_unit_size() -> Decimal {
    Decimal::ONE
}

impl Default for StakingConfig {
    fn default() -> Self {
        Self {
            kelly_fraction: default_kelly_fraction(),
            unit_size: default_unit_size(),
        }
    }
}

/// Report table configuration
#[derive(Debug, Clone, Deserialize)]
pub struct ReportConfig {
    #[serde(default = "default_top")]
    pub top: usize,

    /// Book keys to price from; empty means all books
    #[serde(default)]
    pub books: Vec<String>,
}

fn default_top() -> usize {
    10
}

impl Default for ReportConfig {
    fn default() -> Self {
        Self {
            top: default_top(),
            books: Vec::new(),
        }
    }
}

/// The Odds API configuration
#[derive(Debug, Clone, Deserialize)]
pub struct OddsConfig {
    /// Used when the environment variable is unset
    #[serde(default)]
    pub api_key: Option<String>,

    #[serde(default = "default_odds_url")]
    pub base_url: String,

    #[serde(default = "default_regions")]
    pub regions: String,

    #[serde(default = "default_odds_timeout")]
    pub timeout_secs: u64,
}

fn default_odds_url() -> String {
    crate::odds::ODDS_API_URL.to_string()
}
fn default_regions() -> String {
    "us,us2".to_string()
}
fn default_odds_timeout() -> u64 {
    25
}

impl Default for OddsConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            base_url: default_odds_url(),
            regions: default_regions(),
            timeout_secs: default_odds_timeout(),
        }
    }
}

/// Stats, injury and log file configuration
#[derive(Debug, Clone, Deserialize)]
pub struct DataConfig {
    /// nflverse release download root
    #[serde(default = "default_nflverse_url")]
    pub nflverse_url: String,

    /// Local mirror of nflverse CSVs; overrides the URL when set
    #[serde(default)]
    pub local_dir: Option<PathBuf>,

    #[serde(default = "default_log_path")]
    pub log_path: PathBuf,

    #[serde(default = "default_data_timeout")]
    pub timeout_secs: u64,
}

fn default_nflverse_url() -> String {
    crate::data::NFLVERSE_RELEASES_URL.to_string()
}
fn default_log_path() -> PathBuf {
    PathBuf::from("predictions.csv")
}
fn default_data_timeout() -> u64 {
    60
}

impl Default for DataConfig {
    fn default() -> Self {
        Self {
            nflverse_url: default_nflverse_url(),
            local_dir: None,
            log_path: default_log_path(),
            timeout_secs: default_data_timeout(),
        }
    }
}

/// Telemetry configuration
#[derive(Debug, Clone, Deserialize)]
pub struct TelemetryConfig {
    #[serde(default = "default_log_level")]
    pub log_level: String,

    #[serde(default)]
    pub format: LogFormat,
}

fn default_log_level() -> String {
    "info".to_string()
}

impl Default for TelemetryConfig {
    fn default() -> Self {
        Self {
            log_level: default_log_level(),
            format: LogFormat::default(),
        }
    }
}

impl Config {
    /// Load configuration from a TOML file
    pub fn load(path: impl AsRef<std::path::Path>) -> anyhow::Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let config: Config = toml::from_str(&content)?;
        Ok(config)
    }

    /// Reject values the pipeline cannot run with
    pub fn validate(&self) -> Result<(), PipelineError> {
        let fraction = self.staking.kelly_fraction;
        if fraction <= Decimal::ZERO || fraction > Decimal::ONE {
            return Err(PipelineError::Configuration(format!(
                "kelly fraction must be in (0, 1], got {fraction}"
            )));
        }
        if self.staking.unit_size <= Decimal::ZERO {
            return Err(PipelineError::Configuration(format!(
                "unit size must be positive, got {}",
                self.staking.unit_size
            )));
        }
        if self.report.top == 0 {
            return Err(PipelineError::Configuration("top must be at least 1".to_string()));
        }
        if self.model.recent_window == 0 {
            return Err(PipelineError::Configuration(
                "recent_window must be at least 1".to_string(),
            ));
        }
        if !self.model.prior_games.is_finite() || self.model.prior_games < 0.0 {
            return Err(PipelineError::Configuration(format!(
                "prior_games must be a non-negative number, got {}",
                self.model.prior_games
            )));
        }
        if !self.filter.min_recent_opps.is_finite() || self.filter.min_recent_opps < 0.0 {
            return Err(PipelineError::Configuration(format!(
                "min_recent_opps must be a non-negative number, got {}",
                self.filter.min_recent_opps
            )));
        }
        Ok(())
    }

    /// Odds API key, environment first
    pub fn odds_api_key(&self) -> Result<String, PipelineError> {
        std::env::var(ODDS_API_KEY_ENV)
            .ok()
            .or_else(|| self.odds.api_key.clone())
            .map(|k| k.trim().to_string())
            .filter(|k| !k.is_empty())
            .ok_or_else(|| {
                PipelineError::Configuration(format!(
                    "missing odds API key: set {ODDS_API_KEY_ENV} or [odds].api_key"
                ))
            })
    }
}

/// Week must be a real NFL week
pub fn validate_week(week: u32) -> Result<(), PipelineError> {
    if (1..=MAX_WEEK).contains(&week) {
        Ok(())
    } else {
        Err(PipelineError::Configuration(format!(
            "week must be between 1 and {MAX_WEEK}, got {week}"
        )))
    }
}
