//! `report` and `likely` command implementation

use crate::config::{validate_week, Config};
use crate::data::{NflverseConfig, NflverseSource};
use crate::edge::{KellyCalculator, RankBy};
use crate::filter::FilterConfig;
use crate::injury::NflverseInjuryClient;
use crate::ledger::PredictionLogger;
use crate::odds::{OddsApiConfig, TheOddsApiClient};
use crate::pipeline::{Pipeline, PipelineSettings, WeekReport};
use crate::report::{format_odds_dump, format_ranked_table, write_csv, write_html};
use crate::stats::NflverseStatsClient;
use clap::Args;
use rust_decimal::Decimal;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

/// Which table a run produces
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReportMode {
    /// Ranked by edge, logged
    Edge,
    /// Ranked by model probability, not logged
    Likely,
}

#[derive(Args, Debug, Clone)]
pub struct ReportArgs {
    /// Season year
    #[arg(long)]
    pub season: i32,

    /// Week number (1-22)
    #[arg(long)]
    pub week: u32,

    /// Rows to show [default: 10]
    #[arg(long)]
    pub top: Option<usize>,

    /// Comma separated book keys to price from [default: all]
    #[arg(long, value_delimiter = ',')]
    pub books: Option<Vec<String>>,

    /// Multiplier on full Kelly, in (0, 1] [default: 0.5]
    #[arg(long)]
    pub kelly_fraction: Option<Decimal>,

    /// Bankroll unit size [default: 1.0]
    #[arg(long)]
    pub unit_size: Option<Decimal>,

    /// Comma separated positions [default: RB,WR,TE]
    #[arg(long, value_delimiter = ',')]
    pub positions: Option<Vec<String>>,

    /// Minimum recent rush attempts + targets per game [default: 3.0]
    #[arg(long)]
    pub min_recent_opps: Option<f64>,

    /// Keep players with excluded injury designations
    #[arg(long)]
    pub no_injury_filter: bool,

    /// Prediction log path [default: predictions.csv]
    #[arg(long)]
    pub log_file: Option<PathBuf>,

    /// Print every accepted 2+ TD quote before the table
    #[arg(long)]
    pub dump_odds: bool,

    /// Also write the table to this CSV file
    #[arg(long)]
    pub csv: Option<PathBuf>,

    /// Also write the table to this HTML file
    #[arg(long)]
    pub html: Option<PathBuf>,

    /// Do not append this run to the prediction log
    #[arg(long)]
    pub no_log: bool,
}

impl ReportArgs {
    /// Layer command-line flags over the loaded configuration
    pub fn apply_overrides(&self, config: &mut Config) {
        if let Some(top) = self.top {
            config.report.top = top;
        }
        if let Some(books) = &self.books {
            config.report.books = books.clone();
        }
        if let Some(fraction) = self.kelly_fraction {
            config.staking.kelly_fraction = fraction;
        }
        if let Some(unit) = self.unit_size {
            config.staking.unit_size = unit;
        }
        if let Some(positions) = &self.positions {
            config.filter.positions = positions.clone();
        }
        if let Some(min) = self.min_recent_opps {
            config.filter.min_recent_opps = min;
        }
        if self.no_injury_filter {
            config.filter.exclude_injured = false;
        }
        if let Some(path) = &self.log_file {
            config.data.log_path = path.clone();
        }
    }

    /// Pipeline settings for a validated configuration
    pub fn settings(&self, config: &Config, mode: ReportMode) -> PipelineSettings {
        PipelineSettings {
            recent_window: config.model.recent_window,
            prior_games: config.model.prior_games,
            filter: FilterConfig::new(
                &config.filter.positions,
                config.filter.min_recent_opps,
                config.filter.exclude_injured,
            ),
            books: config.report.books.clone(),
            kelly: KellyCalculator::new(config.staking.kelly_fraction, config.staking.unit_size),
            top: config.report.top,
            rank_by: match mode {
                ReportMode::Edge => RankBy::Edge,
                ReportMode::Likely => RankBy::Probability,
            },
            dump_odds: self.dump_odds,
        }
    }

    pub async fn execute(&self, config: &Config, mode: ReportMode) -> anyhow::Result<()> {
        let mut config = config.clone();
        self.apply_overrides(&mut config);
        config.validate()?;
        validate_week(self.week)?;

        let source = NflverseSource::new(NflverseConfig {
            base_url: config.data.nflverse_url.clone(),
            local_dir: config.data.local_dir.clone(),
            timeout: Duration::from_secs(config.data.timeout_secs),
        })?;

        let mut odds_config = OddsApiConfig::new(config.odds_api_key()?);
        odds_config.base_url = config.odds.base_url.clone();
        odds_config.regions = config.odds.regions.clone();
        odds_config.timeout = Duration::from_secs(config.odds.timeout_secs);

        let pipeline = Pipeline::new(
            Arc::new(NflverseStatsClient::new(source.clone())),
            Arc::new(NflverseInjuryClient::new(source)),
            Arc::new(TheOddsApiClient::new(odds_config)?),
            self.settings(&config, mode),
        );

        let report = pipeline.run(self.season, self.week).await?;
        self.output(&report, mode)?;

        if mode == ReportMode::Edge && !self.no_log {
            let logger = PredictionLogger::new(&config.data.log_path);
            logger.append(self.season, self.week, &report.rows)?;
            println!("Logged {} predictions to {}", report.rows.len(), logger.path().display());
        }
        Ok(())
    }

    fn output(&self, report: &WeekReport, mode: ReportMode) -> anyhow::Result<()> {
        if self.dump_odds {
            println!("{}", format_odds_dump(&report.dump));
        }

        for warning in &report.warnings {
            eprintln!("warning: {warning}");
        }

        let title = match mode {
            ReportMode::Edge => format!("2+ TD EDGES  season {} week {}", report.season, report.week),
            ReportMode::Likely => format!("MOST LIKELY 2+ TD  season {} week {}", report.season, report.week),
        };
        println!("{}", format_ranked_table(&title, &report.rows));
        if report.unpriced > 0 {
            println!(
                "{} of {} eligible players had no 2+ TD price",
                report.unpriced, report.eligible
            );
        }

        if let Some(path) = &self.csv {
            write_csv(path, &report.rows)?;
        }
        if let Some(path) = &self.html {
            write_html(path, &report.rows)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cli::{Cli, Commands};
    use clap::Parser;
    use rust_decimal_macros::dec;

    fn parse(args: &[&str]) -> ReportArgs {
        match Cli::parse_from(args).command {
            Commands::Report(a) | Commands::Likely(a) => a,
            other => panic!("unexpected command {other:?}"),
        }
    }

    #[test]
    fn test_flags_override_config() {
        let args = parse(&[
            "gamblebot",
            "report",
            "--season",
            "2024",
            "--week",
            "7",
            "--books",
            "draftkings,fanduel",
            "--kelly-fraction",
            "0.25",
            "--positions",
            "RB,TE",
            "--min-recent-opps",
            "5",
            "--no-injury-filter",
            "--top",
            "3",
        ]);
        assert_eq!(args.season, 2024);
        assert_eq!(args.week, 7);

        let mut config = Config::default();
        args.apply_overrides(&mut config);
        assert_eq!(config.report.books, vec!["draftkings", "fanduel"]);
        assert_eq!(config.staking.kelly_fraction, dec!(0.25));
        assert_eq!(config.staking.unit_size, dec!(1));
        assert_eq!(config.filter.positions, vec!["RB", "TE"]);
        assert_eq!(config.filter.min_recent_opps, 5.0);
        assert!(!config.filter.exclude_injured);
        assert_eq!(config.report.top, 3);
    }

    #[test]
    fn test_defaults_come_from_config() {
        let args = parse(&["gamblebot", "likely", "--season", "2024", "--week", "2"]);
        let mut config = Config::default();
        args.apply_overrides(&mut config);
        assert_eq!(config.report.top, 10);
        assert!(config.filter.exclude_injured);

        let settings = args.settings(&config, ReportMode::Likely);
        assert_eq!(settings.rank_by, RankBy::Probability);
        assert_eq!(settings.filter.positions.len(), 3);
        assert!(!settings.dump_odds);
    }
}
