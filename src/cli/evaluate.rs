//! `evaluate` command implementation

use crate::config::{validate_week, Config};
use crate::data::{NflverseConfig, NflverseSource};
use crate::ledger::Evaluation;
use crate::pipeline::evaluate_week;
use crate::stats::NflverseStatsClient;
use clap::Args;
use std::fmt::Write as _;
use std::path::PathBuf;
use std::time::Duration;

#[derive(Args, Debug, Clone)]
pub struct EvaluateArgs {
    /// Season year
    #[arg(long)]
    pub season: i32,

    /// Week number (1-22)
    #[arg(long)]
    pub week: u32,

    /// Prediction log path [default: predictions.csv]
    #[arg(long)]
    pub log_file: Option<PathBuf>,

    /// Print one line per logged prediction
    #[arg(long)]
    pub details: bool,
}

impl EvaluateArgs {
    pub async fn execute(&self, config: &Config) -> anyhow::Result<()> {
        validate_week(self.week)?;
        let log_path = self
            .log_file
            .clone()
            .unwrap_or_else(|| config.data.log_path.clone());

        let stats = NflverseStatsClient::new(NflverseSource::new(NflverseConfig {
            base_url: config.data.nflverse_url.clone(),
            local_dir: config.data.local_dir.clone(),
            timeout: Duration::from_secs(config.data.timeout_secs),
        })?);

        let evaluation = evaluate_week(&stats, &log_path, self.season, self.week).await?;
        if evaluation.summary.n == 0 {
            println!(
                "No logged predictions for season {} week {} in {}",
                self.season,
                self.week,
                log_path.display()
            );
            return Ok(());
        }

        if self.details {
            println!("{}", format_details(&evaluation));
        }
        println!("{}", evaluation.summary.format_table(self.season, self.week));
        Ok(())
    }
}

fn format_details(evaluation: &Evaluation) -> String {
    let mut out = String::new();
    let _ = writeln!(
        out,
        "{:<24} {:>6} {:>7} {:>4} {:>4} {:>8} {:>8}",
        "PLAYER", "ODDS", "PROB", "TDS", "HIT", "STAKE", "PROFIT"
    );
    for row in &evaluation.rows {
        let p = &row.prediction;
        let _ = writeln!(
            out,
            "{:<24} {:>+6} {:>6.1}% {:>4} {:>4} {:>8.2} {:>+8.2}",
            p.player,
            p.odds,
            p.model_prob * 100.0,
            row.touchdowns,
            if row.hit { "yes" } else { "no" },
            p.stake_units,
            row.profit,
        );
    }
    out
}
