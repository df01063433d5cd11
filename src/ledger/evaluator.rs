//! Scoring logged predictions against realized outcomes

use super::LoggedPrediction;
use crate::error::LedgerError;
use crate::odds::AmericanOdds;
use crate::player::PlayerKey;
use crate::stats::GameLog;
use rust_decimal::prelude::FromPrimitive;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use std::collections::HashMap;
use std::path::Path;

/// Read logged rows for one season/week.
///
/// A missing log yields no rows. Rows that fail to parse are skipped with a
/// warning.
pub fn read_log(path: &Path, season: i32, week: u32) -> Result<Vec<LoggedPrediction>, LedgerError> {
    if !path.exists() {
        tracing::warn!(path = %path.display(), "Prediction log not found");
        return Ok(Vec::new());
    }

    let mut rdr = csv::ReaderBuilder::new()
        .flexible(true)
        .from_path(path)
        .map_err(|source| LedgerError::Csv {
            path: path.display().to_string(),
            source,
        })?;

    let mut rows = Vec::new();
    for (i, result) in rdr.deserialize::<LoggedPrediction>().enumerate() {
        match result {
            Ok(row) if row.season == season && row.week == week => rows.push(row),
            Ok(_) => {}
            Err(e) => {
                tracing::warn!(row = i + 1, error = %e, "Skipping unreadable log row");
            }
        }
    }
    Ok(rows)
}

/// Rushing + receiving touchdowns per player for one week
pub fn week_outcomes(logs: &[GameLog], season: i32, week: u32) -> HashMap<PlayerKey, u32> {
    let mut outcomes: HashMap<PlayerKey, u32> = HashMap::new();
    for log in logs.iter().filter(|g| g.season == season && g.week == week) {
        *outcomes.entry(PlayerKey::from_name(&log.player)).or_default() += log.touchdowns();
    }
    outcomes
}

/// A logged prediction joined with what happened
#[derive(Debug, Clone, PartialEq)]
pub struct EvaluatedPrediction {
    pub prediction: LoggedPrediction,
    /// Realized touchdowns (0 when the player has no stat line)
    pub touchdowns: u32,
    pub hit: bool,
    /// Units won or lost
    pub profit: Decimal,
    /// (p - hit)^2
    pub brier: f64,
}

/// Aggregate calibration and betting results
#[derive(Debug, Clone, Default, PartialEq)]
pub struct EvaluationSummary {
    pub n: usize,
    pub hits: usize,
    pub hit_rate: f64,
    pub mean_prob: f64,
    /// Mean squared error of the probabilities
    pub brier: f64,
    pub total_staked: Decimal,
    pub profit: Decimal,
    /// profit / total staked, zero when nothing was staked
    pub roi: Decimal,
    pub total_edge: f64,
    pub mean_edge: f64,
}

impl EvaluationSummary {
    /// Format as table for CLI output
    pub fn format_table(&self, season: i32, week: u32) -> String {
        format!(
            r#"
══════════════════════════════════════════════════════
          EVALUATION  season {} week {}
══════════════════════════════════════════════════════

CALIBRATION
───────────────────────────────────────────────────────
Predictions:      {}
Hits (2+ TD):     {}
Hit Rate:         {:.1}%
Mean Prob:        {:.1}%
Brier Score:      {:.4}

BETTING
───────────────────────────────────────────────────────
Total Staked:     {:.2}u
Profit:           {:+.2}u
ROI:              {:+.1}%
Mean Edge:        {:+.1}%
══════════════════════════════════════════════════════
"#,
            season,
            week,
            self.n,
            self.hits,
            self.hit_rate * 100.0,
            self.mean_prob * 100.0,
            self.brier,
            self.total_staked,
            self.profit,
            self.roi * dec!(100),
            self.mean_edge * 100.0,
        )
    }
}

/// Per-row results plus the summary
#[derive(Debug, Clone, Default)]
pub struct Evaluation {
    pub rows: Vec<EvaluatedPrediction>,
    pub summary: EvaluationSummary,
}

/// Joins logged predictions with realized touchdowns
#[derive(Debug, Clone, Default)]
pub struct Evaluator;

impl Evaluator {
    pub fn new() -> Self {
        Self
    }

    fn score(&self, prediction: LoggedPrediction, outcomes: &HashMap<PlayerKey, u32>) -> EvaluatedPrediction {
        let touchdowns = outcomes
            .get(&PlayerKey::from_name(&prediction.player))
            .copied()
            .unwrap_or(0);
        let hit = touchdowns >= 2;

        let stake = prediction.stake_units;
        let profit = if hit {
            let b = AmericanOdds::new(prediction.odds)
                .and_then(|o| Decimal::from_f64(o.net_payout()))
                .unwrap_or(Decimal::ZERO);
            stake * b
        } else {
            -stake
        };

        let outcome = if hit { 1.0 } else { 0.0 };
        let brier = (prediction.model_prob - outcome).powi(2);

        EvaluatedPrediction {
            prediction,
            touchdowns,
            hit,
            profit,
            brier,
        }
    }

    /// Score every prediction; missing players count as zero touchdowns
    pub fn evaluate(
        &self,
        predictions: Vec<LoggedPrediction>,
        outcomes: &HashMap<PlayerKey, u32>,
    ) -> Evaluation {
        let rows: Vec<EvaluatedPrediction> = predictions
            .into_iter()
            .map(|p| self.score(p, outcomes))
            .collect();
        let summary = summarize(&rows);
        Evaluation { rows, summary }
    }
}

fn summarize(rows: &[EvaluatedPrediction]) -> EvaluationSummary {
    let n = rows.len();
    if n == 0 {
        return EvaluationSummary::default();
    }
    let count = n as f64;

    let hits = rows.iter().filter(|r| r.hit).count();
    let total_staked: Decimal = rows.iter().map(|r| r.prediction.stake_units).sum();
    let profit: Decimal = rows.iter().map(|r| r.profit).sum();
    let roi = if total_staked > Decimal::ZERO {
        (profit / total_staked).round_dp(6)
    } else {
        Decimal::ZERO
    };
    let total_edge: f64 = rows.iter().map(|r| r.prediction.edge).sum();

    EvaluationSummary {
        n,
        hits,
        hit_rate: hits as f64 / count,
        mean_prob: rows.iter().map(|r| r.prediction.model_prob).sum::<f64>() / count,
        brier: rows.iter().map(|r| r.brier).sum::<f64>() / count,
        total_staked,
        profit,
        roi,
        total_edge,
        mean_edge: total_edge / count,
    }
}
