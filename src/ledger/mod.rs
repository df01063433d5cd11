//! Prediction log and evaluation
//!
//! The logger appends each report's ranked rows to a flat CSV. The evaluator
//! reads that file back later and scores it against realized touchdowns.

mod evaluator;
mod logger;

pub use evaluator::{read_log, week_outcomes, EvaluatedPrediction, Evaluation, EvaluationSummary, Evaluator};
pub use logger::PredictionLogger;

use crate::edge::RankedRow;
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// One row of the prediction log
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LoggedPrediction {
    pub season: i32,
    pub week: u32,
    pub player: String,
    pub team: String,
    pub model_prob: f64,
    /// American price
    pub odds: i32,
    pub implied_prob: f64,
    pub edge: f64,
    #[serde(with = "rust_decimal::serde::str")]
    pub stake_units: Decimal,
    /// Write time, RFC 3339 UTC
    pub timestamp: DateTime<Utc>,
}

impl LoggedPrediction {
    pub fn from_ranked(season: i32, week: u32, row: &RankedRow, timestamp: DateTime<Utc>) -> Self {
        Self {
            season,
            week,
            player: row.player.clone(),
            team: row.team.clone(),
            model_prob: row.model_prob,
            odds: row.odds.value(),
            implied_prob: row.implied_prob,
            edge: row.edge,
            stake_units: row.stake_units,
            timestamp,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::odds::AmericanOdds;
    use crate::player::PlayerKey;
    use crate::stats::{FeatureSeason, GameLog};
    use chrono::TimeZone;
    use rust_decimal_macros::dec;
    use std::collections::HashMap;

    fn ranked(player: &str, prob: f64, price: i32, stake: Decimal) -> RankedRow {
        let odds = AmericanOdds::new(price).unwrap();
        RankedRow {
            key: PlayerKey::from_name(player),
            player: player.to_string(),
            team: "DET".to_string(),
            position: "RB".to_string(),
            book: "fanduel".to_string(),
            market: "player_tds_over".to_string(),
            odds,
            model_prob: prob,
            implied_prob: odds.implied_probability(),
            edge: prob - odds.implied_probability(),
            full_kelly: 0.1,
            stake_units: stake,
            games: 9,
            raw_rate: 0.7,
            shrunk_rate: 0.6,
            feature_season: FeatureSeason::Fresh(2024),
        }
    }

    fn game(player: &str, week: u32, rush_tds: u32, rec_tds: u32) -> GameLog {
        GameLog {
            player_id: None,
            player: player.to_string(),
            team: "DET".to_string(),
            position: "RB".to_string(),
            season: 2024,
            week,
            rush_attempts: 15,
            targets: 3,
            rushing_tds: rush_tds,
            receiving_tds: rec_tds,
        }
    }

    #[test]
    fn test_log_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("logs").join("predictions.csv");
        let logger = PredictionLogger::new(&path);
        let ts = Utc.with_ymd_and_hms(2024, 10, 3, 12, 0, 0).unwrap();

        let rows = vec![
            ranked("Jahmyr Gibbs", 0.1234567891, 450, dec!(0.0421)),
            ranked("David Montgomery", 0.2, -105, dec!(0)),
        ];
        logger.append_at(2024, 5, &rows, ts).unwrap();

        let read = read_log(&path, 2024, 5).unwrap();
        assert_eq!(read.len(), 2);
        assert_eq!(read[0].season, 2024);
        assert_eq!(read[0].week, 5);
        assert_eq!(read[0].player, "Jahmyr Gibbs");
        assert_eq!(read[0].model_prob, 0.1234567891);
        assert_eq!(read[0].odds, 450);
        assert_eq!(read[0].stake_units, dec!(0.0421));
        assert_eq!(read[0].timestamp, ts);
        assert_eq!(read[1].odds, -105);
    }

    #[test]
    fn test_header_written_once() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("predictions.csv");
        let logger = PredictionLogger::new(&path);
        assert_eq!(logger.path(), path.as_path());

        logger.append(2024, 5, &[ranked("A", 0.2, 300, dec!(0.01))]).unwrap();
        logger.append(2024, 6, &[ranked("B", 0.2, 300, dec!(0.01))]).unwrap();

        let text = std::fs::read_to_string(&path).unwrap();
        assert_eq!(text.matches("season,week,player").count(), 1);
        assert_eq!(text.lines().count(), 3);

        assert_eq!(read_log(&path, 2024, 6).unwrap()[0].player, "B");
    }

    #[test]
    fn test_header_written_for_empty_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("predictions.csv");
        std::fs::write(&path, "").unwrap();

        PredictionLogger::new(&path)
            .append(2024, 1, &[ranked("A", 0.2, 300, dec!(0.01))])
            .unwrap();
        let text = std::fs::read_to_string(&path).unwrap();
        assert!(text.starts_with("season,week,player,team,model_prob,odds,implied_prob,edge,stake_units,timestamp"));
    }

    #[test]
    fn test_missing_log_is_empty() {
        let dir = tempfile::tempdir().unwrap();
        let rows = read_log(&dir.path().join("nope.csv"), 2024, 1).unwrap();
        assert!(rows.is_empty());

        let eval = Evaluator::new().evaluate(rows, &HashMap::new());
        assert_eq!(eval.summary.n, 0);
        assert_eq!(eval.summary.roi, Decimal::ZERO);
    }

    #[test]
    fn test_malformed_rows_skipped() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("predictions.csv");
        PredictionLogger::new(&path)
            .append(2024, 2, &[ranked("A", 0.2, 300, dec!(0.01))])
            .unwrap();
        let mut text = std::fs::read_to_string(&path).unwrap();
        text.push_str("2024,2,Broken,DET,not-a-number,300,0.25,0.0,0.01,2024-01-01T00:00:00Z\n");
        std::fs::write(&path, text).unwrap();

        let rows = read_log(&path, 2024, 2).unwrap();
        assert_eq!(rows.len(), 1);
    }

    #[test]
    fn test_evaluate_hits_profit_and_brier() {
        let ts = Utc.with_ymd_and_hms(2024, 10, 3, 12, 0, 0).unwrap();
        let logged = vec![
            LoggedPrediction::from_ranked(2024, 5, &ranked("Hit Guy", 0.25, 300, dec!(0.1)), ts),
            LoggedPrediction::from_ranked(2024, 5, &ranked("Miss Guy", 0.25, 300, dec!(0.1)), ts),
            LoggedPrediction::from_ranked(2024, 5, &ranked("No Stats", 0.5, 200, dec!(0)), ts),
        ];
        let logs = vec![game("Hit Guy", 5, 1, 1), game("Miss Guy", 5, 1, 0), game("Hit Guy", 4, 3, 0)];
        let outcomes = week_outcomes(&logs, 2024, 5);

        let eval = Evaluator::new().evaluate(logged, &outcomes);
        assert!(eval.rows[0].hit);
        assert_eq!(eval.rows[0].touchdowns, 2);
        assert_eq!(eval.rows[0].profit, dec!(0.3));
        assert!(!eval.rows[1].hit);
        assert_eq!(eval.rows[1].profit, dec!(-0.1));
        assert_eq!(eval.rows[2].touchdowns, 0);

        let s = &eval.summary;
        assert_eq!(s.n, 3);
        assert_eq!(s.hits, 1);
        assert_eq!(s.total_staked, dec!(0.2));
        assert_eq!(s.profit, dec!(0.2));
        assert_eq!(s.roi, dec!(1));
        // (0.75^2 + 0.25^2 + 0.5^2) / 3
        assert!((s.brier - (0.5625 + 0.0625 + 0.25) / 3.0).abs() < 1e-12);
        assert!(s.format_table(2024, 5).contains("Predictions:      3"));
    }
}
