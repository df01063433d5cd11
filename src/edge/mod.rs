//! Edge and stake computation
//!
//! Joins model probabilities with the best available price, then ranks the
//! result for the report.

mod kelly;

pub use kelly::{full_kelly, KellyCalculator};

use crate::model::ModelPrediction;
use crate::odds::{AmericanOdds, PricedQuote};
use crate::player::PlayerKey;
use crate::stats::FeatureSeason;
use rust_decimal::Decimal;
use std::cmp::Ordering;
use std::collections::BTreeMap;

/// One eligible, priced player
#[derive(Debug, Clone, PartialEq)]
pub struct RankedRow {
    pub key: PlayerKey,
    pub player: String,
    pub team: String,
    pub position: String,
    /// Book offering the selected price
    pub book: String,
    pub market: String,
    pub odds: AmericanOdds,
    pub model_prob: f64,
    pub implied_prob: f64,
    /// model_prob - implied_prob
    pub edge: f64,
    /// Unscaled Kelly fraction, may be negative
    pub full_kelly: f64,
    /// Recommended stake in units, never negative
    pub stake_units: Decimal,
    pub games: u32,
    pub raw_rate: f64,
    pub shrunk_rate: f64,
    pub feature_season: FeatureSeason,
}

/// Table ordering
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RankBy {
    /// Edge descending (report)
    Edge,
    /// Model probability descending (likely)
    Probability,
}

/// Joins predictions with prices and sizes stakes
#[derive(Debug, Clone, Default)]
pub struct EdgeCalculator {
    kelly: KellyCalculator,
}

impl EdgeCalculator {
    pub fn new(kelly: KellyCalculator) -> Self {
        Self { kelly }
    }

    /// Edge row for one prediction and its price
    pub fn evaluate(&self, prediction: &ModelPrediction, priced: &PricedQuote) -> RankedRow {
        let implied_prob = priced.odds.implied_probability();
        let full = full_kelly(prediction.model_prob, priced.odds);

        RankedRow {
            key: prediction.key.clone(),
            player: prediction.player.clone(),
            team: prediction.team.clone(),
            position: prediction.position.clone(),
            book: priced.quote.book.clone(),
            market: priced.quote.market.clone(),
            odds: priced.odds,
            model_prob: prediction.model_prob,
            implied_prob,
            edge: prediction.model_prob - implied_prob,
            full_kelly: full,
            stake_units: self.kelly.stake(full),
            games: prediction.games,
            raw_rate: prediction.raw_rate,
            shrunk_rate: prediction.shrunk_rate,
            feature_season: prediction.feature_season,
        }
    }

    /// Inner join on player key; players missing from either side drop out
    pub fn join(
        &self,
        predictions: &[ModelPrediction],
        best: &BTreeMap<PlayerKey, PricedQuote>,
    ) -> Vec<RankedRow> {
        predictions
            .iter()
            .filter_map(|p| best.get(&p.key).map(|q| self.evaluate(p, q)))
            .collect()
    }
}

/// Descending by the ranking metric, ties by player name ascending
pub fn compare_rows(a: &RankedRow, b: &RankedRow, by: RankBy) -> Ordering {
    match by {
        RankBy::Edge => b.edge.total_cmp(&a.edge),
        RankBy::Probability => b.model_prob.total_cmp(&a.model_prob),
    }
    .then_with(|| a.player.cmp(&b.player))
    .then_with(|| a.key.cmp(&b.key))
}

/// Sort by the requested metric and keep the first `top`
pub fn rank(mut rows: Vec<RankedRow>, by: RankBy, top: usize) -> Vec<RankedRow> {
    rows.sort_by(|a, b| compare_rows(a, b, by));
    rows.truncate(top);
    rows
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::odds::{OddsQuote, QuoteSide, TDS_OVER_MARKET};
    use rust_decimal_macros::dec;

    fn prediction(name: &str, prob: f64) -> ModelPrediction {
        ModelPrediction {
            key: PlayerKey::from_name(name),
            player: name.to_string(),
            team: "BUF".to_string(),
            position: "RB".to_string(),
            feature_season: FeatureSeason::Fresh(2024),
            games: 10,
            raw_rate: 0.5,
            population_mean: 0.3,
            shrinkage_weight: 0.5,
            shrunk_rate: 0.4,
            model_prob: prob,
        }
    }

    fn priced(name: &str, price: i32) -> (PlayerKey, PricedQuote) {
        let key = PlayerKey::from_name(name);
        let quote = OddsQuote {
            player: name.to_string(),
            book: "fanduel".to_string(),
            market: TDS_OVER_MARKET.to_string(),
            label: "Over".to_string(),
            side: Some(QuoteSide::Over),
            price,
            point: Some(1.5),
            event_id: "e".to_string(),
            home_team: None,
            away_team: None,
        };
        (
            key.clone(),
            PricedQuote {
                key,
                odds: AmericanOdds::new(price).unwrap(),
                quote,
            },
        )
    }

    #[test]
    fn test_join_drops_unmatched() {
        let preds = vec![prediction("Has Price", 0.2), prediction("No Price", 0.3)];
        let best: BTreeMap<_, _> = [priced("Has Price", 400), priced("Not Modeled", 300)]
            .into_iter()
            .collect();

        let rows = EdgeCalculator::default().join(&preds, &best);
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].player, "Has Price");
    }

    #[test]
    fn test_edge_and_stake() {
        let (_, q) = priced("X", 150);
        let row = EdgeCalculator::new(KellyCalculator::new(dec!(0.5), dec!(1)))
            .evaluate(&prediction("X", 0.5), &q);

        assert!((row.implied_prob - 0.4).abs() < 1e-12);
        assert!((row.edge - 0.1).abs() < 1e-12);
        // (1.5 * 0.5 - 0.5) / 1.5 = 1/6, halved
        assert_eq!(row.stake_units, dec!(0.0833));
    }

    #[test]
    fn test_negative_edge_zero_stake() {
        let (_, q) = priced("X", -200);
        let row = EdgeCalculator::default().evaluate(&prediction("X", 0.2), &q);
        assert!(row.edge < 0.0);
        assert!(row.full_kelly < 0.0);
        assert_eq!(row.stake_units, dec!(0));
    }

    #[test]
    fn test_rank_orders_and_truncates() {
        let preds = vec![
            prediction("Bravo", 0.30),
            prediction("Alpha", 0.30),
            prediction("Charlie", 0.10),
        ];
        let best: BTreeMap<_, _> = [priced("Alpha", 300), priced("Bravo", 300), priced("Charlie", 900)]
            .into_iter()
            .collect();
        let rows = EdgeCalculator::default().join(&preds, &best);

        let by_edge = rank(rows.clone(), RankBy::Edge, 10);
        // Alpha and Bravo tie on edge; name breaks it
        assert_eq!(by_edge[0].player, "Alpha");
        assert_eq!(by_edge[1].player, "Bravo");
        assert_eq!(by_edge[2].player, "Charlie");

        let by_prob = rank(rows, RankBy::Probability, 2);
        assert_eq!(by_prob.len(), 2);
        assert_eq!(by_prob[0].player, "Alpha");
        assert!(by_prob[0].model_prob >= by_prob[1].model_prob);
    }
}
