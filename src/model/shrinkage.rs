//! Empirical-Bayes shrinkage of touchdown rates
//!
//! Each player's rate is pulled toward the mean of their position group:
//!
//! shrunk = w * player_rate + (1 - w) * population_mean, w = n / (n + k)
//!
//! k is the ratio of within-player Poisson variance (the population mean)
//! to the between-player variance of true rates, estimated by method of
//! moments. When the between-player variance is not identifiable, k falls
//! back to a configured prior strength in games.

use super::poisson::{clamp_probability, prob_two_plus};
use super::{ModelPrediction, TouchdownModel};
use crate::stats::PlayerWeekStats;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Between-player variance below this is treated as zero
const VARIANCE_EPSILON: f64 = 1e-9;

/// Population-level rate statistics for one position group
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PopulationStats {
    /// Games-weighted mean touchdown rate
    pub mean: f64,
    /// Estimated variance of true rates across players
    pub between_variance: f64,
    /// Players contributing
    pub players: usize,
}

impl PopulationStats {
    /// Estimate from a pool of players
    pub fn from_players<'a, I>(pool: I) -> Self
    where
        I: IntoIterator<Item = &'a PlayerWeekStats>,
    {
        let played: Vec<&PlayerWeekStats> = pool.into_iter().filter(|p| p.games > 0).collect();
        let players = played.len();
        if players == 0 {
            return Self {
                mean: 0.0,
                between_variance: 0.0,
                players: 0,
            };
        }

        let total_games: f64 = played.iter().map(|p| p.games as f64).sum();
        let total_tds: f64 = played.iter().map(|p| p.td_rate * p.games as f64).sum();
        let mean = total_tds / total_games;

        let n = players as f64;
        let rate_mean = played.iter().map(|p| p.td_rate).sum::<f64>() / n;
        let rate_variance = played.iter().map(|p| (p.td_rate - rate_mean).powi(2)).sum::<f64>() / n;
        // Expected spread from Poisson sampling alone
        let sampling_noise = played.iter().map(|p| mean / p.games as f64).sum::<f64>() / n;

        Self {
            mean,
            between_variance: (rate_variance - sampling_noise).max(0.0),
            players,
        }
    }

    /// Shrinkage strength k, in games
    pub fn prior_strength(&self, fallback_games: f64) -> f64 {
        if self.between_variance > VARIANCE_EPSILON && self.mean > 0.0 {
            let k = self.mean / self.between_variance;
            if k.is_finite() {
                return k;
            }
        }
        fallback_games.max(0.0)
    }
}

/// Weight on the player's own rate: n / (n + k), always in [0, 1]
pub fn shrinkage_weight(games: u32, prior_strength: f64) -> f64 {
    if games == 0 || !prior_strength.is_finite() {
        return 0.0;
    }
    let n = games as f64;
    (n / (n + prior_strength.max(0.0))).clamp(0.0, 1.0)
}

/// Blend a player rate with the population mean
pub fn shrink_rate(player_rate: f64, population_mean: f64, weight: f64) -> f64 {
    weight * player_rate + (1.0 - weight) * population_mean
}

/// Empirical-Bayes estimator grouped by position
#[derive(Debug, Clone)]
pub struct ShrinkageEstimator {
    /// Prior strength in games when between-player variance is unusable
    pub prior_games: f64,
}

impl ShrinkageEstimator {
    pub fn new(prior_games: f64) -> Self {
        Self { prior_games }
    }

    /// Population statistics per uppercase position
    pub fn population_by_position(&self, pool: &[PlayerWeekStats]) -> BTreeMap<String, PopulationStats> {
        let mut groups: BTreeMap<String, Vec<&PlayerWeekStats>> = BTreeMap::new();
        for p in pool {
            groups.entry(position_group(&p.position)).or_default().push(p);
        }
        groups
            .into_iter()
            .map(|(pos, players)| (pos, PopulationStats::from_players(players)))
            .collect()
    }

    fn predict_one(&self, player: &PlayerWeekStats, population: &PopulationStats) -> ModelPrediction {
        let k = population.prior_strength(self.prior_games);
        let weight = shrinkage_weight(player.games, k);
        let shrunk = shrink_rate(player.td_rate, population.mean, weight);
        let model_prob = clamp_probability(prob_two_plus(shrunk));

        ModelPrediction {
            key: player.key.clone(),
            player: player.player.clone(),
            team: player.team.clone(),
            position: player.position.clone(),
            feature_season: player.feature_season,
            games: player.games,
            raw_rate: player.td_rate,
            population_mean: population.mean,
            shrinkage_weight: weight,
            shrunk_rate: shrunk,
            model_prob,
        }
    }
}

impl Default for ShrinkageEstimator {
    fn default() -> Self {
        Self::new(8.0)
    }
}

impl TouchdownModel for ShrinkageEstimator {
    fn predict(&self, pool: &[PlayerWeekStats]) -> Vec<ModelPrediction> {
        let populations = self.population_by_position(pool);

        for (position, stats) in &populations {
            tracing::debug!(
                position = %position,
                players = stats.players,
                mean = stats.mean,
                between_variance = stats.between_variance,
                k = stats.prior_strength(self.prior_games),
                "Position population"
            );
        }

        pool.iter()
            .filter_map(|p| {
                populations
                    .get(&position_group(&p.position))
                    .map(|population| self.predict_one(p, population))
            })
            .collect()
    }
}

fn position_group(position: &str) -> String {
    position.trim().to_uppercase()
}
