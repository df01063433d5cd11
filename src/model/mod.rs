//! Touchdown probability model
//!
//! Empirical-Bayes shrinkage of per-game touchdown rates followed by a
//! Poisson 2+ touchdown probability

mod poisson;
mod shrinkage;

pub use poisson::{clamp_probability, prob_two_plus, PROB_CEIL, PROB_FLOOR};
pub use shrinkage::{shrink_rate, shrinkage_weight, PopulationStats, ShrinkageEstimator};

use crate::player::PlayerKey;
use crate::stats::{FeatureSeason, PlayerWeekStats};
use serde::{Deserialize, Serialize};

/// Model output for one player
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ModelPrediction {
    pub key: PlayerKey,
    pub player: String,
    pub team: String,
    pub position: String,
    pub feature_season: FeatureSeason,
    /// Games behind the raw rate
    pub games: u32,
    /// Unshrunk touchdowns per game
    pub raw_rate: f64,
    /// Position-group mean rate
    pub population_mean: f64,
    /// Weight on the player's own rate
    pub shrinkage_weight: f64,
    /// Poisson mean used for the probability
    pub shrunk_rate: f64,
    /// P(2+ touchdowns), inside (0, 1)
    pub model_prob: f64,
}

/// Trait for touchdown probability model implementations
pub trait TouchdownModel: Send + Sync {
    /// Predict for every player in an (already filtered) pool
    fn predict(&self, pool: &[PlayerWeekStats]) -> Vec<ModelPrediction>;
}
