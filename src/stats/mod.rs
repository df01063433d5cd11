//! Player usage and scoring features
//!
//! Reduces per-game logs into the season-level features the model needs

mod aggregator;
mod nflverse;

pub use aggregator::{resolve_feature_logs, FeatureLogs, StatsAggregator};
pub use nflverse::{parse_player_stats, NflverseStatsClient};

use crate::error::ProviderError;
use crate::player::PlayerKey;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};

/// One player's line for one game
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GameLog {
    /// Source player id (nflverse gsis id), when published
    #[serde(default)]
    pub player_id: Option<String>,
    /// Display name
    pub player: String,
    /// Team abbreviation
    pub team: String,
    /// Position (RB, WR, ...)
    pub position: String,
    /// Season year
    pub season: i32,
    /// Week number
    pub week: u32,
    /// Rushing attempts
    pub rush_attempts: u32,
    /// Pass targets
    pub targets: u32,
    /// Rushing touchdowns
    pub rushing_tds: u32,
    /// Receiving touchdowns
    pub receiving_tds: u32,
}

impl GameLog {
    /// Rush attempts plus targets
    pub fn opportunities(&self) -> u32 {
        self.rush_attempts + self.targets
    }

    /// Rushing plus receiving touchdowns
    pub fn touchdowns(&self) -> u32 {
        self.rushing_tds + self.receiving_tds
    }
}

/// Season the features were computed from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum FeatureSeason {
    /// Requested season, completed weeks only
    Fresh(i32),
    /// Prior season, full schedule
    Fallback(i32),
}

impl FeatureSeason {
    pub fn season(&self) -> i32 {
        match self {
            FeatureSeason::Fresh(s) | FeatureSeason::Fallback(s) => *s,
        }
    }

    pub fn is_fallback(&self) -> bool {
        matches!(self, FeatureSeason::Fallback(_))
    }
}

/// Season-level features for one player
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlayerWeekStats {
    /// Join key
    pub key: PlayerKey,
    /// Display name
    pub player: String,
    /// Most recent team
    pub team: String,
    /// Most recent listed position
    pub position: String,
    /// Season the features came from
    pub feature_season: FeatureSeason,
    /// Distinct games played in the feature season
    pub games: u32,
    /// Total touchdowns in the feature season
    pub touchdowns: u32,
    /// Touchdowns per game
    pub td_rate: f64,
    /// Mean rush attempts + targets over the trailing window
    pub recent_opportunities: f64,
}

impl PlayerWeekStats {
    /// Whether the prior season had to stand in for the requested one
    pub fn used_fallback(&self) -> bool {
        self.feature_season.is_fallback()
    }
}

/// Source of weekly player stat lines
#[async_trait]
pub trait StatsProvider: Send + Sync {
    /// All game logs published for a season.
    ///
    /// Answers only what is asked; returns [`ProviderError::NotPublished`]
    /// when the season has no data.
    async fn weekly_stats(&self, season: i32) -> Result<Vec<GameLog>, ProviderError>;
}
