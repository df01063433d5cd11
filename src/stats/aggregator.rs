//! Game log aggregation and feature-season lookup

use super::{FeatureSeason, GameLog, PlayerWeekStats, StatsProvider};
use crate::error::{PipelineError, ProviderError};
use crate::player::PlayerKey;
use std::collections::BTreeMap;

/// Game logs tagged with the season they represent
#[derive(Debug, Clone)]
pub struct FeatureLogs {
    pub season: FeatureSeason,
    pub logs: Vec<GameLog>,
}

/// Resolve which season's logs feed the model.
///
/// Step one keeps the requested season's completed weeks (strictly before
/// `week`). If that yields nothing, step two takes the prior season in full.
pub async fn resolve_feature_logs(
    provider: &dyn StatsProvider,
    season: i32,
    week: u32,
) -> Result<FeatureLogs, PipelineError> {
    let fallback = season - 1;

    let current = match provider.weekly_stats(season).await {
        Ok(logs) => logs
            .into_iter()
            .filter(|g| g.season == season && g.week < week)
            .collect::<Vec<_>>(),
        Err(ProviderError::NotPublished { .. }) => Vec::new(),
        Err(e) => return Err(e.into()),
    };

    if !current.is_empty() {
        tracing::debug!(season, week, rows = current.len(), "Using current season stats");
        return Ok(FeatureLogs {
            season: FeatureSeason::Fresh(season),
            logs: current,
        });
    }

    let prior = match provider.weekly_stats(fallback).await {
        Ok(logs) => logs
            .into_iter()
            .filter(|g| g.season == fallback)
            .collect::<Vec<_>>(),
        Err(ProviderError::NotPublished { .. }) => Vec::new(),
        Err(e) => return Err(e.into()),
    };

    if prior.is_empty() {
        return Err(PipelineError::DataUnavailable { season, fallback });
    }

    tracing::warn!(
        season,
        week,
        fallback_season = fallback,
        "No completed games for requested week; using prior season rates"
    );

    Ok(FeatureLogs {
        season: FeatureSeason::Fallback(fallback),
        logs: prior,
    })
}

/// Reduces game logs to per-player features
#[derive(Debug, Clone)]
pub struct StatsAggregator {
    /// Trailing games used for the opportunity average
    recent_window: usize,
}

impl StatsAggregator {
    pub fn new(recent_window: usize) -> Self {
        Self {
            recent_window: recent_window.max(1),
        }
    }

    /// Build one [`PlayerWeekStats`] per player, ordered by join key.
    ///
    /// Logs are grouped by the source player id, or by position when the
    /// source has no ids, so namesakes stay apart.
    pub fn aggregate(&self, feature: &FeatureLogs) -> Vec<PlayerWeekStats> {
        let mut by_player: BTreeMap<(PlayerKey, String), Vec<&GameLog>> = BTreeMap::new();
        for log in &feature.logs {
            let key = PlayerKey::from_name(&log.player);
            if key.is_empty() {
                continue;
            }
            by_player.entry((key, identity(log))).or_default().push(log);
        }

        by_player
            .into_iter()
            .map(|((key, _), mut games)| {
                games.sort_by_key(|g| g.week);
                self.summarize(key, &games, feature.season)
            })
            .collect()
    }

    fn summarize(&self, key: PlayerKey, games: &[&GameLog], season: FeatureSeason) -> PlayerWeekStats {
        // Sorted by week, so the last entry carries the current team/position
        let latest = games[games.len() - 1];

        let mut weeks: Vec<u32> = games.iter().map(|g| g.week).collect();
        weeks.dedup();
        let games_played = weeks.len() as u32;

        let touchdowns: u32 = games.iter().map(|g| g.touchdowns()).sum();
        let td_rate = if games_played > 0 {
            touchdowns as f64 / games_played as f64
        } else {
            0.0
        };

        let window = &games[games.len().saturating_sub(self.recent_window)..];
        let recent_opportunities =
            window.iter().map(|g| g.opportunities() as f64).sum::<f64>() / window.len() as f64;

        PlayerWeekStats {
            key,
            player: latest.player.clone(),
            team: latest.team.clone(),
            position: latest.position.clone(),
            feature_season: season,
            games: games_played,
            touchdowns,
            td_rate,
            recent_opportunities,
        }
    }
}

fn identity(log: &GameLog) -> String {
    match log.player_id.as_deref().map(str::trim) {
        Some(id) if !id.is_empty() => format!("id:{id}"),
        _ => format!("pos:{}", log.position.trim().to_uppercase()),
    }
}

impl Default for StatsAggregator {
    fn default() -> Self {
        Self::new(4)
    }
}
