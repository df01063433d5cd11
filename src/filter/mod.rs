//! Player eligibility filtering
//!
//! Pure predicate applied before the model: position allow-list, minimum
//! recent usage, and injury designation.

use crate::injury::{InjuryReport, InjuryStatus};
use crate::stats::PlayerWeekStats;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// Result of applying filters to a player
#[derive(Debug, Clone, PartialEq)]
pub enum FilterResult {
    /// Player passed all filters
    Pass,
    /// Player rejected
    Reject(RejectReason),
}

/// Reason for player rejection
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum RejectReason {
    /// Position not in the allow-list
    Position(String),
    /// Recent opportunity average below the minimum
    LowUsage(f64),
    /// Excluded injury designation
    Injured(InjuryStatus),
}

/// Configuration for eligibility filters
#[derive(Debug, Clone)]
pub struct FilterConfig {
    /// Allowed positions, uppercase
    pub positions: BTreeSet<String>,
    /// Minimum recent rush attempts + targets per game
    pub min_recent_opportunities: f64,
    /// Drop players with excluded injury statuses
    pub exclude_injured: bool,
}

impl FilterConfig {
    pub fn new<I, S>(positions: I, min_recent_opportunities: f64, exclude_injured: bool) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        Self {
            positions: positions
                .into_iter()
                .map(|p| p.as_ref().trim().to_uppercase())
                .filter(|p| !p.is_empty())
                .collect(),
            min_recent_opportunities,
            exclude_injured,
        }
    }
}

impl Default for FilterConfig {
    fn default() -> Self {
        Self::new(["RB", "WR", "TE"], 3.0, true)
    }
}

/// Eligibility filter chain
pub struct EligibilityFilter {
    config: FilterConfig,
}

impl EligibilityFilter {
    pub fn new(config: FilterConfig) -> Self {
        Self { config }
    }

    /// Apply all filters to one player
    pub fn check(&self, player: &PlayerWeekStats, injuries: &InjuryReport) -> FilterResult {
        let position = player.position.trim().to_uppercase();
        if !self.config.positions.is_empty() && !self.config.positions.contains(&position) {
            return FilterResult::Reject(RejectReason::Position(position));
        }

        if player.recent_opportunities < self.config.min_recent_opportunities {
            return FilterResult::Reject(RejectReason::LowUsage(player.recent_opportunities));
        }

        if self.config.exclude_injured {
            let status = injuries.status(&player.key);
            if status.is_excluded() {
                return FilterResult::Reject(RejectReason::Injured(status));
            }
        }

        FilterResult::Pass
    }

    /// Keep only passing players
    pub fn apply(&self, players: Vec<PlayerWeekStats>, injuries: &InjuryReport) -> Vec<PlayerWeekStats> {
        let before = players.len();
        let kept: Vec<PlayerWeekStats> = players
            .into_iter()
            .filter(|p| match self.check(p, injuries) {
                FilterResult::Pass => true,
                FilterResult::Reject(reason) => {
                    tracing::trace!(player = %p.player, ?reason, "Player filtered out");
                    false
                }
            })
            .collect();

        tracing::debug!(before, after = kept.len(), "Applied eligibility filters");
        kept
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::player::PlayerKey;
    use crate::stats::FeatureSeason;

    fn player(name: &str, position: &str, opps: f64) -> PlayerWeekStats {
        PlayerWeekStats {
            key: PlayerKey::from_name(name),
            player: name.to_string(),
            team: "BUF".to_string(),
            position: position.to_string(),
            feature_season: FeatureSeason::Fresh(2024),
            games: 6,
            touchdowns: 3,
            td_rate: 0.5,
            recent_opportunities: opps,
        }
    }

    #[test]
    fn test_position_filter_case_insensitive() {
        let filter = EligibilityFilter::new(FilterConfig::default());
        let injuries = InjuryReport::new();

        assert_eq!(filter.check(&player("A", "wr", 8.0), &injuries), FilterResult::Pass);
        assert_eq!(
            filter.check(&player("B", "QB", 8.0), &injuries),
            FilterResult::Reject(RejectReason::Position("QB".to_string()))
        );
    }

    #[test]
    fn test_min_usage_boundary() {
        let filter = EligibilityFilter::new(FilterConfig::default());
        let injuries = InjuryReport::new();

        assert_eq!(filter.check(&player("A", "RB", 3.0), &injuries), FilterResult::Pass);
        assert!(matches!(
            filter.check(&player("B", "RB", 2.0), &injuries),
            FilterResult::Reject(RejectReason::LowUsage(_))
        ));
    }

    #[test]
    fn test_injury_filter_toggle() {
        let mut injuries = InjuryReport::new();
        injuries.record("Hurt Guy", InjuryStatus::Doubtful);
        injuries.record("Maybe Guy", InjuryStatus::Questionable);

        let on = EligibilityFilter::new(FilterConfig::default());
        assert_eq!(
            on.check(&player("Hurt Guy", "TE", 6.0), &injuries),
            FilterResult::Reject(RejectReason::Injured(InjuryStatus::Doubtful))
        );
        assert_eq!(on.check(&player("Maybe Guy", "TE", 6.0), &injuries), FilterResult::Pass);

        let off = EligibilityFilter::new(FilterConfig::new(["TE"], 3.0, false));
        assert_eq!(off.check(&player("Hurt Guy", "TE", 6.0), &injuries), FilterResult::Pass);
    }

    #[test]
    fn test_apply_keeps_order() {
        let filter = EligibilityFilter::new(FilterConfig::default());
        let kept = filter.apply(
            vec![player("A", "RB", 9.0), player("B", "RB", 1.0), player("C", "WR", 5.0)],
            &InjuryReport::new(),
        );
        let names: Vec<&str> = kept.iter().map(|p| p.player.as_str()).collect();
        assert_eq!(names, vec!["A", "C"]);
    }
}
