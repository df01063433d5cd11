//! Week pipeline orchestration
//!
//! Stats path: game logs -> aggregation -> eligibility -> shrinkage model.
//! Odds path: quotes -> 2+ classification -> best price per player.
//! Both meet in the edge calculator. [`rank_week`] is the pure core; the
//! [`Pipeline`] wrapper fetches its inputs from the providers.

use crate::edge::{rank, EdgeCalculator, KellyCalculator, RankBy, RankedRow};
use crate::error::PipelineError;
use crate::filter::{EligibilityFilter, FilterConfig};
use crate::injury::{InjuryProvider, InjuryReport};
use crate::ledger::{read_log, week_outcomes, Evaluation, Evaluator};
use crate::model::{ShrinkageEstimator, TouchdownModel};
use crate::odds::{OddsProvider, OddsQuote, OddsSelector, PricedQuote};
use crate::stats::{resolve_feature_logs, FeatureLogs, FeatureSeason, StatsAggregator, StatsProvider};
use std::fmt;
use std::path::Path;
use std::sync::Arc;

/// Non-fatal conditions surfaced alongside a report
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Warning {
    /// No completed games this season; prior season rates were used
    FallbackSeasonUsed { requested: i32, fallback: i32 },
    /// Every player was filtered out
    NoEligiblePlayers,
}

impl fmt::Display for Warning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Warning::FallbackSeasonUsed { requested, fallback } => write!(
                f,
                "no completed {requested} games before this week; using {fallback} season rates"
            ),
            Warning::NoEligiblePlayers => f.write_str("no players passed the eligibility filters"),
        }
    }
}

/// Settings for one ranking run
#[derive(Debug, Clone)]
pub struct PipelineSettings {
    pub recent_window: usize,
    pub prior_games: f64,
    pub filter: FilterConfig,
    /// Book keys to price from; empty means all
    pub books: Vec<String>,
    pub kelly: KellyCalculator,
    pub top: usize,
    pub rank_by: RankBy,
    /// Keep every accepted quote for inspection
    pub dump_odds: bool,
}

impl Default for PipelineSettings {
    fn default() -> Self {
        Self {
            recent_window: 4,
            prior_games: 8.0,
            filter: FilterConfig::default(),
            books: Vec::new(),
            kelly: KellyCalculator::default(),
            top: 10,
            rank_by: RankBy::Edge,
            dump_odds: false,
        }
    }
}

/// Result of ranking one week
#[derive(Debug, Clone)]
pub struct WeekReport {
    pub season: i32,
    pub week: u32,
    pub feature_season: FeatureSeason,
    /// Ranked, truncated table
    pub rows: Vec<RankedRow>,
    /// Every accepted 2+ quote; empty unless dump mode is on
    pub dump: Vec<PricedQuote>,
    /// Players that passed the filters
    pub eligible: usize,
    /// Eligible players with no 2+ price
    pub unpriced: usize,
    pub warnings: Vec<Warning>,
}

/// Rank one week from already-fetched inputs
pub fn rank_week(
    settings: &PipelineSettings,
    season: i32,
    week: u32,
    feature: &FeatureLogs,
    injuries: &InjuryReport,
    quotes: &[OddsQuote],
) -> WeekReport {
    let mut warnings = Vec::new();
    if let FeatureSeason::Fallback(fallback) = feature.season {
        warnings.push(Warning::FallbackSeasonUsed {
            requested: season,
            fallback,
        });
    }

    let players = StatsAggregator::new(settings.recent_window).aggregate(feature);
    let eligible = EligibilityFilter::new(settings.filter.clone()).apply(players, injuries);
    if eligible.is_empty() {
        tracing::warn!(season, week, "No eligible players after filtering");
        warnings.push(Warning::NoEligiblePlayers);
    }

    let predictions = ShrinkageEstimator::new(settings.prior_games).predict(&eligible);

    let selector = OddsSelector::with_books(&settings.books);
    let best = selector.best_by_player(quotes);
    let dump = if settings.dump_odds {
        selector.accepted(quotes)
    } else {
        Vec::new()
    };

    let joined = EdgeCalculator::new(settings.kelly.clone()).join(&predictions, &best);
    let unpriced = predictions.len() - joined.len();
    let rows = rank(joined, settings.rank_by, settings.top);

    tracing::info!(
        season,
        week,
        eligible = eligible.len(),
        priced = predictions.len() - unpriced,
        unpriced,
        shown = rows.len(),
        "Ranked week"
    );

    WeekReport {
        season,
        week,
        feature_season: feature.season,
        rows,
        dump,
        eligible: eligible.len(),
        unpriced,
        warnings,
    }
}

/// Fetches inputs from the providers and ranks the week
pub struct Pipeline {
    stats: Arc<dyn StatsProvider>,
    injuries: Arc<dyn InjuryProvider>,
    odds: Arc<dyn OddsProvider>,
    settings: PipelineSettings,
}

impl Pipeline {
    pub fn new(
        stats: Arc<dyn StatsProvider>,
        injuries: Arc<dyn InjuryProvider>,
        odds: Arc<dyn OddsProvider>,
        settings: PipelineSettings,
    ) -> Self {
        Self {
            stats,
            injuries,
            odds,
            settings,
        }
    }

    /// Injury report, best effort: a failed fetch means no exclusions
    async fn injury_report(&self, season: i32, week: u32) -> InjuryReport {
        if !self.settings.filter.exclude_injured {
            return InjuryReport::new();
        }
        match self.injuries.injuries(season, week).await {
            Ok(report) => report,
            Err(e) => {
                tracing::warn!(season, week, error = %e, "Injury report unavailable; not filtering on injuries");
                InjuryReport::new()
            }
        }
    }

    pub async fn run(&self, season: i32, week: u32) -> Result<WeekReport, PipelineError> {
        let feature = resolve_feature_logs(self.stats.as_ref(), season, week).await?;
        let injuries = self.injury_report(season, week).await;
        let quotes = self.odds.fetch_quotes(season, week).await?;

        Ok(rank_week(&self.settings, season, week, &feature, &injuries, &quotes))
    }
}

/// Score a logged week against realized touchdowns.
///
/// Nothing is fetched when the log has no rows for the week.
pub async fn evaluate_week(
    stats: &dyn StatsProvider,
    log_path: &Path,
    season: i32,
    week: u32,
) -> Result<Evaluation, PipelineError> {
    let logged = read_log(log_path, season, week)?;
    if logged.is_empty() {
        tracing::warn!(season, week, path = %log_path.display(), "No logged predictions for week");
        return Ok(Evaluation::default());
    }

    let logs = stats.weekly_stats(season).await?;
    let outcomes = week_outcomes(&logs, season, week);
    if outcomes.is_empty() {
        tracing::warn!(season, week, "No stat lines for week; every prediction counts as a miss");
    }

    Ok(Evaluator::new().evaluate(logged, &outcomes))
}
