//! nflverse weekly player stats

use super::{GameLog, StatsProvider};
use crate::data::{Dataset, NflverseSource};
use crate::error::ProviderError;
use async_trait::async_trait;
use serde::Deserialize;
use std::io::Read;

/// One `player_stats_{season}.csv` row. Column names vary between releases,
/// so every alias is its own optional field.
#[derive(Debug, Deserialize)]
struct RawStatRow {
    #[serde(default)]
    player_id: Option<String>,
    #[serde(default)]
    player_display_name: Option<String>,
    #[serde(default)]
    player_name: Option<String>,
    #[serde(default)]
    player: Option<String>,
    #[serde(default)]
    recent_team: Option<String>,
    #[serde(default)]
    team: Option<String>,
    #[serde(default)]
    position: Option<String>,
    #[serde(default, deserialize_with = "csv::invalid_option")]
    season: Option<i32>,
    #[serde(default, deserialize_with = "csv::invalid_option")]
    week: Option<u32>,
    #[serde(default, deserialize_with = "csv::invalid_option")]
    carries: Option<f64>,
    #[serde(default, deserialize_with = "csv::invalid_option")]
    rushing_att: Option<f64>,
    #[serde(default, deserialize_with = "csv::invalid_option")]
    targets: Option<f64>,
    #[serde(default, deserialize_with = "csv::invalid_option")]
    rushing_tds: Option<f64>,
    #[serde(default, deserialize_with = "csv::invalid_option")]
    rushing_td: Option<f64>,
    #[serde(default, deserialize_with = "csv::invalid_option")]
    receiving_tds: Option<f64>,
    #[serde(default, deserialize_with = "csv::invalid_option")]
    receiving_td: Option<f64>,
}

fn first_text(candidates: [&Option<String>; 3]) -> Option<String> {
    candidates
        .into_iter()
        .flatten()
        .map(|s| s.trim())
        .find(|s| !s.is_empty() && !s.eq_ignore_ascii_case("na"))
        .map(str::to_string)
}

fn count(primary: Option<f64>, alias: Option<f64>) -> u32 {
    primary
        .or(alias)
        .filter(|v| v.is_finite() && *v > 0.0)
        .map(|v| v.round() as u32)
        .unwrap_or(0)
}

impl RawStatRow {
    fn into_game_log(self) -> Option<GameLog> {
        let player = first_text([&self.player_display_name, &self.player_name, &self.player])?;
        let season = self.season?;
        let week = self.week?;
        let team = first_text([&self.recent_team, &self.team, &None]).unwrap_or_default();
        let position = first_text([&self.position, &None, &None]).unwrap_or_default();

        Some(GameLog {
            player_id: first_text([&self.player_id, &None, &None]),
            player,
            team,
            position,
            season,
            week,
            rush_attempts: count(self.carries, self.rushing_att),
            targets: count(self.targets, None),
            rushing_tds: count(self.rushing_tds, self.rushing_td),
            receiving_tds: count(self.receiving_tds, self.receiving_td),
        })
    }
}

/// Parse a weekly stats CSV. Malformed rows are skipped with a warning.
pub fn parse_player_stats<R: Read>(reader: R) -> Result<Vec<GameLog>, ProviderError> {
    let mut rdr = csv::ReaderBuilder::new().flexible(true).from_reader(reader);

    let mut logs = Vec::new();
    let mut skipped = 0usize;
    for (i, result) in rdr.deserialize::<RawStatRow>().enumerate() {
        match result {
            Ok(row) => match row.into_game_log() {
                Some(log) => logs.push(log),
                None => skipped += 1,
            },
            Err(e) => {
                tracing::warn!(row = i + 1, error = %e, "Skipping malformed player stats row");
                skipped += 1;
            }
        }
    }

    if logs.is_empty() && skipped > 0 {
        return Err(ProviderError::Parse {
            source_name: "nflverse player_stats",
            message: format!("no usable rows ({skipped} skipped)"),
        });
    }
    if skipped > 0 {
        tracing::debug!(skipped, parsed = logs.len(), "Player stats rows without identity skipped");
    }
    Ok(logs)
}

/// [`StatsProvider`] backed by nflverse release files
pub struct NflverseStatsClient {
    source: NflverseSource,
}

impl NflverseStatsClient {
    pub fn new(source: NflverseSource) -> Self {
        Self { source }
    }
}

#[async_trait]
impl StatsProvider for NflverseStatsClient {
    async fn weekly_stats(&self, season: i32) -> Result<Vec<GameLog>, ProviderError> {
        let text = self.source.fetch_csv(Dataset::PlayerStats, season).await?;
        let logs = parse_player_stats(text.as_bytes())?;
        tracing::info!(season, rows = logs.len(), "Loaded weekly player stats");
        Ok(logs)
    }
}
