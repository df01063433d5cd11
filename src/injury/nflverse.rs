//! nflverse weekly injury reports

use super::{InjuryProvider, InjuryReport, InjuryStatus};
use crate::data::{Dataset, NflverseSource};
use crate::error::ProviderError;
use async_trait::async_trait;
use serde::Deserialize;
use std::io::Read;

#[derive(Debug, Deserialize)]
struct RawInjuryRow {
    #[serde(default)]
    full_name: Option<String>,
    #[serde(default)]
    player_name: Option<String>,
    #[serde(default)]
    player: Option<String>,
    #[serde(default, deserialize_with = "csv::invalid_option")]
    week: Option<u32>,
    #[serde(default)]
    gsis_status: Option<String>,
    #[serde(default)]
    report_status: Option<String>,
    #[serde(default)]
    injury_status: Option<String>,
    #[serde(default)]
    status: Option<String>,
}

fn first_nonempty<'a>(candidates: &[&'a Option<String>]) -> Option<&'a str> {
    candidates
        .iter()
        .filter_map(|c| Option::as_deref(*c))
        .map(str::trim)
        .find(|s| !s.is_empty() && !s.eq_ignore_ascii_case("na"))
}

/// Parse an injuries CSV, keeping rows for `week`.
///
/// Rows without a week column are kept. When a player appears more than
/// once, the worst status is kept.
pub fn parse_injuries<R: Read>(reader: R, week: u32) -> Result<InjuryReport, ProviderError> {
    let mut rdr = csv::ReaderBuilder::new().flexible(true).from_reader(reader);

    let mut report = InjuryReport::new();
    for (i, result) in rdr.deserialize::<RawInjuryRow>().enumerate() {
        let row = match result {
            Ok(row) => row,
            Err(e) => {
                tracing::warn!(row = i + 1, error = %e, "Skipping malformed injury row");
                continue;
            }
        };

        if row.week.is_some_and(|w| w != week) {
            continue;
        }
        let Some(player) = first_nonempty(&[&row.full_name, &row.player_name, &row.player]) else {
            continue;
        };
        let Some(status) = first_nonempty(&[
            &row.gsis_status,
            &row.report_status,
            &row.injury_status,
            &row.status,
        ]) else {
            continue;
        };

        report.record(player, InjuryStatus::parse(status));
    }
    Ok(report)
}

/// [`InjuryProvider`] backed by nflverse release files
pub struct NflverseInjuryClient {
    source: NflverseSource,
}

impl NflverseInjuryClient {
    pub fn new(source: NflverseSource) -> Self {
        Self { source }
    }
}

#[async_trait]
impl InjuryProvider for NflverseInjuryClient {
    async fn injuries(&self, season: i32, week: u32) -> Result<InjuryReport, ProviderError> {
        let text = self.source.fetch_csv(Dataset::Injuries, season).await?;
        let report = parse_injuries(text.as_bytes(), week)?;
        tracing::info!(season, week, players = report.len(), "Loaded injury report");
        Ok(report)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::player::PlayerKey;

    #[test]
    fn test_parse_filters_week() {
        let csv = "\
season,game_type,team,week,gsis_id,position,full_name,report_status,practice_status
2024,REG,KC,5,00-1,TE,Travis Kelce,Questionable,Limited
2024,REG,KC,6,00-1,TE,Travis Kelce,Out,DNP
2024,REG,SF,6,00-2,RB,Christian McCaffrey,,DNP
";
        let report = parse_injuries(csv.as_bytes(), 6).unwrap();
        assert_eq!(report.status(&PlayerKey::from_name("Travis Kelce")), InjuryStatus::Out);
        // No status text, nothing recorded
        assert_eq!(
            report.status(&PlayerKey::from_name("Christian McCaffrey")),
            InjuryStatus::Unknown
        );
        assert_eq!(report.len(), 1);
    }

    #[test]
    fn test_duplicate_reports_keep_worst() {
        let csv = "\
player_name,week,status
Tee Higgins,8,Questionable
Tee Higgins,8,Doubtful
";
        let report = parse_injuries(csv.as_bytes(), 8).unwrap();
        assert_eq!(report.status(&PlayerKey::from_name("Tee Higgins")), InjuryStatus::Doubtful);
    }
}
