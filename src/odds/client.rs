//! The Odds API (v4) client for NFL touchdown props
//!
//! Lists the week's events, then queries each event's player touchdown
//! markets. The over/under totals market is tried first; the alternate
//! ladder is queried whenever the totals carry no 2+ line for that event,
//! which is common when books only post Over 0.5.

use super::{
    classify_line, LineClass, OddsProvider, OddsQuote, QuoteSide, ALT_TDS_MARKET, TDS_OVER_MARKET,
};
use crate::error::ProviderError;
use async_trait::async_trait;
use chrono::{DateTime, Datelike, Duration as ChronoDuration, NaiveDate, TimeZone, Utc};
use regex::Regex;
use reqwest::{Client, StatusCode};
use serde::Deserialize;
use std::sync::OnceLock;
use std::time::Duration;

/// The Odds API base URL
pub const ODDS_API_URL: &str = "https://api.the-odds-api.com/v4";

const SPORT: &str = "americanfootball_nfl";
const SOURCE_NAME: &str = "the-odds-api";

/// Configuration for the odds client
#[derive(Debug, Clone)]
pub struct OddsApiConfig {
    pub base_url: String,
    pub api_key: String,
    /// Comma separated region list
    pub regions: String,
    pub timeout: Duration,
    /// Days added on both sides of the Thursday-to-Wednesday week
    pub widen_days: i64,
}

impl OddsApiConfig {
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            base_url: ODDS_API_URL.to_string(),
            api_key: api_key.into(),
            regions: "us,us2".to_string(),
            timeout: Duration::from_secs(25),
            widen_days: 2,
        }
    }
}

/// Client for The Odds API
pub struct TheOddsApiClient {
    config: OddsApiConfig,
    client: Client,
}

impl TheOddsApiClient {
    pub fn new(config: OddsApiConfig) -> Result<Self, ProviderError> {
        let client = Client::builder().timeout(config.timeout).build()?;
        Ok(Self { config, client })
    }

    fn base_params(&self) -> Vec<(&'static str, String)> {
        vec![
            ("apiKey", self.config.api_key.clone()),
            ("regions", self.config.regions.clone()),
            ("oddsFormat", "american".to_string()),
        ]
    }

    /// Events kicking off inside the week's window
    async fn events_for_week(&self, season: i32, week: u32) -> Result<Vec<ApiEvent>, ProviderError> {
        let (from, to) = nfl_week_window(season, week, self.config.widen_days);
        let url = format!("{}/sports/{}/events", self.config.base_url, SPORT);

        let mut params = self.base_params();
        params.push(("commenceTimeFrom", format_api_time(from)));
        params.push(("commenceTimeTo", format_api_time(to)));

        tracing::debug!(url = %url, season, week, "Fetching NFL events");

        let response = self.client.get(&url).query(&params).send().await?;
        if !response.status().is_success() {
            let status = response.status().as_u16();
            let body = response.text().await.unwrap_or_default();
            return Err(ProviderError::Status {
                source_name: SOURCE_NAME,
                status,
                body,
            });
        }

        let events: Vec<ApiEvent> = response.json().await?;
        tracing::info!(season, week, events = events.len(), "Found NFL events for week");
        Ok(events)
    }

    /// Quotes for one event and market; `None` when the market is not offered
    async fn event_market_quotes(
        &self,
        event: &ApiEvent,
        market: &str,
    ) -> Result<Option<Vec<OddsQuote>>, ProviderError> {
        let url = format!("{}/sports/{}/events/{}/odds", self.config.base_url, SPORT, event.id);

        let mut params = self.base_params();
        params.push(("markets", market.to_string()));

        let response = self.client.get(&url).query(&params).send().await?;
        let status = response.status();
        if status == StatusCode::NOT_FOUND || status == StatusCode::UNPROCESSABLE_ENTITY {
            tracing::debug!(event = %event.id, market, status = status.as_u16(), "Market not offered");
            return Ok(None);
        }
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(ProviderError::Status {
                source_name: SOURCE_NAME,
                status: status.as_u16(),
                body,
            });
        }

        let odds: ApiEventOdds = response.json().await?;
        Ok(Some(convert_event_odds(event, market, odds)))
    }
}

#[async_trait]
impl OddsProvider for TheOddsApiClient {
    async fn fetch_quotes(&self, season: i32, week: u32) -> Result<Vec<OddsQuote>, ProviderError> {
        let events = self.events_for_week(season, week).await?;

        let mut quotes = Vec::new();
        for event in &events {
            for market in [TDS_OVER_MARKET, ALT_TDS_MARKET] {
                let Some(found) = self.event_market_quotes(event, market).await? else {
                    continue;
                };
                let has_two_plus = found.iter().any(|q| classify_line(q) == LineClass::TwoPlus);
                quotes.extend(found);
                if has_two_plus {
                    break;
                }
            }
        }

        tracing::info!(season, week, quotes = quotes.len(), "Fetched touchdown prop quotes");
        Ok(quotes)
    }
}

fn convert_event_odds(event: &ApiEvent, market: &str, odds: ApiEventOdds) -> Vec<OddsQuote> {
    let mut quotes = Vec::new();
    for bookmaker in odds.bookmakers {
        let book = bookmaker.key.to_lowercase();
        for mk in bookmaker.markets.into_iter().filter(|m| m.key == market) {
            for outcome in mk.outcomes {
                let Some(price) = outcome.price else {
                    continue;
                };
                let Some(player) = extract_player_name(&outcome) else {
                    continue;
                };
                let label = [&outcome.name, &outcome.description, &outcome.label]
                    .into_iter()
                    .flatten()
                    .map(|s| s.trim())
                    .filter(|s| !s.is_empty())
                    .collect::<Vec<_>>()
                    .join(" ");

                quotes.push(OddsQuote {
                    player,
                    book: book.clone(),
                    market: mk.key.clone(),
                    side: outcome_side(&outcome),
                    label,
                    price: price.round() as i32,
                    point: outcome.point,
                    event_id: event.id.clone(),
                    home_team: event.home_team.clone(),
                    away_team: event.away_team.clone(),
                });
            }
        }
    }
    quotes
}

fn outcome_side(outcome: &ApiOutcome) -> Option<QuoteSide> {
    match outcome.name.as_deref().map(|n| n.trim().to_lowercase()) {
        Some(n) if n == "over" || n == "yes" => Some(QuoteSide::Over),
        Some(n) if n == "under" || n == "no" => Some(QuoteSide::Under),
        _ => None,
    }
}

fn name_patterns() -> &'static [Regex] {
    static PATTERNS: OnceLock<Vec<Regex>> = OnceLock::new();
    PATTERNS.get_or_init(|| {
        [
            // "<Player> Over 1.5"
            r"(?i)^(?P<player>.+?)\s+(?:over|under)\b.*$",
            // "Over 1.5 - <Player>"
            r"(?i)^(?:over|under)\b.*?[-–]\s*(?P<player>.+)$",
            // "Over 1.5 (<Player>)"
            r"(?i)^(?:over|under)\b.*?\((?P<player>.+)\)$",
            // "Over 1.5 <Player>"
            r"(?i)^(?:over|under)\b.*?\s(?P<player>[A-Za-z][A-Za-z .'\-]+)$",
        ]
        .into_iter()
        .filter_map(|p| Regex::new(p).ok())
        .collect()
    })
}

/// Pull the player name out of a prop outcome.
///
/// Books put the name in different fields and often leave `name` as just
/// "Over"/"Under".
pub fn extract_player_name(outcome: &ApiOutcome) -> Option<String> {
    let candidates = [
        &outcome.participant,
        &outcome.player,
        &outcome.description,
        &outcome.label,
        &outcome.name,
    ];

    for raw in candidates.into_iter().flatten() {
        let text = raw.trim();
        if text.is_empty() {
            continue;
        }
        let lowered = text.to_lowercase();
        if lowered == "over" || lowered == "under" || lowered == "yes" || lowered == "no" {
            continue;
        }

        for pattern in name_patterns() {
            if let Some(player) = pattern.captures(text).and_then(|c| c.name("player")) {
                let player = player.as_str().trim();
                if !player.is_empty() {
                    return Some(player.to_string());
                }
            }
        }

        return Some(text.to_string());
    }
    None
}

/// UTC window covering an NFL week.
///
/// Week 1 starts on the first Thursday of September; each later week is
/// seven days on. The window is widened by `widen_days` on both sides.
pub fn nfl_week_window(season: i32, week: u32, widen_days: i64) -> (DateTime<Utc>, DateTime<Utc>) {
    let sept_first = NaiveDate::from_ymd_opt(season, 9, 1).unwrap_or_default();
    let offset = (3 + 7 - sept_first.weekday().num_days_from_monday() as i64) % 7;
    let kickoff = sept_first + ChronoDuration::days(offset);

    let week_start = kickoff + ChronoDuration::days(7 * (week.max(1) as i64 - 1));
    let start_date = week_start - ChronoDuration::days(widen_days);
    let start = Utc.from_utc_datetime(&start_date.and_hms_opt(0, 0, 0).unwrap_or_default());
    let end = start + ChronoDuration::days(7 + 2 * widen_days);
    (start, end)
}

fn format_api_time(t: DateTime<Utc>) -> String {
    t.format("%Y-%m-%dT%H:%M:%SZ").to_string()
}

// API response types

#[derive(Debug, Clone, Deserialize)]
struct ApiEvent {
    id: String,
    #[serde(default)]
    home_team: Option<String>,
    #[serde(default)]
    away_team: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ApiEventOdds {
    #[serde(default)]
    bookmakers: Vec<ApiBookmaker>,
}

#[derive(Debug, Deserialize)]
struct ApiBookmaker {
    key: String,
    #[serde(default)]
    markets: Vec<ApiMarket>,
}

#[derive(Debug, Deserialize)]
struct ApiMarket {
    key: String,
    #[serde(default)]
    outcomes: Vec<ApiOutcome>,
}

/// One outcome inside a bookmaker market
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ApiOutcome {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub label: Option<String>,
    #[serde(default)]
    pub participant: Option<String>,
    #[serde(default)]
    pub player: Option<String>,
    #[serde(default)]
    pub price: Option<f64>,
    #[serde(default)]
    pub point: Option<f64>,
}
