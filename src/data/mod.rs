//! nflverse release files
//!
//! Season CSVs are fetched from the nflverse-data GitHub releases, or read
//! from a local mirror directory when one is configured.

use crate::error::ProviderError;
use reqwest::{Client, StatusCode};
use std::path::PathBuf;
use std::time::Duration;

/// nflverse-data release download root
pub const NFLVERSE_RELEASES_URL: &str = "https://github.com/nflverse/nflverse-data/releases/download";

const SOURCE_NAME: &str = "nflverse";

/// Published nflverse dataset
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Dataset {
    PlayerStats,
    Injuries,
}

impl Dataset {
    /// Release tag the files live under
    fn tag(&self) -> &'static str {
        match self {
            Dataset::PlayerStats => "player_stats",
            Dataset::Injuries => "injuries",
        }
    }

    /// File name for a season, e.g. `player_stats_2024.csv`
    pub fn file_name(&self, season: i32) -> String {
        format!("{}_{}.csv", self.tag(), season)
    }
}

/// Configuration for the nflverse source
#[derive(Debug, Clone)]
pub struct NflverseConfig {
    pub base_url: String,
    /// Read files from here instead of the network
    pub local_dir: Option<PathBuf>,
    pub timeout: Duration,
}

impl Default for NflverseConfig {
    fn default() -> Self {
        Self {
            base_url: NFLVERSE_RELEASES_URL.to_string(),
            local_dir: None,
            timeout: Duration::from_secs(60),
        }
    }
}

/// Fetches raw season CSV text
#[derive(Clone)]
pub struct NflverseSource {
    config: NflverseConfig,
    client: Client,
}

impl NflverseSource {
    pub fn new(config: NflverseConfig) -> Result<Self, ProviderError> {
        let client = Client::builder().timeout(config.timeout).build()?;
        Ok(Self { config, client })
    }

    /// Release URL for a dataset file
    pub fn url(&self, dataset: Dataset, season: i32) -> String {
        format!(
            "{}/{}/{}",
            self.config.base_url.trim_end_matches('/'),
            dataset.tag(),
            dataset.file_name(season)
        )
    }

    /// CSV text for one season.
    ///
    /// A missing local file or an HTTP 404 means the season is not published.
    pub async fn fetch_csv(&self, dataset: Dataset, season: i32) -> Result<String, ProviderError> {
        if let Some(dir) = &self.config.local_dir {
            let path = dir.join(dataset.file_name(season));
            tracing::debug!(path = %path.display(), "Reading local nflverse file");
            return match tokio::fs::read_to_string(&path).await {
                Ok(text) => Ok(text),
                Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                    Err(ProviderError::NotPublished { season })
                }
                Err(e) => Err(e.into()),
            };
        }

        let url = self.url(dataset, season);
        tracing::debug!(url = %url, "Downloading nflverse file");

        let response = self.client.get(&url).send().await?;
        let status = response.status();
        if status == StatusCode::NOT_FOUND {
            return Err(ProviderError::NotPublished { season });
        }
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(ProviderError::Status {
                source_name: SOURCE_NAME,
                status: status.as_u16(),
                body,
            });
        }

        Ok(response.text().await?)
    }
}
