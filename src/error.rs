//! Error types shared across the pipeline

use thiserror::Error;

/// Failures raised by external data collaborators (stats, injuries, odds)
#[derive(Debug, Error)]
pub enum ProviderError {
    /// The source has no data for the requested season yet
    #[error("no data published for season {season}")]
    NotPublished { season: i32 },
    /// Transport-level failure
    #[error("http request failed: {0}")]
    Http(#[from] reqwest::Error),
    /// Non-success response from the remote API
    #[error("{source_name} returned {status}: {body}")]
    Status {
        source_name: &'static str,
        status: u16,
        body: String,
    },
    /// Payload could not be decoded
    #[error("failed to parse {source_name} payload: {message}")]
    Parse {
        source_name: &'static str,
        message: String,
    },
    /// Local file access failed
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

/// Failures reading or writing the prediction log
#[derive(Debug, Error)]
pub enum LedgerError {
    #[error("prediction log io error at {path}: {source}")]
    Io {
        path: String,
        source: std::io::Error,
    },
    #[error("prediction log csv error at {path}: {source}")]
    Csv { path: String, source: csv::Error },
}

/// Top-level pipeline errors
#[derive(Debug, Error)]
pub enum PipelineError {
    /// Invalid or missing option
    #[error("configuration error: {0}")]
    Configuration(String),
    /// Neither the requested season nor the prior season has stats
    #[error("no stats available for season {season} or fallback season {fallback}")]
    DataUnavailable { season: i32, fallback: i32 },
    /// Odds, injury or stats fetch failed
    #[error(transparent)]
    Provider(#[from] ProviderError),
    /// Prediction log failure
    #[error(transparent)]
    Log(#[from] LedgerError),
}

/// Failures writing report exports
#[derive(Debug, Error)]
pub enum ExportError {
    #[error("failed to write {path}: {source}")]
    Io {
        path: String,
        source: std::io::Error,
    },
    #[error("failed to write csv {path}: {source}")]
    Csv { path: String, source: csv::Error },
}
