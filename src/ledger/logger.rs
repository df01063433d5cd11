//! Append-only prediction log

use super::LoggedPrediction;
use crate::edge::RankedRow;
use crate::error::LedgerError;
use chrono::{DateTime, Utc};
use std::fs::OpenOptions;
use std::path::{Path, PathBuf};

/// Appends ranked predictions to a CSV file
#[derive(Debug, Clone)]
pub struct PredictionLogger {
    path: PathBuf,
}

impl PredictionLogger {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn io_error(&self, source: std::io::Error) -> LedgerError {
        LedgerError::Io {
            path: self.path.display().to_string(),
            source,
        }
    }

    fn csv_error(&self, source: csv::Error) -> LedgerError {
        LedgerError::Csv {
            path: self.path.display().to_string(),
            source,
        }
    }

    /// Append one row per ranked player, stamped with the current time
    pub fn append(&self, season: i32, week: u32, rows: &[RankedRow]) -> Result<usize, LedgerError> {
        self.append_at(season, week, rows, Utc::now())
    }

    /// Append with an explicit timestamp.
    ///
    /// The header is written only when the file is new or empty; existing
    /// rows are never touched.
    pub fn append_at(
        &self,
        season: i32,
        week: u32,
        rows: &[RankedRow],
        timestamp: DateTime<Utc>,
    ) -> Result<usize, LedgerError> {
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent).map_err(|e| self.io_error(e))?;
        }

        let needs_header = match std::fs::metadata(&self.path) {
            Ok(meta) => meta.len() == 0,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => true,
            Err(e) => return Err(self.io_error(e)),
        };

        let file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)
            .map_err(|e| self.io_error(e))?;

        let mut writer = csv::WriterBuilder::new()
            .has_headers(needs_header)
            .from_writer(file);

        for row in rows {
            writer
                .serialize(LoggedPrediction::from_ranked(season, week, row, timestamp))
                .map_err(|e| self.csv_error(e))?;
        }
        writer.flush().map_err(|e| self.io_error(e))?;

        tracing::info!(
            path = %self.path.display(),
            season,
            week,
            rows = rows.len(),
            "Logged predictions"
        );
        Ok(rows.len())
    }
}
