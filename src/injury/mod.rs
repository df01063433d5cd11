//! Injury report statuses

mod nflverse;

pub use nflverse::{parse_injuries, NflverseInjuryClient};

use crate::error::ProviderError;
use crate::player::PlayerKey;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;

/// Normalized game-status designation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum InjuryStatus {
    Out,
    Doubtful,
    Questionable,
    InjuredReserve,
    Pup,
    /// Non-football injury list
    Nfi,
    Suspended,
    Active,
    Unknown,
}

impl InjuryStatus {
    /// Parse a free-text report status
    pub fn parse(raw: &str) -> Self {
        match raw.trim().to_lowercase().as_str() {
            "out" | "inactive" | "questionable - inactive" => InjuryStatus::Out,
            "doubtful" => InjuryStatus::Doubtful,
            "questionable" => InjuryStatus::Questionable,
            "ir" | "injured reserve" | "reserve/injured" | "ir-r" => InjuryStatus::InjuredReserve,
            "pup" | "physically unable to perform" | "reserve/pup" => InjuryStatus::Pup,
            "nfi" | "non-football injury" | "reserve/nfi" => InjuryStatus::Nfi,
            "suspended" | "reserve/suspended" => InjuryStatus::Suspended,
            "active" | "probable" | "cleared" | "healthy" | "full" => InjuryStatus::Active,
            _ => InjuryStatus::Unknown,
        }
    }

    /// Statuses that remove a player when the injury filter is on
    pub fn is_excluded(&self) -> bool {
        matches!(
            self,
            InjuryStatus::Out
                | InjuryStatus::Doubtful
                | InjuryStatus::InjuredReserve
                | InjuryStatus::Pup
                | InjuryStatus::Nfi
                | InjuryStatus::Suspended
        )
    }

    /// Lower is worse; used to keep the most pessimistic of several reports
    fn severity(&self) -> u8 {
        match self {
            InjuryStatus::Suspended => 0,
            InjuryStatus::InjuredReserve => 1,
            InjuryStatus::Pup => 2,
            InjuryStatus::Nfi => 3,
            InjuryStatus::Out => 4,
            InjuryStatus::Doubtful => 5,
            InjuryStatus::Questionable => 6,
            InjuryStatus::Active => 7,
            InjuryStatus::Unknown => 8,
        }
    }
}

impl fmt::Display for InjuryStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            InjuryStatus::Out => "out",
            InjuryStatus::Doubtful => "doubtful",
            InjuryStatus::Questionable => "questionable",
            InjuryStatus::InjuredReserve => "ir",
            InjuryStatus::Pup => "pup",
            InjuryStatus::Nfi => "nfi",
            InjuryStatus::Suspended => "suspended",
            InjuryStatus::Active => "active",
            InjuryStatus::Unknown => "unknown",
        };
        f.write_str(s)
    }
}

/// Week injury report keyed by player
#[derive(Debug, Clone, Default)]
pub struct InjuryReport {
    statuses: HashMap<PlayerKey, InjuryStatus>,
}

impl InjuryReport {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a status, keeping the worse one if the player already has an entry
    pub fn record(&mut self, player: &str, status: InjuryStatus) {
        let key = PlayerKey::from_name(player);
        if key.is_empty() {
            return;
        }
        self.statuses
            .entry(key)
            .and_modify(|existing| {
                if status.severity() < existing.severity() {
                    *existing = status;
                }
            })
            .or_insert(status);
    }

    /// Status for a player; unlisted players are `Unknown`
    pub fn status(&self, key: &PlayerKey) -> InjuryStatus {
        self.statuses.get(key).copied().unwrap_or(InjuryStatus::Unknown)
    }

    pub fn len(&self) -> usize {
        self.statuses.len()
    }

    pub fn is_empty(&self) -> bool {
        self.statuses.is_empty()
    }
}

/// Source of weekly injury designations
#[async_trait]
pub trait InjuryProvider: Send + Sync {
    async fn injuries(&self, season: i32, week: u32) -> Result<InjuryReport, ProviderError>;
}
