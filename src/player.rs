//! Player identity normalization
//!
//! Stats, injury reports and sportsbooks spell names differently
//! ("A.J. Brown", "AJ Brown", "Kenneth Walker III"). Every join in the
//! pipeline goes through [`PlayerKey`] so those variants collapse together.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Generational suffixes dropped before keying
const NAME_SUFFIXES: &[&str] = &["jr", "sr", "ii", "iii", "iv"];

/// Normalized player join key: lowercase ASCII letters only
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct PlayerKey(String);

impl PlayerKey {
    /// Build a key from a display name
    pub fn from_name(name: &str) -> Self {
        let lowered = name.to_lowercase();
        let mut tokens: Vec<String> = lowered
            .split_whitespace()
            .map(|t| t.chars().filter(|c| c.is_ascii_lowercase()).collect::<String>())
            .filter(|t| !t.is_empty())
            .collect();

        // Keep at least one token so "Jr" alone still keys to something
        while tokens.len() > 1 && tokens.last().is_some_and(|t| NAME_SUFFIXES.contains(&t.as_str())) {
            tokens.pop();
        }

        Self(tokens.concat())
    }

    /// Raw key text
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// True when the name had no usable letters
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl fmt::Display for PlayerKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}
