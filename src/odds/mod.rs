//! Sportsbook prices for 2+ touchdown props
//!
//! Raw quotes come from an [`OddsProvider`]. Classification keeps only lines
//! that mean "two or more touchdowns", and the selector reduces them to the
//! best price per player.

mod classify;
mod client;
mod selector;

pub use classify::{classify_line, LineClass, ALT_TDS_MARKET, TDS_OVER_MARKET};
pub use client::{
    extract_player_name, nfl_week_window, ApiOutcome, OddsApiConfig, TheOddsApiClient, ODDS_API_URL,
};
pub use selector::{better_quote, OddsSelector, PricedQuote};

use crate::error::ProviderError;
use crate::player::PlayerKey;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Validated American odds price (>= +100 or <= -100)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "i32", into = "i32")]
pub struct AmericanOdds(i32);

impl AmericanOdds {
    /// Returns `None` for prices strictly between -100 and +100
    pub fn new(price: i32) -> Option<Self> {
        if price >= 100 || price <= -100 {
            Some(Self(price))
        } else {
            None
        }
    }

    /// Round a float price from an API payload
    pub fn from_f64(price: f64) -> Option<Self> {
        if !price.is_finite() {
            return None;
        }
        Self::new(price.round() as i32)
    }

    pub fn value(&self) -> i32 {
        self.0
    }

    /// Break-even probability implied by the price
    pub fn implied_probability(&self) -> f64 {
        let a = self.0 as f64;
        if a > 0.0 {
            100.0 / (a + 100.0)
        } else {
            -a / (-a + 100.0)
        }
    }

    /// Decimal odds (total return per unit staked)
    pub fn decimal(&self) -> f64 {
        1.0 + self.net_payout()
    }

    /// Net profit per unit staked on a win (Kelly's b)
    pub fn net_payout(&self) -> f64 {
        let a = self.0 as f64;
        if a > 0.0 {
            a / 100.0
        } else {
            100.0 / -a
        }
    }
}

impl TryFrom<i32> for AmericanOdds {
    type Error = String;

    fn try_from(value: i32) -> Result<Self, Self::Error> {
        Self::new(value).ok_or_else(|| format!("invalid American odds: {value}"))
    }
}

impl From<AmericanOdds> for i32 {
    fn from(odds: AmericanOdds) -> Self {
        odds.0
    }
}

impl fmt::Display for AmericanOdds {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:+}", self.0)
    }
}

/// Over/Under side of a prop outcome
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum QuoteSide {
    Over,
    Under,
}

/// One posted price from one book
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OddsQuote {
    /// Player as the book spells it
    pub player: String,
    /// Bookmaker key (lowercase)
    pub book: String,
    /// Market key, e.g. `player_tds_over`
    pub market: String,
    /// Raw outcome text (name/description/label)
    pub label: String,
    /// Outcome side when the book states one
    pub side: Option<QuoteSide>,
    /// Raw American price as posted
    pub price: i32,
    /// Line threshold, if any
    pub point: Option<f64>,
    /// Provider event identifier
    pub event_id: String,
    pub home_team: Option<String>,
    pub away_team: Option<String>,
}

impl OddsQuote {
    pub fn key(&self) -> PlayerKey {
        PlayerKey::from_name(&self.player)
    }
}

/// Source of posted prop prices
#[async_trait]
pub trait OddsProvider: Send + Sync {
    /// All quotes for the week's games across books
    async fn fetch_quotes(&self, season: i32, week: u32) -> Result<Vec<OddsQuote>, ProviderError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_invalid_prices_rejected() {
        assert!(AmericanOdds::new(0).is_none());
        assert!(AmericanOdds::new(99).is_none());
        assert!(AmericanOdds::new(-99).is_none());
        assert!(AmericanOdds::new(100).is_some());
        assert!(AmericanOdds::new(-100).is_some());
        assert!(AmericanOdds::from_f64(f64::NAN).is_none());
        assert_eq!(AmericanOdds::from_f64(149.6).unwrap().value(), 150);
    }

    #[test]
    fn test_implied_probability() {
        let plus = AmericanOdds::new(150).unwrap();
        assert!((plus.implied_probability() - 0.40).abs() < 1e-12);

        let minus = AmericanOdds::new(-150).unwrap();
        assert!((minus.implied_probability() - 0.60).abs() < 1e-12);

        let even = AmericanOdds::new(100).unwrap();
        assert!((even.implied_probability() - 0.5).abs() < 1e-12);
    }

    #[test]
    fn test_decimal_and_net_payout() {
        let plus = AmericanOdds::new(250).unwrap();
        assert!((plus.net_payout() - 2.5).abs() < 1e-12);
        assert!((plus.decimal() - 3.5).abs() < 1e-12);

        let minus = AmericanOdds::new(-200).unwrap();
        assert!((minus.net_payout() - 0.5).abs() < 1e-12);
        // decimal is the reciprocal of implied probability
        assert!((minus.decimal() * minus.implied_probability() - 1.0).abs() < 1e-12);
    }

    #[test]
    fn test_display_signed() {
        assert_eq!(AmericanOdds::new(120).unwrap().to_string(), "+120");
        assert_eq!(AmericanOdds::new(-110).unwrap().to_string(), "-110");
    }
}
