//! Market line classification
//!
//! Decides whether a posted outcome means exactly "two or more touchdowns".
//! Anytime (1+), 3+ and Under outcomes must never leak into the 2+ table.

use super::{OddsQuote, QuoteSide};

/// Over/under touchdown totals market
pub const TDS_OVER_MARKET: &str = "player_tds_over";
/// Alternate rush + reception touchdown ladder
pub const ALT_TDS_MARKET: &str = "player_rush_reception_tds_alternate";

/// Alternate ladder rungs are whole numbers
const ALT_POINT_TOLERANCE: f64 = 0.01;

/// What a quote's line actually prices
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LineClass {
    /// At least two touchdowns (Over 1.5 or alt 2+)
    TwoPlus,
    /// Three or more touchdowns
    ThreePlus,
    /// Under side of a total
    Under,
    /// Anything else (anytime scorer, unknown market, unparseable)
    Other,
}

/// Classify one quote
pub fn classify_line(quote: &OddsQuote) -> LineClass {
    let text = quote.label.to_lowercase();

    if quote.side == Some(QuoteSide::Under) || mentions_under(&text) {
        return LineClass::Under;
    }

    match quote.point {
        Some(point) => classify_point(&quote.market, point),
        None => classify_text(&quote.market, &text),
    }
}

fn classify_point(market: &str, point: f64) -> LineClass {
    if !point.is_finite() {
        return LineClass::Other;
    }
    match market {
        TDS_OVER_MARKET if (1.5..2.5).contains(&point) => LineClass::TwoPlus,
        TDS_OVER_MARKET if point >= 2.5 => LineClass::ThreePlus,
        ALT_TDS_MARKET if (point - 2.0).abs() < ALT_POINT_TOLERANCE => LineClass::TwoPlus,
        ALT_TDS_MARKET if point >= 2.5 => LineClass::ThreePlus,
        _ => LineClass::Other,
    }
}

fn classify_text(market: &str, text: &str) -> LineClass {
    if market != TDS_OVER_MARKET && market != ALT_TDS_MARKET {
        return LineClass::Other;
    }
    if mentions_three_plus(text) {
        return LineClass::ThreePlus;
    }
    let two_plus = text.contains("2+") || text.contains("2 or more") || text.contains("two or more");
    if two_plus || (market == TDS_OVER_MARKET && mentions_over_one_and_half(text)) {
        LineClass::TwoPlus
    } else {
        LineClass::Other
    }
}

fn mentions_under(text: &str) -> bool {
    text.split(|c: char| !c.is_ascii_alphanumeric())
        .any(|word| word == "under")
}

fn mentions_three_plus(text: &str) -> bool {
    text.contains("3+")
        || text.contains("3 or more")
        || text.contains("three or more")
        || text.contains("2.5")
}

fn mentions_over_one_and_half(text: &str) -> bool {
    text.split(|c: char| !(c.is_ascii_digit() || c == '.'))
        .any(|token| token == "1.5")
}
