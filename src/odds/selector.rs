//! Best-price selection across books

use super::{classify_line, AmericanOdds, LineClass, OddsQuote};
use crate::player::PlayerKey;
use std::cmp::Ordering;
use std::collections::{BTreeMap, BTreeSet};

/// An accepted 2+ touchdown quote with its validated price
#[derive(Debug, Clone, PartialEq)]
pub struct PricedQuote {
    pub key: PlayerKey,
    pub odds: AmericanOdds,
    pub quote: OddsQuote,
}

/// Ordering where `Less` means `a` is the better bet for the bettor.
///
/// Higher payout first; equal payouts fall back to book key, then market
/// key, both ascending, so the choice never depends on input order.
pub fn better_quote(a: &PricedQuote, b: &PricedQuote) -> Ordering {
    b.odds
        .decimal()
        .total_cmp(&a.odds.decimal())
        .then_with(|| a.quote.book.cmp(&b.quote.book))
        .then_with(|| a.quote.market.cmp(&b.quote.market))
}

/// Filters quotes to true 2+ lines and picks the best price per player
#[derive(Debug, Clone, Default)]
pub struct OddsSelector {
    /// Allowed book keys, lowercase; `None` means every book
    books: Option<BTreeSet<String>>,
}

impl OddsSelector {
    /// Selector over every book
    pub fn all_books() -> Self {
        Self { books: None }
    }

    /// Restrict to the given book keys; an empty list means every book
    pub fn with_books<I, S>(books: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let set: BTreeSet<String> = books
            .into_iter()
            .map(|b| b.as_ref().trim().to_lowercase())
            .filter(|b| !b.is_empty())
            .collect();
        Self {
            books: if set.is_empty() { None } else { Some(set) },
        }
    }

    fn book_allowed(&self, book: &str) -> bool {
        match &self.books {
            Some(set) => set.contains(&book.to_lowercase()),
            None => true,
        }
    }

    /// Quote acceptance: allowed book, 2+ line, valid price, keyed player
    fn accept(&self, quote: &OddsQuote) -> Option<PricedQuote> {
        if !self.book_allowed(&quote.book) {
            return None;
        }
        if classify_line(quote) != LineClass::TwoPlus {
            return None;
        }
        let Some(odds) = AmericanOdds::new(quote.price) else {
            tracing::warn!(
                player = %quote.player,
                book = %quote.book,
                price = quote.price,
                "Skipping quote with invalid American price"
            );
            return None;
        };
        let key = quote.key();
        if key.is_empty() {
            return None;
        }
        Some(PricedQuote {
            key,
            odds,
            quote: quote.clone(),
        })
    }

    /// Every accepted quote (all books), ordered by player then price
    pub fn accepted(&self, quotes: &[OddsQuote]) -> Vec<PricedQuote> {
        let mut accepted: Vec<PricedQuote> = quotes.iter().filter_map(|q| self.accept(q)).collect();
        accepted.sort_by(|a, b| a.key.cmp(&b.key).then_with(|| better_quote(a, b)));
        accepted
    }

    /// Single best quote per player
    pub fn best_by_player(&self, quotes: &[OddsQuote]) -> BTreeMap<PlayerKey, PricedQuote> {
        let mut best: BTreeMap<PlayerKey, PricedQuote> = BTreeMap::new();
        for candidate in quotes.iter().filter_map(|q| self.accept(q)) {
            match best.get(&candidate.key) {
                Some(current) if better_quote(current, &candidate) != Ordering::Greater => {}
                _ => {
                    best.insert(candidate.key.clone(), candidate);
                }
            }
        }

        tracing::debug!(
            quotes = quotes.len(),
            players = best.len(),
            "Selected best 2+ TD price per player"
        );
        best
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::odds::{QuoteSide, ALT_TDS_MARKET, TDS_OVER_MARKET};

    fn quote(player: &str, book: &str, price: i32, point: f64) -> OddsQuote {
        OddsQuote {
            player: player.to_string(),
            book: book.to_string(),
            market: TDS_OVER_MARKET.to_string(),
            label: "Over".to_string(),
            side: Some(QuoteSide::Over),
            price,
            point: Some(point),
            event_id: "evt1".to_string(),
            home_team: Some("SF".to_string()),
            away_team: Some("LAR".to_string()),
        }
    }

    #[test]
    fn test_plus_beats_minus() {
        let quotes = vec![quote("X", "booka", 120, 1.5), quote("X", "bookb", -110, 1.5)];
        let best = OddsSelector::all_books().best_by_player(&quotes);
        let x = &best[&PlayerKey::from_name("X")];
        assert_eq!(x.odds.value(), 120);
        assert_eq!(x.quote.book, "booka");
    }

    #[test]
    fn test_never_selects_three_plus() {
        // The 3+ line pays far more but must be ignored
        let quotes = vec![quote("X", "booka", 900, 2.5), quote("X", "bookb", 350, 1.5)];
        let best = OddsSelector::all_books().best_by_player(&quotes);
        assert_eq!(best[&PlayerKey::from_name("X")].odds.value(), 350);

        let only_three = vec![quote("Y", "booka", 900, 2.5)];
        assert!(OddsSelector::all_books().best_by_player(&only_three).is_empty());
    }

    #[test]
    fn test_tie_breaks_on_book_key() {
        let forward = vec![quote("X", "fanduel", 300, 1.5), quote("X", "betmgm", 300, 1.5)];
        let reverse = vec![quote("X", "betmgm", 300, 1.5), quote("X", "fanduel", 300, 1.5)];

        let key = PlayerKey::from_name("X");
        let a = OddsSelector::all_books().best_by_player(&forward);
        let b = OddsSelector::all_books().best_by_player(&reverse);
        assert_eq!(a[&key].quote.book, "betmgm");
        assert_eq!(b[&key].quote.book, "betmgm");
    }

    #[test]
    fn test_even_money_sides_tie() {
        // +100 and -100 pay the same; book order decides
        let quotes = vec![quote("X", "zbook", 100, 1.5), quote("X", "abook", -100, 1.5)];
        let best = OddsSelector::all_books().best_by_player(&quotes);
        assert_eq!(best[&PlayerKey::from_name("X")].quote.book, "abook");
    }

    #[test]
    fn test_book_filter() {
        let quotes = vec![quote("X", "draftkings", 400, 1.5), quote("X", "fanduel", 300, 1.5)];
        let best = OddsSelector::with_books(["FanDuel"]).best_by_player(&quotes);
        assert_eq!(best[&PlayerKey::from_name("X")].quote.book, "fanduel");

        let everyone = OddsSelector::with_books(Vec::<String>::new()).best_by_player(&quotes);
        assert_eq!(everyone[&PlayerKey::from_name("X")].quote.book, "draftkings");
    }

    #[test]
    fn test_invalid_price_skipped() {
        let quotes = vec![quote("X", "booka", 0, 1.5)];
        assert!(OddsSelector::all_books().best_by_player(&quotes).is_empty());
    }

    #[test]
    fn test_dump_keeps_every_book() {
        let mut alt = quote("Y", "booka", 500, 2.0);
        alt.market = ALT_TDS_MARKET.to_string();
        let quotes = vec![
            quote("X", "booka", 250, 1.5),
            quote("X", "bookb", 300, 1.5),
            quote("X", "bookc", 700, 2.5),
            alt,
        ];

        let dumped = OddsSelector::all_books().accepted(&quotes);
        assert_eq!(dumped.len(), 3);
        // X before Y, and X's better price first
        assert_eq!(dumped[0].quote.book, "bookb");
        assert_eq!(dumped[1].quote.book, "booka");
        assert_eq!(dumped[2].quote.player, "Y");
    }
}
