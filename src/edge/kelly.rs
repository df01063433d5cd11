//! Kelly criterion stake sizing

use crate::model::{PROB_CEIL, PROB_FLOOR};
use crate::odds::AmericanOdds;
use rust_decimal::prelude::FromPrimitive;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;

/// Full Kelly fraction for a bet paying `b` net per unit: (b*p - q) / b.
///
/// Negative when the bet has no edge; callers floor it.
pub fn full_kelly(prob: f64, odds: AmericanOdds) -> f64 {
    let p = prob.clamp(PROB_FLOOR, PROB_CEIL);
    let q = 1.0 - p;
    let b = odds.net_payout();
    (b * p - q) / b
}

/// Fractional Kelly stake calculator
#[derive(Debug, Clone, PartialEq)]
pub struct KellyCalculator {
    /// Multiplier on full Kelly (0.5 = half Kelly)
    pub fraction: Decimal,
    /// Bankroll unit the stake is expressed in
    pub unit_size: Decimal,
}

impl KellyCalculator {
    pub fn new(fraction: Decimal, unit_size: Decimal) -> Self {
        Self {
            fraction,
            unit_size,
        }
    }

    /// Stake in units: max(0, full Kelly) * fraction * unit size.
    ///
    /// Not rounded; tables round when they print.
    pub fn stake(&self, full_kelly: f64) -> Decimal {
        if !full_kelly.is_finite() || full_kelly <= 0.0 {
            return dec!(0);
        }
        let Some(kelly) = Decimal::from_f64(full_kelly) else {
            return dec!(0);
        };
        (kelly * self.fraction * self.unit_size).max(dec!(0))
    }
}

impl Default for KellyCalculator {
    fn default() -> Self {
        Self::new(dec!(0.5), dec!(1))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn odds(v: i32) -> AmericanOdds {
        AmericanOdds::new(v).unwrap()
    }

    #[test]
    fn test_full_kelly_plus_money() {
        // b = 1.5, p = 0.5: (0.75 - 0.5) / 1.5
        let f = full_kelly(0.5, odds(150));
        assert!((f - 0.25 / 1.5).abs() < 1e-12);
    }

    #[test]
    fn test_full_kelly_minus_money() {
        // b = 0.5, p = 0.7: (0.35 - 0.3) / 0.5 = 0.1
        let f = full_kelly(0.7, odds(-200));
        assert!((f - 0.1).abs() < 1e-12);
    }

    #[test]
    fn test_stake_half_kelly() {
        let calc = KellyCalculator::new(dec!(0.5), dec!(2));
        assert_eq!(calc.stake(0.2), dec!(0.2));
    }

    #[test]
    fn test_tiny_edge_keeps_a_positive_stake() {
        let calc = KellyCalculator::default();
        let stake = calc.stake(0.00004);
        assert!(stake > dec!(0));
        assert!((stake - dec!(0.00002)).abs() < dec!(0.0000000001));
    }

    #[test]
    fn test_stake_never_negative() {
        let calc = KellyCalculator::default();
        assert_eq!(calc.stake(-0.3), dec!(0));
        assert_eq!(calc.stake(f64::NAN), dec!(0));
        for price in [-500, -110, 100, 250, 2000] {
            for p in [0.0, 0.01, 0.2, 0.5, 0.9, 1.0] {
                assert!(calc.stake(full_kelly(p, odds(price))) >= dec!(0));
            }
        }
    }
}
