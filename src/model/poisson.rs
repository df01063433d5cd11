//! Poisson touchdown-count model
//!
//! Treats a player's per-game touchdown rate as the mean of a Poisson
//! distribution: P(2+) = 1 - e^-λ - λe^-λ

/// Smallest probability handed downstream
pub const PROB_FLOOR: f64 = 1e-9;
/// Largest probability handed downstream
pub const PROB_CEIL: f64 = 1.0 - 1e-9;

/// Probability of two or more touchdowns given mean rate λ
///
/// Negative or non-finite rates are treated as zero.
pub fn prob_two_plus(lambda: f64) -> f64 {
    let lambda = if lambda.is_finite() { lambda.max(0.0) } else { 0.0 };
    1.0 - (-lambda).exp() * (1.0 + lambda)
}

/// Clamp into the open interval so odds math never sees 0 or 1
pub fn clamp_probability(p: f64) -> f64 {
    if p.is_nan() {
        return PROB_FLOOR;
    }
    p.clamp(PROB_FLOOR, PROB_CEIL)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_zero_rate() {
        assert_eq!(prob_two_plus(0.0), 0.0);
    }

    #[test]
    fn test_known_value() {
        // λ = 1: 1 - 2/e
        let expected = 1.0 - 2.0 * (-1.0f64).exp();
        assert!((prob_two_plus(1.0) - expected).abs() < 1e-12);
    }

    #[test]
    fn test_monotonic_and_bounded() {
        let mut prev = -1.0;
        for i in 0..=400 {
            let lambda = i as f64 * 0.025;
            let p = prob_two_plus(lambda);
            assert!((0.0..1.0).contains(&p), "p={p} at λ={lambda}");
            assert!(p > prev || (i == 0 && p == 0.0));
            prev = p;
        }
    }

    #[test]
    fn test_negative_rate_treated_as_zero() {
        assert_eq!(prob_two_plus(-0.5), 0.0);
        assert_eq!(prob_two_plus(f64::NAN), 0.0);
    }

    #[test]
    fn test_clamp_open_interval() {
        assert_eq!(clamp_probability(0.0), PROB_FLOOR);
        assert_eq!(clamp_probability(1.0), PROB_CEIL);
        assert_eq!(clamp_probability(0.25), 0.25);
        assert_eq!(clamp_probability(f64::NAN), PROB_FLOOR);
    }
}
