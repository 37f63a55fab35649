//! η (damping) from return volatility.
//!
//! `eta = base + range / (1 + sensitivity * min(volatility * scale, 1))`,
//! so higher volatility never yields a higher η.

use crate::config::EstimatorConfig;
use eqmon_core::types::clamp_param;

/// Population standard deviation of simple returns.
///
/// Returns whose previous price is not positive are skipped. `None` when no
/// return can be formed. Overflowing returns can make the result non-finite.
pub fn return_volatility<I>(prices: I) -> Option<f64>
where
    I: IntoIterator<Item = f64>,
{
    let mut prev: Option<f64> = None;
    let mut returns = Vec::new();
    for price in prices {
        if let Some(p) = prev.filter(|p| *p > 0.0) {
            returns.push((price - p) / p);
        }
        prev = Some(price);
    }

    if returns.is_empty() {
        return None;
    }

    let n = returns.len() as f64;
    let mean = returns.iter().sum::<f64>() / n;
    let variance = returns.iter().map(|r| (r - mean).powi(2)).sum::<f64>() / n;
    Some(variance.sqrt())
}

/// Estimate η from buffered prices, oldest first.
pub fn estimate_eta(prices: &[f64], config: &EstimatorConfig) -> f64 {
    if prices.len() < config.warmup_samples {
        return config.neutral;
    }
    let Some(volatility) = return_volatility(prices.iter().copied()) else {
        return config.neutral;
    };

    // Non-finite volatility is as extreme as it gets.
    let normalized = if volatility.is_finite() {
        (volatility * config.volatility_scale).min(1.0)
    } else {
        1.0
    };
    let eta = config.param_base + config.param_range / (1.0 + config.eta_sensitivity * normalized);
    clamp_param(eta)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::{Rng, SeedableRng};

    /// Alternating up/down moves of the given relative amplitude.
    fn oscillating(len: usize, amplitude: f64) -> Vec<f64> {
        (0..len)
            .map(|i| if i % 2 == 0 { 100.0 } else { 100.0 * (1.0 + amplitude) })
            .collect()
    }

    #[test]
    fn test_warmup_returns_neutral() {
        let config = EstimatorConfig::default();
        for len in 0..10 {
            let prices = oscillating(len, 0.5);
            assert_eq!(estimate_eta(&prices, &config), 0.707);
        }
    }

    #[test]
    fn test_flat_prices_give_maximum_eta() {
        let config = EstimatorConfig::default();
        let prices = vec![50.0; 30];
        assert!((estimate_eta(&prices, &config) - 0.9).abs() < 1e-12);
    }

    #[test]
    fn test_saturated_volatility_gives_minimum_formula_value() {
        let config = EstimatorConfig::default();
        let prices = oscillating(30, 0.5);
        let expected = 0.3 + 0.6 / 11.0;
        assert!((estimate_eta(&prices, &config) - expected).abs() < 1e-12);
    }

    #[test]
    fn test_eta_monotone_in_volatility() {
        let config = EstimatorConfig::default();
        let amplitudes = [0.0, 0.0001, 0.0005, 0.001, 0.002, 0.005, 0.01, 0.05, 0.2];
        let etas: Vec<f64> = amplitudes
            .iter()
            .map(|a| estimate_eta(&oscillating(40, *a), &config))
            .collect();
        for pair in etas.windows(2) {
            assert!(pair[0] >= pair[1], "eta not monotone: {etas:?}");
        }
    }

    #[test]
    fn test_eta_always_in_range() {
        let config = EstimatorConfig::default();
        let mut rng = StdRng::seed_from_u64(11);
        for _ in 0..200 {
            let len = rng.gen_range(0..60);
            let prices: Vec<f64> = (0..len).map(|_| rng.gen_range(-10.0..1000.0)).collect();
            let eta = estimate_eta(&prices, &config);
            assert!((0.1..=0.95).contains(&eta), "eta out of range: {eta}");
        }
    }

    #[test]
    fn test_overflowing_returns_saturate() {
        let config = EstimatorConfig::default();
        let prices: Vec<f64> = (0..12)
            .map(|i| if i % 2 == 0 { 1e-300 } else { 1e300 })
            .collect();
        assert!(!return_volatility(prices.iter().copied()).unwrap().is_finite());

        let eta = estimate_eta(&prices, &config);
        let saturated = 0.3 + 0.6 / 11.0;
        assert!((eta - saturated).abs() < 1e-12);
        assert!(eta <= estimate_eta(&oscillating(12, 0.5), &config));
    }

    #[test]
    fn test_non_positive_previous_prices_skipped() {
        assert_eq!(return_volatility([0.0, 0.0, 0.0]), None);
        let vol = return_volatility([0.0, 1.0, 1.0]).unwrap();
        assert_eq!(vol, 0.0);
    }
}
