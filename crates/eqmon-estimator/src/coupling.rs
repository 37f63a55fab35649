//! λ (coupling) estimators.

use crate::config::EstimatorConfig;
use eqmon_core::types::clamp_param;

/// λ from bid/ask volume imbalance.
///
/// Both volumes zero yields the neutral value. With `blend_spread` and a known
/// spread, |imbalance| is averaged with `max(0, 1 - 2|spread|)`.
pub fn imbalance_coupling(
    bid_volume: f64,
    ask_volume: f64,
    price_spread: Option<f64>,
    config: &EstimatorConfig,
) -> f64 {
    if bid_volume == 0.0 && ask_volume == 0.0 {
        return config.neutral;
    }

    let imbalance = (bid_volume - ask_volume) / (bid_volume + ask_volume + config.imbalance_epsilon);
    let mut coupling = imbalance.abs();

    if config.blend_spread {
        if let Some(spread) = price_spread {
            let spread_factor = (1.0 - 2.0 * spread.abs()).max(0.0);
            coupling = (coupling + spread_factor) / 2.0;
        }
    }

    clamp_param(config.param_base + config.param_range * coupling)
}

/// λ from relative price change over the trailing momentum window.
pub fn momentum_coupling(prices: &[f64], config: &EstimatorConfig) -> f64 {
    let window = config.momentum_window;
    if window == 0 || prices.len() < window {
        return config.neutral;
    }

    let tail = &prices[prices.len() - window..];
    let first = tail[0];
    let last = tail[window - 1];
    if first == 0.0 || !first.is_finite() {
        return config.neutral;
    }

    let momentum = (last - first) / first;
    clamp_param(config.param_base + (config.momentum_gain * momentum.abs()).min(config.param_range))
}
