//! Estimator configuration.

use eqmon_core::constants::{
    DAMPING_SENSITIVITY, DAMPING_WARMUP, DEFAULT_HISTORY_SIZE, IMBALANCE_EPSILON, MOMENTUM_GAIN,
    MOMENTUM_WINDOW, NEUTRAL_PARAM, PARAM_BASE, PARAM_MAX, PARAM_MIN, PARAM_RANGE,
    VOLATILITY_SCALE,
};
use eqmon_core::{MarketReading, ReadingOrigin};
use serde::{Deserialize, Serialize};

/// Which λ estimator to use.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CouplingMethod {
    /// Imbalance when the reading carries volumes, momentum otherwise.
    #[default]
    Auto,
    Imbalance,
    Momentum,
}

impl CouplingMethod {
    /// Resolve `Auto` against the current reading.
    pub fn resolve(self, reading: &MarketReading) -> CouplingMethod {
        match self {
            Self::Auto => {
                if reading.origin == ReadingOrigin::Orderbook || reading.volume_reported {
                    Self::Imbalance
                } else {
                    Self::Momentum
                }
            }
            other => other,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Auto => "auto",
            Self::Imbalance => "imbalance",
            Self::Momentum => "momentum",
        }
    }
}

/// Configuration for η/λ estimation.
///
/// The numeric defaults are the empirically chosen constants; change them
/// only with a domain reason.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EstimatorConfig {
    /// Price history capacity.
    #[serde(default = "default_max_history_size")]
    pub max_history_size: usize,
    #[serde(default)]
    pub coupling: CouplingMethod,
    /// Average |imbalance| with the spread factor when a spread is known.
    #[serde(default = "default_true")]
    pub blend_spread: bool,
    /// Minimum buffered prices before η is estimated.
    #[serde(default = "default_warmup")]
    pub warmup_samples: usize,
    /// Trailing window for momentum.
    #[serde(default = "default_momentum_window")]
    pub momentum_window: usize,
    #[serde(default = "default_volatility_scale")]
    pub volatility_scale: f64,
    #[serde(default = "default_eta_sensitivity")]
    pub eta_sensitivity: f64,
    #[serde(default = "default_momentum_gain")]
    pub momentum_gain: f64,
    #[serde(default = "default_param_base")]
    pub param_base: f64,
    #[serde(default = "default_param_range")]
    pub param_range: f64,
    /// Value returned when an estimator has too little data.
    #[serde(default = "default_neutral")]
    pub neutral: f64,
    #[serde(default = "default_imbalance_epsilon")]
    pub imbalance_epsilon: f64,
}

fn default_max_history_size() -> usize {
    DEFAULT_HISTORY_SIZE
}

fn default_true() -> bool {
    true
}

fn default_warmup() -> usize {
    DAMPING_WARMUP
}

fn default_momentum_window() -> usize {
    MOMENTUM_WINDOW
}

fn default_volatility_scale() -> f64 {
    VOLATILITY_SCALE
}

fn default_eta_sensitivity() -> f64 {
    DAMPING_SENSITIVITY
}

fn default_momentum_gain() -> f64 {
    MOMENTUM_GAIN
}

fn default_param_base() -> f64 {
    PARAM_BASE
}

fn default_param_range() -> f64 {
    PARAM_RANGE
}

fn default_neutral() -> f64 {
    NEUTRAL_PARAM
}

fn default_imbalance_epsilon() -> f64 {
    IMBALANCE_EPSILON
}

impl Default for EstimatorConfig {
    fn default() -> Self {
        Self {
            max_history_size: default_max_history_size(),
            coupling: CouplingMethod::default(),
            blend_spread: true,
            warmup_samples: default_warmup(),
            momentum_window: default_momentum_window(),
            volatility_scale: default_volatility_scale(),
            eta_sensitivity: default_eta_sensitivity(),
            momentum_gain: default_momentum_gain(),
            param_base: default_param_base(),
            param_range: default_param_range(),
            neutral: default_neutral(),
            imbalance_epsilon: default_imbalance_epsilon(),
        }
    }
}

impl EstimatorConfig {
    /// Validate configuration values.
    pub fn validate(&self) -> Result<(), String> {
        if self.max_history_size == 0 {
            return Err("max_history_size must be positive".to_string());
        }
        // One return needs two prices.
        if self.warmup_samples < 2 {
            return Err(format!(
                "warmup_samples ({}) must be at least 2",
                self.warmup_samples
            ));
        }
        if self.momentum_window < 2 {
            return Err(format!(
                "momentum_window ({}) must be at least 2",
                self.momentum_window
            ));
        }
        if !(PARAM_MIN..=PARAM_MAX).contains(&self.neutral) {
            return Err(format!(
                "neutral ({}) must lie in [{PARAM_MIN}, {PARAM_MAX}]",
                self.neutral
            ));
        }
        for (name, value) in [
            ("volatility_scale", self.volatility_scale),
            ("eta_sensitivity", self.eta_sensitivity),
            ("momentum_gain", self.momentum_gain),
            ("param_range", self.param_range),
            ("imbalance_epsilon", self.imbalance_epsilon),
        ] {
            if !(value.is_finite() && value > 0.0) {
                return Err(format!("{name} ({value}) must be positive"));
            }
        }
        if !self.param_base.is_finite() {
            return Err("param_base must be finite".to_string());
        }
        Ok(())
    }
}
