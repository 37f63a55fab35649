//! Common data types for the monitoring pipeline.
//!
//! Contains the normalized market reading, the estimated control
//! parameters, and the interpreted result of the external computation.

use crate::constants::{
    DEFAULT_PRICE, DEFAULT_VOLUME, DELTA_SCALE, EFFICIENCY_PERCENT_DIVISOR, PARAM_MAX, PARAM_MIN,
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Where a reading came from.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum ReadingOrigin {
    /// Live ticker (last price and best-level volumes).
    Ticker,
    /// Order-book or trade-event snapshot (aggregate buy/sell volumes).
    Orderbook,
    /// Manufactured fallback. Never market truth.
    ///
    /// `reason` is a short category label (e.g. `unreachable`).
    Synthetic { reason: String },
}

impl ReadingOrigin {
    pub fn is_synthetic(&self) -> bool {
        matches!(self, Self::Synthetic { .. })
    }
}

impl std::fmt::Display for ReadingOrigin {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Ticker => write!(f, "TICKER"),
            Self::Orderbook => write!(f, "ORDERBOOK"),
            Self::Synthetic { .. } => write!(f, "SYNTHETIC"),
        }
    }
}

/// One normalized market tick.
///
/// Lives for a single cycle; only `price` is retained (in the history).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MarketReading {
    /// Last traded (or mid) price.
    pub price: f64,
    /// Bid-side (or buy) volume.
    pub bid_volume: f64,
    /// Ask-side (or sell) volume.
    pub ask_volume: f64,
    /// Best ask minus best bid, when the source reports both.
    pub price_spread: Option<f64>,
    /// Whether the source actually carried volume fields.
    pub volume_reported: bool,
    /// Source of this reading.
    pub origin: ReadingOrigin,
    /// Source timestamp, or receive time when the source has none.
    pub timestamp: DateTime<Utc>,
}

impl MarketReading {
    /// Reading with every field at its documented default.
    pub fn with_defaults(origin: ReadingOrigin) -> Self {
        Self {
            price: DEFAULT_PRICE,
            bid_volume: DEFAULT_VOLUME,
            ask_volume: DEFAULT_VOLUME,
            price_spread: None,
            volume_reported: false,
            origin,
            timestamp: Utc::now(),
        }
    }

    pub fn is_synthetic(&self) -> bool {
        self.origin.is_synthetic()
    }

    /// Total volume on both sides.
    pub fn total_volume(&self) -> f64 {
        self.bid_volume + self.ask_volume
    }
}

/// Clamp a parameter into `[PARAM_MIN, PARAM_MAX]`.
///
/// Non-finite values collapse to the lower bound.
pub fn clamp_param(value: f64) -> f64 {
    if value.is_finite() {
        value.clamp(PARAM_MIN, PARAM_MAX)
    } else {
        PARAM_MIN
    }
}

/// The two control parameters submitted to the external computation.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Parameters {
    /// Damping rate derived from return volatility.
    pub eta: f64,
    /// Coupling strength derived from imbalance or momentum.
    pub lambda: f64,
}

impl Parameters {
    /// Build a clamped parameter pair.
    pub fn new(eta: f64, lambda: f64) -> Self {
        Self {
            eta: clamp_param(eta),
            lambda: clamp_param(lambda),
        }
    }

    /// Build without clamping. Used for boundary probes of the external side.
    pub fn raw(eta: f64, lambda: f64) -> Self {
        Self { eta, lambda }
    }
}

/// Interpreted answer of one external computation cycle.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ComputationResult {
    /// Equilibrium metric, scaled by 1000.
    pub delta: i64,
    /// Efficiency as a fraction of 1, scaled by 1e9.
    pub efficiency_raw: i64,
    /// Efficiency as a percentage (0-100).
    pub efficiency_percent: f64,
    /// Critical equilibrium flag.
    pub is_optimal: bool,
}

impl ComputationResult {
    /// Interpret the three raw answers.
    pub fn from_raw(delta: i64, efficiency_raw: i64, is_optimal: bool) -> Self {
        Self {
            delta,
            efficiency_raw,
            efficiency_percent: efficiency_raw as f64 / EFFICIENCY_PERCENT_DIVISOR,
            is_optimal,
        }
    }

    /// Delta in decimal units.
    pub fn delta_decimal(&self) -> f64 {
        self.delta as f64 / DELTA_SCALE
    }
}
