//! Named numeric constants.
//!
//! These values were chosen empirically and are kept verbatim. The parameter
//! clamp range matches the safe input domain of the external computation.

/// Lower bound for both control parameters.
pub const PARAM_MIN: f64 = 0.1;

/// Upper bound for both control parameters.
pub const PARAM_MAX: f64 = 0.95;

/// Neutral parameter value returned when an estimator lacks data.
///
/// This is the literal 0.707, not `FRAC_1_SQRT_2`.
pub const NEUTRAL_PARAM: f64 = 0.707;

/// Offset applied to both parameter formulas.
pub const PARAM_BASE: f64 = 0.3;

/// Span added on top of [`PARAM_BASE`].
pub const PARAM_RANGE: f64 = 0.6;

/// Minimum buffered prices before damping is estimated.
pub const DAMPING_WARMUP: usize = 10;

/// Multiplier applied to return volatility before capping at 1.
pub const VOLATILITY_SCALE: f64 = 100.0;

/// Sensitivity of damping to normalized volatility.
pub const DAMPING_SENSITIVITY: f64 = 10.0;

/// Trailing window used by the momentum coupling estimator.
pub const MOMENTUM_WINDOW: usize = 20;

/// Gain applied to absolute momentum before capping at [`PARAM_RANGE`].
pub const MOMENTUM_GAIN: f64 = 5.0;

/// Guard added to the imbalance denominator.
pub const IMBALANCE_EPSILON: f64 = 1e-9;

/// Default capacity of the price history.
pub const DEFAULT_HISTORY_SIZE: usize = 1000;

/// Fixed-point scale of the external computation inputs.
pub const FIXED_POINT_SCALE: f64 = 1e9;

/// Inputs at or beyond this magnitude are rejected by the external side.
pub const FIXED_POINT_LIMIT: i64 = 1_000_000_000_000_000_000;

/// Delta is reported with three implied decimal digits.
pub const DELTA_SCALE: f64 = 1000.0;

/// Divisor turning the raw efficiency fraction into a percentage.
pub const EFFICIENCY_PERCENT_DIVISOR: f64 = 1e7;

/// Default price substituted when a payload omits it.
pub const DEFAULT_PRICE: f64 = 0.5;

/// Default volume substituted when a payload omits it.
pub const DEFAULT_VOLUME: f64 = 0.0;

/// Delta above which a non-optimal reading is still classified healthy.
pub const HEALTHY_DELTA_THRESHOLD: f64 = 0.2;
