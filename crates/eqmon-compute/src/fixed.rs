//! Fixed-point conversion for the external computation.

use crate::error::{ComputeError, ComputeResult};
use eqmon_core::constants::{FIXED_POINT_LIMIT, FIXED_POINT_SCALE};

/// Scale by 1e9 and truncate toward zero.
///
/// Rejects non-finite values and magnitudes at or beyond 1e18.
pub fn to_fixed(name: &'static str, value: f64) -> ComputeResult<i64> {
    let scaled = (value * FIXED_POINT_SCALE).trunc();
    if !scaled.is_finite() || scaled.abs() >= FIXED_POINT_LIMIT as f64 {
        return Err(ComputeError::OutOfDomain { name, value });
    }
    Ok(scaled as i64)
}

/// Inverse of [`to_fixed`] (up to truncation).
pub fn from_fixed(value: i64) -> f64 {
    value as f64 / FIXED_POINT_SCALE
}

/// Check an already-scaled input against the domain limit.
pub(crate) fn check_fixed(name: &'static str, value: i64) -> ComputeResult<i64> {
    if value.unsigned_abs() >= FIXED_POINT_LIMIT as u64 {
        return Err(ComputeError::OutOfDomain {
            name,
            value: from_fixed(value),
        });
    }
    Ok(value)
}
