//! Scriptable in-process stand-in for the external computation.

use crate::contract::{BoxFuture, EquilibriumContract};
use crate::error::{ComputeError, ComputeResult};
use parking_lot::Mutex;
use std::collections::{HashMap, HashSet};

/// Δ at which the reference fixture reports critical equilibrium.
pub const REFERENCE_OPTIMAL_DELTA: i64 = 230;
/// Half-width of the band around [`REFERENCE_OPTIMAL_DELTA`] treated as optimal.
pub const REFERENCE_OPTIMAL_BAND: i64 = 5;
/// Scaled 1/√2, the reference fixture input.
pub const REFERENCE_INPUT: i64 = 707_106_781;

const FULL_EFFICIENCY: i64 = 1_000_000_000;
/// Efficiency lost per unit of Δ away from the optimum.
const EFFICIENCY_SLOPE: i64 = 1_000_000;

/// Which contract function a call targeted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MockMethod {
    ComputeEquilibrium,
    Efficiency,
    IsOptimal,
}

/// A recorded call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MockCall {
    ComputeEquilibrium { eta: i64, lambda: i64 },
    Efficiency { delta: i64 },
    IsOptimal { delta: i64 },
}

/// Mock contract.
///
/// Δ comes from a table of known inputs (or a fallback); unknown inputs
/// revert. Efficiency falls off linearly from the optimum and `isOptimal`
/// holds within the reference band.
pub struct MockContract {
    deltas: Mutex<HashMap<(i64, i64), i64>>,
    fallback_delta: Mutex<Option<i64>>,
    failing: Mutex<HashSet<MockMethod>>,
    calls: Mutex<Vec<MockCall>>,
}

impl Default for MockContract {
    fn default() -> Self {
        Self::new()
    }
}

impl MockContract {
    /// Empty mock: every `computeEquilibrium` reverts until scripted.
    pub fn new() -> Self {
        Self {
            deltas: Mutex::new(HashMap::new()),
            fallback_delta: Mutex::new(None),
            failing: Mutex::new(HashSet::new()),
            calls: Mutex::new(Vec::new()),
        }
    }

    /// Mock reproducing the reference fixture: scaled 1/√2 inputs give
    /// Δ = 230 (optimal); everything else reverts.
    pub fn reference() -> Self {
        let mock = Self::new();
        mock.set_delta(REFERENCE_INPUT, REFERENCE_INPUT, REFERENCE_OPTIMAL_DELTA);
        mock
    }

    /// Script Δ for one input pair.
    pub fn set_delta(&self, eta: i64, lambda: i64, delta: i64) {
        self.deltas.lock().insert((eta, lambda), delta);
    }

    /// Δ returned for inputs not in the table (`None` reverts).
    pub fn set_fallback_delta(&self, delta: Option<i64>) {
        *self.fallback_delta.lock() = delta;
    }

    /// Make every call to `method` revert.
    pub fn fail_method(&self, method: MockMethod) {
        self.failing.lock().insert(method);
    }

    pub fn clear_failures(&self) {
        self.failing.lock().clear();
    }

    /// Get recorded calls.
    pub fn get_calls(&self) -> Vec<MockCall> {
        self.calls.lock().clone()
    }

    pub fn call_count(&self) -> usize {
        self.calls.lock().len()
    }

    fn check_failing(&self, method: MockMethod) -> ComputeResult<()> {
        if self.failing.lock().contains(&method) {
            return Err(revert());
        }
        Ok(())
    }

    fn delta_for(&self, eta: i64, lambda: i64) -> ComputeResult<i64> {
        self.calls
            .lock()
            .push(MockCall::ComputeEquilibrium { eta, lambda });
        self.check_failing(MockMethod::ComputeEquilibrium)?;
        self.deltas
            .lock()
            .get(&(eta, lambda))
            .copied()
            .or(*self.fallback_delta.lock())
            .ok_or_else(revert)
    }

    fn efficiency_for(&self, delta: i64) -> ComputeResult<i64> {
        self.calls.lock().push(MockCall::Efficiency { delta });
        self.check_failing(MockMethod::Efficiency)?;
        let distance = delta.saturating_sub(REFERENCE_OPTIMAL_DELTA).saturating_abs();
        Ok((FULL_EFFICIENCY - distance.saturating_mul(EFFICIENCY_SLOPE)).max(0))
    }

    fn optimal_for(&self, delta: i64) -> ComputeResult<bool> {
        self.calls.lock().push(MockCall::IsOptimal { delta });
        self.check_failing(MockMethod::IsOptimal)?;
        Ok(delta.saturating_sub(REFERENCE_OPTIMAL_DELTA).saturating_abs() <= REFERENCE_OPTIMAL_BAND)
    }
}

fn revert() -> ComputeError {
    ComputeError::Rpc {
        code: 3,
        message: "execution reverted".to_string(),
    }
}

impl EquilibriumContract for MockContract {
    fn compute_equilibrium(&self, eta: i64, lambda: i64) -> BoxFuture<'_, ComputeResult<i64>> {
        let result = self.delta_for(eta, lambda);
        Box::pin(async move { result })
    }

    fn efficiency(&self, delta: i64) -> BoxFuture<'_, ComputeResult<i64>> {
        let result = self.efficiency_for(delta);
        Box::pin(async move { result })
    }

    fn is_optimal(&self, delta: i64) -> BoxFuture<'_, ComputeResult<bool>> {
        let result = self.optimal_for(delta);
        Box::pin(async move { result })
    }
}
