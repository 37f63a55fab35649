//! The call contract of the external computation.

use crate::error::ComputeResult;
use alloy::sol;
use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;

/// Boxed future for dyn-compatible async trait methods.
pub type BoxFuture<'a, T> = Pin<Box<dyn Future<Output = T> + Send + 'a>>;

sol! {
    /// Read-only interface of the equilibrium contract.
    #[derive(Debug)]
    interface IEquilibrium {
        function computeEquilibrium(int64 eta, int64 lambda) external view returns (int64);
        function efficiency(int64 delta) external view returns (int64);
        function isOptimal(int64 delta) external view returns (bool);
    }
}

/// The three read-only functions of the external computation.
///
/// All arguments and results are fixed-point integers. Implementations may
/// fail for any input.
pub trait EquilibriumContract: Send + Sync {
    /// Equilibrium metric Δ (×1000) for scaled η and λ.
    fn compute_equilibrium(&self, eta: i64, lambda: i64) -> BoxFuture<'_, ComputeResult<i64>>;

    /// Efficiency for Δ, as a fraction of 1 (×1e9).
    fn efficiency(&self, delta: i64) -> BoxFuture<'_, ComputeResult<i64>>;

    /// Critical equilibrium flag for Δ.
    fn is_optimal(&self, delta: i64) -> BoxFuture<'_, ComputeResult<bool>>;
}

/// Shared contract handle.
pub type DynContract = Arc<dyn EquilibriumContract>;
