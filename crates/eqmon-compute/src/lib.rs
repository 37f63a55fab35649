//! Client for the external equilibrium computation.
//!
//! The computation is a read-only black box exposing three functions over
//! signed fixed-point integers (×1e9). Each cycle issues them in order:
//! `computeEquilibrium(eta, lambda)`, then `efficiency(delta)` and
//! `isOptimal(delta)` with the delta from the first call. Any failure
//! discards the whole cycle; there is no in-cycle retry.

pub mod client;
pub mod contract;
pub mod error;
pub mod fixed;
pub mod mock;
pub mod rpc;

pub use client::ComputationClient;
pub use contract::{BoxFuture, DynContract, EquilibriumContract, IEquilibrium};
pub use error::{ComputeError, ComputeResult};
pub use fixed::{from_fixed, to_fixed};
pub use mock::{MockCall, MockContract, MockMethod};
pub use rpc::{JsonRpcConfig, JsonRpcContract};
