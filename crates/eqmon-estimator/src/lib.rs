//! Control parameter estimation.
//!
//! - η (damping) from the volatility of simple returns in the price history
//! - λ (coupling) from bid/ask volume imbalance, or from price momentum when
//!   the source reports no volumes
//!
//! Both estimators are pure functions of the history and the current reading,
//! and always land in the clamp range of `eqmon_core::constants`.

pub mod config;
pub mod coupling;
pub mod damping;
pub mod estimator;

pub use config::{CouplingMethod, EstimatorConfig};
pub use coupling::{imbalance_coupling, momentum_coupling};
pub use damping::{estimate_eta, return_volatility};
pub use estimator::{Estimate, ParameterEstimator};
