//! Critical equilibrium detection.
//!
//! Stateless and per-cycle: every cycle whose result is optimal raises an
//! alert (no hysteresis, no debounce). Non-optimal cycles are classified for
//! display only.

pub mod config;
pub mod detector;
pub mod signal;

pub use config::DetectorConfig;
pub use detector::{Detection, EquilibriumDetector};
pub use signal::{EquilibriumAlert, EquilibriumStatus};
