//! Prometheus metrics, structured logging and running statistics.

pub mod error;
pub mod logging;
pub mod metrics;
pub mod running_stats;

pub use error::{TelemetryError, TelemetryResult};
pub use logging::init_logging;
pub use metrics::Metrics;
pub use running_stats::RunningStats;
