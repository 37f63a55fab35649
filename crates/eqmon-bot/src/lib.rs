//! Equilibrium monitor.
//!
//! Orchestrates one monitoring instance:
//! - Market data transport (push or pull)
//! - Normalization into canonical readings
//! - η/λ estimation over the price history
//! - The external equilibrium computation
//! - Running statistics, status lines and critical equilibrium alerts

pub mod app;
pub mod config;
pub mod display;
pub mod error;
pub mod monitor;
pub mod state;

pub use app::Application;
pub use config::{AppConfig, FeedMode};
pub use error::{AppError, AppResult};
pub use monitor::{CycleOutcome, MonitorSession};
pub use state::MonitorState;
