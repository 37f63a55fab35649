//! Core domain types for the equilibrium monitor.
//!
//! This crate provides the data model shared by every stage of the pipeline:
//! - `MarketReading`: one normalized tick, tagged with its origin
//! - `PriceHistory`: bounded FIFO of recent prices feeding the estimators
//! - `Parameters`: the damping/coupling pair, clamped to the safe domain
//! - `ComputationResult`: one interpreted answer from the external computation
//! - `constants`: the empirically chosen numeric constants, by name

pub mod constants;
pub mod error;
pub mod history;
pub mod types;

pub use error::{CoreError, Result};
pub use history::PriceHistory;
pub use types::{ComputationResult, MarketReading, Parameters, ReadingOrigin};
