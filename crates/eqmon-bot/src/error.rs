//! Application error types.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum AppError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Core error: {0}")]
    Core(#[from] eqmon_core::CoreError),

    #[error("Transport error: {0}")]
    Transport(#[from] eqmon_transport::TransportError),

    #[error("Compute error: {0}")]
    Compute(#[from] eqmon_compute::ComputeError),

    #[error("Telemetry error: {0}")]
    Telemetry(#[from] eqmon_telemetry::TelemetryError),
}

impl From<config::ConfigError> for AppError {
    fn from(e: config::ConfigError) -> Self {
        Self::Config(e.to_string())
    }
}

pub type AppResult<T> = Result<T, AppError>;
