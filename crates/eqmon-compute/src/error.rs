//! External computation error types.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ComputeError {
    #[error("{name} = {value} is outside the fixed-point domain")]
    OutOfDomain { name: &'static str, value: f64 },

    #[error("RPC error {code}: {message}")]
    Rpc { code: i64, message: String },

    #[error("Transport error: {0}")]
    Transport(String),

    #[error("Decode error: {0}")]
    Decode(String),

    #[error("ABI error: {0}")]
    Abi(String),
}

impl ComputeError {
    /// Whether the external side rejected the input (as opposed to a fault
    /// reaching it).
    pub fn is_rejection(&self) -> bool {
        matches!(self, Self::OutOfDomain { .. } | Self::Rpc { .. })
    }
}

pub type ComputeResult<T> = Result<T, ComputeError>;
