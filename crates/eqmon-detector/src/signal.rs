//! Detection output types.

use chrono::{DateTime, Utc};
use eqmon_core::{ComputationResult, Parameters, ReadingOrigin};
use serde::{Deserialize, Serialize};

/// Display classification of a cycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EquilibriumStatus {
    /// Critical equilibrium reached.
    Optimal,
    /// Not optimal, Δ above the healthy threshold.
    Healthy,
    Suboptimal,
}

impl EquilibriumStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Optimal => "optimal",
            Self::Healthy => "healthy",
            Self::Suboptimal => "suboptimal",
        }
    }
}

impl std::fmt::Display for EquilibriumStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Raised for every optimal cycle.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EquilibriumAlert {
    pub symbol: String,
    /// Parameters that produced the result.
    pub parameters: Parameters,
    pub result: ComputationResult,
    /// Origin of the triggering reading. Synthetic origins are diagnostic only.
    pub origin: ReadingOrigin,
    pub detected_at: DateTime<Utc>,
}

impl EquilibriumAlert {
    /// Whether the alert came from a synthetic reading.
    pub fn is_synthetic(&self) -> bool {
        self.origin.is_synthetic()
    }
}
