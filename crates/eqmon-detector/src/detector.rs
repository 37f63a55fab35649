//! Per-cycle evaluation.

use crate::config::DetectorConfig;
use crate::signal::{EquilibriumAlert, EquilibriumStatus};
use chrono::Utc;
use eqmon_core::{ComputationResult, MarketReading, Parameters};
use tracing::debug;

/// Outcome of evaluating one cycle.
#[derive(Debug, Clone)]
pub struct Detection {
    pub status: EquilibriumStatus,
    /// Present iff the result is optimal.
    pub alert: Option<EquilibriumAlert>,
}

/// Stateless detector.
#[derive(Debug, Clone, Default)]
pub struct EquilibriumDetector {
    config: DetectorConfig,
}

impl EquilibriumDetector {
    pub fn new(config: DetectorConfig) -> Self {
        Self { config }
    }

    /// Classify a result for display.
    pub fn classify(&self, result: &ComputationResult) -> EquilibriumStatus {
        if result.is_optimal {
            EquilibriumStatus::Optimal
        } else if result.delta_decimal() > self.config.healthy_delta_threshold {
            EquilibriumStatus::Healthy
        } else {
            EquilibriumStatus::Suboptimal
        }
    }

    /// Classify and raise an alert when optimal.
    pub fn evaluate(
        &self,
        symbol: &str,
        reading: &MarketReading,
        parameters: &Parameters,
        result: &ComputationResult,
    ) -> Detection {
        let status = self.classify(result);
        let alert = result.is_optimal.then(|| EquilibriumAlert {
            symbol: symbol.to_string(),
            parameters: *parameters,
            result: result.clone(),
            origin: reading.origin.clone(),
            detected_at: Utc::now(),
        });

        debug!(
            symbol,
            delta = result.delta,
            status = status.as_str(),
            alert = alert.is_some(),
            "Evaluated cycle"
        );

        Detection { status, alert }
    }
}
