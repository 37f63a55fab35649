//! Combined η/λ estimation for one cycle.

use crate::config::{CouplingMethod, EstimatorConfig};
use crate::coupling::{imbalance_coupling, momentum_coupling};
use crate::damping::estimate_eta;
use eqmon_core::{MarketReading, Parameters, PriceHistory};
use tracing::trace;

/// Parameters for one cycle plus how λ was obtained.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Estimate {
    pub parameters: Parameters,
    /// Resolved coupling method (never `Auto`).
    pub coupling: CouplingMethod,
}

/// Stateless estimator; the price history is owned by the caller.
#[derive(Debug, Clone, Default)]
pub struct ParameterEstimator {
    config: EstimatorConfig,
}

impl ParameterEstimator {
    pub fn new(config: EstimatorConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &EstimatorConfig {
        &self.config
    }

    /// Estimate η and λ. The current reading's price must already be in
    /// `history`.
    pub fn estimate(&self, history: &PriceHistory, reading: &MarketReading) -> Estimate {
        let prices = history.to_vec();
        let eta = estimate_eta(&prices, &self.config);

        let coupling = self.config.coupling.resolve(reading);
        let lambda = match coupling {
            CouplingMethod::Momentum => momentum_coupling(&prices, &self.config),
            CouplingMethod::Imbalance | CouplingMethod::Auto => imbalance_coupling(
                reading.bid_volume,
                reading.ask_volume,
                reading.price_spread,
                &self.config,
            ),
        };

        trace!(eta, lambda, method = coupling.as_str(), samples = prices.len(), "Estimated parameters");

        Estimate {
            parameters: Parameters::new(eta, lambda),
            coupling,
        }
    }
}
