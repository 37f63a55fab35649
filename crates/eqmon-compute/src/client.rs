//! One computation cycle against the external contract.

use crate::contract::DynContract;
use crate::error::ComputeResult;
use crate::fixed::{check_fixed, to_fixed};
use eqmon_core::{ComputationResult, Parameters};
use tracing::debug;

/// Issues the three ordered calls of a cycle.
#[derive(Clone)]
pub struct ComputationClient {
    contract: DynContract,
}

impl ComputationClient {
    pub fn new(contract: DynContract) -> Self {
        Self { contract }
    }

    /// Scale the parameters and run a cycle.
    pub async fn compute(&self, parameters: &Parameters) -> ComputeResult<ComputationResult> {
        let eta = to_fixed("eta", parameters.eta)?;
        let lambda = to_fixed("lambda", parameters.lambda)?;
        self.compute_fixed(eta, lambda).await
    }

    /// Run a cycle with already-scaled inputs.
    ///
    /// `efficiency` and `isOptimal` both receive the Δ returned by the first
    /// call. The first error aborts the cycle.
    pub async fn compute_fixed(&self, eta: i64, lambda: i64) -> ComputeResult<ComputationResult> {
        let eta = check_fixed("eta", eta)?;
        let lambda = check_fixed("lambda", lambda)?;

        let delta = self.contract.compute_equilibrium(eta, lambda).await?;
        let efficiency = self.contract.efficiency(delta).await?;
        let is_optimal = self.contract.is_optimal(delta).await?;

        debug!(eta, lambda, delta, efficiency, is_optimal, "Computation cycle complete");
        Ok(ComputationResult::from_raw(delta, efficiency, is_optimal))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ComputeError;
    use crate::mock::{MockCall, MockContract, MockMethod, REFERENCE_INPUT};
    use std::sync::Arc;

    fn client_with(mock: Arc<MockContract>) -> ComputationClient {
        ComputationClient::new(mock)
    }

    #[tokio::test]
    async fn test_reference_fixture_is_optimal() {
        let mock = Arc::new(MockContract::reference());
        let client = client_with(mock.clone());

        let result = client
            .compute(&Parameters::raw(
                std::f64::consts::FRAC_1_SQRT_2,
                std::f64::consts::FRAC_1_SQRT_2,
            ))
            .await
            .unwrap();

        assert_eq!(result.delta, 230);
        assert!((result.delta_decimal() - 0.23).abs() < 1e-12);
        assert!(result.is_optimal);
        assert_eq!(result.efficiency_percent, 100.0);
    }

    #[tokio::test]
    async fn test_dependent_calls_use_returned_delta() {
        let mock = Arc::new(MockContract::new());
        mock.set_delta(300_000_000, 400_000_000, 512);
        let client = client_with(mock.clone());

        client.compute_fixed(300_000_000, 400_000_000).await.unwrap();

        assert_eq!(
            mock.get_calls(),
            vec![
                MockCall::ComputeEquilibrium {
                    eta: 300_000_000,
                    lambda: 400_000_000
                },
                MockCall::Efficiency { delta: 512 },
                MockCall::IsOptimal { delta: 512 },
            ]
        );
    }

    #[tokio::test]
    async fn test_zero_inputs_fail_cleanly() {
        let mock = Arc::new(MockContract::reference());
        let client = client_with(mock.clone());

        let result = client.compute_fixed(0, 0).await;
        assert!(matches!(result, Err(ComputeError::Rpc { .. })));
        // Aborted after the first call.
        assert_eq!(mock.call_count(), 1);
    }

    #[tokio::test]
    async fn test_later_failure_discards_cycle() {
        let mock = Arc::new(MockContract::reference());
        mock.fail_method(MockMethod::IsOptimal);
        let client = client_with(mock.clone());

        let result = client.compute_fixed(REFERENCE_INPUT, REFERENCE_INPUT).await;
        assert!(result.is_err());
        assert_eq!(mock.call_count(), 3);
    }

    #[tokio::test]
    async fn test_out_of_domain_makes_no_call() {
        let mock = Arc::new(MockContract::reference());
        let client = client_with(mock.clone());

        let result = client.compute(&Parameters::raw(f64::NAN, 0.5)).await;
        assert!(matches!(
            result,
            Err(ComputeError::OutOfDomain { name: "eta", .. })
        ));

        let result = client.compute_fixed(0, i64::MAX).await;
        assert!(matches!(
            result,
            Err(ComputeError::OutOfDomain { name: "lambda", .. })
        ));
        assert_eq!(mock.call_count(), 0);
    }
}
