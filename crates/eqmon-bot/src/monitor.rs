//! One monitoring instance: reading in, status and alerts out.

use crate::config::{AppConfig, FeedMode};
use crate::display;
use crate::error::AppResult;
use crate::state::MonitorState;
use eqmon_compute::ComputationClient;
use eqmon_core::{ComputationResult, MarketReading, ReadingOrigin};
use eqmon_detector::{EquilibriumDetector, EquilibriumStatus};
use eqmon_estimator::ParameterEstimator;
use eqmon_feed::{Normalizer, NormalizerStats, SyntheticGenerator};
use eqmon_telemetry::Metrics;
use eqmon_transport::{BoxFuture, ConnectionState, FeedHandler, FeedPayload};
use std::time::{Duration, Instant};
use tracing::{debug, info, warn};

/// What one cycle produced.
#[derive(Debug, Clone, PartialEq)]
pub enum CycleOutcome {
    /// The external computation answered; stats were updated.
    Completed {
        result: ComputationResult,
        status: EquilibriumStatus,
        alerted: bool,
    },
    /// The cycle's result was discarded.
    ComputeFailed,
}

/// Drives cycles for one symbol and owns its [`MonitorState`].
pub struct MonitorSession {
    symbol: String,
    mode: FeedMode,
    normalizer: Normalizer,
    estimator: ParameterEstimator,
    client: ComputationClient,
    detector: EquilibriumDetector,
    state: MonitorState,
    stats_interval: Option<Duration>,
    last_summary: Instant,
    /// Whether the stream connected since the last reconnect was scheduled.
    connected_since_retry: bool,
}

impl MonitorSession {
    pub fn new(config: &AppConfig, client: ComputationClient) -> AppResult<Self> {
        let synthetic = config
            .fallback
            .synthetic
            .then(|| SyntheticGenerator::new(config.fallback.seed));

        Ok(Self {
            symbol: config.symbol.clone(),
            mode: config.mode,
            normalizer: Normalizer::new(config.source.kind, synthetic),
            estimator: ParameterEstimator::new(config.estimator.clone()),
            client,
            detector: EquilibriumDetector::new(config.detector.clone()),
            state: MonitorState::new(config.estimator.max_history_size)?,
            stats_interval: config.telemetry.stats_interval(),
            last_summary: Instant::now(),
            connected_since_retry: false,
        })
    }

    pub fn state(&self) -> &MonitorState {
        &self.state
    }

    pub fn into_state(self) -> MonitorState {
        self.state
    }

    pub fn normalizer_stats(&self) -> NormalizerStats {
        self.normalizer.stats()
    }

    /// Normalize a transport payload and run a cycle if it yields a reading.
    pub async fn handle_payload(&mut self, payload: FeedPayload) -> Option<CycleOutcome> {
        let reading = match payload {
            FeedPayload::Message(text) => {
                let shape_errors = self.normalizer.stats().data_shape_errors;
                let reading = self.normalizer.ingest(&text);
                if self.normalizer.stats().data_shape_errors > shape_errors {
                    Metrics::data_shape_error();
                }
                reading
            }
            FeedPayload::Unreachable { reason } => {
                if self.mode == FeedMode::Pull {
                    Metrics::poll_failure();
                }
                self.normalizer.unreachable(&reason)
            }
        }?;

        Some(self.process_reading(reading).await)
    }

    /// Run one cycle for a normalized reading.
    ///
    /// A failed computation leaves the running statistics untouched and
    /// never alerts.
    pub async fn process_reading(&mut self, reading: MarketReading) -> CycleOutcome {
        self.state.cycles_attempted += 1;
        if let ReadingOrigin::Synthetic { reason } = &reading.origin {
            self.state.synthetic_readings += 1;
            Metrics::synthetic_reading(reason);
        }

        // Synthetic prices are estimated against a scratch copy and never
        // enter the market history.
        let estimate = if reading.is_synthetic() {
            let mut scratch = self.state.history.clone();
            scratch.push(reading.price);
            self.estimator.estimate(&scratch, &reading)
        } else {
            self.state.history.push(reading.price);
            self.estimator.estimate(&self.state.history, &reading)
        };
        let parameters = estimate.parameters;
        Metrics::parameters(parameters.eta, parameters.lambda);

        let started = Instant::now();
        let computed = self.client.compute(&parameters).await;
        Metrics::compute_latency(started.elapsed().as_secs_f64() * 1000.0);

        let result = match computed {
            Ok(result) => result,
            Err(e) => {
                self.state.compute_failures += 1;
                Metrics::cycle_compute_failed();
                warn!(
                    symbol = %self.symbol,
                    eta = parameters.eta,
                    lambda = parameters.lambda,
                    rejected = e.is_rejection(),
                    error = %e,
                    "External computation failed, discarding cycle"
                );
                return CycleOutcome::ComputeFailed;
            }
        };

        self.state.stats.record(&result);
        Metrics::cycle_completed();
        Metrics::result(result.delta_decimal(), result.efficiency_percent);

        let detection = self
            .detector
            .evaluate(&self.symbol, &reading, &parameters, &result);
        info!(
            target: "eqmon::status",
            coupling = estimate.coupling.as_str(),
            "{}",
            display::status_line(&self.symbol, &reading, &parameters, &result, detection.status)
        );

        let alerted = detection.alert.is_some();
        if let Some(alert) = &detection.alert {
            self.state.alerts += 1;
            Metrics::alert();
            warn!(target: "eqmon::alert", "{}", display::alert_block(alert));
        }

        self.maybe_log_summary();

        CycleOutcome::Completed {
            result,
            status: detection.status,
            alerted,
        }
    }

    /// Log the cumulative statistics.
    pub fn log_summary(&self) {
        let normalizer = self.normalizer.stats();
        info!(
            symbol = %self.symbol,
            data_shape_errors = normalizer.data_shape_errors,
            ignored_messages = normalizer.ignored_messages,
            dropped = normalizer.dropped,
            "Statistics summary: {}",
            display::summary(&self.state)
        );
    }

    fn maybe_log_summary(&mut self) {
        let Some(interval) = self.stats_interval else {
            return;
        };
        if self.last_summary.elapsed() >= interval {
            self.log_summary();
            self.last_summary = Instant::now();
        }
    }
}

impl FeedHandler for MonitorSession {
    fn on_payload(&mut self, payload: FeedPayload) -> BoxFuture<'_, ()> {
        Box::pin(async move {
            if let Some(outcome) = self.handle_payload(payload).await {
                debug!(?outcome, "Cycle finished");
            }
        })
    }

    fn on_state_change(&mut self, state: ConnectionState) {
        Metrics::transport_state_set(state.as_str());
        match state {
            ConnectionState::Connected => self.connected_since_retry = true,
            ConnectionState::Reconnecting => {
                let reason = if self.connected_since_retry {
                    "closed"
                } else {
                    "unreachable"
                };
                Metrics::reconnect(reason);
                self.connected_since_retry = false;
            }
            ConnectionState::Connecting | ConnectionState::Disconnected => {}
        }
    }
}
