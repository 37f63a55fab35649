//! Application wiring and lifecycle.

use crate::config::{AppConfig, FeedMode};
use crate::error::AppResult;
use crate::monitor::MonitorSession;
use crate::state::MonitorState;
use eqmon_compute::{ComputationClient, DynContract, JsonRpcContract};
use eqmon_telemetry::Metrics;
use eqmon_transport::{ConnectionManager, HttpSource, PollLoop};
use std::sync::Arc;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

/// Main application.
pub struct Application {
    config: AppConfig,
    shutdown_token: CancellationToken,
}

impl Application {
    /// Create a new application from a validated configuration.
    pub fn new(config: AppConfig) -> AppResult<Self> {
        config.validate()?;
        Ok(Self {
            config,
            shutdown_token: CancellationToken::new(),
        })
    }

    pub fn config(&self) -> &AppConfig {
        &self.config
    }

    /// The run flag. Cancelling it stops the transport after the in-flight
    /// cycle.
    pub fn shutdown_token(&self) -> CancellationToken {
        self.shutdown_token.clone()
    }

    /// Run against the configured JSON-RPC endpoint until shutdown.
    pub async fn run(self) -> AppResult<MonitorState> {
        let contract = JsonRpcContract::new(self.config.compute.rpc_config())?;
        info!(
            rpc_url = %self.config.compute.rpc_url,
            contract = %self.config.compute.contract_address,
            "External computation configured"
        );
        self.run_with_contract(Arc::new(contract)).await
    }

    /// Run against any contract implementation until shutdown.
    ///
    /// Ctrl-C cancels the run flag. Returns the final state, or the transport
    /// error that ended the run.
    pub async fn run_with_contract(self, contract: DynContract) -> AppResult<MonitorState> {
        let token = self.shutdown_token.clone();
        let signal_watcher = tokio::spawn({
            let token = token.clone();
            async move {
                if tokio::signal::ctrl_c().await.is_ok() {
                    info!("Shutdown signal received");
                    token.cancel();
                }
            }
        });

        let mut session = MonitorSession::new(&self.config, ComputationClient::new(contract))?;
        let endpoint = self.config.endpoint();
        info!(
            symbol = %self.config.symbol,
            mode = ?self.config.mode,
            source = %self.config.source.kind,
            %endpoint,
            synthetic_fallback = self.config.fallback.synthetic,
            "Starting monitor"
        );

        let outcome = match self.config.mode {
            FeedMode::Push => {
                let manager = ConnectionManager::new(self.config.connection_config(), token.clone());
                manager.run(&mut session).await
            }
            FeedMode::Pull => {
                let source = HttpSource::new(endpoint, self.config.transport.request_timeout())?;
                let poller = PollLoop::new(
                    self.config.transport.poll_policy(self.config.source.kind),
                    token.clone(),
                );
                poller.run(&source, &mut session).await
            }
        };

        signal_watcher.abort();
        info!("Shutting down");
        session.log_summary();
        match Metrics::render_text() {
            Ok(text) => debug!(metrics = %text, "Final metrics"),
            Err(e) => warn!(error = %e, "Failed to render metrics"),
        }

        let state = session.into_state();
        outcome?;
        Ok(state)
    }
}
