//! Application configuration.
//!
//! Loaded from a TOML file layered with `EQMON__`-prefixed environment
//! overrides (e.g. `EQMON__COMPUTE__RPC_URL`).

use crate::error::{AppError, AppResult};
use config::{Config, Environment, File, FileFormat};
use eqmon_compute::JsonRpcConfig;
use eqmon_detector::DetectorConfig;
use eqmon_estimator::EstimatorConfig;
use eqmon_feed::SourceKind;
use eqmon_transport::{BackoffKind, ConnectionConfig, PollPolicy, ReconnectPolicy};
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Data acquisition mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FeedMode {
    /// Streaming connection.
    #[default]
    Push,
    /// Self-scheduling HTTP polling.
    Pull,
}

/// Market data source.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SourceConfig {
    #[serde(default)]
    pub kind: SourceKind,
    /// Endpoint base; symbol parameters are appended per source kind.
    #[serde(default = "default_source_url")]
    pub url: String,
}

fn default_source_url() -> String {
    "wss://stream.binance.com:9443/ws".to_string()
}

impl Default for SourceConfig {
    fn default() -> Self {
        Self {
            kind: SourceKind::default(),
            url: default_source_url(),
        }
    }
}

/// Reconnection and polling behavior.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TransportConfig {
    #[serde(default = "default_reconnect_delay_ms")]
    pub reconnect_delay_ms: u64,
    #[serde(default)]
    pub backoff: BackoffKind,
    /// Ceiling for exponential backoff.
    #[serde(default = "default_max_delay_ms")]
    pub reconnect_max_delay_ms: u64,
    /// 0 = unlimited.
    #[serde(default)]
    pub max_reconnect_attempts: u32,
    /// Overrides the source kind's default interval.
    #[serde(default)]
    pub poll_interval_ms: Option<u64>,
    /// 0 = unlimited.
    #[serde(default)]
    pub max_consecutive_poll_failures: u32,
    #[serde(default)]
    pub poll_backoff: bool,
    /// Unset leaves HTTP requests on client defaults.
    #[serde(default)]
    pub request_timeout_ms: Option<u64>,
}

fn default_reconnect_delay_ms() -> u64 {
    5000
}

fn default_max_delay_ms() -> u64 {
    60000
}

impl Default for TransportConfig {
    fn default() -> Self {
        Self {
            reconnect_delay_ms: default_reconnect_delay_ms(),
            backoff: BackoffKind::default(),
            reconnect_max_delay_ms: default_max_delay_ms(),
            max_reconnect_attempts: 0,
            poll_interval_ms: None,
            max_consecutive_poll_failures: 0,
            poll_backoff: false,
            request_timeout_ms: None,
        }
    }
}

impl TransportConfig {
    pub fn reconnect_policy(&self) -> ReconnectPolicy {
        ReconnectPolicy {
            base_delay: Duration::from_millis(self.reconnect_delay_ms),
            max_delay: Duration::from_millis(self.reconnect_max_delay_ms),
            backoff: self.backoff,
            max_attempts: self.max_reconnect_attempts,
        }
    }

    pub fn poll_policy(&self, kind: SourceKind) -> PollPolicy {
        PollPolicy {
            interval: self
                .poll_interval_ms
                .map(Duration::from_millis)
                .unwrap_or_else(|| kind.default_poll_interval()),
            backoff: self.poll_backoff,
            max_delay: Duration::from_millis(self.reconnect_max_delay_ms),
            max_consecutive_failures: self.max_consecutive_poll_failures,
        }
    }

    pub fn request_timeout(&self) -> Option<Duration> {
        self.request_timeout_ms.map(Duration::from_millis)
    }
}

/// External computation endpoint.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ComputeConfig {
    #[serde(default = "default_rpc_url")]
    pub rpc_url: String,
    #[serde(default)]
    pub contract_address: String,
    #[serde(default = "default_block")]
    pub block: String,
    #[serde(default)]
    pub request_timeout_ms: Option<u64>,
}

fn default_rpc_url() -> String {
    "http://127.0.0.1:8545".to_string()
}

fn default_block() -> String {
    "latest".to_string()
}

impl Default for ComputeConfig {
    fn default() -> Self {
        Self {
            rpc_url: default_rpc_url(),
            contract_address: String::new(),
            block: default_block(),
            request_timeout_ms: None,
        }
    }
}

impl ComputeConfig {
    pub fn rpc_config(&self) -> JsonRpcConfig {
        JsonRpcConfig {
            rpc_url: self.rpc_url.clone(),
            contract_address: self.contract_address.clone(),
            block: self.block.clone(),
            request_timeout: self.request_timeout_ms.map(Duration::from_millis),
        }
    }
}

/// Synthetic fallback readings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FallbackConfig {
    /// Substitute a synthetic reading when the source fails.
    #[serde(default = "default_true")]
    pub synthetic: bool,
    /// Fixed RNG seed for reproducible diagnostics.
    #[serde(default)]
    pub seed: Option<u64>,
}

fn default_true() -> bool {
    true
}

impl Default for FallbackConfig {
    fn default() -> Self {
        Self {
            synthetic: true,
            seed: None,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TelemetryConfig {
    /// Default log filter when `RUST_LOG` is unset.
    #[serde(default = "default_log_level")]
    pub log_level: String,
    /// Periodic summary interval (0 disables).
    #[serde(default = "default_stats_interval_secs")]
    pub stats_interval_secs: u64,
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_stats_interval_secs() -> u64 {
    300
}

impl Default for TelemetryConfig {
    fn default() -> Self {
        Self {
            log_level: default_log_level(),
            stats_interval_secs: default_stats_interval_secs(),
        }
    }
}

impl TelemetryConfig {
    pub fn stats_interval(&self) -> Option<Duration> {
        (self.stats_interval_secs > 0).then(|| Duration::from_secs(self.stats_interval_secs))
    }
}

/// Main application configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    /// Target symbol, market id or token id, depending on the source.
    #[serde(default = "default_symbol")]
    pub symbol: String,
    #[serde(default)]
    pub mode: FeedMode,
    #[serde(default)]
    pub source: SourceConfig,
    #[serde(default)]
    pub transport: TransportConfig,
    #[serde(default)]
    pub estimator: EstimatorConfig,
    #[serde(default)]
    pub compute: ComputeConfig,
    #[serde(default)]
    pub detector: DetectorConfig,
    #[serde(default)]
    pub fallback: FallbackConfig,
    #[serde(default)]
    pub telemetry: TelemetryConfig,
}

fn default_symbol() -> String {
    "btcusdt".to_string()
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            symbol: default_symbol(),
            mode: FeedMode::default(),
            source: SourceConfig::default(),
            transport: TransportConfig::default(),
            estimator: EstimatorConfig::default(),
            compute: ComputeConfig::default(),
            detector: DetectorConfig::default(),
            fallback: FallbackConfig::default(),
            telemetry: TelemetryConfig::default(),
        }
    }
}

impl AppConfig {
    /// Load a TOML file with `EQMON__` environment overrides.
    pub fn from_file(path: &str) -> AppResult<Self> {
        let settings = Config::builder()
            .add_source(File::new(path, FileFormat::Toml).required(true))
            .add_source(
                Environment::with_prefix("EQMON")
                    .prefix_separator("__")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?;
        Ok(settings.try_deserialize()?)
    }

    /// Parse TOML text without environment overrides.
    pub fn from_toml_str(content: &str) -> AppResult<Self> {
        let settings = Config::builder()
            .add_source(File::from_str(content, FileFormat::Toml))
            .build()?;
        Ok(settings.try_deserialize()?)
    }

    /// Validate configuration values.
    pub fn validate(&self) -> AppResult<()> {
        if self.symbol.trim().is_empty() {
            return Err(AppError::Config("symbol must not be empty".to_string()));
        }
        if self.source.url.trim().is_empty() {
            return Err(AppError::Config("source.url must not be empty".to_string()));
        }
        match (self.mode, self.source.kind.is_push()) {
            (FeedMode::Push, false) => {
                return Err(AppError::Config(format!(
                    "source {} cannot be used in push mode",
                    self.source.kind
                )));
            }
            (FeedMode::Pull, true) => {
                return Err(AppError::Config(format!(
                    "source {} cannot be used in pull mode",
                    self.source.kind
                )));
            }
            _ => {}
        }
        if self.transport.reconnect_delay_ms == 0 {
            return Err(AppError::Config(
                "transport.reconnect_delay_ms must be positive".to_string(),
            ));
        }
        if self.transport.poll_interval_ms == Some(0) {
            return Err(AppError::Config(
                "transport.poll_interval_ms must be positive".to_string(),
            ));
        }
        if self.compute.rpc_url.trim().is_empty() {
            return Err(AppError::Config("compute.rpc_url must not be empty".to_string()));
        }
        if self.compute.contract_address.trim().is_empty() {
            return Err(AppError::Config(
                "compute.contract_address must not be empty".to_string(),
            ));
        }
        self.estimator
            .validate()
            .map_err(|e| AppError::Config(format!("estimator: {e}")))?;
        self.detector
            .validate()
            .map_err(|e| AppError::Config(format!("detector: {e}")))?;
        Ok(())
    }

    /// Streaming connection settings for the configured source.
    pub fn connection_config(&self) -> ConnectionConfig {
        ConnectionConfig {
            url: self.endpoint(),
            subscribe_message: self.source.kind.subscribe_message(&self.symbol),
            reconnect: self.transport.reconnect_policy(),
        }
    }

    /// Full source endpoint for the configured symbol.
    pub fn endpoint(&self) -> String {
        self.source.kind.endpoint(&self.source.url, &self.symbol)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use eqmon_estimator::CouplingMethod;

    const CONTRACT: &str = "0x5fbdb2315678afecb367f032d93f642f64180aa3";

    #[test]
    fn test_defaults() {
        let config = AppConfig::default();
        assert_eq!(config.mode, FeedMode::Push);
        assert_eq!(config.source.kind, SourceKind::BinanceStream);
        assert_eq!(config.transport.reconnect_delay_ms, 5000);
        assert_eq!(config.transport.backoff, BackoffKind::Flat);
        assert_eq!(config.transport.max_reconnect_attempts, 0);
        assert_eq!(config.estimator.max_history_size, 1000);
        assert_eq!(config.detector.healthy_delta_threshold, 0.2);
        assert!(config.fallback.synthetic);
        assert_eq!(config.telemetry.stats_interval(), Some(Duration::from_secs(300)));
        // No contract configured yet.
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_parse_pull_config() {
        let config = AppConfig::from_toml_str(&format!(
            r#"
            symbol = "12345"
            mode = "pull"

            [source]
            kind = "polymarket_book"
            url = "https://clob.polymarket.com/book"

            [transport]
            max_consecutive_poll_failures = 10
            poll_backoff = true

            [estimator]
            coupling = "imbalance"

            [compute]
            rpc_url = "http://localhost:8545"
            contract_address = "{CONTRACT}"

            [telemetry]
            stats_interval_secs = 0
            "#
        ))
        .unwrap();

        assert!(config.validate().is_ok());
        assert_eq!(config.mode, FeedMode::Pull);
        assert_eq!(config.estimator.coupling, CouplingMethod::Imbalance);
        assert_eq!(config.estimator.momentum_window, 20);
        assert_eq!(config.telemetry.stats_interval(), None);
        assert_eq!(
            config.endpoint(),
            "https://clob.polymarket.com/book?token_id=12345"
        );

        let policy = config.transport.poll_policy(config.source.kind);
        assert_eq!(policy.interval, Duration::from_millis(5000));
        assert_eq!(policy.max_consecutive_failures, 10);
        assert!(policy.backoff);
    }

    #[test]
    fn test_poll_interval_override() {
        let transport = TransportConfig {
            poll_interval_ms: Some(250),
            ..Default::default()
        };
        assert_eq!(
            transport.poll_policy(SourceKind::BinanceRest).interval,
            Duration::from_millis(250)
        );
        assert_eq!(
            TransportConfig::default()
                .poll_policy(SourceKind::BinanceRest)
                .interval,
            Duration::from_millis(1000)
        );
    }

    #[test]
    fn test_mode_must_match_source() {
        let mut config = AppConfig::default();
        config.compute.contract_address = CONTRACT.to_string();
        assert!(config.validate().is_ok());

        config.mode = FeedMode::Pull;
        assert!(config.validate().is_err());

        config.source.kind = SourceKind::BinanceRest;
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_connection_config_subscribes() {
        let config = AppConfig {
            symbol: "ETHUSDT".to_string(),
            ..Default::default()
        };
        let connection = config.connection_config();
        assert_eq!(connection.url, "wss://stream.binance.com:9443/ws");
        assert!(connection
            .subscribe_message
            .unwrap()
            .contains("ethusdt@ticker"));
        assert_eq!(connection.reconnect.base_delay, Duration::from_secs(5));
    }

    #[test]
    fn test_shipped_configs_are_valid() {
        for name in ["default.toml", "polymarket.toml"] {
            let path = format!("{}/../../config/{name}", env!("CARGO_MANIFEST_DIR"));
            let config = AppConfig::from_file(&path).unwrap();
            assert!(config.validate().is_ok(), "{name} failed validation");
        }
    }

    #[test]
    fn test_missing_file_is_config_error() {
        assert!(matches!(
            AppConfig::from_file("/nonexistent/eqmon.toml"),
            Err(AppError::Config(_))
        ));
    }

    #[test]
    fn test_invalid_estimator_rejected() {
        let mut config = AppConfig::default();
        config.compute.contract_address = CONTRACT.to_string();
        config.estimator.max_history_size = 0;
        assert!(matches!(config.validate(), Err(AppError::Config(_))));
    }
}
