pub mod mock_http;
pub mod mock_ws;

use eqmon_bot::AppConfig;

pub const TEST_CONTRACT: &str = "0x5fbdb2315678afecb367f032d93f642f64180aa3";

/// Valid config with a fast reconnect delay and no periodic summary.
pub fn test_config() -> AppConfig {
    let mut config = AppConfig::default();
    config.symbol = "BTCUSDT".to_string();
    config.compute.contract_address = TEST_CONTRACT.to_string();
    config.transport.reconnect_delay_ms = 50;
    config.telemetry.stats_interval_secs = 0;
    config.fallback.seed = Some(1);
    config
}

/// A Binance 24h ticker event.
pub fn ticker_event(price: f64, bid_qty: f64, ask_qty: f64) -> String {
    serde_json::json!({
        "e": "24hrTicker",
        "E": 1_700_000_000_000i64,
        "s": "BTCUSDT",
        "c": price.to_string(),
        "B": bid_qty.to_string(),
        "A": ask_qty.to_string(),
        "b": (price - 0.5).to_string(),
        "a": (price + 0.5).to_string()
    })
    .to_string()
}
