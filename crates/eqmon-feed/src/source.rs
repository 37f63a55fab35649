//! Supported market data sources.

use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Poll interval for live-price sources.
const LIVE_POLL_INTERVAL_MS: u64 = 1000;
/// Poll interval for slower prediction-market sources.
const PREDICTION_POLL_INTERVAL_MS: u64 = 5000;

/// A market data source and its wire schema.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SourceKind {
    /// Binance 24h ticker WebSocket stream.
    #[default]
    BinanceStream,
    /// Binance REST 24h ticker.
    BinanceRest,
    /// Polymarket CLOB order-book snapshot.
    PolymarketBook,
    /// Polymarket recent trades.
    PolymarketTrades,
}

impl SourceKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::BinanceStream => "binance_stream",
            Self::BinanceRest => "binance_rest",
            Self::PolymarketBook => "polymarket_book",
            Self::PolymarketTrades => "polymarket_trades",
        }
    }

    /// Whether the source pushes over a streaming connection.
    pub fn is_push(&self) -> bool {
        matches!(self, Self::BinanceStream)
    }

    /// Default inter-request delay when polled.
    pub fn default_poll_interval(&self) -> Duration {
        match self {
            Self::BinanceStream | Self::BinanceRest => {
                Duration::from_millis(LIVE_POLL_INTERVAL_MS)
            }
            Self::PolymarketBook | Self::PolymarketTrades => {
                Duration::from_millis(PREDICTION_POLL_INTERVAL_MS)
            }
        }
    }

    /// Full endpoint for `symbol` given the configured base URL.
    pub fn endpoint(&self, base_url: &str, symbol: &str) -> String {
        let query = match self {
            Self::BinanceStream => return base_url.to_string(),
            Self::BinanceRest => ("symbol", symbol.to_uppercase()),
            Self::PolymarketBook => ("token_id", symbol.to_string()),
            Self::PolymarketTrades => ("market", symbol.to_string()),
        };
        let separator = if base_url.contains('?') { '&' } else { '?' };
        format!("{base_url}{separator}{}={}", query.0, query.1)
    }

    /// Message sent after connecting, for streaming sources.
    pub fn subscribe_message(&self, symbol: &str) -> Option<String> {
        match self {
            Self::BinanceStream => Some(
                serde_json::json!({
                    "method": "SUBSCRIBE",
                    "params": [format!("{}@ticker", symbol.to_lowercase())],
                    "id": 1
                })
                .to_string(),
            ),
            _ => None,
        }
    }
}

impl std::fmt::Display for SourceKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_endpoints() {
        assert_eq!(
            SourceKind::BinanceRest.endpoint("https://api.binance.com/api/v3/ticker/24hr", "btcusdt"),
            "https://api.binance.com/api/v3/ticker/24hr?symbol=BTCUSDT"
        );
        assert_eq!(
            SourceKind::PolymarketBook.endpoint("https://clob.polymarket.com/book", "123"),
            "https://clob.polymarket.com/book?token_id=123"
        );
        assert_eq!(
            SourceKind::PolymarketTrades.endpoint("https://data-api.polymarket.com/trades?limit=50", "0xabc"),
            "https://data-api.polymarket.com/trades?limit=50&market=0xabc"
        );
        assert_eq!(
            SourceKind::BinanceStream.endpoint("wss://stream.binance.com:9443/ws", "BTCUSDT"),
            "wss://stream.binance.com:9443/ws"
        );
    }

    #[test]
    fn test_subscribe_message() {
        let msg = SourceKind::BinanceStream.subscribe_message("BTCUSDT").unwrap();
        let value: serde_json::Value = serde_json::from_str(&msg).unwrap();
        assert_eq!(value["method"], "SUBSCRIBE");
        assert_eq!(value["params"][0], "btcusdt@ticker");
        assert!(SourceKind::BinanceRest.subscribe_message("BTCUSDT").is_none());
    }

    #[test]
    fn test_default_poll_intervals() {
        assert_eq!(
            SourceKind::BinanceRest.default_poll_interval(),
            Duration::from_millis(1000)
        );
        assert_eq!(
            SourceKind::PolymarketBook.default_poll_interval(),
            Duration::from_millis(5000)
        );
        assert_eq!(
            SourceKind::PolymarketTrades.default_poll_interval(),
            Duration::from_millis(5000)
        );
    }

    #[test]
    fn test_serde_names() {
        let kind: SourceKind = serde_json::from_str("\"polymarket_book\"").unwrap();
        assert_eq!(kind, SourceKind::PolymarketBook);
        assert!(SourceKind::BinanceStream.is_push());
        assert!(!kind.is_push());
    }
}
