//! Source-specific payload parsing.
//!
//! Every source kind maps onto one schema; there is no probing of alternate
//! field names across sources.

use crate::error::{FeedError, FeedResult};
use crate::raw::{opt_f64, opt_i64, RawReading, SnapshotFields, TickerFields, WireNumber};
use crate::source::SourceKind;
use serde::Deserialize;
use serde_json::Value;
use tracing::debug;

/// Binance 24h ticker stream event.
#[derive(Debug, Deserialize)]
struct BinanceTickerEvent {
    #[serde(rename = "e", default)]
    event_type: Option<String>,
    #[serde(rename = "E", default)]
    event_time: Option<WireNumber>,
    #[serde(rename = "c", default)]
    last_price: Option<WireNumber>,
    #[serde(rename = "b", default)]
    best_bid: Option<WireNumber>,
    #[serde(rename = "B", default)]
    bid_qty: Option<WireNumber>,
    #[serde(rename = "a", default)]
    best_ask: Option<WireNumber>,
    #[serde(rename = "A", default)]
    ask_qty: Option<WireNumber>,
}

/// Binance REST 24h ticker.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct BinanceRestTicker {
    #[serde(default)]
    last_price: Option<WireNumber>,
    #[serde(default)]
    bid_price: Option<WireNumber>,
    #[serde(default)]
    bid_qty: Option<WireNumber>,
    #[serde(default)]
    ask_price: Option<WireNumber>,
    #[serde(default)]
    ask_qty: Option<WireNumber>,
    #[serde(default)]
    close_time: Option<WireNumber>,
}

/// One price level of a CLOB book.
#[derive(Debug, Deserialize)]
struct BookLevel {
    price: WireNumber,
    size: WireNumber,
}

/// Polymarket CLOB order-book snapshot.
#[derive(Debug, Deserialize)]
struct PolymarketBook {
    #[serde(default)]
    bids: Option<Vec<BookLevel>>,
    #[serde(default)]
    asks: Option<Vec<BookLevel>>,
    #[serde(default)]
    timestamp: Option<WireNumber>,
}

/// One fill from the Polymarket trades endpoint.
#[derive(Debug, Deserialize)]
struct PolymarketTrade {
    side: String,
    size: WireNumber,
    price: WireNumber,
    /// Seconds since the epoch.
    #[serde(default)]
    timestamp: Option<WireNumber>,
}

/// Parser for one configured source.
#[derive(Debug, Clone)]
pub struct MessageParser {
    kind: SourceKind,
}

impl MessageParser {
    pub fn new(kind: SourceKind) -> Self {
        Self { kind }
    }

    pub fn kind(&self) -> SourceKind {
        self.kind
    }

    /// Parse one payload.
    ///
    /// Returns `Ok(None)` for control messages (e.g. subscription acks) and
    /// `DataShape` when the payload does not match the source schema.
    pub fn parse(&self, text: &str) -> FeedResult<Option<RawReading>> {
        let value: Value = serde_json::from_str(text)?;
        match self.kind {
            SourceKind::BinanceStream => self.parse_binance_stream(value),
            SourceKind::BinanceRest => self.parse_binance_rest(value).map(Some),
            SourceKind::PolymarketBook => self.parse_polymarket_book(value).map(Some),
            SourceKind::PolymarketTrades => self.parse_polymarket_trades(value).map(Some),
        }
    }

    fn parse_binance_stream(&self, value: Value) -> FeedResult<Option<RawReading>> {
        let Value::Object(mut map) = value else {
            return Err(self.data_shape("expected a JSON object"));
        };

        // {"result": null, "id": 1}
        if map.contains_key("id") && map.contains_key("result") {
            debug!(id = ?map.get("id"), "Subscription acknowledged");
            return Ok(None);
        }

        // Combined-stream envelope: {"stream": "...", "data": {...}}
        let event_value = if map.contains_key("stream") {
            map.remove("data")
                .ok_or_else(|| self.data_shape("stream envelope without data"))?
        } else {
            Value::Object(map)
        };

        let event: BinanceTickerEvent = serde_json::from_value(event_value)
            .map_err(|e| self.data_shape(format!("invalid ticker event: {e}")))?;

        match event.event_type.as_deref() {
            Some("24hrTicker") => {}
            Some(other) => return Err(self.data_shape(format!("unexpected event type {other}"))),
            None if event.last_price.is_none() => {
                return Err(self.data_shape("missing event type and last price"))
            }
            None => {}
        }

        Ok(Some(RawReading::Ticker(TickerFields {
            last_price: opt_f64(&event.last_price, "c")?,
            bid_qty: opt_f64(&event.bid_qty, "B")?,
            ask_qty: opt_f64(&event.ask_qty, "A")?,
            best_bid: opt_f64(&event.best_bid, "b")?,
            best_ask: opt_f64(&event.best_ask, "a")?,
            event_time_ms: opt_i64(&event.event_time, "E")?,
        })))
    }

    fn parse_binance_rest(&self, value: Value) -> FeedResult<RawReading> {
        if !value.is_object() {
            return Err(self.data_shape("expected a JSON object"));
        }
        let ticker: BinanceRestTicker = serde_json::from_value(value)
            .map_err(|e| self.data_shape(format!("invalid ticker: {e}")))?;
        if ticker.last_price.is_none() && ticker.bid_qty.is_none() && ticker.ask_qty.is_none() {
            return Err(self.data_shape("no ticker fields present"));
        }

        Ok(RawReading::Ticker(TickerFields {
            last_price: opt_f64(&ticker.last_price, "lastPrice")?,
            bid_qty: opt_f64(&ticker.bid_qty, "bidQty")?,
            ask_qty: opt_f64(&ticker.ask_qty, "askQty")?,
            best_bid: opt_f64(&ticker.bid_price, "bidPrice")?,
            best_ask: opt_f64(&ticker.ask_price, "askPrice")?,
            event_time_ms: opt_i64(&ticker.close_time, "closeTime")?,
        }))
    }

    fn parse_polymarket_book(&self, value: Value) -> FeedResult<RawReading> {
        if !value.is_object() {
            return Err(self.data_shape("expected a JSON object"));
        }
        let book: PolymarketBook = serde_json::from_value(value)
            .map_err(|e| self.data_shape(format!("invalid book: {e}")))?;
        if book.bids.is_none() && book.asks.is_none() {
            return Err(self.data_shape("book without bids or asks"));
        }

        let bids = parse_levels(book.bids.as_deref().unwrap_or_default())?;
        let asks = parse_levels(book.asks.as_deref().unwrap_or_default())?;

        let best_bid = bids.iter().map(|(p, _)| *p).reduce(f64::max);
        let best_ask = asks.iter().map(|(p, _)| *p).reduce(f64::min);
        let price = match (best_bid, best_ask) {
            (Some(bid), Some(ask)) => Some((bid + ask) / 2.0),
            (bid, ask) => bid.or(ask),
        };

        Ok(RawReading::OrderbookSnapshot(SnapshotFields {
            price,
            buy_volume: bids.iter().map(|(_, s)| s).sum(),
            sell_volume: asks.iter().map(|(_, s)| s).sum(),
            best_bid,
            best_ask,
            timestamp_ms: opt_i64(&book.timestamp, "timestamp")?,
        }))
    }

    fn parse_polymarket_trades(&self, value: Value) -> FeedResult<RawReading> {
        if !value.is_array() {
            return Err(self.data_shape("expected a JSON array of trades"));
        }
        let trades: Vec<PolymarketTrade> = serde_json::from_value(value)
            .map_err(|e| self.data_shape(format!("invalid trades: {e}")))?;

        let mut snapshot = SnapshotFields::default();
        let mut latest: Option<(i64, f64)> = None;

        for (idx, trade) in trades.iter().enumerate() {
            let size = trade.size.to_f64("size")?;
            let price = trade.price.to_f64("price")?;
            match trade.side.to_ascii_uppercase().as_str() {
                "BUY" => snapshot.buy_volume += size,
                "SELL" => snapshot.sell_volume += size,
                other => return Err(self.data_shape(format!("unknown trade side {other}"))),
            }

            // Without timestamps the first entry is taken as the most recent.
            let ts = opt_i64(&trade.timestamp, "timestamp")?.unwrap_or(-(idx as i64));
            if latest.map_or(true, |(best, _)| ts > best) {
                latest = Some((ts, price));
            }
        }

        if let Some((ts, price)) = latest {
            snapshot.price = Some(price);
            snapshot.timestamp_ms = (ts > 0).then(|| ts.saturating_mul(1000));
        }

        Ok(RawReading::OrderbookSnapshot(snapshot))
    }

    fn data_shape(&self, detail: impl Into<String>) -> FeedError {
        FeedError::DataShape {
            source_kind: self.kind.as_str(),
            detail: detail.into(),
        }
    }
}

fn parse_levels(levels: &[BookLevel]) -> FeedResult<Vec<(f64, f64)>> {
    levels
        .iter()
        .map(|level| Ok((level.price.to_f64("price")?, level.size.to_f64("size")?)))
        .collect()
}
