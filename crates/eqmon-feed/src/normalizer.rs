//! Resolution of raw payloads into canonical readings.

use crate::parser::MessageParser;
use crate::raw::{RawReading, SnapshotFields, TickerFields};
use crate::source::SourceKind;
use crate::synthetic::{SyntheticGenerator, REASON_DATA_SHAPE, REASON_UNREACHABLE};
use chrono::{DateTime, TimeZone, Utc};
use eqmon_core::constants::{DEFAULT_PRICE, DEFAULT_VOLUME};
use eqmon_core::{MarketReading, ReadingOrigin};
use tracing::{debug, warn};

/// Counters kept by the normalizer for the run summary.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct NormalizerStats {
    pub market_readings: u64,
    pub synthetic_readings: u64,
    pub data_shape_errors: u64,
    pub ignored_messages: u64,
    /// Payloads dropped because the synthetic fallback is disabled.
    pub dropped: u64,
}

/// Turns transport payloads into `MarketReading`s.
pub struct Normalizer {
    parser: MessageParser,
    /// `None` when the synthetic fallback is disabled.
    synthetic: Option<SyntheticGenerator>,
    stats: NormalizerStats,
}

impl Normalizer {
    pub fn new(kind: SourceKind, synthetic: Option<SyntheticGenerator>) -> Self {
        Self {
            parser: MessageParser::new(kind),
            synthetic,
            stats: NormalizerStats::default(),
        }
    }

    pub fn stats(&self) -> NormalizerStats {
        self.stats
    }

    /// Normalize one payload body.
    ///
    /// Control messages yield `None`. Unrecognized payloads yield a synthetic
    /// reading (or `None` if the fallback is disabled).
    pub fn ingest(&mut self, text: &str) -> Option<MarketReading> {
        match self.parser.parse(text) {
            Ok(Some(raw)) => self.normalize(raw),
            Ok(None) => {
                self.stats.ignored_messages += 1;
                None
            }
            Err(e) => {
                self.stats.data_shape_errors += 1;
                warn!(
                    source = self.parser.kind().as_str(),
                    error = %e,
                    "Unrecognized payload"
                );
                self.normalize(RawReading::Synthetic {
                    reason: REASON_DATA_SHAPE.to_string(),
                })
            }
        }
    }

    /// Reading for a cycle in which the source could not be reached.
    pub fn unreachable(&mut self, detail: &str) -> Option<MarketReading> {
        debug!(%detail, "Source unreachable");
        self.normalize(RawReading::Synthetic {
            reason: REASON_UNREACHABLE.to_string(),
        })
    }

    /// Resolve a tagged raw reading.
    pub fn normalize(&mut self, raw: RawReading) -> Option<MarketReading> {
        let reading = match raw {
            RawReading::Ticker(fields) => from_ticker(fields),
            RawReading::OrderbookSnapshot(fields) => from_snapshot(fields),
            RawReading::Synthetic { reason } => {
                let Some(generator) = self.synthetic.as_mut() else {
                    self.stats.dropped += 1;
                    warn!(%reason, "Synthetic fallback disabled, skipping cycle");
                    return None;
                };
                let reading = generator.next_reading(&reason);
                self.stats.synthetic_readings += 1;
                warn!(
                    %reason,
                    price = reading.price,
                    "Using SYNTHETIC reading (not market data)"
                );
                return Some(reading);
            }
        };
        self.stats.market_readings += 1;
        Some(reading)
    }
}

fn from_ticker(fields: TickerFields) -> MarketReading {
    MarketReading {
        price: fields.last_price.unwrap_or(DEFAULT_PRICE),
        bid_volume: fields.bid_qty.unwrap_or(DEFAULT_VOLUME),
        ask_volume: fields.ask_qty.unwrap_or(DEFAULT_VOLUME),
        price_spread: spread(fields.best_bid, fields.best_ask),
        volume_reported: fields.bid_qty.is_some() || fields.ask_qty.is_some(),
        origin: ReadingOrigin::Ticker,
        timestamp: timestamp_or_now(fields.event_time_ms),
    }
}

fn from_snapshot(fields: SnapshotFields) -> MarketReading {
    MarketReading {
        price: fields.price.unwrap_or(DEFAULT_PRICE),
        bid_volume: fields.buy_volume,
        ask_volume: fields.sell_volume,
        price_spread: spread(fields.best_bid, fields.best_ask),
        volume_reported: true,
        origin: ReadingOrigin::Orderbook,
        timestamp: timestamp_or_now(fields.timestamp_ms),
    }
}

fn spread(best_bid: Option<f64>, best_ask: Option<f64>) -> Option<f64> {
    match (best_bid, best_ask) {
        (Some(bid), Some(ask)) => Some(ask - bid),
        _ => None,
    }
}

fn timestamp_or_now(ms: Option<i64>) -> DateTime<Utc> {
    ms.and_then(|ms| Utc.timestamp_millis_opt(ms).single())
        .unwrap_or_else(Utc::now)
}
