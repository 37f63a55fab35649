//! Tagged raw readings and wire helpers.

use crate::error::{FeedError, FeedResult};
use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;
use serde::Deserialize;

/// Fields carried by a live ticker.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TickerFields {
    pub last_price: Option<f64>,
    /// Quantity at the best bid.
    pub bid_qty: Option<f64>,
    /// Quantity at the best ask.
    pub ask_qty: Option<f64>,
    pub best_bid: Option<f64>,
    pub best_ask: Option<f64>,
    pub event_time_ms: Option<i64>,
}

/// Fields carried by an order-book or trade-event snapshot.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SnapshotFields {
    /// Mid price or most recent fill.
    pub price: Option<f64>,
    /// Aggregate bid (buy) volume.
    pub buy_volume: f64,
    /// Aggregate ask (sell) volume.
    pub sell_volume: f64,
    pub best_bid: Option<f64>,
    pub best_ask: Option<f64>,
    pub timestamp_ms: Option<i64>,
}

/// Source payload decoded into exactly one known shape.
#[derive(Debug, Clone, PartialEq)]
pub enum RawReading {
    Ticker(TickerFields),
    OrderbookSnapshot(SnapshotFields),
    /// No usable market data; `reason` is a category label.
    Synthetic { reason: String },
}

/// Numeric wire value sent either as a JSON number or a decimal string.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub(crate) enum WireNumber {
    Num(f64),
    Str(String),
}

impl WireNumber {
    /// Convert to `f64`, parsing strings exactly through `Decimal` first.
    pub(crate) fn to_f64(&self, field: &'static str) -> FeedResult<f64> {
        match self {
            Self::Num(v) if v.is_finite() => Ok(*v),
            Self::Num(v) => Err(FeedError::InvalidNumber {
                field,
                value: v.to_string(),
            }),
            Self::Str(s) => {
                let invalid = || FeedError::InvalidNumber {
                    field,
                    value: s.clone(),
                };
                let d: Decimal = s
                    .parse()
                    .or_else(|_| Decimal::from_scientific(s))
                    .map_err(|_| invalid())?;
                d.to_f64().ok_or_else(invalid)
            }
        }
    }

    pub(crate) fn to_i64(&self, field: &'static str) -> FeedResult<i64> {
        match self {
            Self::Num(v) if v.is_finite() => Ok(v.trunc() as i64),
            Self::Num(v) => Err(FeedError::InvalidNumber {
                field,
                value: v.to_string(),
            }),
            Self::Str(s) => s.parse::<i64>().map_err(|_| FeedError::InvalidNumber {
                field,
                value: s.clone(),
            }),
        }
    }
}

pub(crate) fn opt_f64(value: &Option<WireNumber>, field: &'static str) -> FeedResult<Option<f64>> {
    value.as_ref().map(|v| v.to_f64(field)).transpose()
}

pub(crate) fn opt_i64(value: &Option<WireNumber>, field: &'static str) -> FeedResult<Option<i64>> {
    value.as_ref().map(|v| v.to_i64(field)).transpose()
}
