//! Synthetic fallback readings.
//!
//! Used only for diagnostics when the source is unreachable or its payload is
//! unrecognized. Every reading produced here is tagged `Synthetic`.

use chrono::Utc;
use eqmon_core::constants::DEFAULT_PRICE;
use eqmon_core::{MarketReading, ReadingOrigin};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

/// Source could not be reached.
pub const REASON_UNREACHABLE: &str = "unreachable";
/// Source payload did not match its schema.
pub const REASON_DATA_SHAPE: &str = "data_shape";

const SYNTHETIC_PRICE_MIN: f64 = 0.1;
const SYNTHETIC_PRICE_MAX: f64 = 0.9;
/// Largest single-step price perturbation.
const SYNTHETIC_STEP: f64 = 0.05;
const SYNTHETIC_VOLUME_MIN: f64 = 1.0;
const SYNTHETIC_VOLUME_MAX: f64 = 1000.0;

/// Pseudo-random walk around the default price.
#[derive(Debug)]
pub struct SyntheticGenerator {
    rng: StdRng,
    last_price: f64,
}

impl SyntheticGenerator {
    /// Seeded generators are reproducible; `None` seeds from entropy.
    pub fn new(seed: Option<u64>) -> Self {
        let rng = match seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };
        Self {
            rng,
            last_price: DEFAULT_PRICE,
        }
    }

    /// Produce the next synthetic reading.
    pub fn next_reading(&mut self, reason: &str) -> MarketReading {
        let step = self.rng.gen_range(-SYNTHETIC_STEP..=SYNTHETIC_STEP);
        self.last_price = (self.last_price + step).clamp(SYNTHETIC_PRICE_MIN, SYNTHETIC_PRICE_MAX);

        MarketReading {
            price: self.last_price,
            bid_volume: self
                .rng
                .gen_range(SYNTHETIC_VOLUME_MIN..SYNTHETIC_VOLUME_MAX),
            ask_volume: self
                .rng
                .gen_range(SYNTHETIC_VOLUME_MIN..SYNTHETIC_VOLUME_MAX),
            price_spread: None,
            volume_reported: true,
            origin: ReadingOrigin::Synthetic {
                reason: reason.to_string(),
            },
            timestamp: Utc::now(),
        }
    }
}
