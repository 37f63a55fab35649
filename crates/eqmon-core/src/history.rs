//! Bounded FIFO of recent prices.

use crate::error::{CoreError, Result};
use std::collections::VecDeque;

/// Recent prices, oldest first.
///
/// Length never exceeds capacity: pushing into a full buffer evicts the
/// oldest sample.
#[derive(Debug, Clone)]
pub struct PriceHistory {
    prices: VecDeque<f64>,
    capacity: usize,
}

impl PriceHistory {
    /// Create an empty history. Capacity must be at least 1.
    pub fn new(capacity: usize) -> Result<Self> {
        if capacity == 0 {
            return Err(CoreError::InvalidCapacity(capacity));
        }
        Ok(Self {
            prices: VecDeque::with_capacity(capacity),
            capacity,
        })
    }

    /// Append the newest price, evicting the oldest when full.
    pub fn push(&mut self, price: f64) {
        if self.prices.len() == self.capacity {
            self.prices.pop_front();
        }
        self.prices.push_back(price);
    }

    pub fn len(&self) -> usize {
        self.prices.len()
    }

    pub fn is_empty(&self) -> bool {
        self.prices.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Most recent price.
    pub fn latest(&self) -> Option<f64> {
        self.prices.back().copied()
    }

    /// Prices oldest first.
    pub fn iter(&self) -> impl DoubleEndedIterator<Item = f64> + ExactSizeIterator + '_ {
        self.prices.iter().copied()
    }

    /// The trailing `n` prices, oldest first (fewer if not enough buffered).
    pub fn tail(&self, n: usize) -> Vec<f64> {
        let skip = self.prices.len().saturating_sub(n);
        self.prices.iter().skip(skip).copied().collect()
    }

    /// Copy out the buffer, oldest first.
    pub fn to_vec(&self) -> Vec<f64> {
        self.prices.iter().copied().collect()
    }
}

impl Default for PriceHistory {
    fn default() -> Self {
        Self {
            prices: VecDeque::with_capacity(crate::constants::DEFAULT_HISTORY_SIZE),
            capacity: crate::constants::DEFAULT_HISTORY_SIZE,
        }
    }
}
