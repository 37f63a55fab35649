//! Cumulative statistics over successful cycles.

use eqmon_core::ComputationResult;
use serde::Serialize;

/// Running means and counts for one monitoring run.
///
/// Means are updated incrementally, so no per-cycle history is kept.
/// `mean_delta` is in decimal units (Δ / 1000).
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct RunningStats {
    pub readings_count: u64,
    pub mean_delta: f64,
    pub mean_efficiency_percent: f64,
    pub optimal_count: u64,
}

impl RunningStats {
    pub fn new() -> Self {
        Self::default()
    }

    /// Fold one successful cycle result in.
    pub fn record(&mut self, result: &ComputationResult) {
        self.readings_count += 1;
        let n = self.readings_count as f64;
        self.mean_delta += (result.delta_decimal() - self.mean_delta) / n;
        self.mean_efficiency_percent += (result.efficiency_percent - self.mean_efficiency_percent) / n;
        if result.is_optimal {
            self.optimal_count += 1;
        }
    }

    /// Fraction of recorded cycles that were optimal (0 when empty).
    pub fn optimal_rate(&self) -> f64 {
        if self.readings_count == 0 {
            0.0
        } else {
            self.optimal_count as f64 / self.readings_count as f64
        }
    }

    pub fn is_empty(&self) -> bool {
        self.readings_count == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::{Rng, SeedableRng};

    #[test]
    fn test_empty() {
        let stats = RunningStats::new();
        assert!(stats.is_empty());
        assert_eq!(stats.optimal_rate(), 0.0);
        assert_eq!(stats.mean_delta, 0.0);
    }

    #[test]
    fn test_incremental_matches_batch() {
        let mut rng = StdRng::seed_from_u64(42);
        let results: Vec<ComputationResult> = (0..500)
            .map(|_| {
                ComputationResult::from_raw(
                    rng.gen_range(-5_000..5_000),
                    rng.gen_range(0..1_000_000_000),
                    rng.gen_bool(0.3),
                )
            })
            .collect();

        let mut stats = RunningStats::new();
        for r in &results {
            stats.record(r);
        }

        let n = results.len() as f64;
        let batch_delta = results.iter().map(|r| r.delta_decimal()).sum::<f64>() / n;
        let batch_eff = results.iter().map(|r| r.efficiency_percent).sum::<f64>() / n;

        assert_eq!(stats.readings_count, 500);
        assert!((stats.mean_delta - batch_delta).abs() < 1e-9);
        assert!((stats.mean_efficiency_percent - batch_eff).abs() < 1e-9);
    }

    #[test]
    fn test_optimal_count_any_interleaving() {
        let flags = [true, false, false, true, true, false, true];
        let mut stats = RunningStats::new();
        for flag in flags {
            stats.record(&ComputationResult::from_raw(230, 1_000_000_000, flag));
        }
        assert_eq!(stats.optimal_count, 4);
        assert_eq!(stats.readings_count, 7);
        assert!((stats.optimal_rate() - 4.0 / 7.0).abs() < 1e-12);
    }

    #[test]
    fn test_mean_delta_in_decimal_units() {
        let mut stats = RunningStats::new();
        stats.record(&ComputationResult::from_raw(200, 0, false));
        stats.record(&ComputationResult::from_raw(300, 0, false));
        assert!((stats.mean_delta - 0.25).abs() < 1e-12);
    }
}
