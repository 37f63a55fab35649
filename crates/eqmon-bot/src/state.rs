//! Per-instance mutable state.

use eqmon_core::{PriceHistory, Result};
use eqmon_telemetry::RunningStats;

/// Everything one monitoring instance accumulates.
///
/// Owned by a single [`MonitorSession`](crate::MonitorSession); independent
/// instances never share it.
#[derive(Debug, Clone)]
pub struct MonitorState {
    pub history: PriceHistory,
    /// Statistics over successful cycles only.
    pub stats: RunningStats,
    pub cycles_attempted: u64,
    pub compute_failures: u64,
    pub synthetic_readings: u64,
    pub alerts: u64,
}

impl MonitorState {
    pub fn new(history_capacity: usize) -> Result<Self> {
        Ok(Self {
            history: PriceHistory::new(history_capacity)?,
            stats: RunningStats::new(),
            cycles_attempted: 0,
            compute_failures: 0,
            synthetic_readings: 0,
            alerts: 0,
        })
    }
}
