//! Human-readable status line, alert block and run summary.

use crate::state::MonitorState;
use eqmon_core::{ComputationResult, MarketReading, Parameters};
use eqmon_detector::{EquilibriumAlert, EquilibriumStatus};

/// One line per successful cycle.
pub fn status_line(
    symbol: &str,
    reading: &MarketReading,
    parameters: &Parameters,
    result: &ComputationResult,
    status: EquilibriumStatus,
) -> String {
    format!(
        "{} {} [{}] price={:.6} eta={:.4} lambda={:.4} delta={:.3} efficiency={:.2}% status={}",
        reading.timestamp.format("%H:%M:%S%.3f"),
        symbol,
        reading.origin,
        reading.price,
        parameters.eta,
        parameters.lambda,
        result.delta_decimal(),
        result.efficiency_percent,
        status.as_str().to_uppercase(),
    )
}

/// Alert block for a critical equilibrium.
pub fn alert_block(alert: &EquilibriumAlert) -> String {
    let mut block = format!(
        "CRITICAL EQUILIBRIUM DETECTED\n  symbol:     {}\n  time:       {}\n  delta:      {:.3} (raw {})\n  efficiency: {:.2}%\n  eta:        {:.6}\n  lambda:     {:.6}",
        alert.symbol,
        alert.detected_at.to_rfc3339(),
        alert.result.delta_decimal(),
        alert.result.delta,
        alert.result.efficiency_percent,
        alert.parameters.eta,
        alert.parameters.lambda,
    );
    if alert.is_synthetic() {
        block.push_str("\n  NOTE: triggered by a SYNTHETIC reading (diagnostic only)");
    }
    block
}

/// Cumulative statistics.
pub fn summary(state: &MonitorState) -> String {
    let stats = &state.stats;
    format!(
        "readings={} mean_delta={:.4} mean_efficiency={:.2}% optimal={} ({:.1}%) attempted={} compute_failures={} synthetic={} alerts={}",
        stats.readings_count,
        stats.mean_delta,
        stats.mean_efficiency_percent,
        stats.optimal_count,
        stats.optimal_rate() * 100.0,
        state.cycles_attempted,
        state.compute_failures,
        state.synthetic_readings,
        state.alerts,
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use eqmon_core::ReadingOrigin;

    fn alert(origin: ReadingOrigin) -> EquilibriumAlert {
        EquilibriumAlert {
            symbol: "BTCUSDT".to_string(),
            parameters: Parameters::new(0.707, 0.707),
            result: ComputationResult::from_raw(230, 1_000_000_000, true),
            origin,
            detected_at: Utc::now(),
        }
    }

    #[test]
    fn test_status_line_fields() {
        let mut reading = MarketReading::with_defaults(ReadingOrigin::Ticker);
        reading.price = 43250.5;
        let line = status_line(
            "BTCUSDT",
            &reading,
            &Parameters::new(0.75, 0.5),
            &ComputationResult::from_raw(412, 876_000_000, false),
            EquilibriumStatus::Healthy,
        );
        assert!(line.contains("BTCUSDT [TICKER]"));
        assert!(line.contains("price=43250.500000"));
        assert!(line.contains("delta=0.412"));
        assert!(line.contains("efficiency=87.60%"));
        assert!(line.ends_with("status=HEALTHY"));
    }

    #[test]
    fn test_alert_block() {
        let block = alert_block(&alert(ReadingOrigin::Ticker));
        assert!(block.starts_with("CRITICAL EQUILIBRIUM DETECTED"));
        assert!(block.contains("delta:      0.230 (raw 230)"));
        assert!(!block.contains("SYNTHETIC"));

        let block = alert_block(&alert(ReadingOrigin::Synthetic {
            reason: "unreachable".to_string(),
        }));
        assert!(block.contains("SYNTHETIC"));
    }

    #[test]
    fn test_summary() {
        let mut state = MonitorState::new(10).unwrap();
        state
            .stats
            .record(&ComputationResult::from_raw(230, 1_000_000_000, true));
        state.cycles_attempted = 2;
        state.compute_failures = 1;
        let text = summary(&state);
        assert!(text.contains("readings=1"));
        assert!(text.contains("optimal=1 (100.0%)"));
        assert!(text.contains("compute_failures=1"));
    }
}
