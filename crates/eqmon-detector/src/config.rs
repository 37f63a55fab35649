//! Detector configuration.

use eqmon_core::constants::HEALTHY_DELTA_THRESHOLD;
use serde::{Deserialize, Serialize};

/// Configuration for status classification.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DetectorConfig {
    /// Decimal Δ above which a non-optimal cycle is "healthy".
    #[serde(default = "default_healthy_delta_threshold")]
    pub healthy_delta_threshold: f64,
}

fn default_healthy_delta_threshold() -> f64 {
    HEALTHY_DELTA_THRESHOLD
}

impl Default for DetectorConfig {
    fn default() -> Self {
        Self {
            healthy_delta_threshold: default_healthy_delta_threshold(),
        }
    }
}

impl DetectorConfig {
    /// Validate configuration values.
    pub fn validate(&self) -> Result<(), String> {
        if !self.healthy_delta_threshold.is_finite() {
            return Err(format!(
                "healthy_delta_threshold ({}) must be finite",
                self.healthy_delta_threshold
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_threshold() {
        let config = DetectorConfig::default();
        assert_eq!(config.healthy_delta_threshold, 0.2);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_empty_toml_uses_default() {
        let config: DetectorConfig = toml::from_str("").unwrap();
        assert_eq!(config.healthy_delta_threshold, 0.2);
    }

    #[test]
    fn test_non_finite_rejected() {
        let config = DetectorConfig {
            healthy_delta_threshold: f64::NAN,
        };
        assert!(config.validate().is_err());
    }
}
