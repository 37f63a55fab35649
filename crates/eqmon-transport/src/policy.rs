//! Retry and scheduling policies for both transport modes.

use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Largest doubling exponent applied by exponential backoff.
const MAX_BACKOFF_EXPONENT: u32 = 10;

/// Delay growth between consecutive retries.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BackoffKind {
    /// Same delay every time.
    #[default]
    Flat,
    /// `base * 2^(attempt-1)`, capped at the maximum delay.
    Exponential,
}

/// Reconnection policy for the push transport.
#[derive(Debug, Clone)]
pub struct ReconnectPolicy {
    /// Delay before the first reconnection attempt.
    pub base_delay: Duration,
    /// Ceiling for exponential backoff.
    pub max_delay: Duration,
    pub backoff: BackoffKind,
    /// Maximum consecutive reconnection attempts (0 = unlimited).
    pub max_attempts: u32,
}

impl Default for ReconnectPolicy {
    fn default() -> Self {
        Self {
            base_delay: Duration::from_millis(5000),
            max_delay: Duration::from_millis(60000),
            backoff: BackoffKind::Flat,
            max_attempts: 0,
        }
    }
}

impl ReconnectPolicy {
    /// Delay before reconnection attempt number `attempt` (1-based).
    pub fn delay_for(&self, attempt: u32) -> Duration {
        backoff_delay(self.backoff, self.base_delay, self.max_delay, attempt)
    }

    /// Whether attempt number `attempt` exceeds the configured ceiling.
    pub fn is_exhausted(&self, attempt: u32) -> bool {
        self.max_attempts > 0 && attempt > self.max_attempts
    }
}

/// Decide whether a closed connection gets a reconnection attempt.
///
/// Returns exactly one delay while the run flag is set and `None` once it
/// has been cleared or the attempt ceiling is passed.
pub fn schedule_reconnect(
    run_active: bool,
    policy: &ReconnectPolicy,
    attempt: u32,
) -> Option<Duration> {
    if !run_active || policy.is_exhausted(attempt) {
        return None;
    }
    Some(policy.delay_for(attempt))
}

/// Scheduling policy for the pull transport.
#[derive(Debug, Clone)]
pub struct PollPolicy {
    /// Delay between the end of one request and the start of the next.
    pub interval: Duration,
    /// Back off the interval while requests keep failing.
    pub backoff: bool,
    /// Ceiling for the backed-off interval.
    pub max_delay: Duration,
    /// Stop polling after this many consecutive failures (0 = never).
    pub max_consecutive_failures: u32,
}

impl Default for PollPolicy {
    fn default() -> Self {
        Self {
            interval: Duration::from_millis(1000),
            backoff: false,
            max_delay: Duration::from_millis(60000),
            max_consecutive_failures: 0,
        }
    }
}

impl PollPolicy {
    /// Delay before the next request given the current failure streak.
    pub fn delay_after(&self, consecutive_failures: u32) -> Duration {
        if !self.backoff || consecutive_failures == 0 {
            return self.interval;
        }
        backoff_delay(
            BackoffKind::Exponential,
            self.interval,
            self.max_delay.max(self.interval),
            consecutive_failures,
        )
    }

    pub fn is_exhausted(&self, consecutive_failures: u32) -> bool {
        self.max_consecutive_failures > 0 && consecutive_failures >= self.max_consecutive_failures
    }
}

fn backoff_delay(kind: BackoffKind, base: Duration, max: Duration, attempt: u32) -> Duration {
    match kind {
        BackoffKind::Flat => base,
        BackoffKind::Exponential => {
            // attempt=1 -> base, attempt=2 -> 2*base, attempt=3 -> 4*base
            let exponent = attempt.saturating_sub(1).min(MAX_BACKOFF_EXPONENT);
            base.saturating_mul(1u32 << exponent).min(max)
        }
    }
}
