// src/api/retry.rs
//! Exponential backoff schedule for transient failures.

use crate::constants::{
    DEFAULT_RETRY_BACKOFF_FACTOR, DEFAULT_RETRY_BASE_DELAY, DEFAULT_RETRY_MAX_ATTEMPTS,
    DEFAULT_RETRY_MAX_DELAY,
};
use crate::types::ValidationError;
use std::time::Duration;

/// Immutable retry configuration.
///
/// The delay before attempt `n` (n >= 2) is
/// `base_delay * backoff_factor^(n-2)`, capped at `max_delay`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RetryPolicy {
    max_attempts: u32,
    backoff_factor: f64,
    base_delay: Duration,
    max_delay: Duration,
}

impl RetryPolicy {
    pub fn new(
        max_attempts: u32,
        backoff_factor: f64,
        base_delay: Duration,
    ) -> Result<Self, ValidationError> {
        if max_attempts == 0 {
            return Err(ValidationError::InvalidRetryPolicy {
                reason: "max attempts must be at least 1".to_string(),
            });
        }
        if !backoff_factor.is_finite() || backoff_factor <= 1.0 {
            return Err(ValidationError::InvalidRetryPolicy {
                reason: format!("backoff factor must be greater than 1, got {}", backoff_factor),
            });
        }
        Ok(Self {
            max_attempts,
            backoff_factor,
            base_delay,
            max_delay: DEFAULT_RETRY_MAX_DELAY,
        })
    }

    /// Replaces the ceiling applied to computed delays.
    pub fn with_max_delay(mut self, max_delay: Duration) -> Self {
        self.max_delay = max_delay;
        self
    }

    pub fn max_attempts(&self) -> u32 {
        self.max_attempts
    }

    pub fn backoff_factor(&self) -> f64 {
        self.backoff_factor
    }

    pub fn base_delay(&self) -> Duration {
        self.base_delay
    }

    /// Delay inserted before `attempt` (1-based). The first attempt never waits.
    pub fn delay_before(&self, attempt: u32) -> Duration {
        if attempt < 2 || self.base_delay.is_zero() {
            return Duration::ZERO;
        }
        let exponent = i32::try_from(attempt - 2).unwrap_or(i32::MAX);
        let secs = self.base_delay.as_secs_f64() * self.backoff_factor.powi(exponent);
        Duration::try_from_secs_f64(secs.min(self.max_delay.as_secs_f64()))
            .unwrap_or(self.max_delay)
    }

    /// Delay after `failed_attempt` failed. A server-suggested wait acts as
    /// a floor on the computed backoff.
    pub fn delay_after(&self, failed_attempt: u32, server_hint: Option<Duration>) -> Duration {
        let backoff = self.delay_before(failed_attempt.saturating_add(1));
        server_hint.map_or(backoff, |hint| hint.max(backoff))
    }
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: DEFAULT_RETRY_MAX_ATTEMPTS,
            backoff_factor: DEFAULT_RETRY_BACKOFF_FACTOR,
            base_delay: DEFAULT_RETRY_BASE_DELAY,
            max_delay: DEFAULT_RETRY_MAX_DELAY,
        }
    }
}
