// src/api/rate_limit.rs
//! Client-side request budget over a rolling window.
//!
//! Every outbound attempt awaits `RateLimiter::acquire` first. The limiter
//! never rejects a call; it only delays it until admitting the call keeps
//! the trailing window within `max_calls`.

use crate::constants::{DEFAULT_RATE_LIMIT_CALLS, DEFAULT_RATE_LIMIT_PERIOD};
use crate::types::ValidationError;
use parking_lot::Mutex;
use std::collections::VecDeque;
use std::time::Duration;
use tokio::time::Instant;

/// How many calls may be admitted within any window of `period`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RateLimitConfig {
    max_calls: u32,
    period: Duration,
}

impl RateLimitConfig {
    pub fn new(max_calls: u32, period: Duration) -> Result<Self, ValidationError> {
        if max_calls == 0 {
            return Err(ValidationError::InvalidRateLimit {
                reason: "max calls must be at least 1".to_string(),
            });
        }
        if period.is_zero() {
            return Err(ValidationError::InvalidRateLimit {
                reason: "period must be greater than zero".to_string(),
            });
        }
        Ok(Self { max_calls, period })
    }

    pub fn max_calls(&self) -> u32 {
        self.max_calls
    }

    pub fn period(&self) -> Duration {
        self.period
    }
}

impl Default for RateLimitConfig {
    fn default() -> Self {
        Self {
            max_calls: DEFAULT_RATE_LIMIT_CALLS,
            period: DEFAULT_RATE_LIMIT_PERIOD,
        }
    }
}

/// Rolling-window limiter shared by every request of a client.
///
/// Construct one per budget and pass it around in an `Arc`; there is no
/// process-wide instance. Concurrent `acquire` calls serialize on the
/// window: each one reserves its admission instant under the lock and then
/// waits for it with the lock released.
#[derive(Debug)]
pub struct RateLimiter {
    config: RateLimitConfig,
    /// Admission instants, oldest first. May contain reserved instants
    /// slightly in the future while their callers are still waiting.
    admitted: Mutex<VecDeque<Instant>>,
}

impl RateLimiter {
    pub fn new(config: RateLimitConfig) -> Self {
        Self {
            config,
            admitted: Mutex::new(VecDeque::with_capacity(config.max_calls as usize)),
        }
    }

    /// Waits until one more call fits in the budget, then records it.
    pub async fn acquire(&self) {
        let now = Instant::now();
        let slot = self.reserve(now);
        if slot > now {
            log::debug!(
                "Rate budget of {} calls per {:?} reached, waiting {:?}",
                self.config.max_calls,
                self.config.period,
                slot - now
            );
            tokio::time::sleep_until(slot).await;
        }
    }

    /// Reserves the earliest admission instant at or after `now` that keeps
    /// every window of `period` within `max_calls` admissions.
    fn reserve(&self, now: Instant) -> Instant {
        let period = self.config.period;
        let max_calls = self.config.max_calls as usize;
        let mut admitted = self.admitted.lock();

        while let Some(&oldest) = admitted.front() {
            if oldest + period <= now {
                admitted.pop_front();
            } else {
                break;
            }
        }

        // Reservations stay in order, so the window check only ever needs
        // the admission `max_calls` places back.
        let mut slot = admitted.back().map_or(now, |&latest| latest.max(now));
        if admitted.len() >= max_calls {
            let blocking = admitted[admitted.len() - max_calls];
            slot = slot.max(blocking + period);
        }

        admitted.push_back(slot);
        slot
    }

    /// Number of admissions still inside the trailing window at `now`.
    pub fn in_window(&self) -> usize {
        let now = Instant::now();
        let period = self.config.period;
        self.admitted
            .lock()
            .iter()
            .filter(|&&admitted| admitted + period > now)
            .count()
    }
}

impl Default for RateLimiter {
    fn default() -> Self {
        Self::new(RateLimitConfig::default())
    }
}
