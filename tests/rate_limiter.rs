// tests/rate_limiter.rs
//! Rolling-window admission under concurrent callers.

use monday_cli::{RateLimitConfig, RateLimiter};
use std::sync::Arc;
use std::time::Duration;
use tokio::time::Instant;

fn limiter(max_calls: u32, period_secs: u64) -> Arc<RateLimiter> {
    Arc::new(RateLimiter::new(
        RateLimitConfig::new(max_calls, Duration::from_secs(period_secs)).unwrap(),
    ))
}

#[tokio::test(start_paused = true)]
async fn test_calls_within_budget_are_not_delayed() {
    let limiter = limiter(3, 1);
    let started = Instant::now();

    for _ in 0..3 {
        limiter.acquire().await;
    }

    assert_eq!(started.elapsed(), Duration::ZERO);
    assert_eq!(limiter.in_window(), 3);
}

#[tokio::test(start_paused = true)]
async fn test_excess_call_waits_for_oldest_to_leave() {
    let limiter = limiter(2, 10);
    let started = Instant::now();

    limiter.acquire().await;
    tokio::time::sleep(Duration::from_secs(4)).await;
    limiter.acquire().await;
    limiter.acquire().await;

    // The third admission waits until the first is 10s old.
    assert_eq!(started.elapsed(), Duration::from_secs(10));
}

#[tokio::test(start_paused = true)]
async fn test_concurrent_callers_never_exceed_the_window() {
    let limiter = limiter(3, 1);
    let mut handles = Vec::new();

    for _ in 0..10 {
        let limiter = Arc::clone(&limiter);
        handles.push(tokio::spawn(async move {
            limiter.acquire().await;
            Instant::now()
        }));
    }

    let mut admitted = Vec::new();
    for handle in handles {
        admitted.push(handle.await.unwrap());
    }
    admitted.sort();

    // Every call is eventually admitted.
    assert_eq!(admitted.len(), 10);
    for window in admitted.windows(4) {
        assert!(
            window[3] - window[0] >= Duration::from_secs(1),
            "four admissions within one period: {:?}",
            window
        );
    }
    assert_eq!(admitted[9] - admitted[0], Duration::from_secs(3));
}
