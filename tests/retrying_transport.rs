// tests/retrying_transport.rs
//! Retry, backoff and short-circuit behaviour of `MondayClient::execute`.

mod common;

use common::{api_error, client, http, network, ok, unlimited, ScriptedTransport};
use monday_cli::{
    ClassifiedError, GraphqlRequest, MondayClient, RateLimitConfig, RateLimiter, RawOutcome,
    RetryPolicy,
};
use pretty_assertions::assert_eq;
use serde_json::json;
use std::sync::Arc;
use std::time::Duration;

fn request() -> GraphqlRequest {
    GraphqlRequest::new("query { boards { id } }")
}

fn assert_close(actual: Duration, expected: Duration) {
    let tolerance = Duration::from_millis(50);
    assert!(
        actual >= expected && actual <= expected + tolerance,
        "expected ~{:?}, got {:?}",
        expected,
        actual
    );
}

#[tokio::test(start_paused = true)]
async fn test_network_failures_back_off_then_succeed() {
    let transport = ScriptedTransport::new([network(), network(), ok(json!({ "v": 3 }))]);
    let client = client(&transport);

    let response = client.execute(&request()).await.unwrap();

    assert_eq!(response.data(), &json!({ "v": 3 }));
    assert_eq!(transport.call_count(), 3);
    let gaps = transport.gaps();
    assert_close(gaps[0], Duration::from_secs(1));
    assert_close(gaps[1], Duration::from_secs(2));
}

#[tokio::test(start_paused = true)]
async fn test_authentication_failure_is_not_retried() {
    let transport = ScriptedTransport::new([
        http(401, json!({ "errors": [{ "message": "Not Authenticated" }] })),
        ok(json!({})),
    ]);
    let client = client(&transport);
    let started = tokio::time::Instant::now();

    let err = client.execute(&request()).await.unwrap_err();

    assert!(matches!(err, ClassifiedError::Authentication { .. }));
    assert_eq!(transport.call_count(), 1);
    assert_eq!(started.elapsed(), Duration::ZERO);
}

#[tokio::test(start_paused = true)]
async fn test_api_error_returns_immediately() {
    let transport = ScriptedTransport::new([api_error("Invalid board"), ok(json!({}))]);
    let client = client(&transport);

    let err = client.execute(&request()).await.unwrap_err();

    assert_eq!(
        err,
        ClassifiedError::ApiError {
            message: "Invalid board".to_string(),
            code: Some("InvalidArgumentException".to_string()),
        }
    );
    assert_eq!(transport.call_count(), 1);
}

#[tokio::test(start_paused = true)]
async fn test_idempotent_request_retries_api_errors() {
    let transport =
        ScriptedTransport::new([api_error("Temporary glitch"), ok(json!({ "ok": true }))]);
    let client = client(&transport);

    let response = client.execute(&request().idempotent()).await.unwrap();

    assert_eq!(response.data(), &json!({ "ok": true }));
    assert_eq!(transport.call_count(), 2);
    assert_close(transport.gaps()[0], Duration::from_secs(1));
}

#[tokio::test(start_paused = true)]
async fn test_server_wait_is_a_floor_on_backoff() {
    let throttled = RawOutcome::Http {
        status: 429,
        retry_after: Some(Duration::from_secs(30)),
        body: String::new(),
    };
    let transport = ScriptedTransport::new([throttled, ok(json!({}))]);
    let client = client(&transport);

    client.execute(&request()).await.unwrap();

    assert_close(transport.gaps()[0], Duration::from_secs(30));
}

#[tokio::test(start_paused = true)]
async fn test_exhausted_complexity_budget_waits_for_the_reset() {
    let exhausted = RawOutcome::ok_json(&json!({
        "errors": [{
            "message": "Complexity budget exhausted",
            "extensions": { "code": "COMPLEXITY_BUDGET_EXHAUSTED", "retry_in_seconds": 12 }
        }]
    }));
    let transport = ScriptedTransport::new([exhausted, ok(json!({ "boards": [] }))]);
    let client = client(&transport);

    let response = client.execute(&request()).await.unwrap();

    assert_eq!(response.data(), &json!({ "boards": [] }));
    assert_eq!(transport.call_count(), 2);
    assert_close(transport.gaps()[0], Duration::from_secs(12));
}

#[tokio::test(start_paused = true)]
async fn test_server_wait_never_adds_an_attempt() {
    let throttled = || RawOutcome::Http {
        status: 429,
        retry_after: Some(Duration::from_secs(5)),
        body: String::new(),
    };
    let transport =
        ScriptedTransport::new([throttled(), throttled(), throttled(), ok(json!({}))]);
    let client = client(&transport);

    let err = client.execute(&request()).await.unwrap_err();

    assert_eq!(
        err,
        ClassifiedError::RateLimit {
            retry_after: Some(Duration::from_secs(5))
        }
    );
    assert_eq!(transport.call_count(), 3);
}

#[tokio::test(start_paused = true)]
async fn test_exhausted_attempts_return_last_error() {
    let transport = ScriptedTransport::new([
        network(),
        http(503, json!({})),
        network(),
        ok(json!({})),
    ]);
    let client = client(&transport);

    let err = client.execute(&request()).await.unwrap_err();

    assert!(matches!(err, ClassifiedError::Network { .. }));
    assert_eq!(transport.call_count(), 3);
}

#[tokio::test(start_paused = true)]
async fn test_single_attempt_policy_never_sleeps() {
    let transport = ScriptedTransport::new([network(), ok(json!({}))]);
    let policy = RetryPolicy::new(1, 2.0, Duration::from_secs(1)).unwrap();
    let client = MondayClient::new(Arc::clone(&transport), unlimited(), policy);
    let started = tokio::time::Instant::now();

    assert!(client.execute(&request()).await.is_err());
    assert_eq!(transport.call_count(), 1);
    assert_eq!(started.elapsed(), Duration::ZERO);
}

#[tokio::test(start_paused = true)]
async fn test_every_attempt_takes_a_rate_budget_admission() {
    let transport = ScriptedTransport::new([network(), network(), ok(json!({}))]);
    let limiter = Arc::new(RateLimiter::new(
        RateLimitConfig::new(2, Duration::from_secs(10)).unwrap(),
    ));
    let policy = RetryPolicy::new(3, 2.0, Duration::ZERO).unwrap();
    let client = MondayClient::new(Arc::clone(&transport), limiter, policy);

    client.execute(&request()).await.unwrap();

    let calls = transport.calls();
    assert_eq!(calls.len(), 3);
    // The first two attempts fill the budget; the third waits for the window.
    assert_close(calls[1].0 - calls[0].0, Duration::ZERO);
    assert_close(calls[2].0 - calls[0].0, Duration::from_secs(10));
}

#[tokio::test(start_paused = true)]
async fn test_query_and_complexity_helpers() {
    let transport = ScriptedTransport::new([
        ok(json!({ "me": { "id": "1" } })),
        ok(json!({
            "complexity": { "before": 5000000, "after": 4999990, "reset_in_x_seconds": 42 }
        })),
    ]);
    let client = client(&transport);

    let data = client
        .query("query { me { id } }", serde_json::Map::new())
        .await
        .unwrap();
    assert_eq!(data, json!({ "me": { "id": "1" } }));

    let complexity = client.complexity().await.unwrap();
    assert_eq!(complexity.after, Some(4_999_990));
    assert_eq!(complexity.reset_in_x_seconds, Some(42));

    let requests = transport.requests();
    assert_eq!(requests[0].variables(), &serde_json::Map::new());
    assert!(requests[1].query().contains("complexity"));
}
