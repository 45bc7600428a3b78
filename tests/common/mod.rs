// tests/common/mod.rs
//! Scripted transport shared by the integration tests.
#![allow(dead_code)]

use monday_cli::{
    GraphqlRequest, GraphqlTransport, MondayClient, RateLimitConfig, RateLimiter, RawOutcome,
    RetryPolicy,
};
use parking_lot::Mutex;
use serde_json::{json, Value};
use std::collections::VecDeque;
use std::sync::Arc;
use std::time::Duration;
use tokio::time::Instant;

/// Replays a fixed list of outcomes and records every request it sees.
pub struct ScriptedTransport {
    script: Mutex<VecDeque<RawOutcome>>,
    calls: Mutex<Vec<(Instant, GraphqlRequest)>>,
}

impl ScriptedTransport {
    pub fn new(outcomes: impl IntoIterator<Item = RawOutcome>) -> Arc<Self> {
        Arc::new(Self {
            script: Mutex::new(outcomes.into_iter().collect()),
            calls: Mutex::new(Vec::new()),
        })
    }

    pub fn calls(&self) -> Vec<(Instant, GraphqlRequest)> {
        self.calls.lock().clone()
    }

    pub fn requests(&self) -> Vec<GraphqlRequest> {
        self.calls().into_iter().map(|(_, request)| request).collect()
    }

    pub fn call_count(&self) -> usize {
        self.calls.lock().len()
    }

    /// Gaps between consecutive requests.
    pub fn gaps(&self) -> Vec<Duration> {
        self.calls()
            .windows(2)
            .map(|pair| pair[1].0 - pair[0].0)
            .collect()
    }
}

#[async_trait::async_trait]
impl GraphqlTransport for ScriptedTransport {
    async fn send(&self, request: &GraphqlRequest) -> RawOutcome {
        self.calls.lock().push((Instant::now(), request.clone()));
        self.script
            .lock()
            .pop_front()
            .unwrap_or_else(|| RawOutcome::TransportFailure {
                reason: "script exhausted".to_string(),
            })
    }
}

/// A limiter loose enough never to delay a test.
pub fn unlimited() -> Arc<RateLimiter> {
    Arc::new(RateLimiter::new(
        RateLimitConfig::new(10_000, Duration::from_secs(1)).unwrap(),
    ))
}

pub fn client(transport: &Arc<ScriptedTransport>) -> MondayClient<Arc<ScriptedTransport>> {
    MondayClient::new(Arc::clone(transport), unlimited(), RetryPolicy::default())
}

pub fn ok(data: Value) -> RawOutcome {
    RawOutcome::ok_json(&json!({ "data": data }))
}

pub fn network() -> RawOutcome {
    RawOutcome::TransportFailure {
        reason: "connection refused".to_string(),
    }
}

pub fn http(status: u16, body: Value) -> RawOutcome {
    RawOutcome::Http {
        status,
        retry_after: None,
        body: body.to_string(),
    }
}

pub fn api_error(message: &str) -> RawOutcome {
    RawOutcome::ok_json(&json!({
        "errors": [{ "message": message, "extensions": { "code": "InvalidArgumentException" } }]
    }))
}
