// src/api/mod.rs
//! monday.com API access: transport, classification, retries and paging.
//!
//! Commands talk to `MondayClient`, never to HTTP directly. The transport
//! is a trait so the retry and paging logic can run against scripted
//! responses in tests.

mod classify;
mod client;
mod monday_client;
mod pagination;
pub mod queries;
mod rate_limit;
mod retry;
mod types;

use std::sync::Arc;

/// The ability to deliver one GraphQL request and report what came back.
///
/// Implementations do not interpret the response: every outcome, including
/// connection failures, is returned as a `RawOutcome` for classification.
#[async_trait::async_trait]
pub trait GraphqlTransport: Send + Sync {
    async fn send(&self, request: &GraphqlRequest) -> RawOutcome;
}

#[async_trait::async_trait]
impl<T: GraphqlTransport + ?Sized> GraphqlTransport for Arc<T> {
    async fn send(&self, request: &GraphqlRequest) -> RawOutcome {
        (**self).send(request).await
    }
}

// Re-export the public interface
pub use classify::classify;
pub use client::HttpTransport;
pub use monday_client::MondayClient;
pub use pagination::{Page, PageTemplate, Paginator};
pub use rate_limit::{RateLimitConfig, RateLimiter};
pub use retry::RetryPolicy;
pub use types::{Complexity, GraphqlRequest, GraphqlResponse, RawOutcome};
