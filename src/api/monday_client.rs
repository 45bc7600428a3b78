// src/api/monday_client.rs
//! The retrying client every command goes through.
//!
//! One call to `execute` is one logical request. Each attempt takes a rate
//! budget admission, goes out over the transport, and is classified; only
//! terminal outcomes are returned to the caller.

use super::classify::classify;
use super::client::HttpTransport;
use super::queries;
use super::rate_limit::RateLimiter;
use super::retry::RetryPolicy;
use super::types::{Complexity, GraphqlRequest, GraphqlResponse};
use super::GraphqlTransport;
use crate::config::ClientConfig;
use crate::constants::{COMPLEXITY_WARNING_THRESHOLD, QUERY_LOG_PREVIEW_LENGTH};
use crate::error::{AppError, ClassifiedError};
use serde_json::{Map, Value};
use std::sync::Arc;

/// Rate-limited, retrying GraphQL client.
pub struct MondayClient<T = HttpTransport> {
    transport: T,
    limiter: Arc<RateLimiter>,
    policy: RetryPolicy,
}

impl MondayClient<HttpTransport> {
    /// Builds a client talking HTTP to the configured endpoint.
    pub fn from_config(config: &ClientConfig) -> Result<Self, AppError> {
        let transport = HttpTransport::new(&config.api_token, config.api_url.clone())?;
        let limiter = Arc::new(RateLimiter::new(config.rate_limit));
        log::debug!(
            "Initialized monday.com client for {} ({} attempts, {} calls per {:?})",
            config.api_url,
            config.retry.max_attempts(),
            config.rate_limit.max_calls(),
            config.rate_limit.period()
        );
        Ok(Self::new(transport, limiter, config.retry))
    }
}

impl<T: GraphqlTransport> MondayClient<T> {
    pub fn new(transport: T, limiter: Arc<RateLimiter>, policy: RetryPolicy) -> Self {
        Self {
            transport,
            limiter,
            policy,
        }
    }

    /// Sends `request` until it succeeds, fails terminally, or the attempt
    /// budget runs out.
    ///
    /// `Authentication` is returned after the first attempt. `Network` and
    /// `RateLimit` are retried with backoff. `ApiError` and `Unknown` are
    /// returned immediately unless the request is marked idempotent.
    pub async fn execute(
        &self,
        request: &GraphqlRequest,
    ) -> Result<GraphqlResponse, ClassifiedError> {
        let max_attempts = self.policy.max_attempts();
        let mut attempt = 1;

        loop {
            self.limiter.acquire().await;
            log::debug!(
                "GraphQL attempt {}/{}: {}",
                attempt,
                max_attempts,
                query_preview(request.query())
            );

            let error = match classify(self.transport.send(request).await) {
                Ok(response) => {
                    log_complexity(&response);
                    return Ok(response);
                }
                Err(error) => error,
            };

            if !should_retry(&error, request) {
                log::debug!("Not retrying {} failure: {}", error.category(), error);
                return Err(error);
            }

            if attempt >= max_attempts {
                log::warn!(
                    "Giving up after {} attempt(s), last failure: {}",
                    attempt,
                    error
                );
                return Err(error);
            }

            let delay = self.policy.delay_after(attempt, error.retry_after());
            log::warn!(
                "Attempt {}/{} failed ({}), retrying in {:.1}s",
                attempt,
                max_attempts,
                error,
                delay.as_secs_f64()
            );
            tokio::time::sleep(delay).await;
            attempt += 1;
        }
    }

    /// Runs a query and returns its `data` object.
    pub async fn query(
        &self,
        query: &str,
        variables: Map<String, Value>,
    ) -> Result<Value, ClassifiedError> {
        let request = GraphqlRequest::new(query).with_variables(variables);
        Ok(self.execute(&request).await?.into_data())
    }

    /// Runs a mutation and returns its `data` object.
    pub async fn mutate(
        &self,
        mutation: &str,
        variables: Map<String, Value>,
    ) -> Result<Value, ClassifiedError> {
        let request = GraphqlRequest::new(mutation).with_variables(variables);
        Ok(self.execute(&request).await?.into_data())
    }

    /// Fetches the account's current complexity budget.
    pub async fn complexity(&self) -> Result<Complexity, ClassifiedError> {
        let request = GraphqlRequest::new(queries::GET_COMPLEXITY).idempotent();
        let response = self.execute(&request).await?;
        response.complexity().ok_or_else(|| ClassifiedError::Unknown {
            detail: "complexity query returned no complexity object".to_string(),
        })
    }
}

fn should_retry(error: &ClassifiedError, request: &GraphqlRequest) -> bool {
    match error {
        ClassifiedError::Authentication { .. } => false,
        ClassifiedError::ApiError { .. } | ClassifiedError::Unknown { .. } => {
            request.is_idempotent()
        }
        transient => transient.is_transient(),
    }
}

fn log_complexity(response: &GraphqlResponse) {
    let Some(complexity) = response.complexity() else {
        return;
    };
    log::info!(
        "Complexity: before={}, after={}",
        complexity.before.unwrap_or(0),
        complexity.after.unwrap_or(0)
    );
    if let Some(after) = complexity.after {
        if after < COMPLEXITY_WARNING_THRESHOLD {
            let reset = complexity
                .reset_in_x_seconds
                .map_or_else(|| "unknown".to_string(), |secs| secs.to_string());
            log::warn!("Low complexity remaining: {}. Resets in {}s", after, reset);
        }
    }
}

fn query_preview(query: &str) -> String {
    let compact = query.split_whitespace().collect::<Vec<_>>().join(" ");
    if compact.chars().count() > QUERY_LOG_PREVIEW_LENGTH {
        let head: String = compact.chars().take(QUERY_LOG_PREVIEW_LENGTH).collect();
        format!("{}...", head)
    } else {
        compact
    }
}
