// src/api/client.rs
//! Pure HTTP transport for the monday.com GraphQL endpoint.
//!
//! This module provides a thin wrapper around reqwest. It attaches
//! authentication and version headers, posts one request, and hands back
//! the raw outcome without interpreting it.

use super::types::{GraphqlRequest, RawOutcome};
use super::GraphqlTransport;
use crate::constants::{MONDAY_API_VERSION, REQUEST_TIMEOUT, USER_AGENT};
use crate::error::AppError;
use crate::types::ApiToken;
use reqwest::{header, Client};
use std::time::Duration;
use url::Url;

/// A thin wrapper around reqwest Client for monday.com API requests.
#[derive(Clone)]
pub struct HttpTransport {
    client: Client,
    endpoint: Url,
}

impl HttpTransport {
    /// Creates a new HTTP transport authenticated with `token`.
    pub fn new(token: &ApiToken, endpoint: Url) -> Result<Self, AppError> {
        let client = Client::builder()
            .default_headers(Self::create_headers(token)?)
            .user_agent(USER_AGENT)
            .timeout(REQUEST_TIMEOUT)
            .build()?;
        Ok(Self { client, endpoint })
    }

    /// Creates the default headers for monday.com API requests.
    fn create_headers(token: &ApiToken) -> Result<header::HeaderMap, AppError> {
        let mut headers = header::HeaderMap::new();

        // The service takes the raw token, without a "Bearer" prefix.
        let mut auth = header::HeaderValue::from_str(token.as_str()).map_err(|e| {
            AppError::InvalidConfiguration {
                name: "MONDAY_API_TOKEN".to_string(),
                reason: format!("not usable as a header value: {}", e),
            }
        })?;
        auth.set_sensitive(true);
        headers.insert(header::AUTHORIZATION, auth);

        headers.insert(
            "API-Version",
            header::HeaderValue::from_static(MONDAY_API_VERSION),
        );

        headers.insert(
            header::CONTENT_TYPE,
            header::HeaderValue::from_static("application/json"),
        );

        Ok(headers)
    }
}

#[async_trait::async_trait]
impl GraphqlTransport for HttpTransport {
    async fn send(&self, request: &GraphqlRequest) -> RawOutcome {
        log::debug!("POST {}", self.endpoint);

        let response = match self
            .client
            .post(self.endpoint.clone())
            .json(request)
            .send()
            .await
        {
            Ok(response) => response,
            Err(e) => {
                return RawOutcome::TransportFailure {
                    reason: describe_failure(&e),
                }
            }
        };

        let status = response.status().as_u16();
        let retry_after = parse_retry_after(response.headers());
        log::debug!("Response status {}", status);

        match response.text().await {
            Ok(body) => RawOutcome::Http {
                status,
                retry_after,
                body,
            },
            Err(e) => RawOutcome::TransportFailure {
                reason: format!("failed to read response body: {}", describe_failure(&e)),
            },
        }
    }
}

/// Human-readable reason for a request that produced no response.
fn describe_failure(error: &reqwest::Error) -> String {
    let kind = if error.is_timeout() {
        "request timed out"
    } else if error.is_connect() {
        "connection failed"
    } else {
        "request failed"
    };
    format!("{}: {}", kind, error)
}

/// Reads a delay-seconds `Retry-After` header. HTTP-date values are ignored.
fn parse_retry_after(headers: &header::HeaderMap) -> Option<Duration> {
    headers
        .get(header::RETRY_AFTER)?
        .to_str()
        .ok()?
        .trim()
        .parse::<u64>()
        .ok()
        .map(Duration::from_secs)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_retry_after_seconds() {
        let mut headers = header::HeaderMap::new();
        assert_eq!(parse_retry_after(&headers), None);

        headers.insert(header::RETRY_AFTER, header::HeaderValue::from_static(" 42 "));
        assert_eq!(parse_retry_after(&headers), Some(Duration::from_secs(42)));

        headers.insert(
            header::RETRY_AFTER,
            header::HeaderValue::from_static("Wed, 21 Oct 2015 07:28:00 GMT"),
        );
        assert_eq!(parse_retry_after(&headers), None);
    }

    #[test]
    fn test_headers_carry_raw_token_and_version() {
        let token = ApiToken::new("abc.def.ghi").unwrap();
        let headers = HttpTransport::create_headers(&token).unwrap();

        assert_eq!(headers[header::AUTHORIZATION], "abc.def.ghi");
        assert!(headers[header::AUTHORIZATION].is_sensitive());
        assert_eq!(headers["API-Version"], MONDAY_API_VERSION);
    }
}
