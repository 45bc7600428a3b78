// src/api/classify.rs
//! Turns one raw HTTP outcome into either a usable response or a
//! `ClassifiedError`.
//!
//! Rules apply in priority order: transport failure, credentials, the
//! service's rate budget, service-reported errors, and finally anything that
//! does not look like `{ "data": { ... } }`.

use super::types::{GraphqlResponse, RawOutcome};
use crate::constants::ERROR_BODY_PREVIEW_LENGTH;
use crate::error::ClassifiedError;
use serde::Deserialize;
use serde_json::Value;
use std::time::Duration;

/// Error codes the service uses when its own budget is exhausted.
const RATE_LIMIT_CODES: &[&str] = &[
    "RATE_LIMIT_EXCEEDED",
    "ComplexityException",
    "COMPLEXITY_BUDGET_EXHAUSTED",
    "maxConcurrencyExceeded",
];

/// Gateway statuses that mean the request never reached the API proper.
const GATEWAY_FAILURE_STATUSES: &[u16] = &[502, 503, 504];

#[derive(Debug, Deserialize)]
struct Envelope {
    #[serde(default)]
    data: Option<Value>,
    #[serde(default)]
    errors: Option<Vec<ServiceError>>,
    // REST-style error body the service returns for some HTTP failures.
    #[serde(default)]
    error_message: Option<String>,
    #[serde(default)]
    error_code: Option<Value>,
}

#[derive(Debug, Deserialize)]
struct ServiceError {
    #[serde(default)]
    message: Option<String>,
    #[serde(default)]
    extensions: Option<ErrorExtensions>,
}

#[derive(Debug, Deserialize)]
struct ErrorExtensions {
    #[serde(default)]
    code: Option<Value>,
    #[serde(default)]
    retry_in_seconds: Option<f64>,
}

/// Classifies a raw outcome. `Ok` means the attempt succeeded.
pub fn classify(outcome: RawOutcome) -> Result<GraphqlResponse, ClassifiedError> {
    let (status, retry_after, body) = match outcome {
        RawOutcome::TransportFailure { reason } => {
            return Err(ClassifiedError::Network { message: reason });
        }
        RawOutcome::Http {
            status,
            retry_after,
            body,
        } => (status, retry_after, body),
    };

    if GATEWAY_FAILURE_STATUSES.contains(&status) {
        return Err(ClassifiedError::Network {
            message: format!("HTTP {} from gateway", status),
        });
    }

    if status == 401 {
        let message = parse_envelope(&body)
            .and_then(|envelope| first_message(&envelope))
            .unwrap_or_else(|| "invalid or missing API token".to_string());
        return Err(ClassifiedError::Authentication { message });
    }

    if status == 429 {
        let hint = retry_after.or_else(|| parse_envelope(&body).and_then(|e| server_wait(&e)));
        return Err(ClassifiedError::RateLimit { retry_after: hint });
    }

    let envelope = match serde_json::from_str::<Envelope>(&body) {
        Ok(envelope) => envelope,
        Err(e) => {
            return Err(ClassifiedError::Unknown {
                detail: format!("HTTP {}: {}; body: {}", status, e, preview(&body)),
            });
        }
    };

    if let Some(error) = service_error(&envelope, retry_after) {
        return Err(error);
    }

    if !(200..300).contains(&status) {
        return Err(ClassifiedError::Unknown {
            detail: format!("HTTP {}; body: {}", status, preview(&body)),
        });
    }

    match envelope.data {
        Some(Value::Object(data)) => Ok(GraphqlResponse::new(data)),
        _ => Err(ClassifiedError::Unknown {
            detail: format!("response carried no data object; body: {}", preview(&body)),
        }),
    }
}

/// Error reported inside an otherwise well-formed body, if any.
fn service_error(envelope: &Envelope, retry_after: Option<Duration>) -> Option<ClassifiedError> {
    if let Some(first) = envelope.errors.as_ref().and_then(|errors| errors.first()) {
        let extensions = first.extensions.as_ref();
        let code = extensions.and_then(|ext| ext.code.as_ref()).and_then(code_text);
        if code.as_deref().is_some_and(is_rate_limit_code) {
            return Some(ClassifiedError::RateLimit {
                retry_after: retry_after.or_else(|| server_wait(envelope)),
            });
        }
        return Some(ClassifiedError::ApiError {
            message: first
                .message
                .clone()
                .unwrap_or_else(|| "unspecified error".to_string()),
            code,
        });
    }

    if let Some(message) = &envelope.error_message {
        let code = envelope.error_code.as_ref().and_then(code_text);
        if code.as_deref().is_some_and(is_rate_limit_code) {
            return Some(ClassifiedError::RateLimit { retry_after });
        }
        return Some(ClassifiedError::ApiError {
            message: message.clone(),
            code,
        });
    }

    None
}

fn parse_envelope(body: &str) -> Option<Envelope> {
    serde_json::from_str(body).ok()
}

fn first_message(envelope: &Envelope) -> Option<String> {
    envelope
        .errors
        .as_ref()
        .and_then(|errors| errors.first())
        .and_then(|error| error.message.clone())
        .or_else(|| envelope.error_message.clone())
}

/// `extensions.retry_in_seconds` of the first error, when present and sane.
fn server_wait(envelope: &Envelope) -> Option<Duration> {
    envelope
        .errors
        .as_ref()?
        .iter()
        .filter_map(|error| error.extensions.as_ref()?.retry_in_seconds)
        .find_map(|secs| Duration::try_from_secs_f64(secs).ok())
}

fn code_text(code: &Value) -> Option<String> {
    match code {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

fn is_rate_limit_code(code: &str) -> bool {
    RATE_LIMIT_CODES.contains(&code)
}

/// Bounded, char-boundary-safe excerpt of a response body.
pub(crate) fn preview(body: &str) -> String {
    let mut excerpt: String = body.chars().take(ERROR_BODY_PREVIEW_LENGTH).collect();
    if excerpt.len() < body.len() {
        excerpt.push_str("...");
    }
    excerpt
}
