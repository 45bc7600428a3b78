use thiserror::Error;

mod domain_types;
mod ids;

pub use domain_types::*;
pub use ids::*;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum ValidationError {
    #[error("Invalid {kind} ID: '{input}' (expected a numeric ID)")]
    InvalidId { kind: &'static str, input: String },

    #[error("Invalid API token format: {reason}")]
    InvalidApiToken { reason: String },

    #[error("Invalid URL: {url} - {reason}")]
    InvalidUrl { url: String, reason: String },

    #[error("{name} out of bounds: {value}, expected {min}..={max}")]
    OutOfBounds {
        name: &'static str,
        value: u32,
        min: u32,
        max: u32,
    },

    #[error("Invalid retry policy: {reason}")]
    InvalidRetryPolicy { reason: String },

    #[error("Invalid rate limit: {reason}")]
    InvalidRateLimit { reason: String },
}
