// src/error.rs
//! Application error types with structured error handling.
//!
//! Error types form the vocabulary for failure modes in the system.
//! `ClassifiedError` is what the transport layer reports after looking at
//! one attempt, `ColumnError` is what the column codec reports about a
//! caller's value, and `AppError` carries either of them unchanged up to
//! the command line together with configuration failures.

use crate::types::ValidationError;
use std::time::Duration;
use thiserror::Error;

/// Outcome category of one failed request attempt.
///
/// This classification is the sole input to the retry decision: the
/// retrying client matches on the variant rather than on message text.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ClassifiedError {
    /// Credential missing, malformed or revoked. Retrying cannot help.
    #[error("Authentication failed: {message}")]
    Authentication { message: String },

    /// The service's own rate or complexity budget is exhausted.
    #[error("Rate limit exceeded{}", retry_hint(.retry_after))]
    RateLimit { retry_after: Option<Duration> },

    /// Connection refused, timeout, DNS failure or a gateway error.
    #[error("Network failure: {message}")]
    Network { message: String },

    /// A well-formed response in which the service rejected the request.
    #[error("monday.com API error{}: {message}", code_suffix(.code))]
    ApiError {
        message: String,
        code: Option<String>,
    },

    /// A response that does not have the expected shape.
    #[error("Unexpected response: {detail}")]
    Unknown { detail: String },
}

fn retry_hint(retry_after: &Option<Duration>) -> String {
    match retry_after {
        Some(wait) => format!(", retry after {}s", wait.as_secs()),
        None => String::new(),
    }
}

fn code_suffix(code: &Option<String>) -> String {
    match code {
        Some(code) => format!(" ({})", code),
        None => String::new(),
    }
}

impl ClassifiedError {
    /// Whether the failure is worth another attempt regardless of the request.
    pub fn is_transient(&self) -> bool {
        matches!(self, Self::Network { .. } | Self::RateLimit { .. })
    }

    /// Server-suggested wait, when the service provided one.
    pub fn retry_after(&self) -> Option<Duration> {
        match self {
            Self::RateLimit { retry_after } => *retry_after,
            _ => None,
        }
    }

    /// Short machine-readable category name, used in logs.
    pub fn category(&self) -> &'static str {
        match self {
            Self::Authentication { .. } => "authentication",
            Self::RateLimit { .. } => "rate_limit",
            Self::Network { .. } => "network",
            Self::ApiError { .. } => "api_error",
            Self::Unknown { .. } => "unknown",
        }
    }
}

/// Caller or data mistakes detected while translating column values.
///
/// None of these are transient; they are reported immediately.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ColumnError {
    #[error(
        "Column '{title}' not found on board {board_id}. Available columns: {}",
        quoted(.available)
    )]
    ColumnNotFound {
        board_id: String,
        title: String,
        available: Vec<String>,
    },

    #[error(
        "Column ID '{column_id}' not found on board {board_id}. Available column IDs: {}",
        joined(.available_ids)
    )]
    ColumnIdNotFound {
        board_id: String,
        column_id: String,
        available_ids: Vec<String>,
    },

    #[error(
        "Column title '{title}' is ambiguous on board {board_id}; matching column IDs: {}",
        joined(.column_ids)
    )]
    AmbiguousColumn {
        board_id: String,
        title: String,
        column_ids: Vec<String>,
    },

    #[error(
        "Status '{label}' not found in column '{column}'. Available statuses: {}",
        quoted(.valid_labels)
    )]
    InvalidStatusLabel {
        column: String,
        label: String,
        valid_labels: Vec<String>,
    },

    #[error("Invalid date '{value}' for column '{column}' (expected YYYY-MM-DD)")]
    InvalidDateFormat { column: String, value: String },

    #[error("Invalid number '{value}' for column '{column}'")]
    InvalidNumber { column: String, value: String },

    #[error("Column '{column}' has type '{column_type}', not status")]
    NotStatusColumn { column: String, column_type: String },

    #[error("Column '{column}' has type '{column_type}', which cannot be set from text")]
    UnsupportedColumnType { column: String, column_type: String },

    #[error("Column '{column}' holds status index {index}, which has no label")]
    UnknownStatusIndex { column: String, index: i64 },

    #[error("Column '{column}' holds a value of unexpected shape: {value}")]
    MalformedValue { column: String, value: String },
}

fn joined(items: &[String]) -> String {
    items.join(", ")
}

fn quoted(items: &[String]) -> String {
    items
        .iter()
        .map(|item| format!("'{}'", item))
        .collect::<Vec<_>>()
        .join(", ")
}

/// Main application error type.
#[derive(Error, Debug)]
pub enum AppError {
    #[error("Missing configuration: {0}")]
    MissingConfiguration(String),

    #[error("Invalid configuration for {name}: {reason}")]
    InvalidConfiguration { name: String, reason: String },

    #[error("Failed to initialise HTTP client: {0}")]
    HttpClient(#[from] reqwest::Error),

    #[error("{resource} {id} not found or not accessible")]
    NotFound { resource: &'static str, id: String },

    #[error("Filesystem IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to serialize output: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error(transparent)]
    Api(#[from] ClassifiedError),

    #[error(transparent)]
    Column(#[from] ColumnError),

    #[error(transparent)]
    Validation(#[from] ValidationError),
}

impl AppError {
    /// Process exit status for this failure. Each category gets its own code
    /// so scripts can branch on the kind of failure.
    pub fn exit_code(&self) -> u8 {
        match self {
            AppError::MissingConfiguration(_)
            | AppError::InvalidConfiguration { .. }
            | AppError::Validation(_) => 2,
            AppError::Api(ClassifiedError::Authentication { .. }) => 3,
            AppError::Api(ClassifiedError::RateLimit { .. }) => 4,
            AppError::Api(ClassifiedError::Network { .. }) | AppError::HttpClient(_) => 5,
            AppError::Api(ClassifiedError::ApiError { .. }) => 6,
            AppError::Column(_) => 7,
            AppError::Api(ClassifiedError::Unknown { .. }) => 8,
            AppError::NotFound { .. } => 9,
            AppError::Serialization(_) => 10,
            AppError::Io(_) => 1,
        }
    }

    /// One-line remediation hint shown under the error message, if any.
    pub fn hint(&self) -> Option<&'static str> {
        match self {
            AppError::MissingConfiguration(_)
            | AppError::Api(ClassifiedError::Authentication { .. }) => {
                Some("Set the MONDAY_API_TOKEN environment variable to a valid API token.")
            }
            AppError::Api(ClassifiedError::RateLimit { .. }) => {
                Some("The monday.com budget is exhausted; wait before retrying.")
            }
            AppError::Api(ClassifiedError::Network { .. }) => {
                Some("Check your network connection and MONDAY_API_URL.")
            }
            AppError::Column(ColumnError::ColumnNotFound { .. }) => {
                Some("Use 'monday items list-columns <BOARD_ID>' to see column titles.")
            }
            AppError::Column(ColumnError::ColumnIdNotFound { .. }) => {
                Some("Use 'monday items list-columns <BOARD_ID>' to see column IDs.")
            }
            AppError::Column(ColumnError::NotStatusColumn { .. }) => {
                Some("Use 'monday items list-statuses <ITEM_ID>' to see status columns.")
            }
            _ => None,
        }
    }
}

/// Result type alias for convenience
pub type Result<T, E = AppError> = std::result::Result<T, E>;
