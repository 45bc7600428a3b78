// src/constants.rs
//! Operational boundaries of the API access layer.
//!
//! Each constant is named for the service concept it constrains. Reading them
//! top to bottom tells you how the client talks to monday.com: where, how
//! often, how patiently, and how much it asks for at once.

use std::time::Duration;

// ---------------------------------------------------------------------------
// Service endpoint
// ---------------------------------------------------------------------------

/// Default GraphQL endpoint. Overridable through `MONDAY_API_URL`.
pub const MONDAY_API_URL: &str = "https://api.monday.com/v2";

/// API version pinned in the `API-Version` header of every request.
pub const MONDAY_API_VERSION: &str = "2024-01";

/// Sent as `User-Agent` so the service can attribute traffic to this tool.
pub const USER_AGENT: &str = concat!("monday-cli/", env!("CARGO_PKG_VERSION"));

/// Upper bound on a single HTTP exchange, connect through body read.
pub const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

// ---------------------------------------------------------------------------
// Client-side rate budget
// ---------------------------------------------------------------------------

/// Calls admitted per rolling window when nothing else is configured.
///
/// The service itself budgets by query complexity; this is a call-count
/// proxy for it.
pub const DEFAULT_RATE_LIMIT_CALLS: u32 = 60;

/// Length of the rolling rate-limit window.
pub const DEFAULT_RATE_LIMIT_PERIOD: Duration = Duration::from_secs(60);

/// Remaining complexity below which a warning is logged after each call.
pub const COMPLEXITY_WARNING_THRESHOLD: i64 = 1_000_000;

// ---------------------------------------------------------------------------
// Retry policy
// ---------------------------------------------------------------------------

/// Total attempts for one logical request, the first one included.
pub const DEFAULT_RETRY_MAX_ATTEMPTS: u32 = 3;

/// Multiplier applied to the delay after each failed attempt.
pub const DEFAULT_RETRY_BACKOFF_FACTOR: f64 = 2.0;

/// Delay before the second attempt.
pub const DEFAULT_RETRY_BASE_DELAY: Duration = Duration::from_secs(1);

/// Ceiling on any computed backoff delay.
pub const DEFAULT_RETRY_MAX_DELAY: Duration = Duration::from_secs(60);

// ---------------------------------------------------------------------------
// Pagination
// ---------------------------------------------------------------------------

/// Largest `limit` the service accepts for cursor pages.
pub const MAX_PAGE_SIZE: u32 = 500;

/// Page size used by list commands unless the caller asks otherwise.
pub const DEFAULT_PAGE_SIZE: u32 = 100;

// ---------------------------------------------------------------------------
// Diagnostics
// ---------------------------------------------------------------------------

/// Maximum characters shown when previewing error response bodies.
pub const ERROR_BODY_PREVIEW_LENGTH: usize = 200;

/// Maximum characters of a query body written to debug logs.
pub const QUERY_LOG_PREVIEW_LENGTH: usize = 100;
