// src/lib.rs
//! monday-cli library: the API access layer of a monday.com command-line client.
//!
//! # Public API
//!
//! The library exposes types organized by concern:
//! - **Error handling**: `AppError`, `ClassifiedError`, `ColumnError`, `ValidationError`
//! - **Configuration**: `ClientConfig`, `CommandLineInput`
//! - **Domain types**: `ApiToken`, `BoardId`, `ItemId`, `PageSize`
//! - **API client**: `MondayClient`, `RateLimiter`, `RetryPolicy`, `Paginator`, `classify`
//! - **Columns**: `ColumnCodec`, `Column`, `ColumnValue`

pub mod api;
mod columns;
mod config;
pub mod constants;
mod error;
mod types;

// --- Error Handling ---
pub use crate::error::{AppError, ClassifiedError, ColumnError, Result};
pub use crate::types::ValidationError;

// --- Configuration ---
pub use crate::config::{BoardsCommand, ClientConfig, Command, CommandLineInput, ItemsCommand};

// --- Domain Types ---
pub use crate::types::{ApiToken, BoardId, Id, IdKind, ItemId, PageSize};

// --- API Client ---
pub use crate::api::{
    classify, Complexity, GraphqlRequest, GraphqlResponse, GraphqlTransport, HttpTransport,
    MondayClient, Page, PageTemplate, Paginator, RateLimitConfig, RateLimiter, RawOutcome,
    RetryPolicy,
};

// --- Columns ---
pub use crate::columns::{
    decode, encode, select_by_id, select_by_title, Column, ColumnCodec, ColumnType, ColumnValue,
    ItemBoard, ItemStatuses, StatusColumn, StatusOption,
};
