// src/config.rs
use crate::api::{RateLimitConfig, RetryPolicy};
use crate::constants::{
    DEFAULT_RATE_LIMIT_CALLS, DEFAULT_RATE_LIMIT_PERIOD, DEFAULT_RETRY_BACKOFF_FACTOR,
    DEFAULT_RETRY_BASE_DELAY, DEFAULT_RETRY_MAX_ATTEMPTS, MONDAY_API_URL,
};
use crate::error::AppError;
use crate::types::{ApiToken, ValidationError};
use clap::{Parser, Subcommand};
use log::LevelFilter;
use std::str::FromStr;
use std::time::Duration;
use url::Url;

pub const ENV_API_TOKEN: &str = "MONDAY_API_TOKEN";
pub const ENV_API_URL: &str = "MONDAY_API_URL";
pub const ENV_RETRY_MAX_ATTEMPTS: &str = "MONDAY_RETRY_MAX_ATTEMPTS";
pub const ENV_RETRY_BACKOFF_FACTOR: &str = "MONDAY_RETRY_BACKOFF_FACTOR";
pub const ENV_RETRY_BASE_DELAY: &str = "MONDAY_RETRY_BASE_DELAY";
pub const ENV_RATE_LIMIT_CALLS: &str = "MONDAY_RATE_LIMIT_CALLS";
pub const ENV_RATE_LIMIT_PERIOD: &str = "MONDAY_RATE_LIMIT_PERIOD";

/// Parsed command-line input.
#[derive(Parser, Debug)]
#[command(name = "monday", author, version, about, long_about = None)]
pub struct CommandLineInput {
    /// Log progress and retries (info level)
    #[arg(short, long, global = true, default_value_t = false)]
    pub verbose: bool,

    /// Log requests and rate-limit waits (debug level)
    #[arg(long, global = true, default_value_t = false)]
    pub debug: bool,

    #[command(subcommand)]
    pub command: Command,
}

impl CommandLineInput {
    /// Console log level selected by the verbosity flags.
    pub fn log_level(&self) -> LevelFilter {
        if self.debug {
            LevelFilter::Debug
        } else if self.verbose {
            LevelFilter::Info
        } else {
            LevelFilter::Warn
        }
    }
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Read and update items
    #[command(subcommand)]
    Items(ItemsCommand),

    /// Read boards
    #[command(subcommand)]
    Boards(BoardsCommand),

    /// Show the account's remaining complexity budget
    Complexity,

    /// Print the CLI version
    Version,
}

#[derive(Subcommand, Debug)]
pub enum ItemsCommand {
    /// Show one item with its column values
    Get {
        /// Item ID
        item_id: String,
    },

    /// List the columns of a board
    ListColumns {
        /// Board ID
        board_id: String,
    },

    /// Set a column value, addressing the column by its title
    UpdateColumn {
        /// Board ID
        board_id: String,
        /// Item ID
        item_id: String,
        /// Column title (case-insensitive)
        column_title: String,
        /// New value in human form, e.g. a status label or YYYY-MM-DD
        value: String,
    },

    /// List the status columns of an item's board and their labels
    ListStatuses {
        /// Item ID
        item_id: String,
    },

    /// Set a status column by label, addressing the column by its ID
    UpdateStatus {
        /// Item ID
        item_id: String,
        /// Status column ID, e.g. "status"
        column_id: String,
        /// Status label (case-insensitive)
        label: String,
    },
}

#[derive(Subcommand, Debug)]
pub enum BoardsCommand {
    /// List every item of a board, following cursors
    Items {
        /// Board ID
        board_id: String,

        /// Items per page (1-500)
        #[arg(long, default_value_t = crate::constants::DEFAULT_PAGE_SIZE)]
        page_size: u32,

        /// Stop after this many pages
        #[arg(long)]
        max_pages: Option<u32>,

        /// Resume from a cursor returned by an earlier listing
        #[arg(long)]
        cursor: Option<String>,
    },
}

/// Resolved client configuration, validated and ready to build a client.
#[derive(Debug, Clone)]
pub struct ClientConfig {
    pub api_token: ApiToken,
    pub api_url: Url,
    pub retry: RetryPolicy,
    pub rate_limit: RateLimitConfig,
}

impl ClientConfig {
    /// Resolves configuration from the process environment.
    pub fn from_env() -> Result<Self, AppError> {
        Self::resolve(|name| std::env::var(name).ok())
    }

    /// Resolves configuration through `lookup`, which returns the raw value
    /// of a variable if it is set. Blank values count as unset; anything
    /// else that does not parse is an error rather than a silent default.
    pub fn resolve<F>(lookup: F) -> Result<Self, AppError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let read = |name: &str| lookup(name).filter(|value| !value.trim().is_empty());

        let token = read(ENV_API_TOKEN).ok_or_else(|| {
            AppError::MissingConfiguration(format!(
                "{} environment variable not set",
                ENV_API_TOKEN
            ))
        })?;
        let api_token = ApiToken::new(token)?;

        let api_url = match read(ENV_API_URL) {
            Some(raw) => parse_endpoint(raw.trim())?,
            None => parse_endpoint(MONDAY_API_URL)?,
        };

        let max_attempts = parse_or(&read, ENV_RETRY_MAX_ATTEMPTS, DEFAULT_RETRY_MAX_ATTEMPTS)?;
        let backoff_factor =
            parse_or(&read, ENV_RETRY_BACKOFF_FACTOR, DEFAULT_RETRY_BACKOFF_FACTOR)?;
        let base_delay = seconds_or(&read, ENV_RETRY_BASE_DELAY, DEFAULT_RETRY_BASE_DELAY)?;
        let retry = RetryPolicy::new(max_attempts, backoff_factor, base_delay)?;

        let max_calls = parse_or(&read, ENV_RATE_LIMIT_CALLS, DEFAULT_RATE_LIMIT_CALLS)?;
        let period = seconds_or(&read, ENV_RATE_LIMIT_PERIOD, DEFAULT_RATE_LIMIT_PERIOD)?;
        let rate_limit = RateLimitConfig::new(max_calls, period)?;

        Ok(ClientConfig {
            api_token,
            api_url,
            retry,
            rate_limit,
        })
    }
}

fn parse_endpoint(raw: &str) -> Result<Url, ValidationError> {
    let url = Url::parse(raw).map_err(|e| ValidationError::InvalidUrl {
        url: raw.to_string(),
        reason: e.to_string(),
    })?;
    if !matches!(url.scheme(), "http" | "https") {
        return Err(ValidationError::InvalidUrl {
            url: raw.to_string(),
            reason: "scheme must be http or https".to_string(),
        });
    }
    Ok(url)
}

fn parse_or<T, R>(read: &R, name: &str, default: T) -> Result<T, AppError>
where
    T: FromStr,
    T::Err: std::fmt::Display,
    R: Fn(&str) -> Option<String>,
{
    match read(name) {
        None => Ok(default),
        Some(raw) => raw
            .trim()
            .parse::<T>()
            .map_err(|e| AppError::InvalidConfiguration {
                name: name.to_string(),
                reason: format!("'{}': {}", raw, e),
            }),
    }
}

/// Reads a non-negative, finite number of seconds.
fn seconds_or<R>(read: &R, name: &str, default: Duration) -> Result<Duration, AppError>
where
    R: Fn(&str) -> Option<String>,
{
    let secs = parse_or(read, name, default.as_secs_f64())?;
    Duration::try_from_secs_f64(secs).map_err(|_| AppError::InvalidConfiguration {
        name: name.to_string(),
        reason: format!("'{}' is not a valid number of seconds", secs),
    })
}
