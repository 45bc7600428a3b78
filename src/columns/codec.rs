// src/columns/codec.rs
//! Translation between human-entered column values and the service's wire
//! encodings. Everything here is pure; no request is made.

use super::model::{Column, ColumnType};
use crate::error::ColumnError;
use chrono::NaiveDate;
use once_cell::sync::Lazy;
use regex::Regex;
use serde_json::{json, Value};

static DATE_SHAPE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^\d{4}-\d{2}-\d{2}$")
        .expect("Failed to compile date regex - this is a bug in the code")
});

/// A column value ready to be written.
#[derive(Debug, Clone, PartialEq)]
pub enum ColumnValue {
    Text(String),
    LongText(String),
    /// Kept as entered so precision and formatting survive the round trip.
    Numbers(String),
    Status { index: i64 },
    Link { url: String, text: String },
    Date { date: String },
}

impl ColumnValue {
    /// The value in the shape the service expects for its column type.
    pub fn to_wire(&self) -> Value {
        match self {
            ColumnValue::Text(text) | ColumnValue::LongText(text) => Value::String(text.clone()),
            ColumnValue::Numbers(number) => Value::String(number.clone()),
            ColumnValue::Status { index } => json!({ "index": index }),
            ColumnValue::Link { url, text } => json!({ "url": url, "text": text }),
            ColumnValue::Date { date } => json!({ "date": date }),
        }
    }

    /// JSON-encoded form passed as the mutation's `value` variable.
    pub fn to_mutation_value(&self) -> String {
        self.to_wire().to_string()
    }
}

/// Encodes `input` for `column`, validating it against the column's type.
pub fn encode(column: &Column, input: &str) -> Result<ColumnValue, ColumnError> {
    match &column.column_type {
        ColumnType::Status => encode_status(column, input),
        ColumnType::Text => Ok(ColumnValue::Text(input.to_string())),
        ColumnType::LongText => Ok(ColumnValue::LongText(input.to_string())),
        ColumnType::Link => Ok(ColumnValue::Link {
            url: input.to_string(),
            text: input.to_string(),
        }),
        ColumnType::Date => encode_date(column, input),
        ColumnType::Numbers => encode_number(column, input),
        ColumnType::Doc | ColumnType::Other(_) => Err(unsupported(column)),
    }
}

fn encode_status(column: &Column, input: &str) -> Result<ColumnValue, ColumnError> {
    let wanted = input.to_lowercase();
    column
        .options
        .iter()
        .flatten()
        .find(|option| option.label.to_lowercase() == wanted)
        .map(|option| ColumnValue::Status {
            index: option.index,
        })
        .ok_or_else(|| ColumnError::InvalidStatusLabel {
            column: column.title.clone(),
            label: input.to_string(),
            valid_labels: column.labels(),
        })
}

fn encode_date(column: &Column, input: &str) -> Result<ColumnValue, ColumnError> {
    let is_calendar_date = DATE_SHAPE.is_match(input)
        && NaiveDate::parse_from_str(input, "%Y-%m-%d").is_ok();
    if !is_calendar_date {
        return Err(ColumnError::InvalidDateFormat {
            column: column.title.clone(),
            value: input.to_string(),
        });
    }
    Ok(ColumnValue::Date {
        date: input.to_string(),
    })
}

fn encode_number(column: &Column, input: &str) -> Result<ColumnValue, ColumnError> {
    match input.parse::<f64>() {
        Ok(number) if number.is_finite() => Ok(ColumnValue::Numbers(input.to_string())),
        _ => Err(ColumnError::InvalidNumber {
            column: column.title.clone(),
            value: input.to_string(),
        }),
    }
}

/// Human-readable form of a stored value, or `None` when the column is empty.
///
/// `wire` may be the JSON value itself or the JSON-encoded string the
/// service returns in `column_values[].value`.
pub fn decode(column: &Column, wire: &Value) -> Result<Option<String>, ColumnError> {
    let value = unwrap_encoded(wire);
    if value.is_null() {
        return Ok(None);
    }

    match &column.column_type {
        ColumnType::Status => {
            let index = value
                .get("index")
                .and_then(Value::as_i64)
                .ok_or_else(|| malformed(column, &value))?;
            column
                .options
                .iter()
                .flatten()
                .find(|option| option.index == index)
                .map(|option| Some(option.label.clone()))
                .ok_or_else(|| ColumnError::UnknownStatusIndex {
                    column: column.title.clone(),
                    index,
                })
        }
        ColumnType::Text | ColumnType::LongText => match &value {
            Value::String(text) => Ok(Some(text.clone())),
            Value::Number(number) => Ok(Some(number.to_string())),
            // long_text values read back as {"text": ...}
            Value::Object(map) => map
                .get("text")
                .and_then(Value::as_str)
                .map(|text| Some(text.to_string()))
                .ok_or_else(|| malformed(column, &value)),
            _ => Err(malformed(column, &value)),
        },
        ColumnType::Numbers => match &value {
            Value::String(number) if number.is_empty() => Ok(None),
            Value::String(number) => Ok(Some(number.clone())),
            Value::Number(number) => Ok(Some(number.to_string())),
            _ => Err(malformed(column, &value)),
        },
        ColumnType::Link => field(column, &value, "url"),
        ColumnType::Date => field(column, &value, "date"),
        ColumnType::Doc | ColumnType::Other(_) => Err(unsupported(column)),
    }
}

/// Parses string forms that carry encoded JSON; plain strings pass through.
fn unwrap_encoded(wire: &Value) -> Value {
    match wire {
        Value::String(encoded) if looks_encoded(encoded) => {
            serde_json::from_str(encoded).unwrap_or_else(|_| wire.clone())
        }
        other => other.clone(),
    }
}

fn looks_encoded(text: &str) -> bool {
    matches!(text.trim_start().chars().next(), Some('{' | '"'))
        || text.trim() == "null"
}

fn field(column: &Column, value: &Value, name: &str) -> Result<Option<String>, ColumnError> {
    match value.get(name) {
        Some(Value::Null) => Ok(None),
        Some(Value::String(text)) => Ok(Some(text.clone())),
        _ => Err(malformed(column, value)),
    }
}

fn malformed(column: &Column, value: &Value) -> ColumnError {
    ColumnError::MalformedValue {
        column: column.title.clone(),
        value: value.to_string(),
    }
}

fn unsupported(column: &Column) -> ColumnError {
    ColumnError::UnsupportedColumnType {
        column: column.title.clone(),
        column_type: column.column_type.to_string(),
    }
}
