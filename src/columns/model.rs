// src/columns/model.rs
//! Board column metadata as the codec needs it.

use serde::{Deserialize, Serialize, Serializer};
use std::collections::BTreeMap;
use std::fmt;

/// Declared type of a board column.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ColumnType {
    Status,
    Text,
    LongText,
    Link,
    Date,
    Numbers,
    Doc,
    Other(String),
}

impl ColumnType {
    /// Maps the service's type name. Legacy aliases collapse onto their
    /// current type.
    pub fn from_wire(name: &str) -> Self {
        match name {
            "status" | "color" => ColumnType::Status,
            "text" => ColumnType::Text,
            "long_text" => ColumnType::LongText,
            "link" => ColumnType::Link,
            "date" => ColumnType::Date,
            "numbers" => ColumnType::Numbers,
            "doc" | "direct_doc" => ColumnType::Doc,
            other => ColumnType::Other(other.to_string()),
        }
    }

    pub fn as_str(&self) -> &str {
        match self {
            ColumnType::Status => "status",
            ColumnType::Text => "text",
            ColumnType::LongText => "long_text",
            ColumnType::Link => "link",
            ColumnType::Date => "date",
            ColumnType::Numbers => "numbers",
            ColumnType::Doc => "doc",
            ColumnType::Other(name) => name,
        }
    }
}

impl fmt::Display for ColumnType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl Serialize for ColumnType {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

/// One label of a status column.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StatusOption {
    pub index: i64,
    pub label: String,
}

/// A board column resolved for one operation.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Column {
    pub id: String,
    pub title: String,
    #[serde(rename = "type")]
    pub column_type: ColumnType,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub options: Option<Vec<StatusOption>>,
}

impl Column {
    pub fn new(id: impl Into<String>, title: impl Into<String>, column_type: ColumnType) -> Self {
        Self {
            id: id.into(),
            title: title.into(),
            column_type,
            options: None,
        }
    }

    pub fn with_options(mut self, options: Vec<StatusOption>) -> Self {
        self.options = Some(options);
        self
    }

    /// Status labels in index order; empty when the column has none.
    pub fn labels(&self) -> Vec<String> {
        self.options
            .iter()
            .flatten()
            .map(|option| option.label.clone())
            .collect()
    }
}

/// Column entry as it appears under `boards[].columns`.
#[derive(Debug, Deserialize)]
pub(crate) struct RawColumn {
    id: String,
    title: String,
    #[serde(rename = "type")]
    column_type: String,
    #[serde(default)]
    settings_str: Option<String>,
}

#[derive(Deserialize)]
struct StatusSettings {
    #[serde(default)]
    labels: BTreeMap<String, String>,
}

impl From<RawColumn> for Column {
    fn from(raw: RawColumn) -> Self {
        let column_type = ColumnType::from_wire(&raw.column_type);
        let options = match (&column_type, raw.settings_str.as_deref()) {
            (ColumnType::Status, Some(settings)) if !settings.is_empty() => {
                parse_status_options(&raw.title, settings)
            }
            _ => None,
        };
        Column {
            id: raw.id,
            title: raw.title,
            column_type,
            options,
        }
    }
}

/// Reads `{"labels": {"<index>": "<label>"}}`, sorted by index.
fn parse_status_options(title: &str, settings: &str) -> Option<Vec<StatusOption>> {
    let parsed = serde_json::from_str::<StatusSettings>(settings)
        .map_err(|e| e.to_string())
        .and_then(|settings| {
            settings
                .labels
                .into_iter()
                .map(|(index, label)| {
                    index
                        .parse::<i64>()
                        .map(|index| StatusOption { index, label })
                        .map_err(|_| format!("label index '{}' is not a number", index))
                })
                .collect::<Result<Vec<_>, String>>()
        });

    match parsed {
        Ok(mut options) => {
            options.sort_by_key(|option| option.index);
            Some(options)
        }
        Err(reason) => {
            log::warn!("Could not read status labels of column '{}': {}", title, reason);
            None
        }
    }
}
