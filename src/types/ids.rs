use super::ValidationError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::marker::PhantomData;

/// Strong typing for IDs with phantom types
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Id<T> {
    value: String,
    _phantom: PhantomData<T>,
}

/// Marker types for different ID kinds
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct BoardMarker;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ItemMarker;

/// Names the ID kind in validation errors.
pub trait IdKind {
    const KIND: &'static str;
}

impl IdKind for BoardMarker {
    const KIND: &'static str = "board";
}

impl IdKind for ItemMarker {
    const KIND: &'static str = "item";
}

pub type BoardId = Id<BoardMarker>;
pub type ItemId = Id<ItemMarker>;

impl<T: IdKind> Id<T> {
    /// Parses a service ID. The service issues IDs as decimal digit strings.
    pub fn parse(input: &str) -> Result<Self, ValidationError> {
        let trimmed = input.trim();
        if trimmed.is_empty() || !trimmed.bytes().all(|b| b.is_ascii_digit()) {
            return Err(ValidationError::InvalidId {
                kind: T::KIND,
                input: input.to_string(),
            });
        }
        Ok(Self {
            value: trimmed.to_string(),
            _phantom: PhantomData,
        })
    }
}

impl<T> Id<T> {
    /// Get the ID as a string reference
    pub fn as_str(&self) -> &str {
        &self.value
    }
}

impl<T> fmt::Display for Id<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.value)
    }
}

impl<T> Serialize for Id<T> {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        self.value.serialize(serializer)
    }
}

impl<'de, T: IdKind> Deserialize<'de> for Id<T> {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let value = String::deserialize(deserializer)?;
        Self::parse(&value).map_err(serde::de::Error::custom)
    }
}

impl<T: IdKind> std::str::FromStr for Id<T> {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}
