//! Conversation roles and invocation metadata types

use serde::{Deserialize, Serialize};
use serde_json::Number;
use std::collections::BTreeMap;
use std::fmt;

/// Free-form caller metadata, visible to every step's template.
///
/// A `BTreeMap` keeps serialization order stable so identical metadata
/// always renders to the identical prompt.
pub type Metadata = BTreeMap<String, MetadataValue>;

/// Author of a conversation entry
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    User,
    Assistant,
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::User => "user",
            Role::Assistant => "assistant",
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Closed set of values a metadata entry may hold.
///
/// Serializes untagged, so a metadata map renders as plain JSON:
/// `{"station":"north","alerts":3,"nested":{"ok":true}}`. Numbers keep
/// their integer or float form, so `3` never renders as `3.0`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum MetadataValue {
    Bool(bool),
    Number(Number),
    String(String),
    Map(BTreeMap<String, MetadataValue>),
}

impl MetadataValue {
    /// Parse a command-line style value: bool, then number, then string.
    ///
    /// A number is only taken when it prints back as the exact input text.
    /// `007`, `1e3` or an integer too wide for 64 bits stay strings.
    pub fn parse_loose(raw: &str) -> Self {
        if let Ok(b) = raw.parse::<bool>() {
            return MetadataValue::Bool(b);
        }
        match Self::parse_number(raw) {
            Some(n) => MetadataValue::Number(n),
            None => MetadataValue::String(raw.to_string()),
        }
    }

    fn parse_number(raw: &str) -> Option<Number> {
        let number = if let Ok(i) = raw.parse::<i64>() {
            Number::from(i)
        } else if let Ok(u) = raw.parse::<u64>() {
            Number::from(u)
        } else {
            Number::from_f64(raw.parse::<f64>().ok()?)?
        };
        (number.to_string() == raw).then_some(number)
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            MetadataValue::String(s) => Some(s),
            _ => None,
        }
    }
}

impl From<&str> for MetadataValue {
    fn from(value: &str) -> Self {
        MetadataValue::String(value.to_string())
    }
}

impl From<String> for MetadataValue {
    fn from(value: String) -> Self {
        MetadataValue::String(value)
    }
}

impl From<bool> for MetadataValue {
    fn from(value: bool) -> Self {
        MetadataValue::Bool(value)
    }
}

impl From<Number> for MetadataValue {
    fn from(value: Number) -> Self {
        MetadataValue::Number(value)
    }
}

impl From<i64> for MetadataValue {
    fn from(value: i64) -> Self {
        MetadataValue::Number(value.into())
    }
}

impl From<u64> for MetadataValue {
    fn from(value: u64) -> Self {
        MetadataValue::Number(value.into())
    }
}

impl From<BTreeMap<String, MetadataValue>> for MetadataValue {
    fn from(value: BTreeMap<String, MetadataValue>) -> Self {
        MetadataValue::Map(value)
    }
}
