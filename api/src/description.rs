//! Structured product descriptions
//!
//! The backend ships a product description as a JSON-encoded string, for
//! example `{"Description":"Flagship phone","Screen":"6.1\"","Battery":"4000 mAh"}`.
//! It is decoded once, at deserialization time, into an ordered list of
//! key/value entries. The first entry is the summary, the rest are the
//! characteristics table.

use serde::de::Deserializer;
use serde::ser::Serializer;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Key used when the description is plain text rather than JSON
pub const SUMMARY_KEY: &str = "Description";

/// One line of a product description
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct DescriptionEntry {
    /// Label, e.g. `"Screen"`
    pub key: String,
    /// Value, e.g. `"6.1\""`
    pub value: String,
}

impl DescriptionEntry {
    /// Create an entry
    #[must_use]
    pub fn new(key: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            value: value.into(),
        }
    }
}

/// Ordered product description
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ProductDescription {
    entries: Vec<DescriptionEntry>,
}

impl ProductDescription {
    /// Build a description from entries, keeping their order
    #[must_use]
    pub const fn from_entries(entries: Vec<DescriptionEntry>) -> Self {
        Self { entries }
    }

    /// Parse the backend's encoded description
    ///
    /// - a JSON object keeps its key order
    /// - a JSON array of `{"key": .., "value": ..}` objects keeps its order
    /// - a JSON string, or anything that is not JSON, becomes one summary entry
    /// - blank input yields an empty description
    #[must_use]
    pub fn parse(raw: &str) -> Self {
        let raw = raw.trim();
        if raw.is_empty() {
            return Self::default();
        }

        let entries = match serde_json::from_str::<Value>(raw) {
            Ok(Value::Object(map)) => map
                .into_iter()
                .map(|(key, value)| DescriptionEntry::new(key, value_text(value)))
                .collect(),
            Ok(Value::Array(items)) => items.into_iter().filter_map(array_entry).collect(),
            Ok(Value::String(text)) => vec![DescriptionEntry::new(SUMMARY_KEY, text)],
            Ok(_) | Err(_) => vec![DescriptionEntry::new(SUMMARY_KEY, raw)],
        };

        Self { entries }
    }

    /// First entry, shown as the main description
    #[must_use]
    pub fn summary(&self) -> Option<&DescriptionEntry> {
        self.entries.first()
    }

    /// Every entry after the summary
    #[must_use]
    pub fn characteristics(&self) -> &[DescriptionEntry] {
        self.entries.get(1..).unwrap_or_default()
    }

    /// All entries in order
    #[must_use]
    pub fn entries(&self) -> &[DescriptionEntry] {
        &self.entries
    }

    /// True when there is nothing to show
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Encode back into the backend's JSON-object string
    ///
    /// Duplicate keys keep only their last value.
    #[must_use]
    pub fn encode(&self) -> String {
        let map: Map<String, Value> = self
            .entries
            .iter()
            .map(|entry| (entry.key.clone(), Value::String(entry.value.clone())))
            .collect();
        Value::Object(map).to_string()
    }
}

fn value_text(value: Value) -> String {
    match value {
        Value::String(text) => text,
        Value::Null => String::new(),
        other => other.to_string(),
    }
}

fn array_entry(item: Value) -> Option<DescriptionEntry> {
    let Value::Object(mut fields) = item else {
        return None;
    };
    let key = fields.remove("key").or_else(|| fields.remove("name"))?;
    let value = fields.remove("value").unwrap_or(Value::Null);
    Some(DescriptionEntry::new(value_text(key), value_text(value)))
}

impl<'de> Deserialize<'de> for ProductDescription {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let raw = Option::<String>::deserialize(deserializer)?;
        Ok(raw.as_deref().map(Self::parse).unwrap_or_default())
    }
}

impl Serialize for ProductDescription {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        if self.entries.is_empty() {
            serializer.serialize_none()
        } else {
            serializer.serialize_str(&self.encode())
        }
    }
}
