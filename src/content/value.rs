//! Dynamic content values.

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};

/// A content record: the untyped name/value payload of a document or user
/// entity. The record itself is never schema-aware; the schema is supplied
/// alongside it by the caller.
pub type ContentRecord = BTreeMap<String, ContentValue>;

/// A dynamic content value.
///
/// This is the value universe the engines operate on. It is wider than
/// JSON in one place: `Timestamp` holds a parsed instant, which the wire
/// format only carries as a formatted string. The write path requires
/// temporal fields to already be `Timestamp`; the read path produces them.
#[derive(Debug, Clone, PartialEq)]
pub enum ContentValue {
    /// Absent or failed value; also the sentinel for an array element that
    /// failed to convert
    Null,
    /// Boolean
    Boolean(bool),
    /// 64-bit signed integer
    Integer(i64),
    /// 64-bit floating point
    Float(f64),
    /// UTF-8 string
    String(String),
    /// Parsed instant in UTC
    Timestamp(DateTime<Utc>),
    /// Ordered sequence
    Array(Vec<ContentValue>),
    /// Nested mapping
    Map(BTreeMap<String, ContentValue>),
}

impl ContentValue {
    /// Returns the value's shape name for error messages.
    pub fn type_name(&self) -> &'static str {
        match self {
            ContentValue::Null => "null",
            ContentValue::Boolean(_) => "boolean",
            ContentValue::Integer(_) => "integer",
            ContentValue::Float(_) => "float",
            ContentValue::String(_) => "string",
            ContentValue::Timestamp(_) => "timestamp",
            ContentValue::Array(_) => "array",
            ContentValue::Map(_) => "map",
        }
    }

    /// Returns the string contents, if this is a string.
    pub fn as_str(&self) -> Option<&str> {
        match self {
            ContentValue::String(s) => Some(s),
            _ => None,
        }
    }

    /// Returns the integer contents, if this is an integer.
    pub fn as_i64(&self) -> Option<i64> {
        match self {
            ContentValue::Integer(i) => Some(*i),
            _ => None,
        }
    }

    /// Returns the float contents, if this is a float.
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            ContentValue::Float(f) => Some(*f),
            _ => None,
        }
    }

    /// Returns the timestamp contents, if this is a timestamp.
    pub fn as_timestamp(&self) -> Option<DateTime<Utc>> {
        match self {
            ContentValue::Timestamp(ts) => Some(*ts),
            _ => None,
        }
    }
}

// Wire decoding. The store sends one generic numeric representation for
// all numbers; integral numbers land as `Integer`, everything else as
// `Float`. Timestamps and typed arrays arrive string-encoded and stay
// strings here; the converter types them against the schema.
impl From<serde_json::Value> for ContentValue {
    fn from(value: serde_json::Value) -> Self {
        match value {
            serde_json::Value::Null => ContentValue::Null,
            serde_json::Value::Bool(b) => ContentValue::Boolean(b),
            serde_json::Value::Number(n) => match n.as_i64() {
                Some(i) => ContentValue::Integer(i),
                None => ContentValue::Float(n.as_f64().unwrap_or(f64::NAN)),
            },
            serde_json::Value::String(s) => ContentValue::String(s),
            serde_json::Value::Array(items) => {
                ContentValue::Array(items.into_iter().map(ContentValue::from).collect())
            }
            serde_json::Value::Object(map) => ContentValue::Map(
                map.into_iter()
                    .map(|(k, v)| (k, ContentValue::from(v)))
                    .collect(),
            ),
        }
    }
}

impl From<bool> for ContentValue {
    fn from(b: bool) -> Self {
        ContentValue::Boolean(b)
    }
}

impl From<i64> for ContentValue {
    fn from(i: i64) -> Self {
        ContentValue::Integer(i)
    }
}

impl From<f64> for ContentValue {
    fn from(f: f64) -> Self {
        ContentValue::Float(f)
    }
}

impl From<&str> for ContentValue {
    fn from(s: &str) -> Self {
        ContentValue::String(s.to_string())
    }
}

impl From<String> for ContentValue {
    fn from(s: String) -> Self {
        ContentValue::String(s)
    }
}

impl From<DateTime<Utc>> for ContentValue {
    fn from(ts: DateTime<Utc>) -> Self {
        ContentValue::Timestamp(ts)
    }
}

/// Decodes a JSON object body, as produced by envelope unwrapping, into a
/// content record. Returns `None` if the body is not a JSON object.
pub fn record_from_json(body: serde_json::Value) -> Option<ContentRecord> {
    match body {
        serde_json::Value::Object(map) => Some(
            map.into_iter()
                .map(|(k, v)| (k, ContentValue::from(v)))
                .collect(),
        ),
        _ => None,
    }
}
