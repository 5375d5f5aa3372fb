//! Read-path content conversion.
//!
//! The store returns loosely typed values: one generic numeric
//! representation for all numbers, timestamps as formatted strings, and
//! typed arrays as strings holding a JSON array. Conversion types each
//! field per the schema.
//!
//! Conversion is best-effort: a field that fails to convert keeps its
//! original wire value and is reported in the error list, and the caller
//! receives both. Keys absent from the schema pass through unconverted
//! with no error; the read path is tolerant by design, unlike the write
//! path, and this asymmetry is intentional.

use chrono::{DateTime, NaiveDateTime, NaiveDate, NaiveTime, Utc};

use crate::schema::{ConversionError, ElementType, FieldType, SchemaIndex};

use super::value::{ContentRecord, ContentValue};

/// Converts content records read from the store into typed values.
///
/// Stateless over its borrowed index; safe to share across threads.
pub struct ContentConverter<'a> {
    schema: &'a SchemaIndex,
}

impl<'a> ContentConverter<'a> {
    /// Creates a converter over the given schema index.
    pub fn new(schema: &'a SchemaIndex) -> Self {
        Self { schema }
    }

    /// Converts a record. Always returns a complete record: converted
    /// values where conversion succeeded, original wire values where it
    /// did not, alongside the accumulated errors.
    pub fn convert(&self, record: ContentRecord) -> (ContentRecord, Vec<ConversionError>) {
        let mut converted = ContentRecord::new();
        let mut errors = Vec::new();

        for (name, value) in record {
            let value = match self.schema.get(&name) {
                // Unknown keys pass through untouched on read.
                None => value,
                Some(field) => convert_value(&name, value, &field.field_type, &mut errors),
            };
            converted.insert(name, value);
        }

        if !errors.is_empty() {
            tracing::debug!(errors = errors.len(), "record conversion reported errors");
        }

        (converted, errors)
    }
}

/// Converts one value per its declared type, pushing errors as needed and
/// returning the value to place in the record.
fn convert_value(
    name: &str,
    value: ContentValue,
    field_type: &FieldType,
    errors: &mut Vec<ConversionError>,
) -> ContentValue {
    match field_type {
        FieldType::Integer => match value {
            ContentValue::Integer(_) => value,
            ContentValue::Float(f) => match narrow_to_i64(f) {
                Some(i) => ContentValue::Integer(i),
                None if f.fract() == 0.0 => {
                    errors.push(ConversionError::IntegerOutOfRange {
                        field: name.to_string(),
                        value: f,
                    });
                    value
                }
                None => {
                    errors.push(ConversionError::FractionalInteger {
                        field: name.to_string(),
                        value: f,
                    });
                    value
                }
            },
            other => keep_with_mismatch(name, other, "number", errors),
        },
        FieldType::Float => match value {
            ContentValue::Float(_) => value,
            ContentValue::Integer(i) => ContentValue::Float(i as f64),
            other => keep_with_mismatch(name, other, "number", errors),
        },
        // Pass-through on read: the engine does not interpret base64 or
        // JSON content, and boolean wire values already have their shape.
        FieldType::String
        | FieldType::Text
        | FieldType::Base64
        | FieldType::Json
        | FieldType::Blob => match value {
            ContentValue::String(_) => value,
            other => keep_with_mismatch(name, other, "string", errors),
        },
        FieldType::Boolean => match value {
            ContentValue::Boolean(_) => value,
            other => keep_with_mismatch(name, other, "boolean", errors),
        },
        FieldType::Date | FieldType::Time | FieldType::DateTime => match value {
            ContentValue::String(s) => match parse_timestamp(&s, field_type) {
                Some(ts) => ContentValue::Timestamp(ts),
                None => {
                    errors.push(ConversionError::InvalidTimestamp {
                        field: name.to_string(),
                        expected: temporal_tag(field_type),
                        text: s.clone(),
                    });
                    ContentValue::String(s)
                }
            },
            ContentValue::Timestamp(_) => value,
            other => keep_with_mismatch(name, other, "string", errors),
        },
        FieldType::Array(element_type) => match value {
            ContentValue::String(s) => match serde_json::from_str::<serde_json::Value>(&s) {
                Ok(serde_json::Value::Array(items)) => {
                    convert_array(name, items, *element_type, errors)
                }
                _ => {
                    errors.push(ConversionError::MalformedArray {
                        field: name.to_string(),
                    });
                    ContentValue::String(s)
                }
            },
            other => keep_with_mismatch(name, other, "string", errors),
        },
        FieldType::Unsupported { tag } => {
            errors.push(ConversionError::UnsupportedFieldType {
                field: name.to_string(),
                tag: tag.clone(),
            });
            value
        }
    }
}

/// Converts a parsed JSON array's elements. Elements that fail keep their
/// position as a null sentinel and are reported individually.
fn convert_array(
    name: &str,
    items: Vec<serde_json::Value>,
    element_type: ElementType,
    errors: &mut Vec<ConversionError>,
) -> ContentValue {
    let mut converted = Vec::with_capacity(items.len());

    for (index, item) in items.into_iter().enumerate() {
        match convert_element(item, element_type) {
            Some(value) => converted.push(value),
            None => {
                errors.push(ConversionError::ElementConversionFailure {
                    field: name.to_string(),
                    index,
                    expected: element_type.type_name(),
                });
                converted.push(ContentValue::Null);
            }
        }
    }

    ContentValue::Array(converted)
}

fn convert_element(item: serde_json::Value, element_type: ElementType) -> Option<ContentValue> {
    match element_type {
        ElementType::Integer => match item {
            serde_json::Value::Number(n) => match n.as_i64() {
                Some(i) => Some(ContentValue::Integer(i)),
                None => n
                    .as_f64()
                    .and_then(narrow_to_i64)
                    .map(ContentValue::Integer),
            },
            _ => None,
        },
        ElementType::Float => match item {
            serde_json::Value::Number(n) => n.as_f64().map(ContentValue::Float),
            _ => None,
        },
        ElementType::String => match item {
            serde_json::Value::String(s) => Some(ContentValue::String(s)),
            _ => None,
        },
    }
}

/// Parses a temporal wire string per the declared sub-type. A date-only
/// value anchors to midnight; a time-only value anchors to the epoch
/// reference day. The sub-type distinction lives only in the schema, not
/// in the stored representation.
fn parse_timestamp(text: &str, field_type: &FieldType) -> Option<DateTime<Utc>> {
    match field_type {
        FieldType::Date => NaiveDate::parse_from_str(text, "%Y-%m-%d")
            .ok()
            .map(|date| naive_utc(date.and_time(NaiveTime::MIN))),
        FieldType::Time => NaiveTime::parse_from_str(text, "%H:%M:%S")
            .ok()
            .map(|time| naive_utc(DateTime::<Utc>::UNIX_EPOCH.date_naive().and_time(time))),
        FieldType::DateTime => DateTime::parse_from_rfc3339(text)
            .ok()
            .map(|dt| dt.with_timezone(&Utc))
            .or_else(|| {
                // Legacy exports carry naive timestamps, taken as UTC.
                NaiveDateTime::parse_from_str(text, "%Y-%m-%d %H:%M:%S")
                    .ok()
                    .map(naive_utc)
            }),
        _ => None,
    }
}

fn naive_utc(naive: NaiveDateTime) -> DateTime<Utc> {
    DateTime::from_naive_utc_and_offset(naive, Utc)
}

/// Narrows an integral float to i64. Values with a fractional part or
/// outside `[-2^63, 2^63)` do not narrow; the `as` cast saturates beyond
/// that range.
fn narrow_to_i64(f: f64) -> Option<i64> {
    const I64_EXCLUSIVE_END: f64 = 9_223_372_036_854_775_808.0; // 2^63
    if f.fract() == 0.0 && f >= -I64_EXCLUSIVE_END && f < I64_EXCLUSIVE_END {
        Some(f as i64)
    } else {
        None
    }
}

fn temporal_tag(field_type: &FieldType) -> &'static str {
    match field_type {
        FieldType::Date => "date",
        FieldType::Time => "time",
        _ => "datetime",
    }
}

fn keep_with_mismatch(
    name: &str,
    value: ContentValue,
    expected: &'static str,
    errors: &mut Vec<ConversionError>,
) -> ContentValue {
    errors.push(ConversionError::TypeMismatch {
        field: name.to_string(),
        expected,
        actual: value.type_name(),
    });
    value
}
