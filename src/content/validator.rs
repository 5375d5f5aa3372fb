//! Write-path content validation.
//!
//! Validation semantics:
//! - Every key must be declared by the schema
//! - Every value's shape must match its declared type exactly
//! - Blob fields are never writable as record content
//! - All errors across all keys are accumulated; validation never stops at
//!   the first error and never panics
//!
//! Validation does not mutate or coerce the record; callers must have
//! parsed temporal wire strings into timestamp values before validating.

use base64::{engine::general_purpose::STANDARD, Engine as _};

use crate::schema::{ElementType, FieldType, SchemaIndex, ValidationError};

use super::value::{ContentRecord, ContentValue};

/// Maximum length of a `string`-typed field, in code points. `text` fields
/// are uncapped.
pub const STRING_LENGTH_LIMIT: usize = 255;

/// Validates content records against a schema before they are written.
///
/// Holds no state beyond the borrowed index; one validator (or many) can
/// be used from any number of threads.
pub struct ContentValidator<'a> {
    schema: &'a SchemaIndex,
}

impl<'a> ContentValidator<'a> {
    /// Creates a validator over the given schema index.
    pub fn new(schema: &'a SchemaIndex) -> Self {
        Self { schema }
    }

    /// Validates a record. An empty list means the record conforms.
    ///
    /// Errors are accumulated across all keys; at most one error is
    /// reported per key.
    pub fn validate(&self, record: &ContentRecord) -> Vec<ValidationError> {
        let mut errors = Vec::new();

        for (name, value) in record {
            match self.schema.get(name) {
                None => errors.push(ValidationError::FieldNotDeclared {
                    field: name.clone(),
                }),
                Some(field) => {
                    if let Some(error) = check_value(name, value, &field.field_type) {
                        errors.push(error);
                    }
                }
            }
        }

        errors
    }
}

/// Checks one value against its declared type.
fn check_value(name: &str, value: &ContentValue, field_type: &FieldType) -> Option<ValidationError> {
    match field_type {
        FieldType::Integer => match value {
            ContentValue::Integer(_) => None,
            _ => Some(mismatch(name, field_type, value)),
        },
        FieldType::Float => match value {
            ContentValue::Float(_) => None,
            _ => Some(mismatch(name, field_type, value)),
        },
        FieldType::Boolean => match value {
            ContentValue::Boolean(_) => None,
            _ => Some(mismatch(name, field_type, value)),
        },
        FieldType::String => match value {
            ContentValue::String(s) => {
                if s.chars().count() > STRING_LENGTH_LIMIT {
                    Some(ValidationError::LengthExceeded {
                        field: name.to_string(),
                        limit: STRING_LENGTH_LIMIT,
                    })
                } else {
                    None
                }
            }
            _ => Some(mismatch(name, field_type, value)),
        },
        FieldType::Text => match value {
            ContentValue::String(_) => None,
            _ => Some(mismatch(name, field_type, value)),
        },
        // Raw wire strings are rejected here: the caller parses temporal
        // strings before validating.
        FieldType::Date | FieldType::Time | FieldType::DateTime => match value {
            ContentValue::Timestamp(_) => None,
            _ => Some(mismatch(name, field_type, value)),
        },
        FieldType::Base64 => match value {
            ContentValue::String(s) => {
                if STANDARD.decode(s).is_ok() {
                    None
                } else {
                    Some(ValidationError::InvalidEncoding {
                        field: name.to_string(),
                    })
                }
            }
            _ => Some(mismatch(name, field_type, value)),
        },
        FieldType::Json => match value {
            ContentValue::String(s) => {
                if serde_json::from_str::<serde_json::Value>(s).is_ok() {
                    None
                } else {
                    Some(ValidationError::InvalidSyntax {
                        field: name.to_string(),
                    })
                }
            }
            _ => Some(mismatch(name, field_type, value)),
        },
        FieldType::Array(element_type) => match value {
            ContentValue::Array(items) => {
                if items.iter().all(|item| element_matches(item, *element_type)) {
                    None
                } else {
                    Some(mismatch(name, field_type, value))
                }
            }
            _ => Some(mismatch(name, field_type, value)),
        },
        // Blob content goes through the upload protocol, never a record
        // write.
        FieldType::Blob => Some(ValidationError::ImmutableField {
            field: name.to_string(),
        }),
        FieldType::Unsupported { tag } => Some(ValidationError::UnsupportedFieldType {
            field: name.to_string(),
            tag: tag.clone(),
        }),
    }
}

fn element_matches(value: &ContentValue, element_type: ElementType) -> bool {
    match element_type {
        ElementType::Integer => matches!(value, ContentValue::Integer(_)),
        ElementType::Float => matches!(value, ContentValue::Float(_)),
        ElementType::String => matches!(value, ContentValue::String(_)),
    }
}

fn mismatch(name: &str, field_type: &FieldType, value: &ContentValue) -> ValidationError {
    ValidationError::TypeMismatch {
        field: name.to_string(),
        expected: field_type.type_name(),
        actual: value.type_name(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::SchemaField;
    use chrono::{TimeZone, Utc};

    fn article_index() -> SchemaIndex {
        SchemaIndex::build(&[
            SchemaField::new("title", FieldType::String),
            SchemaField::new("body", FieldType::Text),
            SchemaField::new("views", FieldType::Integer),
            SchemaField::new("rating", FieldType::Float),
            SchemaField::new("published", FieldType::Boolean),
            SchemaField::new("created", FieldType::DateTime),
            SchemaField::new("thumbnail", FieldType::Base64),
            SchemaField::new("metadata", FieldType::Json),
            SchemaField::new("attachment", FieldType::Blob),
            SchemaField::new("scores", FieldType::Array(ElementType::Integer)),
        ])
        .unwrap()
    }

    fn record(entries: &[(&str, ContentValue)]) -> ContentRecord {
        entries
            .iter()
            .map(|(k, v)| (k.to_string(), v.clone()))
            .collect()
    }

    #[test]
    fn test_conforming_record_passes() {
        let index = article_index();
        let validator = ContentValidator::new(&index);

        let record = record(&[
            ("title", "hello".into()),
            ("body", "a longer body".into()),
            ("views", 10.into()),
            ("rating", 4.5.into()),
            ("published", true.into()),
            ("created", Utc.with_ymd_and_hms(2021, 6, 1, 9, 0, 0).unwrap().into()),
            ("thumbnail", "aGVsbG8=".into()),
            ("metadata", r#"{"success": true}"#.into()),
            (
                "scores",
                ContentValue::Array(vec![1.into(), 2.into(), 3.into()]),
            ),
        ]);

        assert_eq!(validator.validate(&record), vec![]);
    }

    #[test]
    fn test_undeclared_key_reported_once_others_still_checked() {
        let index = article_index();
        let validator = ContentValidator::new(&index);

        let record = record(&[
            ("mystery", 1.into()),
            ("views", "ten".into()), // also wrong
        ]);

        let errors = validator.validate(&record);
        assert_eq!(errors.len(), 2);
        assert!(errors.contains(&ValidationError::FieldNotDeclared {
            field: "mystery".to_string()
        }));
        assert!(matches!(
            errors.iter().find(|e| e.field() == "views"),
            Some(ValidationError::TypeMismatch { expected: "integer", actual: "string", .. })
        ));
    }

    #[test]
    fn test_string_length_boundary() {
        let index = article_index();
        let validator = ContentValidator::new(&index);

        let at_cap = record(&[("title", "x".repeat(255).into())]);
        assert_eq!(validator.validate(&at_cap), vec![]);

        let over_cap = record(&[("title", "x".repeat(256).into())]);
        assert_eq!(
            validator.validate(&over_cap),
            vec![ValidationError::LengthExceeded {
                field: "title".to_string(),
                limit: 255
            }]
        );
    }

    #[test]
    fn test_length_counts_code_points_not_bytes() {
        let index = article_index();
        let validator = ContentValidator::new(&index);

        // 255 multi-byte code points are within the cap
        let record = record(&[("title", "é".repeat(255).into())]);
        assert_eq!(validator.validate(&record), vec![]);
    }

    #[test]
    fn test_text_has_no_cap() {
        let index = article_index();
        let validator = ContentValidator::new(&index);

        let record = record(&[("body", "x".repeat(10_000).into())]);
        assert_eq!(validator.validate(&record), vec![]);
    }

    #[test]
    fn test_temporal_fields_require_parsed_timestamps() {
        let index = article_index();
        let validator = ContentValidator::new(&index);

        let record = record(&[("created", "2021-06-01T09:00:00Z".into())]);
        let errors = validator.validate(&record);
        assert_eq!(errors.len(), 1);
        assert!(matches!(
            &errors[0],
            ValidationError::TypeMismatch { expected: "timestamp", actual: "string", .. }
        ));
    }

    #[test]
    fn test_invalid_base64_rejected() {
        let index = article_index();
        let validator = ContentValidator::new(&index);

        let record = record(&[("thumbnail", "not-base64!".into())]);
        assert_eq!(
            validator.validate(&record),
            vec![ValidationError::InvalidEncoding {
                field: "thumbnail".to_string()
            }]
        );
    }

    #[test]
    fn test_invalid_json_syntax_rejected() {
        let index = article_index();
        let validator = ContentValidator::new(&index);

        let malformed = record(&[("metadata", "{not json".into())]);
        assert_eq!(
            validator.validate(&malformed),
            vec![ValidationError::InvalidSyntax {
                field: "metadata".to_string()
            }]
        );

        // A non-string value for a json field is a type mismatch instead
        let wrong_shape = record(&[("metadata", true.into())]);
        assert!(matches!(
            validator.validate(&wrong_shape)[0],
            ValidationError::TypeMismatch { .. }
        ));
    }

    #[test]
    fn test_blob_always_rejected() {
        let index = article_index();
        let validator = ContentValidator::new(&index);

        for value in [
            ContentValue::from("bytes"),
            ContentValue::from(1i64),
            ContentValue::Null,
        ] {
            let record = record(&[("attachment", value)]);
            assert_eq!(
                validator.validate(&record),
                vec![ValidationError::ImmutableField {
                    field: "attachment".to_string()
                }]
            );
        }
    }

    #[test]
    fn test_heterogeneous_array_rejected() {
        let index = article_index();
        let validator = ContentValidator::new(&index);

        let record = record(&[(
            "scores",
            ContentValue::Array(vec![1.into(), "two".into(), 3.into()]),
        )]);
        let errors = validator.validate(&record);
        assert_eq!(errors.len(), 1);
        assert!(matches!(
            &errors[0],
            ValidationError::TypeMismatch { expected: "integer array", .. }
        ));
    }

    #[test]
    fn test_unsupported_type_reported_without_aborting() {
        let index = SchemaIndex::build(&[
            SchemaField::new("position", FieldType::from_tag("geoloc")),
            SchemaField::new("views", FieldType::Integer),
        ])
        .unwrap();
        let validator = ContentValidator::new(&index);

        let record = record(&[
            ("position", "48.85,2.35".into()),
            ("views", "ten".into()), // must still be checked
        ]);

        let errors = validator.validate(&record);
        assert_eq!(errors.len(), 2);
        assert!(errors.contains(&ValidationError::UnsupportedFieldType {
            field: "position".to_string(),
            tag: "geoloc".to_string()
        }));
        assert!(errors.iter().any(|e| e.field() == "views"));
    }

    #[test]
    fn test_null_never_matches_a_declared_type() {
        let index = article_index();
        let validator = ContentValidator::new(&index);

        let record = record(&[("views", ContentValue::Null)]);
        assert!(matches!(
            validator.validate(&record)[0],
            ValidationError::TypeMismatch { actual: "null", .. }
        ));
    }
}
