//! Error types for schema construction, write-path validation, and
//! read-path conversion.
//!
//! Validation and conversion are accumulating: the engines collect every
//! error they find and return the full list. Nothing here is fatal to the
//! caller's process; an unsupported field type in particular is a reported
//! error, never an abort, because schemas evolve server-side independently
//! of client code.

use thiserror::Error;

/// Result type for schema index construction
pub type SchemaResult<T> = Result<T, SchemaError>;

/// Errors raised while building a [`SchemaIndex`](super::SchemaIndex).
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SchemaError {
    /// The same field name appears more than once in a schema.
    ///
    /// Rejected eagerly rather than resolved last-write-wins; a schema with
    /// duplicate names is ambiguous and never produces a partial index.
    #[error("duplicate field '{name}' in schema")]
    DuplicateField {
        /// The repeated field name
        name: String,
    },
}

/// Write-path validation errors, accumulated per record.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    // ==================
    // Declaration errors
    // ==================
    /// Key present in the record but absent from the schema.
    /// Write-path only; the read path passes unknown keys through.
    #[error("field '{field}' is not declared in the schema")]
    FieldNotDeclared {
        /// The undeclared key
        field: String,
    },

    /// The schema declares a type tag this client does not recognize.
    #[error("field '{field}' has unsupported type '{tag}'")]
    UnsupportedFieldType {
        /// The field name
        field: String,
        /// The unrecognized wire tag
        tag: String,
    },

    // ==================
    // Value shape errors
    // ==================
    /// The value's runtime shape does not match the declared type.
    #[error("field '{field}': expected {expected}, got {actual}")]
    TypeMismatch {
        /// The field name
        field: String,
        /// Expected value shape
        expected: &'static str,
        /// Actual value shape found
        actual: &'static str,
    },

    /// A string field is over its length cap.
    #[error("field '{field}' exceeds {limit} characters")]
    LengthExceeded {
        /// The field name
        field: String,
        /// The cap, in code points
        limit: usize,
    },

    /// A base64 field fails to decode.
    #[error("field '{field}' is not valid base64")]
    InvalidEncoding {
        /// The field name
        field: String,
    },

    /// A json field is not syntactically valid JSON text.
    #[error("field '{field}' is not valid JSON")]
    InvalidSyntax {
        /// The field name
        field: String,
    },

    /// A blob field was submitted as record content. Blob content goes
    /// through the separate upload protocol, never through a record write.
    #[error("field '{field}' is a blob and cannot be written as record content")]
    ImmutableField {
        /// The field name
        field: String,
    },
}

impl ValidationError {
    /// Returns the field this error concerns.
    pub fn field(&self) -> &str {
        match self {
            ValidationError::FieldNotDeclared { field }
            | ValidationError::UnsupportedFieldType { field, .. }
            | ValidationError::TypeMismatch { field, .. }
            | ValidationError::LengthExceeded { field, .. }
            | ValidationError::InvalidEncoding { field }
            | ValidationError::InvalidSyntax { field }
            | ValidationError::ImmutableField { field } => field,
        }
    }
}

/// Read-path conversion errors, accumulated per record.
///
/// Conversion is best-effort: every error leaves the remaining fields
/// unaffected, and the caller receives the partially converted record
/// alongside this list.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ConversionError {
    /// The wire value's shape does not match what the declared type expects.
    #[error("field '{field}': expected {expected}, got {actual}")]
    TypeMismatch {
        /// The field name
        field: String,
        /// Expected wire shape
        expected: &'static str,
        /// Actual wire shape found
        actual: &'static str,
    },

    /// A numeric wire value has a non-zero fractional part and cannot be
    /// narrowed to an integer.
    #[error("field '{field}': cannot narrow {value} to an integer")]
    FractionalInteger {
        /// The field name
        field: String,
        /// The offending value
        value: f64,
    },

    /// A numeric wire value is integral but lies outside the 64-bit
    /// signed integer range and cannot be narrowed without corruption.
    #[error("field '{field}': {value} is out of integer range")]
    IntegerOutOfRange {
        /// The field name
        field: String,
        /// The offending value
        value: f64,
    },

    /// A temporal wire string does not parse under the declared sub-type's
    /// format.
    #[error("field '{field}': '{text}' is not a valid {expected} value")]
    InvalidTimestamp {
        /// The field name
        field: String,
        /// The declared sub-type tag ("date", "time", "datetime")
        expected: &'static str,
        /// The unparsable wire text
        text: String,
    },

    /// An array field's wire payload is not a JSON array.
    #[error("field '{field}': array payload is not a JSON array")]
    MalformedArray {
        /// The field name
        field: String,
    },

    /// One element of an array field failed to convert. The element's
    /// position holds a null sentinel in the converted record.
    #[error("field '{field}[{index}]': element does not convert to {expected}")]
    ElementConversionFailure {
        /// The field name
        field: String,
        /// Zero-based element index
        index: usize,
        /// Expected element type name
        expected: &'static str,
    },

    /// The schema declares a type tag this client does not recognize.
    #[error("field '{field}' has unsupported type '{tag}'")]
    UnsupportedFieldType {
        /// The field name
        field: String,
        /// The unrecognized wire tag
        tag: String,
    },
}

impl ConversionError {
    /// Returns the field this error concerns.
    pub fn field(&self) -> &str {
        match self {
            ConversionError::TypeMismatch { field, .. }
            | ConversionError::FractionalInteger { field, .. }
            | ConversionError::IntegerOutOfRange { field, .. }
            | ConversionError::InvalidTimestamp { field, .. }
            | ConversionError::MalformedArray { field }
            | ConversionError::ElementConversionFailure { field, .. }
            | ConversionError::UnsupportedFieldType { field, .. } => field,
        }
    }
}
