//! Field type and schema definitions.
//!
//! Content field types supported by the store:
//! - integer: 64-bit signed integer
//! - float: 64-bit floating point
//! - string: UTF-8 string, at most 255 code points
//! - text: UTF-8 string, unbounded
//! - boolean: Boolean
//! - date / time / datetime: timestamp, wire-encoded as a formatted string
//! - base64: base64-encoded string
//! - json: string holding JSON text
//! - blob: binary content, written through the upload protocol only
//! - integer[] / float[] / string[]: homogeneous array, wire-encoded as a
//!   string holding a JSON array

use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// Element type of an array field.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ElementType {
    /// 64-bit signed integer elements
    Integer,
    /// 64-bit floating point elements
    Float,
    /// UTF-8 string elements
    String,
}

impl ElementType {
    /// Returns the element type name for error messages.
    pub fn type_name(&self) -> &'static str {
        match self {
            ElementType::Integer => "integer",
            ElementType::Float => "float",
            ElementType::String => "string",
        }
    }
}

/// Content field type as declared by a schema.
///
/// The set is closed, but schemas evolve server-side independently of
/// client code: a type tag this client does not recognize deserializes to
/// [`FieldType::Unsupported`] carrying the raw tag, and surfaces later as
/// an `UnsupportedFieldType` error from the validator or converter. It is
/// never a deserialization failure.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FieldType {
    /// 64-bit signed integer
    Integer,
    /// 64-bit floating point
    Float,
    /// UTF-8 string, at most 255 code points
    String,
    /// UTF-8 string, unbounded
    Text,
    /// Boolean
    Boolean,
    /// Calendar date, stored as a timestamp at midnight
    Date,
    /// Time of day, stored as a timestamp on the reference day
    Time,
    /// Full timestamp
    DateTime,
    /// Base64-encoded string
    Base64,
    /// String holding JSON text
    Json,
    /// Binary content; never written as record content
    Blob,
    /// Homogeneous array of the given element type
    Array(ElementType),
    /// Type tag this client does not recognize
    Unsupported {
        /// The raw wire tag
        tag: String,
    },
}

impl FieldType {
    /// Parses a wire type tag. Total: unknown tags become `Unsupported`.
    pub fn from_tag(tag: &str) -> Self {
        match tag {
            "integer" => FieldType::Integer,
            "float" => FieldType::Float,
            "string" => FieldType::String,
            "text" => FieldType::Text,
            "boolean" => FieldType::Boolean,
            "date" => FieldType::Date,
            "time" => FieldType::Time,
            "datetime" => FieldType::DateTime,
            "base64" => FieldType::Base64,
            "json" => FieldType::Json,
            "blob" => FieldType::Blob,
            "integer[]" => FieldType::Array(ElementType::Integer),
            "float[]" => FieldType::Array(ElementType::Float),
            "string[]" => FieldType::Array(ElementType::String),
            other => FieldType::Unsupported {
                tag: other.to_string(),
            },
        }
    }

    /// Returns the wire type tag.
    pub fn tag(&self) -> &str {
        match self {
            FieldType::Integer => "integer",
            FieldType::Float => "float",
            FieldType::String => "string",
            FieldType::Text => "text",
            FieldType::Boolean => "boolean",
            FieldType::Date => "date",
            FieldType::Time => "time",
            FieldType::DateTime => "datetime",
            FieldType::Base64 => "base64",
            FieldType::Json => "json",
            FieldType::Blob => "blob",
            FieldType::Array(ElementType::Integer) => "integer[]",
            FieldType::Array(ElementType::Float) => "float[]",
            FieldType::Array(ElementType::String) => "string[]",
            FieldType::Unsupported { tag } => tag,
        }
    }

    /// Returns the expected value shape for error messages.
    pub fn type_name(&self) -> &'static str {
        match self {
            FieldType::Integer => "integer",
            FieldType::Float => "float",
            FieldType::String | FieldType::Text => "string",
            FieldType::Boolean => "boolean",
            FieldType::Date | FieldType::Time | FieldType::DateTime => "timestamp",
            FieldType::Base64 => "base64 string",
            FieldType::Json => "json string",
            FieldType::Blob => "blob",
            FieldType::Array(ElementType::Integer) => "integer array",
            FieldType::Array(ElementType::Float) => "float array",
            FieldType::Array(ElementType::String) => "string array",
            FieldType::Unsupported { .. } => "unsupported",
        }
    }

    /// Returns whether this is a temporal type.
    pub fn is_temporal(&self) -> bool {
        matches!(self, FieldType::Date | FieldType::Time | FieldType::DateTime)
    }
}

// Field types travel as their string tag ("integer", "string[]", ...),
// both in schema definitions read from the store and in definitions sent
// to it.

impl Serialize for FieldType {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(self.tag())
    }
}

impl<'de> Deserialize<'de> for FieldType {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        struct TagVisitor;

        impl serde::de::Visitor<'_> for TagVisitor {
            type Value = FieldType;

            fn expecting(&self, formatter: &mut std::fmt::Formatter) -> std::fmt::Result {
                formatter.write_str("a field type tag string")
            }

            fn visit_str<E>(self, value: &str) -> Result<Self::Value, E>
            where
                E: serde::de::Error,
            {
                Ok(FieldType::from_tag(value))
            }
        }

        deserializer.deserialize_str(TagVisitor)
    }
}

/// One named field declaration within a schema.
///
/// Constructed when a schema or user-schema is defined or read from the
/// store; immutable thereafter.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SchemaField {
    /// Field name, unique within its schema
    pub name: String,
    /// Declared content type
    #[serde(rename = "type")]
    pub field_type: FieldType,
    /// Whether the store indexes this field
    #[serde(default)]
    pub indexed: bool,
    /// Optional default value, kept in wire form
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default: Option<serde_json::Value>,
}

impl SchemaField {
    /// Creates an unindexed field with no default.
    pub fn new(name: impl Into<String>, field_type: FieldType) -> Self {
        Self {
            name: name.into(),
            field_type,
            indexed: false,
            default: None,
        }
    }

    /// Creates an indexed field with no default.
    pub fn indexed(name: impl Into<String>, field_type: FieldType) -> Self {
        Self {
            name: name.into(),
            field_type,
            indexed: true,
            default: None,
        }
    }

    /// Sets the default value.
    pub fn with_default(mut self, default: serde_json::Value) -> Self {
        self.default = Some(default);
        self
    }
}

/// A schema definition as exchanged with the store: a name and an ordered
/// list of field declarations.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Schema {
    /// Schema name, unique within a repository
    pub name: String,
    /// Optional description
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Ordered field declarations
    pub fields: Vec<SchemaField>,
}

impl Schema {
    /// Creates a new schema definition.
    pub fn new(name: impl Into<String>, fields: Vec<SchemaField>) -> Self {
        Self {
            name: name.into(),
            description: None,
            fields,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_tag_round_trip() {
        let tags = [
            "integer", "float", "string", "text", "boolean", "date", "time", "datetime", "base64",
            "json", "blob", "integer[]", "float[]", "string[]",
        ];
        for tag in tags {
            let ty = FieldType::from_tag(tag);
            assert!(!matches!(ty, FieldType::Unsupported { .. }), "{tag}");
            assert_eq!(ty.tag(), tag);
        }
    }

    #[test]
    fn test_unknown_tag_is_carried_not_rejected() {
        let ty = FieldType::from_tag("geoloc");
        assert_eq!(
            ty,
            FieldType::Unsupported {
                tag: "geoloc".to_string()
            }
        );
        assert_eq!(ty.tag(), "geoloc");

        // Same through serde
        let ty: FieldType = serde_json::from_value(json!("geoloc")).unwrap();
        assert!(matches!(ty, FieldType::Unsupported { .. }));
    }

    #[test]
    fn test_field_type_serde_as_tag() {
        let ty = FieldType::Array(ElementType::Integer);
        assert_eq!(serde_json::to_value(&ty).unwrap(), json!("integer[]"));

        let ty: FieldType = serde_json::from_value(json!("datetime")).unwrap();
        assert_eq!(ty, FieldType::DateTime);
    }

    #[test]
    fn test_schema_field_wire_shape() {
        let field: SchemaField = serde_json::from_value(json!({
            "name": "title",
            "type": "string",
            "indexed": true
        }))
        .unwrap();
        assert_eq!(field.name, "title");
        assert_eq!(field.field_type, FieldType::String);
        assert!(field.indexed);
        assert!(field.default.is_none());
    }

    #[test]
    fn test_schema_field_default_value() {
        let field: SchemaField = serde_json::from_value(json!({
            "name": "status",
            "type": "string",
            "default": "draft"
        }))
        .unwrap();
        assert!(!field.indexed);
        assert_eq!(field.default, Some(json!("draft")));

        // Absent default is not serialized back
        let out = serde_json::to_value(SchemaField::new("n", FieldType::Integer)).unwrap();
        assert_eq!(out, json!({ "name": "n", "type": "integer", "indexed": false }));
    }

    #[test]
    fn test_schema_preserves_field_order() {
        let schema: Schema = serde_json::from_value(json!({
            "name": "article",
            "fields": [
                { "name": "title", "type": "string" },
                { "name": "body", "type": "text" },
                { "name": "published", "type": "date" }
            ]
        }))
        .unwrap();
        let names: Vec<&str> = schema.fields.iter().map(|f| f.name.as_str()).collect();
        assert_eq!(names, ["title", "body", "published"]);
    }

    #[test]
    fn test_type_names() {
        assert_eq!(FieldType::Integer.type_name(), "integer");
        assert_eq!(FieldType::Text.type_name(), "string");
        assert_eq!(FieldType::Date.type_name(), "timestamp");
        assert_eq!(
            FieldType::Array(ElementType::String).type_name(),
            "string array"
        );
    }
}
