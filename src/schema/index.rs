//! Name lookup index over a schema's ordered field list.

use std::collections::HashMap;

use super::errors::{SchemaError, SchemaResult};
use super::types::{Schema, SchemaField};

/// Read-only field-name lookup built once from a schema's ordered field
/// list.
///
/// Construction either completes fully or fails; a partial index is never
/// observable. Once built the index is immutable, so one instance can serve
/// any number of concurrent validate/convert calls without locking.
#[derive(Debug, Clone)]
pub struct SchemaIndex {
    fields: HashMap<String, SchemaField>,
}

impl SchemaIndex {
    /// Builds an index from an ordered field list.
    ///
    /// # Errors
    ///
    /// Returns [`SchemaError::DuplicateField`] if the same name is declared
    /// twice. The remote service would resolve the duplicate silently; here
    /// an ambiguous schema is rejected outright.
    pub fn build(fields: &[SchemaField]) -> SchemaResult<Self> {
        let mut map = HashMap::with_capacity(fields.len());
        for field in fields {
            if map.insert(field.name.clone(), field.clone()).is_some() {
                return Err(SchemaError::DuplicateField {
                    name: field.name.clone(),
                });
            }
        }
        tracing::debug!(fields = map.len(), "schema index built");
        Ok(Self { fields: map })
    }

    /// Builds an index from a schema definition.
    pub fn from_schema(schema: &Schema) -> SchemaResult<Self> {
        Self::build(&schema.fields)
    }

    /// Looks up a field declaration by name.
    pub fn get(&self, name: &str) -> Option<&SchemaField> {
        self.fields.get(name)
    }

    /// Returns whether the schema declares the given name.
    pub fn contains(&self, name: &str) -> bool {
        self.fields.contains_key(name)
    }

    /// Returns the number of declared fields.
    pub fn len(&self) -> usize {
        self.fields.len()
    }

    /// Returns whether the schema declares no fields.
    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// Iterates over the declared fields in no particular order.
    pub fn iter(&self) -> impl Iterator<Item = &SchemaField> {
        self.fields.values()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::FieldType;

    #[test]
    fn test_build_and_lookup() {
        let index = SchemaIndex::build(&[
            SchemaField::new("title", FieldType::String),
            SchemaField::indexed("views", FieldType::Integer),
        ])
        .unwrap();

        assert_eq!(index.len(), 2);
        assert_eq!(index.get("title").unwrap().field_type, FieldType::String);
        assert!(index.get("views").unwrap().indexed);
        assert!(index.get("missing").is_none());
    }

    #[test]
    fn test_duplicate_name_rejected() {
        let result = SchemaIndex::build(&[
            SchemaField::new("title", FieldType::String),
            SchemaField::new("title", FieldType::Text),
        ]);
        assert_eq!(
            result.unwrap_err(),
            SchemaError::DuplicateField {
                name: "title".to_string()
            }
        );
    }

    #[test]
    fn test_empty_schema() {
        let index = SchemaIndex::build(&[]).unwrap();
        assert!(index.is_empty());
        assert!(!index.contains("anything"));
    }

    #[test]
    fn test_from_schema_definition() {
        let schema: Schema = serde_json::from_str(
            r#"{
                "name": "note",
                "fields": [
                    { "name": "body", "type": "text" },
                    { "name": "created", "type": "datetime" }
                ]
            }"#,
        )
        .unwrap();

        let index = SchemaIndex::from_schema(&schema).unwrap();
        assert!(index.get("created").unwrap().field_type.is_temporal());
    }
}
