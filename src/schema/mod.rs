//! Schema subsystem: the field type universe, field declarations, and the
//! name lookup index the content engines validate and convert against.
//!
//! # Design principles
//!
//! - The field type set is closed; an unrecognized wire tag is carried,
//!   reported, and never a deserialization failure
//! - A schema is an ordered field list; the index built from it is
//!   immutable and shared freely across threads
//! - Duplicate field names are rejected when the index is built

mod errors;
mod index;
mod types;

pub use errors::{ConversionError, SchemaError, SchemaResult, ValidationError};
pub use index::SchemaIndex;
pub use types::{ElementType, FieldType, Schema, SchemaField};
