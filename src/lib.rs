//! contentstore-client - schema-driven content validation and conversion
//!
//! Client-side core for a remote document/content store. The store accepts
//! and returns untyped content records; this crate checks records against a
//! declared field schema before they are written, and converts the loosely
//! typed values the store returns back into typed values after a read.
//!
//! Transport, authentication, envelope unwrapping, and CRUD orchestration
//! live outside this crate; they hand a record and a schema to the engine
//! and get back accumulated, structured errors.

pub mod content;
pub mod schema;

pub use content::{ContentConverter, ContentRecord, ContentValidator, ContentValue};
pub use schema::{
    ConversionError, ElementType, FieldType, Schema, SchemaError, SchemaField, SchemaIndex,
    ValidationError,
};
