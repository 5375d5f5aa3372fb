//! Content subsystem: dynamic content values and the two engines that
//! operate on them.
//!
//! A content record is an untyped name/value mapping owned by a document or
//! user entity. The engines are pure functions over a record and a
//! [`SchemaIndex`](crate::schema::SchemaIndex):
//!
//! - [`ContentValidator`] checks a record before it is written; strict,
//!   unknown keys are errors
//! - [`ContentConverter`] types a record after it is read; tolerant,
//!   unknown keys pass through
//!
//! The asymmetry is deliberate and must stay: writes are authored by this
//! client and should fail loudly, reads come from a store whose schemas may
//! be newer than this client.

mod converter;
mod validator;
mod value;

pub use converter::ContentConverter;
pub use validator::{ContentValidator, STRING_LENGTH_LIMIT};
pub use value::{record_from_json, ContentRecord, ContentValue};
