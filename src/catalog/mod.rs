//! Catalog Module
//!
//! This module holds the schema metadata (tables and their attributes) that
//! query validation and optimization are checked against.

pub mod schema;

// Re-export key types
pub use self::schema::{Schema, SchemaError, SchemaResult};
