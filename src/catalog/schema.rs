// Schema Module
//
// This module defines the Schema type: the table -> attribute mapping every
// existence check and attribute-set computation is made against.

use std::collections::{BTreeSet, HashSet};
use std::fs;
use std::path::Path;

use linked_hash_map::LinkedHashMap;
use serde::Deserialize;
use thiserror::Error;

/// Errors raised while loading a schema description
#[derive(Error, Debug)]
pub enum SchemaError {
    #[error("Failed to read schema file: {0}")]
    Io(#[from] std::io::Error),
    #[error("Schema file is not valid JSON: {0}")]
    Json(#[from] serde_json::Error),
    #[error("Invalid table definition: {0}")]
    InvalidTable(String),
}

/// Schema loading result
pub type SchemaResult<T> = Result<T, SchemaError>;

/// On-disk layout: `{"table": ["attr", ...], ...}` in file order
#[derive(Deserialize)]
#[serde(transparent)]
struct SchemaFile {
    tables: LinkedHashMap<String, Vec<String>>,
}

/// Maps lowercase table names to their lowercase attribute names.
///
/// Tables keep the order in which they were added so listings and
/// diagnostics are stable from run to run.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Schema {
    tables: LinkedHashMap<String, Vec<String>>,
}

impl Schema {
    /// Create an empty schema
    pub fn new() -> Self {
        Schema {
            tables: LinkedHashMap::new(),
        }
    }

    /// Build a schema from `(table, attributes)` pairs
    pub fn from_tables<I, T, A, S>(tables: I) -> Self
    where
        I: IntoIterator<Item = (T, A)>,
        T: AsRef<str>,
        A: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut schema = Schema::new();
        for (name, attributes) in tables {
            schema.add_table(name, attributes);
        }
        schema
    }

    /// Parse a JSON object of the form `{"table": ["attr", ...], ...}`.
    /// Names are case-normalized on the way in.
    pub fn from_json_str(json: &str) -> SchemaResult<Self> {
        let file: SchemaFile = serde_json::from_str(json)?;
        let mut schema = Schema::new();
        for (name, attributes) in file.tables {
            if name.trim().is_empty() {
                return Err(SchemaError::InvalidTable("empty table name".to_string()));
            }
            schema.add_table(name, attributes);
        }
        Ok(schema)
    }

    /// Load a schema description from a JSON file on disk
    pub fn from_json_file<P: AsRef<Path>>(path: P) -> SchemaResult<Self> {
        let contents = fs::read_to_string(path)?;
        Self::from_json_str(&contents)
    }

    /// Add (or replace) a table. Table and attribute names are lowercased and
    /// duplicate attributes are dropped.
    pub fn add_table<T, A, S>(&mut self, name: T, attributes: A)
    where
        T: AsRef<str>,
        A: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut seen = HashSet::new();
        let attributes: Vec<String> = attributes
            .into_iter()
            .map(|attr| attr.as_ref().trim().to_lowercase())
            .filter(|attr| seen.insert(attr.clone()))
            .collect();
        self.tables
            .insert(name.as_ref().trim().to_lowercase(), attributes);
    }

    /// Check whether a table exists
    pub fn has_table(&self, table: &str) -> bool {
        self.tables.contains_key(table)
    }

    /// Attributes of a table, in declaration order
    pub fn attributes(&self, table: &str) -> Option<&[String]> {
        self.tables.get(table).map(|attrs| attrs.as_slice())
    }

    /// Names of every table, in insertion order
    pub fn table_names(&self) -> impl Iterator<Item = &str> {
        self.tables.keys().map(|name| name.as_str())
    }

    /// Union of the attributes of the given tables. Unknown tables
    /// contribute nothing.
    pub fn attribute_set<'a, I>(&self, tables: I) -> BTreeSet<String>
    where
        I: IntoIterator<Item = &'a str>,
    {
        tables
            .into_iter()
            .filter_map(|table| self.tables.get(table))
            .flat_map(|attrs| attrs.iter().cloned())
            .collect()
    }

    pub fn len(&self) -> usize {
        self.tables.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tables.is_empty()
    }
}
