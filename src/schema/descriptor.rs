//! Schema descriptors: the ordered column list an INSERT is built from
//!
//! A descriptor replaces per-table extraction code. Each field names a
//! column, the kind of literal it accepts, and whether a block may omit it.

use crate::error::{ExtractError, Result};
use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

static IDENTIFIER_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^[A-Za-z_][A-Za-z0-9_]*$").unwrap()
});

/// The literal kind a field accepts
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FieldKind {
    /// Quoted string, emitted single-quoted with `'` doubled
    Text,
    /// Bare digits
    Integer,
    /// Digits with an optional fraction
    Decimal,
    /// `true` or `false`
    Boolean,
}

impl FieldKind {
    pub fn as_str(self) -> &'static str {
        match self {
            FieldKind::Text => "text",
            FieldKind::Integer => "integer",
            FieldKind::Decimal => "decimal",
            FieldKind::Boolean => "boolean",
        }
    }
}

impl std::fmt::Display for FieldKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

fn default_required() -> bool {
    true
}

/// One column of a schema
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldSpec {
    pub name: String,
    pub kind: FieldKind,
    #[serde(default = "default_required")]
    pub required: bool,
}

impl FieldSpec {
    pub fn required(name: impl Into<String>, kind: FieldKind) -> Self {
        FieldSpec {
            name: name.into(),
            kind,
            required: true,
        }
    }

    pub fn optional(name: impl Into<String>, kind: FieldKind) -> Self {
        FieldSpec {
            name: name.into(),
            kind,
            required: false,
        }
    }
}

/// A target table and its ordered fields
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SchemaDescriptor {
    pub table: String,
    pub fields: Vec<FieldSpec>,
}

impl SchemaDescriptor {
    pub fn new(table: impl Into<String>, fields: Vec<FieldSpec>) -> Self {
        SchemaDescriptor {
            table: table.into(),
            fields,
        }
    }

    /// Column names in insertion order
    pub fn columns(&self) -> impl Iterator<Item = &str> {
        self.fields.iter().map(|f| f.name.as_str())
    }

    pub fn field(&self, name: &str) -> Option<&FieldSpec> {
        self.fields.iter().find(|f| f.name == name)
    }

    /// Reject descriptors that would produce broken SQL
    ///
    /// Table and column names are interpolated unquoted, so they must be
    /// plain identifiers.
    pub fn validate(&self) -> Result<()> {
        if !is_identifier(&self.table) {
            return Err(ExtractError::Configuration(format!(
                "table name '{}' is not a valid SQL identifier",
                self.table
            )));
        }

        if self.fields.is_empty() {
            return Err(ExtractError::Configuration(format!(
                "schema '{}' has no fields",
                self.table
            )));
        }

        let mut seen = HashSet::new();
        for field in &self.fields {
            if !is_identifier(&field.name) {
                return Err(ExtractError::Configuration(format!(
                    "schema '{}': column '{}' is not a valid SQL identifier",
                    self.table, field.name
                )));
            }
            if !seen.insert(field.name.as_str()) {
                return Err(ExtractError::Configuration(format!(
                    "schema '{}': duplicate column '{}'",
                    self.table, field.name
                )));
            }
        }

        Ok(())
    }
}

pub(crate) fn is_identifier(s: &str) -> bool {
    IDENTIFIER_REGEX.is_match(s)
}
