//! # seedsql - seed files to SQL
//!
//! Converts text files holding brace-delimited object literals (the shape of
//! a JavaScript data array) into SQL INSERT statements for seeding a
//! database.
//!
//! ## Modules
//!
//! - **extract**: scan blocks, parse fields, render and write INSERTs
//! - **schema**: table descriptors, the registry that selects them, and
//!   descriptor inference from sample input
//!
//! ## Quick Start
//!
//! ```rust
//! use seedsql::{ExtractConfig, RecordExtractor, SchemaId};
//!
//! # fn main() -> seedsql::Result<()> {
//! let schema = SchemaId::WasteCollectionEntry.descriptor();
//! let extractor = RecordExtractor::new(&schema, ExtractConfig::default());
//!
//! let statements = extractor.extract_statements(
//!     "{id: 'r1', date: '2024-01-01', society: 'Oak', location: 'Block A', \
//!       driveType: 'door-to-door', houses: 42, weight: 12.5, vehicle: 'truck-1', remarks: 'ok'}",
//! )?;
//! assert_eq!(statements.len(), 1);
//! # Ok(())
//! # }
//! ```

use std::path::Path;

pub mod error;
pub mod extract;
pub mod schema;

// Re-export commonly used types for convenience
pub use error::{ExtractError, ParseError, Result};
pub use extract::{ExtractConfig, Literal, Record, RecordExtractor};
pub use schema::{infer_descriptor, FieldKind, FieldSpec, SchemaDescriptor, SchemaId, SchemaRegistry};

/// Read a whole source document as UTF-8 text
pub fn read_source<P: AsRef<Path>>(path: P) -> Result<String> {
    let path = path.as_ref();
    let bytes = std::fs::read(path).map_err(|e| ExtractError::io(path, e))?;
    String::from_utf8(bytes).map_err(|e| ParseError::Decode(e.to_string()).into())
}

/// Main entry point: statements for every block in `path`, using a built-in schema
pub fn extract<P: AsRef<Path>>(path: P, table: &str) -> Result<Vec<String>> {
    let registry = SchemaRegistry::builtin();
    extract_with(path, registry.resolve(table)?, ExtractConfig::default())
}

/// Statements for every block in `path` against an explicit schema
pub fn extract_with<P: AsRef<Path>>(
    path: P,
    schema: &SchemaDescriptor,
    config: ExtractConfig,
) -> Result<Vec<String>> {
    let path = path.as_ref();
    tracing::debug!(path = %path.display(), table = %schema.table, "reading source");
    let source = read_source(path)?;
    RecordExtractor::new(schema, config).extract_statements(&source)
}

/// Extract `input` and replace `output` with the result
///
/// Nothing is written unless every block converts. Returns the number of
/// statements written.
pub fn extract_to_file<P: AsRef<Path>, Q: AsRef<Path>>(
    input: P,
    output: Q,
    schema: &SchemaDescriptor,
    config: ExtractConfig,
) -> Result<usize> {
    let statements = extract_with(input, schema, config.clone())?;
    extract::write_sql_file(output, &statements, &config)?;
    Ok(statements.len())
}
