use crate::error::{ExtractError, Result};
use crate::schema::descriptor::{FieldKind, FieldSpec, SchemaDescriptor};
use serde::Deserialize;
use std::path::Path;
use std::str::FromStr;

/// The built-in seed schemas
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SchemaId {
    WasteCollectionEntry,
    WasteManagementProjects,
}

impl SchemaId {
    pub const ALL: [SchemaId; 2] = [SchemaId::WasteCollectionEntry, SchemaId::WasteManagementProjects];

    pub fn table(self) -> &'static str {
        match self {
            SchemaId::WasteCollectionEntry => "waste_collection_entry",
            SchemaId::WasteManagementProjects => "waste_management_projects",
        }
    }

    pub fn descriptor(self) -> SchemaDescriptor {
        use FieldKind::*;

        let fields = match self {
            SchemaId::WasteCollectionEntry => vec![
                FieldSpec::required("id", Text),
                FieldSpec::required("date", Text),
                FieldSpec::required("society", Text),
                FieldSpec::required("location", Text),
                FieldSpec::required("driveType", Text),
                FieldSpec::required("houses", Integer),
                FieldSpec::required("weight", Decimal),
                FieldSpec::required("vehicle", Text),
                FieldSpec::required("remarks", Text),
            ],
            SchemaId::WasteManagementProjects => vec![
                FieldSpec::required("id", Text),
                FieldSpec::required("title", Text),
                FieldSpec::required("description", Text),
                FieldSpec::required("date", Text),
                FieldSpec::required("location", Text),
                FieldSpec::required("status", Text),
                FieldSpec::required("wasteType", Text),
                FieldSpec::required("houses", Integer),
                FieldSpec::required("weight", Decimal),
                FieldSpec::required("image", Text),
                FieldSpec::required("featured", Boolean),
            ],
        };

        SchemaDescriptor::new(self.table(), fields)
    }
}

impl FromStr for SchemaId {
    type Err = ExtractError;

    fn from_str(s: &str) -> Result<Self> {
        SchemaId::ALL
            .into_iter()
            .find(|id| id.table() == s)
            .ok_or_else(|| ExtractError::Configuration(format!("unknown schema '{}'", s)))
    }
}

/// Schema files hold either one descriptor or a list of them
#[derive(Deserialize)]
#[serde(untagged)]
enum SchemaFile {
    One(SchemaDescriptor),
    Many(Vec<SchemaDescriptor>),
}

/// Lookup table from table name to descriptor
#[derive(Debug, Clone)]
pub struct SchemaRegistry {
    schemas: Vec<SchemaDescriptor>,
}

impl SchemaRegistry {
    /// Registry holding only the built-in schemas
    pub fn builtin() -> Self {
        SchemaRegistry {
            schemas: SchemaId::ALL.into_iter().map(SchemaId::descriptor).collect(),
        }
    }

    /// Add a descriptor, replacing any schema for the same table
    pub fn register(&mut self, schema: SchemaDescriptor) -> Result<()> {
        schema.validate()?;

        match self.schemas.iter_mut().find(|s| s.table == schema.table) {
            Some(existing) => {
                tracing::debug!(table = %schema.table, "replacing schema");
                *existing = schema;
            }
            None => {
                tracing::debug!(table = %schema.table, "registering schema");
                self.schemas.push(schema);
            }
        }
        Ok(())
    }

    /// Merge descriptors from a JSON string; nothing is merged if any is invalid
    pub fn load_str(&mut self, json: &str) -> Result<()> {
        let file: SchemaFile = serde_json::from_str(json)
            .map_err(|e| ExtractError::Configuration(format!("invalid schema file: {}", e)))?;

        let schemas = match file {
            SchemaFile::One(schema) => vec![schema],
            SchemaFile::Many(schemas) => schemas,
        };

        // all or nothing: a bad entry leaves the registry as it was
        for schema in &schemas {
            schema.validate()?;
        }
        for schema in schemas {
            self.register(schema)?;
        }
        Ok(())
    }

    /// Merge descriptors from a JSON file on top of what is registered
    pub fn load_file<P: AsRef<Path>>(&mut self, path: P) -> Result<()> {
        let path = path.as_ref();
        let json = std::fs::read_to_string(path).map_err(|e| ExtractError::io(path, e))?;
        self.load_str(&json)
    }

    pub fn resolve(&self, table: &str) -> Result<&SchemaDescriptor> {
        self.schemas
            .iter()
            .find(|s| s.table == table)
            .ok_or_else(|| {
                ExtractError::Configuration(format!(
                    "unknown schema '{}' (known: {})",
                    table,
                    self.tables().collect::<Vec<_>>().join(", ")
                ))
            })
    }

    pub fn tables(&self) -> impl Iterator<Item = &str> {
        self.schemas.iter().map(|s| s.table.as_str())
    }

    pub fn schemas(&self) -> &[SchemaDescriptor] {
        &self.schemas
    }
}

impl Default for SchemaRegistry {
    fn default() -> Self {
        Self::builtin()
    }
}
