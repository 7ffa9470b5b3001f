//! Descriptor inference from sample documents
//!
//! Accumulates per-field statistics over every block and builds the
//! descriptor once at the end. Fields appear in first-seen order.

use crate::error::{ExtractError, Result};
use crate::extract::{parse_block, scan_blocks, Literal, ParsedBlock};
use crate::schema::descriptor::{FieldKind, FieldSpec, SchemaDescriptor};
use std::collections::HashSet;

#[derive(Debug)]
struct FieldStats {
    name: String,
    kind: Option<FieldKind>,
    /// Blocks where the field had a non-null value
    present: usize,
    raw: bool,
}

impl FieldStats {
    fn new(name: &str) -> Self {
        FieldStats {
            name: name.to_string(),
            kind: None,
            present: 0,
            raw: false,
        }
    }
}

/// Streaming accumulator for [`infer_descriptor`]
#[derive(Debug, Default)]
pub struct DescriptorBuilder {
    fields: Vec<FieldStats>,
    block_count: usize,
}

impl DescriptorBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Fold one parsed block into the statistics
    pub fn add_block(&mut self, index: usize, block: &ParsedBlock) -> Result<()> {
        self.block_count += 1;

        let mut seen = HashSet::new();
        for (key, value) in &block.entries {
            if !seen.insert(key.as_str()) {
                // extraction only ever sees the first one
                continue;
            }

            let pos = match self.fields.iter().position(|f| f.name == *key) {
                Some(pos) => pos,
                None => {
                    self.fields.push(FieldStats::new(key));
                    self.fields.len() - 1
                }
            };
            let stats = &mut self.fields[pos];

            let kind = match value {
                Literal::Null => continue,
                Literal::Raw(_) => {
                    stats.raw = true;
                    continue;
                }
                Literal::Str(_) => FieldKind::Text,
                Literal::Number(n) if n.contains('.') => FieldKind::Decimal,
                Literal::Number(_) => FieldKind::Integer,
                Literal::Bool(_) => FieldKind::Boolean,
            };

            stats.present += 1;
            stats.kind = match (stats.kind, kind) {
                (None, k) => Some(k),
                (Some(a), b) if a == b => Some(a),
                (Some(FieldKind::Integer), FieldKind::Decimal)
                | (Some(FieldKind::Decimal), FieldKind::Integer) => Some(FieldKind::Decimal),
                (Some(a), _) => {
                    return Err(ExtractError::InvalidField {
                        block: index,
                        field: key.clone(),
                        expected: a.as_str(),
                        found: value.kind_name(),
                    });
                }
            };
        }

        Ok(())
    }

    pub fn block_count(&self) -> usize {
        self.block_count
    }

    pub fn build(self, table: &str) -> Result<SchemaDescriptor> {
        let block_count = self.block_count;
        let fields = self
            .fields
            .into_iter()
            .filter_map(|stats| {
                if stats.raw {
                    tracing::debug!(field = %stats.name, "field has untyped values, left out");
                    return None;
                }
                let kind = stats.kind.unwrap_or(FieldKind::Text);
                Some(FieldSpec {
                    required: stats.present == block_count,
                    name: stats.name,
                    kind,
                })
            })
            .collect();

        let schema = SchemaDescriptor::new(table, fields);
        schema.validate()?;
        Ok(schema)
    }
}

/// Infer a descriptor for `table` from the blocks in `source`
pub fn infer_descriptor(table: &str, source: &str) -> Result<SchemaDescriptor> {
    let mut builder = DescriptorBuilder::new();

    for block in scan_blocks(source)? {
        let parsed = parse_block(source, &block)?;
        builder.add_block(block.index, &parsed)?;
    }

    tracing::info!(table = %table, blocks = builder.block_count(), "inferred schema");
    builder.build(table)
}
