use crate::error::{ExtractError, ParseError, Result};
use crate::extract::parser::parse_block;
use crate::extract::scanner::scan_blocks;
use crate::extract::sql::render_insert;
use crate::extract::types::{ExtractConfig, Literal, ParsedBlock, Record};
use crate::schema::{FieldKind, SchemaDescriptor};

/// Turns a source document into INSERT statements for one schema
pub struct RecordExtractor<'a> {
    schema: &'a SchemaDescriptor,
    config: ExtractConfig,
}

impl<'a> RecordExtractor<'a> {
    pub fn new(schema: &'a SchemaDescriptor, config: ExtractConfig) -> Self {
        RecordExtractor { schema, config }
    }

    pub fn schema(&self) -> &SchemaDescriptor {
        self.schema
    }

    pub fn config(&self) -> &ExtractConfig {
        &self.config
    }

    /// Extract one record per block; any bad block fails the whole document
    pub fn extract_records(&self, source: &str) -> Result<Vec<Record>> {
        let blocks = scan_blocks(source)?;

        if blocks.is_empty() {
            if self.config.require_records {
                return Err(ParseError::NoBlocks.into());
            }
            tracing::warn!(table = %self.schema.table, "no blocks found in input");
        }

        let mut records = Vec::with_capacity(blocks.len());
        for block in &blocks {
            let parsed = parse_block(source, block)?;
            let record = self.check_block(block.index, &parsed)?;
            tracing::debug!(block = block.index, fields = parsed.entries.len(), "extracted record");
            records.push(record);
        }

        Ok(records)
    }

    /// Extract and render, one statement per block in document order
    pub fn extract_statements(&self, source: &str) -> Result<Vec<String>> {
        let statements = self
            .extract_records(source)?
            .iter()
            .map(|record| render_insert(self.schema, record))
            .collect::<Vec<_>>();

        tracing::info!(
            table = %self.schema.table,
            statements = statements.len(),
            "extraction complete"
        );
        Ok(statements)
    }

    /// Match a parsed block against the schema's fields
    fn check_block(&self, index: usize, parsed: &ParsedBlock) -> Result<Record> {
        let mut values = Vec::with_capacity(self.schema.fields.len());

        for field in &self.schema.fields {
            let value = match parsed.get(&field.name) {
                None | Some(Literal::Null) if !field.required => Literal::Null,
                None => {
                    return Err(ExtractError::MissingField {
                        block: index,
                        field: field.name.clone(),
                    });
                }
                Some(value) if accepts(field.kind, value) => value.clone(),
                Some(value) => {
                    return Err(ExtractError::InvalidField {
                        block: index,
                        field: field.name.clone(),
                        expected: field.kind.as_str(),
                        found: value.kind_name(),
                    });
                }
            };
            values.push(value);
        }

        for key in parsed.keys() {
            if self.schema.field(key).is_none() {
                tracing::debug!(block = index, field = %key, "field not in schema, skipped");
            }
        }

        Ok(Record { values })
    }
}

fn accepts(kind: FieldKind, value: &Literal) -> bool {
    match (kind, value) {
        (FieldKind::Text, Literal::Str(_)) => true,
        (FieldKind::Integer, Literal::Number(n)) => !n.contains('.'),
        (FieldKind::Decimal, Literal::Number(_)) => true,
        (FieldKind::Boolean, Literal::Bool(_)) => true,
        _ => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::{FieldSpec, SchemaId};

    const SCENARIO: &str = "{id: 'r1', date: '2024-01-01', society: 'Oak', location: 'Block A', \
        driveType: 'door-to-door', houses: 42, weight: 12.5, vehicle: 'truck-1', remarks: 'it''s fine'}";

    #[test]
    fn test_collection_entry_scenario() {
        let schema = SchemaId::WasteCollectionEntry.descriptor();
        let extractor = RecordExtractor::new(&schema, ExtractConfig::default());
        let statements = extractor.extract_statements(SCENARIO).unwrap();

        assert_eq!(
            statements,
            vec![
                "INSERT INTO waste_collection_entry (id, date, society, location, driveType, houses, weight, vehicle, remarks) \
                 VALUES ('r1', '2024-01-01', 'Oak', 'Block A', 'door-to-door', 42, 12.5, 'truck-1', 'it''''s fine');"
                    .to_string()
            ]
        );
    }

    #[test]
    fn test_project_schema() {
        let schema = SchemaId::WasteManagementProjects.descriptor();
        let extractor = RecordExtractor::new(&schema, ExtractConfig::default());
        let source = r#"[
            {
                id: 'p1',
                title: 'Zero Waste Week',
                description: 'Residents' drive',
                date: '2024-03-01',
                location: 'Ward 4',
                status: 'completed',
                wasteType: 'plastic',
                houses: 120,
                weight: 340,
                image: '/img/p1.jpg',
                featured: false,
                tags: ['a', 'b'],
            }
        ]"#;

        let statements = extractor.extract_statements(source).unwrap();
        assert_eq!(
            statements[0],
            "INSERT INTO waste_management_projects (id, title, description, date, location, status, wasteType, houses, weight, image, featured) \
             VALUES ('p1', 'Zero Waste Week', 'Residents'' drive', '2024-03-01', 'Ward 4', 'completed', 'plastic', 120, 340, '/img/p1.jpg', false);"
        );
    }

    #[test]
    fn test_block_order_preserved() {
        let schema = SchemaDescriptor::new("bins", vec![FieldSpec::required("id", FieldKind::Integer)]);
        let extractor = RecordExtractor::new(&schema, ExtractConfig::default());

        let statements = extractor
            .extract_statements("{id: 3}\n{id: 1}\n{id: 2}")
            .unwrap();
        assert_eq!(
            statements,
            vec![
                "INSERT INTO bins (id) VALUES (3);",
                "INSERT INTO bins (id) VALUES (1);",
                "INSERT INTO bins (id) VALUES (2);",
            ]
        );
    }

    #[test]
    fn test_missing_houses_fails() {
        let schema = SchemaId::WasteCollectionEntry.descriptor();
        let extractor = RecordExtractor::new(&schema, ExtractConfig::default());
        let source = format!("{}\n{}", SCENARIO, SCENARIO.replace("houses: 42, ", ""));

        let err = extractor.extract_statements(&source).unwrap_err();
        match err {
            ExtractError::MissingField { block, field } => {
                assert_eq!(block, 2);
                assert_eq!(field, "houses");
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_type_mismatches() {
        let schema = SchemaId::WasteCollectionEntry.descriptor();
        let extractor = RecordExtractor::new(&schema, ExtractConfig::default());

        let err = extractor
            .extract_statements(&SCENARIO.replace("houses: 42", "houses: 4.2"))
            .unwrap_err();
        assert!(matches!(
            err,
            ExtractError::InvalidField { expected: "integer", found: "decimal", .. }
        ));

        let err = extractor
            .extract_statements(&SCENARIO.replace("houses: 42", "houses: '42'"))
            .unwrap_err();
        assert!(matches!(err, ExtractError::InvalidField { found: "string", .. }));

        let projects = SchemaId::WasteManagementProjects.descriptor();
        let schema = SchemaDescriptor::new("flags", vec![projects.field("featured").unwrap().clone()]);
        let extractor = RecordExtractor::new(&schema, ExtractConfig::default());
        let err = extractor.extract_statements("{featured: tru}").unwrap_err();
        assert!(matches!(err, ExtractError::InvalidField { found: "raw value", .. }));
    }

    #[test]
    fn test_signed_numbers_rejected() {
        let schema = SchemaId::WasteCollectionEntry.descriptor();
        let extractor = RecordExtractor::new(&schema, ExtractConfig::default());

        let err = extractor
            .extract_statements(&SCENARIO.replace("houses: 42", "houses: -5"))
            .unwrap_err();
        assert!(matches!(
            err,
            ExtractError::InvalidField { expected: "integer", found: "raw value", .. }
        ));

        let err = extractor
            .extract_statements(&SCENARIO.replace("weight: 12.5", "weight: -12.5"))
            .unwrap_err();
        assert!(matches!(err, ExtractError::InvalidField { expected: "decimal", .. }));
    }

    #[test]
    fn test_comment_only_block_fails_as_empty() {
        let schema = SchemaId::WasteCollectionEntry.descriptor();
        let extractor = RecordExtractor::new(&schema, ExtractConfig::default());

        let err = extractor
            .extract_statements(&format!("{}\n{{ // todo\n }}", SCENARIO))
            .unwrap_err();
        assert!(matches!(err, ExtractError::Parse(ParseError::EmptyBlock(_))));
    }

    #[test]
    fn test_optional_fields_become_null() {
        let schema = SchemaDescriptor::new(
            "bins",
            vec![
                FieldSpec::required("id", FieldKind::Text),
                FieldSpec::optional("capacity", FieldKind::Decimal),
                FieldSpec::optional("note", FieldKind::Text),
            ],
        );
        let extractor = RecordExtractor::new(&schema, ExtractConfig::default());

        let statements = extractor
            .extract_statements("{id: 'b1', note: null}")
            .unwrap();
        assert_eq!(
            statements[0],
            "INSERT INTO bins (id, capacity, note) VALUES ('b1', NULL, NULL);"
        );

        let err = extractor.extract_statements("{id: null}").unwrap_err();
        assert!(matches!(err, ExtractError::InvalidField { found: "null", .. }));
    }

    #[test]
    fn test_no_blocks() {
        let schema = SchemaId::WasteCollectionEntry.descriptor();

        let extractor = RecordExtractor::new(&schema, ExtractConfig::default());
        assert!(extractor.extract_statements("// nothing here\n").unwrap().is_empty());

        let config = ExtractConfig {
            require_records: true,
            ..ExtractConfig::default()
        };
        let extractor = RecordExtractor::new(&schema, config);
        assert!(matches!(
            extractor.extract_statements(""),
            Err(ExtractError::Parse(ParseError::NoBlocks))
        ));
    }
}
