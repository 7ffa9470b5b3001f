//! SQL rendering for extracted records

use crate::extract::types::{Literal, Record};
use crate::schema::SchemaDescriptor;

/// Single-quote `text` for SQL, doubling any `'` inside
pub fn quote_literal(text: &str) -> String {
    format!("'{}'", text.replace('\'', "''"))
}

fn render_value(value: &Literal) -> String {
    match value {
        Literal::Str(s) => quote_literal(s),
        Literal::Number(n) => n.clone(),
        Literal::Bool(b) => b.to_string(),
        Literal::Null => "NULL".to_string(),
        // Schema checks never let raw values through; quote rather than inject
        Literal::Raw(r) => quote_literal(r),
    }
}

/// `INSERT INTO <table> (<columns>) VALUES (<values>);`
pub fn render_insert(schema: &SchemaDescriptor, record: &Record) -> String {
    let columns = schema.columns().collect::<Vec<_>>().join(", ");
    let values = record
        .values
        .iter()
        .map(render_value)
        .collect::<Vec<_>>()
        .join(", ");

    format!("INSERT INTO {} ({}) VALUES ({});", schema.table, columns, values)
}
