//! Record extraction - brace-delimited object literals to SQL INSERTs
//!
//! A document is scanned for `{ ... }` blocks, each block is parsed once
//! into key/value pairs, checked against a schema and rendered as one
//! INSERT statement. Any failing block fails the whole document.

pub mod types;
pub mod scanner;
pub mod parser;
pub mod extractor;
pub mod sql;
pub mod writer;

pub use types::{Block, ExtractConfig, Literal, ParsedBlock, Record};
pub use scanner::scan_blocks;
pub use parser::parse_block;
pub use extractor::RecordExtractor;
pub use sql::{quote_literal, render_insert};
pub use writer::{write_sql_file, SqlWriter};
