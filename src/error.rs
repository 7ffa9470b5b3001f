use std::path::PathBuf;
use thiserror::Error;

/// Line/column of a character in the source document (both 1-based)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Position {
    pub line: usize,
    pub column: usize,
}

impl Position {
    /// Locate a byte offset inside `source`
    pub fn locate(source: &str, offset: usize) -> Self {
        let offset = offset.min(source.len());
        let before = &source[..offset];
        let line = before.matches('\n').count() + 1;
        let column = match before.rfind('\n') {
            Some(nl) => before[nl + 1..].chars().count() + 1,
            None => before.chars().count() + 1,
        };
        Position { line, column }
    }
}

impl std::fmt::Display for Position {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "line {}, column {}", self.line, self.column)
    }
}

/// Structural problems in the source document
#[derive(Debug, Error, PartialEq)]
pub enum ParseError {
    #[error("input is not valid UTF-8 text: {0}")]
    Decode(String),

    #[error("no brace-delimited blocks found")]
    NoBlocks,

    #[error("unclosed '{{' opened at {0}")]
    Unclosed(Position),

    #[error("unmatched '}}' at {0}")]
    Unmatched(Position),

    #[error("nested '{{' at {0}; blocks cannot contain braces")]
    Nested(Position),

    #[error("empty block at {0}")]
    EmptyBlock(Position),

    #[error("block {block} at {at}: {message}")]
    Syntax {
        block: usize,
        at: Position,
        message: String,
    },
}

/// Everything that can stop an extraction run
#[derive(Debug, Error)]
pub enum ExtractError {
    #[error("parse error: {0}")]
    Parse(#[from] ParseError),

    #[error("block {block}: missing required field '{field}'")]
    MissingField { block: usize, field: String },

    #[error("block {block}: field '{field}' expected {expected}, found {found}")]
    InvalidField {
        block: usize,
        field: String,
        expected: &'static str,
        found: &'static str,
    },

    #[error("configuration error: {0}")]
    Configuration(String),

    #[error("I/O error on {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl ExtractError {
    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        ExtractError::Io {
            path: path.into(),
            source,
        }
    }
}

pub type Result<T> = std::result::Result<T, ExtractError>;
