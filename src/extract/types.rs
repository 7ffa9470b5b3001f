/// A value as written in a source block
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Literal {
    /// Text between the quotes, exactly as written
    Str(String),
    /// Unsigned number token text (`42`, `12.5`), kept verbatim
    Number(String),
    Bool(bool),
    Null,
    /// Anything else (arrays, identifiers, ...), trimmed
    Raw(String),
}

impl Literal {
    /// Short description used in error messages
    pub fn kind_name(&self) -> &'static str {
        match self {
            Literal::Str(_) => "string",
            Literal::Number(n) if n.contains('.') => "decimal",
            Literal::Number(_) => "integer",
            Literal::Bool(_) => "boolean",
            Literal::Null => "null",
            Literal::Raw(_) => "raw value",
        }
    }
}

/// One brace-delimited region of the source document
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Block<'a> {
    /// 1-based position among all blocks
    pub index: usize,
    /// Text between the braces
    pub body: &'a str,
    /// Byte offset of `body` in the source
    pub offset: usize,
}

/// Key/value pairs of one block in source order
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ParsedBlock {
    pub entries: Vec<(String, Literal)>,
}

impl ParsedBlock {
    /// First value written for `key`
    pub fn get(&self, key: &str) -> Option<&Literal> {
        self.entries.iter().find(|(k, _)| k == key).map(|(_, v)| v)
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|(k, _)| k.as_str())
    }
}

/// A block checked against a schema: one value per schema field, in order
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Record {
    pub values: Vec<Literal>,
}

/// Configuration for an extraction run
#[derive(Debug, Clone)]
pub struct ExtractConfig {
    /// Treat a document without blocks as an error instead of an empty result
    pub require_records: bool,

    /// Text placed between statements
    pub separator: String,

    /// End the output with the separator
    pub trailing_newline: bool,
}

impl Default for ExtractConfig {
    fn default() -> Self {
        ExtractConfig {
            require_records: false,
            separator: String::from("\n"),
            trailing_newline: false,
        }
    }
}
