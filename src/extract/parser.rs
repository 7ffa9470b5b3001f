//! Key/value parser for block bodies
//!
//! A block body is a comma-separated list of `key: value` entries, keys
//! being bare identifiers or quoted. A quote only closes a string when the
//! next token is `,` or the end of the block, so doubled quotes inside
//! string values (`'it''s fine'`) are kept as written.

use crate::error::{ParseError, Position};
use crate::extract::types::{Block, Literal, ParsedBlock};
use once_cell::sync::Lazy;
use regex::Regex;

static KEY_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^[A-Za-z_$][A-Za-z0-9_$]*").unwrap()
});

static NUMBER_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^\d+(?:\.\d+)?").unwrap()
});

static KEYWORD_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^(?:true|false|null)\b").unwrap()
});

/// Parse the body of `block`; `source` is the whole document, used for positions
pub fn parse_block(source: &str, block: &Block<'_>) -> Result<ParsedBlock, ParseError> {
    BlockParser {
        source,
        block,
        pos: 0,
    }
    .parse()
}

struct BlockParser<'s, 'b> {
    source: &'s str,
    block: &'b Block<'s>,
    pos: usize,
}

impl<'s, 'b> BlockParser<'s, 'b> {
    fn parse(mut self) -> Result<ParsedBlock, ParseError> {
        let mut parsed = ParsedBlock::default();

        self.pos = skip_trivia(self.body(), 0);
        if self.at_end() {
            return Err(ParseError::EmptyBlock(Position::locate(
                self.source,
                self.block.offset - 1,
            )));
        }

        while !self.at_end() {
            let key = self.parse_key()?;
            self.pos = skip_trivia(self.body(), self.pos);
            if !self.rest().starts_with(':') {
                return Err(self.error(format!("expected ':' after field name '{}'", key)));
            }
            self.pos = skip_trivia(self.body(), self.pos + 1);

            let value = self.parse_value()?;
            if parsed.get(&key).is_some() {
                tracing::debug!(block = self.block.index, field = %key, "duplicate field ignored");
            }
            parsed.entries.push((key, value));

            self.pos = skip_trivia(self.body(), self.pos);
            if self.at_end() {
                break;
            }
            if !self.rest().starts_with(',') {
                return Err(self.error("expected ',' between fields".to_string()));
            }
            self.pos = skip_trivia(self.body(), self.pos + 1);
        }

        Ok(parsed)
    }

    fn parse_key(&mut self) -> Result<String, ParseError> {
        let rest = self.rest();

        if let Some(m) = KEY_REGEX.find(rest) {
            self.pos += m.end();
            return Ok(m.as_str().to_string());
        }

        if let Some(quote) = rest.chars().next().filter(|c| *c == '\'' || *c == '"') {
            let Some(len) = rest[1..].find(quote) else {
                return Err(self.error("unterminated field name".to_string()));
            };
            let key = rest[1..1 + len].to_string();
            self.pos += len + 2;
            return Ok(key);
        }

        Err(self.error("expected field name".to_string()))
    }

    fn parse_value(&mut self) -> Result<Literal, ParseError> {
        let rest = self.rest();

        if let Some(quote) = rest.chars().next().filter(|c| *c == '\'' || *c == '"') {
            return self.parse_string(quote);
        }

        if let Some(m) = NUMBER_REGEX.find(rest) {
            if self.terminates_at(self.pos + m.end()) {
                self.pos += m.end();
                return Ok(Literal::Number(m.as_str().to_string()));
            }
        }

        if let Some(m) = KEYWORD_REGEX.find(rest) {
            if self.terminates_at(self.pos + m.end()) {
                self.pos += m.end();
                return Ok(match m.as_str() {
                    "true" => Literal::Bool(true),
                    "false" => Literal::Bool(false),
                    _ => Literal::Null,
                });
            }
        }

        self.parse_raw()
    }

    /// String value starting at the opening quote
    fn parse_string(&mut self, quote: char) -> Result<Literal, ParseError> {
        let body = self.body();
        let start = self.pos + 1;
        let mut from = start;

        loop {
            let Some(len) = body[from..].find(quote) else {
                return Err(self.error("unterminated string".to_string()));
            };
            let close = from + len;
            if self.terminates_at(close + 1) {
                self.pos = close + 1;
                return Ok(Literal::Str(body[start..close].to_string()));
            }
            from = close + 1;
        }
    }

    /// Unrecognized value: everything up to the next top-level comma
    fn parse_raw(&mut self) -> Result<Literal, ParseError> {
        let body = self.body();
        let mut depth = 0usize;
        let mut quote: Option<char> = None;
        let mut end = body.len();

        for (i, c) in body[self.pos..].char_indices() {
            match (quote, c) {
                (Some(q), c) if c == q => quote = None,
                (Some(_), _) => {}
                (None, '\'' | '"' | '`') => quote = Some(c),
                (None, '[' | '(') => depth += 1,
                (None, ']' | ')') => depth = depth.saturating_sub(1),
                (None, ',') if depth == 0 => {
                    end = self.pos + i;
                    break;
                }
                _ => {}
            }
        }

        let raw = body[self.pos..end].trim_end();
        if raw.is_empty() {
            return Err(self.error("missing value".to_string()));
        }
        self.pos += raw.len();
        Ok(Literal::Raw(raw.to_string()))
    }

    /// True when only trivia separates `at` from a comma or the end of the body
    fn terminates_at(&self, at: usize) -> bool {
        let next = skip_trivia(self.body(), at);
        next >= self.body().len() || self.body()[next..].starts_with(',')
    }

    fn body(&self) -> &'s str {
        self.block.body
    }

    fn rest(&self) -> &'s str {
        &self.block.body[self.pos..]
    }

    fn at_end(&self) -> bool {
        self.pos >= self.body().len()
    }

    fn error(&self, message: String) -> ParseError {
        ParseError::Syntax {
            block: self.block.index,
            at: Position::locate(self.source, self.block.offset + self.pos),
            message,
        }
    }
}

/// Skip whitespace and `//` line comments
fn skip_trivia(text: &str, mut at: usize) -> usize {
    loop {
        let rest = &text[at..];
        let trimmed = rest.trim_start();
        at += rest.len() - trimmed.len();

        if trimmed.starts_with("//") {
            at += trimmed.find('\n').unwrap_or(trimmed.len());
        } else {
            return at;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::extract::scanner::scan_blocks;

    fn parse_one(source: &str) -> Result<ParsedBlock, ParseError> {
        parse_one_at(source, 0)
    }

    fn parse_one_at(source: &str, index: usize) -> Result<ParsedBlock, ParseError> {
        let blocks = scan_blocks(source).unwrap();
        parse_block(source, &blocks[index])
    }

    #[test]
    fn test_typed_values() {
        let parsed = parse_one(
            "{ id: 'r1', houses: 42, weight: 12.5, delta: -3, featured: true, hidden: false, image: null }",
        )
        .unwrap();

        assert_eq!(parsed.get("id"), Some(&Literal::Str("r1".to_string())));
        assert_eq!(parsed.get("houses"), Some(&Literal::Number("42".to_string())));
        assert_eq!(parsed.get("weight"), Some(&Literal::Number("12.5".to_string())));
        assert_eq!(parsed.get("delta"), Some(&Literal::Raw("-3".to_string())));
        assert_eq!(parsed.get("featured"), Some(&Literal::Bool(true)));
        assert_eq!(parsed.get("hidden"), Some(&Literal::Bool(false)));
        assert_eq!(parsed.get("image"), Some(&Literal::Null));
        assert_eq!(parsed.keys().count(), 7);
    }

    #[test]
    fn test_string_keeps_inner_quotes() {
        let parsed = parse_one("{remarks: 'it''s fine', owner: 'Bob's bins' }").unwrap();
        assert_eq!(parsed.get("remarks"), Some(&Literal::Str("it''s fine".to_string())));
        assert_eq!(parsed.get("owner"), Some(&Literal::Str("Bob's bins".to_string())));
    }

    #[test]
    fn test_multiline_block_with_comments_and_trailing_comma() {
        let parsed = parse_one(
            "{\n  id: \"p1\", // primary key\n  'title': 'Clean-up drive',\n  description: 'Line one\nline two',\n}",
        )
        .unwrap();

        assert_eq!(parsed.get("id"), Some(&Literal::Str("p1".to_string())));
        assert_eq!(parsed.get("title"), Some(&Literal::Str("Clean-up drive".to_string())));
        assert_eq!(
            parsed.get("description"),
            Some(&Literal::Str("Line one\nline two".to_string()))
        );
    }

    #[test]
    fn test_boolean_requires_whole_word() {
        let parsed = parse_one("{ featured: truefalse, other: falsey, n: 12kg }").unwrap();
        assert_eq!(parsed.get("featured"), Some(&Literal::Raw("truefalse".to_string())));
        assert_eq!(parsed.get("other"), Some(&Literal::Raw("falsey".to_string())));
        assert_eq!(parsed.get("n"), Some(&Literal::Raw("12kg".to_string())));
    }

    #[test]
    fn test_raw_values_respect_brackets() {
        let parsed = parse_one("{ tags: ['a', 'b'], id: 'x' }").unwrap();
        assert_eq!(parsed.get("tags"), Some(&Literal::Raw("['a', 'b']".to_string())));
        assert_eq!(parsed.get("id"), Some(&Literal::Str("x".to_string())));
    }

    #[test]
    fn test_comment_only_block_is_empty() {
        let source = "{ id: 'a' }\n{ // todo\n }";
        assert_eq!(
            parse_one_at(source, 1),
            Err(ParseError::EmptyBlock(Position { line: 2, column: 1 }))
        );
    }

    #[test]
    fn test_duplicate_keys_first_wins() {
        let parsed = parse_one("{ id: 'first', id: 'second' }").unwrap();
        assert_eq!(parsed.get("id"), Some(&Literal::Str("first".to_string())));
        assert_eq!(parsed.entries.len(), 2);
    }

    #[test]
    fn test_syntax_errors() {
        let err = parse_one("{ id 'x' }").unwrap_err();
        assert_eq!(
            err,
            ParseError::Syntax {
                block: 1,
                at: Position { line: 1, column: 6 },
                message: "expected ':' after field name 'id'".to_string(),
            }
        );

        assert!(matches!(parse_one("{ id: 'x }"), Err(ParseError::Syntax { .. })));
        assert!(matches!(parse_one("{ id: , a: 1 }"), Err(ParseError::Syntax { .. })));
        assert!(matches!(parse_one("{ : 'x' }"), Err(ParseError::Syntax { .. })));
    }
}
