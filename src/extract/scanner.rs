//! Brace scanning
//!
//! Splits a document into flat `{ ... }` regions. The first `}` closes a
//! block; text outside blocks is ignored.

use crate::error::{ParseError, Position};
use crate::extract::types::Block;

/// Locate every block in `source`, in document order
pub fn scan_blocks(source: &str) -> Result<Vec<Block<'_>>, ParseError> {
    let mut blocks = Vec::new();
    let mut open: Option<usize> = None;

    for (i, c) in source.char_indices() {
        match c {
            '{' => {
                if open.is_some() {
                    return Err(ParseError::Nested(Position::locate(source, i)));
                }
                open = Some(i);
            }
            '}' => {
                let Some(start) = open.take() else {
                    return Err(ParseError::Unmatched(Position::locate(source, i)));
                };

                let body = &source[start + 1..i];
                if body.trim().is_empty() {
                    return Err(ParseError::EmptyBlock(Position::locate(source, start)));
                }

                blocks.push(Block {
                    index: blocks.len() + 1,
                    body,
                    offset: start + 1,
                });
            }
            _ => {}
        }
    }

    if let Some(start) = open {
        return Err(ParseError::Unclosed(Position::locate(source, start)));
    }

    Ok(blocks)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_blocks_across_lines() {
        let source = "export const data = [\n  {\n    id: 'a'\n  },\n  { id: 'b' },\n];\n";
        let blocks = scan_blocks(source).unwrap();

        assert_eq!(blocks.len(), 2);
        assert_eq!(blocks[0].index, 1);
        assert_eq!(blocks[0].body.trim(), "id: 'a'");
        assert_eq!(blocks[1].index, 2);
        assert_eq!(blocks[1].body, " id: 'b' ");
        assert_eq!(&source[blocks[1].offset..blocks[1].offset + 9], " id: 'b' ");
    }

    #[test]
    fn test_no_blocks() {
        assert!(scan_blocks("").unwrap().is_empty());
        assert!(scan_blocks("just some text\n").unwrap().is_empty());
    }

    #[test]
    fn test_malformed_braces() {
        assert_eq!(
            scan_blocks("{ id: 'a' }\n{ id: 'b'"),
            Err(ParseError::Unclosed(Position { line: 2, column: 1 }))
        );
        assert_eq!(
            scan_blocks("id: 'a' }"),
            Err(ParseError::Unmatched(Position { line: 1, column: 9 }))
        );
        assert_eq!(
            scan_blocks("{ a: { b: 1 } }"),
            Err(ParseError::Nested(Position { line: 1, column: 6 }))
        );
        assert_eq!(
            scan_blocks("{ id: 'a' }, {  \n }"),
            Err(ParseError::EmptyBlock(Position { line: 1, column: 14 }))
        );
    }
}
