//! Source positions.
//!
//! tree-sitter reports rows and byte columns starting at zero; we keep that convention
//! internally and only add one when rendering for humans.

use serde::Serialize;

/// A point in the source
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct Position {
    pub line: usize,
    pub col: usize,
    pub byte: usize,
}

/// A range in the source
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct Span {
    pub start: Position,
    pub end: Position,
}

impl Span {
    /// Span covered by a syntax node
    pub fn of(node: tree_sitter::Node<'_>) -> Self {
        let start = node.start_position();
        let end = node.end_position();
        Self {
            start: Position { line: start.row, col: start.column, byte: node.start_byte() },
            end: Position { line: end.row, col: end.column, byte: node.end_byte() },
        }
    }

    /// Zero-width span at a byte offset
    pub fn at_byte(source: &str, byte: usize) -> Self {
        let byte = byte.min(source.len());
        let before = &source[..byte];
        let line = before.matches('\n').count();
        let col = before.rfind('\n').map_or(byte, |nl| byte - nl - 1);
        let pos = Position { line, col, byte };
        Self { start: pos, end: pos }
    }
}

/// Depth-first search for the first node that is an error or a missing token.
pub fn first_error(node: tree_sitter::Node<'_>) -> Option<tree_sitter::Node<'_>> {
    if node.is_error() || node.is_missing() {
        return Some(node);
    }
    if !node.has_error() {
        return None;
    }
    let mut cursor = node.walk();
    let children: Vec<_> = node.children(&mut cursor).collect();
    children.into_iter().find_map(first_error)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_at_byte_first_line() {
        let span = Span::at_byte("package main", 8);
        assert_eq!(span.start.line, 0);
        assert_eq!(span.start.col, 8);
    }

    #[test]
    fn test_at_byte_later_line() {
        let source = "package main\n\nfunc f() {}";
        let span = Span::at_byte(source, 19);
        assert_eq!(span.start.line, 2);
        assert_eq!(span.start.col, 5);
    }

    #[test]
    fn test_out_of_bounds() {
        let span = Span::at_byte("abc", 100);
        assert_eq!(span.start.byte, 3); // clamped to length
        assert_eq!(span.start.col, 3);
    }
}
