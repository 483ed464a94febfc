//! Source location tracking for clause text
//!
//! Clauses are single-line, so positions carry a byte offset and a 1-based
//! character column. Accurate columns are what make lexer diagnostics useful.
use serde::{Deserialize, Serialize};
use std::fmt;

/// A position in clause text with column and byte offset.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default, Serialize, Deserialize,
)]
pub struct Position {
    /// Byte offset from start of input (0-based)
    pub offset: usize,
    /// Column number (1-based, counted in characters)
    pub column: u32,
}

impl Position {
    /// Create a new position
    pub fn new(offset: usize, column: u32) -> Self {
        Self { offset, column }
    }

    /// Create the starting position (offset 0, column 1)
    pub fn start() -> Self {
        Self {
            offset: 0,
            column: 1,
        }
    }

    /// Advance position by one character
    pub fn advance(self, ch: char) -> Self {
        Self {
            offset: self.offset + ch.len_utf8(),
            column: self.column + 1,
        }
    }

    /// Advance position by a string
    pub fn advance_str(self, s: &str) -> Self {
        s.chars().fold(self, |pos, ch| pos.advance(ch))
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "column {}", self.column)
    }
}

/// A span of clause text from start to end position.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct Span {
    /// Start position (inclusive)
    pub start: Position,
    /// End position (exclusive)
    pub end: Position,
}

impl Span {
    /// Create a new span
    pub fn new(start: Position, end: Position) -> Self {
        debug_assert!(
            start.offset <= end.offset,
            "Span start must not be after end"
        );
        Self { start, end }
    }

    pub fn start(&self) -> Position {
        self.start
    }

    pub fn end(&self) -> Position {
        self.end
    }

    /// Span covering `text` starting at `start`
    pub fn covering(start: Position, text: &str) -> Self {
        Self::new(start, start.advance_str(text))
    }

    /// Create a zero-width span at a position
    pub fn point(pos: Position) -> Self {
        Self {
            start: pos,
            end: pos,
        }
    }

    /// Get the byte length of this span
    pub fn len(&self) -> usize {
        self.end.offset - self.start.offset
    }

    pub fn is_empty(&self) -> bool {
        self.start.offset == self.end.offset
    }

    /// Get the source text for this span, if the offsets are valid for `input`
    pub fn slice<'a>(&self, input: &'a str) -> Option<&'a str> {
        input.get(self.start.offset..self.end.offset)
    }
}

impl fmt::Display for Span {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "columns {}-{}", self.start.column, self.end.column)
    }
}

/// Format an error message with the clause text and a caret underline
pub fn format_error(source: &str, span: &Span, message: &str) -> String {
    let mut result = String::new();

    result.push_str(&format!("error: {}\n", message));
    result.push_str(&format!("  --> column {}\n", span.start.column));
    result.push_str("   |\n");
    result.push_str(&format!("   | {}\n", source));

    let mut underline = String::from("   | ");
    for _ in 1..span.start.column {
        underline.push(' ');
    }
    let width = span.end.column.saturating_sub(span.start.column).max(1);
    for _ in 0..width {
        underline.push('^');
    }
    result.push_str(&underline);
    result.push('\n');

    result
}
