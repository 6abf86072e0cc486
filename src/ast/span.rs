//! Source coordinates and ranges.
//!
//! Every token and every AST node carries a [`Span`]: a half-open range
//! between two [`Position`]s. Offsets are byte offsets into the UTF-8
//! source, lines are 1-based and columns are 0-based character counts.

use serde::Serialize;
use std::fmt;

/// A single point in the source text.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub struct Position {
    /// Line number (1-indexed).
    pub line: usize,
    /// Column in characters from the start of the line (0-indexed).
    pub column: usize,
    /// Byte offset from the start of the source.
    pub offset: usize,
}

impl Position {
    /// Creates a new position.
    pub fn new(line: usize, column: usize, offset: usize) -> Self {
        Self {
            line,
            column,
            offset,
        }
    }

    /// The position of the first byte of any source.
    pub fn origin() -> Self {
        Self::new(1, 0, 0)
    }
}

impl Default for Position {
    fn default() -> Self {
        Self::origin()
    }
}

impl PartialOrd for Position {
    fn partial_cmp(&self, other: &Self) -> Option<std::cmp::Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Position {
    fn cmp(&self, other: &Self) -> std::cmp::Ordering {
        self.offset.cmp(&other.offset)
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.line, self.column)
    }
}

/// A half-open source range: `start` is inclusive, `end` is exclusive.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize)]
pub struct Span {
    pub start: Position,
    pub end: Position,
}

impl Span {
    /// Creates a span between two positions.
    pub fn new(start: Position, end: Position) -> Self {
        Self { start, end }
    }

    /// Creates a span that starts where `first` starts and ends where
    /// `last` ends.
    ///
    /// # Example
    ///
    /// ```
    /// use jsxscope::ast::{Position, Span};
    ///
    /// let a = Span::new(Position::new(1, 0, 0), Position::new(1, 5, 5));
    /// let b = Span::new(Position::new(2, 0, 10), Position::new(2, 3, 13));
    /// let joined = Span::between(a, b);
    /// assert_eq!(joined.start_offset(), 0);
    /// assert_eq!(joined.end_offset(), 13);
    /// ```
    pub fn between(first: Span, last: Span) -> Self {
        Self {
            start: first.start,
            end: last.end,
        }
    }

    /// Byte offset of the first byte in the range.
    pub fn start_offset(&self) -> usize {
        self.start.offset
    }

    /// Byte offset one past the last byte in the range.
    pub fn end_offset(&self) -> usize {
        self.end.offset
    }

    /// Number of bytes covered.
    pub fn len(&self) -> usize {
        self.end.offset.saturating_sub(self.start.offset)
    }

    /// Returns true if the span covers no bytes.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Returns true if `other` lies entirely inside this span.
    pub fn contains(&self, other: &Span) -> bool {
        self.start.offset <= other.start.offset && other.end.offset <= self.end.offset
    }

    /// Returns the covered slice of `source`, if the offsets are valid.
    pub fn slice<'a>(&self, source: &'a str) -> Option<&'a str> {
        source.get(self.start.offset..self.end.offset)
    }
}

impl fmt::Display for Span {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}-{}", self.start, self.end)
    }
}
