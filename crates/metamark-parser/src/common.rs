use serde::{Deserialize, Serialize};
use std::cmp::min;
use std::fmt::{Display, Formatter};
use std::ops::Range;

/// Byte range into the source text.
#[derive(Debug, PartialEq, Eq, Default, Clone, Serialize, Deserialize)]
pub struct Span {
    pub range: Range<usize>,
}

impl Span {
    pub fn new(start: usize, end: usize) -> Self {
        Self { range: start..end }
    }

    /// A zero-width span at `offset`.
    pub fn at(offset: usize) -> Self {
        Self::new(offset, offset)
    }

    pub fn start(&self) -> usize {
        self.range.start
    }

    pub fn end(&self) -> usize {
        self.range.end
    }

    pub fn len(&self) -> usize {
        self.range.end - self.range.start
    }

    pub fn is_empty(&self) -> bool {
        self.range.is_empty()
    }

    /// Returns the spanned text extended by `margin` bytes on both sides. The bounds are widened
    /// to the nearest char boundaries so multi-byte text never gets split.
    pub fn get_with_margin<'a>(&self, input: &'a str, margin: usize) -> &'a str {
        let mut start = min(
            self.range.start.checked_sub(margin).unwrap_or_default(),
            input.len(),
        );
        let mut end = min(self.range.end + margin, input.len());

        while !input.is_char_boundary(start) {
            start -= 1;
        }
        while !input.is_char_boundary(end) {
            end += 1;
        }

        &input[start..end]
    }
}

/// A cursor location: byte offset plus 1-based line and column.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Position {
    pub offset: usize,
    pub line: usize,
    pub column: usize,
}

impl Position {
    pub fn new() -> Self {
        Position {
            offset: 0,
            line: 1,
            column: 1,
        }
    }
}

impl Default for Position {
    fn default() -> Self {
        Self::new()
    }
}

impl Display for Position {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "line {}, column {}", self.line, self.column)
    }
}
