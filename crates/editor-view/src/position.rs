//! Logical document coordinates.

use std::cmp::Ordering;
use std::fmt;

/// Caret location in the logical document (line and column, both zero-based).
///
/// `column` counts Unicode scalar values (`char`s), not bytes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct TextPosition {
    /// Zero-based logical line index.
    pub line: usize,
    /// Zero-based column in characters within the logical line.
    pub column: usize,
}

impl TextPosition {
    /// Create a new logical position.
    pub const fn new(line: usize, column: usize) -> Self {
        Self { line, column }
    }
}

impl Ord for TextPosition {
    fn cmp(&self, other: &Self) -> Ordering {
        self.line
            .cmp(&other.line)
            .then_with(|| self.column.cmp(&other.column))
    }
}

impl PartialOrd for TextPosition {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl fmt::Display for TextPosition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{},{}", self.line, self.column)
    }
}

/// Pair of positions describing a selection or an edited span.
///
/// `start <= end` is not enforced; use [`TextRange::normalized`] where order matters.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct TextRange {
    /// Anchor of the range.
    pub start: TextPosition,
    /// Active end of the range.
    pub end: TextPosition,
}

impl TextRange {
    /// Create a range from two positions (kept in the given order).
    pub const fn new(start: TextPosition, end: TextPosition) -> Self {
        Self { start, end }
    }

    /// An empty range at `position`.
    pub const fn caret(position: TextPosition) -> Self {
        Self {
            start: position,
            end: position,
        }
    }

    /// The same range with `start <= end`.
    pub fn normalized(&self) -> Self {
        if self.start <= self.end {
            *self
        } else {
            Self {
                start: self.end,
                end: self.start,
            }
        }
    }

    /// Whether both endpoints are equal.
    pub fn is_empty(&self) -> bool {
        self.start == self.end
    }

    /// Whether both endpoints are on the same logical line.
    pub fn in_same_line(&self) -> bool {
        self.start.line == self.end.line
    }

    /// Whether `line` lies within the normalized line span of this range.
    pub fn contains_line(&self, line: usize) -> bool {
        let range = self.normalized();
        range.start.line <= line && line <= range.end.line
    }
}

impl fmt::Display for TextRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} - {}", self.start, self.end)
    }
}

/// Position reached after inserting `text` at `start`.
///
/// Lines are delimited by `'\n'` only, matching [`TextBuffer`](crate::TextBuffer).
pub fn text_end_position(start: TextPosition, text: &str) -> TextPosition {
    match text.rfind('\n') {
        None => TextPosition::new(start.line, start.column + text.chars().count()),
        Some(last_newline) => {
            let newlines = text.bytes().filter(|b| *b == b'\n').count();
            TextPosition::new(
                start.line + newlines,
                text[last_newline + 1..].chars().count(),
            )
        }
    }
}
