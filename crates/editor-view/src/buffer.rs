//! Rope-backed text buffer
//!
//! Reference [`Document`] implementation. Lines are delimited by `'\n'` only.
//! CRLF text is normalized to LF on load and the original ending is remembered
//! for [`TextBuffer::text_with_line_ending`]. Any `'\r'` left in the rope is a
//! plain character of its line, so every column of a line is addressable.

use std::borrow::Cow;

use ropey::Rope;

use crate::document::Document;
use crate::error::DocumentError;
use crate::line_ending::{LineEnding, normalize_newlines};
use crate::position::{TextPosition, TextRange, text_end_position};

/// Inserts at least this long are logged.
const LARGE_TEXT_BYTES: usize = 10_000;

/// Text buffer with a single selection.
#[derive(Debug, Clone, Default)]
pub struct TextBuffer {
    rope: Rope,
    selection: TextRange,
    loading: bool,
    line_ending: LineEnding,
}

impl TextBuffer {
    /// Create an empty buffer (one empty line).
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a buffer from text, normalizing CRLF newlines to LF.
    pub fn from_text(text: &str) -> Self {
        if text.len() >= LARGE_TEXT_BYTES {
            tracing::debug!(len = text.len(), "text buffer load large text");
        }
        Self {
            rope: Rope::from_str(&normalize_newlines(text)),
            selection: TextRange::default(),
            loading: false,
            line_ending: LineEnding::detect_in_text(text),
        }
    }

    /// Complete text (LF newlines).
    pub fn text(&self) -> String {
        self.rope.to_string()
    }

    /// Complete text using the buffer's preferred line ending, for saving.
    pub fn text_with_line_ending(&self) -> String {
        self.line_ending.apply_to_text(&self.text())
    }

    /// Line ending detected on load (or set later).
    pub fn line_ending(&self) -> LineEnding {
        self.line_ending
    }

    /// Change the line ending used by [`TextBuffer::text_with_line_ending`].
    pub fn set_line_ending(&mut self, line_ending: LineEnding) {
        self.line_ending = line_ending;
    }

    /// Total character count, terminators included.
    pub fn char_count(&self) -> usize {
        self.rope.len_chars()
    }

    /// Mark the buffer as (not) loading.
    pub fn set_loading(&mut self, loading: bool) {
        self.loading = loading;
    }

    /// Character length of `line` without its terminator.
    pub fn line_len(&self, line: usize) -> Option<usize> {
        let slice = self.rope.get_line(line)?;
        let mut len = slice.len_chars();
        if len > 0 && slice.char(len - 1) == '\n' {
            len -= 1;
        }
        Some(len)
    }

    /// Character offset of `position`.
    pub fn position_to_char(&self, position: TextPosition) -> Result<usize, DocumentError> {
        match self.line_len(position.line) {
            Some(len) if position.column <= len => {
                Ok(self.rope.line_to_char(position.line) + position.column)
            }
            _ => Err(DocumentError::InvalidPosition {
                position,
                line_count: self.rope.len_lines(),
            }),
        }
    }

    /// Position of a character offset (offsets past the end are rejected).
    pub fn char_to_position(&self, char_offset: usize) -> Result<TextPosition, DocumentError> {
        if char_offset > self.rope.len_chars() {
            let line = self.rope.len_lines();
            return Err(DocumentError::InvalidPosition {
                position: TextPosition::new(line, 0),
                line_count: line,
            });
        }
        let line = self.rope.char_to_line(char_offset);
        Ok(TextPosition::new(
            line,
            char_offset - self.rope.line_to_char(line),
        ))
    }

    /// Text covered by `range` (in either order).
    pub fn text_in_range(&self, range: TextRange) -> Result<String, DocumentError> {
        let (start, end) = self.char_span(range)?;
        Ok(self.rope.slice(start..end).to_string())
    }

    fn char_span(&self, range: TextRange) -> Result<(usize, usize), DocumentError> {
        let range = range.normalized();
        let invalid = |_| DocumentError::InvalidRange { range };
        let start = self.position_to_char(range.start).map_err(invalid)?;
        let end = self.position_to_char(range.end).map_err(invalid)?;
        Ok((start, end))
    }
}

impl Document for TextBuffer {
    fn line_count(&self) -> usize {
        self.rope.len_lines()
    }

    fn line_text(&self, line: usize) -> Option<Cow<'_, str>> {
        let len = self.line_len(line)?;
        let slice = self.rope.line(line).slice(..len);
        Some(match slice.as_str() {
            Some(text) => Cow::Borrowed(text),
            None => Cow::Owned(slice.to_string()),
        })
    }

    fn insert(&mut self, position: TextPosition, text: &str) -> Result<TextRange, DocumentError> {
        let offset = self.position_to_char(position)?;
        if text.len() >= LARGE_TEXT_BYTES {
            tracing::debug!(len = text.len(), "text buffer insert large text");
        }
        self.rope.insert(offset, text);
        Ok(TextRange::new(position, text_end_position(position, text)))
    }

    fn remove(&mut self, range: TextRange) -> Result<String, DocumentError> {
        let (start, end) = self.char_span(range)?;
        let removed = self.rope.slice(start..end).to_string();
        self.rope.remove(start..end);
        Ok(removed)
    }

    fn selection(&self) -> TextRange {
        self.selection
    }

    fn set_selection(&mut self, range: TextRange) {
        self.selection = range;
    }

    fn is_loading(&self) -> bool {
        self.loading
    }
}
