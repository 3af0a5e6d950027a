//! Document collaborator interface.

use std::borrow::Cow;

use crate::error::DocumentError;
use crate::position::{TextPosition, TextRange};

/// Line-addressed text store seen by the projection and the history.
///
/// Line text never contains the line terminator. Positions outside the
/// document are rejected with [`DocumentError`], not clamped.
pub trait Document {
    /// Number of logical lines (at least 1).
    fn line_count(&self) -> usize;

    /// Text of `line` without its terminator, or `None` past the end.
    fn line_text(&self, line: usize) -> Option<Cow<'_, str>>;

    /// Insert `text` at `position`; returns the span now covered by `text`.
    fn insert(&mut self, position: TextPosition, text: &str) -> Result<TextRange, DocumentError>;

    /// Remove `range` (in either order); returns the removed text.
    fn remove(&mut self, range: TextRange) -> Result<String, DocumentError>;

    /// Current selection.
    fn selection(&self) -> TextRange;

    /// Replace the selection.
    fn set_selection(&mut self, range: TextRange);

    /// Whether the document is still being loaded. Projection caches are not
    /// built while this is `true`.
    fn is_loading(&self) -> bool {
        false
    }
}
