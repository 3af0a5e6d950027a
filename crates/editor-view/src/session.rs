//! Edit session
//!
//! Ties a [`TextBuffer`], its [`ViewProjection`] and a [`HistoryStack`]
//! together: every edit is recorded in the history and refreshes the
//! projection for the touched lines, including edits replayed by undo/redo.

use std::borrow::Cow;
use std::time::{Duration, Instant};

use crate::buffer::TextBuffer;
use crate::config::EditorConfig;
use crate::document::Document;
use crate::error::{DocumentError, EditorError, ProjectionError};
use crate::history::{ChangeId, HistoryStack};
use crate::line_ending::normalize_newlines;
use crate::metrics::FontStyle;
use crate::position::{TextPosition, TextRange};
use crate::projection::{ViewProjection, VisibleLineInfo, VisibleLineRange};
use crate::viewport::Viewport;
use crate::visible_index::VisibleIndex;
use crate::wrap::{WrapConfig, WrapMode};

/// [`Document`] view of the buffer that keeps the projection in sync.
struct ProjectedDocument<'a> {
    buffer: &'a mut TextBuffer,
    projection: &'a mut ViewProjection,
}

impl ProjectedDocument<'_> {
    fn refresh(&mut self, from_line: usize, to_line: usize) {
        let total = self.buffer.line_count();
        match self
            .projection
            .update_cache(&*self.buffer, from_line, to_line, total)
        {
            Ok(()) | Err(ProjectionError::Pending) => {}
            Err(err) => {
                tracing::warn!(
                    error = %err,
                    from_line,
                    to_line,
                    "projection refresh failed, invalidating"
                );
                self.projection.invalidate_cache();
            }
        }
    }
}

impl Document for ProjectedDocument<'_> {
    fn line_count(&self) -> usize {
        self.buffer.line_count()
    }

    fn line_text(&self, line: usize) -> Option<Cow<'_, str>> {
        self.buffer.line_text(line)
    }

    fn insert(&mut self, position: TextPosition, text: &str) -> Result<TextRange, DocumentError> {
        let span = self.buffer.insert(position, text)?;
        self.refresh(position.line, position.line);
        Ok(span)
    }

    fn remove(&mut self, range: TextRange) -> Result<String, DocumentError> {
        let range = range.normalized();
        let removed = self.buffer.remove(range)?;
        self.refresh(range.start.line, range.end.line);
        Ok(removed)
    }

    fn selection(&self) -> TextRange {
        self.buffer.selection()
    }

    fn set_selection(&mut self, range: TextRange) {
        self.buffer.set_selection(range);
    }

    fn is_loading(&self) -> bool {
        self.buffer.is_loading()
    }
}

/// A document with one view and an undo history.
#[derive(Debug)]
pub struct EditSession {
    buffer: TextBuffer,
    projection: ViewProjection,
    history: HistoryStack,
    viewport: Viewport,
    clock: Instant,
    saved_change_id: ChangeId,
}

impl EditSession {
    /// Create a session over `text`.
    pub fn new(text: &str, style: FontStyle, config: EditorConfig, max_width: f32) -> Self {
        Self {
            buffer: TextBuffer::from_text(text),
            projection: ViewProjection::new(style, config.wrap, max_width),
            history: HistoryStack::new(config.history),
            viewport: Viewport::default(),
            clock: Instant::now(),
            saved_change_id: 0,
        }
    }

    /// The underlying buffer.
    pub fn buffer(&self) -> &TextBuffer {
        &self.buffer
    }

    /// The projection (cache may be pending).
    pub fn projection(&self) -> &ViewProjection {
        &self.projection
    }

    /// The undo/redo history.
    pub fn history(&self) -> &HistoryStack {
        &self.history
    }

    /// Scroll state.
    pub fn viewport(&self) -> &Viewport {
        &self.viewport
    }

    /// Mutable scroll state.
    pub fn viewport_mut(&mut self) -> &mut Viewport {
        &mut self.viewport
    }

    /// Complete text.
    pub fn text(&self) -> String {
        self.buffer.text()
    }

    /// Time since the session started; used to timestamp edits.
    pub fn now(&self) -> Duration {
        self.clock.elapsed()
    }

    /// Current selection.
    pub fn selection(&self) -> TextRange {
        self.buffer.selection()
    }

    /// Replace the selection. Both ends must exist in the document.
    pub fn set_selection(&mut self, range: TextRange) -> Result<(), EditorError> {
        self.buffer.position_to_char(range.start)?;
        self.buffer.position_to_char(range.end)?;
        self.buffer.set_selection(range);
        Ok(())
    }

    /// Mark the document as (not) loading. Projection queries report
    /// [`ProjectionError::Pending`] while loading.
    pub fn set_loading(&mut self, loading: bool) {
        self.buffer.set_loading(loading);
        if !loading {
            self.projection.invalidate_cache();
        }
    }

    /// Insert `text` at `position`, timestamped now.
    pub fn insert(&mut self, position: TextPosition, text: &str) -> Result<TextRange, EditorError> {
        let now = self.now();
        self.insert_at(position, text, now)
    }

    /// Insert `text` at `position` with an explicit timestamp.
    ///
    /// The caret moves to the end of the inserted text.
    pub fn insert_at(
        &mut self,
        position: TextPosition,
        text: &str,
        timestamp: Duration,
    ) -> Result<TextRange, EditorError> {
        self.buffer.position_to_char(position)?;
        let text = normalize_newlines(text);
        self.history.push_selection(self.buffer.selection(), timestamp);

        let span = self.document().insert(position, &text)?;
        self.history.push_insert(text, position, timestamp);
        self.buffer.set_selection(TextRange::caret(span.end));
        Ok(span)
    }

    /// Remove `range`, timestamped now.
    pub fn remove(&mut self, range: TextRange) -> Result<String, EditorError> {
        let now = self.now();
        self.remove_at(range, now)
    }

    /// Remove `range` with an explicit timestamp; returns the removed text.
    ///
    /// The caret moves to the start of the range.
    pub fn remove_at(
        &mut self,
        range: TextRange,
        timestamp: Duration,
    ) -> Result<String, EditorError> {
        let range = range.normalized();
        self.buffer.text_in_range(range)?;
        self.history.push_selection(self.buffer.selection(), timestamp);

        let removed = self.document().remove(range)?;
        self.history.push_remove(range, removed.clone(), timestamp);
        self.buffer.set_selection(TextRange::caret(range.start));
        Ok(removed)
    }

    /// Replace the selection with `text` (typing over a selection).
    pub fn replace_selection(&mut self, text: &str) -> Result<TextRange, EditorError> {
        let now = self.now();
        let selection = self.buffer.selection().normalized();
        if !selection.is_empty() {
            self.remove_at(selection, now)?;
        }
        self.insert_at(selection.start, text, now)
    }

    /// Undo the most recent burst of edits. Returns how many commands were reverted.
    pub fn undo(&mut self) -> Result<usize, EditorError> {
        let mut doc = ProjectedDocument {
            buffer: &mut self.buffer,
            projection: &mut self.projection,
        };
        let reverted = self.history.undo(&mut doc)?;
        self.clamp_viewport();
        Ok(reverted)
    }

    /// Redo the most recently undone burst. Returns how many commands were reapplied.
    pub fn redo(&mut self) -> Result<usize, EditorError> {
        let mut doc = ProjectedDocument {
            buffer: &mut self.buffer,
            projection: &mut self.projection,
        };
        let reapplied = self.history.redo(&mut doc)?;
        self.clamp_viewport();
        Ok(reapplied)
    }

    /// Check if undo is possible
    pub fn can_undo(&self) -> bool {
        self.history.has_undo()
    }

    /// Check if redo is possible
    pub fn can_redo(&self) -> bool {
        self.history.has_redo()
    }

    /// Id of the most recent applied change (0 if none).
    pub fn current_change_id(&self) -> ChangeId {
        self.history.current_change_id()
    }

    /// Remember the current state as saved.
    pub fn mark_saved(&mut self) {
        self.saved_change_id = self.history.current_change_id();
    }

    /// Whether the document differs from the last saved state.
    pub fn is_modified(&self) -> bool {
        self.history.current_change_id() != self.saved_change_id
    }

    /// Change the wrap mode.
    pub fn set_wrap_mode(&mut self, mode: WrapMode) -> bool {
        self.projection.set_wrap_mode(mode)
    }

    /// Replace the wrap configuration.
    pub fn set_wrap_config(&mut self, config: WrapConfig) -> bool {
        self.projection.set_config(config)
    }

    /// Change the view width.
    pub fn set_max_width(&mut self, max_width: f32) -> bool {
        self.projection.set_max_width(max_width, false)
    }

    /// Replace the font style.
    pub fn set_font_style(&mut self, style: FontStyle) -> bool {
        self.projection.set_font_style(style)
    }

    /// Total number of visual lines.
    pub fn visible_lines_count(&mut self) -> Result<usize, ProjectionError> {
        self.projection.visible_lines_count(&self.buffer)
    }

    /// First (or last) visual row of `line`.
    pub fn to_visible_index(
        &mut self,
        line: usize,
        prefer_last: bool,
    ) -> Result<VisibleIndex, ProjectionError> {
        self.projection.to_visible_index(&self.buffer, line, prefer_last)
    }

    /// Logical start of visual row `index`.
    pub fn visible_index_position(
        &mut self,
        index: VisibleIndex,
    ) -> Result<TextPosition, ProjectionError> {
        self.projection.visible_index_position(&self.buffer, index)
    }

    /// Text shown on visual row `index`, without the continuation padding.
    pub fn visible_row_text(&mut self, index: VisibleIndex) -> Result<String, EditorError> {
        let range = self.projection.visible_index_range(&self.buffer, index)?;
        Ok(self.buffer.text_in_range(range)?)
    }

    /// Visual rows of `line`.
    pub fn visible_line_info(&mut self, line: usize) -> Result<VisibleLineInfo, ProjectionError> {
        self.projection.visible_line_info(&self.buffer, line)
    }

    /// Visual row holding the caret (the active end of the selection).
    pub fn caret_visible_line(&mut self) -> Result<VisibleLineRange, ProjectionError> {
        let caret = self.buffer.selection().end;
        self.projection.visible_line_range(&self.buffer, caret, false)
    }

    /// Whether any row of `line` is inside the viewport.
    pub fn is_line_visible(&mut self, line: usize) -> Result<bool, ProjectionError> {
        self.projection.is_line_visible(&self.buffer, line, &self.viewport)
    }

    /// Scroll the minimum amount to show the first row of `line`.
    pub fn scroll_to_line(&mut self, line: usize) -> Result<bool, ProjectionError> {
        let index = self.projection.to_visible_index(&self.buffer, line, false)?;
        Ok(self.viewport.ensure_visible(index))
    }

    fn document(&mut self) -> ProjectedDocument<'_> {
        ProjectedDocument {
            buffer: &mut self.buffer,
            projection: &mut self.projection,
        }
    }

    fn clamp_viewport(&mut self) {
        if let Ok(total) = self.projection.visible_lines_count(&self.buffer) {
            self.viewport.clamp_to(total);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::metrics::CellMetrics;
    use std::sync::Arc;

    fn session(text: &str, mode: WrapMode, width: f32) -> EditSession {
        let config = EditorConfig::default().with_wrap(
            WrapConfig::default()
                .with_mode(mode)
                .with_keep_indentation(false),
        );
        EditSession::new(
            text,
            FontStyle::new(Arc::new(CellMetrics::new(1.0)), 12),
            config,
            width,
        )
    }

    #[test]
    fn test_insert_moves_caret_and_records() {
        let mut session = session("hello", WrapMode::NoWrap, 80.0);
        let span = session
            .insert_at(TextPosition::new(0, 5), "!\nbye", Duration::ZERO)
            .unwrap();
        assert_eq!(session.selection(), TextRange::caret(span.end));
        assert_eq!(session.text(), "hello!\nbye");
        // selection + insert
        assert_eq!(session.history().undo_depth(), 2);
    }

    #[test]
    fn test_rejected_edit_records_nothing() {
        let mut session = session("hello", WrapMode::NoWrap, 80.0);
        let result = session.insert_at(TextPosition::new(3, 0), "x", Duration::ZERO);
        assert!(matches!(result, Err(EditorError::Document(_))));
        assert!(!session.can_undo());
    }

    #[test]
    fn test_projection_follows_edits_and_undo() {
        let mut session = session("short\nline", WrapMode::Letter, 5.0);
        assert_eq!(session.visible_lines_count(), Ok(2));

        session
            .insert_at(TextPosition::new(1, 4), " that wraps", Duration::ZERO)
            .unwrap();
        assert_eq!(session.visible_lines_count(), Ok(4));
        assert!(!session.projection().is_pending_reconstruction());

        session.undo().unwrap();
        assert_eq!(session.text(), "short\nline");
        assert_eq!(session.visible_lines_count(), Ok(2));
        assert!(!session.projection().is_pending_reconstruction());
    }

    #[test]
    fn test_undo_restores_selection() {
        let mut session = session("abc", WrapMode::NoWrap, 80.0);
        let before = TextRange::caret(TextPosition::new(0, 1));
        session.set_selection(before).unwrap();
        session
            .insert_at(TextPosition::new(0, 1), "xy", Duration::ZERO)
            .unwrap();
        session.undo().unwrap();
        assert_eq!(session.selection(), before);
        session.redo().unwrap();
        assert_eq!(session.selection(), TextRange::caret(TextPosition::new(0, 3)));
    }

    #[test]
    fn test_modified_tracking() {
        let mut session = session("", WrapMode::NoWrap, 80.0);
        assert!(!session.is_modified());
        session
            .insert_at(TextPosition::new(0, 0), "a", Duration::ZERO)
            .unwrap();
        assert!(session.is_modified());
        session.mark_saved();
        assert!(!session.is_modified());
        session.undo().unwrap();
        assert!(session.is_modified());
        session.redo().unwrap();
        assert!(!session.is_modified());
    }

    #[test]
    fn test_visible_row_text() {
        let mut session = session("hello world foo", WrapMode::Word, 11.0);
        assert_eq!(
            session.visible_row_text(VisibleIndex::new(0)).unwrap(),
            "hello world "
        );
        assert_eq!(session.visible_row_text(VisibleIndex::new(1)).unwrap(), "foo");
        assert!(matches!(
            session.visible_row_text(VisibleIndex::new(2)),
            Err(EditorError::Projection(
                ProjectionError::VisibleIndexOutOfRange { .. }
            ))
        ));
    }

    #[test]
    fn test_carriage_return_edits_undo_cleanly() {
        let mut session = session("ab\ncd", WrapMode::NoWrap, 80.0);
        let span = session
            .insert_at(TextPosition::new(0, 2), "x\r", Duration::ZERO)
            .unwrap();
        assert_eq!(
            span,
            TextRange::new(TextPosition::new(0, 2), TextPosition::new(0, 4))
        );
        assert_eq!(session.selection(), TextRange::caret(TextPosition::new(0, 4)));
        session.undo().unwrap();
        assert_eq!(session.text(), "ab\ncd");
        session.redo().unwrap();
        assert_eq!(session.text(), "abx\r\ncd");
        assert_eq!(session.buffer().line_len(0), Some(4));
    }

    #[test]
    fn test_crlf_is_normalized_on_load_and_insert() {
        let mut session = session("one\r\ntwo", WrapMode::NoWrap, 80.0);
        assert_eq!(session.text(), "one\ntwo");
        assert_eq!(session.buffer().line_ending(), crate::LineEnding::Crlf);

        let span = session
            .insert_at(TextPosition::new(1, 3), "\r\nthree", Duration::ZERO)
            .unwrap();
        assert_eq!(span.end, TextPosition::new(2, 5));
        assert_eq!(session.text(), "one\ntwo\nthree");
        assert_eq!(session.buffer().text_with_line_ending(), "one\r\ntwo\r\nthree");
        session.undo().unwrap();
        assert_eq!(session.text(), "one\ntwo");
    }

    #[test]
    fn test_replace_selection() {
        let mut session = session("hello world", WrapMode::NoWrap, 80.0);
        session
            .set_selection(TextRange::new(
                TextPosition::new(0, 11),
                TextPosition::new(0, 6),
            ))
            .unwrap();
        session.replace_selection("there").unwrap();
        assert_eq!(session.text(), "hello there");
        session.undo().unwrap();
        assert_eq!(session.text(), "hello world");
    }
}
