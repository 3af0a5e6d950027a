//! Logical ↔ visual line projection
//!
//! [`ViewProjection`] caches, for a whole document, which visual rows each
//! logical line occupies once soft wrapping is applied. The cache is three
//! parallel arrays:
//!
//! - `visual_to_logical[v]`: logical line and start column of visual row `v`
//! - `visual_line_offset[v]`: x-offset of row `v` (0 for the first row of a
//!   line, the continuation padding for the others)
//! - `logical_to_first_visual[l]`: first visual row of logical line `l`
//!
//! Alongside them, `line_padding[l]` keeps the continuation padding measured
//! for line `l`, whether or not it wrapped.
//!
//! The cache is either valid or pending reconstruction. Setters that change
//! wrap geometry mark it pending; the next query rebuilds it. After an edit,
//! [`ViewProjection::update_cache`] recomputes only the touched lines and
//! shifts everything below them.

use std::time::Instant;

use crate::document::Document;
use crate::error::ProjectionError;
use crate::metrics::FontStyle;
use crate::position::{TextPosition, TextRange};
use crate::viewport::Viewport;
use crate::visible_index::VisibleIndex;
use crate::wrap::{LineWrapInfo, WrapConfig, WrapMode, compute_line_breaks_with_config};

/// Where a logical line lands in the projection.
#[derive(Debug, Clone, PartialEq)]
pub struct VisibleLineInfo {
    /// First visual row of the line.
    pub visible_index: VisibleIndex,
    /// Continuation indentation measured for the line, wrapped or not.
    pub padding_start: f32,
    /// Every visual row of the line, in order.
    pub visual_lines: Vec<VisibleIndex>,
}

/// A visual row and the logical columns it shows.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct VisibleLineRange {
    /// The visual row.
    pub visible_index: VisibleIndex,
    /// Columns covered by the row, on a single logical line.
    pub range: TextRange,
}

/// Soft-wrap cache of one view over a document.
#[derive(Debug, Clone)]
pub struct ViewProjection {
    style: FontStyle,
    config: WrapConfig,
    max_width: f32,
    visual_to_logical: Vec<TextPosition>,
    visual_line_offset: Vec<f32>,
    logical_to_first_visual: Vec<VisibleIndex>,
    line_padding: Vec<f32>,
    pending: bool,
}

impl ViewProjection {
    /// Create a projection. The cache starts pending and is built on first use.
    pub fn new(style: FontStyle, config: WrapConfig, max_width: f32) -> Self {
        Self {
            style,
            config,
            max_width,
            visual_to_logical: Vec::new(),
            visual_line_offset: Vec::new(),
            logical_to_first_visual: Vec::new(),
            line_padding: Vec::new(),
            pending: true,
        }
    }

    /// `true` iff the wrap mode is not [`WrapMode::NoWrap`].
    pub fn is_wrap_enabled(&self) -> bool {
        self.config.mode != WrapMode::NoWrap
    }

    /// Current wrap configuration.
    pub fn config(&self) -> &WrapConfig {
        &self.config
    }

    /// Width lines are wrapped at.
    pub fn max_width(&self) -> f32 {
        self.max_width
    }

    /// Font handle and style used for measuring.
    pub fn font_style(&self) -> &FontStyle {
        &self.style
    }

    /// Advance of a space in the current style.
    pub fn whitespace_advance(&self) -> f32 {
        self.style.whitespace_advance()
    }

    /// Whether the next query will rebuild the cache.
    pub fn is_pending_reconstruction(&self) -> bool {
        self.pending
    }

    /// Replace the wrap configuration. Returns whether the cache was invalidated.
    pub fn set_config(&mut self, config: WrapConfig) -> bool {
        if config == self.config {
            return false;
        }
        self.config = config;
        self.invalidate_cache();
        true
    }

    /// Change the wrap mode.
    pub fn set_wrap_mode(&mut self, mode: WrapMode) -> bool {
        self.set_config(self.config.with_mode(mode))
    }

    /// Change the tab width.
    pub fn set_tab_width(&mut self, tab_width: u32) -> bool {
        self.set_config(self.config.with_tab_width(tab_width))
    }

    /// Enable or disable continuation indentation.
    pub fn set_keep_indentation(&mut self, keep_indentation: bool) -> bool {
        self.set_config(self.config.with_keep_indentation(keep_indentation))
    }

    /// Change the view width.
    ///
    /// Geometry only depends on the width while wrapping, so the cache is
    /// invalidated only then (or when `force` is set).
    pub fn set_max_width(&mut self, max_width: f32, force: bool) -> bool {
        let changed = max_width != self.max_width;
        self.max_width = max_width;
        if force || (changed && self.is_wrap_enabled()) {
            self.invalidate_cache();
            return true;
        }
        false
    }

    /// Replace the font style. Returns whether the cache was invalidated.
    pub fn set_font_style(&mut self, style: FontStyle) -> bool {
        if style == self.style {
            return false;
        }
        self.style = style;
        self.invalidate_cache();
        true
    }

    /// Mark the whole cache stale without recomputing.
    pub fn invalidate_cache(&mut self) {
        self.pending = true;
    }

    /// Release the cache arrays and mark the cache pending.
    pub fn clear(&mut self) {
        self.visual_to_logical = Vec::new();
        self.visual_line_offset = Vec::new();
        self.logical_to_first_visual = Vec::new();
        self.line_padding = Vec::new();
        self.pending = true;
    }

    /// Rebuild the whole cache now. Stays pending while `doc` is loading.
    pub fn rebuild<D: Document + ?Sized>(&mut self, doc: &D) {
        if doc.is_loading() {
            self.pending = true;
            return;
        }

        let started = Instant::now();
        let line_count = doc.line_count();
        let whitespace_advance = self.wrap_whitespace_advance();
        self.visual_to_logical.clear();
        self.visual_line_offset.clear();
        self.logical_to_first_visual.clear();
        self.line_padding.clear();
        self.logical_to_first_visual.reserve(line_count);
        self.line_padding.reserve(line_count);
        self.visual_to_logical.reserve(line_count);
        self.visual_line_offset.reserve(line_count);

        for line in 0..line_count {
            let info = self.line_breaks(doc, line, whitespace_advance);
            self.logical_to_first_visual
                .push(VisibleIndex::new(self.visual_to_logical.len()));
            self.line_padding.push(info.padding_start);
            push_rows(
                line,
                &info,
                &mut self.visual_to_logical,
                &mut self.visual_line_offset,
            );
        }
        self.pending = false;

        tracing::debug!(
            lines = line_count,
            visual_lines = self.visual_to_logical.len(),
            mode = %self.config.mode,
            elapsed_us = started.elapsed().as_micros() as u64,
            "view projection rebuilt"
        );
        debug_assert!(self.is_consistent());
    }

    /// Refresh the cache after an edit.
    ///
    /// `from_line..=to_line` is the range the edit touched, in pre-edit line
    /// numbers; `total_line_count` is the document's line count after the edit.
    /// Only the touched lines are re-measured; rows and line numbers below them
    /// shift by the resulting delta. Calling it again without an intervening
    /// edit leaves the cache unchanged. A pending cache is rebuilt in full.
    ///
    /// A range that is reversed or reaches past the cached lines is rejected
    /// with [`ProjectionError::LineOutOfRange`].
    pub fn update_cache<D: Document + ?Sized>(
        &mut self,
        doc: &D,
        from_line: usize,
        to_line: usize,
        total_line_count: usize,
    ) -> Result<(), ProjectionError> {
        if self.pending {
            return self.ensure_built(doc);
        }

        let old_count = self.logical_to_first_visual.len();
        if from_line > to_line || from_line >= old_count {
            return Err(ProjectionError::LineOutOfRange {
                line: from_line,
                line_count: old_count,
            });
        }
        if to_line >= old_count {
            return Err(ProjectionError::LineOutOfRange {
                line: to_line,
                line_count: old_count,
            });
        }

        let line_delta = total_line_count as isize - old_count as isize;
        let new_to = to_line as isize + line_delta;
        if total_line_count != doc.line_count() || new_to < from_line as isize {
            tracing::warn!(
                from_line,
                to_line,
                total_line_count,
                document_lines = doc.line_count(),
                cached_lines = old_count,
                "inconsistent projection update, rebuilding"
            );
            self.rebuild(doc);
            return self.ensure_built(doc);
        }
        let new_to = new_to as usize;

        let old_first = self.logical_to_first_visual[from_line].get();
        let old_end = self.first_visual_after(to_line);

        let mut rows = Vec::with_capacity(old_end - old_first);
        let mut offsets = Vec::with_capacity(old_end - old_first);
        let mut firsts = Vec::with_capacity(new_to - from_line + 1);
        let mut paddings = Vec::with_capacity(new_to - from_line + 1);
        let whitespace_advance = self.wrap_whitespace_advance();
        for line in from_line..=new_to {
            let info = self.line_breaks(doc, line, whitespace_advance);
            firsts.push(VisibleIndex::new(old_first + rows.len()));
            paddings.push(info.padding_start);
            push_rows(line, &info, &mut rows, &mut offsets);
        }

        let new_rows = rows.len();
        let visual_delta = new_rows as isize - (old_end - old_first) as isize;
        self.visual_to_logical.splice(old_first..old_end, rows);
        self.visual_line_offset.splice(old_first..old_end, offsets);
        self.logical_to_first_visual.splice(from_line..=to_line, firsts);
        self.line_padding.splice(from_line..=to_line, paddings);

        if line_delta != 0 {
            for position in &mut self.visual_to_logical[old_first + new_rows..] {
                position.line = position.line.saturating_add_signed(line_delta);
            }
        }
        if visual_delta != 0 {
            for first in &mut self.logical_to_first_visual[new_to + 1..] {
                *first = first.offset(visual_delta);
            }
        }

        tracing::trace!(
            from_line,
            to_line = new_to,
            line_delta,
            visual_delta,
            "view projection updated"
        );
        debug_assert!(self.is_consistent());
        Ok(())
    }

    /// Total number of visual lines.
    pub fn visible_lines_count<D: Document + ?Sized>(
        &mut self,
        doc: &D,
    ) -> Result<usize, ProjectionError> {
        self.ensure_built(doc)?;
        Ok(self.visual_to_logical.len())
    }

    /// First (or, with `prefer_last`, last) visual row of `line`.
    pub fn to_visible_index<D: Document + ?Sized>(
        &mut self,
        doc: &D,
        line: usize,
        prefer_last: bool,
    ) -> Result<VisibleIndex, ProjectionError> {
        self.ensure_built(doc)?;
        let first = self.first_visual(line)?;
        if prefer_last {
            Ok(VisibleIndex::new(self.first_visual_after(line) - 1))
        } else {
            Ok(first)
        }
    }

    /// Logical line shown by visual row `index`.
    pub fn logical_line_at<D: Document + ?Sized>(
        &mut self,
        doc: &D,
        index: VisibleIndex,
    ) -> Result<usize, ProjectionError> {
        Ok(self.visible_index_position(doc, index)?.line)
    }

    /// Logical line and start column of visual row `index`.
    pub fn visible_index_position<D: Document + ?Sized>(
        &mut self,
        doc: &D,
        index: VisibleIndex,
    ) -> Result<TextPosition, ProjectionError> {
        self.ensure_built(doc)?;
        let row = self.row(index)?;
        Ok(self.visual_to_logical[row])
    }

    /// Visual rows of `line` and its continuation padding.
    pub fn visible_line_info<D: Document + ?Sized>(
        &mut self,
        doc: &D,
        line: usize,
    ) -> Result<VisibleLineInfo, ProjectionError> {
        self.ensure_built(doc)?;
        let first = self.first_visual(line)?.get();
        let end = self.first_visual_after(line);
        Ok(VisibleLineInfo {
            visible_index: VisibleIndex::new(first),
            padding_start: self.line_padding[line],
            visual_lines: (first..end).map(VisibleIndex::new).collect(),
        })
    }

    /// x-offset at which visual row `index` starts.
    pub fn visual_line_offset<D: Document + ?Sized>(
        &mut self,
        doc: &D,
        index: VisibleIndex,
    ) -> Result<f32, ProjectionError> {
        self.ensure_built(doc)?;
        let row = self.row(index)?;
        Ok(self.visual_line_offset[row])
    }

    /// Whether `line` spans more than one visual row.
    pub fn is_wrapped_line<D: Document + ?Sized>(
        &mut self,
        doc: &D,
        line: usize,
    ) -> Result<bool, ProjectionError> {
        self.ensure_built(doc)?;
        let first = self.first_visual(line)?.get();
        Ok(self.first_visual_after(line) - first > 1)
    }

    /// Distance from the top of the document to visual row `index`.
    pub fn line_y_offset(index: VisibleIndex, line_height: f32) -> f32 {
        index.get() as f32 * line_height
    }

    /// Distance from the top of the document to the first row of `line`.
    pub fn logical_line_y_offset<D: Document + ?Sized>(
        &mut self,
        doc: &D,
        line: usize,
        line_height: f32,
    ) -> Result<f32, ProjectionError> {
        let index = self.to_visible_index(doc, line, false)?;
        Ok(Self::line_y_offset(index, line_height))
    }

    /// The visual row containing `position` and the columns it covers.
    ///
    /// A caret sitting exactly on a wrap point belongs to the row it starts,
    /// unless `allow_visual_line_end` is set, in which case it is reported at
    /// the end of the previous row.
    pub fn visible_line_range<D: Document + ?Sized>(
        &mut self,
        doc: &D,
        position: TextPosition,
        allow_visual_line_end: bool,
    ) -> Result<VisibleLineRange, ProjectionError> {
        self.ensure_built(doc)?;
        let first = self.first_visual(position.line)?.get();
        let end = self.first_visual_after(position.line);
        let rows = &self.visual_to_logical[first..end];

        let mut row = rows
            .partition_point(|start| start.column <= position.column)
            .max(1)
            - 1;
        if allow_visual_line_end && row > 0 && rows[row].column == position.column {
            row -= 1;
        }

        let index = VisibleIndex::new(first + row);
        let range = self.row_range(doc, first + row, end);
        Ok(VisibleLineRange {
            visible_index: index,
            range,
        })
    }

    /// Columns shown by visual row `index`.
    pub fn visible_index_range<D: Document + ?Sized>(
        &mut self,
        doc: &D,
        index: VisibleIndex,
    ) -> Result<TextRange, ProjectionError> {
        self.ensure_built(doc)?;
        let row = self.row(index)?;
        let line = self.visual_to_logical[row].line;
        let end = self.first_visual_after(line);
        Ok(self.row_range(doc, row, end))
    }

    /// Whether any visual row of `line` is inside `viewport`.
    pub fn is_line_visible<D: Document + ?Sized>(
        &mut self,
        doc: &D,
        line: usize,
        viewport: &Viewport,
    ) -> Result<bool, ProjectionError> {
        let first = self.to_visible_index(doc, line, false)?;
        let last = self.to_visible_index(doc, line, true)?;
        Ok(viewport.intersects(first, last))
    }

    fn ensure_built<D: Document + ?Sized>(&mut self, doc: &D) -> Result<(), ProjectionError> {
        if self.pending {
            self.rebuild(doc);
            if self.pending {
                return Err(ProjectionError::Pending);
            }
        }
        Ok(())
    }

    /// Space advance for one measuring pass; the font is not consulted without wrapping.
    fn wrap_whitespace_advance(&self) -> f32 {
        if self.is_wrap_enabled() {
            self.style.whitespace_advance()
        } else {
            0.0
        }
    }

    fn line_breaks<D: Document + ?Sized>(
        &self,
        doc: &D,
        line: usize,
        whitespace_advance: f32,
    ) -> LineWrapInfo {
        match doc.line_text(line) {
            Some(text) => compute_line_breaks_with_config(
                &text,
                &self.style,
                &self.config,
                self.max_width,
                whitespace_advance,
            ),
            None => LineWrapInfo::trivial(),
        }
    }

    fn first_visual(&self, line: usize) -> Result<VisibleIndex, ProjectionError> {
        self.logical_to_first_visual
            .get(line)
            .copied()
            .ok_or(ProjectionError::LineOutOfRange {
                line,
                line_count: self.logical_to_first_visual.len(),
            })
    }

    /// One past the last visual row of `line` (which must exist).
    fn first_visual_after(&self, line: usize) -> usize {
        self.logical_to_first_visual
            .get(line + 1)
            .map_or(self.visual_to_logical.len(), |first| first.get())
    }

    fn row(&self, index: VisibleIndex) -> Result<usize, ProjectionError> {
        if index.is_valid() && index.get() < self.visual_to_logical.len() {
            Ok(index.get())
        } else {
            Err(ProjectionError::VisibleIndexOutOfRange {
                index: index.get(),
                visible_count: self.visual_to_logical.len(),
            })
        }
    }

    /// Columns of `row`, where `line_end` is one past the last row of its line.
    fn row_range<D: Document + ?Sized>(&self, doc: &D, row: usize, line_end: usize) -> TextRange {
        let start = self.visual_to_logical[row];
        let end_column = if row + 1 < line_end {
            self.visual_to_logical[row + 1].column
        } else {
            doc.line_text(start.line)
                .map_or(start.column, |text| text.chars().count())
        };
        TextRange::new(start, TextPosition::new(start.line, end_column))
    }

    fn is_consistent(&self) -> bool {
        if self.visual_to_logical.len() != self.visual_line_offset.len()
            || self.logical_to_first_visual.len() != self.line_padding.len()
        {
            return false;
        }
        let rows = self.visual_to_logical.len();
        self.logical_to_first_visual
            .iter()
            .enumerate()
            .all(|(line, first)| {
                let first = first.get();
                first < rows
                    && self.visual_to_logical[first] == TextPosition::new(line, 0)
                    && self
                        .logical_to_first_visual
                        .get(line + 1)
                        .is_none_or(|next| next.get() > first)
            })
    }
}

fn push_rows(
    line: usize,
    info: &LineWrapInfo,
    rows: &mut Vec<TextPosition>,
    offsets: &mut Vec<f32>,
) {
    for (row, &column) in info.wraps.iter().enumerate() {
        rows.push(TextPosition::new(line, column));
        offsets.push(if row == 0 { 0.0 } else { info.padding_start });
    }
}
