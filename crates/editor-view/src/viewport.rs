//! Scroll state of a view.
//!
//! The projection never decides visibility itself; it asks a [`Viewport`].

use std::ops::Range;

use crate::visible_index::VisibleIndex;

/// Vertical scroll position and height, in visual lines.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Viewport {
    /// First visual line shown.
    pub scroll_top: VisibleIndex,
    /// Number of visual lines shown (`None` = unlimited, determined by the frontend).
    pub height: Option<usize>,
}

impl Viewport {
    /// Viewport of `height` visual lines scrolled to the top.
    pub fn new(height: usize) -> Self {
        Self {
            scroll_top: VisibleIndex::ZERO,
            height: Some(height),
        }
    }

    /// Viewport that shows everything.
    pub fn unbounded() -> Self {
        Self {
            scroll_top: VisibleIndex::ZERO,
            height: None,
        }
    }

    /// Set viewport height
    pub fn set_height(&mut self, height: Option<usize>) {
        self.height = height;
    }

    /// Visible visual line range (end exclusive), before clamping to the document.
    pub fn visible_range(&self) -> Range<usize> {
        let top = self.scroll_top.get();
        match self.height {
            Some(height) => top..top.saturating_add(height),
            None => top..usize::MAX,
        }
    }

    /// Whether `index` is on screen.
    pub fn contains(&self, index: VisibleIndex) -> bool {
        index.is_valid() && self.visible_range().contains(&index.get())
    }

    /// Whether any visual line in `first..=last` is on screen.
    pub fn intersects(&self, first: VisibleIndex, last: VisibleIndex) -> bool {
        if !first.is_valid() || !last.is_valid() {
            return false;
        }
        let range = self.visible_range();
        first.get() < range.end && last.get() >= range.start
    }

    /// Scroll so that `index` is the first visible line. Returns whether the position changed.
    pub fn scroll_to(&mut self, index: VisibleIndex) -> bool {
        if !index.is_valid() || index == self.scroll_top {
            return false;
        }
        self.scroll_top = index;
        true
    }

    /// Scroll by `delta` visual lines (saturating at the top).
    pub fn scroll_by(&mut self, delta: isize) -> bool {
        self.scroll_to(self.scroll_top.offset(delta))
    }

    /// Scroll the minimum amount needed to bring `index` on screen.
    pub fn ensure_visible(&mut self, index: VisibleIndex) -> bool {
        if !index.is_valid() || self.contains(index) {
            return false;
        }
        if index < self.scroll_top {
            return self.scroll_to(index);
        }
        match self.height {
            Some(height) if height > 0 => {
                self.scroll_to(VisibleIndex::new(index.get() + 1 - height))
            }
            _ => self.scroll_to(index),
        }
    }

    /// Keep the scroll position inside a document of `total` visual lines.
    pub fn clamp_to(&mut self, total: usize) -> bool {
        let height = self.height.unwrap_or(0).max(1);
        let max_top = total.saturating_sub(height);
        if self.scroll_top.get() > max_top {
            self.scroll_top = VisibleIndex::new(max_top);
            return true;
        }
        false
    }
}

impl Default for Viewport {
    fn default() -> Self {
        Self::unbounded()
    }
}
