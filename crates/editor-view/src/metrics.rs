//! Glyph metrics provider.
//!
//! The wrap calculator never touches a font directly; it asks a [`FontMetrics`]
//! implementation for advances and kerning. The provider is injected through
//! [`FontStyle`] and shared read-only.

use std::fmt;
use std::sync::Arc;

use unicode_width::UnicodeWidthChar;

/// Axis-aligned rectangle in glyph space.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct GlyphRect {
    /// Left edge.
    pub left: f32,
    /// Top edge.
    pub top: f32,
    /// Width.
    pub width: f32,
    /// Height.
    pub height: f32,
}

/// Metrics of a single glyph.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Glyph {
    /// Horizontal distance to the next glyph origin.
    pub advance: f32,
    /// Bounding box relative to the baseline.
    pub bounds: GlyphRect,
    /// Location of the glyph in the texture atlas.
    pub texture_rect: GlyphRect,
}

/// Source of per-codepoint advance widths and kerning.
pub trait FontMetrics: fmt::Debug {
    /// Glyph metrics for `codepoint` at the given style.
    fn glyph(
        &self,
        codepoint: char,
        character_size: u32,
        bold: bool,
        italic: bool,
        outline_thickness: f32,
    ) -> Glyph;

    /// Kerning adjustment between two consecutive codepoints.
    fn kerning(&self, first: char, second: char, character_size: u32) -> f32;

    /// Hint that every glyph has the same advance.
    fn is_monospace(&self) -> bool;
}

/// Font handle plus the style attributes that affect measurement.
#[derive(Debug, Clone)]
pub struct FontStyle {
    /// Metrics provider. `None` disables wrapping.
    pub font: Option<Arc<dyn FontMetrics>>,
    /// Character size passed to the provider.
    pub character_size: u32,
    /// Bold variant.
    pub bold: bool,
    /// Italic variant.
    pub italic: bool,
    /// Outline thickness passed to the provider.
    pub outline_thickness: f32,
    /// Apply kerning between consecutive codepoints.
    pub kerning: bool,
    /// Align tabs to tab stops. When disabled a tab is a fixed-width advance.
    pub tab_stops: bool,
}

impl FontStyle {
    /// Style using `font` at `character_size`, regular weight, kerning and tab stops enabled.
    pub fn new(font: Arc<dyn FontMetrics>, character_size: u32) -> Self {
        Self {
            font: Some(font),
            character_size,
            bold: false,
            italic: false,
            outline_thickness: 0.0,
            kerning: true,
            tab_stops: true,
        }
    }

    /// Style without a metrics provider; every line measures as unwrapped.
    pub fn without_font() -> Self {
        Self {
            font: None,
            character_size: 0,
            bold: false,
            italic: false,
            outline_thickness: 0.0,
            kerning: true,
            tab_stops: true,
        }
    }

    /// Set bold.
    pub fn with_bold(mut self, bold: bool) -> Self {
        self.bold = bold;
        self
    }

    /// Set italic.
    pub fn with_italic(mut self, italic: bool) -> Self {
        self.italic = italic;
        self
    }

    /// Enable or disable kerning.
    pub fn with_kerning(mut self, kerning: bool) -> Self {
        self.kerning = kerning;
        self
    }

    /// Enable or disable tab-stop alignment.
    pub fn with_tab_stops(mut self, tab_stops: bool) -> Self {
        self.tab_stops = tab_stops;
        self
    }

    /// Advance of `codepoint` in this style, or `None` without a provider.
    pub fn advance(&self, codepoint: char) -> Option<f32> {
        let font = self.font.as_ref()?;
        Some(
            font.glyph(
                codepoint,
                self.character_size,
                self.bold,
                self.italic,
                self.outline_thickness,
            )
            .advance,
        )
    }

    /// Advance of the space glyph; `0.0` without a provider.
    pub fn whitespace_advance(&self) -> f32 {
        self.advance(' ').unwrap_or(0.0)
    }
}

impl PartialEq for FontStyle {
    fn eq(&self, other: &Self) -> bool {
        let same_font = match (&self.font, &other.font) {
            (Some(a), Some(b)) => Arc::ptr_eq(a, b),
            (None, None) => true,
            _ => false,
        };
        same_font
            && self.character_size == other.character_size
            && self.bold == other.bold
            && self.italic == other.italic
            && self.outline_thickness == other.outline_thickness
            && self.kerning == other.kerning
            && self.tab_stops == other.tab_stops
    }
}

/// Calculate visual width of a character in cells (based on UAX #11).
///
/// - 1: narrow characters (ASCII, etc.)
/// - 2: wide characters (CJK, fullwidth, most emoji)
/// - 0: zero-width characters (combining marks, etc.)
///
/// Control characters have no UAX #11 width and count as one cell.
pub fn char_width(ch: char) -> usize {
    UnicodeWidthChar::width(ch).unwrap_or(1)
}

/// Terminal-style metrics: every glyph advances by its cell width times `cell_width`.
///
/// Wide characters take two cells, so the provider does not claim to be monospace.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CellMetrics {
    cell_width: f32,
}

impl CellMetrics {
    /// Provider with `cell_width` units per cell.
    pub fn new(cell_width: f32) -> Self {
        Self { cell_width }
    }
}

impl Default for CellMetrics {
    fn default() -> Self {
        Self::new(1.0)
    }
}

impl FontMetrics for CellMetrics {
    fn glyph(&self, codepoint: char, _: u32, _: bool, _: bool, _: f32) -> Glyph {
        let advance = char_width(codepoint) as f32 * self.cell_width;
        Glyph {
            advance,
            bounds: GlyphRect {
                width: advance,
                ..GlyphRect::default()
            },
            texture_rect: GlyphRect::default(),
        }
    }

    fn kerning(&self, _: char, _: char, _: u32) -> f32 {
        0.0
    }

    fn is_monospace(&self) -> bool {
        false
    }
}

/// Fixed-advance metrics for a true monospace font.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MonospaceMetrics {
    advance: f32,
}

impl MonospaceMetrics {
    /// Provider where every glyph advances by `advance`.
    pub fn new(advance: f32) -> Self {
        Self { advance }
    }
}

impl FontMetrics for MonospaceMetrics {
    fn glyph(&self, _: char, _: u32, _: bool, _: bool, _: f32) -> Glyph {
        Glyph {
            advance: self.advance,
            bounds: GlyphRect {
                width: self.advance,
                ..GlyphRect::default()
            },
            texture_rect: GlyphRect::default(),
        }
    }

    fn kerning(&self, _: char, _: char, _: u32) -> f32 {
        0.0
    }

    fn is_monospace(&self) -> bool {
        true
    }
}
