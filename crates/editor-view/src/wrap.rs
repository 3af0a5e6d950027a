//! Line wrapping (headless line-break calculator)
//!
//! Computes where a single logical line breaks into visual rows for a given
//! width, using glyph advances from a [`FontMetrics`](crate::FontMetrics)
//! provider. The calculation is a pure function of its inputs.

use std::fmt;
use std::str::FromStr;

use crate::metrics::FontStyle;

/// Default tab width (in whitespace advances).
pub const DEFAULT_TAB_WIDTH: u32 = 4;

/// Soft wrapping mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
pub enum WrapMode {
    /// No soft wrapping (each logical line is a single visual line).
    #[default]
    NoWrap,
    /// Wrap at any character.
    Letter,
    /// Prefer wrapping after a break candidate (space, period, hyphen, comma),
    /// falling back to letter wrap.
    Word,
}

impl WrapMode {
    /// Lowercase name, as accepted by [`FromStr`].
    pub fn as_str(self) -> &'static str {
        match self {
            WrapMode::NoWrap => "nowrap",
            WrapMode::Letter => "letter",
            WrapMode::Word => "word",
        }
    }
}

impl fmt::Display for WrapMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error returned when parsing an unknown [`WrapMode`] name.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown wrap mode '{0}' (expected nowrap, letter or word)")]
pub struct ParseWrapModeError(String);

impl FromStr for WrapMode {
    type Err = ParseWrapModeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "nowrap" | "none" => Ok(WrapMode::NoWrap),
            "letter" => Ok(WrapMode::Letter),
            "word" => Ok(WrapMode::Word),
            _ => Err(ParseWrapModeError(s.to_string())),
        }
    }
}

/// Wrap configuration of a view.
///
/// Any change invalidates every computed line break.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct WrapConfig {
    /// Soft wrapping mode.
    pub mode: WrapMode,
    /// Indent continuation rows by the width of the line's leading whitespace.
    pub keep_indentation: bool,
    /// Tab width in whitespace advances.
    pub tab_width: u32,
    /// Wrap at this many whitespace advances even if the view is wider.
    pub max_characters_width: Option<u32>,
}

impl Default for WrapConfig {
    fn default() -> Self {
        Self {
            mode: WrapMode::NoWrap,
            keep_indentation: true,
            tab_width: DEFAULT_TAB_WIDTH,
            max_characters_width: None,
        }
    }
}

impl WrapConfig {
    /// Set the wrap mode.
    pub fn with_mode(mut self, mode: WrapMode) -> Self {
        self.mode = mode;
        self
    }

    /// Enable or disable continuation indentation.
    pub fn with_keep_indentation(mut self, keep_indentation: bool) -> Self {
        self.keep_indentation = keep_indentation;
        self
    }

    /// Set the tab width (clamped to at least 1).
    pub fn with_tab_width(mut self, tab_width: u32) -> Self {
        self.tab_width = tab_width.max(1);
        self
    }

    /// Wrap at a fixed column count instead of the full view width.
    pub fn with_max_characters_width(mut self, columns: Option<u32>) -> Self {
        self.max_characters_width = columns;
        self
    }
}

/// Break offsets of one logical line.
#[derive(Debug, Clone, PartialEq)]
pub struct LineWrapInfo {
    /// Column offsets where each visual row starts. Never empty; first element is 0.
    pub wraps: Vec<usize>,
    /// Width of the preserved indentation applied to continuation rows.
    pub padding_start: f32,
}

impl LineWrapInfo {
    /// A single unwrapped row.
    pub fn trivial() -> Self {
        Self {
            wraps: vec![0],
            padding_start: 0.0,
        }
    }

    /// Number of visual rows.
    pub fn visual_line_count(&self) -> usize {
        self.wraps.len()
    }

    /// Whether the line spans more than one visual row.
    pub fn is_wrapped(&self) -> bool {
        self.wraps.len() > 1
    }
}

impl Default for LineWrapInfo {
    fn default() -> Self {
        Self::trivial()
    }
}

/// Inputs of [`compute_line_breaks`] besides the text and the font.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct WrapParams {
    /// Available width. Must be positive when wrapping.
    pub max_width: f32,
    /// Wrap mode.
    pub mode: WrapMode,
    /// Indent continuation rows by the leading whitespace width.
    pub keep_indentation: bool,
    /// Tab width in whitespace advances.
    pub tab_width: u32,
    /// Advance of a space; measured from the font when `None`.
    pub whitespace_advance: Option<f32>,
    /// x-offset at which the line starts.
    pub initial_x_offset: f32,
}

impl WrapParams {
    /// Parameters for `mode` at `max_width` with defaults for the rest.
    pub fn new(max_width: f32, mode: WrapMode) -> Self {
        Self {
            max_width,
            mode,
            keep_indentation: false,
            tab_width: DEFAULT_TAB_WIDTH,
            whitespace_advance: None,
            initial_x_offset: 0.0,
        }
    }

    /// Parameters derived from a [`WrapConfig`].
    pub fn from_config(config: &WrapConfig, max_width: f32) -> Self {
        Self {
            max_width,
            mode: config.mode,
            keep_indentation: config.keep_indentation,
            tab_width: config.tab_width,
            whitespace_advance: None,
            initial_x_offset: 0.0,
        }
    }

    /// Set continuation indentation.
    pub fn with_keep_indentation(mut self, keep_indentation: bool) -> Self {
        self.keep_indentation = keep_indentation;
        self
    }

    /// Set the tab width.
    pub fn with_tab_width(mut self, tab_width: u32) -> Self {
        self.tab_width = tab_width;
        self
    }

    /// Use a known whitespace advance instead of measuring it.
    pub fn with_whitespace_advance(mut self, advance: f32) -> Self {
        self.whitespace_advance = Some(advance);
        self
    }

    /// Start measuring at `x`.
    pub fn with_initial_x_offset(mut self, x: f32) -> Self {
        self.initial_x_offset = x;
        self
    }
}

/// Whether `ch` belongs to the leading indentation scanned for padding.
fn is_indent_whitespace(ch: char) -> bool {
    matches!(ch, ' ' | '\t' | '\n' | '\u{000B}' | '\u{000C}' | '\r')
}

/// Whether `ch` is a word-wrap break candidate.
pub fn is_break_candidate(ch: char) -> bool {
    matches!(ch, ' ' | '.' | '-' | ',')
}

/// Advance of a tab starting at `x`.
///
/// With tab stops, the tab reaches the next multiple of
/// `tab_width * whitespace_advance` strictly after `x`; otherwise it is a fixed
/// `tab_width * whitespace_advance`.
pub fn tab_advance(x: f32, tab_width: u32, whitespace_advance: f32, tab_stops: bool) -> f32 {
    let tab_size = tab_width.max(1) as f32 * whitespace_advance;
    if !tab_stops || tab_size <= 0.0 {
        return tab_size.max(0.0);
    }
    let next_stop = ((x / tab_size).floor() + 1.0) * tab_size;
    next_stop - x
}

/// Width actually available for wrapping, honoring [`WrapConfig::max_characters_width`].
pub fn effective_max_width(config: &WrapConfig, max_width: f32, whitespace_advance: f32) -> f32 {
    match config.max_characters_width {
        Some(columns) if columns > 0 && whitespace_advance > 0.0 => {
            let column_width = columns as f32 * whitespace_advance;
            if max_width > 0.0 {
                max_width.min(column_width)
            } else {
                column_width
            }
        }
        _ => max_width,
    }
}

/// Per-line measuring state shared by the indentation scan and the main scan.
struct Measurer<'a> {
    style: &'a FontStyle,
    whitespace_advance: f32,
    tab_width: u32,
    monospace: bool,
    prev: Option<char>,
}

impl Measurer<'_> {
    fn advance(&mut self, ch: char, x: f32) -> f32 {
        let mut w = if ch == '\t' {
            tab_advance(x, self.tab_width, self.whitespace_advance, self.style.tab_stops)
        } else if self.monospace {
            self.whitespace_advance
        } else {
            self.style.advance(ch).unwrap_or(0.0)
        };

        if !self.monospace && self.style.kerning && ch != '\r' {
            if let (Some(prev), Some(font)) = (self.prev, self.style.font.as_ref()) {
                w += font.kerning(prev, ch, self.style.character_size);
            }
            self.prev = Some(ch);
        }
        w
    }
}

/// Rendered width of the leading indentation of `text`.
///
/// Returns 0 when the line is empty or consists only of whitespace.
pub fn leading_indentation_width(
    text: &str,
    style: &FontStyle,
    tab_width: u32,
    whitespace_advance: f32,
) -> f32 {
    let Some(font) = style.font.as_ref() else {
        return 0.0;
    };
    if !text.chars().any(|ch| !is_indent_whitespace(ch)) {
        return 0.0;
    }

    let mut measurer = Measurer {
        style,
        whitespace_advance,
        tab_width,
        monospace: font.is_monospace(),
        prev: None,
    };
    let mut x = 0.0f32;
    for ch in text.chars().take_while(|ch| is_indent_whitespace(*ch)) {
        x += measurer.advance(ch, x);
    }
    x
}

/// Compute the visual row starts of one logical line.
///
/// `text` must not contain the line terminator. The result always starts with
/// column 0 and is strictly increasing. Returns [`LineWrapInfo::trivial`] without
/// consulting the font when wrapping is off, the line is empty, there is no
/// font, or `max_width` is not a positive finite number.
pub fn compute_line_breaks(text: &str, style: &FontStyle, params: &WrapParams) -> LineWrapInfo {
    let mut info = LineWrapInfo::trivial();
    let max_width = params.max_width;
    if params.mode == WrapMode::NoWrap
        || text.is_empty()
        || !max_width.is_finite()
        || max_width <= 0.0
    {
        return info;
    }
    let Some(font) = style.font.as_ref() else {
        return info;
    };

    let whitespace_advance = match params.whitespace_advance {
        Some(advance) if advance > 0.0 => advance,
        _ => style.whitespace_advance(),
    };

    if params.keep_indentation {
        let width =
            leading_indentation_width(text, style, params.tab_width, whitespace_advance);
        info.padding_start = width.min((max_width - whitespace_advance).max(0.0));
    }

    let mut measurer = Measurer {
        style,
        whitespace_advance,
        tab_width: params.tab_width,
        monospace: font.is_monospace(),
        prev: None,
    };

    let mut x = params.initial_x_offset;
    // (index, x at that point) of the most recent break candidate on this row
    let mut candidate: Option<(usize, f32)> = None;
    let mut row_start = 0usize;
    let char_count = text.chars().count();

    for (idx, ch) in text.chars().enumerate() {
        let w = measurer.advance(ch, x);
        x += w;

        if x > max_width {
            match candidate {
                // Trailing separator hangs past the edge; the next row starts after it.
                _ if params.mode == WrapMode::Word && is_break_candidate(ch) => {
                    if idx + 1 < char_count {
                        row_start = idx + 1;
                        info.wraps.push(row_start);
                        x = info.padding_start;
                    }
                }
                Some((candidate_idx, candidate_x)) if params.mode == WrapMode::Word => {
                    row_start = candidate_idx + 1;
                    info.wraps.push(row_start);
                    x = info.padding_start + w + (x - candidate_x);
                }
                _ if idx > row_start => {
                    row_start = idx;
                    info.wraps.push(row_start);
                    x = info.padding_start + w;
                }
                // A glyph wider than the whole row keeps its own row.
                _ => {}
            }
            candidate = None;
        } else if is_break_candidate(ch) {
            candidate = Some((idx, x));
        }
    }

    info
}

/// [`compute_line_breaks`] driven by a [`WrapConfig`].
pub fn compute_line_breaks_with_config(
    text: &str,
    style: &FontStyle,
    config: &WrapConfig,
    max_width: f32,
    whitespace_advance: f32,
) -> LineWrapInfo {
    let max_width = effective_max_width(config, max_width, whitespace_advance);
    let mut params = WrapParams::from_config(config, max_width);
    if whitespace_advance > 0.0 {
        params = params.with_whitespace_advance(whitespace_advance);
    }
    compute_line_breaks(text, style, &params)
}
