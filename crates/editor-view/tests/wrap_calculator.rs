use std::sync::Arc;

use editor_view::{
    CellMetrics, FontMetrics, FontStyle, Glyph, LineWrapInfo, MonospaceMetrics, WrapConfig,
    WrapMode, WrapParams, compute_line_breaks, compute_line_breaks_with_config,
};
use pretty_assertions::assert_eq;

/// Every glyph advances by `advance`; "AV" and "VA" kern by `kern`.
#[derive(Debug)]
struct KerningFont {
    advance: f32,
    kern: f32,
}

impl FontMetrics for KerningFont {
    fn glyph(&self, _: char, _: u32, _: bool, _: bool, _: f32) -> Glyph {
        Glyph {
            advance: self.advance,
            ..Glyph::default()
        }
    }

    fn kerning(&self, first: char, second: char, _: u32) -> f32 {
        match (first, second) {
            ('A', 'V') | ('V', 'A') => self.kern,
            _ => 0.0,
        }
    }

    fn is_monospace(&self) -> bool {
        false
    }
}

/// Advance 8; pairs ending in '\r' kern by -3 and "AV" by -2.
#[derive(Debug)]
struct CarriageReturnKerningFont;

impl FontMetrics for CarriageReturnKerningFont {
    fn glyph(&self, _: char, _: u32, _: bool, _: bool, _: f32) -> Glyph {
        Glyph {
            advance: 8.0,
            ..Glyph::default()
        }
    }

    fn kerning(&self, first: char, second: char, _: u32) -> f32 {
        match (first, second) {
            (_, '\r') => -3.0,
            ('A', 'V') => -2.0,
            _ => 0.0,
        }
    }

    fn is_monospace(&self) -> bool {
        false
    }
}

fn cells() -> FontStyle {
    FontStyle::new(Arc::new(CellMetrics::new(1.0)), 12)
}

fn kerning_font(advance: f32, kern: f32) -> FontStyle {
    FontStyle::new(Arc::new(KerningFont { advance, kern }), 12)
}

#[test]
fn test_word_wrap_moves_whole_word() {
    // maxWidth fits "hello world" exactly.
    let info = compute_line_breaks(
        "hello world foo",
        &cells(),
        &WrapParams::new(11.0, WrapMode::Word),
    );
    assert_eq!(info.wraps, vec![0, 12]);
    assert_eq!(info.padding_start, 0.0);
}

#[test]
fn test_letter_wrap_splits_mid_word() {
    let info = compute_line_breaks(
        "hello world foo",
        &cells(),
        &WrapParams::new(11.0, WrapMode::Letter),
    );
    assert_eq!(info.wraps, vec![0, 11]);
}

#[test]
fn test_word_wrap_long_paragraph() {
    let info = compute_line_breaks(
        "the quick brown fox jumps over the lazy dog",
        &cells(),
        &WrapParams::new(10.0, WrapMode::Word),
    );
    // "the quick " | "brown fox " | "jumps over " | "the lazy " | "dog"
    assert_eq!(info.wraps, vec![0, 10, 20, 31, 40]);
}

#[test]
fn test_tab_reaches_next_stop() {
    // Tab at x = 13 with a 4 * 8 tab stop ends at x = 32; "A" then ends at 40.
    let style = kerning_font(8.0, 0.0);
    let params = WrapParams::new(40.0, WrapMode::Letter)
        .with_tab_width(4)
        .with_whitespace_advance(8.0)
        .with_initial_x_offset(13.0);
    assert_eq!(compute_line_breaks("\tA", &style, &params).wraps, vec![0]);

    let narrower = WrapParams {
        max_width: 39.0,
        ..params
    };
    assert_eq!(compute_line_breaks("\tA", &style, &narrower).wraps, vec![0, 1]);
}

#[test]
fn test_tab_without_stops_is_fixed_width() {
    let style = kerning_font(8.0, 0.0).with_tab_stops(false);
    let params = WrapParams::new(40.0, WrapMode::Letter)
        .with_whitespace_advance(8.0)
        .with_initial_x_offset(13.0);
    // 13 + 32 already overflows; the tab keeps its row and "A" moves down.
    assert_eq!(compute_line_breaks("\tA", &style, &params).wraps, vec![0, 1]);
}

#[test]
fn test_kerning_applies_between_pairs() {
    // 5 * 8 - 4 * 2 = 32
    let params = WrapParams::new(32.0, WrapMode::Letter);
    assert_eq!(
        compute_line_breaks("AVAVA", &kerning_font(8.0, -2.0), &params).wraps,
        vec![0]
    );
    assert_eq!(
        compute_line_breaks("AVAVA", &kerning_font(8.0, -2.0).with_kerning(false), &params).wraps,
        vec![0, 4]
    );
}

#[test]
fn test_monospace_skips_glyph_lookup() {
    let style = FontStyle::new(Arc::new(MonospaceMetrics::new(10.0)), 12);
    let info = compute_line_breaks("abcdef", &style, &WrapParams::new(30.0, WrapMode::Letter));
    assert_eq!(info.wraps, vec![0, 3]);
}

#[test]
fn test_no_wrap_fast_path() {
    let text = "word ".repeat(10_000);
    let info = compute_line_breaks(&text, &cells(), &WrapParams::new(10.0, WrapMode::NoWrap));
    assert_eq!(info, LineWrapInfo::trivial());
}

#[test]
fn test_exact_fit_does_not_wrap() {
    let info = compute_line_breaks("abcde", &cells(), &WrapParams::new(5.0, WrapMode::Word));
    assert_eq!(info.wraps, vec![0]);
}

#[test]
fn test_trailing_space_does_not_add_empty_row() {
    let info = compute_line_breaks("abcde ", &cells(), &WrapParams::new(5.0, WrapMode::Word));
    assert_eq!(info.wraps, vec![0]);
}

#[test]
fn test_identical_inputs_identical_output() {
    let style = kerning_font(7.5, -0.5);
    let params = WrapParams::new(50.0, WrapMode::Word).with_keep_indentation(true);
    let text = "    AVA, VAV. lorem-ipsum dolor sit amet";
    assert_eq!(
        compute_line_breaks(text, &style, &params),
        compute_line_breaks(text, &style, &params)
    );
}

#[test]
fn test_continuation_padding() {
    let params = WrapParams::new(8.0, WrapMode::Word).with_keep_indentation(true);
    let info = compute_line_breaks("    aaa bbb ccc", &cells(), &params);
    assert_eq!(info.padding_start, 4.0);
    assert!(info.is_wrapped());
}

#[test]
fn test_config_column_limit() {
    let config = WrapConfig::default()
        .with_mode(WrapMode::Letter)
        .with_max_characters_width(Some(4));
    let info = compute_line_breaks_with_config("abcdefghij", &cells(), &config, 100.0, 1.0);
    assert_eq!(info.wraps, vec![0, 4, 8]);
}

#[test]
fn test_carriage_return_is_never_kerned() {
    let style = FontStyle::new(Arc::new(CarriageReturnKerningFont), 12);
    // 8 + 8 = 16 overflows 15.5; a -3 kern would have kept it on one row.
    let info = compute_line_breaks("x\r", &style, &WrapParams::new(15.5, WrapMode::Letter));
    assert_eq!(info.wraps, vec![0, 1]);
}

#[test]
fn test_kerning_pairs_across_carriage_return() {
    let style = FontStyle::new(Arc::new(CarriageReturnKerningFont), 12);
    // "A" and "V" still kern with the '\r' between them: 8 + 8 + 8 - 2 = 22.
    let fits = compute_line_breaks("A\rV", &style, &WrapParams::new(22.0, WrapMode::Letter));
    assert_eq!(fits.wraps, vec![0]);

    let info = compute_line_breaks("A\rV", &style, &WrapParams::new(21.5, WrapMode::Letter));
    assert_eq!(info.wraps, vec![0, 2]);
}
