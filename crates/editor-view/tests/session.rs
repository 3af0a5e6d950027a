use std::sync::Arc;
use std::time::Duration;

use editor_view::{
    CellMetrics, EditSession, EditorConfig, EditorError, FontStyle, HistoryConfig,
    ProjectionError, TextPosition, TextRange, VisibleIndex, WrapConfig, WrapMode,
};
use pretty_assertions::assert_eq;

fn ms(millis: u64) -> Duration {
    Duration::from_millis(millis)
}

fn new_session(text: &str, mode: WrapMode, width: f32) -> EditSession {
    let config = EditorConfig::default().with_wrap(WrapConfig::default().with_mode(mode));
    EditSession::new(
        text,
        FontStyle::new(Arc::new(CellMetrics::new(1.0)), 12),
        config,
        width,
    )
}

#[test]
fn test_typing_burst_undone_in_one_step() {
    let mut session = new_session("", WrapMode::NoWrap, 80.0);
    for (i, ch) in ["a", "b", "c"].into_iter().enumerate() {
        session
            .insert_at(TextPosition::new(0, i), ch, ms(i as u64 * 100))
            .unwrap();
    }
    session
        .insert_at(TextPosition::new(0, 3), " later", ms(5_000))
        .unwrap();

    session.undo().unwrap();
    assert_eq!(session.text(), "abc");
    session.undo().unwrap();
    assert_eq!(session.text(), "");
    assert!(!session.can_undo());

    session.redo().unwrap();
    assert_eq!(session.text(), "abc");
    session.redo().unwrap();
    assert_eq!(session.text(), "abc later");
    assert!(!session.can_redo());
}

#[test]
fn test_wrapping_tracks_edits() {
    let mut session = new_session("one\ntwo\nthree", WrapMode::Word, 10.0);
    assert_eq!(session.visible_lines_count(), Ok(3));

    session
        .insert_at(TextPosition::new(1, 3), " is a longer line now", ms(0))
        .unwrap();
    let info = session.visible_line_info(1).unwrap();
    assert!(info.visual_lines.len() > 1);
    let third = session.to_visible_index(2, false).unwrap();
    assert_eq!(
        session.visible_index_position(third),
        Ok(TextPosition::new(2, 0))
    );

    session
        .remove_at(
            TextRange::new(TextPosition::new(0, 3), TextPosition::new(2, 0)),
            ms(1_000),
        )
        .unwrap();
    assert_eq!(session.text(), "onethree");
    assert_eq!(session.visible_lines_count(), Ok(1));

    session.undo().unwrap();
    session.undo().unwrap();
    assert_eq!(session.text(), "one\ntwo\nthree");
    assert_eq!(session.visible_lines_count(), Ok(3));
}

#[test]
fn test_switching_wrap_mode() {
    let mut session = new_session("aaaa bbbb cccc dddd", WrapMode::NoWrap, 10.0);
    assert_eq!(session.visible_lines_count(), Ok(1));
    assert!(session.set_wrap_mode(WrapMode::Word));
    assert_eq!(session.visible_lines_count(), Ok(2));
    assert!(session.set_max_width(5.0));
    assert_eq!(session.visible_lines_count(), Ok(4));
    assert!(!session.set_wrap_mode(WrapMode::Word));
}

#[test]
fn test_caret_row() {
    let mut session = new_session("hello world foo", WrapMode::Word, 11.0);
    session
        .set_selection(TextRange::caret(TextPosition::new(0, 13)))
        .unwrap();
    let row = session.caret_visible_line().unwrap();
    assert_eq!(row.visible_index, VisibleIndex::new(1));
    assert_eq!(
        row.range,
        TextRange::new(TextPosition::new(0, 12), TextPosition::new(0, 15))
    );
}

#[test]
fn test_invalid_selection_rejected() {
    let mut session = new_session("abc", WrapMode::NoWrap, 80.0);
    let result = session.set_selection(TextRange::caret(TextPosition::new(0, 9)));
    assert!(matches!(result, Err(EditorError::Document(_))));
    assert_eq!(session.selection(), TextRange::default());
}

#[test]
fn test_scrolling() {
    let text = (0..50)
        .map(|i| format!("line {i}"))
        .collect::<Vec<_>>()
        .join("\n");
    let mut session = new_session(&text, WrapMode::NoWrap, 80.0);
    session.viewport_mut().set_height(Some(10));

    assert_eq!(session.is_line_visible(20), Ok(false));
    assert_eq!(session.scroll_to_line(20), Ok(true));
    assert_eq!(session.is_line_visible(20), Ok(true));
    assert_eq!(session.viewport().scroll_top, VisibleIndex::new(11));
    assert_eq!(
        session.scroll_to_line(99),
        Err(ProjectionError::LineOutOfRange {
            line: 99,
            line_count: 50
        })
    );
}

#[test]
fn test_loading_state() {
    let mut session = new_session("abc", WrapMode::NoWrap, 80.0);
    session.set_loading(true);
    assert_eq!(session.visible_lines_count(), Err(ProjectionError::Pending));
    session.set_loading(false);
    assert_eq!(session.visible_lines_count(), Ok(1));
}

#[test]
fn test_history_bound_from_config() {
    let config = EditorConfig::default()
        .with_history(HistoryConfig::default().with_max_stack_size(4));
    let mut session = EditSession::new(
        "",
        FontStyle::new(Arc::new(CellMetrics::new(1.0)), 12),
        config,
        80.0,
    );
    for i in 0..10usize {
        session
            .insert_at(TextPosition::new(0, i), "x", ms(i as u64 * 1_000))
            .unwrap();
    }
    assert_eq!(session.history().undo_depth(), 4);
}
