//! Soft-wrap a short document, edit it, and undo the edit.
//!
//! Run with `cargo run -p editor-view --example wrap_demo`.

use std::sync::Arc;
use std::time::Duration;

use editor_view::{
    CellMetrics, EditSession, EditorConfig, EditorError, FontStyle, TextPosition, VisibleIndex,
    WrapConfig, WrapMode,
};

fn print_rows(session: &mut EditSession) -> Result<(), EditorError> {
    let count = session.visible_lines_count()?;
    for i in 0..count {
        let index = VisibleIndex::new(i);
        let row = session.visible_row_text(index)?;
        println!("{i:>3} | {row}");
    }
    println!();
    Ok(())
}

fn main() -> Result<(), EditorError> {
    let text = "fn main() {\n    println!(\"the quick brown fox jumps over the lazy dog\");\n}";
    let config = EditorConfig::default().with_wrap(WrapConfig::default().with_mode(WrapMode::Word));
    let style = FontStyle::new(Arc::new(CellMetrics::new(1.0)), 12);
    let mut session = EditSession::new(text, style, config, 32.0);

    println!("word wrap at 32 columns:");
    print_rows(&mut session)?;

    session.insert_at(TextPosition::new(1, 4), "let _ = 1; ", Duration::ZERO)?;
    println!("after insert:");
    print_rows(&mut session)?;

    session.undo()?;
    session.set_max_width(20.0);
    println!("undone, narrowed to 20 columns:");
    print_rows(&mut session)?;
    Ok(())
}
