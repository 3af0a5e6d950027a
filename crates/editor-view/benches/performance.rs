use std::sync::Arc;
use std::time::Duration;

use criterion::{BatchSize, Criterion, black_box, criterion_group, criterion_main};
use editor_view::{
    CellMetrics, Document, FontStyle, HistoryStack, TextBuffer, TextPosition, ViewProjection,
    WrapConfig, WrapMode, WrapParams, compute_line_breaks,
};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

const WIDTH: f32 = 80.0;

fn large_text(line_count: usize) -> String {
    let mut rng = StdRng::seed_from_u64(7);
    let words = ["the", "quick", "brown", "fox", "jumps", "over", "lazy", "dog", "\t"];
    let mut out = String::with_capacity(line_count * 96);
    for i in 0..line_count {
        out.push_str(&format!("{i:06}"));
        for _ in 0..rng.gen_range(0..30) {
            out.push(' ');
            out.push_str(words[rng.gen_range(0..words.len())]);
        }
        out.push('\n');
    }
    out.pop();
    out
}

fn style() -> FontStyle {
    FontStyle::new(Arc::new(CellMetrics::new(1.0)), 12)
}

fn word_view() -> ViewProjection {
    ViewProjection::new(style(), WrapConfig::default().with_mode(WrapMode::Word), WIDTH)
}

fn bench_line_breaks(c: &mut Criterion) {
    let line = "    the quick brown fox jumps over the lazy dog, ".repeat(40);
    let style = style();
    let params = WrapParams::new(WIDTH, WrapMode::Word).with_keep_indentation(true);
    c.bench_function("line_breaks/word_2k_chars", |b| {
        b.iter(|| black_box(compute_line_breaks(black_box(&line), &style, &params)))
    });
}

fn bench_full_rebuild(c: &mut Criterion) {
    let doc = TextBuffer::from_text(&large_text(20_000));
    c.bench_function("projection/rebuild_20k_lines", |b| {
        b.iter_batched(
            word_view,
            |mut view| black_box(view.visible_lines_count(&doc).unwrap()),
            BatchSize::LargeInput,
        )
    });
}

fn bench_incremental_update(c: &mut Criterion) {
    let mut doc = TextBuffer::from_text(&large_text(20_000));
    let mut view = word_view();
    view.visible_lines_count(&doc).unwrap();
    let mut rng = StdRng::seed_from_u64(11);

    c.bench_function("projection/update_one_line", |b| {
        b.iter(|| {
            let line = rng.gen_range(0..doc.line_count());
            doc.insert(TextPosition::new(line, 0), "x ").unwrap();
            let total = doc.line_count();
            view.update_cache(&doc, line, line, total).unwrap();
            black_box(view.visible_lines_count(&doc).unwrap());
        })
    });
}

fn bench_undo_burst(c: &mut Criterion) {
    c.bench_function("history/undo_redo_1k_burst", |b| {
        b.iter_batched(
            || {
                let mut doc = TextBuffer::new();
                let mut history = HistoryStack::default();
                for i in 0..1_000usize {
                    let at = TextPosition::new(0, i);
                    doc.insert(at, "x").unwrap();
                    history.push_insert("x", at, Duration::from_millis(i as u64));
                }
                (doc, history)
            },
            |(mut doc, mut history)| {
                black_box(history.undo(&mut doc).unwrap());
                black_box(history.redo(&mut doc).unwrap());
            },
            BatchSize::SmallInput,
        )
    });
}

criterion_group!(
    benches,
    bench_line_breaks,
    bench_full_rebuild,
    bench_incremental_update,
    bench_undo_burst
);
criterion_main!(benches);
