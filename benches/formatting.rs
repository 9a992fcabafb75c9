use criterion::{Criterion, black_box, criterion_group, criterion_main};

use markpad::format::{FormatOp, Selection, apply};
use markpad::preview;

fn sample_document(paragraphs: usize) -> String {
    let mut doc = String::from("# Benchmark document\n\n");
    for i in 0..paragraphs {
        doc.push_str(&format!(
            "## Section {i}\n\nSome *styled* text with **bold** runs and `code` spans \
             that is long enough to wrap at typical pane widths.\n\n\
             - first item\n- second item\n\n"
        ));
    }
    doc
}

fn bench_formatting(c: &mut Criterion) {
    let doc = sample_document(100);
    let len = doc.chars().count();
    let mid = Selection::new(len / 2, len / 2 + 200);

    c.bench_function("wrap_bold_mid_document", |b| {
        b.iter(|| apply(black_box(&doc), black_box(mid), &FormatOp::BOLD));
    });

    c.bench_function("heading_mid_document", |b| {
        b.iter(|| apply(black_box(&doc), black_box(mid), &FormatOp::Heading(2)));
    });

    c.bench_function("list_over_selection", |b| {
        b.iter(|| {
            apply(
                black_box(&doc),
                black_box(mid),
                &FormatOp::List { ordered: true },
            )
        });
    });

    c.bench_function("blockquote_over_selection", |b| {
        b.iter(|| apply(black_box(&doc), black_box(mid), &FormatOp::Blockquote));
    });
}

fn bench_preview(c: &mut Criterion) {
    let doc = sample_document(100);

    c.bench_function("preview_render_80_cols", |b| {
        b.iter(|| preview::render(black_box(&doc), 80).unwrap());
    });
}

criterion_group!(benches, bench_formatting, bench_preview);
criterion_main!(benches);
