//! Benchmarks for outline extraction performance.
//!
//! Run with: cargo bench
//!
//! These benchmarks exercise the full per-document pipeline over synthetic
//! layout documents.

use criterion::{black_box, criterion_group, criterion_main, Criterion};

use docrank::{BoundingBox, DocumentLayout, OutlineExtractor, PageLayout, SectionSegmenter, TextRun};

/// Creates a synthetic layout with the given number of pages. Each page has
/// one heading and a block of body text.
fn create_test_layout(page_count: u32) -> DocumentLayout {
    let mut layout = DocumentLayout::new("benchmark.pdf");

    for page_no in 1..=page_count {
        let mut page = PageLayout::new(page_no);
        page.height = Some(792.0);
        page.runs.push(TextRun::new(
            format!("{}. Section heading", page_no),
            18.0,
            true,
            BoundingBox::new(72.0, 740.0, 300.0, 18.0),
            page_no,
        ));
        for i in 0..30 {
            page.runs.push(TextRun::new(
                "synthetic body text for benchmark purposes, long enough to weigh the histogram",
                12.0,
                false,
                BoundingBox::new(72.0, 700.0 - i as f32 * 14.0, 440.0, 12.0),
                page_no,
            ));
        }
        layout.pages.push(page);
    }

    layout
}

/// Benchmark outline extraction at various document sizes.
fn bench_outline_extraction(c: &mut Criterion) {
    let mut group = c.benchmark_group("outline_extraction");

    for page_count in [1u32, 10, 50].iter() {
        let layout = create_test_layout(*page_count);
        let extractor = OutlineExtractor::new();

        group.bench_function(format!("{}_pages", page_count), |b| {
            b.iter(|| extractor.extract(black_box(&layout)));
        });
    }

    group.finish();
}

/// Benchmark segmentation over an extracted outline.
fn bench_segmentation(c: &mut Criterion) {
    let layout = create_test_layout(20);
    let extracted = OutlineExtractor::new().extract(&layout);
    let segmenter = SectionSegmenter::new();

    c.bench_function("segment_20_pages", |b| {
        b.iter(|| segmenter.segment(black_box(&layout), black_box(&extracted.outline), 0));
    });
}

criterion_group!(benches, bench_outline_extraction, bench_segmentation);
criterion_main!(benches);
