//! Generation benchmarks
//!
//! Measures the append/re-serialize loop, which dominates the cost of a
//! fixture, and a full single-document generation including the file write.
//!
//! Run with: `cargo bench --bench generation`

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use pdf_fixture::{
    DocumentEncoder, GenerationRequest, NoProgress, PageLayout, PdfEncoder,
    SizeTargetingGenerator, TargetSize,
};
use std::time::Duration;
use tempfile::TempDir;

fn benchmark_serialize_pages(c: &mut Criterion) {
    let layout = PageLayout::default();
    let mut group = c.benchmark_group("serialize_pages");

    for pages in [1u32, 4, 16] {
        let mut encoder = PdfEncoder::new("Bench", layout.clone());
        for page in 1..=pages {
            encoder
                .append_page(&layout.page("Bench", page))
                .expect("append page");
        }

        group.bench_with_input(BenchmarkId::from_parameter(pages), &pages, |b, _| {
            b.iter(|| black_box(encoder.serialize().expect("serialize").len()))
        });
    }

    group.finish();
}

fn benchmark_generate_document(c: &mut Criterion) {
    let dir = TempDir::new().expect("temp dir");
    let generator = SizeTargetingGenerator::new();
    let mut group = c.benchmark_group("generate_document");
    group.measurement_time(Duration::from_secs(10));
    group.sample_size(10);

    for megabytes in [0.25, 1.0] {
        let request = GenerationRequest::from_megabytes(
            "Bench",
            megabytes,
            dir.path().join(format!("bench-{megabytes}.pdf")),
        );

        group.bench_with_input(
            BenchmarkId::from_parameter(TargetSize::from_megabytes(megabytes).label()),
            &request,
            |b, request| {
                b.iter(|| {
                    black_box(
                        generator
                            .generate(request, &NoProgress)
                            .expect("generate")
                            .size_bytes,
                    )
                })
            },
        );
    }

    group.finish();
}

criterion_group!(benches, benchmark_serialize_pages, benchmark_generate_document);
criterion_main!(benches);
