//! Masonry packing and feed run benchmarks.
//!
//! Packing runs on every redraw, so it must stay cheap for large feeds. The
//! headless run measures a full scroll-to-exhaustion pass over every tab.
//!
//! Run with: cargo bench --bench pack_benchmark

#![allow(missing_docs)] // criterion macros generate undocumented items

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use masonry_feed::config::ResolvedConfig;
use masonry_feed::headless::{simulate, HeadlessOptions};
use masonry_feed::model::GalleryItem;
use masonry_feed::source::BatchGenerator;
use masonry_feed::view::masonry::{pack, ColumnPlan, GridLayout};
use std::time::Duration;

/// Items from the first `pages` batches of a generator with page size 6.
fn generate_items(pages: u32) -> Vec<GalleryItem> {
    let generator = BatchGenerator::new(6);
    (0..pages)
        .flat_map(|page| generator.generate(page).into_items())
        .collect()
}

/// Benchmark raw packing across item counts and column counts.
fn benchmark_pack_scaling(c: &mut Criterion) {
    let mut group = c.benchmark_group("pack_scaling");

    for count in [60usize, 600, 6_000] {
        let heights: Vec<u32> = (0..count).map(|i| 260 + (i as u32 * 37) % 220).collect();
        for columns in [2u16, 4] {
            group.bench_with_input(
                BenchmarkId::new(format!("{columns}_columns"), count),
                &heights,
                |b, heights| b.iter(|| pack(black_box(heights), black_box(columns), 16)),
            );
        }
    }

    group.finish();
}

/// Benchmark grid computation, including per-item display height scaling.
fn benchmark_grid_compute(c: &mut Criterion) {
    let mut group = c.benchmark_group("grid_compute");

    for pages in [10u32, 100, 1_000] {
        let items = generate_items(pages);
        let plan = ColumnPlan {
            columns: 4,
            gutter: 16,
            item_count: items.len(),
        };
        group.bench_with_input(BenchmarkId::new("items", items.len()), &items, |b, items| {
            b.iter(|| GridLayout::compute(black_box(items), Some(plan), 1280))
        });
    }

    group.finish();
}

/// Benchmark a headless run over the default three tabs.
fn benchmark_headless_run(c: &mut Criterion) {
    let config = ResolvedConfig::default();
    let options = HeadlessOptions::default();

    c.bench_function("headless_default_tabs", |b| {
        b.iter(|| simulate(black_box(&config), black_box(&options)))
    });
}

criterion_group! {
    name = benches;
    config = Criterion::default()
        .measurement_time(Duration::from_secs(5));
    targets = benchmark_pack_scaling, benchmark_grid_compute, benchmark_headless_run
}

criterion_main!(benches);
