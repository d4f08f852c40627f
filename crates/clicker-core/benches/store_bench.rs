//! Criterion benchmarks for the [`ClickStore`] queries the playback loop and
//! the status feed call on every pass and every mutation.
//!
//! Run with:
//! ```bash
//! cargo bench --package clicker-core --bench store_bench
//! ```

use clicker_core::{ClickStore, DelayPolicy, Humanizer, SavedClick};
use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};

// ── Store fixture builders ────────────────────────────────────────────────────

/// Creates a store with `n` clicks where every third click is disabled and
/// every fifth click is selected.
fn build_store_with_n_clicks(n: usize) -> ClickStore {
    let mut store = ClickStore::new();
    for i in 0..n {
        let id = store.add(SavedClick::new(i as i32 * 3, i as i32 * 7));
        if i % 3 == 0 {
            store.set_enabled(id, false).expect("id was just added");
        }
        if i % 5 == 0 {
            store.set_selected(id, true).expect("id was just added");
        }
    }
    store
}

// ── Benchmarks: queries ───────────────────────────────────────────────────────

/// Benchmarks the per-pass snapshot of the enabled subsequence.
fn bench_enabled_clicks_scaling(c: &mut Criterion) {
    let mut group = c.benchmark_group("enabled_clicks");

    for count in [10usize, 100, 1000] {
        let store = build_store_with_n_clicks(count);
        group.bench_with_input(BenchmarkId::new("clicks", count), &count, |b, _| {
            b.iter(|| black_box(store.enabled_clicks()))
        });
    }

    group.finish();
}

/// Benchmarks the aggregate queries the status snapshot recomputes.
fn bench_aggregates(c: &mut Criterion) {
    let store = build_store_with_n_clicks(500);
    let mut group = c.benchmark_group("aggregates");

    group.bench_function("count_enabled", |b| b.iter(|| black_box(store.count_enabled())));
    group.bench_function("enabled_aggregate", |b| {
        b.iter(|| black_box(store.enabled_aggregate()))
    });
    group.bench_function("selected_aggregate", |b| {
        b.iter(|| black_box(store.selected_aggregate()))
    });

    group.finish();
}

// ── Benchmarks: humanizer ─────────────────────────────────────────────────────

fn bench_humanizer_draws(c: &mut Criterion) {
    let mut humanizer = Humanizer::with_seed(7);
    let policy = DelayPolicy::new(250, true);
    let mut group = c.benchmark_group("humanizer");

    group.bench_function("delay", |b| b.iter(|| humanizer.delay(black_box(&policy))));
    group.bench_function("target", |b| {
        b.iter(|| humanizer.target(black_box(&policy), black_box(300), black_box(220)))
    });

    group.finish();
}

criterion_group!(
    benches,
    bench_enabled_clicks_scaling,
    bench_aggregates,
    bench_humanizer_draws,
);
criterion_main!(benches);
