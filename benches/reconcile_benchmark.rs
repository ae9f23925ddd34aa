//! Performance benchmarks for collection reconciliation
//!
//! Measures anchor resolution and cache pruning for timelines of
//! increasing length.
//! Run with: cargo bench

use std::sync::Arc;

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use tokio::sync::broadcast;
use tootview::adapters::DefaultNavigation;
use tootview::cache::ViewModelCache;
use tootview::collection::{ResolverContext, ScrollPositionResolver};
use tootview::models::{
    Account, CollectionItem, CollectionKind, CollectionSection, IndexPath, Status,
};

/// Timeline of `count` statuses, newest first, starting at `newest`.
fn generate_timeline(newest: usize, count: usize) -> Vec<CollectionSection> {
    let author = Account::new("1", "alice");
    let items = (0..count)
        .map(|i| {
            let id = (newest - i).to_string();
            CollectionItem::status(Status::new(id, author.clone(), "benchmark status"))
        })
        .collect();
    vec![CollectionSection::new(items)]
}

/// Benchmark anchor resolution when new statuses arrive above the viewport
fn bench_resolve_forward_shift(c: &mut Criterion) {
    let mut group = c.benchmark_group("resolve_forward_shift");

    for size in [20, 100, 400, 1000].iter() {
        let previous = generate_timeline(100_000, *size);
        let new = generate_timeline(100_020, *size + 20);
        let context = ResolverContext {
            kind: CollectionKind::Timeline,
            top_visible: Some(IndexPath::new(0, size / 2)),
            ..ResolverContext::default()
        };
        group.throughput(Throughput::Elements(*size as u64));

        group.bench_with_input(
            BenchmarkId::from_parameter(format!("{}_items", size)),
            &(previous, new),
            |b, (previous, new)| {
                let mut resolver = ScrollPositionResolver::new(false);
                b.iter(|| {
                    let anchor = resolver.resolve(black_box(previous), black_box(new), &context);
                    black_box(anchor)
                });
            },
        );
    }

    group.finish();
}

/// Benchmark a warm cache being pruned against a shifted snapshot
fn bench_cache_prune(c: &mut Criterion) {
    let mut group = c.benchmark_group("cache_prune");

    for size in [20, 100, 400, 1000].iter() {
        let previous = generate_timeline(100_000, *size);
        let new = generate_timeline(100_020, *size);
        group.throughput(Throughput::Elements(*size as u64));

        group.bench_with_input(
            BenchmarkId::from_parameter(format!("{}_items", size)),
            &(previous, new),
            |b, (previous, new)| {
                let (events, _) = broadcast::channel(16);
                b.iter(|| {
                    let mut cache = ViewModelCache::new(events.clone(), Arc::new(DefaultNavigation));
                    for item in previous.iter().flat_map(|s| s.items.iter()) {
                        cache.get_or_create(item);
                    }
                    let evicted = cache.prune(new.iter().flat_map(|s| s.items.iter()));
                    black_box(evicted)
                });
            },
        );
    }

    group.finish();
}

criterion_group!(benches, bench_resolve_forward_shift, bench_cache_prune);

criterion_main!(benches);
