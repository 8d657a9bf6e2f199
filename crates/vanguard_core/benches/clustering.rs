//! Clustering and tick benchmarks for vanguard_core.
//!
//! Run with: `cargo bench -p vanguard_core`

// Benchmark binaries don't need docs on macro-generated functions
#![allow(missing_docs)]

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};

use vanguard_core::cluster::compute_clusters;
use vanguard_core::config::EngineConfig;
use vanguard_core::engine::Engine;
use vanguard_core::math::Vec2;
use vanguard_core::tracker::UnitTracker;
use vanguard_core::unit::UnitKind;
use vanguard_test_utils::fixtures::{block, opening_match, SnapshotBuilder, ENEMY};

/// A full opponent army of `side * side` units per block in five blocks.
fn army_tracker(side: u32) -> UnitTracker {
    let mut tracker = UnitTracker::new(16.0);
    let mut builder = SnapshotBuilder::new(0);
    for (i, kind) in UnitKind::ALL.into_iter().enumerate() {
        let origin = Vec2::new(100.0 + 160.0 * i as f64, 500.0);
        let first_id = 10_000 * (i as i64 + 1);
        builder = builder.with_units(block(ENEMY, kind, first_id, origin, side, side, 4.5));
    }
    tracker
        .apply_deltas(&builder.build())
        .expect("fixture snapshot is valid");
    tracker
}

pub fn clustering_benchmark(c: &mut Criterion) {
    let mut group = c.benchmark_group("compute_clusters");
    for side in [5_u32, 10, 15] {
        let tracker = army_tracker(side);
        group.bench_with_input(BenchmarkId::from_parameter(side * side * 5), &tracker, |b, t| {
            b.iter(|| compute_clusters(black_box(t)));
        });
    }
    group.finish();
}

pub fn engine_tick_benchmark(c: &mut Criterion) {
    let snapshots = opening_match(200);
    c.bench_function("engine_opening_200_ticks", |b| {
        b.iter(|| {
            let mut engine = Engine::new(EngineConfig::default()).expect("default config is valid");
            for snapshot in &snapshots {
                black_box(engine.tick(snapshot).expect("fixture ticks are valid"));
            }
        });
    });
}

criterion_group!(benches, clustering_benchmark, engine_tick_benchmark);
criterion_main!(benches);
