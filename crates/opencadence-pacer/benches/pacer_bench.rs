//! Benchmarks for the pacer crate.

use criterion::{Criterion, criterion_group, criterion_main};
use opencadence_pacer::{FnSink, MarkClock, PacedItem, PacerConfig, RateController};
use std::hint::black_box;

fn bench_clock_to_mark(c: &mut Criterion) {
    let clock = MarkClock::new();
    let instant = clock.epoch() + std::time::Duration::from_millis(1_234);

    c.bench_function("clock_to_mark", |b| {
        b.iter(|| {
            black_box(clock.to_mark(black_box(instant)));
        });
    });
}

fn bench_insert_unsaturated(c: &mut Criterion) {
    let pacer = RateController::<u64>::new(PacerConfig::new(100, 10_000)).unwrap();
    let mut drain = FnSink(|_item: PacedItem<u64>| {});

    c.bench_function("insert_unsaturated", |b| {
        b.iter(|| {
            pacer.insert(black_box(PacedItem::new(1, 42))).unwrap();
            // Keep the queue from saturating so eviction cost stays out of
            // this measurement.
            pacer.tick(&mut drain);
        });
    });
}

fn bench_insert_saturated(c: &mut Criterion) {
    let pacer = RateController::<u64>::new(PacerConfig::new(10, 400)).unwrap();
    for mark in 0..4 {
        pacer.insert(PacedItem::new(mark, 42)).unwrap();
    }

    c.bench_function("insert_saturated", |b| {
        b.iter(|| {
            pacer.insert(black_box(PacedItem::new(10, 42))).unwrap();
        });
    });
}

fn bench_tick_extrapolating(c: &mut Criterion) {
    let pacer = RateController::<u64>::new(PacerConfig::new(10, 400)).unwrap();
    let mut sink = FnSink(|item: PacedItem<u64>| {
        black_box(item.birth_mark);
    });

    c.bench_function("tick_extrapolating", |b| {
        b.iter(|| {
            pacer.tick(&mut sink);
        });
    });
}

fn bench_metrics_snapshot(c: &mut Criterion) {
    let pacer = RateController::<u64>::new(PacerConfig::new(10, 400)).unwrap();

    c.bench_function("metrics_snapshot", |b| {
        b.iter(|| {
            black_box(pacer.metrics());
        });
    });
}

criterion_group!(
    benches,
    bench_clock_to_mark,
    bench_insert_unsaturated,
    bench_insert_saturated,
    bench_tick_extrapolating,
    bench_metrics_snapshot,
);

criterion_main!(benches);
