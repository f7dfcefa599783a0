//! Benchmarks for the per-cycle decision path.
//!
//! `decide_price` runs once per completed signal triple, so it sits on the
//! hot path of every correlated product update.

use criterion::{black_box, criterion_group, criterion_main, Criterion};

use priceflow_pricing::decide_price;

fn bench_decide_price(c: &mut Criterion) {
    let mut group = c.benchmark_group("decide_price");

    group.bench_function("no_competitors", |b| {
        b.iter(|| {
            decide_price(
                black_box(&[]),
                black_box(0.9),
                black_box(3),
                black_box(100.0),
            )
        })
    });

    group.bench_function("five_competitors", |b| {
        let prices = [95.0, 98.5, 101.0, 104.0, 107.5];
        b.iter(|| {
            decide_price(
                black_box(&prices),
                black_box(0.45),
                black_box(27),
                black_box(249.99),
            )
        })
    });

    group.finish();
}

criterion_group!(benches, bench_decide_price);
criterion_main!(benches);
