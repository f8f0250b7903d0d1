use criterion::{black_box, criterion_group, criterion_main, BatchSize, Criterion};
use intbitset::IntBitSet;

fn build(n: u64, tail: bool) -> IntBitSet {
    IntBitSet::from_values_with_tail((0..n).map(|i| i * 7), tail)
}

fn bench_union(c: &mut Criterion) {
    let a = build(50_000, false);
    let b = build(50_000, false);
    c.bench_function("union/finite", |bencher| {
        bencher.iter(|| black_box(a.union(black_box(&b))));
    });

    let a_cofinite = build(50_000, true);
    c.bench_function("union/cofinite_rhs", |bencher| {
        bencher.iter(|| black_box(a.union(black_box(&a_cofinite))));
    });
}

fn bench_intersection(c: &mut Criterion) {
    let a = build(50_000, false);
    let b = build(50_000, false);
    c.bench_function("intersection/finite", |bencher| {
        bencher.iter(|| black_box(a.intersection(black_box(&b))));
    });
}

fn bench_in_place_union(c: &mut Criterion) {
    let b = build(50_000, false);
    c.bench_function("union_with/finite", |bencher| {
        bencher.iter_batched(
            || build(50_000, false),
            |mut a| {
                a.union_with(black_box(&b));
                black_box(a);
            },
            BatchSize::LargeInput,
        );
    });
}

fn bench_iteration(c: &mut Criterion) {
    let a = build(100_000, false);
    c.bench_function("iterate/finite", |bencher| {
        bencher.iter(|| {
            let mut count = 0u64;
            for member in &a {
                count += black_box(member) & 1;
            }
            black_box(count)
        });
    });
}

fn bench_select(c: &mut Criterion) {
    let a = build(100_000, false);
    let len = a.len();
    c.bench_function("select/middle", |bencher| {
        bencher.iter(|| black_box(a.get(black_box((len / 2) as i64)).unwrap()));
    });
}

criterion_group!(
    benches,
    bench_union,
    bench_intersection,
    bench_in_place_union,
    bench_iteration,
    bench_select
);
criterion_main!(benches);
