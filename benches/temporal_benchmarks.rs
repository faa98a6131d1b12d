use criterion::{BenchmarkId, Criterion, black_box, criterion_group, criterion_main};
use tempora::prelude::*;
use tempora::{SpatialPoint, temporal_hash_extended};

fn t(secs: i64) -> Timestamp {
    Timestamp::from_secs(secs)
}

/// A zig-zag float sequence, so normalization keeps every instant.
fn zigzag(n: usize, offset: i64, interp: Interpolation) -> Temporal {
    let instants = (0..n as i64).map(|i| {
        let value = if i % 2 == 0 { i as f64 } else { -(i as f64) };
        TInstant::new(value, t(offset + i))
    });
    SequenceBuilder::new()
        .instants(instants)
        .interpolation(interp)
        .build()
        .unwrap()
        .into()
}

fn trajectory(n: usize) -> Temporal {
    SequenceBuilder::new()
        .instants((0..n as i64).map(|i| {
            let p = SpatialPoint::new(i as f64, (i % 7) as f64).with_srid(4326);
            TInstant::new(p, t(i))
        }))
        .build()
        .unwrap()
        .into()
}

fn benchmark_construction(c: &mut Criterion) {
    let mut group = c.benchmark_group("construction");

    for size in [100, 1_000, 10_000] {
        group.bench_with_input(BenchmarkId::new("linear_sequence", size), &size, |b, &size| {
            b.iter(|| zigzag(black_box(size), 0, Interpolation::Linear))
        });
        group.bench_with_input(BenchmarkId::new("point_trajectory", size), &size, |b, &size| {
            b.iter(|| trajectory(black_box(size)))
        });
    }

    group.finish();
}

fn benchmark_synchronization(c: &mut Criterion) {
    let mut group = c.benchmark_group("synchronization");

    for size in [100, 1_000, 10_000] {
        let a = zigzag(size, 0, Interpolation::Linear);
        let b = zigzag(size, (size / 2) as i64, Interpolation::Linear);

        group.bench_with_input(BenchmarkId::new("intersection", size), &size, |bench, _| {
            bench.iter(|| synchronize(black_box(&a), black_box(&b), SyncMode::Intersection).unwrap())
        });
        group.bench_with_input(BenchmarkId::new("with_crossings", size), &size, |bench, _| {
            bench.iter(|| synchronize(black_box(&a), black_box(&b), SyncMode::Synchronize).unwrap())
        });
    }

    group.finish();
}

fn benchmark_lifting(c: &mut Criterion) {
    let mut group = c.benchmark_group("lifting");

    let a = zigzag(1_000, 0, Interpolation::Linear);
    let b = zigzag(1_000, 500, Interpolation::Linear);
    let steps = zigzag(1_000, 250, Interpolation::Step);

    group.bench_function("add_base", |bench| {
        bench.iter(|| add_base(black_box(&a), &Datum::Float(1.0)).unwrap())
    });

    group.bench_function("tlt_base", |bench| {
        bench.iter(|| tlt_base(black_box(&a), &Datum::Float(0.0)).unwrap())
    });

    group.bench_function("mul_temporal", |bench| {
        bench.iter(|| mul(black_box(&a), black_box(&b)).unwrap())
    });

    group.bench_function("teq_temporal", |bench| {
        bench.iter(|| teq(black_box(&a), black_box(&b)).unwrap())
    });

    group.bench_function("add_step_linear", |bench| {
        bench.iter(|| add(black_box(&steps), black_box(&a)).unwrap())
    });

    group.bench_function("ever_eq_base", |bench| {
        bench.iter(|| ever_eq_base(black_box(&a), &Datum::Float(3.5)).unwrap())
    });

    group.finish();
}

fn benchmark_ordering(c: &mut Criterion) {
    let mut group = c.benchmark_group("ordering");

    let a = zigzag(1_000, 0, Interpolation::Linear);
    let same = a.clone();
    let values: Vec<Temporal> = (0..200)
        .map(|i| zigzag(10 + i % 13, (i % 17) as i64, Interpolation::Linear))
        .collect();

    group.bench_function("eq_1000", |bench| {
        bench.iter(|| temporal_eq(black_box(&a), black_box(&same)))
    });

    group.bench_function("hash_1000", |bench| bench.iter(|| temporal_hash(black_box(&a))));

    group.bench_function("hash_extended_1000", |bench| {
        bench.iter(|| temporal_hash_extended(black_box(&a), 42))
    });

    group.bench_function("sort_200", |bench| {
        bench.iter(|| {
            let mut sorted = values.clone();
            sorted.sort_by(temporal_cmp);
            sorted
        })
    });

    group.finish();
}

criterion_group!(
    benches,
    benchmark_construction,
    benchmark_synchronization,
    benchmark_lifting,
    benchmark_ordering
);

criterion_main!(benches);
