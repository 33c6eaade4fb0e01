//! Contains / IndexOf benchmarks across tiers.
//!
//! The needle sits at the far end of the buffer for the chosen direction, so
//! every run scans the whole buffer before the short-circuit fires.

use std::hint::black_box;

use criterion::{criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use ndarray::Array1;

use simdscan::{Comparison, Scanner, Tier, TraversalOrder};

const SIZES: &[usize] = &[1_024, 16_384, 262_144, 4_194_304];

fn scanners() -> Vec<Scanner> {
    Tier::available()
        .into_iter()
        .filter_map(|tier| Scanner::with_tier(tier).ok())
        .collect()
}

fn bench_index_of_u8(c: &mut Criterion) {
    let mut group = c.benchmark_group("index_of_u8");

    for &size in SIZES {
        let mut data = vec![0u8; size];
        data[size - 1] = 1;
        group.throughput(Throughput::Bytes(size as u64));

        for scanner in scanners() {
            group.bench_with_input(
                BenchmarkId::new(scanner.tier().to_string(), size),
                &data,
                |b, data| b.iter(|| scanner.index_of(black_box(data), 1, TraversalOrder::Ascending)),
            );
        }

        let array = Array1::from_vec(data.clone());
        group.bench_with_input(BenchmarkId::new("ndarray_iter", size), &array, |b, a| {
            b.iter(|| black_box(a).iter().position(|&x| x == 1))
        });
    }

    group.finish();
}

fn bench_contains_i32_descending(c: &mut Criterion) {
    let mut group = c.benchmark_group("contains_i32_gt_descending");

    for &size in SIZES {
        let mut data: Vec<i32> = (0..size as i32).map(|x| x % 1_000).collect();
        data[0] = 5_000;
        group.throughput(Throughput::Bytes(4 * size as u64));

        for scanner in scanners() {
            group.bench_with_input(
                BenchmarkId::new(scanner.tier().to_string(), size),
                &data,
                |b, data| {
                    b.iter(|| {
                        scanner.contains(
                            black_box(data),
                            4_999,
                            Comparison::GreaterThan,
                            TraversalOrder::Descending,
                        )
                    })
                },
            );
        }
    }

    group.finish();
}

fn bench_index_of_f64(c: &mut Criterion) {
    let mut group = c.benchmark_group("index_of_f64");

    for &size in SIZES {
        let mut data: Vec<f64> = (0..size).map(|x| x as f64 * 0.5).collect();
        data[size - 1] = -1.0;
        group.throughput(Throughput::Bytes(8 * size as u64));

        for scanner in scanners() {
            group.bench_with_input(
                BenchmarkId::new(scanner.tier().to_string(), size),
                &data,
                |b, data| {
                    b.iter(|| scanner.index_of(black_box(data), -1.0, TraversalOrder::Ascending))
                },
            );
        }
    }

    group.finish();
}

criterion_group!(
    benches,
    bench_index_of_u8,
    bench_contains_i32_descending,
    bench_index_of_f64
);
criterion_main!(benches);
