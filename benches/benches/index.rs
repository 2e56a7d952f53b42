// Copyright 2025 the Glyphscope Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

use criterion::{BenchmarkId, Criterion, Throughput, black_box, criterion_group, criterion_main};
use glyphscope_index::backends::FlatVec;
use glyphscope_index::{Aabb2D, SpatialIndex};

#[derive(Clone)]
struct Rng(u64);

impl Rng {
    fn next_u64(&mut self) -> u64 {
        let mut x = self.0;
        x ^= x << 13;
        x ^= x >> 7;
        x ^= x << 17;
        self.0 = x;
        x
    }

    fn next_f64(&mut self) -> f64 {
        let v = self.next_u64() >> 11;
        (v as f64) / ((1u64 << 53) as f64)
    }
}

/// Scatter-like rows in `[0, 1000]²`: mostly points, some small boxes, a few
/// NaN rows.
fn gen_rows(count: usize) -> Vec<Aabb2D<f64>> {
    let mut rng = Rng(0x9E37_79B9_7F4A_7C15);
    (0..count)
        .map(|_| {
            let x = rng.next_f64() * 1000.0;
            let y = rng.next_f64() * 1000.0;
            match rng.next_u64() % 16 {
                0 => Aabb2D::from_corners(f64::NAN, y, x, y),
                1..=4 => Aabb2D::from_corners(x, y, x + 8.0, y + 8.0),
                _ => Aabb2D::from_point(x, y),
            }
        })
        .collect()
}

fn bench_build(c: &mut Criterion) {
    let mut group = c.benchmark_group("index/build");
    for count in [1_000usize, 10_000, 100_000] {
        let rows = gen_rows(count);
        group.throughput(Throughput::Elements(count as u64));
        group.bench_with_input(BenchmarkId::new("packed", count), &rows, |b, rows| {
            b.iter(|| {
                let index: SpatialIndex = SpatialIndex::build(rows.iter().copied());
                black_box(index);
            });
        });
        group.bench_with_input(BenchmarkId::new("flat", count), &rows, |b, rows| {
            b.iter(|| {
                let index: SpatialIndex<FlatVec<f64>> = SpatialIndex::build(rows.iter().copied());
                black_box(index);
            });
        });
    }
    group.finish();
}

fn bench_query(c: &mut Criterion) {
    let mut group = c.benchmark_group("index/query");
    for count in [1_000usize, 10_000, 100_000] {
        let rows = gen_rows(count);
        let packed: SpatialIndex = SpatialIndex::build(rows.iter().copied());
        let flat: SpatialIndex<FlatVec<f64>> = SpatialIndex::build(rows.iter().copied());

        // Pointer-sized probes and a rubber-band sized box.
        for (label, size) in [("pointer", 6.0), ("band", 150.0)] {
            let probes: Vec<Aabb2D<f64>> = {
                let mut rng = Rng(0xD1B5_4A32_D192_ED03);
                (0..64)
                    .map(|_| {
                        let x = rng.next_f64() * 1000.0;
                        let y = rng.next_f64() * 1000.0;
                        Aabb2D::new(x, y, x + size, y + size)
                    })
                    .collect()
            };
            group.bench_function(BenchmarkId::new(format!("packed/{label}"), count), |b| {
                b.iter(|| {
                    for probe in &probes {
                        black_box(packed.query_box(*probe));
                    }
                });
            });
            group.bench_function(BenchmarkId::new(format!("flat/{label}"), count), |b| {
                b.iter(|| {
                    for probe in &probes {
                        black_box(flat.query_box(*probe));
                    }
                });
            });
        }
    }
    group.finish();
}

criterion_group!(benches, bench_build, bench_query);
criterion_main!(benches);
