// Copyright 2025 the Glyphscope Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

use std::rc::Rc;

use criterion::{BenchmarkId, Criterion, Throughput, black_box, criterion_group, criterion_main};
use glyphscope_hit::glyphs::{Circle, Line, Rect};
use glyphscope_hit::{
    CoordinateMapper, DataRendererView, Geometry, GlyphRenderer, LinearMapper, SelectionManager,
    SpanDirection,
};
use glyphscope_property::{ColumnDataSource, ColumnSource};

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

    fn column(&mut self, count: usize, scale: f64) -> Vec<f64> {
        (0..count).map(|_| self.next_f64() * scale).collect()
    }
}

fn mappers() -> (Rc<dyn CoordinateMapper>, Rc<dyn CoordinateMapper>) {
    (
        Rc::new(LinearMapper::new((0.0, 100.0), (0.0, 1000.0))),
        Rc::new(LinearMapper::new((0.0, 100.0), (1000.0, 0.0))),
    )
}

fn scatter_source(count: usize) -> ColumnDataSource {
    let mut rng = Rng(0xA076_1D64_78BD_642F);
    ColumnDataSource::new()
        .with_column("x", rng.column(count, 100.0))
        .with_column("y", rng.column(count, 100.0))
        .with_column("radius", rng.column(count, 0.5))
        .with_column("width", rng.column(count, 2.0))
        .with_column("height", rng.column(count, 2.0))
}

fn pointer_probes() -> Vec<Geometry> {
    let mut rng = Rng(0xE703_7ED1_A0B4_28DB);
    (0..64)
        .map(|_| Geometry::point(rng.next_f64() * 1000.0, rng.next_f64() * 1000.0))
        .collect()
}

fn bench_point(c: &mut Criterion) {
    let mut group = c.benchmark_group("hit/point");
    let probes = pointer_probes();
    for count in [1_000usize, 50_000] {
        let source = scatter_source(count);
        let (x, y) = mappers();
        let circles = GlyphRenderer::new(Circle::new(), &source, Rc::clone(&x), Rc::clone(&y));
        let rects = GlyphRenderer::new(Rect::new(), &source, x, y);
        group.throughput(Throughput::Elements(probes.len() as u64));

        for (name, view) in [("circle", &circles), ("rect", &rects)] {
            group.bench_function(BenchmarkId::new(name, count), |b| {
                b.iter(|| {
                    for probe in &probes {
                        black_box(view.hit_test(probe));
                    }
                });
            });
        }
    }
    group.finish();
}

fn bench_line(c: &mut Criterion) {
    let mut group = c.benchmark_group("hit/line");
    let probes = pointer_probes();
    for count in [1_000usize, 50_000] {
        let mut rng = Rng(0x8EBC_6AF0_9C88_C6E3);
        let xs: Vec<f64> = (0..count).map(|i| i as f64 * 100.0 / count as f64).collect();
        let source = ColumnDataSource::new()
            .with_column("x", xs)
            .with_column("y", rng.column(count, 100.0));
        let (x, y) = mappers();
        let line = GlyphRenderer::new(Line::new(), &source, x, y);

        group.bench_function(BenchmarkId::new("point", count), |b| {
            b.iter(|| {
                for probe in &probes {
                    black_box(line.hit_test(probe));
                }
            });
        });
        group.bench_function(BenchmarkId::new("span", count), |b| {
            b.iter(|| {
                for sx in [10.0, 250.0, 500.0, 990.0] {
                    black_box(line.hit_test(&Geometry::span(sx, 0.0, SpanDirection::H)));
                }
            });
        });
    }
    group.finish();
}

fn bench_manager(c: &mut Criterion) {
    let mut group = c.benchmark_group("hit/manager");
    let source = scatter_source(20_000);
    let (x, y) = mappers();
    let renderers: Vec<GlyphRenderer> = (0..4)
        .map(|_| GlyphRenderer::new(Circle::new(), &source, Rc::clone(&x), Rc::clone(&y)))
        .collect();
    let views: Vec<&dyn DataRendererView> =
        renderers.iter().map(|r| r as &dyn DataRendererView).collect();
    let band = Geometry::rect(100.0, 400.0, 100.0, 400.0);

    group.bench_function("select_replace", |b| {
        let mut manager = SelectionManager::new(source.source_id());
        b.iter(|| black_box(manager.select(&views, &band, true, false)));
    });
    group.bench_function("inspect", |b| {
        let mut manager = SelectionManager::new(source.source_id());
        let probes = pointer_probes();
        b.iter(|| {
            for probe in &probes {
                black_box(manager.inspect(&views, probe));
            }
        });
    });
    group.finish();
}

criterion_group!(benches, bench_point, bench_line, bench_manager);
criterion_main!(benches);
