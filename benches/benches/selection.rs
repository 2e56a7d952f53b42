// Copyright 2025 the Glyphscope Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

use criterion::{
    BatchSize, BenchmarkId, Criterion, Throughput, black_box, criterion_group, criterion_main,
};
use glyphscope_selection::{Selection, SelectionMode};

fn bench_update(c: &mut Criterion) {
    let mut group = c.benchmark_group("selection/update");

    // Half of `incoming` overlaps `current`, the way a shift-drag over an
    // existing selection does.
    for len in [128usize, 2_048, 32_768] {
        let current = Selection::new().with_indices(0..len);
        let incoming = Selection::new().with_indices(len / 2..len + len / 2);
        group.throughput(Throughput::Elements(len as u64));

        for mode in [
            SelectionMode::Replace,
            SelectionMode::Append,
            SelectionMode::Intersect,
            SelectionMode::Subtract,
        ] {
            group.bench_with_input(
                BenchmarkId::new(format!("{mode:?}"), len),
                &incoming,
                |b, incoming| {
                    b.iter_batched(
                        || current.clone(),
                        |mut sel| {
                            sel.update(incoming, mode);
                            black_box(sel);
                        },
                        BatchSize::LargeInput,
                    );
                },
            );
        }
    }
    group.finish();
}

fn bench_repeat_append(c: &mut Criterion) {
    let mut group = c.benchmark_group("selection/repeat_append");

    // Hovering over the same rows appends identical input; it must stay cheap
    // and leave the selection unchanged.
    for len in [128usize, 2_048] {
        let mut current = Selection::new().with_indices(0..len);
        let incoming = current.clone();
        group.bench_function(BenchmarkId::from_parameter(len), |b| {
            b.iter(|| black_box(current.update(&incoming, SelectionMode::Append)));
        });
    }
    group.finish();
}

criterion_group!(benches, bench_update, bench_repeat_append);
criterion_main!(benches);
