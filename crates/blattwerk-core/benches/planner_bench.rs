// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Criterion benchmarks for the split-point planner.

use criterion::{Criterion, black_box, criterion_group, criterion_main};

use blattwerk_core::{SplitMode, plan};

/// Plan a 2000-page document split every page — the widest segment list the
/// planner can produce for that size.
fn bench_every_page(c: &mut Criterion) {
    c.bench_function("plan every 1 page (2000 pages)", |b| {
        b.iter(|| plan(black_box(2000), SplitMode::EveryN, black_box("1")));
    });
}

/// Overlapping ranges exercise the set-based dedupe path.
fn bench_ranges(c: &mut Criterion) {
    let spec = "1-400,200-900,5,17,33,1000-1999,1500-2500,x,7-3";
    c.bench_function("plan overlapping ranges (2000 pages)", |b| {
        b.iter(|| plan(black_box(2000), SplitMode::Ranges, black_box(spec)));
    });
}

criterion_group!(benches, bench_every_page, bench_ranges);
criterion_main!(benches);
