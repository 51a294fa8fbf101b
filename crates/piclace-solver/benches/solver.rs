//! Benchmarks for propagation-dominated and search-dominated solves.

use std::hint::black_box;

use criterion::{Criterion, criterion_group, criterion_main};
use piclace_core::Puzzle;
use piclace_solver::BacktrackSolver;

/// 10x10 window (outer frame plus centered pane); solved by propagation
/// alone.
const WINDOW: &str = "
rows:
10
1 1
1 1
1 4 1
1 4 1
1 4 1
1 4 1
1 1
1 1
10
cols:
10
1 1
1 1
1 4 1
1 4 1
1 4 1
1 4 1
1 1
1 1
10
";

/// Stalls propagation immediately; the unique solution needs the search.
const SHIFTED_PAIR: &str = "
rows:
1 1
2
cols:
1
1
1
1
";

fn bench_propagation(c: &mut Criterion) {
    let puzzle: Puzzle = WINDOW.parse().unwrap();
    let solver = BacktrackSolver::new();
    c.bench_function("propagate_window_10x10", |b| {
        b.iter(|| solver.solve(black_box(&puzzle)).unwrap());
    });
}

fn bench_search(c: &mut Criterion) {
    let puzzle: Puzzle = SHIFTED_PAIR.parse().unwrap();
    let solver = BacktrackSolver::new();
    c.bench_function("search_shifted_pair_4x2", |b| {
        b.iter(|| solver.solve(black_box(&puzzle)).unwrap());
    });
}

criterion_group!(benches, bench_propagation, bench_search);
criterion_main!(benches);
