//! Backtracking search with contradiction-driven rollback.
//!
//! When propagation reaches a fixpoint with undecided cells left, the search
//! guesses a cell, re-propagates, and rolls back to an explicit grid
//! checkpoint on contradiction. Branch failure and branch success are both
//! ordinary values; internal contradictions never escape the engine. After a
//! first full solution is found the search keeps exploring the remaining
//! choice points, so a second distinct solution (an ambiguous puzzle) is
//! detected instead of being silently discarded.

use std::time::Instant;

use piclace_core::{Cell, Grid, Line, Position, Puzzle, ValidationError};

use crate::{
    cancel::CancelToken,
    progress::{IgnoreProgress, Progress, ProgressObserver},
    propagation::Propagator,
    session::{SolveOptions, SolveOutcome, SolveReport},
};

/// One branch checkpoint.
///
/// `checkpoint` holds the pre-guess grid while the `Filled` branch is being
/// explored; taking it flips the cell to `Empty`. Once it is gone, both
/// values have been tried and the frame only marks an exhausted choice point.
struct Frame {
    checkpoint: Option<Grid>,
    cell: Position,
}

/// A solver that runs propagation to a fixpoint and searches over the
/// remaining undecided cells.
///
/// This is the engine behind [`SolveSession`](crate::SolveSession); use the
/// session when you also want a stored cancellation handle.
///
/// # Examples
///
/// ```
/// use piclace_core::Puzzle;
/// use piclace_solver::BacktrackSolver;
///
/// let puzzle: Puzzle = "
/// rows:
/// 1
/// cols:
/// 1
/// "
/// .parse()?;
///
/// let report = BacktrackSolver::new().solve(&puzzle)?;
/// let solution = report.outcome.solution().unwrap();
/// assert_eq!(solution.to_string(), "#\n");
/// assert_eq!(report.attempts, 0); // pure propagation, no guessing
/// # Ok::<(), Box<dyn std::error::Error>>(())
/// ```
#[derive(Debug, Default)]
pub struct BacktrackSolver {
    options: SolveOptions,
}

impl BacktrackSolver {
    /// Creates a solver with default [`SolveOptions`].
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a solver with the given options.
    #[must_use]
    pub fn with_options(options: SolveOptions) -> Self {
        Self { options }
    }

    /// Solves a puzzle without progress reporting or cancellation.
    ///
    /// # Errors
    ///
    /// Returns the full [`ValidationError`] if the puzzle violates any
    /// structural invariant; no solving is attempted in that case.
    pub fn solve(&self, puzzle: &Puzzle) -> Result<SolveReport, ValidationError> {
        self.solve_with(puzzle, &mut IgnoreProgress, &CancelToken::new())
    }

    /// Solves a puzzle, streaming progress to `observer` and polling `cancel`
    /// at every search step.
    ///
    /// The observer is called once after the initial propagation round and
    /// then at a bounded attempt cadence; no call is made after the final
    /// outcome is decided.
    ///
    /// # Errors
    ///
    /// Returns the full [`ValidationError`] if the puzzle violates any
    /// structural invariant; no solving is attempted and the observer is
    /// never called in that case.
    pub fn solve_with(
        &self,
        puzzle: &Puzzle,
        observer: &mut dyn ProgressObserver,
        cancel: &CancelToken,
    ) -> Result<SolveReport, ValidationError> {
        puzzle.validate()?;
        Ok(run(puzzle, &self.options, observer, cancel))
    }
}

/// Runs the engine on an already validated puzzle.
pub(crate) fn run(
    puzzle: &Puzzle,
    options: &SolveOptions,
    observer: &mut dyn ProgressObserver,
    cancel: &CancelToken,
) -> SolveReport {
    let started = Instant::now();
    let mut propagator = Propagator::new();
    let mut grid = Grid::new(puzzle.width(), puzzle.height());
    let mut attempts: u64 = 0;

    if propagator.propagate_all(puzzle, &mut grid).is_err() {
        return SolveReport {
            outcome: SolveOutcome::Unsatisfiable,
            attempts,
            elapsed: started.elapsed(),
        };
    }
    observer.on_progress(Progress::new(&grid, attempts, started.elapsed()));

    let interval = options.report_interval.max(1);
    let mut next_report = interval;
    let mut frames: Vec<Frame> = Vec::new();
    let mut first_solution: Option<Grid> = None;

    let outcome = loop {
        // Yield point: the grid is at a consistent fixpoint here. Poll
        // cancellation and the attempt budget, and report at the configured
        // cadence.
        if cancel.is_cancelled()
            || options
                .attempt_budget
                .is_some_and(|budget| attempts >= budget)
        {
            break SolveOutcome::Cancelled { partial: grid };
        }
        if attempts >= next_report {
            observer.on_progress(Progress::new(&grid, attempts, started.elapsed()));
            next_report = attempts + interval;
        }

        if grid.is_complete() {
            debug_assert!(grid.satisfies(puzzle));
            if let Some(first) = &first_solution {
                if grid != *first {
                    break SolveOutcome::Ambiguous {
                        first: first.clone(),
                        second: grid,
                    };
                }
            } else {
                first_solution = Some(grid.clone());
            }
            if backtrack(puzzle, &mut propagator, &mut frames, &mut grid, &mut attempts) {
                continue;
            }
            break finished(first_solution);
        }

        let cell = branch_cell(&grid);
        attempts += 1;
        frames.push(Frame {
            checkpoint: Some(grid.clone()),
            cell,
        });
        grid.set(cell, Cell::Filled);
        let seeds = [Line::row(cell.y()), Line::column(cell.x())];
        if propagator.propagate(puzzle, &mut grid, seeds).is_err()
            && !backtrack(puzzle, &mut propagator, &mut frames, &mut grid, &mut attempts)
        {
            break finished(first_solution);
        }
    };

    SolveReport {
        outcome,
        attempts,
        elapsed: started.elapsed(),
    }
}

fn finished(first_solution: Option<Grid>) -> SolveOutcome {
    match first_solution {
        Some(solution) => SolveOutcome::Solved(solution),
        None => SolveOutcome::Unsatisfiable,
    }
}

/// Unwinds to the nearest choice point with an untried `Empty` branch and
/// re-propagates from it.
///
/// Returns `false` once the whole tree is exhausted.
fn backtrack(
    puzzle: &Puzzle,
    propagator: &mut Propagator,
    frames: &mut Vec<Frame>,
    grid: &mut Grid,
    attempts: &mut u64,
) -> bool {
    loop {
        let Some(frame) = frames.last_mut() else {
            return false;
        };
        match frame.checkpoint.take() {
            None => {
                frames.pop();
            }
            Some(saved) => {
                let cell = frame.cell;
                *grid = saved;
                *attempts += 1;
                grid.set(cell, Cell::Empty);
                let seeds = [Line::row(cell.y()), Line::column(cell.x())];
                if propagator.propagate(puzzle, grid, seeds).is_ok() {
                    return true;
                }
                // Both values contradict at this depth; unwind further.
            }
        }
    }
}

/// Deterministic branch-cell choice: the line with the fewest remaining
/// unknown cells wins, rows beat columns, lower indices beat higher ones, and
/// the first unknown cell of the winning line is guessed. `Filled` is always
/// tried before `Empty`. This fixes which solution of an ambiguous puzzle is
/// reported first.
fn branch_cell(grid: &Grid) -> Position {
    let mut best: Option<(usize, Line)> = None;
    for line in Line::all(grid.width(), grid.height()) {
        let unknown = grid.line_unknown_count(line);
        if unknown == 0 {
            continue;
        }
        if best.is_none_or(|(count, _)| unknown < count) {
            best = Some((unknown, line));
        }
    }
    let (_, line) = best.expect("branch_cell requires an incomplete grid");
    (0..grid.line_len(line))
        .map(|i| line.position_at(i))
        .find(|&pos| grid.get(pos) == Cell::Unknown)
        .expect("chosen line has an unknown cell")
}

#[cfg(test)]
mod tests {
    use piclace_core::LineHints;

    use super::*;

    fn puzzle(rows: &[&[u32]], cols: &[&[u32]]) -> Puzzle {
        Puzzle::new(
            rows.len(),
            cols.len(),
            rows.iter().map(|blocks| LineHints::new(blocks.to_vec())).collect(),
            cols.iter().map(|blocks| LineHints::new(blocks.to_vec())).collect(),
        )
    }

    #[test]
    fn test_propagation_only_puzzles_take_zero_attempts() {
        let solver = BacktrackSolver::new();

        let report = solver.solve(&puzzle(&[&[1]], &[&[1]])).unwrap();
        assert_eq!(report.attempts, 0);
        assert_eq!(report.outcome.solution().unwrap().to_string(), "#\n");

        let report = solver
            .solve(&puzzle(
                &[&[5], &[5], &[5], &[5], &[5]],
                &[&[5], &[5], &[5], &[5], &[5]],
            ))
            .unwrap();
        assert_eq!(report.attempts, 0);
        let solution = report.outcome.solution().unwrap();
        assert!(solution.cells().all(|cell| cell == Cell::Filled));
    }

    #[test]
    fn test_unique_solution_found_by_search() {
        // Propagation decides nothing here; the block layout is still forced:
        // the bottom pair must sit in the middle, leaving the corners for the
        // top row.
        let puzzle = puzzle(&[&[1, 1], &[2]], &[&[1], &[1], &[1], &[1]]);
        let report = BacktrackSolver::new().solve(&puzzle).unwrap();

        let SolveOutcome::Solved(solution) = report.outcome else {
            panic!("expected a unique solution, got {:?}", report.outcome);
        };
        assert_eq!(solution.to_string(), "#..#\n.##.\n");
        // One guess finds the solution, one flip proves it unique.
        assert_eq!(report.attempts, 2);
    }

    #[test]
    fn test_ambiguous_puzzle_reports_both_witnesses() {
        let puzzle = puzzle(&[&[1], &[1]], &[&[1], &[1]]);
        let report = BacktrackSolver::new().solve(&puzzle).unwrap();

        let SolveOutcome::Ambiguous { first, second } = report.outcome else {
            panic!("expected ambiguity, got {:?}", report.outcome);
        };
        // The documented tie-break (Filled first at the top-left cell) makes
        // the identity diagonal the first witness.
        assert_eq!(first.to_string(), "#.\n.#\n");
        assert_eq!(second.to_string(), ".#\n#.\n");
        assert!(first.satisfies(&puzzle));
        assert!(second.satisfies(&puzzle));
        assert_eq!(report.attempts, 2);
    }

    #[test]
    fn test_ambiguity_detected_after_partial_propagation() {
        // Propagation decides the centers, then stalls; both completions of
        // the corners are valid.
        let puzzle = puzzle(&[&[2], &[1], &[1]], &[&[2], &[1], &[1]]);
        let report = BacktrackSolver::new().solve(&puzzle).unwrap();

        let SolveOutcome::Ambiguous { first, second } = report.outcome else {
            panic!("expected ambiguity, got {:?}", report.outcome);
        };
        assert_eq!(first.to_string(), "##.\n#..\n..#\n");
        assert_eq!(second.to_string(), ".##\n#..\n#..\n");
    }

    #[test]
    fn test_unsatisfiable_at_root() {
        // Every column forces a #.#  pattern, starving the middle row.
        let puzzle = puzzle(&[&[2], &[2], &[2]], &[&[1, 1], &[1, 1], &[1, 1]]);
        let report = BacktrackSolver::new().solve(&puzzle).unwrap();
        assert_eq!(report.outcome, SolveOutcome::Unsatisfiable);
        assert_eq!(report.attempts, 0);
    }

    #[test]
    fn test_validation_error_precedes_any_attempt() {
        // Row and column totals disagree: validation must reject before the
        // engine starts, so the observer is never invoked.
        let puzzle = puzzle(&[&[1], &[1]], &[&[2], &[1]]);
        let mut calls = 0usize;
        let mut observer = |_: Progress<'_>| calls += 1;
        let result =
            BacktrackSolver::new().solve_with(&puzzle, &mut observer, &CancelToken::new());
        assert!(result.is_err());
        assert_eq!(calls, 0);
    }

    #[test]
    fn test_cancellation_at_the_first_yield_point() {
        let puzzle = puzzle(&[&[1], &[1]], &[&[1], &[1]]);
        let cancel = CancelToken::new();
        let handle = cancel.clone();
        let mut observer = move |_: Progress<'_>| handle.cancel();

        let report = BacktrackSolver::new()
            .solve_with(&puzzle, &mut observer, &cancel)
            .unwrap();
        let SolveOutcome::Cancelled { partial } = report.outcome else {
            panic!("expected cancellation, got {:?}", report.outcome);
        };
        // Cancelled before the first guess: the snapshot is the (empty)
        // root fixpoint and the counter never moved.
        assert_eq!(report.attempts, 0);
        assert_eq!(partial.unknown_count(), 4);
    }

    #[test]
    fn test_attempt_budget_bounds_the_search() {
        let puzzle = puzzle(&[&[2], &[1], &[1]], &[&[2], &[1], &[1]]);
        let options = SolveOptions::new().attempt_budget(1);
        let report = BacktrackSolver::with_options(options).solve(&puzzle).unwrap();

        assert!(report.outcome.is_cancelled());
        assert_eq!(report.attempts, 1);
    }
}
