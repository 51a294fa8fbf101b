//! Fixpoint propagation over the row/column constraint graph.
//!
//! Each line is a constraint node; deciding a cell dirties the perpendicular
//! line through it. A worklist (FIFO queue plus membership flags, so a line
//! is never queued twice) drives [`LineSolver`] passes until no line changes
//! or some line contradicts. Propagation is confluent: the fixpoint reached
//! does not depend on the order lines are processed in, so the queue order is
//! a performance detail only.

use std::collections::VecDeque;

use piclace_core::{Cell, Grid, Line, Puzzle};

use crate::line_solver::{Contradiction, LineSolver};

/// The propagation engine: repeatedly applies the [`LineSolver`] to dirty
/// lines until a fixpoint or a contradiction.
///
/// Holds the worklist and line buffers so repeated rounds (one per search
/// guess) do not reallocate.
///
/// # Examples
///
/// ```
/// use piclace_core::{Grid, Puzzle};
/// use piclace_solver::propagation::Propagator;
///
/// let puzzle: Puzzle = "
/// rows:
/// 3
/// 1 1
/// 3
/// cols:
/// 3
/// 1 1
/// 3
/// "
/// .parse()?;
///
/// let mut grid = Grid::new(puzzle.width(), puzzle.height());
/// let decided = Propagator::new().propagate_all(&puzzle, &mut grid)?;
/// assert_eq!(decided, 9);
/// assert!(grid.is_complete());
/// # Ok::<(), Box<dyn std::error::Error>>(())
/// ```
#[derive(Debug, Default)]
pub struct Propagator {
    line_solver: LineSolver,
    queue: VecDeque<Line>,
    queued: Vec<bool>,
    buf: Vec<Cell>,
}

impl Propagator {
    /// Creates a propagation engine with empty scratch state.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    fn ordinal(line: Line, height: usize) -> usize {
        match line {
            Line::Row { y } => y,
            Line::Column { x } => height + x,
        }
    }

    fn enqueue(&mut self, line: Line, height: usize) {
        let ordinal = Self::ordinal(line, height);
        if !self.queued[ordinal] {
            self.queued[ordinal] = true;
            self.queue.push_back(line);
        }
    }

    /// Propagates with every line initially dirty.
    ///
    /// Returns the number of cells decided.
    ///
    /// # Errors
    ///
    /// Returns [`Contradiction`] if some line has no consistent placement.
    pub fn propagate_all(
        &mut self,
        puzzle: &Puzzle,
        grid: &mut Grid,
    ) -> Result<usize, Contradiction> {
        self.propagate(puzzle, grid, Line::all(grid.width(), grid.height()))
    }

    /// Propagates starting from the given dirty lines.
    ///
    /// After a guess decides a single cell, seeding the two lines crossing
    /// that cell is sufficient; every further consequence dirties its own
    /// perpendicular lines as it is written.
    ///
    /// Returns the number of cells decided.
    ///
    /// # Errors
    ///
    /// Returns [`Contradiction`] if some line has no consistent placement.
    pub fn propagate(
        &mut self,
        puzzle: &Puzzle,
        grid: &mut Grid,
        dirty: impl IntoIterator<Item = Line>,
    ) -> Result<usize, Contradiction> {
        let height = grid.height();
        self.queue.clear();
        self.queued.clear();
        self.queued.resize(height + grid.width(), false);
        for line in dirty {
            self.enqueue(line, height);
        }

        let mut decided = 0;
        while let Some(line) = self.queue.pop_front() {
            self.queued[Self::ordinal(line, height)] = false;

            let mut buf = std::mem::take(&mut self.buf);
            grid.copy_line_into(line, &mut buf);
            let result = self.line_solver.solve_line(puzzle.hints(line), &mut buf);
            let changes = match result {
                Ok(changes) => changes,
                Err(contradiction) => {
                    self.buf = buf;
                    log::trace!("{line} contradicts");
                    return Err(contradiction);
                }
            };

            if !changes.is_empty() {
                log::trace!("{line} decided {} cell(s)", changes.positions().len());
            }
            for &i in changes.positions() {
                grid.set(line.position_at(i), buf[i]);
                self.enqueue(line.perpendicular_at(i), height);
                decided += 1;
            }
            self.buf = buf;
        }
        Ok(decided)
    }
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
    fn test_single_cell_puzzle() {
        let puzzle = puzzle(&[&[1]], &[&[1]]);
        let mut grid = Grid::new(1, 1);
        let decided = Propagator::new().propagate_all(&puzzle, &mut grid).unwrap();
        assert_eq!(decided, 1);
        assert_eq!(grid.to_string(), "#\n");
    }

    #[test]
    fn test_solid_five_by_five() {
        let puzzle = puzzle(
            &[&[5], &[5], &[5], &[5], &[5]],
            &[&[5], &[5], &[5], &[5], &[5]],
        );
        let mut grid = Grid::new(5, 5);
        let decided = Propagator::new().propagate_all(&puzzle, &mut grid).unwrap();
        assert_eq!(decided, 25);
        assert!(grid.satisfies(&puzzle));
        assert!(grid.cells().all(|cell| cell == Cell::Filled));
    }

    #[test]
    fn test_cross_line_cascade() {
        // Row 0 is forced outright; its cells then force the columns, which
        // force the remaining rows.
        let puzzle = puzzle(&[&[3], &[1, 1], &[3]], &[&[3], &[1, 1], &[3]]);
        let mut grid = Grid::new(3, 3);
        Propagator::new().propagate_all(&puzzle, &mut grid).unwrap();
        assert_eq!(grid.to_string(), "###\n#.#\n###\n");
    }

    #[test]
    fn test_fixpoint_is_idempotent() {
        let puzzle = puzzle(&[&[3], &[1, 1], &[3]], &[&[3], &[1, 1], &[3]]);
        let mut grid = Grid::new(3, 3);
        let mut propagator = Propagator::new();
        propagator.propagate_all(&puzzle, &mut grid).unwrap();

        let before = grid.clone();
        let decided = propagator.propagate_all(&puzzle, &mut grid).unwrap();
        assert_eq!(decided, 0);
        assert_eq!(grid, before);
    }

    #[test]
    fn test_stalls_short_of_a_guess() {
        // Every line admits several placements; nothing is forced.
        let puzzle = puzzle(&[&[1], &[1]], &[&[1], &[1]]);
        let mut grid = Grid::new(2, 2);
        let decided = Propagator::new().propagate_all(&puzzle, &mut grid).unwrap();
        assert_eq!(decided, 0);
        assert_eq!(grid.unknown_count(), 4);
    }

    #[test]
    fn test_contradiction_across_lines() {
        // Row and column hints individually fit but cannot agree (the hint
        // totals differ, which Puzzle::validate would flag; the propagation
        // engine discovers the conflict on its own).
        let puzzle = puzzle(&[&[1], &[1]], &[&[2], &[1]]);
        let mut grid = Grid::new(2, 2);
        let result = Propagator::new().propagate_all(&puzzle, &mut grid);
        assert_eq!(result, Err(Contradiction));
    }

    #[test]
    fn test_seeded_propagation_after_a_guess() {
        let puzzle = puzzle(&[&[1], &[1]], &[&[1], &[1]]);
        let mut grid = Grid::new(2, 2);
        let mut propagator = Propagator::new();
        propagator.propagate_all(&puzzle, &mut grid).unwrap();

        // Guess the top-left cell and re-propagate only the crossing lines.
        grid.set(piclace_core::Position::new(0, 0), Cell::Filled);
        let decided = propagator
            .propagate(&puzzle, &mut grid, [Line::row(0), Line::column(0)])
            .unwrap();
        assert_eq!(decided, 3);
        assert_eq!(grid.to_string(), "#.\n.#\n");
    }
}
