//! Per-line inference using the overlap/boundary technique.
//!
//! A single pass computes the **leftmost** and **rightmost** valid placements
//! of the line's blocks given the already decided cells, then derives every
//! cell that is forced across *all* consistent placements:
//!
//! - a cell lying inside the same block's leftmost and rightmost span is
//!   forced `Filled`,
//! - a cell reachable by no block at all is forced `Empty`,
//! - a line with no valid placement left reports a [`Contradiction`].
//!
//! This is sound but deliberately incomplete per line; cross-line propagation
//! and search supply the rest.

use piclace_core::{Cell, LineHints};
use tinyvec::TinyVec;

/// Block start positions of one extreme placement.
type Starts = TinyVec<[usize; 8]>;

/// A line (or branch) admits no placement consistent with its decided cells.
///
/// This is a control signal that drives backtracking inside the engine; it is
/// never surfaced through the public solve outcome.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Contradiction;

impl std::fmt::Display for Contradiction {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("line admits no placement consistent with the decided cells")
    }
}

impl std::error::Error for Contradiction {}

/// The cell indices decided by one line-solver pass.
#[derive(Debug, Default, Clone)]
pub struct LineChanges {
    changed: TinyVec<[usize; 16]>,
}

impl LineChanges {
    /// Returns `true` if the pass decided nothing new.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.changed.is_empty()
    }

    /// Returns the decided cell indices within the line.
    #[must_use]
    pub fn positions(&self) -> &[usize] {
        &self.changed
    }

    fn push(&mut self, i: usize) {
        self.changed.push(i);
    }
}

/// Indexes the placement-feasibility table built by [`compute_fits`].
struct Fits<'a> {
    table: &'a [bool],
    k: usize,
}

impl Fits<'_> {
    fn at(&self, i: usize, j: usize) -> bool {
        self.table[i * (self.k + 1) + j]
    }
}

/// Fills `table` so that entry `(i, j)` answers: can `blocks[j..]` be placed
/// in `cells[i..]` without covering an `Empty` cell or skipping a `Filled`
/// one?
fn compute_fits(table: &mut Vec<bool>, blocks: &[usize], cells: &[Cell]) {
    let n = cells.len();
    let k = blocks.len();
    table.clear();
    table.resize((n + 1) * (k + 1), false);
    let at = |i: usize, j: usize| i * (k + 1) + j;

    for i in (0..=n).rev() {
        for j in (0..=k).rev() {
            let value = if j == k {
                // No blocks left: the remainder may not contain a Filled cell.
                i == n || (cells[i] != Cell::Filled && table[at(i + 1, k)])
            } else if i == n {
                false
            } else {
                // Leave cell i uncovered...
                let mut ok = cells[i] != Cell::Filled && table[at(i + 1, j)];
                // ...or start block j here.
                if !ok {
                    let end = i + blocks[j];
                    if end <= n && cells[i..end].iter().all(|&c| c != Cell::Empty) {
                        ok = if end == n {
                            j + 1 == k
                        } else {
                            cells[end] != Cell::Filled && table[at(end + 1, j + 1)]
                        };
                    }
                }
                ok
            };
            table[at(i, j)] = value;
        }
    }
}

/// Greedily derives the leftmost valid placement, or `None` if the line
/// admits no placement at all.
fn leftmost(blocks: &[usize], cells: &[Cell], fits: &Fits<'_>) -> Option<Starts> {
    let n = cells.len();
    let k = blocks.len();
    if k == 0 {
        return cells
            .iter()
            .all(|&c| c != Cell::Filled)
            .then(Starts::default);
    }

    let mut starts = Starts::default();
    let mut next = 0;
    for (j, &len) in blocks.iter().enumerate() {
        let mut s = next;
        loop {
            if s + len > n {
                return None;
            }
            let span_ok = cells[s..s + len].iter().all(|&c| c != Cell::Empty);
            let rest_ok = if s + len == n {
                j + 1 == k
            } else {
                cells[s + len] != Cell::Filled && fits.at(s + len + 1, j + 1)
            };
            if span_ok && rest_ok {
                break;
            }
            // A Filled cell cannot be left uncovered by shifting further.
            if cells[s] == Cell::Filled {
                return None;
            }
            s += 1;
        }
        starts.push(s);
        next = s + len + 1;
    }
    Some(starts)
}

/// A reusable per-line solver.
///
/// Holds scratch buffers so repeated propagation passes do not reallocate.
///
/// # Examples
///
/// ```
/// use piclace_core::{Cell, LineHints};
/// use piclace_solver::line_solver::LineSolver;
///
/// let mut solver = LineSolver::new();
/// let hints = LineHints::new(vec![3]);
/// let mut cells = [Cell::Unknown; 5];
/// let changes = solver.solve_line(&hints, &mut cells).unwrap();
///
/// // A 3-block in a 5-cell line always covers the middle cell.
/// assert_eq!(changes.positions(), &[2]);
/// assert_eq!(cells[2], Cell::Filled);
/// ```
#[derive(Debug, Default)]
pub struct LineSolver {
    fits: Vec<bool>,
    fits_rev: Vec<bool>,
    reversed: Vec<Cell>,
    covered: Vec<bool>,
}

impl LineSolver {
    /// Creates a line solver with empty scratch buffers.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Decides every cell of `cells` that is forced by `hints` alone, in
    /// place.
    ///
    /// Already decided cells are never altered; only `Unknown` cells can
    /// change, and their indices are reported in the returned
    /// [`LineChanges`].
    ///
    /// # Errors
    ///
    /// Returns [`Contradiction`] if no block placement is consistent with the
    /// decided cells.
    pub fn solve_line(
        &mut self,
        hints: &LineHints,
        cells: &mut [Cell],
    ) -> Result<LineChanges, Contradiction> {
        let n = cells.len();
        let blocks: TinyVec<[usize; 8]> =
            hints.blocks().iter().map(|&b| b as usize).collect();
        let k = blocks.len();

        compute_fits(&mut self.fits, &blocks, cells);
        let left = leftmost(&blocks, cells, &Fits { table: &self.fits, k }).ok_or(Contradiction)?;

        self.reversed.clear();
        self.reversed.extend(cells.iter().rev().copied());
        let rev_blocks: TinyVec<[usize; 8]> = blocks.iter().rev().copied().collect();
        compute_fits(&mut self.fits_rev, &rev_blocks, &self.reversed);
        let rev_left = leftmost(
            &rev_blocks,
            &self.reversed,
            &Fits {
                table: &self.fits_rev,
                k,
            },
        )
        .ok_or(Contradiction)?;
        let right: Starts = (0..k).map(|j| n - rev_left[k - 1 - j] - blocks[j]).collect();

        let mut changes = LineChanges::default();
        self.covered.clear();
        self.covered.resize(n, false);

        for j in 0..k {
            let len = blocks[j];
            let (l, r) = (left[j], right[j]);
            debug_assert!(l <= r, "leftmost start past rightmost start");
            for flag in &mut self.covered[l..r + len] {
                *flag = true;
            }
            // Overlap of the extreme spans is filled in every placement.
            for i in r..(l + len).max(r) {
                match cells[i] {
                    Cell::Unknown => {
                        cells[i] = Cell::Filled;
                        changes.push(i);
                    }
                    Cell::Filled => {}
                    Cell::Empty => unreachable!("extreme placements never cover an Empty cell"),
                }
            }
        }

        for (i, cell) in cells.iter_mut().enumerate() {
            if self.covered[i] {
                continue;
            }
            match *cell {
                Cell::Unknown => {
                    *cell = Cell::Empty;
                    changes.push(i);
                }
                // A Filled cell outside every block's reach contradicts the
                // hints even though a placement of the blocks exists.
                Cell::Filled => return Err(Contradiction),
                Cell::Empty => {}
            }
        }

        Ok(changes)
    }
}
