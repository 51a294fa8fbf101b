//! Structural puzzle validation.
//!
//! Validation never fails fast: every violated line is collected so a caller
//! can highlight all offending rows and columns in one pass. Passing
//! validation is a necessary condition only; cross-line conflicts are
//! discovered during solving.

use std::fmt;

use derive_more::{Display, Error};

use crate::{Line, Puzzle};

/// The hint axis a shape mismatch refers to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display)]
pub enum Axis {
    /// The row hint list.
    #[display("row")]
    Rows,
    /// The column hint list.
    #[display("column")]
    Columns,
}

/// A single violated structural invariant.
#[derive(Debug, Clone, PartialEq, Eq, Display)]
pub enum Violation {
    /// The declared grid size disagrees with the number of hint sequences.
    #[display("declared {declared} {axis}(s) but {hinted} {axis} hint sequence(s) were given")]
    ShapeMismatch {
        /// Which hint list is mis-sized.
        axis: Axis,
        /// The declared dimension.
        declared: usize,
        /// The number of hint sequences actually given.
        hinted: usize,
    },
    /// A line has no hints at all; "all empty" lines are not expressible.
    #[display("{line} hints are empty")]
    EmptyHints {
        /// The offending line.
        line: Line,
    },
    /// A block length of zero appeared in a hint sequence.
    #[display("{line} hints contain a zero-length block")]
    ZeroBlock {
        /// The offending line.
        line: Line,
    },
    /// The blocks plus their mandatory gaps do not fit in the line.
    #[display("{line} hints need {needed} cells but the line has {available}")]
    Overflow {
        /// The offending line.
        line: Line,
        /// Minimal span required by the hints.
        needed: usize,
        /// Cells available in the line.
        available: usize,
    },
    /// Row hints and column hints disagree on the total filled-cell count.
    #[display("row hints fill {row_total} cells but column hints fill {col_total}")]
    SumMismatch {
        /// Total filled cells according to the row hints.
        row_total: u64,
        /// Total filled cells according to the column hints.
        col_total: u64,
    },
}

/// The full set of structural violations found in a puzzle.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub struct ValidationError {
    violations: Vec<Violation>,
}

impl ValidationError {
    /// Returns every violation, in row-then-column order.
    #[must_use]
    pub fn violations(&self) -> &[Violation] {
        &self.violations
    }
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "invalid puzzle ({} violation(s))", self.violations.len())?;
        for violation in &self.violations {
            write!(f, "\n  {violation}")?;
        }
        Ok(())
    }
}

pub(crate) fn validate(puzzle: &Puzzle) -> Result<(), ValidationError> {
    let mut violations = Vec::new();

    if puzzle.row_hints().len() != puzzle.height() {
        violations.push(Violation::ShapeMismatch {
            axis: Axis::Rows,
            declared: puzzle.height(),
            hinted: puzzle.row_hints().len(),
        });
    }
    if puzzle.col_hints().len() != puzzle.width() {
        violations.push(Violation::ShapeMismatch {
            axis: Axis::Columns,
            declared: puzzle.width(),
            hinted: puzzle.col_hints().len(),
        });
    }

    let axes = [
        (Line::row as fn(usize) -> Line, puzzle.row_hints(), puzzle.width()),
        (Line::column, puzzle.col_hints(), puzzle.height()),
    ];
    for (make_line, hint_list, capacity) in axes {
        for (i, hints) in hint_list.iter().enumerate() {
            let line = make_line(i);
            if hints.blocks().is_empty() {
                violations.push(Violation::EmptyHints { line });
                continue;
            }
            if hints.blocks().contains(&0) {
                violations.push(Violation::ZeroBlock { line });
            }
            if hints.min_span() > capacity {
                violations.push(Violation::Overflow {
                    line,
                    needed: hints.min_span(),
                    available: capacity,
                });
            }
        }
    }

    let row_total: u64 = puzzle
        .row_hints()
        .iter()
        .map(|hints| u64::from(hints.filled_total()))
        .sum();
    let col_total: u64 = puzzle
        .col_hints()
        .iter()
        .map(|hints| u64::from(hints.filled_total()))
        .sum();
    if row_total != col_total {
        violations.push(Violation::SumMismatch {
            row_total,
            col_total,
        });
    }

    if violations.is_empty() {
        Ok(())
    } else {
        Err(ValidationError { violations })
    }
}
