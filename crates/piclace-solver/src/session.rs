//! Solve sessions: validation, orchestration, and result reporting.

use std::time::Duration;

use derive_more::{Display, IsVariant};
use piclace_core::{Grid, Puzzle, ValidationError};

use crate::{
    cancel::CancelToken,
    progress::{IgnoreProgress, ProgressObserver},
    search,
};

/// Tunables for a solve run.
///
/// # Examples
///
/// ```
/// use piclace_solver::SolveOptions;
///
/// let options = SolveOptions::new()
///     .report_interval(64)
///     .attempt_budget(100_000);
/// ```
#[derive(Debug, Clone)]
pub struct SolveOptions {
    pub(crate) report_interval: u64,
    pub(crate) attempt_budget: Option<u64>,
}

impl SolveOptions {
    /// Creates the default options: a progress report every 512 attempts and
    /// no attempt budget.
    #[must_use]
    pub fn new() -> Self {
        Self {
            report_interval: 512,
            attempt_budget: None,
        }
    }

    /// Sets how many attempts pass between progress reports (minimum 1).
    #[must_use]
    pub fn report_interval(mut self, interval: u64) -> Self {
        self.report_interval = interval;
        self
    }

    /// Bounds the total number of attempts. A run that exhausts the budget
    /// terminates with [`SolveOutcome::Cancelled`], never `Unsatisfiable`.
    #[must_use]
    pub fn attempt_budget(mut self, budget: u64) -> Self {
        self.attempt_budget = Some(budget);
        self
    }
}

impl Default for SolveOptions {
    fn default() -> Self {
        Self::new()
    }
}

/// The terminal result of a solve, delivered exactly once.
#[derive(Debug, Clone, PartialEq, Eq, Display, IsVariant)]
pub enum SolveOutcome {
    /// Exactly one grid satisfies every hint.
    #[display("solved")]
    Solved(Grid),
    /// No grid satisfies the hints. Final and non-retryable; solving the
    /// same puzzle again cannot succeed.
    #[display("unsatisfiable")]
    Unsatisfiable,
    /// More than one grid satisfies the hints; both witnesses are carried.
    #[display("ambiguous")]
    Ambiguous {
        /// The solution reached first under the documented branch ordering.
        first: Grid,
        /// A second, distinct solution.
        second: Grid,
    },
    /// The caller cancelled the run (or its attempt budget ran out).
    #[display("cancelled")]
    Cancelled {
        /// The last stable grid snapshot: every decided cell is consistent
        /// with the prefix of the search explored so far.
        partial: Grid,
    },
}

impl SolveOutcome {
    /// Returns the unique solution, if this outcome is [`Solved`](Self::Solved).
    #[must_use]
    pub fn solution(&self) -> Option<&Grid> {
        match self {
            SolveOutcome::Solved(grid) => Some(grid),
            _ => None,
        }
    }
}

/// The outcome of a solve together with its counters.
#[derive(Debug, Clone)]
pub struct SolveReport {
    /// The terminal outcome.
    pub outcome: SolveOutcome,
    /// Total search guesses made (propagation alone never counts).
    pub attempts: u64,
    /// Wall-clock time the run took.
    pub elapsed: Duration,
}

/// A single solve of a single puzzle, with an attached cancellation handle.
///
/// The session owns all solve state explicitly; nothing about the puzzle or
/// the grid lives in ambient globals. Constructing the session validates the
/// puzzle up front, so a session that exists can always be run.
///
/// # Examples
///
/// ```
/// use piclace_core::Puzzle;
/// use piclace_solver::{Progress, SolveSession};
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
/// let session = SolveSession::new(puzzle)?;
/// let report = session.run(&mut |progress: Progress<'_>| {
///     eprintln!("{} attempts so far", progress.attempts());
/// });
/// assert!(report.outcome.is_solved());
/// # Ok::<(), Box<dyn std::error::Error>>(())
/// ```
#[derive(Debug)]
pub struct SolveSession {
    puzzle: Puzzle,
    options: SolveOptions,
    cancel: CancelToken,
}

impl SolveSession {
    /// Creates a session with default options.
    ///
    /// # Errors
    ///
    /// Returns the full [`ValidationError`] if the puzzle violates any
    /// structural invariant.
    pub fn new(puzzle: Puzzle) -> Result<Self, ValidationError> {
        Self::with_options(puzzle, SolveOptions::new())
    }

    /// Creates a session with the given options.
    ///
    /// # Errors
    ///
    /// Returns the full [`ValidationError`] if the puzzle violates any
    /// structural invariant.
    pub fn with_options(puzzle: Puzzle, options: SolveOptions) -> Result<Self, ValidationError> {
        puzzle.validate()?;
        Ok(Self {
            puzzle,
            options,
            cancel: CancelToken::new(),
        })
    }

    /// Returns the puzzle this session solves.
    #[must_use]
    pub fn puzzle(&self) -> &Puzzle {
        &self.puzzle
    }

    /// Returns a handle that cancels this session's run from anywhere.
    #[must_use]
    pub fn cancel_token(&self) -> CancelToken {
        self.cancel.clone()
    }

    /// Runs the solve to completion, streaming progress to `observer`.
    ///
    /// Consumes the session: `Unsatisfiable` is final, and retrying with
    /// different hints is a new, independent solve.
    pub fn run(self, observer: &mut dyn ProgressObserver) -> SolveReport {
        log::debug!(
            "solving {}x{} puzzle",
            self.puzzle.width(),
            self.puzzle.height()
        );
        let report = search::run(&self.puzzle, &self.options, observer, &self.cancel);
        log::debug!(
            "{} after {} attempt(s) in {:.2?}",
            report.outcome,
            report.attempts,
            report.elapsed
        );
        report
    }

    /// Runs the solve without progress reporting.
    pub fn solve(self) -> SolveReport {
        self.run(&mut IgnoreProgress)
    }
}

#[cfg(test)]
mod tests {
    use piclace_core::{LineHints, Violation};

    use super::*;
    use crate::progress::Progress;

    fn puzzle(rows: &[&[u32]], cols: &[&[u32]]) -> Puzzle {
        Puzzle::new(
            rows.len(),
            cols.len(),
            rows.iter().map(|blocks| LineHints::new(blocks.to_vec())).collect(),
            cols.iter().map(|blocks| LineHints::new(blocks.to_vec())).collect(),
        )
    }

    #[test]
    fn test_invalid_puzzle_never_becomes_a_session() {
        let err = SolveSession::new(puzzle(&[&[1], &[1]], &[&[2], &[1]])).unwrap_err();
        assert!(
            err.violations()
                .iter()
                .any(|v| matches!(v, Violation::SumMismatch { .. }))
        );
    }

    #[test]
    fn test_session_solves_and_reports() {
        let session = SolveSession::with_options(
            puzzle(&[&[1, 1], &[2]], &[&[1], &[1], &[1], &[1]]),
            SolveOptions::new().report_interval(1),
        )
        .unwrap();

        let mut attempts_seen = Vec::new();
        let mut observer = |progress: Progress<'_>| attempts_seen.push(progress.attempts());
        let report = session.run(&mut observer);

        assert_eq!(
            report.outcome.solution().unwrap().to_string(),
            "#..#\n.##.\n"
        );
        // The initial snapshot plus at least one in-search report, with the
        // counter never moving backwards.
        assert_eq!(attempts_seen[0], 0);
        assert!(attempts_seen.len() >= 2);
        assert!(attempts_seen.windows(2).all(|w| w[0] <= w[1]));
        assert!(attempts_seen.iter().all(|&n| n <= report.attempts));
    }

    #[test]
    fn test_cancel_handle_stops_the_run() {
        let session = SolveSession::new(puzzle(&[&[1], &[1]], &[&[1], &[1]])).unwrap();
        session.cancel_token().cancel();
        let report = session.solve();
        assert!(report.outcome.is_cancelled());
        assert_eq!(report.attempts, 0);
    }

    #[test]
    fn test_outcome_display_labels() {
        assert_eq!(SolveOutcome::Unsatisfiable.to_string(), "unsatisfiable");
        let session = SolveSession::new(puzzle(&[&[1]], &[&[1]])).unwrap();
        assert_eq!(session.solve().outcome.to_string(), "solved");
    }
}
