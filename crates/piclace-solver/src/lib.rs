//! The nonogram solving engine.
//!
//! Solving runs in two cooperating layers:
//!
//! 1. **Line solving + propagation** — [`line_solver`] decides every cell a
//!    single line's hints force on their own; [`propagation`] drives those
//!    passes over a dirty-line worklist until a fixpoint or a contradiction.
//! 2. **Search** — [`search`] guesses undecided cells with explicit grid
//!    checkpoints, backtracks on contradiction, counts attempts, and keeps
//!    exploring after the first solution so ambiguous puzzles are detected.
//!
//! [`session`] wraps both behind a validated, cancellable, progress-emitting
//! run, which is the API a front end consumes.
//!
//! # Examples
//!
//! ```
//! use piclace_core::Puzzle;
//! use piclace_solver::SolveSession;
//!
//! let puzzle: Puzzle = "
//! rows:
//! 2
//! 1 1
//! cols:
//! 2
//! 1
//! 1
//! "
//! .parse()?;
//!
//! let report = SolveSession::new(puzzle)?.solve();
//! let solution = report.outcome.solution().unwrap();
//! assert_eq!(solution.to_string(), "##.\n#.#\n");
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

pub mod cancel;
pub mod line_solver;
pub mod progress;
pub mod propagation;
pub mod search;
pub mod session;

// Re-export the types front ends interact with.
pub use self::{
    cancel::CancelToken,
    line_solver::{Contradiction, LineChanges, LineSolver},
    progress::{IgnoreProgress, Progress, ProgressObserver},
    propagation::Propagator,
    search::BacktrackSolver,
    session::{SolveOptions, SolveOutcome, SolveReport, SolveSession},
};
