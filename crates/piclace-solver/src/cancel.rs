//! Cooperative cancellation.

use std::sync::Arc;

use portable_atomic::{AtomicBool, Ordering};

/// A cloneable handle for requesting early termination of a solve.
///
/// Cancellation is cooperative: the engine polls the token at the start of
/// every search step and unwinds at the next poll after [`cancel`](Self::cancel)
/// is called, yielding [`SolveOutcome::Cancelled`](crate::SolveOutcome::Cancelled)
/// with the last stable grid snapshot. The token can be handed to another
/// thread and triggered at any time.
///
/// # Examples
///
/// ```
/// use piclace_solver::CancelToken;
///
/// let token = CancelToken::new();
/// let handle = token.clone();
/// assert!(!token.is_cancelled());
/// handle.cancel();
/// assert!(token.is_cancelled());
/// ```
#[derive(Debug, Clone, Default)]
pub struct CancelToken {
    cancelled: Arc<AtomicBool>,
}

impl CancelToken {
    /// Creates a token in the not-cancelled state.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Requests cancellation.
    ///
    /// Idempotent; a token cannot be reset.
    pub fn cancel(&self) {
        self.cancelled.store(true, Ordering::Relaxed);
    }

    /// Returns `true` once cancellation has been requested.
    #[must_use]
    pub fn is_cancelled(&self) -> bool {
        self.cancelled.load(Ordering::Relaxed)
    }
}
