//! Typed errors for the session engine.

use std::io;
use std::path::PathBuf;

use thiserror::Error;

use crate::session::Phase;

/// `sample()` was invoked on an exhausted color pool.
///
/// Correct session sequencing refills the pool at every group transition
/// before it can run dry, so this is a defensive error: the triggering
/// operation must be treated as a no-op by the caller.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("color pool is exhausted")]
pub struct EmptyPoolError;

/// A group index pointed past the end of the shuffled background schedule.
///
/// This is a programming-invariant violation (6 groups map onto 6 pairs),
/// surfaced to the caller rather than silently wrapped.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("no background pair for group index {index} ({len} pairs scheduled)")]
pub struct OutOfRangeError {
    pub index: usize,
    pub len: usize,
}

/// Errors surfaced by [`ExperimentSession`](crate::session::ExperimentSession)
/// operations.
#[derive(Debug, Error)]
pub enum SessionError {
    /// An operation was invoked in a phase that forbids it, e.g.
    /// `submit_trial` while resting. State-machine misuse fails loudly.
    #[error("{operation} requires the {expected:?} phase, session is {actual:?}")]
    PhaseViolation {
        operation: &'static str,
        expected: Phase,
        actual: Phase,
    },

    #[error(transparent)]
    EmptyPool(#[from] EmptyPoolError),

    #[error(transparent)]
    BackgroundOutOfRange(#[from] OutOfRangeError),

    /// Writing the CSV export failed. Export happens once at a terminal
    /// point and is never retried automatically.
    #[error("failed to export trial log to {path}")]
    Export {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}
