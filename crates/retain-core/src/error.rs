//! Engine errors
//!
//! Every error is local to one call. The engine performs no I/O, so nothing
//! here is retryable from the inside; the caller decides whether to reject the
//! learner's action or surface the problem.

/// Scheduler error type
#[non_exhaustive]
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum SchedulerError {
    /// A rating value outside Again/Hard/Good/Easy
    #[error("Invalid rating: {0} (expected 1=Again, 2=Hard, 3=Good, 4=Easy)")]
    InvalidRating(String),
    /// Persisted memory state that cannot have come from the scheduler
    #[error("Invalid item state: {0}")]
    InvalidItemState(String),
    /// Weight vector or scheduling constants out of range
    #[error("Invalid parameters: {0}")]
    InvalidParameters(String),
}

/// Result type for engine operations
pub type Result<T> = std::result::Result<T, SchedulerError>;
