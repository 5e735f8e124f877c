//! # Retain Core
//!
//! Spaced-repetition engine for vocabulary cards and verb-conjugation drills.
//!
//! - **Memory Model**: per-item stability/difficulty record, FSRS-5 power
//!   forgetting curve, versioned weight vector
//! - **Scheduler**: previews the four possible outcomes of a review and commits
//!   the one the learner picked, producing an append-only log entry
//!
//! The engine is pure: no I/O, no interior mutability, no global parameter
//! set. Persisting the returned record and log entry (atomically per item) is
//! the caller's job.
//!
//! ## Quick Start
//!
//! ```rust
//! use chrono::Utc;
//! use retain_core::{FSRSScheduler, Rating};
//!
//! let scheduler = FSRSScheduler::default();
//! let now = Utc::now();
//! let card = scheduler.new_item(now);
//!
//! // Show the learner what each button would do
//! let preview = scheduler.preview(&card, now)?;
//! for (rating, outcome) in preview.iter() {
//!     println!("{}: {}", rating, retain_core::format_duration(outcome.interval()));
//! }
//!
//! // Apply the chosen rating
//! let result = scheduler.commit(&card, Rating::Good, now)?;
//! assert_eq!(result.memory.reps, 1);
//! # Ok::<(), retain_core::SchedulerError>(())
//! ```

#![warn(rustdoc::missing_crate_level_docs)]

// ============================================================================
// MODULES
// ============================================================================

pub mod config;
pub mod error;
pub mod format;
pub mod fsrs;
pub mod memory;
pub mod queue;

// ============================================================================
// PUBLIC API RE-EXPORTS
// ============================================================================

pub use error::{Result, SchedulerError};

// Memory types
pub use memory::{LearningState, MemoryState, Rating, ReviewLog, Reviewable};

// FSRS-5 algorithm
pub use fsrs::{
    retrievability,
    next_interval,
    FSRSParameters,
    FSRSScheduler,
    LearningSteps,
    PreviewResults,
    ReviewResult,
    Weights,
};

// Configuration
pub use config::{load_parameters, ConfigError};

// Helpers
pub use format::{format_duration, format_interval};
pub use queue::{count_due, due_items};

// ============================================================================
// VERSION INFO
// ============================================================================

/// Crate version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Prelude for convenient imports
pub mod prelude {
    pub use crate::{
        FSRSParameters, FSRSScheduler, LearningState, MemoryState, PreviewResults, Rating,
        ReviewLog, ReviewResult, Reviewable, SchedulerError,
    };
}
