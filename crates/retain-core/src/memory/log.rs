//! Review log entries
//!
//! Append-only history produced by every committed review. The engine writes
//! these but never reads them back.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::{LearningState, Rating};

/// One review, as recorded after the scheduler applied it
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReviewLog {
    /// Rating the learner submitted
    pub rating: Rating,
    /// State after the review
    pub state: LearningState,
    /// Next due timestamp after the review
    pub due: DateTime<Utc>,
    /// Stability after the review
    pub stability: f64,
    /// Difficulty after the review
    pub difficulty: f64,
    /// Whole days since the previous review
    pub elapsed_days: u32,
    /// Interval assigned by this review (0 for sub-day steps)
    pub scheduled_days: u32,
    /// When the review happened
    pub review_time: DateTime<Utc>,
}
