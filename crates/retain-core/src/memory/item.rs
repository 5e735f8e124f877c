//! Item memory state
//!
//! One record per learnable unit. Vocabulary cards and conjugation drills carry
//! the same record, so the scheduler never needs to know which one it is
//! looking at.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::SchedulerError;

// ============================================================================
// LEARNING STATE
// ============================================================================

/// Position of an item in the review state machine
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum LearningState {
    /// Never reviewed
    #[default]
    New,
    /// Being learned with sub-day steps
    Learning,
    /// Graduated, scheduled in whole days
    Review,
    /// Lapsed out of Review, back on sub-day steps
    Relearning,
}

impl LearningState {
    /// Integer code used by persisted rows (0-3)
    pub fn as_i32(self) -> i32 {
        match self {
            LearningState::New => 0,
            LearningState::Learning => 1,
            LearningState::Review => 2,
            LearningState::Relearning => 3,
        }
    }

    /// Lowercase name
    pub fn as_str(self) -> &'static str {
        match self {
            LearningState::New => "new",
            LearningState::Learning => "learning",
            LearningState::Review => "review",
            LearningState::Relearning => "relearning",
        }
    }

    /// Learning and Relearning are scheduled in minutes, not days
    pub fn is_short_term(self) -> bool {
        matches!(self, LearningState::Learning | LearningState::Relearning)
    }
}

impl TryFrom<i32> for LearningState {
    type Error = SchedulerError;

    fn try_from(value: i32) -> Result<Self, Self::Error> {
        match value {
            0 => Ok(LearningState::New),
            1 => Ok(LearningState::Learning),
            2 => Ok(LearningState::Review),
            3 => Ok(LearningState::Relearning),
            other => Err(SchedulerError::InvalidItemState(format!(
                "unknown learning state code {}",
                other
            ))),
        }
    }
}

impl std::fmt::Display for LearningState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

// ============================================================================
// MEMORY STATE
// ============================================================================

/// Per-item memory model and schedule
///
/// Field names match the persisted columns so callers can store the record
/// as-is.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MemoryState {
    /// Days until retrievability falls to 90% without review
    pub stability: f64,
    /// Intrinsic hardness (1.0 = easy, 10.0 = hard)
    pub difficulty: f64,
    /// Whole days between the previous review and the latest one
    pub elapsed_days: u32,
    /// Interval predicted at the latest review (0 for sub-day steps)
    pub scheduled_days: u32,
    /// Reviews ever applied
    pub reps: u32,
    /// Again ratings received while in Review
    pub lapses: u32,
    /// State machine position
    pub state: LearningState,
    /// Next scheduled review
    pub due: DateTime<Utc>,
    /// Most recent review, absent for new items
    #[serde(default)]
    pub last_review: Option<DateTime<Utc>>,
}

impl MemoryState {
    /// Empty record for a freshly introduced item, due immediately
    pub fn new(now: DateTime<Utc>) -> Self {
        Self {
            stability: 0.0,
            difficulty: 0.0,
            elapsed_days: 0,
            scheduled_days: 0,
            reps: 0,
            lapses: 0,
            state: LearningState::New,
            due: now,
            last_review: None,
        }
    }

    /// Whether the item is eligible for review at `now`
    pub fn is_due(&self, now: DateTime<Utc>) -> bool {
        self.due <= now
    }

    /// Whether the item has never been reviewed
    pub fn is_new(&self) -> bool {
        self.state == LearningState::New
    }
}

/// Anything that carries exactly one memory-state record
///
/// Lets the due queue and callers treat cards and drills uniformly.
pub trait Reviewable {
    /// The item's memory state
    fn memory(&self) -> &MemoryState;
}

impl Reviewable for MemoryState {
    fn memory(&self) -> &MemoryState {
        self
    }
}

impl<T: Reviewable + ?Sized> Reviewable for &T {
    fn memory(&self) -> &MemoryState {
        (**self).memory()
    }
}
