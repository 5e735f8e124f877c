//! Review ratings
//!
//! The only input a learner provides per review.

use serde::{Deserialize, Serialize};

use crate::error::SchedulerError;

/// Self-reported recall quality, ordered by severity
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Rating {
    /// Forgot the answer
    Again,
    /// Recalled with serious difficulty
    Hard,
    /// Recalled after some hesitation
    Good,
    /// Recalled effortlessly
    Easy,
}

impl Rating {
    /// All ratings, in ascending order
    pub const ALL: [Rating; 4] = [Rating::Again, Rating::Hard, Rating::Good, Rating::Easy];

    /// Numeric grade used by persisted review rows (1-4)
    pub fn as_i32(self) -> i32 {
        match self {
            Rating::Again => 1,
            Rating::Hard => 2,
            Rating::Good => 3,
            Rating::Easy => 4,
        }
    }

    /// Parse a numeric grade; `None` outside 1-4
    pub fn from_i32(value: i32) -> Option<Self> {
        match value {
            1 => Some(Rating::Again),
            2 => Some(Rating::Hard),
            3 => Some(Rating::Good),
            4 => Some(Rating::Easy),
            _ => None,
        }
    }

    /// Lowercase name
    pub fn as_str(self) -> &'static str {
        match self {
            Rating::Again => "again",
            Rating::Hard => "hard",
            Rating::Good => "good",
            Rating::Easy => "easy",
        }
    }

    /// Whether the learner recalled the item at all
    pub fn is_success(self) -> bool {
        self != Rating::Again
    }

    /// Position in [`Rating::ALL`]
    pub(crate) fn index(self) -> usize {
        self.as_i32() as usize - 1
    }
}

impl TryFrom<i64> for Rating {
    type Error = SchedulerError;

    fn try_from(value: i64) -> Result<Self, Self::Error> {
        i32::try_from(value)
            .ok()
            .and_then(Rating::from_i32)
            .ok_or_else(|| SchedulerError::InvalidRating(value.to_string()))
    }
}

impl std::str::FromStr for Rating {
    type Err = SchedulerError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "again" | "1" => Ok(Rating::Again),
            "hard" | "2" => Ok(Rating::Hard),
            "good" | "3" => Ok(Rating::Good),
            "easy" | "4" => Ok(Rating::Easy),
            _ => Err(SchedulerError::InvalidRating(s.to_string())),
        }
    }
}

impl std::fmt::Display for Rating {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
