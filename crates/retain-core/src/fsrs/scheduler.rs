//! FSRS scheduler
//!
//! Given an item's memory state, the review time and (for commits) a rating,
//! computes the next memory state and the log entry to append. Preview and
//! commit share one plan, so a committed review always equals the matching
//! preview branch.

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use tracing::{debug, trace};

use super::algorithm::{
    fuzz_factor, fuzz_interval, fuzz_seed, initial_difficulty, initial_stability, next_difficulty,
    next_forget_stability, next_interval, next_recall_stability, retrievability,
    short_term_stability, MIN_STABILITY,
};
use super::parameters::FSRSParameters;
use crate::error::{Result, SchedulerError};
use crate::memory::{LearningState, MemoryState, Rating, ReviewLog};

// ============================================================================
// RESULTS
// ============================================================================

/// Outcome of one review: the record to persist and the log entry to append
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReviewResult {
    /// Updated memory state
    pub memory: MemoryState,
    /// Review log entry
    pub log: ReviewLog,
}

impl ReviewResult {
    /// Time until the item is due again
    pub fn interval(&self) -> Duration {
        self.memory.due - self.log.review_time
    }

    /// Interval as fractional days
    pub fn interval_days(&self) -> f64 {
        self.interval().num_seconds() as f64 / 86_400.0
    }
}

/// Outcomes for every rating, computed without committing any of them
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PreviewResults {
    pub again: ReviewResult,
    pub hard: ReviewResult,
    pub good: ReviewResult,
    pub easy: ReviewResult,
}

impl PreviewResults {
    /// Outcome for one rating
    pub fn get(&self, rating: Rating) -> &ReviewResult {
        match rating {
            Rating::Again => &self.again,
            Rating::Hard => &self.hard,
            Rating::Good => &self.good,
            Rating::Easy => &self.easy,
        }
    }

    /// Take the outcome for one rating
    pub fn into_result(self, rating: Rating) -> ReviewResult {
        match rating {
            Rating::Again => self.again,
            Rating::Hard => self.hard,
            Rating::Good => self.good,
            Rating::Easy => self.easy,
        }
    }

    /// Outcomes in rating order
    pub fn iter(&self) -> impl Iterator<Item = (Rating, &ReviewResult)> {
        Rating::ALL.into_iter().map(move |r| (r, self.get(r)))
    }
}

// ============================================================================
// PLAN
// ============================================================================

/// Candidate memory for one rating
#[derive(Debug, Clone, Copy)]
struct Candidate {
    state: LearningState,
    difficulty: f64,
    stability: f64,
    /// Whole days for Review, zero for sub-day steps
    scheduled_days: u32,
    due: DateTime<Utc>,
}

/// Everything a review at `now` could produce, indexed by rating
struct Plan {
    now: DateTime<Utc>,
    elapsed_days: u32,
    candidates: [Candidate; 4],
}

// ============================================================================
// SCHEDULER
// ============================================================================

/// Spaced-repetition scheduler over one validated parameter set
///
/// Holds no mutable state; share it freely across threads.
#[derive(Debug, Clone)]
pub struct FSRSScheduler {
    params: FSRSParameters,
}

impl Default for FSRSScheduler {
    fn default() -> Self {
        Self {
            params: FSRSParameters::default(),
        }
    }
}

impl FSRSScheduler {
    /// Create a scheduler, rejecting unusable parameters
    pub fn new(params: FSRSParameters) -> Result<Self> {
        params.validate()?;
        Ok(Self { params })
    }

    /// Active parameters
    pub fn parameters(&self) -> &FSRSParameters {
        &self.params
    }

    /// Empty record for a newly introduced item
    pub fn new_item(&self, now: DateTime<Utc>) -> MemoryState {
        MemoryState::new(now)
    }

    /// Whole days since the last review (or since `due` for unreviewed items)
    ///
    /// A reference point in the future is treated as clock skew and clamps to 0.
    pub fn elapsed_days(&self, item: &MemoryState, now: DateTime<Utc>) -> u32 {
        let anchor = item.last_review.unwrap_or(item.due);
        let days = (now - anchor).num_days();
        if days < 0 {
            debug!(
                anchor = %anchor,
                now = %now,
                "Review time precedes last review, clamping elapsed days to 0"
            );
        }
        u32::try_from(days.max(0)).unwrap_or(u32::MAX)
    }

    /// Outcomes for all four ratings; the input is not modified
    pub fn preview(&self, item: &MemoryState, now: DateTime<Utc>) -> Result<PreviewResults> {
        let plan = self.plan(item, now)?;
        trace!(state = %item.state, elapsed_days = plan.elapsed_days, "Previewed review");
        Ok(PreviewResults {
            again: realize(item, &plan, Rating::Again),
            hard: realize(item, &plan, Rating::Hard),
            good: realize(item, &plan, Rating::Good),
            easy: realize(item, &plan, Rating::Easy),
        })
    }

    /// Apply one review
    ///
    /// Identical to the `rating` branch of [`FSRSScheduler::preview`] for the
    /// same item and time.
    pub fn commit(
        &self,
        item: &MemoryState,
        rating: Rating,
        now: DateTime<Utc>,
    ) -> Result<ReviewResult> {
        let plan = self.plan(item, now)?;
        let result = realize(item, &plan, rating);
        debug!(
            rating = %rating,
            from = %item.state,
            to = %result.memory.state,
            stability = result.memory.stability,
            difficulty = result.memory.difficulty,
            scheduled_days = result.memory.scheduled_days,
            "Committed review"
        );
        Ok(result)
    }

    fn plan(&self, item: &MemoryState, now: DateTime<Utc>) -> Result<Plan> {
        validate_item(item)?;
        let elapsed_days = self.elapsed_days(item, now);
        let fuzz = self
            .params
            .enable_fuzz
            .then(|| fuzz_factor(fuzz_seed(now, item.reps, item.difficulty, item.stability)));
        let ctx = PlanContext {
            params: &self.params,
            now,
            elapsed_days,
            fuzz,
        };

        let candidates = match item.state {
            LearningState::New => ctx.from_new()?,
            LearningState::Learning | LearningState::Relearning => ctx.from_short_term(item)?,
            LearningState::Review => ctx.from_review(item)?,
        };

        Ok(Plan {
            now,
            elapsed_days,
            candidates,
        })
    }
}

/// Per-review inputs shared by the four candidates
struct PlanContext<'a> {
    params: &'a FSRSParameters,
    now: DateTime<Utc>,
    elapsed_days: u32,
    fuzz: Option<f64>,
}

impl PlanContext<'_> {
    fn interval(&self, stability: f64) -> u32 {
        let ivl = next_interval(
            stability,
            self.params.desired_retention,
            self.params.maximum_interval,
        );
        match self.fuzz {
            Some(factor) => {
                fuzz_interval(ivl, self.elapsed_days, self.params.maximum_interval, factor)
            }
            None => ivl,
        }
    }

    fn due_after(&self, offset: Duration) -> Result<DateTime<Utc>> {
        self.now.checked_add_signed(offset).ok_or_else(|| {
            SchedulerError::InvalidItemState(format!(
                "next due date is out of range for a review at {}",
                self.now
            ))
        })
    }

    fn in_minutes(&self, state: LearningState, d: f64, s: f64, minutes: u32) -> Result<Candidate> {
        Ok(Candidate {
            state,
            difficulty: d,
            stability: s,
            scheduled_days: 0,
            due: self.due_after(Duration::minutes(i64::from(minutes)))?,
        })
    }

    fn in_days(&self, d: f64, s: f64, days: u32) -> Result<Candidate> {
        Ok(Candidate {
            state: LearningState::Review,
            difficulty: d,
            stability: s,
            scheduled_days: days,
            due: self.due_after(Duration::days(i64::from(days)))?,
        })
    }

    fn from_new(&self) -> Result<[Candidate; 4]> {
        let w = &self.params.weights;
        let steps = &self.params.steps;
        let ds = Rating::ALL.map(|r| (initial_difficulty(w, r), initial_stability(w, r)));
        let [again, hard, good, easy] = ds;

        Ok([
            self.in_minutes(LearningState::Learning, again.0, again.1, steps.new_again_minutes)?,
            self.in_minutes(LearningState::Learning, hard.0, hard.1, steps.new_hard_minutes)?,
            self.in_minutes(LearningState::Learning, good.0, good.1, steps.new_good_minutes)?,
            self.in_days(easy.0, easy.1, self.interval(easy.1))?,
        ])
    }

    fn from_short_term(&self, item: &MemoryState) -> Result<[Candidate; 4]> {
        let w = &self.params.weights;
        let steps = &self.params.steps;
        let ds = Rating::ALL.map(|r| {
            (
                next_difficulty(w, item.difficulty, r),
                short_term_stability(w, item.stability, r),
            )
        });
        let [again, hard, good, easy] = ds;

        let good_ivl = self.interval(good.1);
        let easy_ivl = self.interval(easy.1).max(good_ivl.saturating_add(1));

        Ok([
            self.in_minutes(item.state, again.0, again.1, steps.learning_again_minutes)?,
            self.in_minutes(item.state, hard.0, hard.1, steps.learning_hard_minutes)?,
            self.in_days(good.0, good.1, good_ivl)?,
            self.in_days(easy.0, easy.1, easy_ivl)?,
        ])
    }

    fn from_review(&self, item: &MemoryState) -> Result<[Candidate; 4]> {
        let w = &self.params.weights;
        let r = retrievability(self.elapsed_days as f64, item.stability);
        let d = item.difficulty;
        let s = item.stability;

        let again = (
            next_difficulty(w, d, Rating::Again),
            next_forget_stability(w, d, s, r),
        );
        let [hard, good, easy] = [Rating::Hard, Rating::Good, Rating::Easy]
            .map(|g| (next_difficulty(w, d, g), next_recall_stability(w, d, s, r, g)));

        let mut hard_ivl = self.interval(hard.1);
        let mut good_ivl = self.interval(good.1);
        hard_ivl = hard_ivl.min(good_ivl);
        good_ivl = good_ivl.max(hard_ivl.saturating_add(1));
        let easy_ivl = self.interval(easy.1).max(good_ivl.saturating_add(1));

        Ok([
            self.in_minutes(
                LearningState::Relearning,
                again.0,
                again.1,
                self.params.steps.lapse_minutes,
            )?,
            self.in_days(hard.0, hard.1, hard_ivl)?,
            self.in_days(good.0, good.1, good_ivl)?,
            self.in_days(easy.0, easy.1, easy_ivl)?,
        ])
    }
}

/// Build the persisted record and log entry for one branch of a plan
fn realize(item: &MemoryState, plan: &Plan, rating: Rating) -> ReviewResult {
    let c = plan.candidates[rating.index()];
    let lapses = if item.state == LearningState::Review && !rating.is_success() {
        item.lapses.saturating_add(1)
    } else {
        item.lapses
    };

    let memory = MemoryState {
        stability: c.stability,
        difficulty: c.difficulty,
        elapsed_days: plan.elapsed_days,
        scheduled_days: c.scheduled_days,
        reps: item.reps.saturating_add(1),
        lapses,
        state: c.state,
        due: c.due,
        last_review: Some(plan.now),
    };
    let log = ReviewLog {
        rating,
        state: c.state,
        due: c.due,
        stability: c.stability,
        difficulty: c.difficulty,
        elapsed_days: plan.elapsed_days,
        scheduled_days: c.scheduled_days,
        review_time: plan.now,
    };

    ReviewResult { memory, log }
}

/// Reject records that no sequence of commits could have produced
fn validate_item(item: &MemoryState) -> Result<()> {
    if !item.stability.is_finite() || item.stability < 0.0 {
        return Err(SchedulerError::InvalidItemState(format!(
            "stability must be a finite non-negative number, got {}",
            item.stability
        )));
    }
    if !item.difficulty.is_finite() || item.difficulty < 0.0 {
        return Err(SchedulerError::InvalidItemState(format!(
            "difficulty must be a finite non-negative number, got {}",
            item.difficulty
        )));
    }
    if item.state != LearningState::New && item.stability < MIN_STABILITY {
        return Err(SchedulerError::InvalidItemState(format!(
            "stability must be at least {} in the {} state, got {}",
            MIN_STABILITY, item.state, item.stability
        )));
    }
    Ok(())
}

// ============================================================================
// TESTS
// ============================================================================
