//! Scheduler parameters
//!
//! The weight vector is versioned configuration supplied by the caller. Nothing
//! in the formulas reads a global default; [`FSRSParameters::default`] only
//! exists so a caller without a tuned set still gets sensible behaviour.

use serde::{Deserialize, Serialize};

use crate::error::{Result, SchedulerError};

/// Number of coefficients in an FSRS-5 weight vector
pub const WEIGHT_COUNT: usize = 19;

/// Default FSRS-5 weights (w0..w18)
pub const FSRS5_WEIGHTS: [f64; WEIGHT_COUNT] = [
    0.40255, 1.18385, 3.173, 15.69105, // w0-w3: initial stability per rating
    7.1949, 0.5345, // w4-w5: initial difficulty
    1.4604, 0.0046, // w6-w7: difficulty delta and mean reversion
    1.54575, 0.1192, 1.01925, // w8-w10: recall stability
    1.9395, 0.11, 0.29605, 2.2698, // w11-w14: forget stability
    0.2315, 2.9898, // w15-w16: hard penalty, easy bonus
    0.51655, 0.6621, // w17-w18: short-term stability
];

/// Default probability of recall targeted when picking intervals
pub const DEFAULT_RETENTION: f64 = 0.9;

/// Default longest interval, in days
pub const DEFAULT_MAXIMUM_INTERVAL: u32 = 36500;

/// Version tag of the built-in weight vector
pub const DEFAULT_WEIGHTS_VERSION: &str = "fsrs-5-default";

/// Optimizer bounds for each weight; anything outside breaks the monotonicity
/// the scheduler relies on
const WEIGHT_BOUNDS: [(f64, f64); WEIGHT_COUNT] = [
    (0.01, 100.0),
    (0.01, 100.0),
    (0.01, 100.0),
    (0.01, 100.0),
    (1.0, 10.0),
    (0.001, 4.0),
    (0.001, 4.0),
    (0.001, 0.75),
    (0.0, 4.5),
    (0.0, 0.8),
    (0.001, 3.5),
    (0.001, 5.0),
    (0.001, 0.25),
    (0.001, 0.9),
    (0.0, 4.0),
    (0.0, 1.0),
    (1.0, 6.0),
    (0.0, 2.0),
    (0.0, 2.0),
];

const MINUTES_PER_DAY: u32 = 24 * 60;

// ============================================================================
// WEIGHTS
// ============================================================================

/// FSRS-5 weight vector
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Weights([f64; WEIGHT_COUNT]);

impl Weights {
    /// Wrap a raw vector without validation
    pub const fn new(w: [f64; WEIGHT_COUNT]) -> Self {
        Self(w)
    }

    /// Check every coefficient against the optimizer bounds
    pub fn validate(&self) -> Result<()> {
        for (i, (&w, &(lo, hi))) in self.0.iter().zip(WEIGHT_BOUNDS.iter()).enumerate() {
            if !w.is_finite() {
                return Err(SchedulerError::InvalidParameters(format!(
                    "w{} is not a finite number",
                    i
                )));
            }
            if w < lo || w > hi {
                return Err(SchedulerError::InvalidParameters(format!(
                    "w{} = {} is outside [{}, {}]",
                    i, w, lo, hi
                )));
            }
        }
        if !(self.0[0] < self.0[1] && self.0[1] < self.0[2] && self.0[2] < self.0[3]) {
            return Err(SchedulerError::InvalidParameters(
                "initial stabilities w0..w3 must be strictly ascending".to_string(),
            ));
        }
        Ok(())
    }
}

impl Default for Weights {
    fn default() -> Self {
        Self(FSRS5_WEIGHTS)
    }
}

impl std::ops::Index<usize> for Weights {
    type Output = f64;

    fn index(&self, index: usize) -> &f64 {
        &self.0[index]
    }
}

impl TryFrom<&[f64]> for Weights {
    type Error = SchedulerError;

    fn try_from(values: &[f64]) -> Result<Self> {
        let array: [f64; WEIGHT_COUNT] = values.try_into().map_err(|_| {
            SchedulerError::InvalidParameters(format!(
                "expected {} weights, got {}",
                WEIGHT_COUNT,
                values.len()
            ))
        })?;
        Ok(Self(array))
    }
}

// ============================================================================
// LEARNING STEPS
// ============================================================================

/// Sub-day steps for the Learning and Relearning states, in minutes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LearningSteps {
    /// New item rated Again
    pub new_again_minutes: u32,
    /// New item rated Hard
    pub new_hard_minutes: u32,
    /// New item rated Good
    pub new_good_minutes: u32,
    /// Learning/Relearning item rated Again
    pub learning_again_minutes: u32,
    /// Learning/Relearning item rated Hard
    pub learning_hard_minutes: u32,
    /// Review item rated Again (lapse)
    pub lapse_minutes: u32,
}

impl Default for LearningSteps {
    fn default() -> Self {
        Self {
            new_again_minutes: 1,
            new_hard_minutes: 5,
            new_good_minutes: 10,
            learning_again_minutes: 5,
            learning_hard_minutes: 10,
            lapse_minutes: 5,
        }
    }
}

impl LearningSteps {
    fn validate(&self) -> Result<()> {
        let all = [
            self.new_again_minutes,
            self.new_hard_minutes,
            self.new_good_minutes,
            self.learning_again_minutes,
            self.learning_hard_minutes,
            self.lapse_minutes,
        ];
        if all.iter().any(|&m| m == 0 || m >= MINUTES_PER_DAY) {
            return Err(SchedulerError::InvalidParameters(
                "learning steps must be between 1 minute and 1 day (exclusive)".to_string(),
            ));
        }
        if self.new_again_minutes > self.new_hard_minutes
            || self.new_hard_minutes >= self.new_good_minutes
        {
            return Err(SchedulerError::InvalidParameters(
                "new-item steps must satisfy again <= hard < good".to_string(),
            ));
        }
        if self.learning_again_minutes > self.learning_hard_minutes {
            return Err(SchedulerError::InvalidParameters(
                "learning steps must satisfy again <= hard".to_string(),
            ));
        }
        Ok(())
    }
}

// ============================================================================
// PARAMETERS
// ============================================================================

/// Full scheduler configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FSRSParameters {
    /// Identifier of the weight set, for auditing tuned vectors
    pub version: String,
    /// Forgetting-curve weights
    pub weights: Weights,
    /// Target probability of recall at the due date, in (0, 1)
    pub desired_retention: f64,
    /// Longest interval the scheduler will assign, in days
    pub maximum_interval: u32,
    /// Spread Review intervals slightly so items added together drift apart
    pub enable_fuzz: bool,
    /// Sub-day steps
    pub steps: LearningSteps,
}

impl Default for FSRSParameters {
    fn default() -> Self {
        Self {
            version: DEFAULT_WEIGHTS_VERSION.to_string(),
            weights: Weights::default(),
            desired_retention: DEFAULT_RETENTION,
            maximum_interval: DEFAULT_MAXIMUM_INTERVAL,
            enable_fuzz: false,
            steps: LearningSteps::default(),
        }
    }
}

impl FSRSParameters {
    /// Reject configurations the scheduler cannot honour
    pub fn validate(&self) -> Result<()> {
        if !(self.desired_retention > 0.0 && self.desired_retention < 1.0) {
            return Err(SchedulerError::InvalidParameters(format!(
                "desired_retention must be in (0, 1), got {}",
                self.desired_retention
            )));
        }
        if self.maximum_interval == 0 || self.maximum_interval > DEFAULT_MAXIMUM_INTERVAL {
            return Err(SchedulerError::InvalidParameters(format!(
                "maximum_interval must be between 1 and {} days, got {}",
                DEFAULT_MAXIMUM_INTERVAL, self.maximum_interval
            )));
        }
        self.weights.validate()?;
        self.steps.validate()
    }
}
