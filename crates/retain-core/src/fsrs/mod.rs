//! FSRS-5 (Free Spaced Repetition Scheduler) Module
//!
//! Decides when each card or conjugation drill should be shown next and how
//! its memory model changes after a review.
//!
//! Reference: https://github.com/open-spaced-repetition/fsrs4anki
//!
//! ## Core Formulas:
//! - Retrievability: R = (1 + FACTOR * t / S)^DECAY where DECAY = -0.5, FACTOR = 19/81
//! - Interval: t = S/FACTOR * (R^(1/DECAY) - 1)
//!
//! ## State machine
//! - New: Again/Hard/Good step into Learning, Easy graduates to Review
//! - Learning/Relearning: Again/Hard repeat the step, Good/Easy graduate
//! - Review: Again lapses into Relearning, everything else stays in Review

mod algorithm;
mod parameters;
mod scheduler;

pub use algorithm::{
    fuzz_factor,
    fuzz_interval,
    fuzz_seed,
    initial_difficulty,
    initial_stability,
    next_difficulty,
    next_forget_stability,
    next_interval,
    next_recall_stability,
    // Core functions
    retrievability,
    short_term_stability,
    // Constants
    DECAY,
    FACTOR,
    MAX_DIFFICULTY,
    MAX_STABILITY,
    MIN_DIFFICULTY,
    MIN_STABILITY,
};

pub use parameters::{
    FSRSParameters, LearningSteps, Weights, DEFAULT_MAXIMUM_INTERVAL, DEFAULT_RETENTION,
    DEFAULT_WEIGHTS_VERSION, FSRS5_WEIGHTS, WEIGHT_COUNT,
};

pub use scheduler::{FSRSScheduler, PreviewResults, ReviewResult};
