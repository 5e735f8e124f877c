//! FSRS-5 formulas
//!
//! Pure functions over an explicit [`Weights`] value. The scheduler composes
//! these; they are public so tuned weight sets can be checked in isolation.

use chrono::{DateTime, Utc};
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

use super::parameters::Weights;
use crate::memory::Rating;

// ============================================================================
// CONSTANTS
// ============================================================================

/// Forgetting-curve exponent
pub const DECAY: f64 = -0.5;

/// Chosen so that R(S, S) = 0.9: 0.9^(1/DECAY) - 1
pub const FACTOR: f64 = 19.0 / 81.0;

/// Lower difficulty bound
pub const MIN_DIFFICULTY: f64 = 1.0;

/// Upper difficulty bound
pub const MAX_DIFFICULTY: f64 = 10.0;

/// Stability floor; memory never decays to zero
pub const MIN_STABILITY: f64 = 0.01;

/// Stability ceiling (100 years)
pub const MAX_STABILITY: f64 = 36500.0;

/// Fuzz bands: (start, end, factor)
const FUZZ_RANGES: [(f64, f64, f64); 3] = [(2.5, 7.0, 0.15), (7.0, 20.0, 0.1), (20.0, f64::INFINITY, 0.05)];

fn grade(rating: Rating) -> f64 {
    rating.as_i32() as f64
}

fn clamp_difficulty(d: f64) -> f64 {
    d.clamp(MIN_DIFFICULTY, MAX_DIFFICULTY)
}

fn clamp_stability(s: f64) -> f64 {
    s.clamp(MIN_STABILITY, MAX_STABILITY)
}

// ============================================================================
// FORGETTING CURVE
// ============================================================================

/// Probability of recall after `elapsed_days` for an item of `stability`
///
/// R = (1 + FACTOR * t / S)^DECAY
pub fn retrievability(elapsed_days: f64, stability: f64) -> f64 {
    if stability <= 0.0 {
        return 0.0;
    }
    (1.0 + FACTOR * elapsed_days.max(0.0) / stability).powf(DECAY)
}

/// Whole-day interval at which retrievability reaches `desired_retention`
///
/// Inverse of [`retrievability`], rounded and clamped to `[1, maximum_interval]`.
pub fn next_interval(stability: f64, desired_retention: f64, maximum_interval: u32) -> u32 {
    let raw = stability / FACTOR * (desired_retention.powf(1.0 / DECAY) - 1.0);
    let max = maximum_interval.max(1) as f64;
    raw.round().clamp(1.0, max) as u32
}

// ============================================================================
// DIFFICULTY
// ============================================================================

fn raw_initial_difficulty(w: &Weights, rating: Rating) -> f64 {
    w[4] - (w[5] * (grade(rating) - 1.0)).exp() + 1.0
}

/// D0(G) = w4 - e^(w5 * (G - 1)) + 1, clamped
pub fn initial_difficulty(w: &Weights, rating: Rating) -> f64 {
    clamp_difficulty(raw_initial_difficulty(w, rating))
}

/// Difficulty after a review
///
/// The rating-derived delta shrinks linearly as difficulty approaches the
/// ceiling, then the result is pulled toward D0(Easy) by w7.
pub fn next_difficulty(w: &Weights, difficulty: f64, rating: Rating) -> f64 {
    let delta = -w[6] * (grade(rating) - 3.0);
    let damped = difficulty + delta * (MAX_DIFFICULTY - difficulty) / 9.0;
    let reverted = w[7] * raw_initial_difficulty(w, Rating::Easy) + (1.0 - w[7]) * damped;
    clamp_difficulty(reverted)
}

// ============================================================================
// STABILITY
// ============================================================================

/// S0(G) = w[G-1]
pub fn initial_stability(w: &Weights, rating: Rating) -> f64 {
    clamp_stability(w[rating.index()])
}

/// Stability after a successful long-term review
///
/// S' = S * (1 + e^w8 * (11 - D) * S^-w9 * (e^(w10 * (1 - R)) - 1) * penalty * bonus)
pub fn next_recall_stability(
    w: &Weights,
    difficulty: f64,
    stability: f64,
    retrievability: f64,
    rating: Rating,
) -> f64 {
    let hard_penalty = if rating == Rating::Hard { w[15] } else { 1.0 };
    let easy_bonus = if rating == Rating::Easy { w[16] } else { 1.0 };
    let growth = w[8].exp()
        * (11.0 - difficulty)
        * stability.powf(-w[9])
        * ((1.0 - retrievability) * w[10]).exp_m1()
        * hard_penalty
        * easy_bonus;
    clamp_stability(stability * (1.0 + growth.max(0.0)))
}

/// Stability after a lapse
///
/// Long-term estimate w11 * D^-w12 * ((S + 1)^w13 - 1) * e^(w14 * (1 - R)),
/// capped by the short-term bound S / e^(w17 * w18). Never above the
/// pre-review stability, never below [`MIN_STABILITY`].
pub fn next_forget_stability(
    w: &Weights,
    difficulty: f64,
    stability: f64,
    retrievability: f64,
) -> f64 {
    let long_term = w[11]
        * difficulty.max(MIN_DIFFICULTY).powf(-w[12])
        * ((stability + 1.0).powf(w[13]) - 1.0)
        * ((1.0 - retrievability) * w[14]).exp();
    let short_term = stability / (w[17] * w[18]).exp();
    long_term.min(short_term).min(stability).max(MIN_STABILITY)
}

/// Stability after a same-day step in Learning or Relearning
///
/// S' = S * e^(w17 * (G - 3 + w18))
pub fn short_term_stability(w: &Weights, stability: f64, rating: Rating) -> f64 {
    let next = stability * (w[17] * (grade(rating) - 3.0 + w[18])).exp();
    if rating == Rating::Again {
        next.min(stability).max(MIN_STABILITY)
    } else {
        clamp_stability(next)
    }
}

// ============================================================================
// FUZZ
// ============================================================================

/// Seed for the fuzz generator, derived from the review itself so previews and
/// commits of the same review agree
pub fn fuzz_seed(now: DateTime<Utc>, reps: u32, difficulty: f64, stability: f64) -> u64 {
    (now.timestamp_millis() as u64) ^ (u64::from(reps)).rotate_left(32) ^ (difficulty * stability).to_bits()
}

/// Uniform factor in [0, 1) from a seed
pub fn fuzz_factor(seed: u64) -> f64 {
    ChaCha8Rng::seed_from_u64(seed).r#gen::<f64>()
}

/// Spread an interval inside its fuzz band
///
/// Intervals under 2.5 days are returned as-is. The band never reaches back
/// to `elapsed_days` or below 2 days.
pub fn fuzz_interval(interval: u32, elapsed_days: u32, maximum_interval: u32, factor: f64) -> u32 {
    let ivl = interval as f64;
    if ivl < 2.5 {
        return interval;
    }
    let delta = FUZZ_RANGES.iter().fold(1.0, |acc, &(start, end, f)| {
        acc + f * (ivl.min(end) - start).max(0.0)
    });
    let mut min_ivl = (ivl - delta).round().max(2.0);
    let max_ivl = (ivl + delta).round().min(maximum_interval as f64);
    if interval > elapsed_days {
        min_ivl = min_ivl.max(elapsed_days as f64 + 1.0);
    }
    min_ivl = min_ivl.min(max_ivl);
    (factor * (max_ivl - min_ivl + 1.0) + min_ivl).floor() as u32
}
