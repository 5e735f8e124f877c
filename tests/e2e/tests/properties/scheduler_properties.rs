//! Property-Based Tests for the Scheduler
//!
//! Tests the following invariants over arbitrary records, ratings and clocks:
//! - Determinism: the same commit twice is bit-identical
//! - Preview/commit equivalence: commit equals the matching preview branch
//! - Monotonic intervals: Again <= Hard < Good < Easy
//! - Difficulty stays within [1, 10], stability stays positive
//! - Lapses count only Again ratings given in Review
//! - State transitions follow the learning state machine

use chrono::{DateTime, Duration, TimeZone, Utc};
use proptest::prelude::*;

use retain_core::fsrs::MIN_STABILITY;
use retain_core::{FSRSParameters, FSRSScheduler, LearningState, MemoryState, Rating};

// ============================================================================
// Arbitrary Generators
// ============================================================================

fn base() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2026, 1, 1, 0, 0, 0).unwrap()
}

fn arb_rating() -> impl Strategy<Value = Rating> {
    prop_oneof![
        Just(Rating::Again),
        Just(Rating::Hard),
        Just(Rating::Good),
        Just(Rating::Easy),
    ]
}

fn arb_instant() -> impl Strategy<Value = DateTime<Utc>> {
    (0i64..=3 * 365 * 24 * 60).prop_map(|minutes| base() + Duration::minutes(minutes))
}

fn arb_reviewed_state() -> impl Strategy<Value = LearningState> {
    prop_oneof![
        Just(LearningState::Learning),
        Just(LearningState::Review),
        Just(LearningState::Relearning),
    ]
}

/// Any record a sequence of commits could have produced
fn arb_item() -> impl Strategy<Value = MemoryState> {
    let new_item = arb_instant().prop_map(MemoryState::new);
    let reviewed = (
        arb_reviewed_state(),
        0.1f64..=3650.0,           // stability
        1.0f64..=10.0,             // difficulty
        0u32..=400,                // scheduled_days
        1u32..=200,                // reps
        0u32..=20,                 // lapses
        arb_instant(),             // last_review
    )
        .prop_map(
            |(state, stability, difficulty, scheduled_days, reps, lapses, last_review)| {
                let due = if state == LearningState::Review {
                    last_review + Duration::days(i64::from(scheduled_days))
                } else {
                    last_review + Duration::minutes(10)
                };
                MemoryState {
                    stability,
                    difficulty,
                    elapsed_days: 0,
                    scheduled_days: if state == LearningState::Review { scheduled_days } else { 0 },
                    reps,
                    lapses,
                    state,
                    due,
                    last_review: Some(last_review),
                }
            },
        );
    prop_oneof![1 => new_item, 4 => reviewed]
}

/// Review time relative to the record, including early, late and skewed clocks
fn arb_review_time(item: &MemoryState) -> impl Strategy<Value = DateTime<Utc>> + use<> {
    let anchor = item.last_review.unwrap_or(item.due);
    (-2i64 * 24 * 60..=800 * 24 * 60).prop_map(move |offset| anchor + Duration::minutes(offset))
}

fn arb_case() -> impl Strategy<Value = (MemoryState, DateTime<Utc>, bool)> {
    arb_item().prop_flat_map(|item| {
        let when = arb_review_time(&item);
        (Just(item), when, any::<bool>())
    })
}

fn scheduler(fuzz: bool) -> FSRSScheduler {
    FSRSScheduler::new(FSRSParameters {
        enable_fuzz: fuzz,
        ..Default::default()
    })
    .unwrap()
}

// ============================================================================
// Properties
// ============================================================================

proptest! {
    #![proptest_config(ProptestConfig::with_cases(512))]

    #[test]
    fn prop_commit_is_deterministic((item, now, fuzz) in arb_case(), rating in arb_rating()) {
        let s = scheduler(fuzz);
        let first = s.commit(&item, rating, now).unwrap();
        let second = s.commit(&item, rating, now).unwrap();
        prop_assert_eq!(first.memory.stability.to_bits(), second.memory.stability.to_bits());
        prop_assert_eq!(first.memory.difficulty.to_bits(), second.memory.difficulty.to_bits());
        prop_assert_eq!(first, second);
    }

    #[test]
    fn prop_commit_matches_preview((item, now, fuzz) in arb_case(), rating in arb_rating()) {
        let s = scheduler(fuzz);
        let preview = s.preview(&item, now).unwrap();
        let committed = s.commit(&item, rating, now).unwrap();
        prop_assert_eq!(preview.get(rating), &committed);
    }

    #[test]
    fn prop_intervals_are_ordered((item, now, fuzz) in arb_case()) {
        let preview = scheduler(fuzz).preview(&item, now).unwrap();
        let again = preview.again.interval();
        let hard = preview.hard.interval();
        let good = preview.good.interval();
        let easy = preview.easy.interval();
        prop_assert!(again <= hard, "again {:?} > hard {:?}", again, hard);
        prop_assert!(hard < good, "hard {:?} >= good {:?}", hard, good);
        prop_assert!(good < easy, "good {:?} >= easy {:?}", good, easy);
    }

    #[test]
    fn prop_difficulty_and_stability_bounded((item, now, fuzz) in arb_case()) {
        let preview = scheduler(fuzz).preview(&item, now).unwrap();
        for (rating, outcome) in preview.iter() {
            let m = &outcome.memory;
            prop_assert!((1.0..=10.0).contains(&m.difficulty), "{} gave D={}", rating, m.difficulty);
            prop_assert!(m.stability >= MIN_STABILITY, "{} gave S={}", rating, m.stability);
            prop_assert!(m.stability.is_finite());
        }
    }

    #[test]
    fn prop_lapses_count_review_failures((item, now, fuzz) in arb_case(), rating in arb_rating()) {
        let result = scheduler(fuzz).commit(&item, rating, now).unwrap();
        let expected = if item.state == LearningState::Review && rating == Rating::Again {
            item.lapses + 1
        } else {
            item.lapses
        };
        prop_assert_eq!(result.memory.lapses, expected);
        prop_assert_eq!(result.memory.reps, item.reps + 1);
        prop_assert_eq!(result.memory.last_review, Some(now));
    }

    #[test]
    fn prop_state_machine((item, now, fuzz) in arb_case(), rating in arb_rating()) {
        let next = scheduler(fuzz).commit(&item, rating, now).unwrap().memory.state;
        let expected = match (item.state, rating) {
            (LearningState::New, Rating::Easy) => LearningState::Review,
            (LearningState::New, _) => LearningState::Learning,
            (LearningState::Learning, Rating::Again | Rating::Hard) => LearningState::Learning,
            (LearningState::Relearning, Rating::Again | Rating::Hard) => LearningState::Relearning,
            (LearningState::Review, Rating::Again) => LearningState::Relearning,
            (_, _) => LearningState::Review,
        };
        prop_assert_eq!(next, expected);
    }

    #[test]
    fn prop_lapse_shrinks_stability(
        stability in 0.1f64..=3650.0,
        difficulty in 1.0f64..=10.0,
        elapsed in 0i64..=1000,
    ) {
        let last = base();
        let item = MemoryState {
            stability,
            difficulty,
            elapsed_days: 0,
            scheduled_days: 1,
            reps: 3,
            lapses: 0,
            state: LearningState::Review,
            due: last + Duration::days(1),
            last_review: Some(last),
        };
        let result = scheduler(false)
            .commit(&item, Rating::Again, last + Duration::days(elapsed))
            .unwrap();
        prop_assert!(result.memory.stability < stability);
    }

    #[test]
    fn prop_review_outcomes_stay_in_review_with_day_intervals((item, now, fuzz) in arb_case()) {
        prop_assume!(item.state == LearningState::Review);
        let preview = scheduler(fuzz).preview(&item, now).unwrap();
        for rating in [Rating::Hard, Rating::Good, Rating::Easy] {
            let outcome = preview.get(rating);
            prop_assert_eq!(outcome.memory.state, LearningState::Review);
            prop_assert!(outcome.memory.scheduled_days >= 1);
            prop_assert_eq!(
                outcome.interval(),
                Duration::days(i64::from(outcome.memory.scheduled_days))
            );
        }
    }
}
