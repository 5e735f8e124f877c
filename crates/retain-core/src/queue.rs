//! Due queue
//!
//! Picks which items to present next: everything due, oldest due first.

use chrono::{DateTime, Utc};

use crate::memory::Reviewable;

/// Items due at `now`, ordered by due time, at most `limit` of them
///
/// Ties keep their input order.
pub fn due_items<T: Reviewable>(items: &[T], now: DateTime<Utc>, limit: usize) -> Vec<&T> {
    let mut due: Vec<&T> = items.iter().filter(|i| i.memory().is_due(now)).collect();
    due.sort_by_key(|i| i.memory().due);
    due.truncate(limit);
    due
}

/// Number of items due at `now`
pub fn count_due<T: Reviewable>(items: &[T], now: DateTime<Utc>) -> usize {
    items.iter().filter(|i| i.memory().is_due(now)).count()
}
