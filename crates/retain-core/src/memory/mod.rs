//! Memory module - Core types and data structures
//!
//! - Item memory state shared by cards and conjugation drills
//! - Learning state machine positions
//! - Ratings and review log entries

mod item;
mod log;
mod rating;

pub use item::{LearningState, MemoryState, Reviewable};
pub use log::ReviewLog;
pub use rating::Rating;
