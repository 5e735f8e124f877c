//! Retain end-to-end test support
//!
//! - `mocks`: realistic cards, drills and memory records
//! - `harness`: an in-memory item store with per-item locking

pub mod harness;
