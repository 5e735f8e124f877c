//! Test harness


pub use store::{ItemStore, StoreError};
