// src/hint/mod.rs

//! Hint domain types.

mod record;

pub use record::{DEFAULT_SOURCE, HintRecord, SubjectId, display_order};
