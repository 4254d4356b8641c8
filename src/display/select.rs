// src/display/select.rs

//! Winner selection over a subject's active hints.

use crate::hint::{HintRecord, display_order};

/// Picks the single hint to surface: highest priority, earliest creation on
/// ties. Pure and deterministic; the dedup gate relies on the same inputs
/// always yielding the same winner.
pub fn select_top(hints: &[HintRecord]) -> Option<&HintRecord> {
    hints.iter().min_by(|a, b| display_order(a, b))
}
