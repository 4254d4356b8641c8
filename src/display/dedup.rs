// src/display/dedup.rs

//! Suppression of redundant re-emission of an unchanged winner.
//!
//! Dedup is identity-based, not content-based: two hints with identical text
//! but different ids are both shown once each. The refresh loop fires every
//! ~500 ms regardless of hint durations, so without this gate the same
//! winner would be re-sent every cycle.

use dashmap::DashMap;
use uuid::Uuid;

use crate::hint::{HintRecord, SubjectId};

/// Tracks, per subject, the id of the last hint actually forwarded.
#[derive(Default)]
pub struct DisplayGate {
    last_displayed: DashMap<SubjectId, Uuid>,
}

impl DisplayGate {
    pub fn new() -> Self {
        Self::default()
    }

    /// Decides whether the candidate should be forwarded to the display.
    ///
    /// `None` candidate: nothing to show, no state change. A candidate whose
    /// id matches the last forwarded one for this subject is suppressed.
    /// Otherwise the candidate is recorded as the new last-displayed and
    /// forwarded.
    pub fn should_display(&self, subject: &str, candidate: Option<&HintRecord>) -> bool {
        let Some(candidate) = candidate else {
            return false;
        };
        if let Some(last) = self.last_displayed.get(subject) {
            if *last == candidate.id {
                return false;
            }
        }
        self.last_displayed.insert(subject.to_string(), candidate.id);
        true
    }

    /// Drops the entry for a subject that no longer exists.
    pub fn forget(&self, subject: &str) {
        self.last_displayed.remove(subject);
    }

    /// Full teardown.
    pub fn clear(&self) {
        self.last_displayed.clear();
    }

    pub fn len(&self) -> usize {
        self.last_displayed.len()
    }

    pub fn is_empty(&self) -> bool {
        self.last_displayed.is_empty()
    }
}
