// src/subjects.rs

//! Boundary to the external live-subject set.
//!
//! The registry never decides on its own which subjects exist; the sweep asks
//! a provider and drops stores for subjects that are no longer live.

use std::collections::HashSet;

use parking_lot::RwLock;

use crate::hint::SubjectId;

/// Queryable live-set of valid subjects.
pub trait SubjectProvider: Send + Sync {
    /// Snapshot of every currently live subject. Order is unspecified.
    fn subjects(&self) -> Vec<SubjectId>;

    /// Whether the given subject is currently live.
    fn is_live(&self, subject: &str) -> bool;
}

/// In-memory roster, used by the daemon demo and tests.
#[derive(Default)]
pub struct StaticSubjects {
    roster: RwLock<HashSet<SubjectId>>,
}

impl StaticSubjects {
    pub fn new<I, S>(subjects: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<SubjectId>,
    {
        Self {
            roster: RwLock::new(subjects.into_iter().map(Into::into).collect()),
        }
    }

    pub fn join(&self, subject: impl Into<SubjectId>) {
        self.roster.write().insert(subject.into());
    }

    pub fn leave(&self, subject: &str) {
        self.roster.write().remove(subject);
    }
}

impl SubjectProvider for StaticSubjects {
    fn subjects(&self) -> Vec<SubjectId> {
        self.roster.read().iter().cloned().collect()
    }

    fn is_live(&self, subject: &str) -> bool {
        self.roster.read().contains(subject)
    }
}
