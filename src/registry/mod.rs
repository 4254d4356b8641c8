// src/registry/mod.rs

//! Per-subject hint stores behind a concurrent subject map.
//!
//! Two variants share the [`HintStore`] contract:
//! - [`HintRegistry`] keeps every subject's set sorted on mutation and
//!   allocates records directly.
//! - [`PooledHintRegistry`] keeps sets unordered, sorts at read time, and
//!   recycles records through a bounded [`RecordPool`].
//!
//! Mutations on different subjects never contend: the subject map is a
//! `DashMap` and each subject's set sits behind its own mutex. Lifecycle
//! events are delivered synchronously, but always after the per-subject
//! lock has been released.

mod events;
mod pool;
mod pooled;
mod stats;

pub use events::{HintEvent, HintEventKind, HintObserver, ObserverSet};
pub use pool::RecordPool;
pub use pooled::PooledHintRegistry;
pub use stats::{HintCounters, PerformanceStats};

use std::sync::Arc;

use chrono::Utc;
use dashmap::DashMap;
use parking_lot::Mutex;
use tracing::debug;
use uuid::Uuid;

use crate::hint::{DEFAULT_SOURCE, HintRecord, SubjectId, display_order};
use crate::subjects::SubjectProvider;

/// Outcome of one maintenance pass.
#[derive(Debug, Clone, Default)]
pub struct SweepReport {
    /// Records evicted because their expiry was observed.
    pub expired: usize,
    /// Subjects dropped wholesale because they are no longer live.
    pub dropped_subjects: Vec<SubjectId>,
    /// Subjects still holding at least one record after the pass.
    pub remaining_subjects: usize,
}

/// Contract shared by both registry variants.
pub trait HintStore: Send + Sync {
    /// Validates inputs, creates a record, and inserts it. Returns the new
    /// record's id, or `None` on empty subject/text or non-positive duration.
    fn post(&self, subject: &str, text: &str, duration_secs: f32, priority: i32, source: &str) -> Option<Uuid>;

    /// Inserts an already-built record. `false` on empty subject or when a
    /// record with the same id already exists for that subject.
    fn add(&self, subject: &str, record: HintRecord) -> bool;

    /// Removes one record by id. `false` if subject or id is unknown.
    fn remove(&self, subject: &str, id: Uuid) -> bool;

    /// Removes every record for a subject, one `Removed` event per record.
    fn clear_all(&self, subject: &str) -> usize;

    /// Removes records whose `source` matches; same event contract.
    fn clear_by_source(&self, subject: &str, source: &str) -> usize;

    /// Displayable records in priority/recency order. Empty for unknown
    /// subjects, never an error. The returned records are snapshots; their
    /// displayability must be re-validated against a later clock.
    fn get_active(&self, subject: &str) -> Vec<HintRecord>;

    /// Point lookup regardless of active/expired state.
    fn get_by_id(&self, subject: &str, id: Uuid) -> Option<HintRecord>;

    /// Evicts expired records and drops subjects absent from the live set.
    /// Dropping a subject emits no per-record events; it is a bulk operation
    /// distinct from `clear_all`.
    fn sweep(&self, live: &dyn SubjectProvider) -> SweepReport;

    /// Discards all state without emitting events. Teardown only.
    fn cleanup(&self);

    /// Attaches a lifecycle observer.
    fn subscribe(&self, observer: Arc<dyn HintObserver>);

    /// Number of subjects currently holding a store.
    fn subject_count(&self) -> usize;

    /// Snapshot of churn/pool counters.
    fn stats(&self) -> PerformanceStats;
}

type SubjectMap = DashMap<SubjectId, Mutex<Vec<HintRecord>>>;

/// Eager-sorting registry: each subject's set is re-sorted on every insert,
/// so reads are a linear filter.
pub struct HintRegistry {
    subjects: SubjectMap,
    observers: ObserverSet,
    counters: Arc<HintCounters>,
}

impl Default for HintRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl HintRegistry {
    pub fn new() -> Self {
        Self {
            subjects: DashMap::new(),
            observers: ObserverSet::new(),
            counters: Arc::new(HintCounters::new()),
        }
    }

    pub fn counters(&self) -> Arc<HintCounters> {
        self.counters.clone()
    }
}

impl HintStore for HintRegistry {
    fn post(&self, subject: &str, text: &str, duration_secs: f32, priority: i32, source: &str) -> Option<Uuid> {
        if subject.is_empty() || text.is_empty() || !(duration_secs > 0.0) {
            return None;
        }
        let source = if source.is_empty() { DEFAULT_SOURCE } else { source };
        let record = HintRecord::new(text, duration_secs, priority, source);
        let id = record.id;
        self.add(subject, record).then_some(id)
    }

    fn add(&self, subject: &str, record: HintRecord) -> bool {
        if subject.is_empty() {
            return false;
        }
        {
            let hints = self
                .subjects
                .entry(subject.to_string())
                .or_insert_with(|| Mutex::new(Vec::new()));
            let mut hints = hints.lock();
            if hints.iter().any(|h| h.id == record.id) {
                debug!("Rejected duplicate hint id {} for subject {}", record.id, subject);
                return false;
            }
            hints.push(record.clone());
            hints.sort_by(display_order);
        }
        self.counters.record_created();
        self.observers.emit(HintEventKind::Added, subject, &record);
        true
    }

    fn remove(&self, subject: &str, id: Uuid) -> bool {
        let removed = {
            let Some(hints) = self.subjects.get(subject) else {
                return false;
            };
            let mut hints = hints.lock();
            let index = hints.iter().position(|h| h.id == id);
            index.map(|i| hints.remove(i))
        };
        match removed {
            Some(record) => {
                self.counters.record_removed();
                self.observers.emit(HintEventKind::Removed, subject, &record);
                true
            }
            None => false,
        }
    }

    fn clear_all(&self, subject: &str) -> usize {
        let drained: Vec<HintRecord> = {
            let Some(hints) = self.subjects.get(subject) else {
                return 0;
            };
            let mut hints = hints.lock();
            hints.drain(..).collect()
        };
        for record in &drained {
            self.counters.record_removed();
            self.observers.emit(HintEventKind::Removed, subject, record);
        }
        drained.len()
    }

    fn clear_by_source(&self, subject: &str, source: &str) -> usize {
        if source.is_empty() {
            return 0;
        }
        let drained: Vec<HintRecord> = {
            let Some(hints) = self.subjects.get(subject) else {
                return 0;
            };
            let mut hints = hints.lock();
            let mut kept = Vec::with_capacity(hints.len());
            let mut dropped = Vec::new();
            for record in hints.drain(..) {
                if record.source == source {
                    dropped.push(record);
                } else {
                    kept.push(record);
                }
            }
            *hints = kept;
            dropped
        };
        for record in &drained {
            self.counters.record_removed();
            self.observers.emit(HintEventKind::Removed, subject, record);
        }
        drained.len()
    }

    fn get_active(&self, subject: &str) -> Vec<HintRecord> {
        let Some(hints) = self.subjects.get(subject) else {
            return Vec::new();
        };
        let now = Utc::now();
        let hints = hints.lock();
        hints.iter().filter(|h| h.is_displayable(now)).cloned().collect()
    }

    fn get_by_id(&self, subject: &str, id: Uuid) -> Option<HintRecord> {
        let hints = self.subjects.get(subject)?;
        let hints = hints.lock();
        hints.iter().find(|h| h.id == id).cloned()
    }

    fn sweep(&self, live: &dyn SubjectProvider) -> SweepReport {
        let now = Utc::now();
        let mut report = SweepReport::default();
        let mut expired_events: Vec<(SubjectId, HintRecord)> = Vec::new();

        for entry in self.subjects.iter() {
            let subject = entry.key().clone();
            if !live.is_live(&subject) {
                report.dropped_subjects.push(subject);
                continue;
            }
            let mut hints = entry.value().lock();
            let mut kept = Vec::with_capacity(hints.len());
            for mut record in hints.drain(..) {
                record.refresh_status(now);
                if record.is_expired(now) {
                    expired_events.push((subject.clone(), record));
                } else {
                    kept.push(record);
                }
            }
            *hints = kept;
            if !hints.is_empty() {
                report.remaining_subjects += 1;
            }
        }

        for subject in &report.dropped_subjects {
            self.subjects.remove(subject);
        }
        report.expired = expired_events.len();
        for (subject, record) in &expired_events {
            self.counters.record_expired();
            self.observers.emit(HintEventKind::Expired, subject, record);
        }
        report
    }

    fn cleanup(&self) {
        self.subjects.clear();
    }

    fn subscribe(&self, observer: Arc<dyn HintObserver>) {
        self.observers.subscribe(observer);
    }

    fn subject_count(&self) -> usize {
        self.subjects.len()
    }

    fn stats(&self) -> PerformanceStats {
        PerformanceStats::snapshot(&self.counters, self.subjects.len(), 0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::subjects::StaticSubjects;

    #[test]
    fn test_post_then_get_by_id_round_trip() {
        let registry = HintRegistry::new();
        let id = registry.post("alice", "hello", 5.0, 1, "tester").unwrap();
        let hint = registry.get_by_id("alice", id).unwrap();
        assert_eq!(hint.text, "hello");
        assert_eq!(hint.duration_secs, 5.0);
        assert_eq!(hint.source, "tester");
        assert!(hint.active);
        assert_eq!(
            hint.expires_at,
            hint.created_at + chrono::Duration::milliseconds(5000)
        );
    }

    #[test]
    fn test_post_rejects_invalid_inputs() {
        let registry = HintRegistry::new();
        assert!(registry.post("", "text", 1.0, 0, "t").is_none());
        assert!(registry.post("alice", "", 1.0, 0, "t").is_none());
        assert!(registry.post("alice", "text", 0.0, 0, "t").is_none());
        assert!(registry.post("alice", "text", -1.0, 0, "t").is_none());
        assert!(registry.post("alice", "text", f32::NAN, 0, "t").is_none());
        assert_eq!(registry.subject_count(), 0);
    }

    #[test]
    fn test_post_defaults_empty_source() {
        let registry = HintRegistry::new();
        let id = registry.post("alice", "tagless", 5.0, 0, "").unwrap();
        assert_eq!(registry.get_by_id("alice", id).unwrap().source, DEFAULT_SOURCE);
    }

    #[test]
    fn test_duplicate_id_is_rejected() {
        let registry = HintRegistry::new();
        let first = HintRecord::new("one", 5.0, 0, "t");
        let mut second = HintRecord::new("two", 5.0, 0, "t");
        second.id = first.id;
        assert!(registry.add("alice", first));
        assert!(!registry.add("alice", second));
        assert_eq!(registry.get_active("alice").len(), 1);
    }

    #[test]
    fn test_get_active_is_priority_ordered() {
        let registry = HintRegistry::new();
        for priority in [5, 1, 3] {
            registry.post("alice", &format!("p{priority}"), 10.0, priority, "t");
        }
        let active = registry.get_active("alice");
        let priorities: Vec<i32> = active.iter().map(|h| h.priority).collect();
        assert_eq!(priorities, vec![5, 3, 1]);
    }

    #[test]
    fn test_equal_priority_breaks_ties_by_creation() {
        let registry = HintRegistry::new();
        let mut first = HintRecord::new("first", 10.0, 5, "t");
        let mut second = HintRecord::new("second", 10.0, 5, "t");
        let base = Utc::now();
        first.created_at = base;
        second.created_at = base + chrono::Duration::seconds(1);
        registry.add("alice", second);
        registry.add("alice", first);
        let active = registry.get_active("alice");
        assert_eq!(active[0].text, "first");
        assert_eq!(active[1].text, "second");
    }

    #[test]
    fn test_clear_by_source_is_exact() {
        let registry = HintRegistry::new();
        registry.post("alice", "a", 10.0, 0, "plugin-a");
        registry.post("alice", "b", 10.0, 0, "plugin-b");
        registry.post("alice", "c", 10.0, 0, "plugin-a");
        assert_eq!(registry.clear_by_source("alice", "plugin-a"), 2);
        let remaining = registry.get_active("alice");
        assert_eq!(remaining.len(), 1);
        assert_eq!(remaining[0].source, "plugin-b");
        assert_eq!(registry.clear_by_source("alice", "plugin-a"), 0);
        assert_eq!(registry.clear_by_source("ghost", "plugin-a"), 0);
    }

    #[test]
    fn test_clear_all_counts_and_empties() {
        let registry = HintRegistry::new();
        registry.post("alice", "a", 10.0, 0, "t");
        registry.post("alice", "b", 10.0, 0, "t");
        assert_eq!(registry.clear_all("alice"), 2);
        assert!(registry.get_active("alice").is_empty());
        assert_eq!(registry.clear_all("alice"), 0);
    }

    #[test]
    fn test_sweep_drops_dead_subjects_without_events() {
        struct Recorder(std::sync::atomic::AtomicUsize);
        impl HintObserver for Recorder {
            fn on_event(&self, event: &HintEvent) {
                if event.kind == HintEventKind::Removed {
                    self.0.fetch_add(1, std::sync::atomic::Ordering::Relaxed);
                }
            }
        }

        let registry = HintRegistry::new();
        let recorder = Arc::new(Recorder(std::sync::atomic::AtomicUsize::new(0)));
        registry.subscribe(recorder.clone());

        registry.post("alice", "alive", 60.0, 0, "t");
        registry.post("ghost", "stale", 60.0, 0, "t");

        let live = StaticSubjects::new(["alice"]);
        let report = registry.sweep(&live);
        assert_eq!(report.dropped_subjects, vec!["ghost".to_string()]);
        assert_eq!(registry.subject_count(), 1);
        // Bulk drop is not clear_all: no per-record Removed events.
        assert_eq!(recorder.0.load(std::sync::atomic::Ordering::Relaxed), 0);
    }

    #[test]
    fn test_cleanup_discards_everything() {
        let registry = HintRegistry::new();
        registry.post("alice", "a", 10.0, 0, "t");
        registry.post("bob", "b", 10.0, 0, "t");
        registry.cleanup();
        assert_eq!(registry.subject_count(), 0);
        assert!(registry.get_active("alice").is_empty());
    }
}
