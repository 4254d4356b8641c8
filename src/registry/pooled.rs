// src/registry/pooled.rs

//! Pool-backed registry variant for high-churn workloads.
//!
//! Differences from [`HintRegistry`]: records are recycled through a bounded
//! [`RecordPool`], each subject's set is capped (oldest evicted first), and
//! sets are kept unordered with sorting deferred to read time.
//!
//! Event/reuse ordering: a record's `Removed`/`Expired` event is emitted
//! before the record is released to the pool, so an observer never sees a
//! record that is simultaneously live and recycled.

use std::sync::Arc;

use chrono::Utc;
use dashmap::DashMap;
use parking_lot::Mutex;
use tracing::debug;
use uuid::Uuid;

use super::events::{HintEventKind, HintObserver, ObserverSet};
use super::pool::RecordPool;
use super::stats::{HintCounters, PerformanceStats};
use super::{HintStore, SweepReport};
use crate::hint::{DEFAULT_SOURCE, HintRecord, SubjectId, display_order};
use crate::subjects::SubjectProvider;

pub const DEFAULT_POOL_CAPACITY: usize = 100;
pub const DEFAULT_MAX_HINTS_PER_SUBJECT: usize = 10;

pub struct PooledHintRegistry {
    subjects: DashMap<SubjectId, Mutex<Vec<HintRecord>>>,
    pool: RecordPool,
    observers: ObserverSet,
    counters: Arc<HintCounters>,
    max_hints_per_subject: usize,
}

impl Default for PooledHintRegistry {
    fn default() -> Self {
        Self::new(DEFAULT_POOL_CAPACITY, DEFAULT_MAX_HINTS_PER_SUBJECT)
    }
}

impl PooledHintRegistry {
    pub fn new(pool_capacity: usize, max_hints_per_subject: usize) -> Self {
        let counters = Arc::new(HintCounters::new());
        Self {
            subjects: DashMap::new(),
            pool: RecordPool::new(pool_capacity, counters.clone()),
            observers: ObserverSet::new(),
            counters,
            max_hints_per_subject,
        }
    }

    pub fn pool_size(&self) -> usize {
        self.pool.len()
    }

    pub fn counters(&self) -> Arc<HintCounters> {
        self.counters.clone()
    }

    /// Builds an active record, reusing a pooled one when available.
    fn build_record(&self, text: &str, duration_secs: f32, priority: i32, source: &str) -> HintRecord {
        match self.pool.acquire() {
            Some(mut record) => {
                record.activate(text, duration_secs, priority, source);
                record
            }
            None => HintRecord::new(text, duration_secs, priority, source),
        }
    }

    /// Inserts under the subject lock, evicting the oldest record when the
    /// per-subject cap is hit. Returns the evicted record, if any.
    fn insert_capped(&self, subject: &str, record: HintRecord) -> Result<Option<HintRecord>, ()> {
        let hints = self
            .subjects
            .entry(subject.to_string())
            .or_insert_with(|| Mutex::new(Vec::new()));
        let mut hints = hints.lock();
        if hints.iter().any(|h| h.id == record.id) {
            debug!("Rejected duplicate hint id {} for subject {}", record.id, subject);
            return Err(());
        }
        let evicted = if hints.len() >= self.max_hints_per_subject {
            let oldest = hints
                .iter()
                .enumerate()
                .min_by_key(|(_, h)| h.created_at)
                .map(|(i, _)| i);
            oldest.map(|i| hints.remove(i))
        } else {
            None
        };
        hints.push(record);
        Ok(evicted)
    }

    fn finish_removal(&self, subject: &str, kind: HintEventKind, record: HintRecord) {
        match kind {
            HintEventKind::Expired => self.counters.record_expired(),
            _ => self.counters.record_removed(),
        }
        self.observers.emit(kind, subject, &record);
        self.pool.release(record);
    }
}

impl HintStore for PooledHintRegistry {
    fn post(&self, subject: &str, text: &str, duration_secs: f32, priority: i32, source: &str) -> Option<Uuid> {
        if subject.is_empty() || text.is_empty() || !(duration_secs > 0.0) {
            return None;
        }
        let source = if source.is_empty() { DEFAULT_SOURCE } else { source };
        let record = self.build_record(text, duration_secs, priority, source);
        let id = record.id;
        let snapshot = record.clone();
        let evicted = match self.insert_capped(subject, record) {
            Ok(evicted) => evicted,
            Err(()) => return None,
        };
        self.counters.record_created();
        if let Some(old) = evicted {
            self.finish_removal(subject, HintEventKind::Removed, old);
        }
        self.observers.emit(HintEventKind::Added, subject, &snapshot);
        Some(id)
    }

    fn add(&self, subject: &str, record: HintRecord) -> bool {
        if subject.is_empty() {
            return false;
        }
        let snapshot = record.clone();
        let evicted = match self.insert_capped(subject, record) {
            Ok(evicted) => evicted,
            Err(()) => return false,
        };
        self.counters.record_created();
        if let Some(old) = evicted {
            self.finish_removal(subject, HintEventKind::Removed, old);
        }
        self.observers.emit(HintEventKind::Added, subject, &snapshot);
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
                self.finish_removal(subject, HintEventKind::Removed, record);
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
        let count = drained.len();
        for record in drained {
            self.finish_removal(subject, HintEventKind::Removed, record);
        }
        count
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
        let count = drained.len();
        for record in drained {
            self.finish_removal(subject, HintEventKind::Removed, record);
        }
        count
    }

    fn get_active(&self, subject: &str) -> Vec<HintRecord> {
        let Some(hints) = self.subjects.get(subject) else {
            return Vec::new();
        };
        let now = Utc::now();
        let mut active: Vec<HintRecord> = {
            let hints = hints.lock();
            hints.iter().filter(|h| h.is_displayable(now)).cloned().collect()
        };
        // Sets are unordered in this variant; sort lazily at read time.
        active.sort_by(display_order);
        active
    }

    fn get_by_id(&self, subject: &str, id: Uuid) -> Option<HintRecord> {
        let hints = self.subjects.get(subject)?;
        let hints = hints.lock();
        hints.iter().find(|h| h.id == id).cloned()
    }

    fn sweep(&self, live: &dyn SubjectProvider) -> SweepReport {
        let now = Utc::now();
        let mut report = SweepReport::default();
        let mut expired: Vec<(SubjectId, HintRecord)> = Vec::new();

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
                    expired.push((subject.clone(), record));
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
            // Bulk drop: the subject no longer exists, records go straight
            // back to the pool with no per-record events.
            if let Some((_, hints)) = self.subjects.remove(subject) {
                for record in hints.into_inner() {
                    self.pool.release(record);
                }
            }
        }
        report.expired = expired.len();
        for (subject, record) in expired {
            self.finish_removal(&subject, HintEventKind::Expired, record);
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
        PerformanceStats::snapshot(&self.counters, self.subjects.len(), self.pool.len())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::subjects::StaticSubjects;

    #[test]
    fn test_post_pulls_from_pool() {
        let registry = PooledHintRegistry::new(4, 10);
        assert_eq!(registry.pool_size(), 4);
        let id = registry.post("alice", "hello", 5.0, 0, "t").unwrap();
        assert_eq!(registry.pool_size(), 3);
        let hint = registry.get_by_id("alice", id).unwrap();
        assert_eq!(hint.text, "hello");
        assert!(hint.active);
    }

    #[test]
    fn test_post_survives_empty_pool() {
        let registry = PooledHintRegistry::new(1, 10);
        assert!(registry.post("alice", "one", 5.0, 0, "t").is_some());
        assert!(registry.post("alice", "two", 5.0, 0, "t").is_some());
        assert_eq!(registry.get_active("alice").len(), 2);
        let stats = registry.stats();
        assert_eq!(stats.pool_hits, 1);
        assert_eq!(stats.pool_misses, 1);
    }

    #[test]
    fn test_post_rejects_nan_duration() {
        let registry = PooledHintRegistry::new(4, 10);
        assert!(registry.post("alice", "text", f32::NAN, 0, "t").is_none());
        // A rejected post must not consume a pooled record.
        assert_eq!(registry.pool_size(), 4);
        assert_eq!(registry.subject_count(), 0);
    }

    #[test]
    fn test_post_defaults_empty_source() {
        let registry = PooledHintRegistry::new(4, 10);
        let id = registry.post("alice", "tagless", 5.0, 0, "").unwrap();
        assert_eq!(registry.get_by_id("alice", id).unwrap().source, DEFAULT_SOURCE);
    }

    #[test]
    fn test_per_subject_cap_evicts_oldest() {
        let registry = PooledHintRegistry::new(8, 3);
        let first = registry.post("alice", "oldest", 60.0, 0, "t").unwrap();
        for i in 0..3 {
            registry.post("alice", &format!("h{i}"), 60.0, 0, "t");
        }
        let active = registry.get_active("alice");
        assert_eq!(active.len(), 3);
        assert!(registry.get_by_id("alice", first).is_none());
    }

    #[test]
    fn test_lazy_sort_on_read() {
        let registry = PooledHintRegistry::new(8, 10);
        for priority in [5, 1, 3] {
            registry.post("alice", &format!("p{priority}"), 60.0, priority, "t");
        }
        let priorities: Vec<i32> = registry.get_active("alice").iter().map(|h| h.priority).collect();
        assert_eq!(priorities, vec![5, 3, 1]);
    }

    #[test]
    fn test_sweep_returns_expired_records_to_pool() {
        let registry = PooledHintRegistry::new(2, 10);
        let id = registry.post("alice", "blink", 0.01, 0, "t").unwrap();
        assert_eq!(registry.pool_size(), 1);
        std::thread::sleep(std::time::Duration::from_millis(30));
        let live = StaticSubjects::new(["alice"]);
        let report = registry.sweep(&live);
        assert_eq!(report.expired, 1);
        assert_eq!(registry.pool_size(), 2);
        // A recycled record must not be reachable under its old id.
        assert!(registry.get_by_id("alice", id).is_none());
        assert!(registry.get_active("alice").is_empty());
    }

    #[test]
    fn test_dropped_subject_records_go_back_to_pool() {
        let registry = PooledHintRegistry::new(2, 10);
        registry.post("ghost", "stale", 60.0, 0, "t");
        assert_eq!(registry.pool_size(), 1);
        let live = StaticSubjects::new(["alice"]);
        let report = registry.sweep(&live);
        assert_eq!(report.dropped_subjects, vec!["ghost".to_string()]);
        assert_eq!(registry.pool_size(), 2);
        assert_eq!(registry.subject_count(), 0);
    }
}
