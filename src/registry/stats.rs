// src/registry/stats.rs

//! Counters for hint churn and pool behaviour.

use std::sync::atomic::{AtomicU64, Ordering};

use serde::{Deserialize, Serialize};
use tracing::info;

/// Shared counters updated by the registries and the pool.
#[derive(Debug, Default)]
pub struct HintCounters {
    pub created: AtomicU64,
    pub removed: AtomicU64,
    pub expired: AtomicU64,
    pub pool_hits: AtomicU64,
    pub pool_misses: AtomicU64,
}

impl HintCounters {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record_created(&self) {
        self.created.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_removed(&self) {
        self.removed.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_expired(&self) {
        self.expired.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_pool_hit(&self) {
        self.pool_hits.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_pool_miss(&self) {
        self.pool_misses.fetch_add(1, Ordering::Relaxed);
    }
}

/// Point-in-time snapshot of registry/pool health.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PerformanceStats {
    pub total_created: u64,
    pub total_removed: u64,
    pub total_expired: u64,
    pub pool_hits: u64,
    pub pool_misses: u64,
    pub pool_efficiency_pct: f64,
    pub active_subjects: usize,
    pub pool_size: usize,
}

impl PerformanceStats {
    pub fn snapshot(counters: &HintCounters, active_subjects: usize, pool_size: usize) -> Self {
        let hits = counters.pool_hits.load(Ordering::Relaxed);
        let misses = counters.pool_misses.load(Ordering::Relaxed);
        let efficiency = if hits + misses > 0 {
            hits as f64 / (hits + misses) as f64 * 100.0
        } else {
            0.0
        };
        Self {
            total_created: counters.created.load(Ordering::Relaxed),
            total_removed: counters.removed.load(Ordering::Relaxed),
            total_expired: counters.expired.load(Ordering::Relaxed),
            pool_hits: hits,
            pool_misses: misses,
            pool_efficiency_pct: efficiency,
            active_subjects,
            pool_size,
        }
    }

    pub fn report(&self) {
        info!(
            "Hint stats: created={} removed={} expired={} pool_hits={} pool_misses={} efficiency={:.2}% subjects={} pool_size={}",
            self.total_created,
            self.total_removed,
            self.total_expired,
            self.pool_hits,
            self.pool_misses,
            self.pool_efficiency_pct,
            self.active_subjects,
            self.pool_size,
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_efficiency_calculation() {
        let counters = HintCounters::new();
        for _ in 0..3 {
            counters.record_pool_hit();
        }
        counters.record_pool_miss();

        let stats = PerformanceStats::snapshot(&counters, 2, 10);
        assert_eq!(stats.pool_hits, 3);
        assert_eq!(stats.pool_misses, 1);
        assert!((stats.pool_efficiency_pct - 75.0).abs() < f64::EPSILON);
        assert_eq!(stats.active_subjects, 2);
    }

    #[test]
    fn test_efficiency_with_no_traffic_is_zero() {
        let counters = HintCounters::new();
        let stats = PerformanceStats::snapshot(&counters, 0, 0);
        assert_eq!(stats.pool_efficiency_pct, 0.0);
    }
}
