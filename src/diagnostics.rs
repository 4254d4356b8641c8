// src/diagnostics.rs

//! Periodic health reporting for the hint engine.

use std::sync::Arc;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tracing::info;

use crate::registry::HintStore;
use crate::subjects::SubjectProvider;

/// One health check's findings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthReport {
    pub store_available: bool,
    pub live_subjects: usize,
    pub total_active_hints: usize,
    pub pool_size: usize,
    pub pool_efficiency_pct: f64,
    /// Records reclaimed since the previous check, computed by subtracting
    /// the previous expired total from the current one.
    pub reclaimed_since_last: u64,
}

impl HealthReport {
    /// Single-line JSON form used by the monitor's log output.
    pub fn to_json(&self) -> String {
        serde_json::to_string(self).unwrap_or_else(|_| "{}".to_string())
    }
}

/// Logs a health report on a fixed interval.
pub struct SystemMonitor {
    store: Arc<dyn HintStore>,
    provider: Arc<dyn SubjectProvider>,
    interval: Duration,
    last_expired_total: u64,
}

impl SystemMonitor {
    pub fn new(store: Arc<dyn HintStore>, provider: Arc<dyn SubjectProvider>, interval: Duration) -> Self {
        Self {
            store,
            provider,
            interval,
            last_expired_total: 0,
        }
    }

    /// Gathers one report and advances the reclaim baseline.
    pub fn check(&mut self) -> HealthReport {
        let stats = self.store.stats();
        let subjects = self.provider.subjects();
        let total_active_hints = subjects
            .iter()
            .map(|s| self.store.get_active(s).len())
            .sum();
        let reclaimed = stats.total_expired.saturating_sub(self.last_expired_total);
        self.last_expired_total = stats.total_expired;
        HealthReport {
            store_available: true,
            live_subjects: subjects.len(),
            total_active_hints,
            pool_size: stats.pool_size,
            pool_efficiency_pct: stats.pool_efficiency_pct,
            reclaimed_since_last: reclaimed,
        }
    }

    pub fn spawn(mut self) -> (watch::Sender<bool>, JoinHandle<()>) {
        let (stop_tx, stop_rx) = watch::channel(false);
        let interval = self.interval;
        info!("System monitor started (interval: {:?})", interval);

        let handle = tokio::spawn(async move {
            loop {
                if *stop_rx.borrow() {
                    info!("System monitor stopping");
                    break;
                }
                let report = self.check();
                info!("Health: {}", report.to_json());
                tokio::time::sleep(interval).await;
            }
        });

        (stop_tx, handle)
    }
}
