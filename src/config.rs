// src/config.rs
// Configuration for the hint engine and its background tasks

use std::time::Duration;

/// Tunables, loadable from the environment with sane defaults.
#[derive(Debug, Clone)]
pub struct HintConfig {
    /// Delay between sweep ticks. The loop sleeps this long after each tick
    /// finishes, so effective cadence is tick duration + delay.
    pub sweep_delay: Duration,

    /// Fixed pool capacity, pre-filled at startup.
    pub pool_capacity: usize,

    /// Per-subject hint cap in the pooled variant.
    pub max_hints_per_subject: usize,

    /// Health monitor
    pub monitor_enabled: bool,
    pub monitor_interval: Duration,
}

impl Default for HintConfig {
    fn default() -> Self {
        Self {
            sweep_delay: Duration::from_millis(500),
            pool_capacity: 100,
            max_hints_per_subject: 10,
            monitor_enabled: true,
            monitor_interval: Duration::from_secs(30),
        }
    }
}

impl HintConfig {
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            sweep_delay: Duration::from_millis(
                std::env::var("HINT_SWEEP_DELAY_MS")
                    .ok()
                    .and_then(|v| v.parse().ok())
                    .unwrap_or(defaults.sweep_delay.as_millis() as u64),
            ),
            pool_capacity: std::env::var("HINT_POOL_CAPACITY")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(defaults.pool_capacity),
            max_hints_per_subject: std::env::var("HINT_MAX_PER_SUBJECT")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(defaults.max_hints_per_subject),
            monitor_enabled: std::env::var("HINT_MONITOR_ENABLED")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(defaults.monitor_enabled),
            monitor_interval: Duration::from_secs(
                std::env::var("HINT_MONITOR_INTERVAL_SECS")
                    .ok()
                    .and_then(|v| v.parse().ok())
                    .unwrap_or(defaults.monitor_interval.as_secs()),
            ),
        }
    }

    /// Human-readable summary for startup logging.
    pub fn summary(&self) -> String {
        format!(
            "Hint engine config:\n\
            - Sweep delay: {} ms\n\
            - Pool capacity: {}\n\
            - Max hints per subject: {}\n\
            - Monitor: {} (every {} secs)",
            self.sweep_delay.as_millis(),
            self.pool_capacity,
            self.max_hints_per_subject,
            if self.monitor_enabled { "ON" } else { "OFF" },
            self.monitor_interval.as_secs(),
        )
    }
}
