// src/hint/record.rs

//! A single prioritized, time-bounded hint.
//!
//! Expiry is a pure function of `expires_at` vs. the caller's clock; the
//! `active` flag only catches up to it when a status refresh observes it.
//! That lag is deliberate: it gives eviction logic one authoritative
//! transition point per record instead of two drifting sources of truth.

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Key type for the entity a hint is attached to.
pub type SubjectId = String;

/// Advisory producer tag used when a caller does not supply one.
pub const DEFAULT_SOURCE: &str = "Unknown";

/// A prioritized, time-bounded text annotation for one subject.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HintRecord {
    /// Unique identifier, re-assigned each time a pooled record is reused.
    pub id: Uuid,
    /// Display payload. Empty only while the record sits idle in the pool.
    pub text: String,
    /// Requested visible lifetime in seconds. Must be > 0 to become active.
    pub duration_secs: f32,
    /// Higher sorts first. No enforced bounds.
    pub priority: i32,
    /// Advisory tag identifying the producer.
    pub source: String,
    pub created_at: DateTime<Utc>,
    pub expires_at: DateTime<Utc>,
    /// True from activation until expiry is observed or the record is removed.
    pub active: bool,
}

impl HintRecord {
    /// Creates and activates a new hint.
    pub fn new(text: impl Into<String>, duration_secs: f32, priority: i32, source: impl Into<String>) -> Self {
        let created_at = Utc::now();
        Self {
            id: Uuid::new_v4(),
            text: text.into(),
            duration_secs,
            priority,
            source: source.into(),
            created_at,
            expires_at: created_at + duration_from_secs(duration_secs),
            active: true,
        }
    }

    /// An inert record for pre-filling the pool. Not displayable.
    pub fn inert() -> Self {
        Self {
            id: Uuid::nil(),
            text: String::new(),
            duration_secs: 0.0,
            priority: 0,
            source: String::new(),
            created_at: Utc::now(),
            expires_at: Utc::now(),
            active: false,
        }
    }

    /// Re-activates a pooled record in place with fresh identity and payload.
    pub fn activate(&mut self, text: impl Into<String>, duration_secs: f32, priority: i32, source: impl Into<String>) {
        self.id = Uuid::new_v4();
        self.text = text.into();
        self.duration_secs = duration_secs;
        self.priority = priority;
        self.source = source.into();
        self.created_at = Utc::now();
        self.expires_at = self.created_at + duration_from_secs(duration_secs);
        self.active = true;
    }

    /// Resets to the inert state. Called by the pool on release.
    pub fn reset(&mut self) {
        self.id = Uuid::nil();
        self.text.clear();
        self.duration_secs = 0.0;
        self.priority = 0;
        self.source.clear();
        self.active = false;
    }

    /// Pure check: is `now` past the expiry instant?
    pub fn is_expired(&self, now: DateTime<Utc>) -> bool {
        now > self.expires_at
    }

    /// Flips `active` off the first time expiry is observed.
    pub fn refresh_status(&mut self, now: DateTime<Utc>) {
        if self.is_expired(now) {
            self.active = false;
        }
    }

    /// Active and not yet past expiry.
    pub fn is_displayable(&self, now: DateTime<Utc>) -> bool {
        self.active && !self.is_expired(now)
    }
}

/// Ordering used everywhere a subject's hints are ranked: priority
/// descending, then earlier `created_at` winning ties. Deterministic, which
/// the display dedup depends on.
pub fn display_order(a: &HintRecord, b: &HintRecord) -> std::cmp::Ordering {
    b.priority
        .cmp(&a.priority)
        .then_with(|| a.created_at.cmp(&b.created_at))
}

fn duration_from_secs(secs: f32) -> Duration {
    Duration::milliseconds((secs * 1000.0) as i64)
}
