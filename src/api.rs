// src/api.rs

//! Public facade over a hint store and a subject provider.
//!
//! All validation failures come back as sentinel values (`None`, `false`,
//! `0`), never as panics or propagating errors; callers are expected to
//! check the result.

use std::sync::Arc;

use uuid::Uuid;

use crate::hint::HintRecord;
use crate::registry::HintStore;
use crate::subjects::SubjectProvider;

pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Explicitly owned entry point; construct as many independent instances as
/// needed (there is no process-wide singleton).
#[derive(Clone)]
pub struct HintApi {
    store: Arc<dyn HintStore>,
    provider: Arc<dyn SubjectProvider>,
}

impl HintApi {
    pub fn new(store: Arc<dyn HintStore>, provider: Arc<dyn SubjectProvider>) -> Self {
        Self { store, provider }
    }

    pub fn store(&self) -> Arc<dyn HintStore> {
        self.store.clone()
    }

    /// Posts a hint for one subject. `None` on empty subject/text or
    /// non-positive duration.
    pub fn post(&self, subject: &str, text: &str, duration_secs: f32, priority: i32, source: &str) -> Option<Uuid> {
        self.store.post(subject, text, duration_secs, priority, source)
    }

    /// Posts the same hint to every currently live subject, best-effort.
    /// Returns the ids that were actually created.
    pub fn post_to_all(&self, text: &str, duration_secs: f32, priority: i32, source: &str) -> Vec<Uuid> {
        self.provider
            .subjects()
            .iter()
            .filter_map(|subject| self.post(subject, text, duration_secs, priority, source))
            .collect()
    }

    pub fn hide(&self, subject: &str, id: Uuid) -> bool {
        self.store.remove(subject, id)
    }

    pub fn hide_all(&self, subject: &str) -> usize {
        self.store.clear_all(subject)
    }

    pub fn hide_by_source(&self, subject: &str, source: &str) -> usize {
        self.store.clear_by_source(subject, source)
    }

    pub fn get_active(&self, subject: &str) -> Vec<HintRecord> {
        self.store.get_active(subject)
    }

    pub fn get_by_id(&self, subject: &str, id: Uuid) -> Option<HintRecord> {
        self.store.get_by_id(subject, id)
    }

    /// Whether the engine is constructed and reachable.
    pub fn is_available(&self) -> bool {
        // An Api always wraps a live store; kept for callers probing an
        // optionally-present engine through a shared handle.
        true
    }

    pub fn version(&self) -> &'static str {
        VERSION
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::registry::PooledHintRegistry;
    use crate::subjects::StaticSubjects;

    fn api() -> (HintApi, Arc<StaticSubjects>) {
        let provider = Arc::new(StaticSubjects::new(["alice", "bob", "carol"]));
        let store = Arc::new(PooledHintRegistry::default());
        (HintApi::new(store, provider.clone()), provider)
    }

    #[test]
    fn test_post_to_all_reaches_every_subject() {
        let (api, _provider) = api();
        let ids = api.post_to_all("announcement", 10.0, 1, "system");
        assert_eq!(ids.len(), 3);
        for subject in ["alice", "bob", "carol"] {
            assert_eq!(api.get_active(subject).len(), 1);
        }
    }

    #[test]
    fn test_hide_round_trip() {
        let (api, _provider) = api();
        let id = api.post("alice", "to hide", 10.0, 0, "t").unwrap();
        assert!(api.hide("alice", id));
        assert!(!api.hide("alice", id));
        assert!(api.get_by_id("alice", id).is_none());
    }

    #[test]
    fn test_invalid_post_is_rejected() {
        let (api, _provider) = api();
        assert!(api.post("alice", "", 10.0, 0, "t").is_none());
        assert!(api.post("alice", "x", 0.0, 0, "t").is_none());
        assert!(api.post("", "x", 10.0, 0, "t").is_none());
    }

    #[test]
    fn test_empty_source_gets_the_default_tag() {
        let (api, _provider) = api();
        let id = api.post("alice", "tagless", 10.0, 0, "").unwrap();
        assert_eq!(api.get_by_id("alice", id).unwrap().source, crate::hint::DEFAULT_SOURCE);
    }

    #[test]
    fn test_version_and_availability() {
        let (api, _provider) = api();
        assert!(api.is_available());
        assert!(!api.version().is_empty());
    }
}
