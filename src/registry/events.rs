// src/registry/events.rs

//! Lifecycle event fan-out for hint registries.
//!
//! Delivery is synchronous, in-process, at-most-once per event per observer.
//! Observers are invoked outside any per-subject lock, so a slow observer
//! cannot stall mutations on other subjects.

use std::sync::Arc;

use parking_lot::RwLock;

use crate::hint::{HintRecord, SubjectId};

/// What happened to a hint.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HintEventKind {
    Added,
    Removed,
    Expired,
}

/// A lifecycle event carrying a snapshot of the affected record.
#[derive(Debug, Clone)]
pub struct HintEvent {
    pub kind: HintEventKind,
    pub subject: SubjectId,
    pub record: HintRecord,
}

/// Receives registry lifecycle events.
pub trait HintObserver: Send + Sync {
    fn on_event(&self, event: &HintEvent);
}

/// Registration list for observers.
#[derive(Default)]
pub struct ObserverSet {
    observers: RwLock<Vec<Arc<dyn HintObserver>>>,
}

impl ObserverSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn subscribe(&self, observer: Arc<dyn HintObserver>) {
        self.observers.write().push(observer);
    }

    pub fn emit(&self, kind: HintEventKind, subject: &str, record: &HintRecord) {
        let observers = self.observers.read();
        if observers.is_empty() {
            return;
        }
        let event = HintEvent {
            kind,
            subject: subject.to_string(),
            record: record.clone(),
        };
        for observer in observers.iter() {
            observer.on_event(&event);
        }
    }

    pub fn len(&self) -> usize {
        self.observers.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.observers.read().is_empty()
    }
}
