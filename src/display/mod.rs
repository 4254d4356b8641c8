// src/display/mod.rs

//! Display-side glue: winner selection, dedup, and the interception point
//! where an external rendering call gets its text/duration substituted.
//!
//! A failure inside the sink is caught here, logged, and the pass-through
//! path is taken; one subject's broken display never blocks the others.

mod dedup;
mod select;

pub use dedup::DisplayGate;
pub use select::select_top;

use std::sync::Arc;

use thiserror::Error;
use tracing::error;

use crate::registry::HintStore;
use crate::subjects::SubjectProvider;

/// Minimum duration forwarded to the external display call, in seconds.
const MIN_DISPLAY_SECS: f32 = 1.0;

#[derive(Debug, Error)]
pub enum DisplayError {
    #[error("display sink unavailable for subject {0}")]
    Unavailable(String),
    #[error("display call failed: {0}")]
    Failed(String),
}

/// The external rendering call, keyed by subject.
pub trait DisplaySink: Send + Sync {
    fn show(&self, subject: &str, text: &str, duration_secs: f32) -> Result<(), DisplayError>;
}

/// What the interception point should do with an in-flight display call.
#[derive(Debug, Clone, PartialEq)]
pub enum DisplayOutcome {
    /// Substitute the winning hint's text and duration.
    Replace { text: String, duration_secs: f32 },
    /// The winner is unchanged since the last cycle; skip the call.
    Suppress,
    /// Nothing to contribute; let the original values through unmodified.
    PassThrough,
}

/// Consults the store and the dedup gate on behalf of the display call-site.
pub struct DisplayInterceptor {
    store: Arc<dyn HintStore>,
    gate: Arc<DisplayGate>,
}

impl DisplayInterceptor {
    pub fn new(store: Arc<dyn HintStore>, gate: Arc<DisplayGate>) -> Self {
        Self { store, gate }
    }

    pub fn gate(&self) -> Arc<DisplayGate> {
        self.gate.clone()
    }

    /// Called synchronously at the moment an external display call fires.
    pub fn resolve(&self, subject: &str) -> DisplayOutcome {
        let active = self.store.get_active(subject);
        let winner = select_top(&active);
        match winner {
            None => DisplayOutcome::PassThrough,
            Some(hint) => {
                if self.gate.should_display(subject, Some(hint)) {
                    DisplayOutcome::Replace {
                        text: hint.text.clone(),
                        duration_secs: hint.duration_secs.max(MIN_DISPLAY_SECS),
                    }
                } else {
                    DisplayOutcome::Suppress
                }
            }
        }
    }

    /// Periodic refresh: pushes the current winner for each live subject
    /// that has one, once per winner change. Sink faults are logged and the
    /// remaining subjects still get their refresh.
    pub fn refresh_all(&self, provider: &dyn SubjectProvider, sink: &dyn DisplaySink) -> usize {
        let mut forwarded = 0;
        for subject in provider.subjects() {
            let active = self.store.get_active(&subject);
            let winner = select_top(&active);
            if !self.gate.should_display(&subject, winner) {
                continue;
            }
            // should_display only returns true with a candidate present
            let Some(hint) = winner else { continue };
            match sink.show(&subject, &hint.text, hint.duration_secs.max(MIN_DISPLAY_SECS)) {
                Ok(()) => forwarded += 1,
                Err(e) => {
                    error!("Display refresh failed for subject {}: {}", subject, e);
                }
            }
        }
        forwarded
    }
}
