// src/tasks/mod.rs

//! Background task management for the hint engine.
//! Runs the maintenance sweep and triggers the periodic display refresh.

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::watch;
use tokio::task::JoinHandle;
use tracing::{debug, info};

use crate::display::{DisplayInterceptor, DisplaySink};
use crate::registry::HintStore;
use crate::subjects::SubjectProvider;

/// Drives the periodic sweep and display refresh.
///
/// The loop applies a fixed inter-tick delay after each tick completes, so
/// effective cadence is tick duration + delay. The stop signal takes effect
/// at the next tick boundary, never mid-tick.
pub struct SweepLoop {
    store: Arc<dyn HintStore>,
    provider: Arc<dyn SubjectProvider>,
    interceptor: Arc<DisplayInterceptor>,
    delay: Duration,
}

/// Handle returned by [`SweepLoop::spawn`]; dropping it does not stop the
/// loop, call [`SweepHandle::stop`].
pub struct SweepHandle {
    stop_tx: watch::Sender<bool>,
    handle: JoinHandle<()>,
}

impl SweepHandle {
    /// Signals the loop to stop at the next tick boundary and waits for it.
    pub async fn stop(self) {
        let _ = self.stop_tx.send(true);
        let _ = self.handle.await;
    }

    /// Hard abort, for teardown paths that cannot await.
    pub fn abort(self) {
        self.handle.abort();
    }
}

impl SweepLoop {
    pub fn new(
        store: Arc<dyn HintStore>,
        provider: Arc<dyn SubjectProvider>,
        interceptor: Arc<DisplayInterceptor>,
        delay: Duration,
    ) -> Self {
        Self {
            store,
            provider,
            interceptor,
            delay,
        }
    }

    /// One maintenance pass: expire stale records, drop dead subjects, prune
    /// their dedup state, then refresh displays for the survivors.
    pub fn tick(&self, sink: &dyn DisplaySink) {
        let report = self.store.sweep(self.provider.as_ref());
        for subject in &report.dropped_subjects {
            self.interceptor.gate().forget(subject);
        }
        if report.expired > 0 || !report.dropped_subjects.is_empty() {
            debug!(
                "Sweep: expired={} dropped_subjects={} remaining={}",
                report.expired,
                report.dropped_subjects.len(),
                report.remaining_subjects
            );
        }
        let forwarded = self.interceptor.refresh_all(self.provider.as_ref(), sink);
        if forwarded > 0 {
            debug!("Display refresh forwarded {} hints", forwarded);
        }
    }

    /// Spawns the loop as a tokio task.
    pub fn spawn(self, sink: Arc<dyn DisplaySink>) -> SweepHandle {
        let (stop_tx, stop_rx) = watch::channel(false);
        let delay = self.delay;
        info!("Sweep loop started (delay: {:?})", delay);

        let handle = tokio::spawn(async move {
            loop {
                if *stop_rx.borrow() {
                    info!("Sweep loop stopping");
                    break;
                }
                self.tick(sink.as_ref());
                tokio::time::sleep(delay).await;
            }
        });

        SweepHandle { stop_tx, handle }
    }
}
