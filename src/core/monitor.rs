//! # Diagnostic monitor: on-demand state dumps of running actors.
//!
//! [`DiagnosticMonitor::spawn`] starts a background task for the process
//! lifetime, parked on a [`Notify`]. Each trigger (normally SIGUSR1 via the
//! signal bridge) takes a read-only snapshot of the running-actor registry
//! and writes one human-readable line per live instance to the log.
//!
//! ## Rules
//! - Read-only: triggering never mutates the registry or the event loop.
//! - Safe at any point, any number of times; rapid triggers may coalesce.
//! - Never lets an error escape into the supervisor's flow.
//! - Not part of teardown; the task dies with the process.

use std::sync::Arc;

use tokio::sync::Notify;
use tracing::info;

use crate::core::registry::Registry;

/// Cloneable trigger for the monitor, handed to the signal bridge.
#[derive(Clone, Debug)]
pub struct DiagnosticHandle {
    wakeup: Arc<Notify>,
}

impl DiagnosticHandle {
    /// Requests a state dump. Non-blocking; safe from any task.
    pub fn trigger(&self) {
        self.wakeup.notify_one();
    }
}

/// Background watcher dumping live actor state on demand.
pub struct DiagnosticMonitor;

impl DiagnosticMonitor {
    /// Spawns the monitor task and returns its trigger handle.
    ///
    /// Called by the supervisor before any subsystem starts.
    pub fn spawn(registry: Arc<Registry>) -> DiagnosticHandle {
        let wakeup = Arc::new(Notify::new());
        let handle = DiagnosticHandle {
            wakeup: Arc::clone(&wakeup),
        };

        tokio::spawn(async move {
            loop {
                wakeup.notified().await;
                dump(&registry).await;
            }
        });

        handle
    }
}

async fn dump(registry: &Registry) {
    let entries = registry.snapshot().await;
    info!(live = entries.len(), "diagnostic dump of running actors");
    for entry in entries {
        info!(actor = %entry.id, state = %entry.detail, "  running");
    }
}
