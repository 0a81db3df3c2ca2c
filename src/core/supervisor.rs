//! # Supervisor: ordered startup, event loop, unconditional teardown.
//!
//! The [`Supervisor`] owns the actor catalog, the running-actor [`Registry`],
//! and the [`EventLoop`]. Its control flow is single-threaded and strictly
//! sequential; the only concurrency around it is the diagnostic monitor task
//! and whatever each opaque subsystem spawns internally.
//!
//! ## Run sequence
//! ```text
//! run(settings):
//!   ├─► settings.validate()            ── fatal, nothing started, Err out
//!   ├─► catalog.resolve(settings)      ── unknown identity = settings error
//!   ├─► DiagnosticMonitor::spawn()     ── before any subsystem
//!   ├─► SignalBridge::install()        ── before any subsystem
//!   ├─► startup:
//!   │     start audio                  ── any error is fatal for the run
//!   │     start backend (first entry)  ── any error is fatal for the run
//!   │     start frontends, in order    ── marker → info log, continue
//!   ├─► event loop (only if startup succeeded)
//!   │     blocks until SIGTERM/SIGINT or an explicit quit()
//!   └─► teardown, on EVERY path out of startup or the loop:
//!         quit event loop
//!         stop frontends, reverse order   (markers swallowed)
//!         stop backend
//!         stop audio
//!         sweep any instance still in the registry
//! ```
//!
//! ## Rules
//! - Start order audio → backend → frontends is a correctness contract:
//!   frontends assume the backend is reachable, the backend assumes audio is
//!   up. Teardown is the exact reverse plus the sweep.
//! - Teardown is unconditional and total: a failure at step N never skips
//!   the stop attempts for any other step. Stops on never-started
//!   identities are no-ops by the registry contract.
//! - Teardown is best-effort: a non-marker stop failure is logged at warn
//!   level and the sequence continues.
//! - No timeouts: a subsystem hanging in start/stop hangs the process.

use std::sync::Arc;

use tracing::{error, info, warn};

use crate::actors::{ActorCatalog, PlanEntry, StartPlan};
use crate::config::Settings;
use crate::core::event_loop::{EventLoop, LoopHandle};
use crate::core::monitor::DiagnosticMonitor;
use crate::core::registry::Registry;
use crate::core::signals::SignalBridge;
use crate::error::{ActorError, RuntimeError, SettingsError};

/// Orchestrates subsystem lifecycle for one run of the process.
pub struct Supervisor {
    catalog: ActorCatalog,
    registry: Arc<Registry>,
    event_loop: EventLoop,
}

impl Supervisor {
    /// Creates a supervisor over the given catalog.
    pub fn new(catalog: ActorCatalog) -> Self {
        Self {
            catalog,
            registry: Arc::new(Registry::new()),
            event_loop: EventLoop::new(),
        }
    }

    /// Handle for ending the run from elsewhere (tests, embedders).
    ///
    /// The signal bridge gets its own copy during `run`.
    pub fn loop_handle(&self) -> LoopHandle {
        self.event_loop.handle()
    }

    /// Runs the full lifecycle: resolve, start, block, tear down.
    ///
    /// Returns `Err` only for configuration problems, which are fatal before
    /// anything starts (the caller logs one line and exits non-zero). Every
    /// other failure — signal registration, startup, interruption — is
    /// handled internally: logged, followed by unconditional teardown, and
    /// the process exits 0.
    pub async fn run(&mut self, settings: &Settings) -> Result<(), SettingsError> {
        settings.validate()?;
        let plan = self.catalog.resolve(settings)?;

        let diag = DiagnosticMonitor::spawn(Arc::clone(&self.registry));
        let outcome = match SignalBridge::install(diag, self.event_loop.handle()) {
            Ok(()) => self.startup(&plan).await,
            Err(source) => Err(RuntimeError::Signals { source }),
        };

        match outcome {
            Ok(()) => {
                self.event_loop.run().await;
                info!("interrupted, exiting");
            }
            Err(err) => {
                error!(error = ?err, label = err.as_label(), "startup failed, shutting down");
            }
        }

        self.teardown(&plan).await;
        Ok(())
    }

    /// Starts audio, backend, and frontends in order.
    async fn startup(&self, plan: &StartPlan) -> Result<(), RuntimeError> {
        self.start(&plan.audio).await.map_err(|source| {
            RuntimeError::StartFailed {
                identity: plan.audio.id.as_str().to_string(),
                source,
            }
        })?;
        info!(actor = %plan.audio.id, "audio engine started");

        self.start(&plan.backend).await.map_err(|source| {
            RuntimeError::StartFailed {
                identity: plan.backend.id.as_str().to_string(),
                source,
            }
        })?;
        info!(actor = %plan.backend.id, "backend started");

        for frontend in &plan.frontends {
            match self.start(frontend).await {
                Ok(()) => info!(actor = %frontend.id, "frontend started"),
                Err(e) if e.is_optional() => {
                    info!(actor = %frontend.id, reason = %e, "frontend disabled");
                }
                Err(source) => {
                    return Err(RuntimeError::StartFailed {
                        identity: frontend.id.as_str().to_string(),
                        source,
                    });
                }
            }
        }
        Ok(())
    }

    /// Instantiates and starts one plan entry, registering it on success.
    async fn start(&self, entry: &PlanEntry) -> Result<(), ActorError> {
        let mut actor = (entry.factory)();
        actor.start().await?;
        self.registry.insert(entry.id.clone(), actor).await;
        Ok(())
    }

    /// The unconditional, total teardown sequence.
    async fn teardown(&self, plan: &StartPlan) {
        self.event_loop.quit();

        for frontend in plan.frontends.iter().rev() {
            match self.registry.stop(&frontend.id).await {
                Ok(()) => {}
                Err(e) if e.is_optional() => {}
                Err(e) => warn!(actor = %frontend.id, error = %e, "frontend stop failed, continuing"),
            }
        }
        self.stop_logged(&plan.backend).await;
        self.stop_logged(&plan.audio).await;
        self.sweep().await;
    }

    async fn stop_logged(&self, entry: &PlanEntry) {
        if let Err(e) = self.registry.stop(&entry.id).await {
            warn!(actor = %entry.id, error = %e, "stop failed, continuing");
        }
    }

    /// Safety net: stops anything still registered after the named steps.
    async fn sweep(&self) {
        for (id, mut actor) in self.registry.drain_all().await {
            warn!(actor = %id, "actor left behind after teardown, sweeping");
            match actor.stop().await {
                Ok(()) => {}
                Err(e) if e.is_optional() => {}
                Err(e) => warn!(actor = %id, error = %e, "sweep stop failed"),
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::actors::{Actor, ActorId, BoxedActor};
    use async_trait::async_trait;
    use std::sync::Mutex;
    use std::time::Duration;

    /// Shared call recorder for scripted actors.
    #[derive(Clone, Default)]
    struct CallLog(Arc<Mutex<Vec<String>>>);

    impl CallLog {
        fn push(&self, entry: impl Into<String>) {
            self.0.lock().unwrap().push(entry.into());
        }
        fn calls(&self) -> Vec<String> {
            self.0.lock().unwrap().clone()
        }
    }

    #[derive(Clone, Copy)]
    enum StartOutcome {
        Ok,
        Optional,
        Fail,
    }

    struct Scripted {
        name: String,
        outcome: StartOutcome,
        stop_fails: bool,
        log: CallLog,
    }

    #[async_trait]
    impl Actor for Scripted {
        fn name(&self) -> &str {
            &self.name
        }

        async fn start(&mut self) -> Result<(), ActorError> {
            self.log.push(format!("start {}", self.name));
            match self.outcome {
                StartOutcome::Ok => Ok(()),
                StartOutcome::Optional => Err(ActorError::optional("dependency missing")),
                StartOutcome::Fail => Err(ActorError::failed("refused")),
            }
        }

        async fn stop(&mut self) -> Result<(), ActorError> {
            self.log.push(format!("stop {}", self.name));
            if self.stop_fails {
                Err(ActorError::failed("stop refused"))
            } else {
                Ok(())
            }
        }
    }

    /// Builds a supervisor whose catalog records every call into `log`.
    fn rig(entries: &[(&str, StartOutcome)], log: &CallLog) -> Supervisor {
        let mut catalog = ActorCatalog::new();
        for (name, outcome) in entries {
            let name = name.to_string();
            let id = name.clone();
            let outcome = *outcome;
            let log = log.clone();
            catalog.register(id, move || {
                Box::new(Scripted {
                    name: name.clone(),
                    outcome,
                    stop_fails: false,
                    log: log.clone(),
                }) as BoxedActor
            });
        }
        Supervisor::new(catalog)
    }

    fn settings(frontends: &[&str]) -> Settings {
        Settings {
            audio: "audio".into(),
            backends: vec!["local".into()],
            frontends: frontends.iter().map(|s| s.to_string()).collect(),
        }
    }

    #[tokio::test]
    async fn start_and_stop_orders_are_symmetric() {
        let log = CallLog::default();
        let mut sup = rig(
            &[
                ("audio", StartOutcome::Ok),
                ("local", StartOutcome::Ok),
                ("one", StartOutcome::Ok),
                ("two", StartOutcome::Ok),
            ],
            &log,
        );
        // Pre-quit so the loop returns as soon as startup finishes.
        sup.loop_handle().quit();

        sup.run(&settings(&["one", "two"])).await.expect("runs");

        assert_eq!(
            log.calls(),
            [
                "start audio",
                "start local",
                "start one",
                "start two",
                "stop two",
                "stop one",
                "stop local",
                "stop audio",
            ]
        );
        assert!(sup.registry.is_empty().await);
    }

    #[tokio::test]
    async fn optional_frontend_is_skipped_and_startup_continues() {
        let log = CallLog::default();
        let mut sup = rig(
            &[
                ("audio", StartOutcome::Ok),
                ("local", StartOutcome::Ok),
                ("alpha", StartOutcome::Ok),
                ("beta", StartOutcome::Optional),
                ("gamma", StartOutcome::Ok),
            ],
            &log,
        );
        sup.loop_handle().quit();

        sup.run(&settings(&["alpha", "beta", "gamma"]))
            .await
            .expect("runs");

        // beta attempts to start, fails with the marker, and is treated as
        // absent ever after: no stop call, no abort, gamma still starts.
        assert_eq!(
            log.calls(),
            [
                "start audio",
                "start local",
                "start alpha",
                "start beta",
                "start gamma",
                "stop gamma",
                "stop alpha",
                "stop local",
                "stop audio",
            ]
        );
    }

    #[tokio::test]
    async fn backend_failure_skips_frontends_but_not_teardown() {
        let log = CallLog::default();
        let mut sup = rig(
            &[
                ("audio", StartOutcome::Ok),
                ("local", StartOutcome::Fail),
                ("one", StartOutcome::Ok),
            ],
            &log,
        );

        sup.run(&settings(&["one"])).await.expect("exit is clean");

        // Audio started and is stopped; the backend failed inside start so
        // it was never registered; the frontend was never attempted. All
        // teardown stops on absent identities are silent no-ops.
        assert_eq!(log.calls(), ["start audio", "start local", "stop audio"]);
        assert!(sup.registry.is_empty().await);
    }

    #[tokio::test]
    async fn audio_failure_tears_down_cleanly() {
        let log = CallLog::default();
        let mut sup = rig(
            &[
                ("audio", StartOutcome::Fail),
                ("local", StartOutcome::Ok),
                ("one", StartOutcome::Ok),
            ],
            &log,
        );

        sup.run(&settings(&["one"])).await.expect("exit is clean");
        assert_eq!(log.calls(), ["start audio"]);
    }

    #[tokio::test]
    async fn optional_audio_is_still_fatal() {
        // The marker only grants leniency to frontends.
        let log = CallLog::default();
        let mut sup = rig(
            &[
                ("audio", StartOutcome::Optional),
                ("local", StartOutcome::Ok),
            ],
            &log,
        );

        sup.run(&settings(&[])).await.expect("exit is clean");
        assert_eq!(log.calls(), ["start audio"]);
    }

    #[tokio::test]
    async fn unknown_identity_fails_before_anything_starts() {
        let log = CallLog::default();
        let mut sup = rig(
            &[("audio", StartOutcome::Ok), ("local", StartOutcome::Ok)],
            &log,
        );

        let err = sup
            .run(&settings(&["missing"]))
            .await
            .expect_err("settings error");
        assert!(matches!(err, SettingsError::UnknownActor { .. }));
        assert!(log.calls().is_empty());
    }

    #[tokio::test]
    async fn invalid_settings_fail_before_anything_starts() {
        let log = CallLog::default();
        let mut sup = rig(&[("audio", StartOutcome::Ok)], &log);

        let bad = Settings {
            audio: "audio".into(),
            backends: vec![],
            frontends: vec![],
        };
        let err = sup.run(&bad).await.expect_err("settings error");
        assert!(matches!(err, SettingsError::NoBackend));
        assert!(log.calls().is_empty());
    }

    #[tokio::test]
    async fn quit_while_blocked_runs_teardown_exactly_once() {
        let log = CallLog::default();
        let mut sup = rig(
            &[
                ("audio", StartOutcome::Ok),
                ("local", StartOutcome::Ok),
                ("one", StartOutcome::Ok),
            ],
            &log,
        );
        let handle = sup.loop_handle();

        let run = tokio::spawn(async move {
            sup.run(&settings(&["one"])).await.expect("runs");
            sup
        });
        // Let startup finish and the loop block, then request an exit the
        // same way the termination-signal handler does.
        tokio::time::sleep(Duration::from_millis(50)).await;
        handle.quit();

        let sup = tokio::time::timeout(Duration::from_secs(2), run)
            .await
            .expect("run returns")
            .expect("no panic");

        assert_eq!(
            log.calls(),
            [
                "start audio",
                "start local",
                "start one",
                "stop one",
                "stop local",
                "stop audio",
            ]
        );
        assert!(sup.registry.is_empty().await);
    }

    #[tokio::test]
    async fn failing_frontend_stop_does_not_abort_teardown() {
        let log = CallLog::default();
        let mut catalog = ActorCatalog::new();
        for (name, stop_fails) in [
            ("audio", false),
            ("local", false),
            ("one", false),
            ("two", true),
        ] {
            let log = log.clone();
            catalog.register(name, move || {
                Box::new(Scripted {
                    name: name.into(),
                    outcome: StartOutcome::Ok,
                    stop_fails,
                    log: log.clone(),
                }) as BoxedActor
            });
        }
        let mut sup = Supervisor::new(catalog);
        sup.loop_handle().quit();

        sup.run(&settings(&["one", "two"])).await.expect("runs");

        // "two" refuses to stop with a generic (non-marker) error; the
        // teardown logs it and still stops the remaining frontend, the
        // backend, and audio, in order.
        assert_eq!(
            log.calls(),
            [
                "start audio",
                "start local",
                "start one",
                "start two",
                "stop two",
                "stop one",
                "stop local",
                "stop audio",
            ]
        );
        assert!(sup.registry.is_empty().await);
    }

    #[tokio::test]
    async fn sweep_catches_instances_outside_the_plan() {
        let log = CallLog::default();
        let mut sup = rig(
            &[("audio", StartOutcome::Ok), ("local", StartOutcome::Ok)],
            &log,
        );
        sup.loop_handle().quit();

        // Simulate bookkeeping drift: an instance registered under an
        // identity the teardown steps never name.
        sup.registry
            .insert(
                ActorId::new("stray"),
                Box::new(Scripted {
                    name: "stray".into(),
                    outcome: StartOutcome::Ok,
                    stop_fails: false,
                    log: log.clone(),
                }) as BoxedActor,
            )
            .await;

        sup.run(&settings(&[])).await.expect("runs");

        let calls = log.calls();
        assert_eq!(calls.last().map(String::as_str), Some("stop stray"));
        assert!(sup.registry.is_empty().await);
    }
}
