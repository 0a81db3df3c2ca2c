//! # audiovisor
//!
//! **Audiovisor** is a process-level lifecycle supervisor for a long-running
//! audio service composed of independently-runnable subsystems: an audio
//! engine, a backend, and zero or more frontends.
//!
//! It brings subsystems up in a fixed dependency order, blocks on an event
//! loop until interrupted, and guarantees an orderly, fault-tolerant
//! teardown no matter how startup or the run failed. Subsystem internals are
//! opaque to it: an actor is anything with `start`/`stop` semantics.
//!
//! ## Architecture
//! ```text
//!   Settings ──► ActorCatalog::resolve ──► StartPlan
//!                                              │
//!                                              ▼
//! ┌───────────────────────────────────────────────────────────────┐
//! │  Supervisor (single-threaded control flow)                    │
//! │  - starts audio → backend → frontends (in configured order)   │
//! │  - registers live instances in the Registry                   │
//! │  - blocks on the EventLoop                                    │
//! │  - on ANY exit path: stops frontends (reversed) → backend     │
//! │    → audio, then sweeps whatever is left in the Registry      │
//! └──────┬──────────────────────────────┬─────────────────────────┘
//!        │                              │ read-only snapshots
//!        ▼                              ▼
//! ┌──────────────┐   SIGUSR1   ┌───────────────────┐
//! │ SignalBridge │ ──────────► │ DiagnosticMonitor │──► log dump
//! │ (one task)   │             │ (background task) │
//! └──────┬───────┘             └───────────────────┘
//!        │ SIGTERM / SIGINT / Ctrl-C
//!        ▼
//!   LoopHandle::quit()  ──►  EventLoop unblocks  ──►  teardown
//! ```
//!
//! ## Rules
//! - Start order is a correctness contract, not an optimization: frontends
//!   assume the backend is reachable, the backend assumes audio is up.
//! - Stopping an identity that never started is always an Ok no-op.
//! - A frontend failing to start with [`ActorError::OptionalDependency`] is
//!   treated as absent, not failed: startup continues degraded and its
//!   teardown is swallowed too.
//! - Signal handlers never do real work: they only trigger the monitor or
//!   cancel the event loop.
//!
//! ## Example
//! ```no_run
//! use async_trait::async_trait;
//! use audiovisor::{Actor, ActorCatalog, ActorError, BoxedActor, Settings, Supervisor};
//!
//! struct Silence;
//!
//! #[async_trait]
//! impl Actor for Silence {
//!     fn name(&self) -> &str { "silence" }
//!     async fn start(&mut self) -> Result<(), ActorError> { Ok(()) }
//!     async fn stop(&mut self) -> Result<(), ActorError> { Ok(()) }
//! }
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let mut catalog = ActorCatalog::new();
//!     catalog.register("audio", || Box::new(Silence) as BoxedActor);
//!     catalog.register("local", || Box::new(Silence) as BoxedActor);
//!
//!     let settings = Settings {
//!         audio: "audio".into(),
//!         backends: vec!["local".into()],
//!         frontends: vec![],
//!     };
//!
//!     // Blocks until SIGTERM/SIGINT, then tears everything down.
//!     let mut supervisor = Supervisor::new(catalog);
//!     supervisor.run(&settings).await?;
//!     Ok(())
//! }
//! ```

mod actors;
mod config;
mod core;
mod error;

// ---- Public re-exports ----

pub use actors::{Actor, ActorCatalog, ActorFactory, ActorId, BoxedActor, PlanEntry, StartPlan};
pub use config::Settings;
pub use self::core::{
    DiagnosticHandle, DiagnosticMonitor, EventLoop, LoopHandle, Registry, RegistryEntry,
    SignalBridge, Supervisor,
};
pub use error::{ActorError, RuntimeError, SettingsError};
