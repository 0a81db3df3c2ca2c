//! # Actor abstraction: a startable/stoppable subsystem.
//!
//! This module defines the [`Actor`] trait implemented by every subsystem the
//! supervisor manages (the audio engine, the backend, frontends) and
//! [`ActorId`], the identity used to look subsystems up in settings, catalog,
//! and registry.
//!
//! The supervisor treats `start`/`stop` as synchronous steps: it awaits each
//! call to completion before moving on, and it never imposes a timeout. A
//! subsystem that hangs in `start` or `stop` hangs the whole process; keeping
//! those calls prompt is part of the actor contract.

use std::fmt;
use std::sync::Arc;

use async_trait::async_trait;

use crate::error::ActorError;

/// Identity of a subsystem, as written in the settings file.
///
/// Cheap to clone; used as the key in the catalog and the running-actor
/// registry.
#[derive(Clone, PartialEq, Eq, Hash, Debug)]
pub struct ActorId(Arc<str>);

impl ActorId {
    /// Creates an identity from any string-like value.
    pub fn new(id: impl AsRef<str>) -> Self {
        ActorId(Arc::from(id.as_ref()))
    }

    /// Returns the identity as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ActorId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for ActorId {
    fn from(s: &str) -> Self {
        ActorId::new(s)
    }
}

impl From<String> for ActorId {
    fn from(s: String) -> Self {
        ActorId::new(s)
    }
}

/// # A startable/stoppable unit of long-running work.
///
/// Actors are opaque to the supervisor: whatever concurrency they need is
/// spawned inside `start` and reaped inside `stop`. The supervisor only
/// guarantees ordering (audio → backend → frontends, reversed on teardown)
/// and that `stop` is attempted on every exit path.
///
/// # Example
/// ```
/// use async_trait::async_trait;
/// use audiovisor::{Actor, ActorError};
///
/// struct Heartbeat;
///
/// #[async_trait]
/// impl Actor for Heartbeat {
///     fn name(&self) -> &str { "heartbeat" }
///
///     async fn start(&mut self) -> Result<(), ActorError> {
///         // spawn internal workers...
///         Ok(())
///     }
///
///     async fn stop(&mut self) -> Result<(), ActorError> {
///         // join internal workers...
///         Ok(())
///     }
/// }
/// ```
#[async_trait]
pub trait Actor: Send + Sync + 'static {
    /// Stable, human-readable subsystem name.
    fn name(&self) -> &str;

    /// Brings the subsystem up. Called at most once per instance.
    ///
    /// Returning [`ActorError::OptionalDependency`] from a frontend means
    /// "run without me"; from audio or the backend it is fatal like any
    /// other error.
    async fn start(&mut self) -> Result<(), ActorError>;

    /// Halts the subsystem. Must be safe to call after a failed `start`.
    async fn stop(&mut self) -> Result<(), ActorError>;

    /// One line of live state for the diagnostic dump.
    fn describe(&self) -> String {
        format!("{} (running)", self.name())
    }
}

/// Owned handle to a running actor instance.
pub type BoxedActor = Box<dyn Actor>;
