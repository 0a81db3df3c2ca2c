//! # Actor catalog: identity → factory resolution.
//!
//! The catalog replaces dynamic class lookup with an explicit registration
//! table: embedders register a factory per identity before the supervisor
//! runs, and [`ActorCatalog::resolve`] turns validated settings into a
//! [`StartPlan`]. An identity with no registered factory resolves to
//! [`SettingsError::UnknownActor`], which is a configuration error and fatal
//! before anything starts.
//!
//! ## Rules
//! - Resolution happens once, up front; the start plan is immutable after.
//! - Only the **first** configured backend is ever used.
//! - Frontends keep their configured order in the plan.

use std::collections::HashMap;
use std::sync::Arc;

use crate::actors::actor::{ActorId, BoxedActor};
use crate::config::Settings;
use crate::error::SettingsError;

/// Factory producing a fresh, not-yet-started actor instance.
pub type ActorFactory = Arc<dyn Fn() -> BoxedActor + Send + Sync>;

/// One resolved entry of the start plan.
#[derive(Clone)]
pub struct PlanEntry {
    /// The configured identity.
    pub id: ActorId,
    /// Factory for the actor behind it.
    pub factory: ActorFactory,
}

/// Resolved start order: audio, then backend, then frontends.
#[derive(Clone)]
pub struct StartPlan {
    /// The audio engine (implicit, singular).
    pub audio: PlanEntry,
    /// The backend (first configured entry only).
    pub backend: PlanEntry,
    /// Frontends, in configured order. May be empty.
    pub frontends: Vec<PlanEntry>,
}

impl std::fmt::Debug for PlanEntry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PlanEntry").field("id", &self.id).finish_non_exhaustive()
    }
}

impl std::fmt::Debug for StartPlan {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("StartPlan")
            .field("audio", &self.audio)
            .field("backend", &self.backend)
            .field("frontends", &self.frontends)
            .finish()
    }
}

/// Registration table mapping identities to actor factories.
#[derive(Default)]
pub struct ActorCatalog {
    factories: HashMap<ActorId, ActorFactory>,
}

impl ActorCatalog {
    /// Creates an empty catalog.
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a factory under `id`, replacing any previous registration.
    pub fn register<F>(&mut self, id: impl Into<ActorId>, factory: F)
    where
        F: Fn() -> BoxedActor + Send + Sync + 'static,
    {
        self.factories.insert(id.into(), Arc::new(factory));
    }

    /// Returns true if `id` has a registered factory.
    pub fn contains(&self, id: &ActorId) -> bool {
        self.factories.contains_key(id)
    }

    /// Resolves validated settings into a start plan.
    ///
    /// Expects `settings.validate()` to have passed; still returns
    /// [`SettingsError::NoBackend`] defensively if the backend list is empty.
    pub fn resolve(&self, settings: &Settings) -> Result<StartPlan, SettingsError> {
        let audio = self.entry(&ActorId::new(&settings.audio))?;
        let backend_id = settings.backends.first().ok_or(SettingsError::NoBackend)?;
        let backend = self.entry(&ActorId::new(backend_id))?;

        let mut frontends = Vec::with_capacity(settings.frontends.len());
        for name in &settings.frontends {
            frontends.push(self.entry(&ActorId::new(name))?);
        }

        Ok(StartPlan {
            audio,
            backend,
            frontends,
        })
    }

    fn entry(&self, id: &ActorId) -> Result<PlanEntry, SettingsError> {
        match self.factories.get(id) {
            Some(factory) => Ok(PlanEntry {
                id: id.clone(),
                factory: Arc::clone(factory),
            }),
            None => Err(SettingsError::UnknownActor {
                identity: id.as_str().to_string(),
            }),
        }
    }
}
