//! # Running-actor registry.
//!
//! [`Registry`] is the only mutable state shared between the supervisor's
//! control flow and the teardown path: a map from subsystem identity to its
//! live instances. Populated by start, drained by stop.
//!
//! ## Rules
//! - An identity with no started instance is absent from the map.
//! - Stopping an absent identity is an Ok no-op, never an error.
//! - Writes happen only from the supervisor's control flow; the diagnostic
//!   monitor takes read-only snapshots and must not mutate.

use std::collections::HashMap;

use tokio::sync::RwLock;

use crate::actors::{ActorId, BoxedActor};
use crate::error::ActorError;

/// Read-only view of one live instance, for the diagnostic dump.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RegistryEntry {
    /// Identity the instance was started under.
    pub id: ActorId,
    /// The instance's own one-line state description.
    pub detail: String,
}

/// Process-wide table of running actor instances, keyed by identity.
#[derive(Default)]
pub struct Registry {
    actors: RwLock<HashMap<ActorId, Vec<BoxedActor>>>,
}

impl Registry {
    /// Creates an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Records a started instance under `id`.
    pub async fn insert(&self, id: ActorId, actor: BoxedActor) {
        let mut actors = self.actors.write().await;
        actors.entry(id).or_default().push(actor);
    }

    /// Number of live instances across all identities.
    pub async fn len(&self) -> usize {
        self.actors.read().await.values().map(Vec::len).sum()
    }

    /// Returns true if nothing is running.
    pub async fn is_empty(&self) -> bool {
        self.actors.read().await.is_empty()
    }

    /// Stops and removes every instance registered under `id`.
    ///
    /// Absent identity → `Ok(())`, no observable effect. With several
    /// instances, all of them are stopped even if one fails; the first
    /// error is returned after the rest have been attempted.
    pub async fn stop(&self, id: &ActorId) -> Result<(), ActorError> {
        let instances = {
            let mut actors = self.actors.write().await;
            actors.remove(id)
        };
        let Some(instances) = instances else {
            return Ok(());
        };

        let mut first_err = None;
        for mut actor in instances {
            if let Err(e) = actor.stop().await {
                first_err.get_or_insert(e);
            }
        }
        match first_err {
            Some(e) => Err(e),
            None => Ok(()),
        }
    }

    /// Removes and returns every remaining instance, for the final sweep.
    pub async fn drain_all(&self) -> Vec<(ActorId, BoxedActor)> {
        let mut actors = self.actors.write().await;
        actors
            .drain()
            .flat_map(|(id, instances)| {
                instances
                    .into_iter()
                    .map(move |actor| (id.clone(), actor))
                    .collect::<Vec<_>>()
            })
            .collect()
    }

    /// Read-only snapshot of live instances, for the diagnostic monitor.
    pub async fn snapshot(&self) -> Vec<RegistryEntry> {
        let actors = self.actors.read().await;
        let mut entries: Vec<RegistryEntry> = actors
            .iter()
            .flat_map(|(id, instances)| {
                instances.iter().map(|actor| RegistryEntry {
                    id: id.clone(),
                    detail: actor.describe(),
                })
            })
            .collect();
        entries.sort_by(|a, b| a.id.as_str().cmp(b.id.as_str()));
        entries
    }
}
