//! Actor abstraction and identity resolution.

mod actor;
mod catalog;

pub use actor::{Actor, ActorId, BoxedActor};
pub use catalog::{ActorCatalog, ActorFactory, PlanEntry, StartPlan};
