//! Registry contract
//!
//! The minimal interface the physics core needs from an entity/component
//! store: create and destroy handles, attach typed components, and iterate
//! the entities that carry a given component set.

use thiserror::Error;

use super::{Component, Entity};

/// Errors raised by registry operations
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum EcsError {
    /// The handle refers to a destroyed (or never created) entity
    #[error("entity {0:?} is not alive")]
    DeadEntity(Entity),
}

/// A queryable store of entity/component associations
pub trait Registry {
    /// Create a new entity with no components
    fn create_entity(&mut self) -> Entity;

    /// Destroy an entity and all its components. Returns false if it was not alive.
    fn destroy_entity(&mut self, entity: Entity) -> bool;

    /// True if the handle refers to a live entity
    fn is_alive(&self, entity: Entity) -> bool;

    /// Attach a component, returning the one it replaced
    fn insert<T: Component>(&mut self, entity: Entity, component: T) -> Result<Option<T>, EcsError>;

    /// Detach a component
    fn remove<T: Component>(&mut self, entity: Entity) -> Option<T>;

    /// Borrow a component
    fn get<T: Component>(&self, entity: Entity) -> Option<&T>;

    /// Mutably borrow a component
    fn get_mut<T: Component>(&mut self, entity: Entity) -> Option<&mut T>;

    /// Mutably borrow the same component type on two distinct entities
    fn get_pair_mut<T: Component>(&mut self, a: Entity, b: Entity) -> Option<(&mut T, &mut T)>;

    /// Entities that have a `T`
    fn view<T: Component>(&self) -> Vec<Entity>;

    /// Visit every `T` mutably
    fn for_each_mut<T: Component, F: FnMut(Entity, &mut T)>(&mut self, f: F);

    /// True if `entity` has a `T`
    fn has<T: Component>(&self, entity: Entity) -> bool {
        self.get::<T>(entity).is_some()
    }

    /// Entities that have both an `A` and a `B`
    fn view2<A: Component, B: Component>(&self) -> Vec<Entity> {
        self.view::<A>()
            .into_iter()
            .filter(|&entity| self.has::<B>(entity))
            .collect()
    }
}
