//! Sparse-set component storage
//!
//! Components of one type live densely packed in a `Vec`, with a
//! `SecondaryMap` from entity handle to dense index. Removal swaps the last
//! element into the hole so the dense array never has gaps.

use std::any::Any;

use slotmap::SecondaryMap;

use super::{Component, Entity};

/// Dense storage for a single component type
pub struct ComponentStorage<T> {
    dense: Vec<T>,
    owners: Vec<Entity>,
    sparse: SecondaryMap<Entity, usize>,
}

impl<T> ComponentStorage<T> {
    /// Create an empty storage
    pub fn new() -> Self {
        Self {
            dense: Vec::new(),
            owners: Vec::new(),
            sparse: SecondaryMap::new(),
        }
    }

    /// Number of stored components
    pub fn len(&self) -> usize {
        self.dense.len()
    }

    /// True if no components are stored
    pub fn is_empty(&self) -> bool {
        self.dense.is_empty()
    }

    /// True if `entity` has a component in this storage
    pub fn contains(&self, entity: Entity) -> bool {
        self.sparse.contains_key(entity)
    }

    /// Insert or replace the component for `entity`, returning the old one
    pub fn insert(&mut self, entity: Entity, component: T) -> Option<T> {
        if let Some(&index) = self.sparse.get(entity) {
            return Some(std::mem::replace(&mut self.dense[index], component));
        }

        self.sparse.insert(entity, self.dense.len());
        self.dense.push(component);
        self.owners.push(entity);
        None
    }

    /// Remove the component for `entity`
    pub fn remove(&mut self, entity: Entity) -> Option<T> {
        let index = self.sparse.remove(entity)?;
        let component = self.dense.swap_remove(index);
        self.owners.swap_remove(index);

        // The former last element now sits at `index`.
        if let Some(&moved) = self.owners.get(index) {
            self.sparse.insert(moved, index);
        }

        Some(component)
    }

    /// Borrow the component for `entity`
    pub fn get(&self, entity: Entity) -> Option<&T> {
        let index = *self.sparse.get(entity)?;
        self.dense.get(index)
    }

    /// Mutably borrow the component for `entity`
    pub fn get_mut(&mut self, entity: Entity) -> Option<&mut T> {
        let index = *self.sparse.get(entity)?;
        self.dense.get_mut(index)
    }

    /// Mutably borrow the components of two distinct entities at once.
    ///
    /// Returns `None` if either entity is missing or both handles are equal.
    pub fn get_pair_mut(&mut self, a: Entity, b: Entity) -> Option<(&mut T, &mut T)> {
        if a == b {
            return None;
        }

        let i = *self.sparse.get(a)?;
        let j = *self.sparse.get(b)?;

        if i < j {
            let (low, high) = self.dense.split_at_mut(j);
            Some((&mut low[i], &mut high[0]))
        } else {
            let (low, high) = self.dense.split_at_mut(i);
            Some((&mut high[0], &mut low[j]))
        }
    }

    /// Entities owning a component, in dense order
    pub fn entities(&self) -> &[Entity] {
        &self.owners
    }

    /// Iterate over `(entity, component)` pairs
    pub fn iter(&self) -> impl Iterator<Item = (Entity, &T)> {
        self.owners.iter().copied().zip(self.dense.iter())
    }

    /// Iterate mutably over `(entity, component)` pairs
    pub fn iter_mut(&mut self) -> impl Iterator<Item = (Entity, &mut T)> {
        self.owners.iter().copied().zip(self.dense.iter_mut())
    }
}

impl<T> Default for ComponentStorage<T> {
    fn default() -> Self {
        Self::new()
    }
}

/// Type-erased view of a storage, so the world can drop an entity's
/// components without knowing their types
pub(crate) trait AnyStorage: Send + Sync {
    fn remove_entity(&mut self, entity: Entity);
    fn as_any(&self) -> &dyn Any;
    fn as_any_mut(&mut self) -> &mut dyn Any;
}

impl<T: Component> AnyStorage for ComponentStorage<T> {
    fn remove_entity(&mut self, entity: Entity) {
        self.remove(entity);
    }

    fn as_any(&self) -> &dyn Any {
        self
    }

    fn as_any_mut(&mut self) -> &mut dyn Any {
        self
    }
}
