//! ECS World implementation

use std::any::TypeId;
use std::collections::HashMap;

use slotmap::SlotMap;

use super::storage::AnyStorage;
use super::{Component, ComponentStorage, EcsError, Entity, Registry};

/// ECS World containing all entities and components
pub struct World {
    entities: SlotMap<Entity, ()>,
    storages: HashMap<TypeId, Box<dyn AnyStorage>>,
}

impl World {
    /// Create a new world
    pub fn new() -> Self {
        Self {
            entities: SlotMap::with_key(),
            storages: HashMap::new(),
        }
    }

    /// Number of live entities
    pub fn entity_count(&self) -> usize {
        self.entities.len()
    }

    /// Iterate over all live entities
    pub fn entities(&self) -> impl Iterator<Item = Entity> + '_ {
        self.entities.keys()
    }

    /// Typed storage for `T`, if any component of that type was ever attached
    pub fn storage<T: Component>(&self) -> Option<&ComponentStorage<T>> {
        self.storages
            .get(&TypeId::of::<T>())?
            .as_any()
            .downcast_ref::<ComponentStorage<T>>()
    }

    fn storage_mut<T: Component>(&mut self) -> Option<&mut ComponentStorage<T>> {
        self.storages
            .get_mut(&TypeId::of::<T>())?
            .as_any_mut()
            .downcast_mut::<ComponentStorage<T>>()
    }

    fn storage_or_default<T: Component>(&mut self) -> &mut ComponentStorage<T> {
        self.storages
            .entry(TypeId::of::<T>())
            .or_insert_with(|| Box::new(ComponentStorage::<T>::new()))
            .as_any_mut()
            .downcast_mut::<ComponentStorage<T>>()
            .expect("storage is keyed by its own TypeId")
    }

    /// Destroy every entity and component
    pub fn clear(&mut self) {
        self.entities.clear();
        self.storages.clear();
    }
}

impl Default for World {
    fn default() -> Self {
        Self::new()
    }
}

impl Registry for World {
    fn create_entity(&mut self) -> Entity {
        self.entities.insert(())
    }

    fn destroy_entity(&mut self, entity: Entity) -> bool {
        if self.entities.remove(entity).is_none() {
            return false;
        }
        for storage in self.storages.values_mut() {
            storage.remove_entity(entity);
        }
        true
    }

    fn is_alive(&self, entity: Entity) -> bool {
        self.entities.contains_key(entity)
    }

    fn insert<T: Component>(&mut self, entity: Entity, component: T) -> Result<Option<T>, EcsError> {
        if !self.is_alive(entity) {
            return Err(EcsError::DeadEntity(entity));
        }
        Ok(self.storage_or_default::<T>().insert(entity, component))
    }

    fn remove<T: Component>(&mut self, entity: Entity) -> Option<T> {
        self.storage_mut::<T>()?.remove(entity)
    }

    fn get<T: Component>(&self, entity: Entity) -> Option<&T> {
        self.storage::<T>()?.get(entity)
    }

    fn get_mut<T: Component>(&mut self, entity: Entity) -> Option<&mut T> {
        self.storage_mut::<T>()?.get_mut(entity)
    }

    fn get_pair_mut<T: Component>(&mut self, a: Entity, b: Entity) -> Option<(&mut T, &mut T)> {
        self.storage_mut::<T>()?.get_pair_mut(a, b)
    }

    fn view<T: Component>(&self) -> Vec<Entity> {
        self.storage::<T>()
            .map(|storage| storage.entities().to_vec())
            .unwrap_or_default()
    }

    fn for_each_mut<T: Component, F: FnMut(Entity, &mut T)>(&mut self, mut f: F) {
        if let Some(storage) = self.storage_mut::<T>() {
            for (entity, component) in storage.iter_mut() {
                f(entity, component);
            }
        }
    }
}
