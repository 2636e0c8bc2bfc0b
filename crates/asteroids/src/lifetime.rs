//! Timed despawning

use std::time::Duration;

use log::trace;

use roid_engine::prelude::*;

use crate::components::Lifetime;

/// Destroys entities whose [`Lifetime`] has run out
#[derive(Debug, Default)]
pub struct LifetimeSystem {
    expired: Vec<Entity>,
}

impl LifetimeSystem {
    /// Create the system
    pub fn new() -> Self {
        Self::default()
    }

    /// Entities removed by the last update
    pub fn expired(&self) -> &[Entity] {
        &self.expired
    }
}

impl<R: Registry> System<R> for LifetimeSystem {
    fn update(&mut self, registry: &mut R, delta: Duration) {
        let dt = delta.as_secs_f32();
        self.expired.clear();

        let expired = &mut self.expired;
        registry.for_each_mut::<Lifetime, _>(|entity, lifetime| {
            lifetime.remaining -= dt;
            if lifetime.remaining <= 0.0 {
                expired.push(entity);
            }
        });

        for &entity in &self.expired {
            registry.destroy_entity(entity);
        }
        if !self.expired.is_empty() {
            trace!("Despawned {} expired entities", self.expired.len());
        }
    }

    fn name(&self) -> &'static str {
        "LifetimeSystem"
    }
}
