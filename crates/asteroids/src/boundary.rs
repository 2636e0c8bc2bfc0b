//! Arena bounds

use roid_engine::prelude::*;

use crate::components::Boundary;
use crate::GameError;

/// Bounciness of the arena wall
pub const BOUNDARY_RESTITUTION: f32 = 0.5;

/// Spawn the static containment sphere centred on the origin
pub fn spawn_boundary<R: Registry>(world: &mut R, radius: f32) -> Result<Entity, GameError> {
    let entity = world.create_entity();
    world.insert(entity, Rigidbody::new_static())?;
    world.insert(
        entity,
        Collider::new(Shape::inverse_sphere(radius))
            .with_restitution(BOUNDARY_RESTITUTION)
            .with_layers(CollisionLayers::BOUNDARY, CollisionLayers::ALL),
    )?;
    world.insert(entity, Boundary)?;
    Ok(entity)
}
