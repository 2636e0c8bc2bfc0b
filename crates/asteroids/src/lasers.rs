//! Laser bolts

use roid_engine::prelude::*;

use crate::components::{Laser, Lifetime, Player};
use crate::config::GameplayConfig;
use crate::player::{forward, SHIP_RADIUS};
use crate::GameError;

/// Bolt collision radius
pub const LASER_RADIUS: f32 = 0.2;

/// Bolt mass
pub const LASER_MASS: f32 = 0.1;

/// Fire a bolt from the ship's nose if the gun has cooled down.
///
/// Returns the new bolt, or `None` while the cooldown is still running.
pub fn fire<R: Registry>(world: &mut R, ship: Entity, gameplay: &GameplayConfig) -> Result<Option<Entity>, GameError> {
    {
        let player = world
            .get_mut::<Player>(ship)
            .ok_or_else(|| GameError::missing(ship, "Player"))?;
        if player.fire_cooldown > 0.0 {
            return Ok(None);
        }
        let rapid = player.rapid_fire_for > 0.0;
        player.fire_cooldown = if rapid { gameplay.fire_cooldown * 0.5 } else { gameplay.fire_cooldown };
    }

    let (origin, velocity) = {
        let body = world
            .get::<Rigidbody>(ship)
            .ok_or_else(|| GameError::missing(ship, "Rigidbody"))?;
        let nose = forward(body);
        (
            body.position() + nose * (SHIP_RADIUS + LASER_RADIUS + 0.1),
            body.velocity() + nose * gameplay.laser_speed,
        )
    };

    spawn_laser(world, origin, velocity, gameplay.laser_lifetime).map(Some)
}

/// Spawn a bolt with an explicit position and velocity
pub fn spawn_laser<R: Registry>(world: &mut R, position: Vec3, velocity: Vec3, lifetime: f32) -> Result<Entity, GameError> {
    let mut body = Rigidbody::new(LASER_MASS)
        .with_position(position)
        .with_velocity(velocity);
    body.set_linear_factor(Vec3::new(1.0, 0.0, 1.0));
    body.set_angular_factor(Vec3::zeros());

    let entity = world.create_entity();
    world.insert(entity, body)?;
    world.insert(
        entity,
        Collider::new(Shape::sphere(LASER_RADIUS)).with_layers(CollisionLayers::LASER, CollisionLayers::ASTEROID),
    )?;
    world.insert(entity, Laser { damage: 1 })?;
    world.insert(entity, Lifetime::new(lifetime))?;
    Ok(entity)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::player::spawn_player;
    use approx::assert_relative_eq;

    #[test]
    fn test_fire_respects_cooldown() {
        let mut world = World::new();
        let config = GameplayConfig::default();
        let ship = spawn_player(&mut world, &config).unwrap();

        assert!(fire(&mut world, ship, &config).unwrap().is_some());
        assert!(fire(&mut world, ship, &config).unwrap().is_none());

        world.get_mut::<Player>(ship).unwrap().tick(config.fire_cooldown);
        assert!(fire(&mut world, ship, &config).unwrap().is_some());
        assert_eq!(world.view::<Laser>().len(), 2);
    }

    #[test]
    fn test_rapid_fire_halves_cooldown() {
        let mut world = World::new();
        let config = GameplayConfig::default();
        let ship = spawn_player(&mut world, &config).unwrap();
        world.get_mut::<Player>(ship).unwrap().rapid_fire_for = 1.0;

        fire(&mut world, ship, &config).unwrap();

        let cooldown = world.get::<Player>(ship).unwrap().fire_cooldown;
        assert_relative_eq!(cooldown, config.fire_cooldown * 0.5);
    }

    #[test]
    fn test_bolt_inherits_ship_velocity() {
        let mut world = World::new();
        let config = GameplayConfig::default();
        let ship = spawn_player(&mut world, &config).unwrap();
        world
            .get_mut::<Rigidbody>(ship)
            .unwrap()
            .set_velocity(Vec3::new(5.0, 0.0, 0.0));

        let bolt = fire(&mut world, ship, &config).unwrap().unwrap();

        let body = world.get::<Rigidbody>(bolt).unwrap();
        assert_relative_eq!(body.velocity(), Vec3::new(5.0, 0.0, config.laser_speed), epsilon = 1e-5);
        assert!(body.position().z > SHIP_RADIUS);

        let collider = world.get::<Collider>(bolt).unwrap();
        assert_eq!(collider.mask(), CollisionLayers::ASTEROID);
    }
}
