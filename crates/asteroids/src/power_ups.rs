//! Pickups dropped by destroyed asteroids

use log::info;
use rand::Rng;

use roid_engine::prelude::*;

use crate::components::{Lifetime, Player, PowerUp, PowerUpKind};
use crate::config::GameplayConfig;
use crate::GameError;

/// Pickup collision radius
pub const POWER_UP_RADIUS: f32 = 1.0;

const POWER_UP_MASS: f32 = 0.5;

const KINDS: [PowerUpKind; 3] = [PowerUpKind::Shield, PowerUpKind::RapidFire, PowerUpKind::ExtraLife];

/// Decide whether a destroyed asteroid drops something
pub fn roll_drop(rng: &mut impl Rng, chance: f64) -> Option<PowerUpKind> {
    if !rng.gen_bool(chance.clamp(0.0, 1.0)) {
        return None;
    }
    Some(KINDS[rng.gen_range(0..KINDS.len())])
}

/// Spawn a drifting pickup
pub fn spawn_power_up<R: Registry>(
    world: &mut R,
    kind: PowerUpKind,
    position: Vec3,
    velocity: Vec3,
    lifetime: f32,
) -> Result<Entity, GameError> {
    let mut body = Rigidbody::new(POWER_UP_MASS)
        .with_position(position)
        .with_velocity(velocity)
        .with_damping(0.99, 1.0);
    body.set_linear_factor(Vec3::new(1.0, 0.0, 1.0));

    let entity = world.create_entity();
    world.insert(entity, body)?;
    world.insert(
        entity,
        Collider::new(Shape::sphere(POWER_UP_RADIUS))
            .with_restitution(0.5)
            .with_layers(CollisionLayers::POWER_UP, CollisionLayers::PLAYER | CollisionLayers::BOUNDARY),
    )?;
    world.insert(entity, PowerUp { kind })?;
    world.insert(entity, Lifetime::new(lifetime))?;
    Ok(entity)
}

/// Grant a pickup's effect to the player
pub fn apply(player: &mut Player, kind: PowerUpKind, gameplay: &GameplayConfig) {
    match kind {
        PowerUpKind::Shield => {
            player.invulnerable_for = player.invulnerable_for.max(gameplay.power_up_duration);
        }
        PowerUpKind::RapidFire => {
            player.rapid_fire_for = player.rapid_fire_for.max(gameplay.power_up_duration);
        }
        PowerUpKind::ExtraLife => player.lives += 1,
    }
    info!("Picked up {:?}", kind);
}
