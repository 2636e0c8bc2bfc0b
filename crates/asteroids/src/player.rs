//! Player ship spawning and steering

use log::debug;

use roid_engine::prelude::*;

use crate::components::{Player, Score};
use crate::config::GameplayConfig;
use crate::GameError;

/// Ship collision radius
pub const SHIP_RADIUS: f32 = 1.5;

/// Ship mass
pub const SHIP_MASS: f32 = 10.0;

/// Per-step velocity retention while coasting
const SHIP_LINEAR_DAMPING: f32 = 0.995;
const SHIP_ANGULAR_DAMPING: f32 = 0.9;

/// Player input for one frame
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct ShipControls {
    /// Throttle, 0 (off) to 1 (full)
    pub thrust: f32,

    /// Turn rate, -1 (right) to 1 (left)
    pub turn: f32,

    /// Fire button held
    pub fire: bool,
}

/// Layers the ship reacts to
pub fn ship_mask() -> CollisionLayers {
    CollisionLayers::ASTEROID | CollisionLayers::POWER_UP | CollisionLayers::BOUNDARY
}

/// Spawn the player ship at the arena centre
pub fn spawn_player<R: Registry>(world: &mut R, gameplay: &GameplayConfig) -> Result<Entity, GameError> {
    let mut body = Rigidbody::new(SHIP_MASS)
        .with_inertia(inertia::solid_sphere(SHIP_MASS, SHIP_RADIUS))
        .with_damping(SHIP_LINEAR_DAMPING, SHIP_ANGULAR_DAMPING);
    // The ship flies in the XZ plane and only yaws.
    body.set_linear_factor(Vec3::new(1.0, 0.0, 1.0));
    body.set_angular_factor(Vec3::new(0.0, 1.0, 0.0));

    let collider = Collider::new(Shape::sphere(SHIP_RADIUS))
        .with_restitution(0.3)
        .with_layers(CollisionLayers::PLAYER, ship_mask())
        .with_callback(|event| {
            debug!(
                "Ship contact with {:?}, closing speed {:.2}",
                event.other, event.relative_velocity
            );
        });

    let entity = world.create_entity();
    world.insert(entity, body)?;
    world.insert(entity, collider)?;
    world.insert(entity, Player::new(gameplay.starting_lives))?;
    world.insert(entity, Score::default())?;
    Ok(entity)
}

/// Direction the ship's nose points in
pub fn forward(body: &Rigidbody) -> Vec3 {
    body.orientation() * Vec3::z()
}

/// Apply one frame of input to the ship body
pub fn steer<R: Registry>(
    world: &mut R,
    ship: Entity,
    controls: &ShipControls,
    gameplay: &GameplayConfig,
) -> Result<(), GameError> {
    let body = world
        .get_mut::<Rigidbody>(ship)
        .ok_or_else(|| GameError::missing(ship, "Rigidbody"))?;

    let turn = controls.turn.clamp(-1.0, 1.0);
    body.set_angular_velocity(Vec3::new(0.0, turn * gameplay.ship_rotation_speed, 0.0));

    let thrust = controls.thrust.clamp(0.0, 1.0);
    if thrust > 0.0 {
        let direction = forward(body);
        body.add_force(direction * thrust * gameplay.ship_thrust);
    }

    let velocity = body.velocity();
    let speed = velocity.norm();
    if speed > gameplay.ship_max_speed {
        body.set_velocity(velocity * (gameplay.ship_max_speed / speed));
    }

    Ok(())
}
