//! Asteroid spawning and splitting
//!
//! The field owns the game's seeded RNG, so a given seed always produces the
//! same waves, splits and drops. Spawn spacing reuses the engine's bucket
//! grid: occupied space is hashed once per wave and every candidate spawn
//! point is checked against it.

use log::{debug, info};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use roid_engine::foundation::math::constants::TAU;
use roid_engine::prelude::*;
use roid_engine::spatial::Proxy;

use crate::components::{Asteroid, AsteroidSize, PowerUpKind};
use crate::power_ups;
use crate::GameError;

/// Candidate positions tried per asteroid before giving up
const SPAWN_ATTEMPTS: usize = 16;

/// Extra clearance kept around a fresh asteroid
const SPAWN_MARGIN: f32 = 1.0;

/// Spawn ring, as fractions of the arena radius
const SPAWN_RING: (f32, f32) = (0.35, 0.8);

/// Spawning and splitting of asteroids
pub struct AsteroidField {
    rng: StdRng,
    grid: BucketGrid,
    arena_radius: f32,
    wave: u32,
}

impl AsteroidField {
    /// Create a field for an arena of `arena_radius`
    pub fn new(seed: u64, arena_radius: f32) -> Self {
        Self {
            rng: StdRng::seed_from_u64(seed),
            grid: BucketGrid::new(Vec3::repeat(8.0), UVec3::new(16, 1, 16)),
            arena_radius,
            wave: 0,
        }
    }

    /// Waves spawned so far
    pub fn wave(&self) -> u32 {
        self.wave
    }

    /// Spawn a wave of large asteroids away from everything already present.
    ///
    /// Asteroids that find no free spot within the attempt budget are
    /// skipped, so the returned list may be shorter than `count`.
    pub fn spawn_wave<R: Registry>(&mut self, world: &mut R, count: u32) -> Result<Vec<Entity>, GameError> {
        self.wave += 1;

        let occupied: Vec<Proxy> = world
            .view2::<Rigidbody, Collider>()
            .into_iter()
            .filter_map(|entity| {
                let body = world.get::<Rigidbody>(entity)?;
                let collider = world.get::<Collider>(entity)?;
                // The arena wall covers everything; leave it out.
                if matches!(collider.shape(), Shape::InverseSphere { .. }) {
                    return None;
                }
                Some(Proxy::new(entity, collider.shape().aabb(body.position())))
            })
            .collect();
        self.grid.rebuild(&occupied);

        let size = AsteroidSize::Large;
        let mut spawned = Vec::new();
        for _ in 0..count {
            let Some(position) = self.free_spot(size.radius() + SPAWN_MARGIN) else {
                debug!("No free spot for asteroid in wave {}", self.wave);
                continue;
            };
            let velocity = self.random_velocity(3.0, 8.0);
            let entity = self.spawn_asteroid(world, size, position, velocity)?;
            self.grid
                .insert(entity, &Shape::sphere(size.radius()).aabb(position));
            spawned.push(entity);
        }

        info!("Wave {}: spawned {} asteroids", self.wave, spawned.len());
        Ok(spawned)
    }

    /// Spawn a single asteroid
    pub fn spawn_asteroid<R: Registry>(
        &mut self,
        world: &mut R,
        size: AsteroidSize,
        position: Vec3,
        velocity: Vec3,
    ) -> Result<Entity, GameError> {
        let radius = size.radius();
        let mass = size.mass();
        let spin = self.random_direction_3d() * self.rng.gen_range(0.2..1.5);

        let mut body = Rigidbody::new(mass)
            .with_inertia(inertia::solid_sphere(mass, radius))
            .with_position(position)
            .with_velocity(velocity);
        body.set_angular_velocity(spin);
        body.set_linear_factor(Vec3::new(1.0, 0.0, 1.0));

        let entity = world.create_entity();
        world.insert(entity, body)?;
        world.insert(
            entity,
            Collider::new(Shape::sphere(radius))
                .with_restitution(0.8)
                .with_layers(
                    CollisionLayers::ASTEROID,
                    CollisionLayers::ASTEROID
                        | CollisionLayers::PLAYER
                        | CollisionLayers::LASER
                        | CollisionLayers::BOUNDARY,
                ),
        )?;
        world.insert(entity, Asteroid::new(size))?;
        Ok(entity)
    }

    /// Spawn the two fragments of a broken asteroid.
    ///
    /// Fragments fly apart perpendicular to `impact_direction`. The parent is
    /// left alive; the caller destroys it. Small asteroids leave no fragments.
    pub fn split<R: Registry>(
        &mut self,
        world: &mut R,
        asteroid: Entity,
        impact_direction: Vec3,
    ) -> Result<Vec<Entity>, GameError> {
        let size = world
            .get::<Asteroid>(asteroid)
            .ok_or_else(|| GameError::missing(asteroid, "Asteroid"))?
            .size;
        let Some(child) = size.split_into() else {
            return Ok(Vec::new());
        };
        let (position, velocity) = {
            let body = world
                .get::<Rigidbody>(asteroid)
                .ok_or_else(|| GameError::missing(asteroid, "Rigidbody"))?;
            (body.position(), body.velocity())
        };

        let mut side = impact_direction.cross(&Vec3::y());
        if side.norm_squared() < 1e-6 {
            side = Vec3::x();
        }
        let side = side.normalize();
        let offset = side * (child.radius() * 1.05);
        let kick = side * self.rng.gen_range(2.0..5.0);

        Ok(vec![
            self.spawn_asteroid(world, child, position + offset, velocity + kick)?,
            self.spawn_asteroid(world, child, position - offset, velocity - kick)?,
        ])
    }

    /// Roll for a pickup drop using the field's RNG
    pub fn roll_power_up(&mut self, chance: f64) -> Option<PowerUpKind> {
        power_ups::roll_drop(&mut self.rng, chance)
    }

    /// Random planar drift velocity
    pub fn random_velocity(&mut self, min_speed: f32, max_speed: f32) -> Vec3 {
        let angle = self.rng.gen_range(0.0..TAU);
        let speed = self.rng.gen_range(min_speed..max_speed);
        Vec3::new(angle.cos(), 0.0, angle.sin()) * speed
    }

    fn free_spot(&mut self, clearance: f32) -> Option<Vec3> {
        let (inner, outer) = SPAWN_RING;
        for _ in 0..SPAWN_ATTEMPTS {
            let angle = self.rng.gen_range(0.0..TAU);
            let distance = self.rng.gen_range(inner..outer) * self.arena_radius;
            let candidate = Vec3::new(angle.cos(), 0.0, angle.sin()) * distance;

            let area = Aabb::from_center_extents(candidate, Vec3::repeat(clearance));
            if self.grid.query_aabb(&area).is_empty() {
                return Some(candidate);
            }
        }
        None
    }

    fn random_direction_3d(&mut self) -> Vec3 {
        loop {
            let v = Vec3::new(
                self.rng.gen_range(-1.0..1.0),
                self.rng.gen_range(-1.0..1.0),
                self.rng.gen_range(-1.0..1.0),
            );
            let length = v.norm();
            if length > 1e-3 && length <= 1.0 {
                return v / length;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn positions(world: &World, entities: &[Entity]) -> Vec<Vec3> {
        entities
            .iter()
            .map(|&e| world.get::<Rigidbody>(e).unwrap().position())
            .collect()
    }

    #[test]
    fn test_wave_spawns_inside_ring() {
        let mut world = World::new();
        let mut field = AsteroidField::new(42, 60.0);

        let spawned = field.spawn_wave(&mut world, 5).unwrap();

        assert_eq!(field.wave(), 1);
        assert!(!spawned.is_empty());
        for position in positions(&world, &spawned) {
            let distance = position.norm();
            assert!(distance >= 0.35 * 60.0 - 1e-3 && distance <= 0.8 * 60.0 + 1e-3);
            assert_eq!(position.y, 0.0);
        }
    }

    #[test]
    fn test_same_seed_same_wave() {
        let mut world_a = World::new();
        let mut world_b = World::new();
        let a = AsteroidField::new(9, 60.0).spawn_wave(&mut world_a, 4).unwrap();
        let b = AsteroidField::new(9, 60.0).spawn_wave(&mut world_b, 4).unwrap();

        assert_eq!(positions(&world_a, &a), positions(&world_b, &b));
    }

    #[test]
    fn test_wave_asteroids_do_not_overlap() {
        let mut world = World::new();
        let mut field = AsteroidField::new(3, 60.0);
        let spawned = field.spawn_wave(&mut world, 6).unwrap();

        let points = positions(&world, &spawned);
        let min_gap = 2.0 * AsteroidSize::Large.radius();
        for (i, a) in points.iter().enumerate() {
            for b in &points[i + 1..] {
                assert!((a - b).norm() > min_gap);
            }
        }
    }

    #[test]
    fn test_split_large_into_two_medium() {
        let mut world = World::new();
        let mut field = AsteroidField::new(1, 60.0);
        let parent = field
            .spawn_asteroid(&mut world, AsteroidSize::Large, Vec3::new(10.0, 0.0, 0.0), Vec3::zeros())
            .unwrap();

        let children = field.split(&mut world, parent, Vec3::z()).unwrap();

        assert_eq!(children.len(), 2);
        for &child in &children {
            assert_eq!(world.get::<Asteroid>(child).unwrap().size, AsteroidSize::Medium);
        }
        let points = positions(&world, &children);
        // z-directed impact pushes fragments apart along x
        assert!((points[0] - points[1]).x.abs() > 2.0 * AsteroidSize::Medium.radius());
        assert!(world.is_alive(parent));
    }

    #[test]
    fn test_small_asteroid_leaves_no_fragments() {
        let mut world = World::new();
        let mut field = AsteroidField::new(1, 60.0);
        let rock = field
            .spawn_asteroid(&mut world, AsteroidSize::Small, Vec3::zeros(), Vec3::zeros())
            .unwrap();

        assert!(field.split(&mut world, rock, Vec3::x()).unwrap().is_empty());
    }
}
