//! End-to-end behaviour of the physics pipeline driven through a `World`

use std::time::Duration;

use approx::assert_relative_eq;
use roid_engine::prelude::*;
use roid_engine::foundation::math::UVec3;
use roid_engine::physics::collide_at;

const H: Duration = roid_engine::physics::DEFAULT_UPDATE_TIME;

fn spawn(world: &mut World, body: Rigidbody, collider: Option<Collider>) -> Entity {
    let entity = world.create_entity();
    world.insert(entity, body).unwrap();
    if let Some(collider) = collider {
        world.insert(entity, collider).unwrap();
    }
    entity
}

fn body(world: &World, entity: Entity) -> &Rigidbody {
    world.get::<Rigidbody>(entity).unwrap()
}

#[test]
fn constant_force_matches_semi_implicit_euler() {
    let mut world = World::new();
    let mass = 2.0;
    let force = Vec3::new(0.0, 0.0, 3.0);
    let ship = spawn(&mut world, Rigidbody::new(mass), None);
    let mut physics = PhysicsSystem::default();

    let n = 240;
    for _ in 0..n {
        world.get_mut::<Rigidbody>(ship).unwrap().add_force(force);
        physics.update(&mut world, H);
    }

    let h = H.as_secs_f32();
    let a = force.z / mass;
    let ticks = n as f32;
    assert_eq!(physics.tick_count(), n);
    assert_relative_eq!(body(&world, ship).velocity().z, a * ticks * h, max_relative = 1e-4);
    assert_relative_eq!(
        body(&world, ship).position().z,
        a * h * h * ticks * (ticks + 1.0) / 2.0,
        max_relative = 1e-3
    );
}

#[test]
fn damping_decays_geometrically() {
    let mut world = World::new();
    let drifting = spawn(
        &mut world,
        Rigidbody::new(1.0).with_velocity(Vec3::new(4.0, 0.0, 0.0)).with_damping(0.98, 1.0),
        None,
    );
    let mut physics = PhysicsSystem::default();

    physics.update(&mut world, H * 50);

    assert_eq!(physics.last_stats().ticks, 50);
    assert_relative_eq!(body(&world, drifting).velocity().x, 4.0 * 0.98f32.powi(50), max_relative = 1e-4);
}

#[test]
fn sphere_contact_boundaries() {
    let unit = Shape::sphere(1.0);

    assert!(collide_at(&unit, Vec3::zeros(), &unit, Vec3::new(0.0, 2.0, 0.0)).is_none());
    assert!(collide_at(&unit, Vec3::zeros(), &unit, Vec3::zeros()).is_none());

    let touching = collide_at(&unit, Vec3::zeros(), &unit, Vec3::new(0.0, 1.999, 0.0)).unwrap();
    assert_relative_eq!(touching.penetration, 0.001, epsilon = 1e-5);
    assert_relative_eq!(touching.normal, Vec3::y(), epsilon = 1e-6);

    let bounds = Shape::inverse_sphere(10.0);
    let probe = Shape::sphere(0.1);
    let escaping = collide_at(&bounds, Vec3::zeros(), &probe, Vec3::new(9.95, 0.0, 0.0)).unwrap();
    assert_relative_eq!(escaping.penetration, 0.05, epsilon = 1e-4);
    assert!(escaping.normal.dot(&Vec3::new(9.95, 0.0, 0.0)) < 0.0, "normal points back to centre");
}

fn head_on(restitution: f32) -> (World, Entity, Entity) {
    let mut world = World::new();
    let collider = Collider::new(Shape::sphere(1.0)).with_restitution(restitution);
    let a = spawn(
        &mut world,
        Rigidbody::new(1.0).with_position(Vec3::new(-0.995, 0.0, 0.0)).with_velocity(Vec3::new(1.5, 0.0, 0.0)),
        Some(collider.clone()),
    );
    let b = spawn(
        &mut world,
        Rigidbody::new(1.0).with_position(Vec3::new(0.995, 0.0, 0.0)).with_velocity(Vec3::new(-1.5, 0.0, 0.0)),
        Some(collider),
    );
    (world, a, b)
}

#[test]
fn elastic_collision_reverses_closing_velocity() {
    let (mut world, a, b) = head_on(1.0);
    let mut physics = PhysicsSystem::default();

    physics.update(&mut world, H);

    let relative = body(&world, b).velocity().x - body(&world, a).velocity().x;
    assert_relative_eq!(relative, 3.0, epsilon = 1e-4);
    assert_relative_eq!(physics.events()[0].relative_velocity, 3.0, epsilon = 1e-4);
}

#[test]
fn inelastic_collision_removes_closing_velocity() {
    let (mut world, a, b) = head_on(0.0);
    let mut physics = PhysicsSystem::default();

    physics.update(&mut world, H);

    let relative = body(&world, b).velocity().x - body(&world, a).velocity().x;
    assert_relative_eq!(relative, 0.0, epsilon = 1e-4);
}

#[test]
fn infinite_mass_body_never_moves() {
    let mut world = World::new();
    let wall_position = Vec3::new(1.5, 0.0, 0.0);
    let wall = spawn(
        &mut world,
        Rigidbody::new_static().with_position(wall_position),
        Some(Collider::new(Shape::sphere(1.0)).with_restitution(0.5)),
    );
    let ball = spawn(
        &mut world,
        Rigidbody::new(1.0).with_velocity(Vec3::new(20.0, 0.0, 0.0)),
        Some(Collider::new(Shape::sphere(1.0)).with_restitution(0.5)),
    );
    let mut physics = PhysicsSystem::default();

    for _ in 0..30 {
        world.get_mut::<Rigidbody>(ball).unwrap().add_force(Vec3::new(50.0, 0.0, 0.0));
        physics.update(&mut world, H);
    }

    assert_eq!(body(&world, wall).position(), wall_position);
    assert_eq!(body(&world, wall).velocity(), Vec3::zeros());
    assert!(body(&world, ball).position().x < wall_position.x);
}

#[test]
fn split_frames_match_one_long_frame() {
    let make = || {
        let mut world = World::new();
        let entity = spawn(
            &mut world,
            Rigidbody::new(1.0).with_velocity(Vec3::new(1.0, 2.0, 3.0)).with_damping(0.999, 1.0),
            None,
        );
        (world, entity)
    };
    let (mut split_world, split) = make();
    let (mut whole_world, whole) = make();
    let mut split_physics = PhysicsSystem::default();
    let mut whole_physics = PhysicsSystem::default();

    let frames = [3u64, 17, 1, 9, 25, 4, 12, 8, 30, 2].map(Duration::from_millis);
    let total: Duration = frames.iter().sum();
    for frame in frames {
        split_physics.update(&mut split_world, frame);
    }
    whole_physics.update(&mut whole_world, total);

    assert_eq!(split_physics.tick_count(), whole_physics.tick_count());
    assert_eq!(split_physics.accumulator(), whole_physics.accumulator());
    assert!(split_physics.accumulator() < H);
    assert_eq!(split_physics.simulated_time() + split_physics.accumulator(), total);
    assert_relative_eq!(
        body(&split_world, split).position(),
        body(&whole_world, whole).position(),
        epsilon = 1e-5
    );
}

#[test]
fn sphere_comes_to_rest_inside_boundary() {
    let mut world = World::new();
    let ball = spawn(
        &mut world,
        Rigidbody::new(1.0)
            .with_position(Vec3::new(0.0, 10.0, 0.0))
            .with_inertia(inertia::solid_sphere(1.0, 1.0))
            .with_damping(0.99, 0.99),
        Some(Collider::new(Shape::sphere(1.0))),
    );
    let bounds = spawn(
        &mut world,
        Rigidbody::new_static(),
        Some(Collider::new(Shape::inverse_sphere(11.0))),
    );
    let mut physics = PhysicsSystem::default();

    // Ten simulated seconds at sixty frames per second.
    for _ in 0..600 {
        world.get_mut::<Rigidbody>(ball).unwrap().add_force(Vec3::new(0.0, -9.8, 0.0));
        physics.update(&mut world, Duration::from_micros(16_667));
    }

    let resting = body(&world, ball);
    assert_relative_eq!(resting.position().norm(), 10.0, epsilon = 0.01);
    assert!(resting.position().y < 0.0);
    assert!(resting.velocity().norm() < 0.2, "speed {}", resting.velocity().norm());
    assert_eq!(body(&world, bounds).position(), Vec3::zeros());
}

fn crowded_field(world: &mut World) -> Vec<Entity> {
    let mut entities = Vec::new();
    for i in 0..6 {
        for j in 0..6 {
            let position = Vec3::new(i as f32 * 1.7, (i + j) as f32 * 0.3, j as f32 * 1.7);
            entities.push(spawn(
                world,
                Rigidbody::new(1.0).with_position(position),
                Some(Collider::new(Shape::sphere(1.0))),
            ));
        }
    }
    entities
}

#[test]
fn bucket_grid_finds_the_same_contacts_as_all_pairs() {
    let mut reference_world = World::new();
    let mut grid_world = World::new();
    crowded_field(&mut reference_world);
    crowded_field(&mut grid_world);

    let mut reference = PhysicsSystem::default();
    let config = PhysicsConfig {
        broad_phase: BroadPhaseConfig::BucketGrid {
            cell_size: Vec3::repeat(2.0),
            bucket_count: UVec3::new(16, 16, 16),
        },
        ..Default::default()
    };
    let mut grid = PhysicsSystem::from_config(&config).unwrap();

    reference.update(&mut reference_world, H);
    grid.update(&mut grid_world, H);

    assert!(reference.last_stats().contacts > 0);
    assert_eq!(grid.current_contacts(), reference.current_contacts());
    assert_eq!(grid.last_stats().contacts, reference.last_stats().contacts);
    assert!(grid.last_stats().candidate_pairs >= grid.last_stats().unique_pairs);
}

#[test]
fn duplicate_grid_candidates_resolve_once() {
    let make = |broad_phase: BroadPhaseConfig| {
        let mut world = World::new();
        let (a, b) = (
            spawn(
                &mut world,
                Rigidbody::new(1.0).with_velocity(Vec3::new(1.0, 0.0, 0.0)),
                Some(Collider::new(Shape::sphere(1.0)).with_restitution(1.0)),
            ),
            spawn(
                &mut world,
                Rigidbody::new(1.0).with_position(Vec3::new(1.5, 0.0, 0.0)),
                Some(Collider::new(Shape::sphere(1.0)).with_restitution(1.0)),
            ),
        );
        let config = PhysicsConfig { broad_phase, ..Default::default() };
        let mut physics = PhysicsSystem::from_config(&config).unwrap();
        physics.update(&mut world, H);
        let velocities = (body(&world, a).velocity(), body(&world, b).velocity());
        (velocities, *physics.last_stats())
    };

    let (reference, _) = make(BroadPhaseConfig::AllPairs);
    let (gridded, stats) = make(BroadPhaseConfig::BucketGrid {
        cell_size: Vec3::repeat(1.0),
        bucket_count: UVec3::new(8, 8, 8),
    });

    // The two spheres share many cells, so the grid reports them repeatedly.
    assert!(stats.candidate_pairs > 2);
    assert_eq!(stats.unique_pairs, 1);
    assert_eq!(stats.contacts, 1);
    assert_relative_eq!(gridded.0, reference.0, epsilon = 1e-6);
    assert_relative_eq!(gridded.1, reference.1, epsilon = 1e-6);
}
