//! # Roid Engine
//!
//! Simulation core for a 3D asteroid arcade game: a fixed-timestep
//! rigid-body integrator, broad- and narrow-phase collision detection, and
//! impulse plus projection contact resolution over a sparse-set ECS.
//!
//! ## Features
//!
//! - **Fixed Timestep**: Frame time is accumulated into exact ticks
//! - **ECS Architecture**: Generational entity handles and a `Registry` trait
//! - **Broad Phase**: All-pairs reference scan or a wrap-around bucket grid
//! - **Collision Events**: Queued per tick, delivered after resolution
//!
//! ## Quick Start
//!
//! ```rust
//! use std::time::Duration;
//! use roid_engine::prelude::*;
//!
//! let mut world = World::new();
//! let ball = world.create_entity();
//! world.insert(ball, Rigidbody::new(1.0).with_position(Vec3::new(0.0, 5.0, 0.0))).unwrap();
//! world.insert(ball, Collider::new(Shape::sphere(1.0))).unwrap();
//!
//! let mut physics = PhysicsSystem::default();
//! world.get_mut::<Rigidbody>(ball).unwrap().add_force(Vec3::new(0.0, -9.8, 0.0));
//! physics.update(&mut world, Duration::from_millis(16));
//!
//! assert!(world.get::<Rigidbody>(ball).unwrap().velocity().y < 0.0);
//! ```

#![warn(missing_docs)]
#![warn(clippy::all, clippy::pedantic, clippy::nursery)]
#![allow(
    clippy::module_name_repetitions,
    clippy::similar_names,
    clippy::too_many_arguments,
    clippy::cast_possible_truncation,
    clippy::cast_precision_loss,
    clippy::cast_sign_loss,
    clippy::cast_possible_wrap
)]

pub mod config;
pub mod ecs;
pub mod foundation;
pub mod physics;
pub mod spatial;

/// Common imports for engine users
pub mod prelude {
    pub use crate::{
        config::{Config, ConfigError},
        ecs::{Component, Entity, Registry, System, World},
        foundation::{
            math::{Mat3, Mat4, Quat, Transform, UVec3, Vec3},
            time::{FixedTimestep, Stopwatch},
        },
        physics::{
            inertia, Collider, CollisionData, CollisionEvent, CollisionLayers, InvariantPolicy,
            PhysicsConfig, PhysicsError, PhysicsSystem, Rigidbody, Shape,
        },
        spatial::{Aabb, BroadPhase, BroadPhaseConfig, BucketGrid},
    };
}
