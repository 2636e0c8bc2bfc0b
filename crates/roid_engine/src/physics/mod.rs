//! Rigid-body physics
//!
//! Bodies and colliders are plain components. [`PhysicsSystem`] drives them
//! at a fixed tick: broad phase, narrow phase, impulse and projection
//! resolution, integration, then collision event delivery.

pub mod collider;
pub mod collision;
pub mod collision_layers;
pub mod config;
pub mod error;
pub mod events;
pub mod physics_system;
pub mod resolver;
pub mod rigidbody;

pub use collider::{Collider, CollisionCallback, Shape};
pub use collision::{collide, collide_at, CollisionData};
pub use collision_layers::CollisionLayers;
pub use config::PhysicsConfig;
pub use error::{InvariantPolicy, PhysicsError};
pub use events::{CollisionEvent, CollisionEventQueue};
pub use physics_system::{CollisionPair, PhysicsStats, PhysicsSystem, DEFAULT_UPDATE_TIME};
pub use rigidbody::{inertia, Rigidbody};
