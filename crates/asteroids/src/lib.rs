//! Asteroid-field arcade game
//!
//! Gameplay lives on top of the `roid_engine` physics core: every ship,
//! rock, bolt and pickup is a rigid body with a collider, and collision
//! outcomes are applied from the physics system's event log after each
//! frame.

#![warn(missing_docs)]

pub mod asteroid_field;
pub mod boundary;
pub mod components;
pub mod config;
pub mod game;
pub mod lasers;
pub mod lifetime;
pub mod player;
pub mod power_ups;

use roid_engine::config::ConfigError;
use roid_engine::ecs::{EcsError, Entity};
use roid_engine::physics::PhysicsError;

pub use config::{GameConfig, GameplayConfig};
pub use game::{FrameReport, Game, GameStatus};
pub use player::ShipControls;

/// Errors raised while setting up or running a game
#[derive(thiserror::Error, Debug)]
pub enum GameError {
    /// Config file could not be read or written
    #[error(transparent)]
    Config(#[from] ConfigError),

    /// Physics rejected a request
    #[error(transparent)]
    Physics(#[from] PhysicsError),

    /// Entity bookkeeping failed
    #[error(transparent)]
    Ecs(#[from] EcsError),

    /// Gameplay settings are out of range
    #[error("invalid game configuration: {0}")]
    InvalidConfig(String),
}

impl GameError {
    pub(crate) fn missing(entity: Entity, component: &'static str) -> Self {
        Self::Physics(PhysicsError::MissingComponent { entity, component })
    }
}
