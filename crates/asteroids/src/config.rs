//! Game configuration

use serde::{Deserialize, Serialize};

use roid_engine::config::Config;
use roid_engine::physics::PhysicsConfig;

use crate::GameError;

/// Game configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GameConfig {
    /// Gameplay settings
    pub gameplay: GameplayConfig,

    /// Physics settings
    pub physics: PhysicsConfig,
}

/// Gameplay configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GameplayConfig {
    /// Seed for the asteroid field's generator
    pub seed: u64,

    /// Starting lives
    pub starting_lives: u32,

    /// Asteroids in the first wave
    pub asteroid_count: u32,

    /// Radius of the containment sphere
    pub arena_radius: f32,

    /// Ship thrust force
    pub ship_thrust: f32,

    /// Ship max speed
    pub ship_max_speed: f32,

    /// Ship rotation speed (radians per second)
    pub ship_rotation_speed: f32,

    /// Laser speed relative to the ship
    pub laser_speed: f32,

    /// Laser lifetime (seconds)
    pub laser_lifetime: f32,

    /// Seconds between shots
    pub fire_cooldown: f32,

    /// Invulnerability after a hit (seconds)
    pub invulnerability_time: f32,

    /// Chance that a destroyed asteroid drops a power-up
    pub power_up_chance: f64,

    /// Power-up lifetime (seconds)
    pub power_up_lifetime: f32,

    /// Duration of timed power-up effects (seconds)
    pub power_up_duration: f32,
}

impl Default for GameplayConfig {
    fn default() -> Self {
        Self {
            seed: 0x5eed_a57e,
            starting_lives: 3,
            asteroid_count: 5,
            arena_radius: 60.0,
            ship_thrust: 400.0,
            ship_max_speed: 30.0,
            ship_rotation_speed: 3.0,
            laser_speed: 60.0,
            laser_lifetime: 1.2,
            fire_cooldown: 0.2,
            invulnerability_time: 2.0,
            power_up_chance: 0.15,
            power_up_lifetime: 8.0,
            power_up_duration: 5.0,
        }
    }
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            gameplay: GameplayConfig::default(),
            physics: PhysicsConfig::default(),
        }
    }
}

impl Config for GameConfig {}

impl GameConfig {
    /// Reject settings the game cannot start with
    pub fn validate(&self) -> Result<(), GameError> {
        self.physics.validate()?;

        let gameplay = &self.gameplay;
        if gameplay.arena_radius <= 2.0 * crate::components::AsteroidSize::Large.radius() {
            return Err(GameError::InvalidConfig(format!(
                "arena radius {} is too small for a large asteroid",
                gameplay.arena_radius
            )));
        }
        if !(0.0..=1.0).contains(&gameplay.power_up_chance) {
            return Err(GameError::InvalidConfig(format!(
                "power_up_chance must be within [0, 1], got {}",
                gameplay.power_up_chance
            )));
        }
        if gameplay.laser_lifetime <= 0.0 || gameplay.power_up_lifetime <= 0.0 {
            return Err(GameError::InvalidConfig("lifetimes must be positive".to_string()));
        }
        Ok(())
    }
}
