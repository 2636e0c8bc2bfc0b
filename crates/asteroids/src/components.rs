//! Game-specific components

use serde::{Deserialize, Serialize};

use roid_engine::prelude::*;

/// Player ship component
#[derive(Debug, Clone)]
pub struct Player {
    /// Remaining lives
    pub lives: u32,

    /// Seconds of invulnerability left (after a hit or a shield pickup)
    pub invulnerable_for: f32,

    /// Seconds until the next shot is allowed
    pub fire_cooldown: f32,

    /// Seconds of rapid fire left
    pub rapid_fire_for: f32,
}

impl Component for Player {}

impl Player {
    /// Create a player with `lives` lives
    pub fn new(lives: u32) -> Self {
        Self {
            lives,
            invulnerable_for: 0.0,
            fire_cooldown: 0.0,
            rapid_fire_for: 0.0,
        }
    }

    /// Whether the player is currently immune to damage
    pub fn is_invulnerable(&self) -> bool {
        self.invulnerable_for > 0.0
    }

    /// Count down all timers
    pub fn tick(&mut self, dt: f32) {
        self.invulnerable_for = (self.invulnerable_for - dt).max(0.0);
        self.fire_cooldown = (self.fire_cooldown - dt).max(0.0);
        self.rapid_fire_for = (self.rapid_fire_for - dt).max(0.0);
    }
}

/// Asteroid component
#[derive(Debug, Clone)]
pub struct Asteroid {
    /// Asteroid size category
    pub size: AsteroidSize,

    /// Hits left before it breaks
    pub health: Health,
}

impl Component for Asteroid {}

impl Asteroid {
    /// Fresh asteroid of the given size
    pub fn new(size: AsteroidSize) -> Self {
        Self {
            size,
            health: Health::new(size.hits()),
        }
    }
}

/// Asteroid size categories
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum AsteroidSize {
    /// Large asteroid (splits into medium)
    Large,

    /// Medium asteroid (splits into small)
    Medium,

    /// Small asteroid (destroyed completely)
    Small,
}

impl AsteroidSize {
    /// Collision radius
    pub fn radius(self) -> f32 {
        match self {
            AsteroidSize::Large => 4.0,
            AsteroidSize::Medium => 2.5,
            AsteroidSize::Small => 1.5,
        }
    }

    /// Body mass
    pub fn mass(self) -> f32 {
        match self {
            AsteroidSize::Large => 40.0,
            AsteroidSize::Medium => 15.0,
            AsteroidSize::Small => 5.0,
        }
    }

    /// Laser hits needed to break it
    pub fn hits(self) -> u32 {
        match self {
            AsteroidSize::Large => 2,
            AsteroidSize::Medium | AsteroidSize::Small => 1,
        }
    }

    /// Get the points awarded for destroying this size
    pub fn points(self) -> u32 {
        match self {
            AsteroidSize::Large => 20,
            AsteroidSize::Medium => 50,
            AsteroidSize::Small => 100,
        }
    }

    /// Get the next smaller size when split
    pub fn split_into(self) -> Option<AsteroidSize> {
        match self {
            AsteroidSize::Large => Some(AsteroidSize::Medium),
            AsteroidSize::Medium => Some(AsteroidSize::Small),
            AsteroidSize::Small => None,
        }
    }
}

/// Laser bolt component
#[derive(Debug, Clone)]
pub struct Laser {
    /// Damage dealt on impact
    pub damage: u32,
}

impl Component for Laser {}

/// Pickup component
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PowerUp {
    /// What the pickup grants
    pub kind: PowerUpKind,
}

impl Component for PowerUp {}

/// Pickup effects
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PowerUpKind {
    /// Temporary invulnerability
    Shield,
    /// Temporary halved fire cooldown
    RapidFire,
    /// One more life
    ExtraLife,
}

/// Marker for the arena's containment sphere
#[derive(Debug, Clone, Copy, Default)]
pub struct Boundary;

impl Component for Boundary {}

/// Entity is destroyed when this runs out
#[derive(Debug, Clone, Copy)]
pub struct Lifetime {
    /// Seconds left
    pub remaining: f32,
}

impl Component for Lifetime {}

impl Lifetime {
    /// Lifetime of `seconds`
    pub fn new(seconds: f32) -> Self {
        Self { remaining: seconds }
    }
}

/// Health component
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Health {
    /// Current health
    pub current: u32,

    /// Maximum health
    pub max: u32,
}

impl Health {
    /// Create a new health component
    pub fn new(max_health: u32) -> Self {
        Self {
            current: max_health,
            max: max_health,
        }
    }

    /// Take damage
    pub fn take_damage(&mut self, damage: u32) {
        self.current = self.current.saturating_sub(damage);
    }

    /// Check if dead
    pub fn is_dead(&self) -> bool {
        self.current == 0
    }
}

/// Score component for tracking points
#[derive(Debug, Clone)]
pub struct Score {
    /// Current score
    pub value: u32,

    /// Multiplier for bonus points
    pub multiplier: f32,
}

impl Component for Score {}

impl Default for Score {
    fn default() -> Self {
        Self {
            value: 0,
            multiplier: 1.0,
        }
    }
}

impl Score {
    /// Add points to the score
    pub fn add_points(&mut self, points: u32) {
        self.value += (points as f32 * self.multiplier) as u32;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_split_chain_ends_at_small() {
        assert_eq!(AsteroidSize::Large.split_into(), Some(AsteroidSize::Medium));
        assert_eq!(AsteroidSize::Medium.split_into(), Some(AsteroidSize::Small));
        assert_eq!(AsteroidSize::Small.split_into(), None);
    }

    #[test]
    fn test_health_saturates() {
        let mut health = Health::new(2);
        health.take_damage(5);
        assert!(health.is_dead());
    }

    #[test]
    fn test_player_timers_count_down_to_zero() {
        let mut player = Player::new(3);
        player.invulnerable_for = 0.5;
        player.tick(1.0);
        assert!(!player.is_invulnerable());
        assert_eq!(player.fire_cooldown, 0.0);
    }

    #[test]
    fn test_score_multiplier() {
        let mut score = Score::default();
        score.multiplier = 2.0;
        score.add_points(50);
        assert_eq!(score.value, 100);
    }
}
