//! Game state and the per-frame loop

use std::collections::HashSet;
use std::time::Duration;

use log::{debug, info, warn};

use roid_engine::prelude::*;

use crate::asteroid_field::AsteroidField;
use crate::boundary::spawn_boundary;
use crate::components::{Asteroid, Laser, Player, PowerUp, PowerUpKind, Score};
use crate::config::{GameConfig, GameplayConfig};
use crate::lasers;
use crate::lifetime::LifetimeSystem;
use crate::player::{self, ShipControls};
use crate::power_ups;
use crate::GameError;

/// Whether the game is still running
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GameStatus {
    /// Ship has lives left
    Playing,
    /// Out of lives; updates are ignored
    GameOver,
}

/// What happened during one [`Game::update`]
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FrameReport {
    /// Collision events delivered by physics
    pub collision_events: usize,
    /// Asteroids broken by lasers
    pub asteroids_destroyed: u32,
    /// Points scored
    pub points: u32,
    /// Lives lost
    pub ship_hits: u32,
    /// Pickups collected
    pub pickups: Vec<PowerUpKind>,
    /// A new wave started
    pub new_wave: bool,
}

/// A running game
pub struct Game {
    gameplay: GameplayConfig,
    world: World,
    physics: PhysicsSystem,
    lifetimes: LifetimeSystem,
    field: AsteroidField,
    ship: Entity,
    status: GameStatus,
}

impl Game {
    /// Build the arena, the ship and the first wave
    pub fn new(config: &GameConfig) -> Result<Self, GameError> {
        config.validate()?;
        let gameplay = config.gameplay.clone();

        let mut world = World::new();
        let physics = PhysicsSystem::from_config(&config.physics)?;

        spawn_boundary(&mut world, gameplay.arena_radius)?;
        let ship = player::spawn_player(&mut world, &gameplay)?;

        let mut field = AsteroidField::new(gameplay.seed, gameplay.arena_radius);
        field.spawn_wave(&mut world, gameplay.asteroid_count)?;

        info!(
            "Game started: seed {:#x}, {} lives, broad phase {}",
            gameplay.seed,
            gameplay.starting_lives,
            physics.broad_phase_name()
        );

        Ok(Self {
            gameplay,
            world,
            physics,
            lifetimes: LifetimeSystem::new(),
            field,
            ship,
            status: GameStatus::Playing,
        })
    }

    /// The entity world
    pub fn world(&self) -> &World {
        &self.world
    }

    /// Mutable access to the entity world
    pub fn world_mut(&mut self) -> &mut World {
        &mut self.world
    }

    /// The physics system
    pub fn physics(&self) -> &PhysicsSystem {
        &self.physics
    }

    /// The player ship
    pub fn ship(&self) -> Entity {
        self.ship
    }

    /// Current status
    pub fn status(&self) -> GameStatus {
        self.status
    }

    /// Current wave number
    pub fn wave(&self) -> u32 {
        self.field.wave()
    }

    /// Player score
    pub fn score(&self) -> u32 {
        self.world.get::<Score>(self.ship).map_or(0, |score| score.value)
    }

    /// Player lives
    pub fn lives(&self) -> u32 {
        self.world.get::<Player>(self.ship).map_or(0, |player| player.lives)
    }

    /// Asteroids still in play
    pub fn asteroid_count(&self) -> usize {
        self.world.view::<Asteroid>().len()
    }

    /// Advance the game by one frame of wall time
    pub fn update(&mut self, controls: ShipControls, delta: Duration) -> Result<FrameReport, GameError> {
        let mut report = FrameReport::default();
        if self.status == GameStatus::GameOver {
            return Ok(report);
        }

        let dt = delta.as_secs_f32();
        self.world
            .get_mut::<Player>(self.ship)
            .ok_or_else(|| GameError::missing(self.ship, "Player"))?
            .tick(dt);

        player::steer(&mut self.world, self.ship, &controls, &self.gameplay)?;
        if controls.fire {
            lasers::fire(&mut self.world, self.ship, &self.gameplay)?;
        }

        self.physics.update(&mut self.world, delta);
        let events = self.physics.drain_events();
        report.collision_events = events.len();
        self.apply_collisions(&events, &mut report)?;

        self.lifetimes.update(&mut self.world, delta);

        if self.asteroid_count() == 0 {
            let count = self.gameplay.asteroid_count + self.field.wave();
            self.field.spawn_wave(&mut self.world, count)?;
            report.new_wave = true;
        }

        Ok(report)
    }

    /// Turn collision events into gameplay outcomes.
    ///
    /// Every contact arrives once from each side; only the laser's and the
    /// ship's side are acted on. Entities are destroyed after all events are
    /// processed so later events never see a recycled handle.
    fn apply_collisions(&mut self, events: &[CollisionEvent], report: &mut FrameReport) -> Result<(), GameError> {
        let mut doomed = HashSet::new();

        for event in events {
            if doomed.contains(&event.entity) || doomed.contains(&event.other) {
                continue;
            }
            let other_is_asteroid = self.world.has::<Asteroid>(event.other);

            if self.world.has::<Laser>(event.entity) && other_is_asteroid {
                self.laser_hit(event, &mut doomed, report)?;
            } else if event.entity == self.ship && other_is_asteroid {
                self.ship_hit(report)?;
            } else if event.entity == self.ship {
                if let Some(&PowerUp { kind }) = self.world.get::<PowerUp>(event.other) {
                    let player = self
                        .world
                        .get_mut::<Player>(self.ship)
                        .ok_or_else(|| GameError::missing(self.ship, "Player"))?;
                    power_ups::apply(player, kind, &self.gameplay);
                    report.pickups.push(kind);
                    doomed.insert(event.other);
                }
            }
        }

        for entity in doomed {
            self.world.destroy_entity(entity);
        }
        Ok(())
    }

    fn laser_hit(
        &mut self,
        event: &CollisionEvent,
        doomed: &mut HashSet<Entity>,
        report: &mut FrameReport,
    ) -> Result<(), GameError> {
        let (laser, asteroid) = (event.entity, event.other);
        doomed.insert(laser);

        let damage = self.world.get::<Laser>(laser).map_or(1, |l| l.damage);
        let rock = self
            .world
            .get_mut::<Asteroid>(asteroid)
            .ok_or_else(|| GameError::missing(asteroid, "Asteroid"))?;
        rock.health.take_damage(damage);
        if !rock.health.is_dead() {
            return Ok(());
        }
        let size = rock.size;

        doomed.insert(asteroid);
        report.asteroids_destroyed += 1;
        report.points += size.points();
        if let Some(score) = self.world.get_mut::<Score>(self.ship) {
            score.add_points(size.points());
        }

        let fragments = self.field.split(&mut self.world, asteroid, event.data.normal)?;
        debug!("{:?} asteroid broke into {} fragments", size, fragments.len());

        if let Some(kind) = self.field.roll_power_up(self.gameplay.power_up_chance) {
            let (position, velocity) = {
                let body = self
                    .world
                    .get::<Rigidbody>(asteroid)
                    .ok_or_else(|| GameError::missing(asteroid, "Rigidbody"))?;
                (body.position(), body.velocity() * 0.5)
            };
            power_ups::spawn_power_up(&mut self.world, kind, position, velocity, self.gameplay.power_up_lifetime)?;
            debug!("Dropped {:?}", kind);
        }
        Ok(())
    }

    fn ship_hit(&mut self, report: &mut FrameReport) -> Result<(), GameError> {
        let player = self
            .world
            .get_mut::<Player>(self.ship)
            .ok_or_else(|| GameError::missing(self.ship, "Player"))?;
        if player.is_invulnerable() {
            return Ok(());
        }

        player.lives = player.lives.saturating_sub(1);
        player.invulnerable_for = self.gameplay.invulnerability_time;
        report.ship_hits += 1;

        if player.lives == 0 {
            self.status = GameStatus::GameOver;
            warn!("Ship destroyed, game over with score {}", self.score());
        } else {
            info!("Ship hit, {} lives left", player.lives);
        }
        Ok(())
    }
}
