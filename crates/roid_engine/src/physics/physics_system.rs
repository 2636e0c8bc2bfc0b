//! Fixed-timestep physics system
//!
//! Based on Game Engine Architecture 3rd Edition, Chapter 13: each tick
//! runs broad phase, narrow phase, contact resolution and integration in
//! that order. Frame time is fed through an accumulator so the tick length
//! never depends on frame rate.

use std::collections::HashSet;
use std::time::Duration;

use log::{debug, info, trace};

use crate::ecs::{Entity, Registry, System};
use crate::foundation::time::FixedTimestep;
use crate::spatial::{AllPairs, BroadPhase, Proxy};
use super::collision::collide;
use super::resolver::{self, DEFAULT_PROJECTION_SLOP};
use super::{
    Collider, CollisionData, CollisionEvent, CollisionEventQueue, InvariantPolicy,
    PhysicsConfig, PhysicsError, Rigidbody,
};

/// Default tick length, 1/120 s
pub const DEFAULT_UPDATE_TIME: Duration = Duration::from_nanos(1_000_000_000 / 120);

/// Unordered entity pair, stored with the smaller handle first
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct CollisionPair {
    /// Smaller handle
    pub entity_a: Entity,
    /// Larger handle
    pub entity_b: Entity,
}

impl CollisionPair {
    /// Create a new collision pair (always stores the smaller handle first)
    pub fn new(entity_a: Entity, entity_b: Entity) -> Self {
        if entity_a < entity_b {
            Self { entity_a, entity_b }
        } else {
            Self { entity_a: entity_b, entity_b: entity_a }
        }
    }

    /// True if `entity` is one of the two
    pub fn contains(&self, entity: Entity) -> bool {
        self.entity_a == entity || self.entity_b == entity
    }
}

/// Counters for the most recent [`PhysicsSystem::update`] call
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PhysicsStats {
    /// Fixed ticks run
    pub ticks: u32,
    /// Pairs produced by the broad phase, duplicates included
    pub candidate_pairs: usize,
    /// Pairs left after de-duplication
    pub unique_pairs: usize,
    /// Pairs that passed the layer filter and reached a shape test
    pub narrow_phase_tests: usize,
    /// Confirmed contacts
    pub contacts: usize,
    /// Collision events delivered
    pub events: usize,
    /// Invariant violations reported under the lenient policy
    pub invariant_violations: usize,
}

struct Contact {
    a: Entity,
    b: Entity,
    data: CollisionData,
    restitution: f32,
}

/// Physics orchestrator
///
/// Owns the fixed-step accumulator and the per-tick scratch buffers. All
/// body and collider state lives in the registry.
pub struct PhysicsSystem {
    timestep: FixedTimestep,
    broad_phase: Box<dyn BroadPhase>,
    projection_slop: f32,
    policy: InvariantPolicy,
    check_finite_state: bool,

    proxies: Vec<Proxy>,
    raw_pairs: Vec<(Entity, Entity)>,
    seen_pairs: HashSet<CollisionPair>,
    contacts: Vec<Contact>,
    queue: CollisionEventQueue,

    events: Vec<CollisionEvent>,
    frame_pairs: HashSet<CollisionPair>,
    current_pairs: HashSet<CollisionPair>,
    previous_pairs: HashSet<CollisionPair>,
    stats: PhysicsStats,
}

impl Default for PhysicsSystem {
    fn default() -> Self {
        Self::new(DEFAULT_UPDATE_TIME)
    }
}

impl PhysicsSystem {
    /// Create a system ticking every `update_time`, using the all-pairs
    /// broad phase
    ///
    /// # Panics
    /// Panics if `update_time` is zero.
    pub fn new(update_time: Duration) -> Self {
        debug!("Creating physics system with {update_time:?} ticks");
        Self {
            timestep: FixedTimestep::new(update_time),
            broad_phase: Box::new(AllPairs),
            projection_slop: DEFAULT_PROJECTION_SLOP,
            policy: InvariantPolicy::default(),
            check_finite_state: true,
            proxies: Vec::new(),
            raw_pairs: Vec::new(),
            seen_pairs: HashSet::new(),
            contacts: Vec::new(),
            queue: CollisionEventQueue::new(),
            events: Vec::new(),
            frame_pairs: HashSet::new(),
            current_pairs: HashSet::new(),
            previous_pairs: HashSet::new(),
            stats: PhysicsStats::default(),
        }
    }

    /// Create a system from validated configuration
    pub fn from_config(config: &PhysicsConfig) -> Result<Self, PhysicsError> {
        config.validate()?;

        let mut system = Self::new(config.update_duration());
        system.broad_phase = config.broad_phase.build();
        system.projection_slop = config.projection_slop;
        system.policy = config.invariant_policy;
        system.check_finite_state = config.check_finite_state;

        info!(
            "Physics: {:?} ticks, {} broad phase, {:?} invariants",
            system.update_time(),
            system.broad_phase.name(),
            system.policy
        );
        Ok(system)
    }

    /// Builder: replace the broad phase
    pub fn with_broad_phase(mut self, broad_phase: Box<dyn BroadPhase>) -> Self {
        self.broad_phase = broad_phase;
        self
    }

    /// Builder: set the invariant policy
    pub fn with_invariant_policy(mut self, policy: InvariantPolicy) -> Self {
        self.policy = policy;
        self
    }

    /// Fixed tick length
    pub fn update_time(&self) -> Duration {
        self.timestep.step()
    }

    /// Simulation time carried over to the next frame
    pub fn accumulator(&self) -> Duration {
        self.timestep.accumulator()
    }

    /// Ticks run since creation
    pub fn tick_count(&self) -> u64 {
        self.timestep.total_steps()
    }

    /// Simulated time covered by all ticks
    pub fn simulated_time(&self) -> Duration {
        self.timestep.simulated_time()
    }

    /// Name of the active broad phase
    pub fn broad_phase_name(&self) -> &'static str {
        self.broad_phase.name()
    }

    /// Counters from the last update
    pub fn last_stats(&self) -> &PhysicsStats {
        &self.stats
    }

    /// Collision events delivered during the last update
    pub fn events(&self) -> &[CollisionEvent] {
        &self.events
    }

    /// Take the collision events delivered during the last update
    pub fn drain_events(&mut self) -> Vec<CollisionEvent> {
        std::mem::take(&mut self.events)
    }

    /// Pairs in contact during the last ticking update that were not in
    /// contact during the ticking update before it
    pub fn contacts_started(&self) -> Vec<CollisionPair> {
        self.current_pairs
            .difference(&self.previous_pairs)
            .copied()
            .collect()
    }

    /// Pairs that stopped touching during the last ticking update
    pub fn contacts_ended(&self) -> Vec<CollisionPair> {
        self.previous_pairs
            .difference(&self.current_pairs)
            .copied()
            .collect()
    }

    /// Pairs in contact at any tick of the last ticking update.
    ///
    /// An update that runs no ticks leaves contact tracking untouched.
    pub fn current_contacts(&self) -> &HashSet<CollisionPair> {
        &self.current_pairs
    }

    /// Advance the simulation by `delta` of wall-clock time.
    ///
    /// Runs as many fixed ticks as fit into the accumulated time, then
    /// clears every body's force and torque once.
    pub fn update<R: Registry>(&mut self, registry: &mut R, delta: Duration) {
        self.begin_frame();

        self.timestep.accumulate(delta);
        while self.timestep.try_consume() {
            self.tick(registry);
        }

        registry.for_each_mut::<Rigidbody, _>(|_, body| body.clear_forces());
        self.end_frame();

        trace!(
            "Physics update: {} ticks, {} pairs ({} unique), {} contacts, {} events",
            self.stats.ticks,
            self.stats.candidate_pairs,
            self.stats.unique_pairs,
            self.stats.contacts,
            self.stats.events
        );
    }

    /// Run exactly one fixed tick, bypassing the accumulator. Forces are
    /// left in place. Stats, events and contacts describe this tick alone.
    pub fn step<R: Registry>(&mut self, registry: &mut R) {
        self.begin_frame();
        self.timestep.advance_one();
        self.tick(registry);
        self.end_frame();
    }

    fn begin_frame(&mut self) {
        self.stats = PhysicsStats::default();
        self.events.clear();
        self.frame_pairs.clear();
    }

    /// Contacts only roll over when a tick ran, so frames shorter than one
    /// tick never report ongoing contacts as ended.
    fn end_frame(&mut self) {
        if self.stats.ticks > 0 {
            self.previous_pairs = std::mem::replace(&mut self.current_pairs, std::mem::take(&mut self.frame_pairs));
        }
    }

    fn tick<R: Registry>(&mut self, registry: &mut R) {
        self.stats.ticks += 1;

        self.collect_proxies(registry);
        self.find_pairs();
        self.narrow_phase(registry);
        self.resolve_contacts(registry);
        self.integrate(registry);
        self.dispatch_events(registry);
    }

    fn collect_proxies<R: Registry>(&mut self, registry: &R) {
        self.proxies.clear();
        for entity in registry.view2::<Rigidbody, Collider>() {
            if let (Some(body), Some(collider)) = (registry.get::<Rigidbody>(entity), registry.get::<Collider>(entity)) {
                self.proxies.push(Proxy::new(entity, collider.shape().aabb(body.position())));
            }
        }
    }

    /// Broad phase, then de-duplication into unordered pairs. The first
    /// orientation emitted for a pair is the one kept.
    fn find_pairs(&mut self) {
        self.raw_pairs.clear();
        self.broad_phase.candidate_pairs(&self.proxies, &mut self.raw_pairs);
        self.stats.candidate_pairs += self.raw_pairs.len();

        self.seen_pairs.clear();
        let mut self_pairs = Vec::new();
        let seen = &mut self.seen_pairs;
        self.raw_pairs.retain(|&(a, b)| {
            if a == b {
                self_pairs.push(a);
                return false;
            }
            seen.insert(CollisionPair::new(a, b))
        });

        for entity in self_pairs {
            self.stats.invariant_violations += 1;
            self.policy.violated(&PhysicsError::InvalidPair { entity_a: entity, entity_b: entity });
        }
        self.stats.unique_pairs += self.raw_pairs.len();
    }

    fn narrow_phase<R: Registry>(&mut self, registry: &R) {
        self.contacts.clear();

        for &(a, b) in &self.raw_pairs {
            let (Some(collider_a), Some(collider_b)) = (registry.get::<Collider>(a), registry.get::<Collider>(b)) else {
                continue;
            };
            if !collider_a.can_collide_with(collider_b) {
                continue;
            }
            let (Some(body_a), Some(body_b)) = (registry.get::<Rigidbody>(a), registry.get::<Rigidbody>(b)) else {
                continue;
            };

            self.stats.narrow_phase_tests += 1;
            if let Some(data) = collide(collider_a.shape(), body_a, collider_b.shape(), body_b) {
                self.contacts.push(Contact {
                    a,
                    b,
                    data,
                    restitution: collider_a.restitution().min(collider_b.restitution()),
                });
            }
        }
    }

    fn resolve_contacts<R: Registry>(&mut self, registry: &mut R) {
        for contact in &self.contacts {
            let Some((body_a, body_b)) = registry.get_pair_mut::<Rigidbody>(contact.a, contact.b) else {
                self.stats.invariant_violations += 1;
                self.policy.violated(&PhysicsError::MissingComponent {
                    entity: contact.a,
                    component: "Rigidbody",
                });
                continue;
            };

            let closing_speed = -resolver::relative_normal_velocity(body_a, body_b, &contact.data);
            resolver::resolve_impulse(body_a, body_b, &contact.data, contact.restitution);
            resolver::resolve_projection(body_a, body_b, &contact.data, self.projection_slop);

            self.stats.contacts += 1;
            self.frame_pairs.insert(CollisionPair::new(contact.a, contact.b));
            self.queue.send_pair(CollisionEvent {
                entity: contact.a,
                other: contact.b,
                data: contact.data,
                relative_velocity: closing_speed,
            });
        }
    }

    fn integrate<R: Registry>(&mut self, registry: &mut R) {
        let dt = self.timestep.step_secs();
        let check = self.check_finite_state;
        let mut broken = Vec::new();

        registry.for_each_mut::<Rigidbody, _>(|entity, body| {
            body.integrate(dt);
            if check {
                if let Some(field) = body.non_finite_field() {
                    broken.push(PhysicsError::NonFiniteState { entity, field });
                }
            }
        });

        for error in broken {
            self.stats.invariant_violations += 1;
            self.policy.violated(&error);
        }
    }

    /// Deliver queued events to collider callbacks and the frame log
    fn dispatch_events<R: Registry>(&mut self, registry: &R) {
        for event in self.queue.drain() {
            if let Some(callback) = registry.get::<Collider>(event.entity).and_then(Collider::callback) {
                callback(&event);
            }
            self.stats.events += 1;
            self.events.push(event);
        }
    }
}

impl<R: Registry> System<R> for PhysicsSystem {
    fn update(&mut self, registry: &mut R, delta: Duration) {
        PhysicsSystem::update(self, registry, delta);
    }

    fn name(&self) -> &'static str {
        "PhysicsSystem"
    }
}
