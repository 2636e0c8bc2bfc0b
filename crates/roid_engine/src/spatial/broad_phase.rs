//! Broad-phase collision detection interface
//!
//! Based on Game Engine Architecture 3rd Edition, Section 13.3.2:
//! "The broad phase quickly identifies pairs of objects that might be
//! colliding." Implementations only promise a superset of the touching
//! pairs; the narrow phase decides.

use serde::{Deserialize, Serialize};

use crate::ecs::Entity;
use crate::foundation::math::{UVec3, Vec3};
use super::{Aabb, BucketGrid};

/// One collider as seen by the broad phase
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Proxy {
    /// Owning entity
    pub entity: Entity,
    /// World-space bounds at the start of the tick
    pub aabb: Aabb,
}

impl Proxy {
    /// Create a proxy
    pub fn new(entity: Entity, aabb: Aabb) -> Self {
        Self { entity, aabb }
    }
}

/// Swappable broad-phase strategy
///
/// Called once per physics tick with every collider-bearing entity. The
/// structure is rebuilt from scratch on each call; nothing is cached
/// between ticks.
pub trait BroadPhase: Send + Sync {
    /// Append candidate pairs for `proxies` to `out`
    ///
    /// A pair may appear more than once and in either order; callers that
    /// need unique pairs must de-duplicate.
    fn candidate_pairs(&mut self, proxies: &[Proxy], out: &mut Vec<(Entity, Entity)>);

    /// Short name for logging
    fn name(&self) -> &'static str;
}

/// O(n²) reference scan. Emits every unordered pair exactly once.
#[derive(Debug, Default, Clone, Copy)]
pub struct AllPairs;

impl BroadPhase for AllPairs {
    fn candidate_pairs(&mut self, proxies: &[Proxy], out: &mut Vec<(Entity, Entity)>) {
        for (i, a) in proxies.iter().enumerate() {
            for b in &proxies[i + 1..] {
                out.push((a.entity, b.entity));
            }
        }
    }

    fn name(&self) -> &'static str {
        "all_pairs"
    }
}

/// Serializable selection of a broad-phase strategy
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub enum BroadPhaseConfig {
    /// Pairwise scan over every collider
    #[default]
    AllPairs,
    /// Wrap-around uniform grid
    BucketGrid {
        /// Size of one grid cell in world units
        cell_size: Vec3,
        /// Number of buckets along each axis before wrapping
        bucket_count: UVec3,
    },
}

impl BroadPhaseConfig {
    /// Instantiate the configured strategy
    pub fn build(&self) -> Box<dyn BroadPhase> {
        match self {
            Self::AllPairs => Box::new(AllPairs),
            Self::BucketGrid { cell_size, bucket_count } => {
                Box::new(BucketGrid::new(*cell_size, *bucket_count))
            }
        }
    }
}
