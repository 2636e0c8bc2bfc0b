//! Uniform bucket grid with wrap-around addressing
//!
//! World space is cut into cells of `cell_size`. A cell maps to a bucket by
//! taking its coordinates modulo `bucket_count` on each axis, so the grid
//! covers unbounded space with a fixed number of buckets. Cells that are a
//! multiple of `bucket_count` apart alias to the same bucket, which only
//! ever adds false candidates.

use log::warn;

use crate::ecs::Entity;
use crate::foundation::math::{IVec3, UVec3, Vec3};
use super::{Aabb, BroadPhase, Proxy};

/// Broad phase over a toroidal grid of entity buckets
///
/// Rebuilt from scratch on every [`BroadPhase::candidate_pairs`] call.
#[derive(Debug, Clone)]
pub struct BucketGrid {
    cell_size: Vec3,
    bucket_count: UVec3,
    buckets: Vec<Vec<Entity>>,
}

impl BucketGrid {
    /// Create an empty grid
    ///
    /// # Panics
    /// Panics if a cell dimension is not positive and finite, or if any axis
    /// has zero buckets. `PhysicsConfig::validate` rejects both.
    pub fn new(cell_size: Vec3, bucket_count: UVec3) -> Self {
        assert!(
            cell_size.iter().all(|c| c.is_finite() && *c > 0.0),
            "bucket grid cell size must be positive, got {cell_size:?}"
        );
        assert!(
            bucket_count.iter().all(|&c| c > 0),
            "bucket grid needs at least one bucket per axis, got {bucket_count:?}"
        );

        let total = bucket_count.iter().map(|&c| c as usize).product();
        Self {
            cell_size,
            bucket_count,
            buckets: vec![Vec::new(); total],
        }
    }

    /// Cell size in world units
    pub fn cell_size(&self) -> Vec3 {
        self.cell_size
    }

    /// Buckets per axis
    pub fn bucket_count(&self) -> UVec3 {
        self.bucket_count
    }

    /// Cell containing `point`
    pub fn cell_of(&self, point: Vec3) -> IVec3 {
        point
            .component_div(&self.cell_size)
            .map(|c| c.floor() as i32)
    }

    /// Linear bucket index for a cell, wrapping each axis
    pub fn bucket_index(&self, cell: IVec3) -> usize {
        self.wrapped_index([i64::from(cell.x), i64::from(cell.y), i64::from(cell.z)])
    }

    fn wrapped_index(&self, cell: [i64; 3]) -> usize {
        let wrap = |axis: usize| cell[axis].rem_euclid(i64::from(self.bucket_count[axis])) as usize;
        let (nx, ny) = (self.bucket_count.x as usize, self.bucket_count.y as usize);
        wrap(0) + nx * (wrap(1) + ny * wrap(2))
    }

    /// Indices of every bucket the box overlaps.
    ///
    /// A box wider than the grid on some axis covers that axis once, so an
    /// entity never lands in the same bucket twice.
    fn covered_buckets(&self, aabb: &Aabb) -> Vec<usize> {
        let lo = self.cell_of(aabb.min);
        let hi = self.cell_of(aabb.max);

        let span = |axis: usize| {
            let cells = i64::from(hi[axis]) - i64::from(lo[axis]) + 1;
            cells.clamp(1, i64::from(self.bucket_count[axis]))
        };
        let (sx, sy, sz) = (span(0), span(1), span(2));

        let mut indices = Vec::with_capacity((sx * sy * sz) as usize);
        for dz in 0..sz {
            for dy in 0..sy {
                for dx in 0..sx {
                    indices.push(self.wrapped_index([
                        i64::from(lo.x) + dx,
                        i64::from(lo.y) + dy,
                        i64::from(lo.z) + dz,
                    ]));
                }
            }
        }
        indices
    }

    /// Empty every bucket, keeping allocations
    pub fn clear(&mut self) {
        for bucket in &mut self.buckets {
            bucket.clear();
        }
    }

    /// Insert an entity into every bucket its box overlaps.
    ///
    /// Returns `false` (and inserts nothing) for non-finite boxes.
    pub fn insert(&mut self, entity: Entity, aabb: &Aabb) -> bool {
        if !aabb.is_finite() {
            return false;
        }
        for index in self.covered_buckets(aabb) {
            self.buckets[index].push(entity);
        }
        true
    }

    /// Discard the grid contents and index `proxies`
    pub fn rebuild(&mut self, proxies: &[Proxy]) {
        self.clear();

        let skipped = proxies
            .iter()
            .filter(|proxy| !self.insert(proxy.entity, &proxy.aabb))
            .count();
        if skipped > 0 {
            warn!("Bucket grid skipped {skipped} unbounded collider(s)");
        }
    }

    /// Entities sharing at least one bucket with `aabb`, without repeats
    pub fn query_aabb(&self, aabb: &Aabb) -> Vec<Entity> {
        if !aabb.is_finite() {
            return Vec::new();
        }
        let mut found: Vec<Entity> = self
            .covered_buckets(aabb)
            .into_iter()
            .flat_map(|index| self.buckets[index].iter().copied())
            .collect();
        found.sort_unstable();
        found.dedup();
        found
    }

    /// Contents of one bucket
    pub fn bucket(&self, index: usize) -> &[Entity] {
        self.buckets.get(index).map(Vec::as_slice).unwrap_or_default()
    }

    /// Number of buckets holding at least one entity
    pub fn occupied_buckets(&self) -> usize {
        self.buckets.iter().filter(|b| !b.is_empty()).count()
    }
}

impl BroadPhase for BucketGrid {
    /// Emits `(this, other)` for every other entity in every bucket `this`
    /// covers. A pair sharing several buckets is emitted once per shared
    /// bucket and in both orders.
    fn candidate_pairs(&mut self, proxies: &[Proxy], out: &mut Vec<(Entity, Entity)>) {
        self.rebuild(proxies);

        for proxy in proxies.iter().filter(|p| p.aabb.is_finite()) {
            for index in self.covered_buckets(&proxy.aabb) {
                out.extend(
                    self.buckets[index]
                        .iter()
                        .filter(|&&other| other != proxy.entity)
                        .map(|&other| (proxy.entity, other)),
                );
            }
        }
    }

    fn name(&self) -> &'static str {
        "bucket_grid"
    }
}
