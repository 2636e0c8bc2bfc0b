//! Spatial partitioning data structures
//!
//! Broad-phase collision detection: turn a set of bounding boxes into a
//! list of entity pairs that might be touching.

mod aabb;
pub mod broad_phase;
pub mod bucket_grid;

pub use aabb::Aabb;
pub use broad_phase::{AllPairs, BroadPhase, BroadPhaseConfig, Proxy};
pub use bucket_grid::BucketGrid;
