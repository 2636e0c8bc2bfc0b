//! Physics configuration

use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::config::Config;
use crate::spatial::BroadPhaseConfig;
use super::resolver::DEFAULT_PROJECTION_SLOP;
use super::{InvariantPolicy, PhysicsError};

/// Tunables for [`PhysicsSystem`](super::PhysicsSystem)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PhysicsConfig {
    /// Fixed tick length in seconds
    pub update_time: f64,
    /// Multiplier on projected penetration
    pub projection_slop: f32,
    /// Check bodies for NaN/infinite state after every tick
    pub check_finite_state: bool,
    /// Reaction to broken invariants
    pub invariant_policy: InvariantPolicy,
    /// Candidate pair generator
    pub broad_phase: BroadPhaseConfig,
}

impl Default for PhysicsConfig {
    fn default() -> Self {
        Self {
            update_time: 1.0 / 120.0,
            projection_slop: DEFAULT_PROJECTION_SLOP,
            check_finite_state: true,
            invariant_policy: InvariantPolicy::default(),
            broad_phase: BroadPhaseConfig::AllPairs,
        }
    }
}

impl Config for PhysicsConfig {}

impl PhysicsConfig {
    /// Tick length as a [`Duration`]
    ///
    /// # Panics
    /// Panics if `update_time` is negative or not finite. Call
    /// [`PhysicsConfig::validate`] first.
    pub fn update_duration(&self) -> Duration {
        Duration::from_secs_f64(self.update_time)
    }

    /// Reject values the simulation cannot run with
    pub fn validate(&self) -> Result<(), PhysicsError> {
        if !self.update_time.is_finite() || self.update_time <= 0.0 {
            return Err(PhysicsError::InvalidConfig(format!(
                "update_time must be positive, got {}",
                self.update_time
            )));
        }
        if self.update_duration().is_zero() {
            return Err(PhysicsError::InvalidConfig(format!(
                "update_time {} rounds to zero",
                self.update_time
            )));
        }
        if !self.projection_slop.is_finite() || self.projection_slop < 1.0 {
            return Err(PhysicsError::InvalidConfig(format!(
                "projection_slop must be at least 1, got {}",
                self.projection_slop
            )));
        }
        if let BroadPhaseConfig::BucketGrid { cell_size, bucket_count } = &self.broad_phase {
            if !cell_size.iter().all(|c| c.is_finite() && *c > 0.0) {
                return Err(PhysicsError::InvalidConfig(format!(
                    "bucket grid cell size must be positive, got {cell_size:?}"
                )));
            }
            if bucket_count.iter().any(|&c| c == 0) {
                return Err(PhysicsError::InvalidConfig(format!(
                    "bucket grid needs at least one bucket per axis, got {bucket_count:?}"
                )));
            }
        }
        Ok(())
    }
}
