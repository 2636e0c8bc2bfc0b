//! Collision layer system for filtering collision detection
//!
//! Based on Game Engine Architecture 3rd Edition, Section 13.3.8:
//! "Most games need to filter collisions... This is typically done via
//! collision layers or groups."

use serde::{Deserialize, Serialize};

bitflags::bitflags! {
    /// Layer and mask bits carried by every collider
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
    #[serde(transparent)]
    pub struct CollisionLayers: u32 {
        /// Player ship
        const PLAYER = 1 << 0;
        /// Asteroids and their fragments
        const ASTEROID = 1 << 1;
        /// Laser bolts
        const LASER = 1 << 2;
        /// Pickups
        const POWER_UP = 1 << 3;
        /// World bounds
        const BOUNDARY = 1 << 4;

        // Bits 5-31 are free for game-specific layers.
        const _ = !0;
    }
}

impl CollisionLayers {
    /// Every bit set
    pub const ALL: Self = Self::from_bits_retain(u32::MAX);

    /// Check if two colliders should collide based on their layers and masks
    ///
    /// A's layer must be in B's mask AND B's layer must be in A's mask.
    ///
    /// # Example
    /// ```
    /// use roid_engine::physics::CollisionLayers;
    ///
    /// let ship = (CollisionLayers::PLAYER, CollisionLayers::ASTEROID);
    /// let rock = (CollisionLayers::ASTEROID, CollisionLayers::ALL);
    ///
    /// assert!(CollisionLayers::should_collide(ship.0, ship.1, rock.0, rock.1));
    /// ```
    pub fn should_collide(layer_a: Self, mask_a: Self, layer_b: Self, mask_b: Self) -> bool {
        layer_a.intersects(mask_b) && layer_b.intersects(mask_a)
    }
}

impl Default for CollisionLayers {
    fn default() -> Self {
        Self::ALL
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_should_collide_mutual() {
        assert!(CollisionLayers::should_collide(
            CollisionLayers::PLAYER, CollisionLayers::ASTEROID,
            CollisionLayers::ASTEROID, CollisionLayers::PLAYER,
        ));
    }

    #[test]
    fn test_should_not_collide_one_way() {
        // Player wants the asteroid, but the asteroid only listens to lasers
        assert!(!CollisionLayers::should_collide(
            CollisionLayers::PLAYER, CollisionLayers::ASTEROID,
            CollisionLayers::ASTEROID, CollisionLayers::LASER,
        ));
    }

    #[test]
    fn test_empty_mask_never_collides() {
        assert!(!CollisionLayers::should_collide(
            CollisionLayers::ALL, CollisionLayers::empty(),
            CollisionLayers::ALL, CollisionLayers::ALL,
        ));
    }

    #[test]
    fn test_custom_bits_survive() {
        let custom = CollisionLayers::from_bits_retain(1 << 20);
        assert!(CollisionLayers::should_collide(
            custom, CollisionLayers::ALL,
            CollisionLayers::PLAYER, custom,
        ));
    }
}
