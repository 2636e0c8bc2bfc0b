//! Physics errors and the invariant policy

use serde::{Deserialize, Serialize};

use crate::ecs::{EcsError, Entity};

/// Errors surfaced by the physics API
#[derive(thiserror::Error, Debug, Clone, PartialEq)]
pub enum PhysicsError {
    /// Mass was requested from a body with zero inverse mass
    #[error("body has infinite mass")]
    InfiniteMass,

    /// An entity lacks a component the operation needs
    #[error("entity {entity:?} has no {component} component")]
    MissingComponent {
        /// Entity that was queried
        entity: Entity,
        /// Name of the missing component type
        component: &'static str,
    },

    /// Handle refers to a destroyed entity
    #[error("entity {0:?} is not alive")]
    DeadEntity(Entity),

    /// A body's state contains NaN or infinity
    #[error("entity {entity:?} has non-finite {field}")]
    NonFiniteState {
        /// Offending entity
        entity: Entity,
        /// Which quantity went non-finite
        field: &'static str,
    },

    /// Configuration values are out of range
    #[error("invalid physics configuration: {0}")]
    InvalidConfig(String),

    /// The broad phase produced a pair that cannot be a contact
    #[error("invalid collision pair {entity_a:?}, {entity_b:?}")]
    InvalidPair {
        /// First entity of the pair
        entity_a: Entity,
        /// Second entity of the pair
        entity_b: Entity,
    },
}

impl From<EcsError> for PhysicsError {
    fn from(error: EcsError) -> Self {
        match error {
            EcsError::DeadEntity(entity) => Self::DeadEntity(entity),
        }
    }
}

/// What to do when the simulation hits a broken invariant
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum InvariantPolicy {
    /// Panic immediately
    Strict,
    /// Log the violation and skip the offending item
    Lenient,
}

impl Default for InvariantPolicy {
    fn default() -> Self {
        if cfg!(debug_assertions) {
            Self::Strict
        } else {
            Self::Lenient
        }
    }
}

impl InvariantPolicy {
    /// Report a violation. Returns normally only under [`InvariantPolicy::Lenient`].
    ///
    /// # Panics
    /// Panics under [`InvariantPolicy::Strict`].
    pub fn violated(self, error: &PhysicsError) {
        match self {
            Self::Strict => panic!("physics invariant violated: {error}"),
            Self::Lenient => log::error!("physics invariant violated: {error}"),
        }
    }
}
