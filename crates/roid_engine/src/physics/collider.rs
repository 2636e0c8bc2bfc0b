//! Collider component and collision shapes
//!
//! Shapes are stored relative to the owning body's centre of mass; the
//! body supplies the world position when the shape is tested.

use std::fmt;
use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::ecs::Component;
use crate::foundation::math::{Mat3, Vec3};
use crate::spatial::Aabb;
use super::{inertia, CollisionEvent, CollisionLayers};

/// Collision shape variants
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum Shape {
    /// Solid sphere
    Sphere {
        /// Radius in world units
        radius: f32,
    },
    /// Containment sphere: bodies are pushed back inside it
    InverseSphere {
        /// Radius of the containing boundary
        radius: f32,
    },
    /// Box with the given half extents
    Cuboid {
        /// Half size along each local axis
        half_size: Vec3,
    },
    /// Infinite plane `dot(normal, p) = distance`
    Plane {
        /// Unit normal
        normal: Vec3,
        /// Offset from the origin along the normal
        distance: f32,
    },
}

impl Shape {
    /// Sphere of `radius`
    pub fn sphere(radius: f32) -> Self {
        Self::Sphere { radius }
    }

    /// Containment sphere of `radius`
    pub fn inverse_sphere(radius: f32) -> Self {
        Self::InverseSphere { radius }
    }

    /// Box with `half_size` extents
    pub fn cuboid(half_size: Vec3) -> Self {
        Self::Cuboid { half_size }
    }

    /// Plane with unit `normal` at `distance` from the origin
    pub fn plane(normal: Vec3, distance: f32) -> Self {
        Self::Plane { normal, distance }
    }

    /// Short name for logging
    pub fn name(&self) -> &'static str {
        match self {
            Self::Sphere { .. } => "sphere",
            Self::InverseSphere { .. } => "inverse_sphere",
            Self::Cuboid { .. } => "cuboid",
            Self::Plane { .. } => "plane",
        }
    }

    /// World-space bounds with the shape centred at `position`.
    ///
    /// An inverse sphere is bounded like a solid one. Cuboids ignore
    /// orientation. Planes are unbounded.
    pub fn aabb(&self, position: Vec3) -> Aabb {
        match *self {
            Self::Sphere { radius } | Self::InverseSphere { radius } => {
                Aabb::from_center_extents(position, Vec3::repeat(radius))
            }
            Self::Cuboid { half_size } => Aabb::from_center_extents(position, half_size),
            Self::Plane { .. } => Aabb::unbounded(),
        }
    }

    /// Body-space inertia tensor for a body of `mass` with this shape.
    ///
    /// Inverse spheres use the thin-shell formula. Planes are meant to be
    /// static and get a unit tensor scaled by mass.
    pub fn inertia_tensor(&self, mass: f32) -> Mat3 {
        match *self {
            Self::Sphere { radius } => inertia::solid_sphere(mass, radius),
            Self::InverseSphere { radius } => inertia::hollow_sphere(mass, radius),
            Self::Cuboid { half_size } => inertia::solid_cuboid(mass, half_size),
            Self::Plane { .. } => Mat3::from_diagonal_element(mass),
        }
    }
}

/// Called once per collision event addressed to the collider's entity
pub type CollisionCallback = Arc<dyn Fn(&CollisionEvent) + Send + Sync>;

/// Collision participation for an entity
#[derive(Clone)]
pub struct Collider {
    shape: Shape,
    restitution: f32,
    layer: CollisionLayers,
    mask: CollisionLayers,
    callback: Option<CollisionCallback>,
}

impl fmt::Debug for Collider {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Collider")
            .field("shape", &self.shape)
            .field("restitution", &self.restitution)
            .field("layer", &self.layer)
            .field("mask", &self.mask)
            .field("callback", &self.callback.is_some())
            .finish()
    }
}

impl Collider {
    /// Collider on every layer, colliding with everything, restitution 0
    pub fn new(shape: Shape) -> Self {
        Self {
            shape,
            restitution: 0.0,
            layer: CollisionLayers::ALL,
            mask: CollisionLayers::ALL,
            callback: None,
        }
    }

    /// Builder: set restitution
    pub fn with_restitution(mut self, restitution: f32) -> Self {
        self.set_restitution(restitution);
        self
    }

    /// Builder: set layer and mask
    pub fn with_layers(mut self, layer: CollisionLayers, mask: CollisionLayers) -> Self {
        self.layer = layer;
        self.mask = mask;
        self
    }

    /// Builder: register a callback
    pub fn with_callback(mut self, callback: impl Fn(&CollisionEvent) + Send + Sync + 'static) -> Self {
        self.set_callback(callback);
        self
    }

    /// Shape
    pub fn shape(&self) -> &Shape {
        &self.shape
    }

    /// Replace the shape
    pub fn set_shape(&mut self, shape: Shape) {
        self.shape = shape;
    }

    /// Restitution coefficient in [0, 1]
    pub fn restitution(&self) -> f32 {
        self.restitution
    }

    /// Set restitution, clamped to [0, 1]
    pub fn set_restitution(&mut self, restitution: f32) {
        self.restitution = restitution.clamp(0.0, 1.0);
    }

    /// Layer bits this collider occupies
    pub fn layer(&self) -> CollisionLayers {
        self.layer
    }

    /// Set the layer bits
    pub fn set_layer(&mut self, layer: CollisionLayers) {
        self.layer = layer;
    }

    /// Layers this collider reacts to
    pub fn mask(&self) -> CollisionLayers {
        self.mask
    }

    /// Set the mask bits
    pub fn set_mask(&mut self, mask: CollisionLayers) {
        self.mask = mask;
    }

    /// True if layers and masks allow `self` and `other` to touch
    pub fn can_collide_with(&self, other: &Collider) -> bool {
        CollisionLayers::should_collide(self.layer, self.mask, other.layer, other.mask)
    }

    /// Register the collision callback, replacing any previous one
    pub fn set_callback(&mut self, callback: impl Fn(&CollisionEvent) + Send + Sync + 'static) {
        self.callback = Some(Arc::new(callback));
    }

    /// Remove the collision callback
    pub fn clear_callback(&mut self) {
        self.callback = None;
    }

    /// Registered callback, if any
    pub fn callback(&self) -> Option<&CollisionCallback> {
        self.callback.as_ref()
    }
}

impl Component for Collider {}
