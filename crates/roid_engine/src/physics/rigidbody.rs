//! Rigid body state and semi-implicit Euler integration
//!
//! A body carries mass, inertia, pose and velocity plus force and torque
//! accumulators. Gameplay code pushes forces in between frames; the physics
//! system integrates every fixed tick and clears the accumulators once per
//! frame.

use crate::ecs::Component;
use crate::foundation::math::{utils, Mat3, Mat4, Quat, Quaternion, Transform, Vec3};
use super::PhysicsError;

/// Lightest mass a finite body can have
pub const MIN_MASS: f32 = 0.01;

/// Heaviest mass a finite body can have
pub const MAX_MASS: f32 = 10_000.0;

/// Per-entity rigid body
#[derive(Debug, Clone, PartialEq)]
pub struct Rigidbody {
    inverse_mass: f32,
    local_inertia: Mat3,
    inverse_local_inertia: Mat3,

    position: Vec3,
    orientation: Quat,
    velocity: Vec3,
    angular_velocity: Vec3,

    linear_damping: f32,
    angular_damping: f32,
    linear_factor: Vec3,
    angular_factor: Vec3,

    force: Vec3,
    torque: Vec3,
}

impl Default for Rigidbody {
    fn default() -> Self {
        Self::new(1.0)
    }
}

impl Rigidbody {
    /// Create a body at the origin with the given mass and unit inertia.
    /// Damping defaults to 1 (no decay).
    pub fn new(mass: f32) -> Self {
        let mut body = Self {
            inverse_mass: 1.0,
            local_inertia: Mat3::identity(),
            inverse_local_inertia: Mat3::identity(),
            position: Vec3::zeros(),
            orientation: Quat::identity(),
            velocity: Vec3::zeros(),
            angular_velocity: Vec3::zeros(),
            linear_damping: 1.0,
            angular_damping: 1.0,
            linear_factor: Vec3::repeat(1.0),
            angular_factor: Vec3::repeat(1.0),
            force: Vec3::zeros(),
            torque: Vec3::zeros(),
        };
        body.set_mass(mass);
        body
    }

    /// Create an immovable body
    pub fn new_static() -> Self {
        let mut body = Self::new(1.0);
        body.set_infinite_mass();
        body
    }

    /// Builder: set position
    pub fn with_position(mut self, position: Vec3) -> Self {
        self.position = position;
        self
    }

    /// Builder: set velocity
    pub fn with_velocity(mut self, velocity: Vec3) -> Self {
        self.velocity = velocity;
        self
    }

    /// Builder: set the local inertia tensor
    pub fn with_inertia(mut self, tensor: Mat3) -> Self {
        self.set_local_inertia_tensor(tensor);
        self
    }

    /// Builder: set linear and angular damping
    pub fn with_damping(mut self, linear: f32, angular: f32) -> Self {
        self.set_linear_damping(linear);
        self.set_angular_damping(angular);
        self
    }

    // -- Mass and inertia --

    /// Set the mass, clamped to [`MIN_MASS`, `MAX_MASS`]
    pub fn set_mass(&mut self, mass: f32) {
        self.inverse_mass = 1.0 / mass.clamp(MIN_MASS, MAX_MASS);
    }

    /// Make the body immovable by forces and impulses
    pub fn set_infinite_mass(&mut self) {
        self.inverse_mass = 0.0;
    }

    /// True if the inverse mass is zero
    pub fn has_infinite_mass(&self) -> bool {
        self.inverse_mass == 0.0
    }

    /// Mass of the body. Fails for infinite-mass bodies.
    pub fn mass(&self) -> Result<f32, PhysicsError> {
        if self.has_infinite_mass() {
            Err(PhysicsError::InfiniteMass)
        } else {
            Ok(1.0 / self.inverse_mass)
        }
    }

    /// Inverse mass (0 for infinite mass)
    pub fn inverse_mass(&self) -> f32 {
        self.inverse_mass
    }

    /// Set the body-space inertia tensor, usually from [`inertia`] helpers
    pub fn set_local_inertia_tensor(&mut self, tensor: Mat3) {
        self.local_inertia = tensor;
        self.inverse_local_inertia = tensor.try_inverse().unwrap_or_else(Mat3::zeros);
    }

    /// Body-space inertia tensor
    pub fn local_inertia_tensor(&self) -> Mat3 {
        self.local_inertia
    }

    /// World-space inverse inertia tensor, `R · I⁻¹ · Rᵀ`, or zero for
    /// infinite-mass bodies
    pub fn inverse_inertia_tensor(&self) -> Mat3 {
        if self.has_infinite_mass() {
            return Mat3::zeros();
        }
        let rotation = self.orientation.to_rotation_matrix();
        rotation.matrix() * self.inverse_local_inertia * rotation.matrix().transpose()
    }

    // -- Pose and velocity --

    /// Position of the centre of mass
    pub fn position(&self) -> Vec3 {
        self.position
    }

    /// Set position
    pub fn set_position(&mut self, position: Vec3) {
        self.position = position;
    }

    /// Orientation
    pub fn orientation(&self) -> Quat {
        self.orientation
    }

    /// Set orientation
    pub fn set_orientation(&mut self, orientation: Quat) {
        self.orientation = orientation;
    }

    /// Linear velocity
    pub fn velocity(&self) -> Vec3 {
        self.velocity
    }

    /// Set linear velocity
    pub fn set_velocity(&mut self, velocity: Vec3) {
        self.velocity = velocity;
    }

    /// Angular velocity in world space
    pub fn angular_velocity(&self) -> Vec3 {
        self.angular_velocity
    }

    /// Set angular velocity. The rate is in world space, not the body frame.
    pub fn set_angular_velocity(&mut self, angular_velocity: Vec3) {
        self.angular_velocity = angular_velocity;
    }

    /// Velocity of a point at `relative_point` from the centre of mass
    pub fn point_velocity(&self, relative_point: Vec3) -> Vec3 {
        self.velocity + self.angular_velocity.cross(&relative_point)
    }

    /// Pose as a homogeneous matrix, for rendering
    pub fn transform(&self) -> Mat4 {
        self.pose().to_matrix()
    }

    /// Set position and orientation from a homogeneous matrix
    pub fn set_transform(&mut self, matrix: &Mat4) {
        let pose = Transform::from_matrix(matrix);
        self.position = pose.position;
        self.orientation = pose.rotation;
    }

    /// Position and orientation
    pub fn pose(&self) -> Transform {
        Transform::new(self.position, self.orientation)
    }

    // -- Damping and axis locks --

    /// Linear damping factor applied every tick
    pub fn linear_damping(&self) -> f32 {
        self.linear_damping
    }

    /// Set linear damping, clamped to [0, 1]. 1 keeps all velocity.
    pub fn set_linear_damping(&mut self, damping: f32) {
        self.linear_damping = damping.clamp(0.0, 1.0);
    }

    /// Angular damping factor applied every tick
    pub fn angular_damping(&self) -> f32 {
        self.angular_damping
    }

    /// Set angular damping, clamped to [0, 1]
    pub fn set_angular_damping(&mut self, damping: f32) {
        self.angular_damping = damping.clamp(0.0, 1.0);
    }

    /// Per-axis mask for forces and linear impulses
    pub fn linear_factor(&self) -> Vec3 {
        self.linear_factor
    }

    /// Set the linear mask; a zero component locks that axis
    pub fn set_linear_factor(&mut self, factor: Vec3) {
        self.linear_factor = factor;
    }

    /// Per-axis mask for torques and angular impulses
    pub fn angular_factor(&self) -> Vec3 {
        self.angular_factor
    }

    /// Set the angular mask
    pub fn set_angular_factor(&mut self, factor: Vec3) {
        self.angular_factor = factor;
    }

    // -- Forces and impulses --

    /// Accumulated force
    pub fn force(&self) -> Vec3 {
        self.force
    }

    /// Accumulated torque
    pub fn torque(&self) -> Vec3 {
        self.torque
    }

    /// Accumulate a force through the centre of mass
    pub fn add_force(&mut self, force: Vec3) {
        self.force += force.component_mul(&self.linear_factor);
    }

    /// Accumulate a torque
    pub fn add_torque(&mut self, torque: Vec3) {
        self.torque += torque.component_mul(&self.angular_factor);
    }

    /// Accumulate a force applied at `relative_point` from the centre of
    /// mass, producing both force and torque
    pub fn add_force_at_point(&mut self, force: Vec3, relative_point: Vec3) {
        self.add_force(force);
        self.add_torque(relative_point.cross(&force.component_mul(&self.linear_factor)));
    }

    /// Zero the force and torque accumulators
    pub fn clear_forces(&mut self) {
        self.force = Vec3::zeros();
        self.torque = Vec3::zeros();
    }

    /// Change velocity immediately by `impulse / mass`
    pub fn apply_impulse(&mut self, impulse: Vec3) {
        self.velocity += impulse.component_mul(&self.linear_factor) * self.inverse_mass;
    }

    /// Change angular velocity immediately by `I⁻¹ · impulse`
    pub fn apply_angular_impulse(&mut self, impulse: Vec3) {
        let delta = self.inverse_inertia_tensor() * impulse;
        self.angular_velocity += delta.component_mul(&self.angular_factor);
    }

    /// Apply an impulse at `relative_point` from the centre of mass.
    /// No-op for infinite-mass bodies.
    pub fn apply_impulse_at_point(&mut self, impulse: Vec3, relative_point: Vec3) {
        if self.has_infinite_mass() {
            return;
        }
        self.apply_impulse(impulse);
        self.apply_angular_impulse(relative_point.cross(&impulse));
    }

    /// Translate by `offset`, masked by the linear factor.
    /// Used by positional correction; velocity is untouched.
    pub fn translate(&mut self, offset: Vec3) {
        self.position += offset.component_mul(&self.linear_factor);
    }

    // -- Integration --

    /// Advance the body by `dt` seconds with semi-implicit Euler.
    ///
    /// Velocity is updated before position. The orientation update is the
    /// first-order `q += ½·ω·q·dt` followed by renormalisation, with `ω` in
    /// world space (applied on the left of `q`).
    pub fn integrate(&mut self, dt: f32) {
        self.velocity += self.force * (self.inverse_mass * dt);
        self.position += self.velocity * dt;
        self.velocity *= self.linear_damping;

        self.angular_velocity += self.inverse_inertia_tensor() * self.torque * dt;

        let w = self.angular_velocity;
        let spin = Quaternion::new(0.0, w.x, w.y, w.z);
        let q = self.orientation.into_inner();
        self.orientation = Quat::new_normalize(q + spin * q * (0.5 * dt));

        self.angular_velocity *= self.angular_damping;
    }

    /// First non-finite quantity in the body's state, if any
    pub fn non_finite_field(&self) -> Option<&'static str> {
        if !utils::is_finite(&self.position) {
            Some("position")
        } else if !utils::is_finite(&self.velocity) {
            Some("velocity")
        } else if !utils::is_finite(&self.angular_velocity) {
            Some("angular velocity")
        } else if !self.orientation.coords.iter().all(|c| c.is_finite()) {
            Some("orientation")
        } else {
            None
        }
    }
}

impl Component for Rigidbody {}

/// Inertia tensors for common solids, in body space
pub mod inertia {
    use crate::foundation::math::{Mat3, Vec3};

    /// Solid sphere: `2/5 · m · r²` on each axis
    pub fn solid_sphere(mass: f32, radius: f32) -> Mat3 {
        Mat3::from_diagonal_element(0.4 * mass * radius * radius)
    }

    /// Thin spherical shell: `2/3 · m · r²` on each axis
    pub fn hollow_sphere(mass: f32, radius: f32) -> Mat3 {
        Mat3::from_diagonal_element(2.0 / 3.0 * mass * radius * radius)
    }

    /// Solid box from its half extents
    pub fn solid_cuboid(mass: f32, half_size: Vec3) -> Mat3 {
        let h = half_size.component_mul(&half_size);
        let k = mass / 3.0;
        Mat3::from_diagonal(&Vec3::new(k * (h.y + h.z), k * (h.x + h.z), k * (h.x + h.y)))
    }
}
