//! Contact resolution
//!
//! Two passes per contact: an impulse that fixes the closing velocity, then
//! a positional projection that removes the remaining overlap. No friction.

use super::{CollisionData, Rigidbody};

/// Default multiplier on the projected penetration
pub const DEFAULT_PROJECTION_SLOP: f32 = 1.01;

/// Velocity of the second body's contact point relative to the first's,
/// projected on the normal. Negative while closing.
pub fn relative_normal_velocity(a: &Rigidbody, b: &Rigidbody, contact: &CollisionData) -> f32 {
    let ra = contact.point - a.position();
    let rb = contact.point - b.position();
    (b.point_velocity(rb) - a.point_velocity(ra)).dot(&contact.normal)
}

/// Apply the normal impulse for a contact and return its magnitude.
///
/// Returns 0 without touching either body when they are already
/// separating or both have infinite mass.
pub fn resolve_impulse(a: &mut Rigidbody, b: &mut Rigidbody, contact: &CollisionData, restitution: f32) -> f32 {
    let velocity_along_normal = relative_normal_velocity(a, b, contact);
    if velocity_along_normal >= 0.0 {
        return 0.0;
    }

    let n = contact.normal;
    let ra = contact.point - a.position();
    let rb = contact.point - b.position();

    let angular_a = (a.inverse_inertia_tensor() * ra.cross(&n)).cross(&ra);
    let angular_b = (b.inverse_inertia_tensor() * rb.cross(&n)).cross(&rb);
    let denominator = a.inverse_mass() + b.inverse_mass() + n.dot(&(angular_a + angular_b));
    if denominator <= 0.0 {
        return 0.0;
    }

    let j = -(1.0 + restitution) * velocity_along_normal / denominator;
    let impulse = n * j;

    a.apply_impulse_at_point(-impulse, ra);
    b.apply_impulse_at_point(impulse, rb);
    j
}

/// Push the bodies apart along the normal by `penetration · slop`, split
/// by inverse mass. Velocities are not changed.
pub fn resolve_projection(a: &mut Rigidbody, b: &mut Rigidbody, contact: &CollisionData, slop: f32) {
    let inverse_mass_sum = a.inverse_mass() + b.inverse_mass();
    if inverse_mass_sum == 0.0 {
        return;
    }

    let factor = a.inverse_mass() / inverse_mass_sum;
    let correction = contact.normal * (contact.penetration * slop);

    a.translate(-correction * factor);
    b.translate(correction * (1.0 - factor));
}

/// Impulse followed by projection, with restitution `min(e_a, e_b)`
pub fn resolve(
    a: &mut Rigidbody,
    b: &mut Rigidbody,
    contact: &CollisionData,
    restitution_a: f32,
    restitution_b: f32,
    slop: f32,
) -> f32 {
    let j = resolve_impulse(a, b, contact, restitution_a.min(restitution_b));
    resolve_projection(a, b, contact, slop);
    j
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::foundation::math::Vec3;
    use approx::assert_relative_eq;

    fn head_on() -> (Rigidbody, Rigidbody, CollisionData) {
        let a = Rigidbody::new(1.0)
            .with_position(Vec3::new(-0.999, 0.0, 0.0))
            .with_velocity(Vec3::new(1.0, 0.0, 0.0));
        let b = Rigidbody::new(1.0)
            .with_position(Vec3::new(0.999, 0.0, 0.0))
            .with_velocity(Vec3::new(-1.0, 0.0, 0.0));
        let contact = CollisionData::new(Vec3::new(-0.001, 0.0, 0.0), Vec3::x(), 0.002);
        (a, b, contact)
    }

    #[test]
    fn test_elastic_collision_reverses_velocity() {
        let (mut a, mut b, contact) = head_on();
        let before = relative_normal_velocity(&a, &b, &contact);

        resolve_impulse(&mut a, &mut b, &contact, 1.0);

        let after = relative_normal_velocity(&a, &b, &contact);
        assert_relative_eq!(after, -before, epsilon = 1e-5);
        assert_relative_eq!(a.velocity().x, -1.0, epsilon = 1e-5);
        assert_relative_eq!(b.velocity().x, 1.0, epsilon = 1e-5);
    }

    #[test]
    fn test_inelastic_collision_stops_closing() {
        let (mut a, mut b, contact) = head_on();
        resolve_impulse(&mut a, &mut b, &contact, 0.0);

        assert_relative_eq!(relative_normal_velocity(&a, &b, &contact), 0.0, epsilon = 1e-5);
    }

    #[test]
    fn test_separating_bodies_are_left_alone() {
        let (mut a, mut b, contact) = head_on();
        a.set_velocity(Vec3::new(-1.0, 0.0, 0.0));
        b.set_velocity(Vec3::new(1.0, 0.0, 0.0));

        assert_eq!(resolve_impulse(&mut a, &mut b, &contact, 1.0), 0.0);
        assert_eq!(a.velocity(), Vec3::new(-1.0, 0.0, 0.0));
    }

    #[test]
    fn test_static_body_is_unmoved() {
        let (mut a, _, contact) = head_on();
        let mut wall = Rigidbody::new_static().with_position(Vec3::new(0.999, 0.0, 0.0));

        resolve(&mut a, &mut wall, &contact, 1.0, 1.0, DEFAULT_PROJECTION_SLOP);

        assert_eq!(wall.position(), Vec3::new(0.999, 0.0, 0.0));
        assert_eq!(wall.velocity(), Vec3::zeros());
        assert_relative_eq!(a.velocity().x, -1.0, epsilon = 1e-5);
        assert_relative_eq!(a.position().x, -0.999 - 0.002 * DEFAULT_PROJECTION_SLOP, epsilon = 1e-6);
    }

    #[test]
    fn test_projection_split_by_inverse_mass() {
        let mut light = Rigidbody::new(1.0);
        let mut heavy = Rigidbody::new(3.0).with_position(Vec3::new(1.0, 0.0, 0.0));
        let contact = CollisionData::new(Vec3::new(0.5, 0.0, 0.0), Vec3::x(), 0.4);

        resolve_projection(&mut light, &mut heavy, &contact, 1.0);

        // Inverse masses 1 and 1/3: the light body takes three quarters.
        assert_relative_eq!(light.position().x, -0.3, epsilon = 1e-6);
        assert_relative_eq!(heavy.position().x, 1.1, epsilon = 1e-6);
    }

    #[test]
    fn test_projection_respects_linear_factor() {
        let mut a = Rigidbody::new(1.0);
        a.set_linear_factor(Vec3::new(1.0, 0.0, 1.0));
        let mut b = Rigidbody::new_static().with_position(Vec3::new(0.0, 1.0, 0.0));
        let contact = CollisionData::new(Vec3::new(0.0, 0.5, 0.0), Vec3::y(), 0.5);

        resolve_projection(&mut a, &mut b, &contact, 1.0);
        assert_eq!(a.position(), Vec3::zeros());
    }

    #[test]
    fn test_two_static_bodies_untouched() {
        let mut a = Rigidbody::new_static();
        let mut b = Rigidbody::new_static().with_velocity(Vec3::new(-1.0, 0.0, 0.0));
        let contact = CollisionData::new(Vec3::zeros(), Vec3::x(), 1.0);

        assert_eq!(resolve(&mut a, &mut b, &contact, 1.0, 1.0, DEFAULT_PROJECTION_SLOP), 0.0);
        assert_eq!(a.position(), Vec3::zeros());
        assert_eq!(b.position(), Vec3::zeros());
    }
}
