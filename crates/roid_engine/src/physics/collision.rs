//! Narrow-phase shape tests
//!
//! The shape set is closed, so the pair table is one exhaustive `match`.
//! Mirrored entries are derived by swapping the operands and flipping the
//! result. Pairs without an entry report no contact.

use crate::foundation::math::Vec3;
use super::{Rigidbody, Shape};

/// A confirmed contact between two shapes
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CollisionData {
    /// Contact point in world space
    pub point: Vec3,
    /// Unit normal pointing from the first shape toward the second
    pub normal: Vec3,
    /// Overlap depth, never negative
    pub penetration: f32,
}

impl CollisionData {
    /// Create contact data
    pub fn new(point: Vec3, normal: Vec3, penetration: f32) -> Self {
        Self { point, normal, penetration }
    }

    /// Re-express a contact computed with swapped operands.
    ///
    /// The normal is reversed and the point is pushed along the new normal
    /// by the penetration depth.
    pub fn flipped(self) -> Self {
        let normal = -self.normal;
        Self {
            point: self.point + normal * self.penetration,
            normal,
            penetration: self.penetration,
        }
    }
}

/// Test two shapes owned by `body_a` and `body_b`.
///
/// Only positions are used; sphere tests ignore orientation.
pub fn collide(shape_a: &Shape, body_a: &Rigidbody, shape_b: &Shape, body_b: &Rigidbody) -> Option<CollisionData> {
    collide_at(shape_a, body_a.position(), shape_b, body_b.position())
}

/// Test two shapes centred at the given world positions
pub fn collide_at(shape_a: &Shape, pos_a: Vec3, shape_b: &Shape, pos_b: Vec3) -> Option<CollisionData> {
    match (*shape_a, *shape_b) {
        (Shape::Sphere { radius: r1 }, Shape::Sphere { radius: r2 }) => {
            sphere_sphere(pos_a, r1, pos_b, r2)
        }
        (Shape::InverseSphere { radius: r1 }, Shape::Sphere { radius: r2 }) => {
            inverse_sphere_sphere(pos_a, r1, pos_b, r2)
        }
        (Shape::Sphere { .. }, Shape::InverseSphere { .. }) => {
            collide_at(shape_b, pos_b, shape_a, pos_a).map(CollisionData::flipped)
        }
        (Shape::InverseSphere { .. }, Shape::InverseSphere { .. })
        | (Shape::Cuboid { .. }, _)
        | (_, Shape::Cuboid { .. })
        | (Shape::Plane { .. }, _)
        | (_, Shape::Plane { .. }) => None,
    }
}

fn sphere_sphere(pos1: Vec3, r1: f32, pos2: Vec3, r2: f32) -> Option<CollisionData> {
    let offset = pos2 - pos1;
    let distance = offset.norm();

    if distance == 0.0 || distance >= r1 + r2 {
        return None;
    }

    let penetration = r1 + r2 - distance;
    let normal = offset / distance;
    Some(CollisionData::new(pos1 + normal * (r1 - penetration), normal, penetration))
}

/// `pos1`/`r1` is the containing boundary, `pos2`/`r2` the contained sphere
fn inverse_sphere_sphere(pos1: Vec3, r1: f32, pos2: Vec3, r2: f32) -> Option<CollisionData> {
    let offset = pos2 - pos1;
    let distance = offset.norm();

    if distance == 0.0 || distance <= r1 - r2 {
        return None;
    }

    let penetration = distance + r2 - r1;
    let normal = -offset / distance;
    Some(CollisionData::new(pos1 - normal * (r1 + penetration), normal, penetration))
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_spheres_touching_exactly_do_not_collide() {
        let unit = Shape::sphere(1.0);
        assert!(collide_at(&unit, Vec3::zeros(), &unit, Vec3::new(2.0, 0.0, 0.0)).is_none());
    }

    #[test]
    fn test_overlapping_spheres() {
        let unit = Shape::sphere(1.0);
        let data = collide_at(&unit, Vec3::zeros(), &unit, Vec3::new(1.999, 0.0, 0.0)).unwrap();

        assert_relative_eq!(data.penetration, 0.001, epsilon = 1e-5);
        assert_relative_eq!(data.normal, Vec3::x(), epsilon = 1e-6);
        assert_relative_eq!(data.point, Vec3::new(0.999, 0.0, 0.0), epsilon = 1e-5);
    }

    #[test]
    fn test_coincident_spheres_report_nothing() {
        let unit = Shape::sphere(1.0);
        let position = Vec3::new(3.0, -1.0, 2.0);
        assert!(collide_at(&unit, position, &unit, position).is_none());
    }

    #[test]
    fn test_containment_pushes_inward() {
        let bounds = Shape::inverse_sphere(10.0);
        let probe = Shape::sphere(0.1);
        let data = collide_at(&bounds, Vec3::zeros(), &probe, Vec3::new(0.0, 9.95, 0.0)).unwrap();

        assert_relative_eq!(data.penetration, 0.05, epsilon = 1e-4);
        assert_relative_eq!(data.normal, -Vec3::y(), epsilon = 1e-6);
        assert_relative_eq!(data.point, Vec3::new(0.0, 10.05, 0.0), epsilon = 1e-4);
    }

    #[test]
    fn test_contained_sphere_well_inside() {
        let bounds = Shape::inverse_sphere(10.0);
        let probe = Shape::sphere(0.1);
        assert!(collide_at(&bounds, Vec3::zeros(), &probe, Vec3::new(0.0, 5.0, 0.0)).is_none());
    }

    #[test]
    fn test_swapped_containment_flips_normal() {
        let bounds = Shape::inverse_sphere(10.0);
        let probe = Shape::sphere(0.1);
        let position = Vec3::new(0.0, 9.95, 0.0);

        let forward = collide_at(&bounds, Vec3::zeros(), &probe, position).unwrap();
        let swapped = collide_at(&probe, position, &bounds, Vec3::zeros()).unwrap();

        assert_relative_eq!(swapped.normal, -forward.normal, epsilon = 1e-6);
        assert_relative_eq!(swapped.penetration, forward.penetration, epsilon = 1e-6);
        assert_relative_eq!(swapped.point, forward.point + swapped.normal * forward.penetration, epsilon = 1e-5);
    }

    #[test]
    fn test_unimplemented_pairs_report_nothing() {
        let cube = Shape::cuboid(Vec3::repeat(1.0));
        let floor = Shape::plane(Vec3::y(), 0.0);
        let bounds = Shape::inverse_sphere(5.0);
        let ball = Shape::sphere(1.0);

        assert!(collide_at(&cube, Vec3::zeros(), &cube, Vec3::zeros()).is_none());
        assert!(collide_at(&ball, Vec3::zeros(), &floor, Vec3::zeros()).is_none());
        assert!(collide_at(&bounds, Vec3::zeros(), &bounds, Vec3::x()).is_none());
        assert!(collide_at(&cube, Vec3::zeros(), &ball, Vec3::zeros()).is_none());
    }

    #[test]
    fn test_collide_uses_body_positions() {
        let unit = Shape::sphere(1.0);
        let a = Rigidbody::new(1.0);
        let b = Rigidbody::new(1.0).with_position(Vec3::new(0.0, 0.0, 1.5));

        let data = collide(&unit, &a, &unit, &b).unwrap();
        assert_relative_eq!(data.normal, Vec3::z(), epsilon = 1e-6);
    }
}
