//! Math utilities and types
//!
//! Thin aliases over `nalgebra` used by every physics module, plus the
//! rigid transform used to hand body poses to the renderer.

pub use nalgebra::{
    Vector3,
    Matrix3, Matrix4,
    Quaternion,
    UnitQuaternion,
};

/// 3D vector type
pub type Vec3 = Vector3<f32>;

/// 3x3 matrix type (inertia tensors)
pub type Mat3 = Matrix3<f32>;

/// 4x4 matrix type (homogeneous transforms)
pub type Mat4 = Matrix4<f32>;

/// Unit quaternion used for orientations
pub type Quat = UnitQuaternion<f32>;

/// Unsigned integer vector (grid dimensions)
pub type UVec3 = Vector3<u32>;

/// Signed integer vector (grid cell coordinates)
pub type IVec3 = Vector3<i32>;

/// Rigid transform: position and orientation, no scale.
///
/// Physics bodies never carry scale, so the matrix round trip only has to
/// preserve translation and rotation.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Transform {
    /// Position in world space
    pub position: Vec3,

    /// Orientation
    pub rotation: Quat,
}

impl Default for Transform {
    fn default() -> Self {
        Self {
            position: Vec3::zeros(),
            rotation: Quat::identity(),
        }
    }
}

impl Transform {
    /// Create a transform from position and rotation
    pub fn new(position: Vec3, rotation: Quat) -> Self {
        Self { position, rotation }
    }

    /// Convert to a homogeneous transformation matrix
    pub fn to_matrix(&self) -> Mat4 {
        Mat4::new_translation(&self.position) * self.rotation.to_homogeneous()
    }

    /// Extract position and rotation from a homogeneous matrix.
    ///
    /// Any scale baked into the upper 3x3 block is divided out before the
    /// rotation is recovered.
    pub fn from_matrix(matrix: &Mat4) -> Self {
        let position = Vec3::new(matrix.m14, matrix.m24, matrix.m34);

        let mut basis: Mat3 = matrix.fixed_view::<3, 3>(0, 0).into_owned();
        for mut column in basis.column_iter_mut() {
            let length = column.norm();
            if length > f32::EPSILON {
                column /= length;
            }
        }
        let rotation = Quat::from_matrix(&basis);

        Self { position, rotation }
    }

    /// Apply this transform to a point
    pub fn transform_point(&self, point: Vec3) -> Vec3 {
        self.position + self.rotation * point
    }
}

/// Math constants
pub mod constants {
    /// Pi constant
    pub const PI: f32 = std::f32::consts::PI;

    /// 2 * Pi
    pub const TAU: f32 = 2.0 * PI;
}

/// Math utility functions
pub mod utils {
    use super::Vec3;

    /// True if every component is finite
    pub fn is_finite(v: &Vec3) -> bool {
        v.iter().all(|c| c.is_finite())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_transform_matrix_round_trip() {
        let transform = Transform::new(
            Vec3::new(1.0, -2.0, 3.5),
            Quat::from_axis_angle(&Vector3::y_axis(), 0.7),
        );

        let restored = Transform::from_matrix(&transform.to_matrix());

        assert_relative_eq!(restored.position, transform.position, epsilon = 1e-5);
        assert_relative_eq!(restored.rotation.angle_to(&transform.rotation), 0.0, epsilon = 1e-3);
    }

    #[test]
    fn test_from_matrix_strips_scale() {
        let rotation = Quat::from_axis_angle(&Vector3::z_axis(), 0.3);
        let matrix = Mat4::new_translation(&Vec3::new(4.0, 0.0, 0.0))
            * rotation.to_homogeneous()
            * Mat4::new_nonuniform_scaling(&Vec3::new(2.0, 2.0, 2.0));

        let restored = Transform::from_matrix(&matrix);

        assert_relative_eq!(restored.position, Vec3::new(4.0, 0.0, 0.0), epsilon = 1e-5);
        assert_relative_eq!(restored.rotation.angle_to(&rotation), 0.0, epsilon = 1e-3);
    }

    #[test]
    fn test_transform_point() {
        let transform = Transform::new(
            Vec3::new(0.0, 1.0, 0.0),
            Quat::from_axis_angle(&Vector3::z_axis(), constants::PI * 0.5),
        );

        let moved = transform.transform_point(Vec3::x());

        assert_relative_eq!(moved, Vec3::new(0.0, 2.0, 0.0), epsilon = 1e-5);
    }
}
