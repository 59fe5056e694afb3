// Affine transforms for points and directions.
//
// Wraps glam::Mat4 so that points pick up translation and directions don't.

use crate::{Direction, Point};
use glam::{Mat4, Vec3, Vec4};

/// An affine transform in homogeneous coordinates.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Transform {
    matrix: Mat4,
}

impl Transform {
    pub const IDENTITY: Transform = Transform {
        matrix: Mat4::IDENTITY,
    };

    pub fn from_matrix(matrix: Mat4) -> Self {
        Self { matrix }
    }

    pub fn translate(offset: Direction) -> Self {
        Self::from_matrix(Mat4::from_translation(offset.to_vec3()))
    }

    /// Rotation about the X axis by `theta` radians.
    pub fn rotate_x(theta: f32) -> Self {
        Self::from_matrix(Mat4::from_rotation_x(theta))
    }

    /// Rotation about the Y axis by `theta` radians.
    pub fn rotate_y(theta: f32) -> Self {
        Self::from_matrix(Mat4::from_rotation_y(theta))
    }

    /// Rotation about the Z axis by `theta` radians.
    pub fn rotate_z(theta: f32) -> Self {
        Self::from_matrix(Mat4::from_rotation_z(theta))
    }

    pub fn scale(x: f32, y: f32, z: f32) -> Self {
        Self::from_matrix(Mat4::from_scale(Vec3::new(x, y, z)))
    }

    /// Local-to-world transform of the frame with origin `origin` and axes
    /// `u`, `v`, `w` (local X, Y, Z).
    pub fn from_frame(origin: Point, u: Direction, v: Direction, w: Direction) -> Self {
        Self::from_matrix(Mat4::from_cols(
            u.to_vec3().extend(0.0),
            v.to_vec3().extend(0.0),
            w.to_vec3().extend(0.0),
            origin.to_vec3().extend(1.0),
        ))
    }

    /// Apply `self` first, then `next`.
    pub fn then(&self, next: &Transform) -> Transform {
        Self::from_matrix(next.matrix * self.matrix)
    }

    pub fn inverse(&self) -> Transform {
        Self::from_matrix(self.matrix.inverse())
    }

    /// Transform a point (implicit w=1, translation applies).
    #[inline]
    pub fn apply_point(&self, point: Point) -> Point {
        Point::from_vec3(self.matrix.transform_point3(point.to_vec3()))
    }

    /// Transform a direction (implicit w=0, translation is ignored).
    #[inline]
    pub fn apply_direction(&self, direction: Direction) -> Direction {
        let v4 = self.matrix * Vec4::new(direction.x(), direction.y(), direction.z(), 0.0);
        Direction::new(v4.x, v4.y, v4.z)
    }

    pub fn matrix(&self) -> Mat4 {
        self.matrix
    }
}

impl Default for Transform {
    fn default() -> Self {
        Self::IDENTITY
    }
}
