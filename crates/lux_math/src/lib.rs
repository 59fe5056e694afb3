//! Lux math - geometry kernel for the Lux renderer.
//!
//! Thin strongly-typed wrappers over `glam` so that points and directions
//! can't be mixed up by accident, plus rays, intervals, bounding boxes and
//! affine transforms.

// Re-export glam for convenience
pub use glam::*;

mod aabb;
mod error;
mod interval;
mod ray;
mod transform;
mod vector;

pub use aabb::Aabb;
pub use error::MathError;
pub use interval::Interval;
pub use ray::Ray;
pub use transform::Transform;
pub use vector::{Direction, Point};

/// Tolerance used for parallel/degenerate checks throughout the renderer.
pub const EPSILON: f32 = 1e-6;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_vec3_creation() {
        let v = Vec3::new(1.0, 2.0, 3.0);
        assert_eq!(v.x, 1.0);
        assert_eq!(v.y, 2.0);
        assert_eq!(v.z, 3.0);
    }

    #[test]
    fn test_point_direction_interop() {
        let p = Point::new(1.0, 2.0, 3.0);
        let q = p + Direction::new(1.0, 0.0, 0.0);
        assert_eq!(q - p, Direction::new(1.0, 0.0, 0.0));
    }
}
