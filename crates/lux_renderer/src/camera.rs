//! Pinhole camera.

use crate::{render, Image, RenderConfig, RenderError, Scene};
use lux_math::{Direction, MathError, Point, Ray};

/// Pinhole camera defined by an eye point and three image-plane vectors.
///
/// Normalized image coordinate `(u, v)` in `[0, 1]^2` maps to the
/// direction `forward + left * (1 - 2u) + up * (1 - 2v)`, so `(0, 0)` is
/// the top-left corner of the frame. The lengths of `left` and `up` set
/// the half-extents of the image plane at unit distance along `forward`.
#[derive(Debug, Clone, PartialEq)]
pub struct Camera {
    origin: Point,
    forward: Direction,
    up: Direction,
    left: Direction,
    width: u32,
    height: u32,
}

impl Camera {
    /// Fails if `forward` has zero length.
    pub fn new(
        origin: Point,
        forward: Direction,
        up: Direction,
        left: Direction,
        width: u32,
        height: u32,
    ) -> Result<Self, MathError> {
        forward.normalize()?;
        Ok(Self {
            origin,
            forward,
            up,
            left,
            width,
            height,
        })
    }

    /// Camera at `look_from` aimed at `look_at` with a vertical field of
    /// view of `vfov` degrees.
    pub fn look_at(
        look_from: Point,
        look_at: Point,
        vup: Direction,
        vfov: f32,
        width: u32,
        height: u32,
    ) -> Result<Self, MathError> {
        let forward = (look_at - look_from).normalize()?;
        let left = vup
            .cross(forward)
            .normalize()
            .map_err(|_| MathError::DegenerateBasis("view direction is parallel to vup"))?;
        let up = forward.cross(left);

        let half_height = (vfov.to_radians() / 2.0).tan();
        let aspect = width as f32 / height.max(1) as f32;

        Ok(Self {
            origin: look_from,
            forward,
            up: up * half_height,
            left: left * (half_height * aspect),
            width,
            height,
        })
    }

    pub fn origin(&self) -> Point {
        self.origin
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    /// Primary ray through normalized image coordinate `(u, v)`.
    pub fn generate_ray(&self, u: f32, v: f32) -> Ray {
        let direction = self.forward + self.left * (1.0 - 2.0 * u) + self.up * (1.0 - 2.0 * v);
        match Ray::new(self.origin, direction) {
            Ok(ray) => ray,
            // Only reachable when the image plane passes through the eye
            Err(_) => Ray::from_unit(self.origin, self.forward / self.forward.length()),
        }
    }

    /// Render `scene` through this camera.
    pub fn render(&self, scene: &Scene, samples: u32, config: &RenderConfig) -> Result<Image, RenderError> {
        render(self, scene, samples, config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_center_ray_points_forward() {
        let camera = Camera::new(
            Point::ORIGIN,
            Direction::Z,
            Direction::Y,
            Direction::X,
            64,
            64,
        )
        .unwrap();
        let ray = camera.generate_ray(0.5, 0.5);
        assert_eq!(ray.origin(), Point::ORIGIN);
        assert!((ray.direction() - Direction::Z).length() < 1e-6);
    }

    #[test]
    fn test_corner_orientation() {
        let camera = Camera::new(
            Point::ORIGIN,
            Direction::Z,
            Direction::Y,
            Direction::X,
            64,
            64,
        )
        .unwrap();
        let top_left = camera.generate_ray(0.0, 0.0).direction();
        assert!(top_left.x() > 0.0 && top_left.y() > 0.0);
        let bottom_right = camera.generate_ray(1.0, 1.0).direction();
        assert!(bottom_right.x() < 0.0 && bottom_right.y() < 0.0);
        assert!(top_left.is_unit(1e-5));
    }

    #[test]
    fn test_look_at_field_of_view() {
        let camera = Camera::look_at(
            Point::new(0.0, 0.0, -5.0),
            Point::ORIGIN,
            Direction::Y,
            90.0,
            200,
            100,
        )
        .unwrap();
        assert_eq!(camera.width(), 200);

        let center = camera.generate_ray(0.5, 0.5).direction();
        assert!((center - Direction::Z).length() < 1e-5);

        // Top edge is 45 degrees above the view axis
        let top = camera.generate_ray(0.5, 0.0).direction();
        assert!((top.y() - top.z()).abs() < 1e-5);

        // Aspect 2:1 widens the horizontal extent
        let side = camera.generate_ray(0.0, 0.5).direction();
        assert!((side.x() / side.z() - 2.0).abs() < 1e-4);
    }

    #[test]
    fn test_degenerate_cameras_rejected() {
        assert!(Camera::new(Point::ORIGIN, Direction::ZERO, Direction::Y, Direction::X, 8, 8).is_err());
        assert!(matches!(
            Camera::look_at(Point::ORIGIN, Point::new(0.0, 3.0, 0.0), Direction::Y, 60.0, 8, 8),
            Err(MathError::DegenerateBasis(_))
        ));
    }
}
