//! Infinite plane primitive.

use crate::primitive::{Hittable, Intersection};
use crate::Material;
use lux_math::{Direction, Interval, MathError, Point, Ray, EPSILON};
use std::fmt;

/// The set of points `p` with `normal . p + offset = 0`.
#[derive(Debug, Clone, PartialEq)]
pub struct Plane {
    normal: Direction,
    offset: f32,
    material: Material,
}

impl Plane {
    pub fn new(normal: Direction, offset: f32, material: Material) -> Result<Self, MathError> {
        Ok(Self {
            normal: normal.normalize()?,
            offset,
            material,
        })
    }

    /// Plane through `point` facing `normal`.
    pub fn through(point: Point, normal: Direction, material: Material) -> Result<Self, MathError> {
        let normal = normal.normalize()?;
        let offset = -normal.dot(point - Point::ORIGIN);
        Ok(Self {
            normal,
            offset,
            material,
        })
    }

    pub fn normal(&self) -> Direction {
        self.normal
    }

    pub fn offset(&self) -> f32 {
        self.offset
    }

    /// Signed distance from `point` to the plane, positive on the normal side.
    pub fn signed_distance(&self, point: Point) -> f32 {
        self.normal.dot(point - Point::ORIGIN) + self.offset
    }
}

impl Hittable for Plane {
    fn hit(&self, ray: &Ray, ray_t: Interval) -> Option<Intersection> {
        let denom = self.normal.dot(ray.direction());
        if denom.abs() < EPSILON {
            return None;
        }

        let t = -self.signed_distance(ray.origin()) / denom;
        if !ray_t.surrounds(t) {
            return None;
        }

        Some(Intersection::new(ray, t, self.normal, self.material))
    }

    fn material(&self) -> &Material {
        &self.material
    }
}

impl fmt::Display for Plane {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Plane(normal: {}, offset: {})", self.normal, self.offset)
    }
}
