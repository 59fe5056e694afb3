//! Triangle primitive.
//!
//! Uses the Möller-Trumbore algorithm for ray-triangle intersection.

use crate::primitive::{Hittable, Intersection};
use crate::Material;
use lux_math::{Direction, Interval, MathError, Point, Ray};
use std::fmt;

/// Determinant threshold below which the ray is treated as parallel.
const PARALLEL_EPSILON: f32 = 1e-8;

#[derive(Debug, Clone, PartialEq)]
pub struct Triangle {
    v0: Point,
    v1: Point,
    v2: Point,
    /// Unit face normal, `(v1 - v0) x (v2 - v0)`
    normal: Direction,
    material: Material,
}

impl Triangle {
    /// Fails for degenerate (zero-area) triangles.
    pub fn new(v0: Point, v1: Point, v2: Point, material: Material) -> Result<Self, MathError> {
        let normal = (v1 - v0).cross(v2 - v0).normalize()?;
        Ok(Self {
            v0,
            v1,
            v2,
            normal,
            material,
        })
    }

    pub fn vertices(&self) -> [Point; 3] {
        [self.v0, self.v1, self.v2]
    }

    pub fn normal(&self) -> Direction {
        self.normal
    }
}

impl Hittable for Triangle {
    fn hit(&self, ray: &Ray, ray_t: Interval) -> Option<Intersection> {
        let edge1 = self.v1 - self.v0;
        let edge2 = self.v2 - self.v0;

        let h = ray.direction().cross(edge2);
        let a = edge1.dot(h);
        if a.abs() < PARALLEL_EPSILON {
            return None;
        }

        let f = 1.0 / a;
        let s = ray.origin() - self.v0;
        let u = f * s.dot(h);
        if !(0.0..=1.0).contains(&u) {
            return None;
        }

        let q = s.cross(edge1);
        let v = f * ray.direction().dot(q);
        if v < 0.0 || u + v > 1.0 {
            return None;
        }

        let t = f * edge2.dot(q);
        if !ray_t.surrounds(t) {
            return None;
        }

        Some(Intersection::new(ray, t, self.normal, self.material))
    }

    fn material(&self) -> &Material {
        &self.material
    }
}

impl fmt::Display for Triangle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Triangle({}, {}, {})", self.v0, self.v1, self.v2)
    }
}
