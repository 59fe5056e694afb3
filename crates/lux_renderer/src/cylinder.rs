//! Finite open cylinder primitive (no caps).

use crate::cone::{solve_quadratic, AxisFrame};
use crate::primitive::{Hittable, Intersection};
use crate::Material;
use lux_math::{Direction, Interval, MathError, Point, Ray, EPSILON};
use std::fmt;

#[derive(Debug, Clone, PartialEq)]
pub struct Cylinder {
    base: Point,
    axis: Direction,
    radius: f32,
    height: f32,
    material: Material,
    frame: AxisFrame,
}

impl Cylinder {
    /// Cylinder whose axis runs from `base` to `base + axis * height`.
    pub fn new(
        base: Point,
        axis: Direction,
        radius: f32,
        height: f32,
        material: Material,
    ) -> Result<Self, MathError> {
        let axis = axis.normalize()?;
        Ok(Self {
            base,
            axis,
            radius: radius.max(0.0),
            height: height.max(0.0),
            material,
            frame: AxisFrame::new(base, axis),
        })
    }

    pub fn base(&self) -> Point {
        self.base
    }

    pub fn axis(&self) -> Direction {
        self.axis
    }

    pub fn radius(&self) -> f32 {
        self.radius
    }

    pub fn height(&self) -> f32 {
        self.height
    }
}

impl Hittable for Cylinder {
    fn hit(&self, ray: &Ray, ray_t: Interval) -> Option<Intersection> {
        if self.radius <= 0.0 || self.height <= 0.0 {
            return None;
        }

        let (o, d) = self.frame.localize(ray);

        // Rays parallel to the axis never cross the side wall
        let a = d.x() * d.x() + d.y() * d.y();
        if a < EPSILON {
            return None;
        }
        let b = 2.0 * (o.x() * d.x() + o.y() * d.y());
        let c = o.x() * o.x() + o.y() * o.y() - self.radius * self.radius;

        let (t0, t1) = solve_quadratic(a, b, c)?;
        let t = [t0, t1].into_iter().find(|&t| {
            let z = o.z() + t * d.z();
            ray_t.surrounds(t) && (0.0..=self.height).contains(&z)
        })?;

        let p = o + d * t;
        let local_normal = Direction::new(p.x(), p.y(), 0.0) / self.radius;
        let normal = self.frame.normal_to_world(local_normal);

        Some(Intersection::new(ray, t, normal, self.material))
    }

    fn material(&self) -> &Material {
        &self.material
    }
}

impl fmt::Display for Cylinder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Cylinder(base: {}, axis: {}, radius: {}, height: {})",
            self.base, self.axis, self.radius, self.height
        )
    }
}
