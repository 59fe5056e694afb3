//! Finite cone primitive.
//!
//! Intersected in a local frame where the base centre sits at the origin
//! and the axis runs along +Z towards the apex at `z = height`.

use crate::primitive::{Hittable, Intersection};
use crate::Material;
use lux_math::{Direction, Interval, MathError, Point, Ray, Transform, EPSILON};
use std::fmt;

/// Rigid frame attached to an axis, shared by the axis-aligned quadrics.
#[derive(Debug, Clone, PartialEq)]
pub(crate) struct AxisFrame {
    to_world: Transform,
    to_local: Transform,
}

impl AxisFrame {
    pub(crate) fn new(base: Point, axis: Direction) -> Self {
        let (u, v) = axis.orthonormal_basis();
        let to_world = Transform::from_frame(base, u, v, axis);
        Self {
            to_local: to_world.inverse(),
            to_world,
        }
    }

    /// Ray origin and direction in local coordinates.
    pub(crate) fn localize(&self, ray: &Ray) -> (Point, Direction) {
        (
            self.to_local.apply_point(ray.origin()),
            self.to_local.apply_direction(ray.direction()),
        )
    }

    pub(crate) fn normal_to_world(&self, local: Direction) -> Direction {
        self.to_world.apply_direction(local)
    }
}

/// Real roots of `a t^2 + b t + c`, ascending. Degrades to the linear
/// solution when `a` vanishes.
pub(crate) fn solve_quadratic(a: f32, b: f32, c: f32) -> Option<(f32, f32)> {
    if a.abs() < EPSILON {
        if b.abs() < EPSILON {
            return None;
        }
        let t = -c / b;
        return Some((t, t));
    }

    let discriminant = b * b - 4.0 * a * c;
    if discriminant < 0.0 {
        return None;
    }
    let sqrtd = discriminant.sqrt();
    let t0 = (-b - sqrtd) / (2.0 * a);
    let t1 = (-b + sqrtd) / (2.0 * a);
    Some((t0.min(t1), t0.max(t1)))
}

#[derive(Debug, Clone, PartialEq)]
pub struct Cone {
    base: Point,
    axis: Direction,
    radius: f32,
    height: f32,
    material: Material,
    frame: AxisFrame,
}

impl Cone {
    /// Cone with base disk centred at `base`, apex at `base + axis * height`.
    ///
    /// The base disk itself is open.
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

    pub fn apex(&self) -> Point {
        self.base + self.axis * self.height
    }
}

impl Hittable for Cone {
    fn hit(&self, ray: &Ray, ray_t: Interval) -> Option<Intersection> {
        if self.radius <= 0.0 || self.height <= EPSILON {
            return None;
        }

        let (o, d) = self.frame.localize(ray);
        let k = self.radius / self.height;
        let k2 = k * k;
        let hz = self.height - o.z();

        let a = d.x() * d.x() + d.y() * d.y() - k2 * d.z() * d.z();
        let b = 2.0 * (o.x() * d.x() + o.y() * d.y() + k2 * hz * d.z());
        let c = o.x() * o.x() + o.y() * o.y() - k2 * hz * hz;

        let (t0, t1) = solve_quadratic(a, b, c)?;
        let t = [t0, t1].into_iter().find(|&t| {
            let z = o.z() + t * d.z();
            ray_t.surrounds(t) && (0.0..=self.height).contains(&z)
        })?;

        let p = o + d * t;
        let local_normal = Direction::new(p.x(), p.y(), k2 * (self.height - p.z()))
            .normalize()
            .unwrap_or(Direction::Z);
        let normal = self.frame.normal_to_world(local_normal);

        Some(Intersection::new(ray, t, normal, self.material))
    }

    fn material(&self) -> &Material {
        &self.material
    }
}

impl fmt::Display for Cone {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Cone(base: {}, axis: {}, radius: {}, height: {})",
            self.base, self.axis, self.radius, self.height
        )
    }
}
