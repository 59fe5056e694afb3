//! Intersection record and the closed set of scene primitives.

use crate::{Cone, Cylinder, Material, Plane, Sphere, Triangle};
use lux_math::{Direction, Interval, Point, Ray};
use std::fmt;

/// Smallest accepted hit distance. Keeps secondary rays from re-hitting
/// the surface they start on.
pub const HIT_EPSILON: f32 = 1e-4;

/// Where and how a ray met a surface.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Intersection {
    /// Ray parameter of the hit
    pub distance: f32,
    pub point: Point,
    /// Geometric normal pointing out of the surface (unit length)
    pub normal: Direction,
    /// Whether the ray arrived from the outward side
    pub front_face: bool,
    /// Copy of the surface material
    pub material: Material,
}

impl Intersection {
    pub fn new(ray: &Ray, distance: f32, outward_normal: Direction, material: Material) -> Self {
        Self {
            distance,
            point: ray.at(distance),
            normal: outward_normal,
            front_face: ray.direction().dot(outward_normal) < 0.0,
            material,
        }
    }

    /// Normal flipped to point against the incoming ray.
    #[inline]
    pub fn facing_normal(&self) -> Direction {
        if self.front_face {
            self.normal
        } else {
            -self.normal
        }
    }
}

/// Something a ray can hit.
pub(crate) trait Hittable: fmt::Display + Send + Sync {
    /// Nearest hit with distance strictly inside `ray_t`.
    fn hit(&self, ray: &Ray, ray_t: Interval) -> Option<Intersection>;

    fn material(&self) -> &Material;
}

/// Every shape a scene can hold.
#[derive(Debug, Clone, PartialEq)]
pub enum Primitive {
    Sphere(Sphere),
    Plane(Plane),
    Triangle(Triangle),
    Cone(Cone),
    Cylinder(Cylinder),
}

impl Primitive {
    /// Nearest hit in front of the ray origin.
    pub fn intersect(&self, ray: &Ray) -> Option<Intersection> {
        self.intersect_within(ray, Interval::new(HIT_EPSILON, f32::INFINITY))
    }

    /// Nearest hit with distance strictly inside `ray_t`.
    pub fn intersect_within(&self, ray: &Ray, ray_t: Interval) -> Option<Intersection> {
        self.as_hittable().hit(ray, ray_t)
    }

    pub fn material(&self) -> &Material {
        self.as_hittable().material()
    }

    /// Human-readable summary of the shape's parameters.
    pub fn describe(&self) -> String {
        self.to_string()
    }

    fn as_hittable(&self) -> &dyn Hittable {
        match self {
            Primitive::Sphere(s) => s,
            Primitive::Plane(p) => p,
            Primitive::Triangle(t) => t,
            Primitive::Cone(c) => c,
            Primitive::Cylinder(c) => c,
        }
    }
}

impl fmt::Display for Primitive {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(self.as_hittable(), f)
    }
}

impl From<Sphere> for Primitive {
    fn from(s: Sphere) -> Self {
        Primitive::Sphere(s)
    }
}

impl From<Plane> for Primitive {
    fn from(p: Plane) -> Self {
        Primitive::Plane(p)
    }
}

impl From<Triangle> for Primitive {
    fn from(t: Triangle) -> Self {
        Primitive::Triangle(t)
    }
}

impl From<Cone> for Primitive {
    fn from(c: Cone) -> Self {
        Primitive::Cone(c)
    }
}

impl From<Cylinder> for Primitive {
    fn from(c: Cylinder) -> Self {
        Primitive::Cylinder(c)
    }
}
