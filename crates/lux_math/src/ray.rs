use crate::{Direction, MathError, Point};

/// A ray in 3D space with an origin and a unit-length direction.
///
/// Rays are created per camera sample or bounce and never mutated.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct Ray {
    origin: Point,
    direction: Direction,
}

impl Ray {
    /// Create a new ray, normalizing `direction`.
    pub fn new(origin: Point, direction: Direction) -> Result<Self, MathError> {
        Ok(Self {
            origin,
            direction: direction.normalize()?,
        })
    }

    /// Create a ray from a direction that is already unit length.
    ///
    /// Used on hot paths (reflection of unit vectors, sampled hemispheres)
    /// where re-normalizing would be wasted work.
    #[inline]
    pub fn from_unit(origin: Point, direction: Direction) -> Self {
        debug_assert!(direction.is_unit(1e-3), "ray direction must be unit length");
        Self { origin, direction }
    }

    /// Get the origin point of the ray.
    #[inline]
    pub fn origin(&self) -> Point {
        self.origin
    }

    /// Get the unit direction of the ray.
    #[inline]
    pub fn direction(&self) -> Direction {
        self.direction
    }

    /// Get the point along the ray at parameter t.
    ///
    /// Returns: origin + t * direction
    #[inline]
    pub fn at(&self, t: f32) -> Point {
        self.origin + self.direction * t
    }
}
