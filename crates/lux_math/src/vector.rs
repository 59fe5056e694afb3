//! Strongly-typed points and directions.
//!
//! Both wrap a `glam::Vec3`. The split keeps affine rules honest:
//! `Point - Point` is a `Direction`, `Point + Direction` is a `Point`,
//! and points can't be added to each other.

use crate::{MathError, EPSILON};
use glam::Vec3;
use std::fmt;
use std::ops::{Add, AddAssign, Div, Mul, Neg, Sub};

/// A position in 3D space.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Point(Vec3);

/// A displacement or orientation in 3D space.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Direction(Vec3);

impl Point {
    pub const ORIGIN: Point = Point(Vec3::ZERO);

    #[inline]
    pub const fn new(x: f32, y: f32, z: f32) -> Self {
        Self(Vec3::new(x, y, z))
    }

    #[inline]
    pub const fn from_vec3(v: Vec3) -> Self {
        Self(v)
    }

    #[inline]
    pub fn to_vec3(self) -> Vec3 {
        self.0
    }

    #[inline]
    pub fn x(&self) -> f32 {
        self.0.x
    }

    #[inline]
    pub fn y(&self) -> f32 {
        self.0.y
    }

    #[inline]
    pub fn z(&self) -> f32 {
        self.0.z
    }

    /// Coordinate along axis `i` (0=X, 1=Y, 2=Z).
    #[inline]
    pub fn axis(&self, i: usize) -> f32 {
        match i {
            0 => self.0.x,
            1 => self.0.y,
            _ => self.0.z,
        }
    }

    #[inline]
    pub fn distance(self, other: Point) -> f32 {
        self.0.distance(other.0)
    }

    #[inline]
    pub fn distance_squared(self, other: Point) -> f32 {
        self.0.distance_squared(other.0)
    }

    /// Affine combination `(1 - t) * self + t * other`.
    #[inline]
    pub fn lerp(self, other: Point, t: f32) -> Point {
        Point(self.0.lerp(other.0, t))
    }

    /// Component-wise minimum of two points.
    #[inline]
    pub fn min(self, other: Point) -> Point {
        Point(self.0.min(other.0))
    }

    /// Component-wise maximum of two points.
    #[inline]
    pub fn max(self, other: Point) -> Point {
        Point(self.0.max(other.0))
    }
}

impl Direction {
    pub const ZERO: Direction = Direction(Vec3::ZERO);
    pub const X: Direction = Direction(Vec3::X);
    pub const Y: Direction = Direction(Vec3::Y);
    pub const Z: Direction = Direction(Vec3::Z);

    #[inline]
    pub const fn new(x: f32, y: f32, z: f32) -> Self {
        Self(Vec3::new(x, y, z))
    }

    #[inline]
    pub const fn from_vec3(v: Vec3) -> Self {
        Self(v)
    }

    #[inline]
    pub fn to_vec3(self) -> Vec3 {
        self.0
    }

    #[inline]
    pub fn x(&self) -> f32 {
        self.0.x
    }

    #[inline]
    pub fn y(&self) -> f32 {
        self.0.y
    }

    #[inline]
    pub fn z(&self) -> f32 {
        self.0.z
    }

    #[inline]
    pub fn dot(self, other: Direction) -> f32 {
        self.0.dot(other.0)
    }

    #[inline]
    pub fn cross(self, other: Direction) -> Direction {
        Direction(self.0.cross(other.0))
    }

    #[inline]
    pub fn length(self) -> f32 {
        self.0.length()
    }

    #[inline]
    pub fn length_squared(self) -> f32 {
        self.0.length_squared()
    }

    /// Return the unit-length direction.
    ///
    /// Fails on zero-length input instead of producing NaNs.
    pub fn normalize(self) -> Result<Direction, MathError> {
        let len = self.0.length();
        if len <= EPSILON || !len.is_finite() {
            return Err(MathError::ZeroLengthNormalization);
        }
        Ok(Direction(self.0 / len))
    }

    /// True if the magnitude is 1 within `tolerance`.
    #[inline]
    pub fn is_unit(self, tolerance: f32) -> bool {
        (self.0.length() - 1.0).abs() <= tolerance
    }

    /// Mirror this direction about `normal` (assumed unit length).
    #[inline]
    pub fn reflect(self, normal: Direction) -> Direction {
        self - normal * (2.0 * self.dot(normal))
    }

    /// Two unit directions `(u, v)` completing `self` to a right-handed
    /// orthonormal frame `(u, v, self)`.
    ///
    /// `self` must already be unit length.
    pub fn orthonormal_basis(self) -> (Direction, Direction) {
        let helper = if self.0.x.abs() > 0.9 { Vec3::Y } else { Vec3::X };
        let u = helper.cross(self.0);
        let u = u / u.length();
        let v = self.0.cross(u);
        (Direction(u), Direction(v))
    }

    /// Component-wise absolute value.
    #[inline]
    pub fn abs(self) -> Direction {
        Direction(self.0.abs())
    }
}

impl Add<Direction> for Point {
    type Output = Point;

    #[inline]
    fn add(self, rhs: Direction) -> Point {
        Point(self.0 + rhs.0)
    }
}

impl AddAssign<Direction> for Point {
    #[inline]
    fn add_assign(&mut self, rhs: Direction) {
        self.0 += rhs.0;
    }
}

impl Sub<Direction> for Point {
    type Output = Point;

    #[inline]
    fn sub(self, rhs: Direction) -> Point {
        Point(self.0 - rhs.0)
    }
}

impl Sub for Point {
    type Output = Direction;

    #[inline]
    fn sub(self, rhs: Point) -> Direction {
        Direction(self.0 - rhs.0)
    }
}

impl Add for Direction {
    type Output = Direction;

    #[inline]
    fn add(self, rhs: Direction) -> Direction {
        Direction(self.0 + rhs.0)
    }
}

impl AddAssign for Direction {
    #[inline]
    fn add_assign(&mut self, rhs: Direction) {
        self.0 += rhs.0;
    }
}

impl Sub for Direction {
    type Output = Direction;

    #[inline]
    fn sub(self, rhs: Direction) -> Direction {
        Direction(self.0 - rhs.0)
    }
}

impl Neg for Direction {
    type Output = Direction;

    #[inline]
    fn neg(self) -> Direction {
        Direction(-self.0)
    }
}

impl Mul<f32> for Direction {
    type Output = Direction;

    #[inline]
    fn mul(self, rhs: f32) -> Direction {
        Direction(self.0 * rhs)
    }
}

impl Mul<Direction> for f32 {
    type Output = Direction;

    #[inline]
    fn mul(self, rhs: Direction) -> Direction {
        Direction(self * rhs.0)
    }
}

impl Div<f32> for Direction {
    type Output = Direction;

    #[inline]
    fn div(self, rhs: f32) -> Direction {
        Direction(self.0 / rhs)
    }
}

impl fmt::Display for Point {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {}, {})", self.0.x, self.0.y, self.0.z)
    }
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {}, {})", self.0.x, self.0.y, self.0.z)
    }
}
