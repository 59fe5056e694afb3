use crate::{Interval, Point};

/// Axis-aligned box bounding a set of points, one interval per axis.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct Aabb {
    pub x: Interval,
    pub y: Interval,
    pub z: Interval,
}

impl Aabb {
    pub const EMPTY: Aabb = Aabb {
        x: Interval::EMPTY,
        y: Interval::EMPTY,
        z: Interval::EMPTY,
    };

    /// Smallest box containing every point in `points`.
    ///
    /// Returns `Aabb::EMPTY` for an empty iterator.
    pub fn enclosing<I: IntoIterator<Item = Point>>(points: I) -> Self {
        points
            .into_iter()
            .fold(Aabb::EMPTY, |acc, p| acc.including(p))
    }

    /// This box grown to contain `p`.
    pub fn including(&self, p: Point) -> Self {
        Self {
            x: Interval::new(self.x.min.min(p.x()), self.x.max.max(p.x())),
            y: Interval::new(self.y.min.min(p.y()), self.y.max.max(p.y())),
            z: Interval::new(self.z.min.min(p.z()), self.z.max.max(p.z())),
        }
    }

    pub fn contains(&self, p: Point) -> bool {
        self.x.contains(p.x()) && self.y.contains(p.y()) && self.z.contains(p.z())
    }

    /// Split axis for the k-d tree: 0, 1 or 2 for X, Y or Z. Ties go to the
    /// later axis.
    pub fn longest_axis(&self) -> usize {
        let (x, y, z) = (self.x.size(), self.y.size(), self.z.size());
        if x > y && x > z {
            0
        } else if y > z {
            1
        } else {
            2
        }
    }

    pub fn is_empty(&self) -> bool {
        self.x.min > self.x.max || self.y.min > self.y.max || self.z.min > self.z.max
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_aabb_enclosing() {
        let aabb = Aabb::enclosing(vec![
            Point::new(1.0, -2.0, 0.0),
            Point::new(-1.0, 3.0, 0.5),
            Point::new(0.0, 0.0, -4.0),
        ]);

        assert_eq!(aabb.x, Interval::new(-1.0, 1.0));
        assert_eq!(aabb.y, Interval::new(-2.0, 3.0));
        assert_eq!(aabb.z, Interval::new(-4.0, 0.5));
        assert!(aabb.contains(Point::ORIGIN));
        assert!(!aabb.contains(Point::new(2.0, 0.0, 0.0)));
    }

    #[test]
    fn test_aabb_enclosing_empty() {
        let aabb = Aabb::enclosing(Vec::new());
        assert!(aabb.is_empty());
        assert!(!aabb.contains(Point::ORIGIN));
    }

    #[test]
    fn test_single_point_box() {
        let p = Point::new(2.0, -1.0, 7.0);
        let aabb = Aabb::EMPTY.including(p);
        assert!(!aabb.is_empty());
        assert!(aabb.contains(p));
    }

    #[test]
    fn test_aabb_longest_axis() {
        let spread = |d: Point| Aabb::enclosing([Point::ORIGIN, d]).longest_axis();
        assert_eq!(spread(Point::new(10.0, 1.0, 1.0)), 0);
        assert_eq!(spread(Point::new(1.0, -10.0, 1.0)), 1);
        assert_eq!(spread(Point::new(1.0, 1.0, 10.0)), 2);
        assert_eq!(spread(Point::ORIGIN), 2);
    }
}
