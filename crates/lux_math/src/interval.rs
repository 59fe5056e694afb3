/// A closed range `[min, max]` of ray parameters or coordinates.
///
/// `min > max` denotes the empty range.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Interval {
    pub min: f32,
    pub max: f32,
}

impl Interval {
    /// Contains nothing; grows correctly under `min`/`max` folding.
    pub const EMPTY: Interval = Interval {
        min: f32::INFINITY,
        max: f32::NEG_INFINITY,
    };

    pub fn new(min: f32, max: f32) -> Self {
        Self { min, max }
    }

    /// Extent of the range. Negative when empty.
    pub fn size(&self) -> f32 {
        self.max - self.min
    }

    /// Endpoints included.
    pub fn contains(&self, x: f32) -> bool {
        self.min <= x && x <= self.max
    }

    /// Endpoints excluded. Hit tests use this so a ray never re-hits the
    /// surface it starts on.
    pub fn surrounds(&self, x: f32) -> bool {
        self.min < x && x < self.max
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_interval_endpoints() {
        let range = Interval::new(-1.0, 3.0);
        assert_eq!(range.size(), 4.0);

        assert!(range.contains(-1.0));
        assert!(range.contains(3.0));
        assert!(!range.surrounds(-1.0));
        assert!(!range.surrounds(3.0));

        assert!(range.surrounds(0.5));
        assert!(!range.contains(3.01));
    }

    #[test]
    fn test_hit_range_to_infinity() {
        let range = Interval::new(1e-4, f32::INFINITY);
        assert!(range.surrounds(1e9));
        assert!(!range.surrounds(0.0));
        assert!(!range.surrounds(f32::INFINITY));
    }

    #[test]
    fn test_empty_interval() {
        assert!(Interval::EMPTY.size() < 0.0);
        assert!(!Interval::EMPTY.contains(0.0));
        assert!(!Interval::EMPTY.surrounds(0.0));
    }
}
