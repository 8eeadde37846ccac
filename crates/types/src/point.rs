use serde::{Deserialize, Serialize};
use std::fmt;

/// A point on the non-negative integer plane.
///
/// Coordinates are `u32`. The index works on `i128` copies of them, wide
/// enough that squared distances across the whole plane (below 2^65) are
/// compared exactly. Equality is exact and coordinate-wise.
///
/// # Examples
///
/// ```
/// use kdtreed_types::Point;
///
/// let origin = Point::new(0, 0);
/// let p = Point::new(3, 4);
/// assert_eq!(origin.distance(&p), 5.0);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Point {
    pub x: u32,
    pub y: u32,
}

impl Point {
    /// Create a new point from x and y coordinates.
    #[inline]
    pub const fn new(x: u32, y: u32) -> Self {
        Self { x, y }
    }

    /// Get the x coordinate.
    #[inline]
    pub fn x(&self) -> u32 {
        self.x
    }

    /// Get the y coordinate.
    #[inline]
    pub fn y(&self) -> u32 {
        self.y
    }

    /// Coordinates as an `[x, y]` array of `i128`, the form used for indexing.
    #[inline]
    pub fn to_array(&self) -> [i128; 2] {
        [i128::from(self.x), i128::from(self.y)]
    }

    /// Exact squared Euclidean distance to another point.
    #[inline]
    pub fn distance_2(&self, other: &Point) -> u128 {
        let dx = u128::from(self.x.abs_diff(other.x));
        let dy = u128::from(self.y.abs_diff(other.y));
        dx * dx + dy * dy
    }

    /// Euclidean distance to another point, rounded to `f64`.
    #[inline]
    pub fn distance(&self, other: &Point) -> f64 {
        (self.distance_2(other) as f64).sqrt()
    }
}

impl fmt::Display for Point {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{{{}, {}}}", self.x, self.y)
    }
}

impl From<(u32, u32)> for Point {
    fn from((x, y): (u32, u32)) -> Self {
        Self::new(x, y)
    }
}

impl From<Point> for (u32, u32) {
    fn from(point: Point) -> Self {
        (point.x, point.y)
    }
}
