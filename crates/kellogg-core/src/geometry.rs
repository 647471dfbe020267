//! Geometric primitives for sentence diagram layout.
//!
//! - [`Point`] - A coordinate in diagram space
//! - [`Size`] - Width and height dimensions
//! - [`Bounds`] - An axis-aligned bounding box
//!
//! # Coordinate System
//!
//! Diagram space matches SVG:
//!
//! ```text
//!   (0,0) ────────► +X
//!     │
//!     │
//!     ▼
//!    +Y
//! ```
//!
//! A baseline is drawn at some `y`; everything that hangs "below" a baseline
//! (modifiers, prepositional objects, subordinate clauses) has a larger `y`.

/// A 2D point in diagram coordinate space.
///
/// # Examples
///
/// ```
/// # use kellogg_core::geometry::Point;
/// let a = Point::new(10.0, 20.0);
/// let b = Point::new(30.0, 40.0);
///
/// let mid = a.midpoint(b);
/// assert_eq!(mid.x(), 20.0);
/// assert_eq!(mid.y(), 30.0);
/// ```
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Point {
    x: f32,
    y: f32,
}

impl Point {
    /// Creates a new point with the specified coordinates
    pub fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }

    /// Returns the x-coordinate
    pub fn x(self) -> f32 {
        self.x
    }

    /// Returns the y-coordinate
    pub fn y(self) -> f32 {
        self.y
    }

    /// Returns a copy of this point with a different x-coordinate
    pub fn with_x(mut self, x: f32) -> Self {
        self.x = x;
        self
    }

    /// Returns a copy of this point with a different y-coordinate
    pub fn with_y(mut self, y: f32) -> Self {
        self.y = y;
        self
    }

    /// Adds another point component-wise
    pub fn add_point(self, other: Point) -> Self {
        Self {
            x: self.x + other.x,
            y: self.y + other.y,
        }
    }

    /// Subtracts another point component-wise
    pub fn sub_point(self, other: Point) -> Self {
        Self {
            x: self.x - other.x,
            y: self.y - other.y,
        }
    }

    /// Returns the point halfway between `self` and `other`
    pub fn midpoint(self, other: Point) -> Self {
        Self {
            x: (self.x + other.x) / 2.0,
            y: (self.y + other.y) / 2.0,
        }
    }
}

/// Width and height of a region.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Size {
    width: f32,
    height: f32,
}

impl Size {
    pub fn new(width: f32, height: f32) -> Self {
        Self { width, height }
    }

    pub fn width(self) -> f32 {
        self.width
    }

    pub fn height(self) -> f32 {
        self.height
    }

    /// Returns the component-wise maximum of two sizes
    pub fn max(self, other: Size) -> Self {
        Self {
            width: self.width.max(other.width),
            height: self.height.max(other.height),
        }
    }

    /// Places `other` to the right of `self`: widths add, heights take the max
    pub fn merge_horizontal(self, other: Size) -> Self {
        Self {
            width: self.width + other.width,
            height: self.height.max(other.height),
        }
    }

    /// Places `other` below `self`: heights add, widths take the max
    pub fn merge_vertical(self, other: Size) -> Self {
        Self {
            width: self.width.max(other.width),
            height: self.height + other.height,
        }
    }
}

/// An axis-aligned rectangle described by its minimum and maximum corners.
///
/// # Examples
///
/// ```
/// # use kellogg_core::geometry::{Bounds, Point};
/// let bounds = Bounds::from_points(Point::new(0.0, 0.0), Point::new(10.0, -5.0));
/// assert_eq!(bounds.min_y(), -5.0);
/// assert_eq!(bounds.height(), 5.0);
/// ```
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Bounds {
    min_x: f32,
    min_y: f32,
    max_x: f32,
    max_y: f32,
}

impl Bounds {
    /// Creates the smallest bounds containing both points
    pub fn from_points(a: Point, b: Point) -> Self {
        Self {
            min_x: a.x.min(b.x),
            min_y: a.y.min(b.y),
            max_x: a.x.max(b.x),
            max_y: a.y.max(b.y),
        }
    }

    /// Creates bounds from a top-left corner and a size
    pub fn new_from_top_left(top_left: Point, size: Size) -> Self {
        Self {
            min_x: top_left.x,
            min_y: top_left.y,
            max_x: top_left.x + size.width,
            max_y: top_left.y + size.height,
        }
    }

    pub fn min_x(self) -> f32 {
        self.min_x
    }

    pub fn min_y(self) -> f32 {
        self.min_y
    }

    pub fn max_x(self) -> f32 {
        self.max_x
    }

    pub fn max_y(self) -> f32 {
        self.max_y
    }

    pub fn width(self) -> f32 {
        self.max_x - self.min_x
    }

    pub fn height(self) -> f32 {
        self.max_y - self.min_y
    }

    /// Returns the top-left corner
    pub fn min_point(self) -> Point {
        Point::new(self.min_x, self.min_y)
    }

    pub fn to_size(self) -> Size {
        Size::new(self.width(), self.height())
    }

    /// Returns the smallest bounds containing both `self` and `other`
    pub fn merge(&self, other: &Self) -> Self {
        Self {
            min_x: self.min_x.min(other.min_x),
            min_y: self.min_y.min(other.min_y),
            max_x: self.max_x.max(other.max_x),
            max_y: self.max_y.max(other.max_y),
        }
    }

    /// Grows the bounds to contain `point`
    pub fn include(&self, point: Point) -> Self {
        Self {
            min_x: self.min_x.min(point.x),
            min_y: self.min_y.min(point.y),
            max_x: self.max_x.max(point.x),
            max_y: self.max_y.max(point.y),
        }
    }

    /// Grows the bounds by `margin` on every side
    pub fn expand(&self, margin: f32) -> Self {
        Self {
            min_x: self.min_x - margin,
            min_y: self.min_y - margin,
            max_x: self.max_x + margin,
            max_y: self.max_y + margin,
        }
    }

    /// Returns `true` if the point lies inside or on the edge of the bounds
    pub fn contains(&self, point: Point) -> bool {
        point.x >= self.min_x
            && point.x <= self.max_x
            && point.y >= self.min_y
            && point.y <= self.max_y
    }
}

#[cfg(test)]
mod tests {
    use float_cmp::assert_approx_eq;

    use super::*;

    #[test]
    fn test_point_arithmetic() {
        let a = Point::new(3.0, 4.0);
        let b = Point::new(1.0, -2.0);

        let sum = a.add_point(b);
        assert_approx_eq!(f32, sum.x(), 4.0);
        assert_approx_eq!(f32, sum.y(), 2.0);

        let diff = a.sub_point(b);
        assert_approx_eq!(f32, diff.x(), 2.0);
        assert_approx_eq!(f32, diff.y(), 6.0);
    }

    #[test]
    fn test_point_with_coordinates() {
        let p = Point::new(1.0, 2.0).with_x(5.0).with_y(7.0);
        assert_eq!(p, Point::new(5.0, 7.0));
    }

    #[test]
    fn test_size_merge() {
        let a = Size::new(10.0, 5.0);
        let b = Size::new(4.0, 8.0);

        let horizontal = a.merge_horizontal(b);
        assert_approx_eq!(f32, horizontal.width(), 14.0);
        assert_approx_eq!(f32, horizontal.height(), 8.0);

        let vertical = a.merge_vertical(b);
        assert_approx_eq!(f32, vertical.width(), 10.0);
        assert_approx_eq!(f32, vertical.height(), 13.0);
    }

    #[test]
    fn test_bounds_from_points_normalizes() {
        let bounds = Bounds::from_points(Point::new(10.0, 10.0), Point::new(-2.0, 4.0));
        assert_approx_eq!(f32, bounds.min_x(), -2.0);
        assert_approx_eq!(f32, bounds.min_y(), 4.0);
        assert_approx_eq!(f32, bounds.width(), 12.0);
        assert_approx_eq!(f32, bounds.height(), 6.0);
    }

    #[test]
    fn test_bounds_include_and_expand() {
        let bounds = Bounds::from_points(Point::new(0.0, 0.0), Point::new(1.0, 1.0))
            .include(Point::new(5.0, -3.0))
            .expand(2.0);

        assert_approx_eq!(f32, bounds.min_x(), -2.0);
        assert_approx_eq!(f32, bounds.min_y(), -5.0);
        assert_approx_eq!(f32, bounds.max_x(), 7.0);
        assert_approx_eq!(f32, bounds.max_y(), 3.0);
        assert!(bounds.contains(Point::new(0.0, 0.0)));
        assert!(!bounds.contains(Point::new(8.0, 0.0)));
    }

    #[test]
    fn test_bounds_new_from_top_left() {
        let bounds = Bounds::new_from_top_left(Point::new(1.0, 2.0), Size::new(3.0, 4.0));
        assert_eq!(bounds.min_point(), Point::new(1.0, 2.0));
        assert_eq!(bounds.to_size(), Size::new(3.0, 4.0));
    }
}

#[cfg(test)]
mod proptest_tests {
    use float_cmp::approx_eq;
    use proptest::prelude::*;

    use super::*;

    fn point_strategy() -> impl Strategy<Value = Point> {
        (-1000.0f32..1000.0, -1000.0f32..1000.0).prop_map(|(x, y)| Point::new(x, y))
    }

    fn bounds_strategy() -> impl Strategy<Value = Bounds> {
        (point_strategy(), point_strategy()).prop_map(|(a, b)| Bounds::from_points(a, b))
    }

    /// Midpoint should always be between (or equal to) both points.
    fn check_midpoint_is_between_points(p1: Point, p2: Point) -> Result<(), TestCaseError> {
        let mid = p1.midpoint(p2);

        prop_assert!(mid.x() >= p1.x().min(p2.x()) && mid.x() <= p1.x().max(p2.x()));
        prop_assert!(mid.y() >= p1.y().min(p2.y()) && mid.y() <= p1.y().max(p2.y()));
        Ok(())
    }

    /// Merged bounds should contain every corner of both inputs.
    fn check_merge_contains_both(b1: Bounds, b2: Bounds) -> Result<(), TestCaseError> {
        let merged = b1.merge(&b2);

        for b in [b1, b2] {
            prop_assert!(merged.contains(b.min_point()));
            prop_assert!(merged.contains(Point::new(b.max_x(), b.max_y())));
        }
        Ok(())
    }

    /// Merge order should not matter.
    fn check_merge_is_commutative(b1: Bounds, b2: Bounds) -> Result<(), TestCaseError> {
        let left = b1.merge(&b2);
        let right = b2.merge(&b1);

        prop_assert!(approx_eq!(f32, left.min_x(), right.min_x()));
        prop_assert!(approx_eq!(f32, left.min_y(), right.min_y()));
        prop_assert!(approx_eq!(f32, left.max_x(), right.max_x()));
        prop_assert!(approx_eq!(f32, left.max_y(), right.max_y()));
        Ok(())
    }

    proptest! {
        #[test]
        fn midpoint_is_between_points(p1 in point_strategy(), p2 in point_strategy()) {
            check_midpoint_is_between_points(p1, p2)?;
        }

        #[test]
        fn bounds_merge_contains_both(b1 in bounds_strategy(), b2 in bounds_strategy()) {
            check_merge_contains_both(b1, b2)?;
        }

        #[test]
        fn bounds_merge_is_commutative(b1 in bounds_strategy(), b2 in bounds_strategy()) {
            check_merge_is_commutative(b1, b2)?;
        }
    }
}
