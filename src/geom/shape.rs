use geo::{Area, BooleanOps, BoundingRect, Intersects, MultiPolygon, Point, Rect};

/// Axis-aligned bounding rectangle, `(x0, y0, x1, y1)`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub(crate) struct Mbr {
    pub x0: f64,
    pub y0: f64,
    pub x1: f64,
    pub y1: f64,
}

impl Mbr {
    pub(crate) fn from_rect(rect: Rect<f64>) -> Self {
        Self { x0: rect.min().x, y0: rect.min().y, x1: rect.max().x, y1: rect.max().y }
    }
}

/// An opaque polygonal shape. Wraps `geo::MultiPolygon<f64>` so the rest of
/// the crate never needs to name a `geo` type directly.
#[derive(Debug, Clone)]
pub(crate) struct Shape(MultiPolygon<f64>);

impl Shape {
    pub(crate) fn new(multi_polygon: MultiPolygon<f64>) -> Self {
        Self(multi_polygon)
    }

    /// Unsigned area in the shape's native coordinate units.
    pub(crate) fn area(&self) -> f64 {
        self.0.unsigned_area()
    }

    /// Axis-aligned bounding rectangle, or `None` for an empty shape.
    pub(crate) fn mbr(&self) -> Option<Mbr> {
        self.0.bounding_rect().map(Mbr::from_rect)
    }

    pub(crate) fn intersects(&self, other: &Shape) -> bool {
        self.0.intersects(&other.0)
    }

    /// Geometric intersection, or `None` if the shapes don't overlap or the
    /// overlap has zero area.
    pub(crate) fn intersection(&self, other: &Shape) -> Option<Shape> {
        let inter = self.0.intersection(&other.0);
        if inter.0.is_empty() || inter.unsigned_area() == 0.0 {
            None
        } else {
            Some(Shape(inter))
        }
    }

    /// Tested as intersection of a point with the shape, not strict
    /// containment, so a point exactly on the boundary still counts as a
    /// hit (spec §4.4.1a matches the original's `get_intersection`
    /// truthiness, not a strict-interior test).
    pub(crate) fn contains_point(&self, x: f64, y: f64) -> bool {
        self.0.intersects(&Point::new(x, y))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use geo::{Coord, LineString, Polygon};

    fn square(x0: f64, y0: f64, x1: f64, y1: f64) -> Shape {
        let ring = LineString(vec![
            Coord { x: x0, y: y0 },
            Coord { x: x1, y: y0 },
            Coord { x: x1, y: y1 },
            Coord { x: x0, y: y1 },
            Coord { x: x0, y: y0 },
        ]);
        Shape::new(MultiPolygon(vec![Polygon::new(ring, vec![])]))
    }

    #[test]
    fn area_of_unit_square() {
        assert_eq!(square(0.0, 0.0, 1.0, 1.0).area(), 1.0);
    }

    #[test]
    fn mbr_matches_corners() {
        let mbr = square(0.0, -1.0, 2.0, 1.0).mbr().unwrap();
        assert_eq!((mbr.x0, mbr.y0, mbr.x1, mbr.y1), (0.0, -1.0, 2.0, 1.0));
    }

    #[test]
    fn contains_point_interior_and_exterior() {
        let s = square(0.0, 0.0, 2.0, 2.0);
        assert!(s.contains_point(1.0, 1.0));
        assert!(!s.contains_point(3.0, 3.0));
    }

    #[test]
    fn intersection_of_overlapping_squares() {
        let a = square(0.0, 0.0, 2.0, 2.0);
        let b = square(1.0, 1.0, 3.0, 3.0);
        let inter = a.intersection(&b).expect("should overlap");
        assert!((inter.area() - 1.0).abs() < 1e-9);
    }

    #[test]
    fn intersection_of_disjoint_squares_is_none() {
        let a = square(0.0, 0.0, 1.0, 1.0);
        let b = square(5.0, 5.0, 6.0, 6.0);
        assert!(a.intersection(&b).is_none());
    }
}
