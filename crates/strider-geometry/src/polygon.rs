//! Convex polygons with derived half-plane form.
//!
//! Vertices are normalized to counter-clockwise winding at construction.
//! Predicates use an absolute tolerance; callers should avoid extreme
//! coordinate scales.

use nalgebra::{Point2, Rotation2, Vector2};

use crate::error::GeometryError;

/// Numerical tolerance for geometric predicates.
pub(crate) const EPS: f64 = 1e-9;

// ---------------------------------------------------------------------------
// HalfPlane
// ---------------------------------------------------------------------------

/// Closed half-plane `normal · x <= offset`.
#[derive(Clone, Copy, Debug)]
pub struct HalfPlane {
    pub normal: Vector2<f64>,
    pub offset: f64,
}

impl HalfPlane {
    pub fn new(normal: Vector2<f64>, offset: f64) -> Self {
        Self { normal, offset }
    }

    /// Membership test with tolerance.
    pub fn contains(&self, point: &Point2<f64>) -> bool {
        self.normal.dot(&point.coords) <= self.offset + EPS
    }

    /// Constraint slack `offset - normal · point`; negative outside.
    pub fn slack(&self, point: &Point2<f64>) -> f64 {
        self.offset - self.normal.dot(&point.coords)
    }
}

// ---------------------------------------------------------------------------
// ConvexPolygon
// ---------------------------------------------------------------------------

/// Convex polygon with at least 3 vertices, counter-clockwise winding, and
/// nonzero area. Invalid inputs fail at construction.
#[derive(Clone, Debug, PartialEq)]
pub struct ConvexPolygon {
    vertices: Vec<Point2<f64>>,
}

impl ConvexPolygon {
    /// Validate and build a polygon, normalizing winding to counter-clockwise.
    ///
    /// Collinear (redundant) vertices are tolerated; reflex corners and
    /// repeated vertices are not.
    pub fn new(mut vertices: Vec<Point2<f64>>) -> Result<Self, GeometryError> {
        if vertices.len() < 3 {
            return Err(GeometryError::TooFewVertices(vertices.len()));
        }
        for i in 0..vertices.len() {
            let next = vertices[(i + 1) % vertices.len()];
            if (next - vertices[i]).norm() < EPS {
                return Err(GeometryError::DuplicateVertex(i));
            }
        }
        let area2 = signed_area_2(&vertices);
        if area2.abs() < EPS {
            return Err(GeometryError::ZeroArea);
        }
        if area2 < 0.0 {
            vertices.reverse();
        }
        let n = vertices.len();
        for i in 0..n {
            let a = vertices[i];
            let b = vertices[(i + 1) % n];
            let c = vertices[(i + 2) % n];
            if cross(&(b - a), &(c - b)) < -EPS {
                return Err(GeometryError::NotConvex);
            }
        }
        Ok(Self { vertices })
    }

    /// Axis-aligned rectangle centered at `center`.
    pub fn rectangle(
        center: Point2<f64>,
        half_x: f64,
        half_y: f64,
    ) -> Result<Self, GeometryError> {
        Self::new(vec![
            Point2::new(center.x - half_x, center.y - half_y),
            Point2::new(center.x + half_x, center.y - half_y),
            Point2::new(center.x + half_x, center.y + half_y),
            Point2::new(center.x - half_x, center.y + half_y),
        ])
    }

    pub fn vertices(&self) -> &[Point2<f64>] {
        &self.vertices
    }

    /// Positive polygon area.
    pub fn area(&self) -> f64 {
        0.5 * signed_area_2(&self.vertices)
    }

    /// Area centroid.
    pub fn centroid(&self) -> Point2<f64> {
        let mut cx = 0.0;
        let mut cy = 0.0;
        let mut area2 = 0.0;
        let n = self.vertices.len();
        for i in 0..n {
            let a = self.vertices[i];
            let b = self.vertices[(i + 1) % n];
            let w = a.x * b.y - b.x * a.y;
            area2 += w;
            cx += (a.x + b.x) * w;
            cy += (a.y + b.y) * w;
        }
        Point2::new(cx / (3.0 * area2), cy / (3.0 * area2))
    }

    /// Point-in-polygon test (boundary counts as inside, within tolerance).
    pub fn contains(&self, point: &Point2<f64>) -> bool {
        let n = self.vertices.len();
        for i in 0..n {
            let a = self.vertices[i];
            let b = self.vertices[(i + 1) % n];
            if cross(&(b - a), &(point - a)) < -EPS {
                return false;
            }
        }
        true
    }

    /// Half-plane form: one inequality `normal · x <= offset` per edge, with
    /// outward normals. Every interior point satisfies all of them.
    pub fn half_planes(&self) -> Vec<HalfPlane> {
        let n = self.vertices.len();
        let mut planes = Vec::with_capacity(n);
        for i in 0..n {
            let a = self.vertices[i];
            let b = self.vertices[(i + 1) % n];
            let d = b - a;
            let normal = Vector2::new(d.y, -d.x);
            planes.push(HalfPlane::new(normal, normal.dot(&a.coords)));
        }
        planes
    }

    /// Polygon shifted by `translation`.
    pub fn translated(&self, translation: &Vector2<f64>) -> Self {
        Self {
            vertices: self.vertices.iter().map(|v| v + translation).collect(),
        }
    }

    /// Polygon rotated by `angle` about `center`.
    pub fn rotated_about(&self, angle: f64, center: &Point2<f64>) -> Self {
        let rot = Rotation2::new(angle);
        Self {
            vertices: self
                .vertices
                .iter()
                .map(|v| center + rot * (v - center))
                .collect(),
        }
    }

    /// Convex intersection via half-plane clipping. `None` when the overlap
    /// is empty or degenerate (a shared edge or point, not a region).
    pub fn intersection(&self, other: &Self) -> Option<Self> {
        let mut subject: Vec<Point2<f64>> = self.vertices.clone();
        for plane in other.half_planes() {
            subject = clip_by_half_plane(&subject, &plane);
            if subject.len() < 3 {
                return None;
            }
        }
        dedup_ring(&mut subject);
        if subject.len() < 3 {
            return None;
        }
        Self::new(subject).ok()
    }

    /// Area of the convex intersection; zero when disjoint.
    pub fn overlap_area(&self, other: &Self) -> f64 {
        self.intersection(other).map_or(0.0, |p| p.area())
    }
}

/// Twice the signed area (positive for counter-clockwise winding).
fn signed_area_2(vertices: &[Point2<f64>]) -> f64 {
    let n = vertices.len();
    let mut sum = 0.0;
    for i in 0..n {
        let a = vertices[i];
        let b = vertices[(i + 1) % n];
        sum += a.x * b.y - b.x * a.y;
    }
    sum
}

fn cross(a: &Vector2<f64>, b: &Vector2<f64>) -> f64 {
    a.x * b.y - a.y * b.x
}

/// One Sutherland-Hodgman clipping pass against a single half-plane.
fn clip_by_half_plane(ring: &[Point2<f64>], plane: &HalfPlane) -> Vec<Point2<f64>> {
    let mut out = Vec::with_capacity(ring.len() + 1);
    let n = ring.len();
    for i in 0..n {
        let current = ring[i];
        let next = ring[(i + 1) % n];
        let current_in = plane.contains(&current);
        let next_in = plane.contains(&next);
        if current_in {
            out.push(current);
        }
        if current_in != next_in {
            let d = next - current;
            let denom = plane.normal.dot(&d);
            if denom.abs() > EPS {
                let t = plane.slack(&current) / denom;
                out.push(current + d * t.clamp(0.0, 1.0));
            }
        }
    }
    out
}

/// Drop consecutive near-duplicate vertices (including the wrap-around pair).
fn dedup_ring(ring: &mut Vec<Point2<f64>>) {
    let mut i = 0;
    while ring.len() >= 2 && i < ring.len() {
        let next = ring[(i + 1) % ring.len()];
        if (next - ring[i]).norm() < EPS {
            ring.remove((i + 1) % ring.len());
        } else {
            i += 1;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn unit_square() -> ConvexPolygon {
        ConvexPolygon::rectangle(Point2::new(0.5, 0.5), 0.5, 0.5).unwrap()
    }

    #[test]
    fn rejects_too_few_vertices() {
        let err = ConvexPolygon::new(vec![Point2::new(0.0, 0.0), Point2::new(1.0, 0.0)])
            .unwrap_err();
        assert_eq!(err, GeometryError::TooFewVertices(2));
    }

    #[test]
    fn rejects_duplicate_vertex() {
        let err = ConvexPolygon::new(vec![
            Point2::new(0.0, 0.0),
            Point2::new(0.0, 0.0),
            Point2::new(1.0, 1.0),
        ])
        .unwrap_err();
        assert!(matches!(err, GeometryError::DuplicateVertex(_)));
    }

    #[test]
    fn rejects_collinear_ring() {
        let err = ConvexPolygon::new(vec![
            Point2::new(0.0, 0.0),
            Point2::new(1.0, 0.0),
            Point2::new(2.0, 0.0),
        ])
        .unwrap_err();
        assert_eq!(err, GeometryError::ZeroArea);
    }

    #[test]
    fn rejects_reflex_corner() {
        let err = ConvexPolygon::new(vec![
            Point2::new(0.0, 0.0),
            Point2::new(2.0, 0.0),
            Point2::new(2.0, 2.0),
            Point2::new(1.0, 0.5), // dents inward
            Point2::new(0.0, 2.0),
        ])
        .unwrap_err();
        assert_eq!(err, GeometryError::NotConvex);
    }

    #[test]
    fn normalizes_clockwise_input() {
        let cw = ConvexPolygon::new(vec![
            Point2::new(0.0, 0.0),
            Point2::new(0.0, 1.0),
            Point2::new(1.0, 1.0),
            Point2::new(1.0, 0.0),
        ])
        .unwrap();
        assert!(cw.area() > 0.0);
        assert_relative_eq!(cw.area(), 1.0);
    }

    #[test]
    fn area_and_centroid() {
        let square = unit_square();
        assert_relative_eq!(square.area(), 1.0);
        let c = square.centroid();
        assert_relative_eq!(c.x, 0.5);
        assert_relative_eq!(c.y, 0.5);
    }

    #[test]
    fn centroid_of_triangle() {
        let tri = ConvexPolygon::new(vec![
            Point2::new(0.0, 0.0),
            Point2::new(3.0, 0.0),
            Point2::new(0.0, 3.0),
        ])
        .unwrap();
        let c = tri.centroid();
        assert_relative_eq!(c.x, 1.0);
        assert_relative_eq!(c.y, 1.0);
    }

    #[test]
    fn contains_interior_boundary_exterior() {
        let square = unit_square();
        assert!(square.contains(&Point2::new(0.5, 0.5)));
        assert!(square.contains(&Point2::new(0.0, 0.5)));
        assert!(!square.contains(&Point2::new(1.2, 0.5)));
        assert!(!square.contains(&Point2::new(-0.1, -0.1)));
    }

    #[test]
    fn half_planes_describe_interior() {
        let square = unit_square();
        let planes = square.half_planes();
        assert_eq!(planes.len(), 4);
        let inside = Point2::new(0.5, 0.5);
        let outside = Point2::new(1.5, 0.5);
        assert!(planes.iter().all(|h| h.contains(&inside)));
        assert!(planes.iter().any(|h| !h.contains(&outside)));
    }

    #[test]
    fn half_plane_slack_sign() {
        let square = unit_square();
        let planes = square.half_planes();
        // Centroid sits strictly inside every half-plane.
        assert!(planes.iter().all(|h| h.slack(&square.centroid()) > 0.0));
    }

    #[test]
    fn translation_moves_centroid() {
        let square = unit_square();
        let moved = square.translated(&Vector2::new(2.0, -1.0));
        let c = moved.centroid();
        assert_relative_eq!(c.x, 2.5);
        assert_relative_eq!(c.y, -0.5);
        assert_relative_eq!(moved.area(), square.area());
    }

    #[test]
    fn rotation_preserves_area_and_center() {
        let square = unit_square();
        let center = square.centroid();
        let rotated = square.rotated_about(std::f64::consts::FRAC_PI_4, &center);
        assert_relative_eq!(rotated.area(), 1.0, epsilon = 1e-9);
        let c = rotated.centroid();
        assert_relative_eq!(c.x, center.x, epsilon = 1e-9);
        assert_relative_eq!(c.y, center.y, epsilon = 1e-9);
    }

    #[test]
    fn intersection_of_overlapping_squares() {
        let a = unit_square();
        let b = a.translated(&Vector2::new(0.5, 0.5));
        let overlap = a.intersection(&b).unwrap();
        assert_relative_eq!(overlap.area(), 0.25, epsilon = 1e-9);
        assert_relative_eq!(a.overlap_area(&b), 0.25, epsilon = 1e-9);
    }

    #[test]
    fn intersection_of_disjoint_squares_is_none() {
        let a = unit_square();
        let b = a.translated(&Vector2::new(3.0, 0.0));
        assert!(a.intersection(&b).is_none());
        assert_relative_eq!(a.overlap_area(&b), 0.0);
    }

    #[test]
    fn intersection_of_nested_squares_is_inner() {
        let outer = ConvexPolygon::rectangle(Point2::new(0.0, 0.0), 1.0, 1.0).unwrap();
        let inner = ConvexPolygon::rectangle(Point2::new(0.0, 0.0), 0.3, 0.3).unwrap();
        let overlap = outer.intersection(&inner).unwrap();
        assert_relative_eq!(overlap.area(), inner.area(), epsilon = 1e-9);
    }

    #[test]
    fn edge_touching_squares_have_no_overlap_region() {
        let a = unit_square();
        let b = a.translated(&Vector2::new(1.0, 0.0));
        assert!(a.intersection(&b).is_none());
    }

    #[test]
    fn intersection_square_and_diamond() {
        let square = ConvexPolygon::rectangle(Point2::new(0.0, 0.0), 1.0, 1.0).unwrap();
        let diamond = ConvexPolygon::new(vec![
            Point2::new(1.5, 0.0),
            Point2::new(0.0, 1.5),
            Point2::new(-1.5, 0.0),
            Point2::new(0.0, -1.5),
        ])
        .unwrap();
        let overlap = square.intersection(&diamond).unwrap();
        // Square area 4 minus four clipped corner triangles of area 0.125.
        assert_relative_eq!(overlap.area(), 4.0 - 4.0 * 0.125, epsilon = 1e-9);
    }
}
